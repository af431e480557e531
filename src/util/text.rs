/// Decodes the escape sequences of a string literal body.
///
/// `\n`, `\t`, `\"` and `\\` are translated. Any other backslash sequence is
/// kept as written, and a lone trailing backslash stays a backslash.
///
/// ## Example
/// ```
/// use plainscript::util::text::unescape;
///
/// assert_eq!(unescape(r#"say \"hi\"\n"#), "say \"hi\"\n");
/// assert_eq!(unescape(r"c:\temp\q"), "c:\temp\\q");
/// ```
#[must_use]
pub fn unescape(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('"') => decoded.push('"'),
            Some('\\') => decoded.push('\\'),
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            },
            None => decoded.push('\\'),
        }
    }

    decoded
}

/// Decodes escape sequences in raw command-line input.
///
/// Shells hand over `\n` as two characters, so the CLI can opt into turning
/// them into real line breaks before compiling.
///
/// ## Example
/// ```
/// use plainscript::util::text::decode_cli_escapes;
///
/// assert_eq!(decode_cli_escapes(r"let x = 1;\nprint(x);"), "let x = 1;\nprint(x);");
/// ```
#[must_use]
pub fn decode_cli_escapes(raw: &str) -> String {
    raw.replace("\\r\\n", "\n").replace("\\n", "\n").replace("\\t", "\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_escapes() {
        assert_eq!(unescape(r"\q\"), "\\q\\");
    }

    #[test]
    fn decodes_backslash_before_quote() {
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"a\tb"), "a\tb");
    }
}
