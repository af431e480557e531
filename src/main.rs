use std::{fs, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use plainscript::{
    explain::{DEFAULT_ENDPOINT, DEFAULT_MODEL, HttpExplainer},
    interpreter::{
        evaluator::core::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_WHILE_ITERATIONS},
        parser::DEFAULT_MAX_NESTING_DEPTH,
    },
    pipeline::{CompileResult, Compiler, CompilerConfig},
    util::text::decode_cli_escapes,
};

/// plainscript compiles and runs programs written in a small teaching
/// language with a natural-language surface syntax.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The program to run. Omit it when using `--file`.
    #[arg(required_unless_present = "file")]
    contents: Option<String>,

    /// Reads the program from a file instead.
    #[arg(short, long, conflicts_with = "contents")]
    file: Option<PathBuf>,

    /// Prints the whole result (tokens, parse tree, explanation and output)
    /// as JSON.
    #[arg(long)]
    json: bool,

    /// Decodes `\n` and `\t` escapes in the inline program, as sent by
    /// clients that transport source code as a single line.
    #[arg(long)]
    decode_escapes: bool,

    /// Asks the explanation service to describe the program.
    #[arg(long)]
    explain: bool,

    /// Base URL of the explanation service.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    explain_endpoint: String,

    /// Model used by the explanation service.
    #[arg(long, default_value = DEFAULT_MODEL)]
    explain_model: String,

    /// API key of the explanation service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seconds to wait for an explanation.
    #[arg(long, default_value_t = 15)]
    explain_timeout: u64,

    /// Iterations a single `while` loop may run.
    #[arg(long, default_value_t = DEFAULT_MAX_WHILE_ITERATIONS)]
    max_while_iterations: usize,

    /// Nested function calls allowed.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Levels of nested parentheses, operators and blocks the parser accepts.
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_nesting_depth: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let script = match (&args.file, &args.contents) {
        (Some(path), _) => match fs::read_to_string(path) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Failed to read the input file '{}': {e}", path.display());
                return ExitCode::FAILURE;
            },
        },
        (None, Some(contents)) if args.decode_escapes => decode_cli_escapes(contents),
        (None, Some(contents)) => contents.clone(),
        (None, None) => String::new(),
    };

    let config = CompilerConfig { max_while_iterations: args.max_while_iterations,
                                  max_call_depth: args.max_call_depth,
                                  max_nesting_depth: args.max_nesting_depth,
                                  explain_timeout: Duration::from_secs(args.explain_timeout),
                                  ..CompilerConfig::default() };
    let mut compiler = Compiler::new(config);

    if args.explain {
        match HttpExplainer::new(args.explain_endpoint,
                                 args.explain_model,
                                 args.api_key,
                                 config.explain_timeout)
        {
            Ok(explainer) => compiler = compiler.with_explainer(Arc::new(explainer)),
            Err(e) => log::warn!("explanations disabled: {e}"),
        }
    }

    let result = compiler.compile(&script);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialise the result: {e}");
                return ExitCode::FAILURE;
            },
        }
    } else {
        report(&result, args.explain);
    }

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(result: &CompileResult, explain: bool) {
    if result.is_success() {
        for line in &result.output {
            println!("{line}");
        }
    } else {
        for line in &result.output {
            eprintln!("{line}");
        }
    }

    if explain {
        println!();
        println!("{}", result.explanation);
    }
}
