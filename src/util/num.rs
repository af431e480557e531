/// Converts an `i64` to `f64`, rounding to the nearest representable value.
///
/// Exact up to 2^53 in absolute value. Larger integers lose their low bits,
/// the same way mixed arithmetic does in any language with IEEE doubles.
///
/// ## Example
/// ```
/// use plainscript::util::num::i64_to_f64_lossy;
///
/// assert_eq!(i64_to_f64_lossy(42), 42.0);
/// assert_eq!(i64_to_f64_lossy(9_007_199_254_740_993), 9_007_199_254_740_992.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64_lossy(value: i64) -> f64 {
    value as f64
}

/// Formats a real number the way programs print it.
///
/// Integral values keep a trailing `.0` so reals stay recognisable next to
/// integers; everything else uses the shortest round-trip representation.
///
/// ## Example
/// ```
/// use plainscript::util::num::format_real;
///
/// assert_eq!(format_real(2.0), "2.0");
/// assert_eq!(format_real(2.5), "2.5");
/// assert_eq!(format_real(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_reals_keep_a_fraction() {
        assert_eq!(format_real(-3.0), "-3.0");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn lossy_conversion_rounds() {
        assert!((i64_to_f64_lossy(i64::MAX) - 9.223_372_036_854_776e18).abs() < 1.0);
    }
}
