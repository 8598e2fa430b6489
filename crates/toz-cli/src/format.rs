//! Number parsing and display helpers for the front end.

/// Parse a user-typed number leniently.
///
/// Anything that does not parse becomes NaN, which the solvers sanitize to
/// zero. A decimal comma is accepted.
#[must_use]
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replacen(',', ".", 1).parse::<f64>())
        .unwrap_or(f64::NAN)
}

/// Round to two decimals, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Magnitudes this large carry no fractional digits.
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / 100.0;
    // Avoid printing "-0.00".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Two-decimal display form of a breakdown amount.
#[must_use]
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Unit counts keep up to four decimals without trailing zeros.
#[must_use]
pub fn format_count(value: f64) -> String {
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_plain_and_comma_decimals() {
        assert_eq!(parse_number("78"), 78.0);
        assert_eq!(parse_number(" 1.5 "), 1.5);
        assert_eq!(parse_number("1,5"), 1.5);
        assert_eq!(parse_number("-3"), -3.0);
    }

    #[test]
    fn parse_number_turns_garbage_into_nan() {
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("").is_nan());
        assert!(parse_number("1,2,3").is_nan());
    }

    #[test]
    fn format_amount_rounds_to_two_places() {
        assert_eq!(format_amount(94.38), "94.38");
        assert_eq!(format_amount(12.1), "12.10");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(200.00000000000003), "200.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn format_amount_near_f64_max_stays_finite() {
        let text = format_amount(1.21e308);
        assert!(!text.contains("inf"), "{text}");
        assert!(text.starts_with("121"));
        assert!(text.ends_with(".00"));
        assert_eq!(round2(f64::MAX), f64::MAX);
    }

    #[test]
    fn format_count_trims_trailing_zeros() {
        assert_eq!(format_count(2.0), "2");
        assert_eq!(format_count(1.5), "1.5");
        assert_eq!(format_count(200.0 / 121.0), "1.6529");
        assert_eq!(format_count(0.0), "0");
    }
}
