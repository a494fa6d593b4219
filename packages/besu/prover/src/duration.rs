//! Parsing of duration strings such as `"336h"`, `"1h30m"` or `"1.5s"`.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;
/// Longest representable duration, `i64::MAX` nanoseconds
const MAX_NANOS: u128 = 9_223_372_036_854_775_807;
/// Fraction digits beyond this precision are ignored, so that `10^18 * NANOS_PER_HOUR`
/// bounds every intermediate product
const MAX_FRACTION_DIGITS: usize = 18;

/// Error returned for malformed duration strings
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The string is not a duration
    #[error("invalid duration {0:?}")]
    Invalid(String),
    /// A number has no unit
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    /// A unit is not one of `ns`, `us`, `µs`, `ms`, `s`, `m` or `h`
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unknown unit
        unit: String,
        /// The full input
        input: String,
    },
    /// The duration is negative
    #[error("negative duration {0:?}")]
    Negative(String),
    /// The duration is too long
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// Parses a sequence of decimal numbers, each with an optional fraction and a unit suffix,
/// with an optional leading sign. `"0"` needs no unit.
/// # Errors
/// Returns an error if the string is malformed, negative or longer than `i64::MAX` nanoseconds.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    ensure!(!rest.is_empty(), DurationError::Invalid(input.to_string()));

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (integer, after) = split_digits(rest);
        let (fraction, after) = after
            .strip_prefix('.')
            .map_or(("", after), split_digits);
        ensure!(
            !integer.is_empty() || !fraction.is_empty(),
            DurationError::Invalid(input.to_string())
        );

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        ensure!(!unit.is_empty(), DurationError::MissingUnit(input.to_string()));
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || DurationError::Overflow(input.to_string());
        let whole = if integer.is_empty() {
            0
        } else {
            integer.parse::<u128>().map_err(|_| overflow())?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|nanos| nanos.checked_add(fraction_nanos(fraction, scale)))
            .and_then(|nanos| total.checked_add(nanos))
            .filter(|&nanos| nanos <= MAX_NANOS)
            .ok_or_else(overflow)?;

        rest = after;
    }

    ensure!(
        !negative || total == 0,
        DurationError::Negative(input.to_string())
    );

    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow(input.to_string()))?;
    Ok(Duration::from_nanos(nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(len)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        // U+00B5 micro sign and U+03BC greek small letter mu
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// `0.fraction * scale`, truncated
fn fraction_nanos(fraction: &str, scale: u128) -> u128 {
    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in fraction.bytes().take(MAX_FRACTION_DIGITS) {
        numerator = numerator * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    numerator * scale / denominator
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("-0", Duration::ZERO)]
    #[case("+0", Duration::ZERO)]
    #[case("0s", Duration::ZERO)]
    #[case("10s", Duration::from_secs(10))]
    #[case("336h", Duration::from_secs(336 * 3600))]
    #[case("1h30m", Duration::from_secs(5400))]
    #[case("2h45m30.5s", Duration::from_millis(9_930_500))]
    #[case("1.5s", Duration::from_millis(1500))]
    #[case(".5m", Duration::from_secs(30))]
    #[case("1.s", Duration::from_secs(1))]
    #[case("100ms", Duration::from_millis(100))]
    #[case("250us", Duration::from_micros(250))]
    #[case("250µs", Duration::from_micros(250))]
    #[case("250μs", Duration::from_micros(250))]
    #[case("42ns", Duration::from_nanos(42))]
    #[case("1.0000000001s", Duration::from_secs(1))]
    #[case("+5m", Duration::from_secs(300))]
    #[case("1.999999999999999999999999999999s", Duration::from_nanos(1_999_999_999))]
    #[case("0.999999999999999999999999999999h", Duration::from_nanos(3_599_999_999_999))]
    #[case("0.999999999999999999999999999999ns", Duration::ZERO)]
    #[case("1.000000000000000000000000000009h", Duration::from_secs(3600))]
    fn parses_valid_durations(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(input), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("not-a-duration")]
    #[case("s")]
    #[case(".s")]
    #[case("1.2.3s")]
    fn rejects_malformed_durations(#[case] input: &str) {
        assert!(parse_duration(input).is_err(), "{input}");
    }

    #[test]
    fn reports_the_failure_kind() {
        assert_eq!(
            parse_duration("10"),
            Err(DurationError::MissingUnit("10".to_string()))
        );
        assert_eq!(
            parse_duration("3d"),
            Err(DurationError::UnknownUnit {
                unit: "d".to_string(),
                input: "3d".to_string()
            })
        );
        assert_eq!(
            parse_duration("-1h"),
            Err(DurationError::Negative("-1h".to_string()))
        );
        assert_eq!(
            parse_duration("9999999h"),
            Err(DurationError::Overflow("9999999h".to_string()))
        );
    }

    #[test]
    fn accepts_the_longest_duration() {
        assert_eq!(
            parse_duration("9223372036854775807ns"),
            Ok(Duration::from_nanos(9_223_372_036_854_775_807))
        );
        assert!(parse_duration("9223372036854775808ns").is_err());
    }
}
