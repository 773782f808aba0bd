//! Encoding and decoding of artifact sizes in commit status descriptions.
//!
//! The description is the only place a size is ever recorded, so [decode] must recover the exact
//! current size from anything [encode] produces. Three shapes are produced:
//!
//! - `123,456 bytes`
//! - `No change (123,456 bytes)`
//! - `+1,000 bytes (+0.81%) --> 123,456 bytes`

use crate::{
    constants::BYTES_SUFFIX,
    errors::{SizeError, SizeResult},
};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the trailing `<number> bytes`, optionally closed by a parenthesis and a single newline.
static TRAILING_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9,]+) bytes\)?\n?$").expect("trailing size pattern is valid"));

/// Encodes the current size of an artifact, annotated with the change from `previous` when a
/// previous size is known.
///
/// The percentage is relative to the *current* size, not the previous one.
pub fn encode(current: u64, previous: Option<u64>) -> String {
    let Some(previous) = previous else {
        return format!("{}{}", group(current), BYTES_SUFFIX);
    };

    let delta = i128::from(current) - i128::from(previous);
    if delta == 0 {
        return format!("No change ({}{})", group(current), BYTES_SUFFIX);
    }

    format!(
        "{}{} ({:+.2}%) --> {}{}",
        signed(delta),
        BYTES_SUFFIX,
        percent_change(delta, current),
        group(current),
        BYTES_SUFFIX
    )
}

/// Decodes the current size from a description produced by [encode].
///
/// ## Takes
/// - `description` - The description of a previously posted status.
///
/// ## Returns
/// - `Ok(u64)` - The final `<number> bytes` figure, with thousands separators removed.
/// - `Err(SizeError::MalformedDescription)` - If the description does not end with a size.
pub fn decode(description: &str) -> SizeResult<u64> {
    let malformed = || SizeError::MalformedDescription(description.to_string());

    let digits = TRAILING_SIZE
        .captures(description)
        .and_then(|captures| captures.get(1))
        .ok_or_else(malformed)?
        .as_str()
        .replace(',', "");

    digits.parse::<u64>().map_err(|_| malformed())
}

/// `100 * delta / current`. A size that shrank to nothing reports `-100%`.
fn percent_change(delta: i128, current: u64) -> f64 {
    if current == 0 {
        return -100.0;
    }
    100.0 * delta as f64 / current as f64
}

fn group(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn signed(delta: i128) -> String {
    let grouped = delta.to_formatted_string(&Locale::en);
    if delta > 0 {
        format!("+{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod test {
    use super::{decode, encode};
    use crate::errors::SizeError;

    #[test]
    fn decode_inverts_encode() {
        let cases = [
            (123456, Some(122456)),
            (123456, None),
            (123456, Some(123456)),
            (122456, Some(123456)),
            (12345678, Some(12345679)),
            (0, None),
            (0, Some(0)),
            (0, Some(512)),
            (512, Some(0)),
            (999, Some(1_000)),
            (u64::MAX, Some(0)),
        ];

        for (current, previous) in cases {
            let description = encode(current, previous);
            assert_eq!(
                decode(&description).unwrap(),
                current,
                "description: {description}"
            );
        }
    }

    #[test]
    fn absolute_size() {
        assert_eq!(encode(123456, None), "123,456 bytes");
        assert_eq!(encode(7, None), "7 bytes");
    }

    #[test]
    fn no_change() {
        assert_eq!(encode(123456, Some(123456)), "No change (123,456 bytes)");
        assert_eq!(encode(42, Some(42)), "No change (42 bytes)");
    }

    #[test]
    fn percentage_is_relative_to_current_size() {
        assert_eq!(
            encode(200, Some(100)),
            "+100 bytes (+50.00%) --> 200 bytes"
        );
        assert_eq!(
            encode(500_000, Some(480_000)),
            "+20,000 bytes (+4.00%) --> 500,000 bytes"
        );
    }

    #[test]
    fn negative_delta() {
        assert_eq!(
            encode(100, Some(200)),
            "-100 bytes (-100.00%) --> 100 bytes"
        );
        assert_eq!(
            encode(12345678, Some(12345679)),
            "-1 bytes (-0.00%) --> 12,345,678 bytes"
        );
    }

    #[test]
    fn shrink_to_empty() {
        assert_eq!(encode(0, Some(2048)), "-2,048 bytes (-100.00%) --> 0 bytes");
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        assert_eq!(decode("123 bytes\n").unwrap(), 123);
        assert_eq!(decode("No change (1,024 bytes)\n").unwrap(), 1024);
        assert!(decode("123 bytes\n\n").is_err());
    }

    #[test]
    fn malformed_descriptions() {
        for description in [
            "",
            "bytes",
            "123,456",
            "123,456 bytes and then some",
            ", bytes",
            "99999999999999999999999 bytes",
        ] {
            assert!(
                matches!(decode(description), Err(SizeError::MalformedDescription(d)) if d == description),
                "description: {description}"
            );
        }
    }
}
