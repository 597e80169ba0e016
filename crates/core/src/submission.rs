//! Positional submission identifiers.
//!
//! Data row `n` of the master sheet (1-based, header excluded) is
//! submission `n`, rendered as `SUB` followed by a five-digit zero-padded
//! number. Parsing is tolerant of any padding width so that folders named
//! by hand (`SUB000123`) still resolve. Positions start at 1, so `SUB00000`
//! is not an id.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/// Textual prefix shared by every submission id.
pub const SUBMISSION_PREFIX: &str = "SUB";

/// Minimum digit count when rendering an id.
pub const SUBMISSION_ID_WIDTH: usize = 5;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^SUB(\d+)$").expect("static regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u32);

impl SubmissionId {
    /// Id for the `position`-th data row (1-based).
    pub fn from_position(position: u32) -> Self {
        Self(position)
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SUBMISSION_PREFIX}{:0width$}",
            self.0,
            width = SUBMISSION_ID_WIDTH
        )
    }
}

impl FromStr for SubmissionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = id_pattern()
            .captures(s.trim())
            .ok_or_else(|| CoreError::InvalidSubmissionId(s.to_string()))?;
        match caps[1].parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(CoreError::InvalidSubmissionId(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn renders_five_digit_padding() {
        assert_eq!(SubmissionId::from_position(5).to_string(), "SUB00005");
        assert_eq!(SubmissionId::from_position(123).to_string(), "SUB00123");
    }

    #[test]
    fn wide_numbers_are_not_truncated() {
        assert_eq!(SubmissionId::from_position(123_456).to_string(), "SUB123456");
    }

    #[test]
    fn parses_regardless_of_padding() {
        assert_eq!("SUB00005".parse::<SubmissionId>().unwrap().number(), 5);
        assert_eq!("SUB000123".parse::<SubmissionId>().unwrap().number(), 123);
        assert_eq!("SUB7".parse::<SubmissionId>().unwrap().number(), 7);
    }

    #[test]
    fn rejects_foreign_names() {
        assert_matches!(
            "Review Tracker".parse::<SubmissionId>(),
            Err(CoreError::InvalidSubmissionId(_))
        );
        assert_matches!("SUB".parse::<SubmissionId>(), Err(_));
        assert_matches!("sub00001".parse::<SubmissionId>(), Err(_));
        assert_matches!("SUB00001 copy".parse::<SubmissionId>(), Err(_));
    }

    #[test]
    fn zero_is_not_a_position() {
        assert_matches!(
            "SUB00000".parse::<SubmissionId>(),
            Err(CoreError::InvalidSubmissionId(_))
        );
        assert_matches!("SUB0".parse::<SubmissionId>(), Err(_));
    }

    #[test]
    fn ordering_follows_number_not_text() {
        let a: SubmissionId = "SUB000123".parse().unwrap();
        let b: SubmissionId = "SUB00005".parse().unwrap();
        assert!(b < a);
    }
}
