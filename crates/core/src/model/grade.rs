use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GradeError {
    #[error("grade must be between 1 and 5, got {0}")]
    OutOfRange(u8),
    #[error("invalid grade: {0}")]
    Invalid(String),
}

/// School grade level (1 through 5).
///
/// Serialized as a bare number, which `serde_json` writes as a string key when
/// the grade is used to index the progress document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a new `Grade`.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::OutOfRange` if `value` is not in `1..=5`.
    pub fn new(value: u8) -> Result<Self, GradeError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GradeError::OutOfRange(value))
        }
    }

    /// All supported grades in ascending order.
    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Number of words a cached list must hold before it is considered complete.
    #[must_use]
    pub fn min_word_count(&self) -> usize {
        match self.0 {
            1 => 10,
            2 => 12,
            3 => 15,
            4 => 18,
            _ => 20,
        }
    }

    /// Human-readable focus of the grade, handed to the word generator.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self.0 {
            1 => "simple three to four letter words, basic sight words, and common vocabulary",
            2 => "four to five letter words, basic compound words, and common spelling patterns",
            3 => "five to seven letter words, compound words, and basic prefixes and suffixes",
            4 => {
                "seven to nine letter words, advanced compound words, and common Latin and Greek roots"
            }
            _ => "multi-syllable words, advanced vocabulary, and complex spelling patterns",
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = GradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| GradeError::Invalid(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Debug for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade({})", self.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
