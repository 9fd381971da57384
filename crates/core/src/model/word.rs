use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::grade::Grade;

//
// ─── GAME MODE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown game mode: {0}")]
pub struct ParseModeError(pub String);

/// How a word was answered: free practice or a scored quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Practice,
    Quiz,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Practice, GameMode::Quiz];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Practice => "practice",
            GameMode::Quiz => "quiz",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(GameMode::Practice),
            "quiz" => Ok(GameMode::Quiz),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.pad(label)
    }
}

//
// ─── WORD ─────────────────────────────────────────────────────────────────────
//

/// A generated spelling word with its teaching material.
///
/// Words are immutable once produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    word: String,
    definition: String,
    sentence: String,
    difficulty: Difficulty,
    grade: Grade,
}

impl Word {
    #[must_use]
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        sentence: impl Into<String>,
        difficulty: Difficulty,
        grade: Grade,
    ) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            sentence: sentence.into(),
            difficulty,
            grade,
        }
    }

    /// Returns a copy of this word attributed to `grade`.
    #[must_use]
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = grade;
        self
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Checks a typed answer against this word, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn is_spelled_by(&self, answer: &str) -> bool {
        is_correct_spelling(answer, &self.word)
    }

    /// The example sentence with every occurrence of the word replaced by
    /// `mask`, matched without regard to ASCII case.
    #[must_use]
    pub fn masked_sentence(&self, mask: &str) -> String {
        let needle = self.word.trim();
        if needle.is_empty() {
            return self.sentence.clone();
        }

        let mut out = String::with_capacity(self.sentence.len());
        let mut rest = self.sentence.as_str();
        loop {
            let matched = rest
                .get(..needle.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(needle));
            if matched {
                out.push_str(mask);
                rest = &rest[needle.len()..];
                continue;
            }
            let mut chars = rest.chars();
            match chars.next() {
                Some(ch) => {
                    out.push(ch);
                    rest = chars.as_str();
                }
                None => break,
            }
        }
        out
    }
}

/// Compares an answer to the expected spelling after trimming and lowercasing
/// both sides.
#[must_use]
pub fn is_correct_spelling(answer: &str, expected: &str) -> bool {
    answer.trim().to_lowercase() == expected.trim().to_lowercase()
}
