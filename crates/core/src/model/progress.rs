use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::grade::Grade;
use crate::model::word::GameMode;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("correct attempts ({correct}) exceed total attempts ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

//
// ─── PROGRESS RECORD ──────────────────────────────────────────────────────────
//

/// Accumulated results for one grade in one mode.
///
/// Word sets only grow and counters only increase until an explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    correct_words: BTreeSet<String>,
    #[serde(default)]
    incorrect_words: BTreeSet<String>,
    #[serde(default)]
    total_attempts: u32,
    #[serde(default)]
    correct_attempts: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn correct_words(&self) -> &BTreeSet<String> {
        &self.correct_words
    }

    #[must_use]
    pub fn incorrect_words(&self) -> &BTreeSet<String> {
        &self.incorrect_words
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn correct_attempts(&self) -> u32 {
        self.correct_attempts
    }

    /// Percentage of correct attempts in `[0, 100]`; `0` when nothing was attempted.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        let ratio = f64::from(self.correct_attempts) / f64::from(self.total_attempts);
        (ratio * 100.0).clamp(0.0, 100.0)
    }

    /// Merge an increment into this record.
    ///
    /// Counters are summed and word lists are unioned.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::CorrectExceedsTotal` if the delta claims more
    /// correct attempts than total attempts. The record is left untouched.
    pub fn apply(&mut self, delta: &ProgressDelta) -> Result<(), ProgressError> {
        delta.validate()?;
        self.total_attempts = self.total_attempts.saturating_add(delta.total_attempts);
        self.correct_attempts = self
            .correct_attempts
            .saturating_add(delta.correct_attempts)
            .min(self.total_attempts);
        self.correct_words
            .extend(delta.correct_words.iter().cloned());
        self.incorrect_words
            .extend(delta.incorrect_words.iter().cloned());
        Ok(())
    }
}

//
// ─── PROGRESS DELTA ───────────────────────────────────────────────────────────
//

/// Partial progress carried by one answer (or a batch of answers).
///
/// Counters are increments, not absolute values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressDelta {
    pub correct_words: Vec<String>,
    pub incorrect_words: Vec<String>,
    pub total_attempts: u32,
    pub correct_attempts: u32,
}

impl ProgressDelta {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta for a single answered word.
    #[must_use]
    pub fn attempt(word: impl Into<String>, correct: bool) -> Self {
        let word = word.into();
        let (correct_words, incorrect_words) = if correct {
            (vec![word], Vec::new())
        } else {
            (Vec::new(), vec![word])
        };
        Self {
            correct_words,
            incorrect_words,
            total_attempts: 1,
            correct_attempts: u32::from(correct),
        }
    }

    #[must_use]
    pub fn with_attempts(mut self, total: u32, correct: u32) -> Self {
        self.total_attempts = total;
        self.correct_attempts = correct;
        self
    }

    #[must_use]
    pub fn with_correct_word(mut self, word: impl Into<String>) -> Self {
        self.correct_words.push(word.into());
        self
    }

    #[must_use]
    pub fn with_incorrect_word(mut self, word: impl Into<String>) -> Self {
        self.incorrect_words.push(word.into());
        self
    }

    /// # Errors
    ///
    /// Returns `ProgressError::CorrectExceedsTotal` when `correct_attempts > total_attempts`.
    pub fn validate(&self) -> Result<(), ProgressError> {
        if self.correct_attempts > self.total_attempts {
            return Err(ProgressError::CorrectExceedsTotal {
                correct: self.correct_attempts,
                total: self.total_attempts,
            });
        }
        Ok(())
    }
}

//
// ─── GRADE PROGRESS ───────────────────────────────────────────────────────────
//

/// Both mode records for a single grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeProgress {
    #[serde(default)]
    pub practice: ProgressRecord,
    #[serde(default)]
    pub quiz: ProgressRecord,
}

impl GradeProgress {
    #[must_use]
    pub fn mode(&self, mode: GameMode) -> &ProgressRecord {
        match mode {
            GameMode::Practice => &self.practice,
            GameMode::Quiz => &self.quiz,
        }
    }

    pub fn mode_mut(&mut self, mode: GameMode) -> &mut ProgressRecord {
        match mode {
            GameMode::Practice => &mut self.practice,
            GameMode::Quiz => &mut self.quiz,
        }
    }

    /// Correct words across both modes, counting a word once per mode.
    #[must_use]
    pub fn words_learned(&self) -> usize {
        self.practice.correct_words.len() + self.quiz.correct_words.len()
    }
}

//
// ─── PROGRESS DOCUMENT ────────────────────────────────────────────────────────
//

/// The persisted progress document: grade to per-mode records.
///
/// Serializes as `{ "<grade>": { "practice": {..}, "quiz": {..} } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressDocument {
    grades: BTreeMap<Grade, GradeProgress>,
}

impl ProgressDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    #[must_use]
    pub fn grade(&self, grade: Grade) -> Option<&GradeProgress> {
        self.grades.get(&grade)
    }

    /// Returns the grade entry, creating a zero record if absent.
    pub fn grade_mut(&mut self, grade: Grade) -> &mut GradeProgress {
        self.grades.entry(grade).or_default()
    }

    /// Replace a grade's entry with the zero record.
    pub fn reset_grade(&mut self, grade: Grade) {
        self.grades.insert(grade, GradeProgress::default());
    }

    /// Set a grade's entry, returning the one it replaced.
    pub fn insert(&mut self, grade: Grade, progress: GradeProgress) -> Option<GradeProgress> {
        self.grades.insert(grade, progress)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Grade, &GradeProgress)> {
        self.grades.iter()
    }

    /// Sum of correct-word set sizes over every grade and mode.
    ///
    /// A word learned in both modes, or in two grades, counts each time.
    #[must_use]
    pub fn total_words_learned(&self) -> usize {
        self.grades.values().map(GradeProgress::words_learned).sum()
    }
}

impl FromIterator<(Grade, GradeProgress)> for ProgressDocument {
    fn from_iter<I: IntoIterator<Item = (Grade, GradeProgress)>>(iter: I) -> Self {
        Self {
            grades: iter.into_iter().collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
