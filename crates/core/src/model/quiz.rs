use thiserror::Error;

use crate::model::word::Word;

/// Number of words asked in one quiz.
pub const QUIZ_LENGTH: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no words")]
    Empty,
    #[error("quiz already completed")]
    Completed,
    #[error("current word was already answered")]
    AlreadyAnswered,
    #[error("current word has not been answered yet")]
    NotAnswered,
}

//
// ─── SCORE ────────────────────────────────────────────────────────────────────
//

/// Running score for a practice or quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub current: u32,
    pub total: u32,
    pub streak: u32,
}

impl Score {
    #[must_use]
    pub fn with_total(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Correct answers extend the streak; a miss resets it.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.current += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
    }
}

//
// ─── QUIZ SESSION ─────────────────────────────────────────────────────────────
//

/// Outcome of answering one quiz word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    pub word: Word,
    pub correct: bool,
    pub score: Score,
    pub is_last: bool,
}

/// A fixed run of up to [`QUIZ_LENGTH`] words answered in order.
///
/// Each word is answered once, then `advance` moves to the next.
#[derive(Debug, Clone)]
pub struct QuizSession {
    words: Vec<Word>,
    index: usize,
    answered: bool,
    score: Score,
}

impl QuizSession {
    /// Start a quiz over the first [`QUIZ_LENGTH`] of `words`.
    ///
    /// Callers shuffle beforehand when they want a random selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if `words` is empty.
    pub fn new(mut words: Vec<Word>) -> Result<Self, QuizError> {
        if words.is_empty() {
            return Err(QuizError::Empty);
        }
        words.truncate(QUIZ_LENGTH);
        let total = u32::try_from(words.len()).unwrap_or(u32::MAX);
        Ok(Self {
            words,
            index: 0,
            answered: false,
            score: Score::with_total(total),
        })
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Zero-based position of the current word.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index >= self.words.len()
    }

    /// Grade the current word.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last word, or
    /// `QuizError::AlreadyAnswered` if the current word was graded already.
    pub fn answer(&mut self, answer: &str) -> Result<QuizAnswer, QuizError> {
        let word = self.current_word().cloned().ok_or(QuizError::Completed)?;
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        let correct = word.is_spelled_by(answer);
        self.score.record(correct);
        self.answered = true;
        Ok(QuizAnswer {
            word,
            correct,
            score: self.score,
            is_last: self.index + 1 == self.words.len(),
        })
    }

    /// Move past the answered word. Returns `true` while words remain.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the last word, or
    /// `QuizError::NotAnswered` if the current word is still open.
    pub fn advance(&mut self) -> Result<bool, QuizError> {
        if self.is_complete() {
            return Err(QuizError::Completed);
        }
        if !self.answered {
            return Err(QuizError::NotAnswered);
        }
        self.index += 1;
        self.answered = false;
        Ok(!self.is_complete())
    }
}
