use std::sync::Arc;

use rand::seq::SliceRandom;
use spelling_core::model::{
    GameMode, Grade, ProgressDelta, QuizAnswer, QuizSession, Score, Word,
};
use tracing::warn;

use crate::error::SessionError;
use crate::progress_store::ProgressStore;
use crate::word_supplier::WordSupplier;

/// Result of answering a practice word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeAnswer {
    pub correct: bool,
    pub score: Score,
    /// `false` when the answer could not be written to progress storage.
    pub recorded: bool,
}

/// Result of answering a quiz word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerResult {
    pub answer: QuizAnswer,
    /// `false` when the answer could not be written to progress storage.
    pub recorded: bool,
}

/// Drives practice and quiz rounds: pulls words from the supplier and
/// reports each answer to the progress store.
#[derive(Clone)]
pub struct SpellingService {
    words: Arc<WordSupplier>,
    progress: Arc<ProgressStore>,
}

impl SpellingService {
    #[must_use]
    pub fn new(words: Arc<WordSupplier>, progress: Arc<ProgressStore>) -> Self {
        Self { words, progress }
    }

    /// Start a quiz over a shuffled selection of the grade's words.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generation` if no words can be supplied.
    pub async fn start_quiz(&self, grade: Grade) -> Result<QuizSession, SessionError> {
        let mut words = self.words.get_words_for_grade(grade).await?;
        words.shuffle(&mut rand::rng());
        let session = QuizSession::new(words)?;
        self.progress.set_current_grade(grade).await;
        Ok(session)
    }

    /// Grade the current quiz word and record it under the quiz mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Quiz` if the quiz is complete or the word was
    /// already answered.
    pub async fn answer_quiz(
        &self,
        session: &mut QuizSession,
        answer: &str,
    ) -> Result<QuizAnswerResult, SessionError> {
        let outcome = session.answer(answer)?;
        let recorded = self
            .record(outcome.word.grade(), GameMode::Quiz, &outcome.word, outcome.correct)
            .await;
        Ok(QuizAnswerResult {
            answer: outcome,
            recorded,
        })
    }

    /// Pick a random practice word for `grade`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generation` if no words can be supplied.
    pub async fn next_practice_word(&self, grade: Grade) -> Result<Word, SessionError> {
        Ok(self.words.get_random_word_for_grade(grade).await?)
    }

    /// Grade a practice answer, update `score`, and record it under the
    /// practice mode.
    pub async fn answer_practice(
        &self,
        grade: Grade,
        word: &Word,
        answer: &str,
        score: &mut Score,
    ) -> PracticeAnswer {
        let correct = word.is_spelled_by(answer);
        score.record(correct);
        score.total += 1;
        let recorded = self.record(grade, GameMode::Practice, word, correct).await;
        PracticeAnswer {
            correct,
            score: *score,
            recorded,
        }
    }

    async fn record(&self, grade: Grade, mode: GameMode, word: &Word, correct: bool) -> bool {
        let delta = ProgressDelta::attempt(word.word(), correct);
        let recorded = self.progress.update_progress(grade, mode, &delta).await;
        if !recorded {
            warn!(%grade, %mode, word = word.word(), "answer was not recorded");
        }
        self.progress.touch_last_played().await;
        recorded
    }
}
