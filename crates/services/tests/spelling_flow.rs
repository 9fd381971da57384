use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use services::{AppServices, Clock, GenerationError, SessionError, WordGenerator};
use spelling_core::model::{Difficulty, GameMode, Grade, QUIZ_LENGTH, QuizError, Score, Word};
use spelling_core::time::{FIXED_TEST_TIMESTAMP, fixed_now};
use storage::repository::Storage;

/// Returns a fixed, grade-sized list and counts calls.
struct StaticGenerator {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl WordGenerator for StaticGenerator {
    async fn generate(
        &self,
        grade: Grade,
        count: usize,
        _description: &str,
    ) -> Result<Vec<Word>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::Generator("service unavailable".into()));
        }
        Ok((0..count)
            .map(|i| {
                Word::new(
                    format!("word{i}"),
                    "a test word",
                    "Spell the test word.",
                    Difficulty::Easy,
                    grade,
                )
            })
            .collect())
    }
}

fn build(fail: bool) -> (AppServices, Arc<StaticGenerator>) {
    let generator = Arc::new(StaticGenerator {
        calls: AtomicUsize::new(0),
        fail,
    });
    let services = AppServices::new(
        Clock::fixed(fixed_now()),
        &Storage::in_memory(),
        generator.clone(),
    );
    (services, generator)
}

#[tokio::test]
async fn quiz_round_records_every_answer() {
    let (services, generator) = build(false);
    let spelling = services.spelling();
    let progress = services.progress();
    let grade = Grade::new(3).unwrap();

    let mut quiz = spelling.start_quiz(grade).await.unwrap();
    assert_eq!(quiz.len(), QUIZ_LENGTH);
    assert_eq!(progress.current_grade().await, Some(grade));

    let mut answered = 0;
    while let Some(word) = quiz.current_word().cloned() {
        // Miss every third word.
        let answer = if answered % 3 == 2 {
            "wrong".to_string()
        } else {
            word.word().to_uppercase()
        };
        let result = spelling.answer_quiz(&mut quiz, &answer).await.unwrap();
        assert!(result.recorded);
        answered += 1;
        quiz.advance().unwrap();
    }

    assert_eq!(answered, QUIZ_LENGTH);
    assert_eq!(quiz.score().current, 7);

    let record = progress.get_grade_progress(grade).await.quiz;
    assert_eq!(record.total_attempts(), 10);
    assert_eq!(record.correct_attempts(), 7);
    assert_eq!(record.correct_words().len(), 7);
    assert_eq!(record.incorrect_words().len(), 3);
    assert_eq!(progress.get_accuracy(grade, GameMode::Quiz).await, 70.0);
    assert_eq!(progress.last_played().await, Some(FIXED_TEST_TIMESTAMP * 1000));

    // The second quiz is served from cache.
    spelling.start_quiz(grade).await.unwrap();
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    let err = spelling.answer_quiz(&mut quiz, "late").await.unwrap_err();
    assert!(matches!(err, SessionError::Quiz(QuizError::Completed)));
}

#[tokio::test]
async fn practice_answers_track_score_and_practice_mode() {
    let (services, _generator) = build(false);
    let spelling = services.spelling();
    let progress = services.progress();
    let grade = Grade::new(1).unwrap();
    let mut score = Score::default();

    let word = spelling.next_practice_word(grade).await.unwrap();
    let first = spelling
        .answer_practice(grade, &word, word.word(), &mut score)
        .await;
    assert!(first.correct);
    let second = spelling
        .answer_practice(grade, &word, "zzz", &mut score)
        .await;
    assert!(!second.correct);

    assert_eq!(score, Score { current: 1, total: 2, streak: 0 });

    let record = progress.get_grade_progress(grade).await;
    assert_eq!(record.practice.total_attempts(), 2);
    assert_eq!(record.practice.correct_attempts(), 1);
    assert!(record.practice.correct_words().contains(word.word()));
    assert!(record.practice.incorrect_words().contains(word.word()));
    assert_eq!(record.quiz.total_attempts(), 0);
    assert_eq!(progress.get_total_words_learned().await, 1);
}

#[tokio::test]
async fn generation_failure_surfaces_to_caller() {
    let (services, _generator) = build(true);
    let grade = Grade::new(2).unwrap();

    let err = services.spelling().start_quiz(grade).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Generation(GenerationError::Generator(_))
    ));
    assert_eq!(services.progress().current_grade().await, None);
}
