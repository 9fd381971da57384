mod grade;
mod progress;
mod quiz;
mod word;

pub use grade::{Grade, GradeError};
pub use progress::{GradeProgress, ProgressDelta, ProgressDocument, ProgressError, ProgressRecord};
pub use quiz::{QUIZ_LENGTH, QuizAnswer, QuizError, QuizSession, Score};
pub use word::{Difficulty, GameMode, ParseModeError, Word, is_correct_spelling};
