#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod error;
pub mod progress_store;
pub mod spelling_service;
pub mod word_supplier;

pub use spelling_core::Clock;

pub use ai::{AnthropicWordGenerator, WordGeneratorConfig};
pub use app_services::AppServices;
pub use error::{AppServicesError, GenerationError, ProgressStoreError, SessionError};
pub use progress_store::ProgressStore;
pub use spelling_service::{PracticeAnswer, QuizAnswerResult, SpellingService};
pub use word_supplier::{WordGenerator, WordSupplier};
