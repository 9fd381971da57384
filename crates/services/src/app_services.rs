use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::ai::AnthropicWordGenerator;
use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;
use crate::spelling_service::SpellingService;
use crate::word_supplier::{WordGenerator, WordSupplier};

/// Long-lived services built once at startup and handed to consumers.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressStore>,
    words: Arc<WordSupplier>,
    spelling: Arc<SpellingService>,
}

impl AppServices {
    /// Build services over an existing storage backend and word generator.
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage, generator: Arc<dyn WordGenerator>) -> Self {
        let progress = Arc::new(ProgressStore::new(clock, Arc::clone(&storage.kv)));
        let words = Arc::new(WordSupplier::new(generator));
        let spelling = Arc::new(SpellingService::new(
            Arc::clone(&words),
            Arc::clone(&progress),
        ));
        Self {
            progress,
            words,
            spelling,
        }
    }

    /// Build services backed by `SQLite` storage and the environment-configured
    /// word generator.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let generator = AnthropicWordGenerator::from_env();
        if !generator.enabled() {
            tracing::warn!("SPELLING_AI_API_KEY is not set; word generation is disabled");
        }
        Ok(Self::new(clock, &storage, Arc::new(generator)))
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn words(&self) -> Arc<WordSupplier> {
        Arc::clone(&self.words)
    }

    #[must_use]
    pub fn spelling(&self) -> Arc<SpellingService> {
        Arc::clone(&self.spelling)
    }
}
