use std::collections::BTreeMap;
use std::sync::Arc;

use spelling_core::model::{GameMode, Grade, GradeProgress, ProgressDelta, ProgressDocument};
use storage::repository::{KeyValueStore, StorageKey};
use tracing::{debug, warn};

use crate::Clock;
use crate::error::ProgressStoreError;

/// Durable per-grade progress tracking.
///
/// Every operation that touches storage recovers at its own boundary: faults
/// are logged and turned into an empty document, a zero value, `None`, or
/// `false`. Updates are read-modify-write without a lock, so two concurrent
/// updates of the same grade and mode race and the later write wins.
#[derive(Clone)]
pub struct ProgressStore {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    /// The full progress document, or an empty one if nothing is stored or the
    /// stored document cannot be read.
    pub async fn get_all(&self) -> ProgressDocument {
        match self.load().await {
            Ok(doc) => doc,
            Err(err) => {
                warn!(error = %err, "failed to load progress, using empty document");
                ProgressDocument::new()
            }
        }
    }

    /// Stored progress for `grade`, or a zero record for both modes.
    ///
    /// The zero record is not persisted until the first update.
    pub async fn get_grade_progress(&self, grade: Grade) -> GradeProgress {
        self.get_all()
            .await
            .grade(grade)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge `delta` into the record for `(grade, mode)` and persist the whole
    /// document with a single write.
    ///
    /// Returns `false` when the delta is inconsistent or storage fails.
    pub async fn update_progress(&self, grade: Grade, mode: GameMode, delta: &ProgressDelta) -> bool {
        match self.try_update(grade, mode, delta).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%grade, %mode, error = %err, "failed to update progress");
                false
            }
        }
    }

    /// Replace `grade` with the zero record, leaving other grades untouched.
    pub async fn reset_grade_progress(&self, grade: Grade) -> bool {
        match self.try_reset_grade(grade).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%grade, error = %err, "failed to reset grade progress");
                false
            }
        }
    }

    /// Remove the progress document along with the current grade and the
    /// last-played stamp.
    pub async fn reset_all(&self) -> bool {
        match self.store.remove_many(&StorageKey::ALL).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to reset all progress");
                false
            }
        }
    }

    /// Percentage of correct attempts in `[0, 100]`; `0` with no attempts.
    pub async fn get_accuracy(&self, grade: Grade, mode: GameMode) -> f64 {
        self.get_grade_progress(grade).await.mode(mode).accuracy()
    }

    /// Sum of correct-word counts over every grade and both modes.
    ///
    /// A word correct in both modes, or in two grades, counts each time.
    pub async fn get_total_words_learned(&self) -> usize {
        self.get_all().await.total_words_learned()
    }

    pub async fn current_grade(&self) -> Option<Grade> {
        let raw = match self.store.get(StorageKey::CurrentGrade).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read current grade");
                return None;
            }
        };
        match raw.parse::<Grade>() {
            Ok(grade) => Some(grade),
            Err(err) => {
                warn!(raw = %raw, error = %err, "ignoring malformed current grade");
                None
            }
        }
    }

    pub async fn set_current_grade(&self, grade: Grade) -> bool {
        match self
            .store
            .set(StorageKey::CurrentGrade, &grade.to_string())
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(%grade, error = %err, "failed to set current grade");
                false
            }
        }
    }

    /// Last played time in epoch milliseconds.
    pub async fn last_played(&self) -> Option<i64> {
        let raw = match self.store.get(StorageKey::LastPlayed).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read last played timestamp");
                return None;
            }
        };
        match raw.trim().parse::<i64>() {
            Ok(millis) => Some(millis),
            Err(err) => {
                warn!(raw = %raw, error = %err, "ignoring malformed last played timestamp");
                None
            }
        }
    }

    /// Stamp the last played time with the store's clock.
    pub async fn touch_last_played(&self) -> bool {
        let millis = self.clock.now_millis();
        match self
            .store
            .set(StorageKey::LastPlayed, &millis.to_string())
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to update last played timestamp");
                false
            }
        }
    }

    async fn load(&self) -> Result<ProgressDocument, ProgressStoreError> {
        let Some(raw) = self.store.get(StorageKey::Progress).await? else {
            return Ok(ProgressDocument::new());
        };
        decode_document(&raw)
    }

    /// Load for a write path.
    ///
    /// A malformed document is replaced by an empty one, but a failed read
    /// aborts so that an unreadable document is never overwritten.
    async fn load_for_write(&self) -> Result<ProgressDocument, ProgressStoreError> {
        match self.load().await {
            Ok(doc) => Ok(doc),
            Err(ProgressStoreError::Malformed(err)) => {
                warn!(error = %err, "discarding malformed progress document");
                Ok(ProgressDocument::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn save(&self, doc: &ProgressDocument) -> Result<(), ProgressStoreError> {
        let raw = serde_json::to_string(doc)?;
        self.store.set(StorageKey::Progress, &raw).await?;
        Ok(())
    }

    async fn try_update(
        &self,
        grade: Grade,
        mode: GameMode,
        delta: &ProgressDelta,
    ) -> Result<(), ProgressStoreError> {
        delta.validate()?;
        let mut doc = self.load_for_write().await?;
        doc.grade_mut(grade).mode_mut(mode).apply(delta)?;
        self.save(&doc).await?;
        debug!(
            %grade,
            %mode,
            total = delta.total_attempts,
            correct = delta.correct_attempts,
            "progress updated"
        );
        Ok(())
    }

    async fn try_reset_grade(&self, grade: Grade) -> Result<(), ProgressStoreError> {
        let mut doc = self.load_for_write().await?;
        doc.reset_grade(grade);
        self.save(&doc).await
    }
}

/// Decode the stored document entry by entry.
///
/// Only a document that is not a JSON object counts as malformed. Entries
/// whose grade key or record does not decode are logged and dropped so the
/// remaining grades survive the next write.
fn decode_document(raw: &str) -> Result<ProgressDocument, ProgressStoreError> {
    let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;
    let mut doc = ProgressDocument::new();
    for (key, value) in entries {
        let grade = match key.parse::<Grade>() {
            Ok(grade) => grade,
            Err(err) => {
                warn!(key = %key, error = %err, "skipping progress entry with invalid grade");
                continue;
            }
        };
        match serde_json::from_value::<GradeProgress>(value) {
            Ok(progress) => {
                doc.insert(grade, progress);
            }
            Err(err) => {
                warn!(%grade, error = %err, "skipping malformed progress entry");
            }
        }
    }
    Ok(doc)
}
