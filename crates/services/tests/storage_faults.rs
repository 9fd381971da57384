use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use services::{Clock, ProgressStore};
use spelling_core::model::{GameMode, Grade, ProgressDelta};
use spelling_core::time::fixed_now;
use storage::repository::{InMemoryStore, KeyValueStore, StorageError, StorageKey};

/// Wraps an in-memory store and fails reads or writes on demand.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk unavailable".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove_many(&self, keys: &[StorageKey]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.remove_many(keys).await
    }
}

fn setup() -> (ProgressStore, Arc<FlakyStore>) {
    let kv = Arc::new(FlakyStore::default());
    let store = ProgressStore::new(Clock::fixed(fixed_now()), kv.clone());
    (store, kv)
}

#[tokio::test]
async fn write_failures_return_false() {
    let (store, kv) = setup();
    let grade = Grade::new(2).unwrap();
    kv.fail_writes.store(true, Ordering::SeqCst);

    let delta = ProgressDelta::attempt("cat", true);
    assert!(!store.update_progress(grade, GameMode::Quiz, &delta).await);
    assert!(!store.reset_grade_progress(grade).await);
    assert!(!store.reset_all().await);
    assert!(!store.set_current_grade(grade).await);
    assert!(!store.touch_last_played().await);

    kv.fail_writes.store(false, Ordering::SeqCst);
    assert!(store.get_all().await.is_empty());
}

#[tokio::test]
async fn read_failures_fall_back_to_defaults() {
    let (store, kv) = setup();
    let grade = Grade::new(4).unwrap();
    let delta = ProgressDelta::attempt("castle", true);
    assert!(store.update_progress(grade, GameMode::Practice, &delta).await);
    assert!(store.set_current_grade(grade).await);

    kv.fail_reads.store(true, Ordering::SeqCst);
    assert!(store.get_all().await.is_empty());
    assert_eq!(store.get_total_words_learned().await, 0);
    assert_eq!(store.get_accuracy(grade, GameMode::Practice).await, 0.0);
    assert_eq!(store.current_grade().await, None);
    assert_eq!(store.last_played().await, None);
}

#[tokio::test]
async fn failed_read_never_overwrites_stored_progress() {
    let (store, kv) = setup();
    let grade = Grade::new(1).unwrap();
    let delta = ProgressDelta::attempt("sun", true);
    assert!(store.update_progress(grade, GameMode::Quiz, &delta).await);

    kv.fail_reads.store(true, Ordering::SeqCst);
    assert!(!store.update_progress(grade, GameMode::Quiz, &delta).await);
    assert!(!store.reset_grade_progress(grade).await);

    kv.fail_reads.store(false, Ordering::SeqCst);
    let record = store.get_grade_progress(grade).await.quiz;
    assert_eq!(record.total_attempts(), 1);
    assert_eq!(store.get_total_words_learned().await, 1);
}
