use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use spelling_core::model::{Grade, Word};
use tracing::{debug, warn};

use crate::error::GenerationError;

/// External collaborator that produces grade-appropriate words.
#[async_trait]
pub trait WordGenerator: Send + Sync {
    /// Generate about `count` words for `grade`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the words cannot be produced.
    async fn generate(
        &self,
        grade: Grade,
        count: usize,
        description: &str,
    ) -> Result<Vec<Word>, GenerationError>;
}

/// Per-grade word lists, generated on demand and cached for the process lifetime.
///
/// Cache entries are replaced wholesale. Concurrent misses for the same grade
/// are not deduplicated; whichever generation finishes last wins.
pub struct WordSupplier {
    generator: Arc<dyn WordGenerator>,
    cache: Mutex<HashMap<Grade, Vec<Word>>>,
}

impl WordSupplier {
    #[must_use]
    pub fn new(generator: Arc<dyn WordGenerator>) -> Self {
        Self {
            generator,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cached words for `grade`, generating a fresh list when the cache holds
    /// fewer than the grade's minimum.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the generator fails or returns no words.
    /// The cache is left unchanged in that case.
    pub async fn get_words_for_grade(&self, grade: Grade) -> Result<Vec<Word>, GenerationError> {
        if let Some(words) = self.cached(grade) {
            debug!(%grade, count = words.len(), "word cache hit");
            return Ok(words);
        }
        debug!(%grade, "word cache miss");
        self.generate_and_cache(grade).await
    }

    /// A uniformly random word from the grade's list.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if no words are available.
    pub async fn get_random_word_for_grade(&self, grade: Grade) -> Result<Word, GenerationError> {
        let words = self.get_words_for_grade(grade).await?;
        words
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(GenerationError::NoWords)
    }

    /// Drop the cached list for `grade` and generate a new one.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if generation fails; the grade is then left
    /// uncached.
    pub async fn refresh_words_for_grade(
        &self,
        grade: Grade,
    ) -> Result<Vec<Word>, GenerationError> {
        self.lock().remove(&grade);
        debug!(%grade, "word cache refresh");
        self.generate_and_cache(grade).await
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    fn cached(&self, grade: Grade) -> Option<Vec<Word>> {
        self.lock()
            .get(&grade)
            .filter(|words| words.len() >= grade.min_word_count())
            .cloned()
    }

    async fn generate_and_cache(&self, grade: Grade) -> Result<Vec<Word>, GenerationError> {
        let count = grade.min_word_count();
        let words = match self
            .generator
            .generate(grade, count, grade.description())
            .await
        {
            Ok(words) if words.is_empty() => Err(GenerationError::NoWords),
            other => other,
        }
        .inspect_err(|err| warn!(%grade, error = %err, "word generation failed"))?;
        let words: Vec<Word> = words.into_iter().map(|w| w.with_grade(grade)).collect();

        if words.len() < count {
            debug!(%grade, got = words.len(), wanted = count, "generator returned a short list");
        }
        self.lock().insert(grade, words.clone());
        Ok(words)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Grade, Vec<Word>>> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use spelling_core::model::Difficulty;

    /// Returns `size` words per call, or fails when `size` is zero.
    struct CountingGenerator {
        calls: AtomicUsize,
        requested: Mutex<Vec<usize>>,
        size: Option<usize>,
    }

    impl CountingGenerator {
        fn new(size: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
                size,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WordGenerator for CountingGenerator {
        async fn generate(
            &self,
            grade: Grade,
            count: usize,
            _description: &str,
        ) -> Result<Vec<Word>, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(count);
            let size = self
                .size
                .ok_or_else(|| GenerationError::Generator("offline".into()))?;
            Ok((0..size)
                .map(|i| Word::new(format!("w{call}-{i}"), "", "", Difficulty::Easy, grade))
                .collect())
        }
    }

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap()
    }

    #[tokio::test]
    async fn miss_generates_once_then_hits_cache() {
        let generator = Arc::new(CountingGenerator::new(Some(15)));
        let supplier = WordSupplier::new(generator.clone());

        let first = supplier.get_words_for_grade(grade(3)).await.unwrap();
        let second = supplier.get_words_for_grade(grade(3)).await.unwrap();

        assert_eq!(generator.calls(), 1);
        assert!(generator.requested.lock().unwrap()[0] >= 15);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn short_list_is_returned_but_regenerated_next_time() {
        let generator = Arc::new(CountingGenerator::new(Some(4)));
        let supplier = WordSupplier::new(generator.clone());

        assert_eq!(supplier.get_words_for_grade(grade(1)).await.unwrap().len(), 4);
        supplier.get_words_for_grade(grade(1)).await.unwrap();
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn refresh_always_generates() {
        let generator = Arc::new(CountingGenerator::new(Some(20)));
        let supplier = WordSupplier::new(generator.clone());

        let before = supplier.get_words_for_grade(grade(5)).await.unwrap();
        let after = supplier.refresh_words_for_grade(grade(5)).await.unwrap();

        assert_eq!(generator.calls(), 2);
        assert_ne!(before, after);
        assert_eq!(supplier.get_words_for_grade(grade(5)).await.unwrap(), after);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn empty_result_is_an_error_and_not_cached() {
        let generator = Arc::new(CountingGenerator::new(Some(0)));
        let supplier = WordSupplier::new(generator.clone());

        let err = supplier.get_words_for_grade(grade(2)).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoWords));
        assert!(supplier.cached(grade(2)).is_none());
        assert!(supplier.lock().get(&grade(2)).is_none());
    }

    #[tokio::test]
    async fn failure_keeps_previous_cache_entry() {
        let generator = Arc::new(CountingGenerator::new(None));
        let supplier = WordSupplier::new(generator.clone());
        let seeded: Vec<Word> = (0..12)
            .map(|i| Word::new(format!("s{i}"), "", "", Difficulty::Easy, grade(2)))
            .collect();
        supplier.lock().insert(grade(2), seeded.clone());

        assert_eq!(supplier.get_words_for_grade(grade(2)).await.unwrap(), seeded);
        assert_eq!(generator.calls(), 0);

        let err = supplier.get_random_word_for_grade(grade(1)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Generator(_)));
        assert_eq!(supplier.lock().get(&grade(2)), Some(&seeded));
    }

    #[tokio::test]
    async fn random_word_comes_from_grade_list() {
        let generator = Arc::new(CountingGenerator::new(Some(10)));
        let supplier = WordSupplier::new(generator);
        let words = supplier.get_words_for_grade(grade(1)).await.unwrap();
        let pick = supplier.get_random_word_for_grade(grade(1)).await.unwrap();
        assert!(words.contains(&pick));
    }

    #[tokio::test]
    async fn clear_cache_forces_regeneration() {
        let generator = Arc::new(CountingGenerator::new(Some(18)));
        let supplier = WordSupplier::new(generator.clone());
        supplier.get_words_for_grade(grade(4)).await.unwrap();
        supplier.clear_cache();
        supplier.get_words_for_grade(grade(4)).await.unwrap();
        assert_eq!(generator.calls(), 2);
    }
}
