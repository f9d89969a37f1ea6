//! Cache-check contract for generated content.
//!
//! The orchestrator consults a [`ContentCache`] before invoking any
//! provider and stores fresh results afterwards. The persistence layer
//! implements this trait over its own storage; [`MemoryCache`] serves tests
//! and single-process use. This trait is also the hook where a caller can
//! add at-most-once semantics for concurrent identical requests (e.g. an
//! "already generating" marker).

use crate::orchestrator::SummaryResult;
use crate::parse::{NotesResult, QuizQuestion};
use crate::provider::ContentType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Identity of one cacheable generation: `variant` carries the question
/// count for quizzes and the notes format for notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub video_id: String,
    pub content_type: ContentType,
    pub variant: String,
}

impl CacheKey {
    pub fn new(
        video_id: impl Into<String>,
        content_type: ContentType,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            content_type,
            variant: variant.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CachedContent {
    Summary(SummaryResult),
    Quiz(Vec<QuizQuestion>),
    Notes(NotesResult),
}

pub trait ContentCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<CachedContent>;
    fn put(&self, key: CacheKey, value: CachedContent);
}

/// Cache that never hits; every call regenerates.
pub struct NoopCache;

impl ContentCache for NoopCache {
    fn get(&self, _key: &CacheKey) -> Option<CachedContent> {
        None
    }

    fn put(&self, _key: CacheKey, _value: CachedContent) {}
}

/// Process-local cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CachedContent>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CachedContent> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn put(&self, key: CacheKey, value: CachedContent) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, value);
        }
    }
}
