//! Memoization of curated answer sets.
//!
//! Curating an actor costs one provider call per credit, so repeated rounds
//! for the same actor are served from a cache keyed by normalized name.

use crate::answer_set::AnswerSet;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Default number of actors kept by `InMemoryCurationCache`
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

pub trait CurationCache: Send + Sync {
    fn get(&self, actor_name: &str) -> Option<AnswerSet>;

    fn put(&self, answer_set: AnswerSet);

    /// Drop one actor, e.g. after the catalog sweep refreshed them
    fn invalidate(&self, actor_name: &str);

    fn clear(&self);
}

fn cache_key(actor_name: &str) -> String {
    actor_name.trim().to_lowercase()
}

/// Bounded in-process cache; the oldest entry is evicted when full.
pub struct InMemoryCurationCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, AnswerSet>,
    order: VecDeque<String>,
}

impl InMemoryCurationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryCurationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CurationCache for InMemoryCurationCache {
    fn get(&self, actor_name: &str) -> Option<AnswerSet> {
        self.lock().entries.get(&cache_key(actor_name)).cloned()
    }

    fn put(&self, answer_set: AnswerSet) {
        let key = cache_key(answer_set.actor_name());
        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), answer_set).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn invalidate(&self, actor_name: &str) {
        let key = cache_key(actor_name);
        let mut inner = self.lock();
        if inner.entries.remove(&key).is_some() {
            inner.order.retain(|k| k != &key);
        }
    }

    fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
