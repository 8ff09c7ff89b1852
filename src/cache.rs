use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::models::Funko;

/// Per-id cache over the repository. Reads go through `get`, every write
/// path refreshes its entry, and deletes evict. The list operation never
/// touches the cache, so there is nothing to invalidate on writes.
pub struct FunkoCache {
    entries: Mutex<HashMap<i64, Funko>>,
}

impl FunkoCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: i64) -> Option<Funko> {
        let entries = self.entries.lock().unwrap();
        let hit = entries.get(&id).cloned();
        if hit.is_some() {
            crate::metrics::cache_hit();
        } else {
            crate::metrics::cache_miss();
        }
        hit
    }

    pub fn put(&self, funko: &Funko) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(funko.id, funko.clone());
        debug!("cached funko with id {}", funko.id);
    }

    pub fn evict(&self, id: i64) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(&id).is_some() {
            debug!("evicted funko with id {} from cache", id);
        }
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FunkoCache {
    fn default() -> Self {
        Self::new()
    }
}
