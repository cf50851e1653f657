//! Process-lifetime answer cache shared by both fields.
//!
//! Entries are never evicted; growth is bounded by the number of distinct
//! queries typed during a session.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::Query;

/// `kind::region::text`, with region and text lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_query(query: &Query) -> Self {
        Self(format!(
            "{}::{}::{}",
            query.kind.as_str(),
            query.region.to_lowercase(),
            query.text.to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct SuggestionCache {
    entries: Mutex<HashMap<CacheKey, Vec<String>>>,
    max_items: usize,
}

impl SuggestionCache {
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_items,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        self.entries.lock().get(key).cloned()
    }

    /// Store a genuine answer, trimmed to the item cap
    pub fn insert(&self, key: CacheKey, mut items: Vec<String>) {
        items.truncate(self.max_items);
        self.entries.lock().insert(key, items);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
