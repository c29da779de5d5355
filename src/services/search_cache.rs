//! In-process search result caches
//!
//! Keyed by the md5 of the normalized query so "Jane Doe" and " jane  doe"
//! share an entry. Nothing here outlives the process.

use std::collections::{HashMap, HashSet, VecDeque};

use super::catalog::CandidateRecord;
use super::text_utils::normalize_key;

pub const DEFAULT_CAPACITY: usize = 1000;

pub fn cache_key(query: &str) -> String {
    format!("{:x}", md5::compute(normalize_key(query).as_bytes()))
}

/// Positive results (bounded, approximate FIFO) plus queries known to
/// return nothing.
pub struct SearchCache {
    capacity: usize,
    entries: HashMap<String, Vec<CandidateRecord>>,
    order: VecDeque<String>,
    empty: HashSet<String>,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            empty: HashSet::new(),
        }
    }

    pub fn get(&self, query: &str) -> Option<&[CandidateRecord]> {
        self.entries.get(&cache_key(query)).map(Vec::as_slice)
    }

    /// Store results for a query. A query is written at most once; later
    /// writes for the same key are ignored.
    pub fn insert(&mut self, query: &str, candidates: Vec<CandidateRecord>) {
        let key = cache_key(query);
        if self.entries.contains_key(&key) {
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, candidates);
    }

    /// Drop the oldest tenth of the entries (at least one).
    fn evict_oldest(&mut self) {
        let count = (self.capacity / 10).max(1);
        for _ in 0..count {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&key);
        }
    }

    pub fn is_known_empty(&self, query: &str) -> bool {
        self.empty.contains(&cache_key(query))
    }

    pub fn mark_empty(&mut self, query: &str) {
        self.empty.insert(cache_key(query));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn empty_len(&self) -> usize {
        self.empty.len()
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str) -> CandidateRecord {
        CandidateRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_is_normalized() {
        assert_eq!(cache_key("Jane Doe"), cache_key("  jane   DOE "));
        assert_ne!(cache_key("Jane Doe"), cache_key("Jane Doer"));
        assert_eq!(cache_key("x").len(), 32);
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = SearchCache::new(10);
        cache.insert("Jane Doe", vec![scene("1")]);
        assert_eq!(cache.get("jane doe").map(|c| c.len()), Some(1));
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_first_write_wins() {
        let mut cache = SearchCache::new(10);
        cache.insert("q", vec![scene("1")]);
        cache.insert("Q", vec![scene("2"), scene("3")]);
        assert_eq!(cache.get("q").map(|c| c[0].id.as_str()), Some("1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overflow_evicts_oldest_tenth() {
        let mut cache = SearchCache::new(20);
        for i in 0..20 {
            cache.insert(&format!("query {i}"), vec![scene(&i.to_string())]);
        }
        assert_eq!(cache.len(), 20);

        cache.insert("query 20", vec![]);
        assert_eq!(cache.len(), 19);
        assert!(cache.get("query 0").is_none());
        assert!(cache.get("query 1").is_none());
        assert!(cache.get("query 2").is_some());
        assert!(cache.get("query 20").is_some());
    }

    #[test]
    fn test_small_capacity_evicts_one() {
        let mut cache = SearchCache::new(3);
        for q in ["a1", "a2", "a3", "a4"] {
            cache.insert(q, vec![]);
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.get("a1").is_none());
    }

    #[test]
    fn test_negative_cache() {
        let mut cache = SearchCache::default();
        assert!(!cache.is_known_empty("nothing here"));
        cache.mark_empty("Nothing Here");
        assert!(cache.is_known_empty("nothing here"));
        assert_eq!(cache.empty_len(), 1);
        assert!(cache.is_empty());
    }
}
