//! In-memory region/place index.
//!
//! Matching is a case-insensitive substring test on pre-lowered copies of
//! each field, so lookups never allocate per entry.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::types::{IndexError, LocationEntry};

/// Number of entries a lookup returns unless told otherwise
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct LocationFile {
    cities: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: LocationEntry,
    name_lower: String,
    region_lower: String,
}

/// Read-only lookup over a flat collection of (name, region) pairs
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    entries: Vec<IndexedEntry>,
}

impl LocationIndex {
    pub fn new(entries: Vec<LocationEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| IndexedEntry {
                name_lower: entry.name.to_lowercase(),
                region_lower: entry.region.to_lowercase(),
                entry,
            })
            .collect();
        Self { entries }
    }

    /// Parse `{ "cities": [{ "name": .., "state": .. }, ..] }`
    pub fn from_json_str(json: &str) -> Result<Self, IndexError> {
        let file: LocationFile = serde_json::from_str(json)?;
        let cities = match file.cities {
            Some(value @ serde_json::Value::Array(_)) => value,
            Some(_) => {
                return Err(IndexError::InvalidFormat("\"cities\" is not an array".to_string()))
            }
            None => {
                return Err(IndexError::InvalidFormat("missing \"cities\" field".to_string()))
            }
        };
        let entries: Vec<LocationEntry> = serde_json::from_value(cities)?;
        Ok(Self::new(entries))
    }

    /// Load the index from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let raw = std::fs::read_to_string(path)?;
        let index = Self::from_json_str(&raw)?;
        tracing::info!("Loaded {} locations from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct regions containing `query`, in first-seen order.
    pub fn list_regions(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.to_lowercase();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for item in &self.entries {
            if out.len() >= limit {
                break;
            }
            if !seen.insert(item.entry.region.as_str()) {
                continue;
            }
            if item.region_lower.contains(&needle) {
                out.push(item.entry.region.clone());
            }
        }

        out
    }

    /// Distinct place names in `region` containing `query`.
    ///
    /// `region` must match exactly (ignoring case). An empty region yields an
    /// empty list.
    pub fn list_places(&self, region: &str, query: &str, limit: usize) -> Vec<String> {
        if region.is_empty() {
            return Vec::new();
        }

        let region = region.to_lowercase();
        let needle = query.to_lowercase();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for item in &self.entries {
            if out.len() >= limit {
                break;
            }
            if item.region_lower != region || !item.name_lower.contains(&needle) {
                continue;
            }
            if seen.insert(item.entry.name.as_str()) {
                out.push(item.entry.name.clone());
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> LocationIndex {
        LocationIndex::new(vec![
            LocationEntry::new("Mumbai", "Maharashtra"),
            LocationEntry::new("Pune", "Maharashtra"),
            LocationEntry::new("Bhopal", "Madhya Pradesh"),
            LocationEntry::new("Indore", "Madhya Pradesh"),
            LocationEntry::new("Pune", "Maharashtra"),
            LocationEntry::new("Nagpur", "Maharashtra"),
            LocationEntry::new("Chennai", "Tamil Nadu"),
        ])
    }

    #[test]
    fn test_regions_substring_not_prefix() {
        let index = fixture();
        assert_eq!(index.list_regions("mah", DEFAULT_LIMIT), vec!["Maharashtra"]);
        assert_eq!(index.list_regions("h", DEFAULT_LIMIT), vec!["Maharashtra", "Madhya Pradesh"]);
        assert_eq!(index.list_regions("ADU", DEFAULT_LIMIT), vec!["Tamil Nadu"]);
    }

    #[test]
    fn test_regions_first_seen_order_and_distinct() {
        let index = fixture();
        assert_eq!(
            index.list_regions("", DEFAULT_LIMIT),
            vec!["Maharashtra", "Madhya Pradesh", "Tamil Nadu"]
        );
    }

    #[test]
    fn test_regions_truncated() {
        let index = fixture();
        assert_eq!(index.list_regions("a", 2), vec!["Maharashtra", "Madhya Pradesh"]);
        assert!(index.list_regions("a", 0).is_empty());
    }

    #[test]
    fn test_places_dedup_by_name() {
        let index = fixture();
        assert_eq!(index.list_places("Maharashtra", "pu", DEFAULT_LIMIT), vec!["Pune", "Nagpur"]);
    }

    #[test]
    fn test_places_region_is_exact_and_case_insensitive() {
        let index = fixture();
        assert_eq!(
            index.list_places("madhya pradesh", "o", DEFAULT_LIMIT),
            vec!["Bhopal", "Indore"]
        );
        assert!(index.list_places("Madhya", "o", DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_places_empty_region_is_empty() {
        let index = fixture();
        for query in ["", "a", "Pune", "anything"] {
            assert!(index.list_places("", query, DEFAULT_LIMIT).is_empty());
        }
    }

    #[test]
    fn test_from_json_str() {
        let index = LocationIndex::from_json_str(
            r#"{"cities":[{"id":"1","name":"Surat","state":"Gujarat"}]}"#,
        )
        .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.list_places("gujarat", "sur", DEFAULT_LIMIT), vec!["Surat"]);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        let err = LocationIndex::from_json_str(r#"{"cities":{"name":"x"}}"#).unwrap_err();
        assert!(matches!(err, IndexError::InvalidFormat(_)));

        let err = LocationIndex::from_json_str(r#"{"towns":[]}"#).unwrap_err();
        assert!(matches!(err, IndexError::InvalidFormat(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        std::fs::write(
            &path,
            r#"{"cities":[{"name":"Kochi","state":"Kerala"},{"name":"Thrissur","state":"Kerala"}]}"#,
        )
        .unwrap();

        let index = LocationIndex::load(&path).unwrap();
        assert_eq!(index.list_regions("ker", DEFAULT_LIMIT), vec!["Kerala"]);
        assert!(matches!(
            LocationIndex::load(&dir.path().join("missing.json")),
            Err(IndexError::Io(_))
        ));
    }
}
