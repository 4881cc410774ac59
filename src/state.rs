use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Everything remembered about a target between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub fingerprint: String,
    pub last_checked: DateTime<Utc>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
}

/// The persisted id → state mapping. Loaded once at run start, rewritten
/// whole at run end. Saving goes through a sibling temp file plus rename so
/// an interrupted run leaves the previous file untouched rather than a
/// truncated one.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    states: HashMap<String, TargetState>,
}

impl StateStore {
    /// A missing file is a first run: empty map, no error.
    pub fn load(path: &Path) -> Result<Self> {
        let states = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            states,
        })
    }

    pub fn get(&self, id: &str) -> Option<&TargetState> {
        self.states.get(id)
    }

    pub fn insert(&mut self, id: &str, state: TargetState) {
        self.states.insert(id.to_string(), state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.states)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn sample_state(fingerprint: &str) -> TargetState {
        TargetState {
            fingerprint: fingerprint.to_string(),
            last_checked: Utc::now(),
            last_price: Some(Decimal::from_str("99.00").unwrap()),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::load(&dir.path().join("state.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StateStore::load(&path).unwrap();
        store.insert("shop", sample_state("abc123"));
        store.insert("landing", TargetState {
            fingerprint: "def456".to_string(),
            last_checked: Utc::now(),
            last_price: None,
        });
        store.save().unwrap();

        let reloaded = StateStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("shop"), store.get("shop"));
        assert_eq!(reloaded.get("landing"), store.get("landing"));
        assert!(reloaded.get("unknown").is_none());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StateStore::load(&path).unwrap();
        store.insert("shop", sample_state("abc123"));
        store.save().unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("state.tmp").exists());
    }

    #[test]
    fn test_insert_overwrites_per_id_slot() {
        let dir = TempDir::new().unwrap();
        let mut store = StateStore::load(&dir.path().join("state.json")).unwrap();

        store.insert("shop", sample_state("old"));
        store.insert("shop", sample_state("new"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("shop").unwrap().fingerprint, "new");
    }

    #[test]
    fn test_missing_last_price_deserializes_as_none() {
        let state: TargetState = serde_json::from_str(
            r#"{"fingerprint": "abc", "last_checked": "2026-08-04T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(state.last_price.is_none());
    }
}
