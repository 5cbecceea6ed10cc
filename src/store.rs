//! Local persistence: a JSON object of named values kept in one file.
//!
//! Reads are forgiving: a value that no longer decodes into the requested
//! type is logged and treated as missing, so callers fall back to defaults.
//! Writes go to a sibling temp file which is then renamed over the target.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Well-known keys.
pub mod keys {
    pub const APP_DATA: &str = "milbase_data";
    pub const MEMOS: &str = "milbase_memos";
    pub const GAME_STATS: &str = "milbase_game_stats";
    pub const DAILY_GAMES: &str = "milbase_daily_games";
    pub const BEST_2048: &str = "milbase_2048_best";
    pub const VACATION: &str = "milbase_vacation_data";
    pub const CHECKLIST: &str = "milbase_checklist_data";
    pub const TRAVEL_PLANS: &str = "milbase_travel_plans";
    pub const TIP_RATINGS: &str = "milbase_tip_ratings";
    pub const TIP_VIEWS: &str = "milbase_tip_views";
    pub const LAST_CALCULATION: &str = "dischargeCalculatorData";
}

pub const STORE_FILE: &str = "milbase.json";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {0} is not a JSON object")]
    Corrupt(PathBuf),
    #[error("{path} does not hold a JSON {expected}")]
    WrongShape { path: PathBuf, expected: &'static str },
    #[error("imported {key} does not decode: {source}")]
    Rejected {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl Store {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map.into_iter().collect(),
                Ok(_) | Err(_) => return Err(StoreError::Corrupt(path)),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Store { path, entries })
    }

    /// Open `<dir>/milbase.json`, creating `dir` if needed.
    pub fn open_in_dir<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        Store::open(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decode the value under `key`. Missing or undecodable values yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "stored value could not be decoded; using default");
                None
            }
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store `value` under `key` and flush to disk.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    /// Remove `key`; returns whether it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.flush()?;
        }
        Ok(existed)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.flush()
    }

    /// Write the document under `key` to `dest` as pretty-printed JSON.
    ///
    /// The decoded value is written, so defaults fill whatever was never stored.
    pub fn export_to<T, P>(&self, key: &str, dest: P) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        P: AsRef<Path>,
    {
        let dest = dest.as_ref();
        write_json(dest, &self.get_or_default::<T>(key))?;
        debug!(key, dest = %dest.display(), "exported document");
        Ok(())
    }

    /// Deep-merge the JSON object at `src` into the document under `key`.
    ///
    /// The merged result must decode as `T`; otherwise the store is left as it
    /// was and `StoreError::Rejected` is returned.
    pub fn import_from<T, P>(&mut self, key: &'static str, src: P) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let src = src.as_ref();
        let incoming = read_json(src)?;
        if !incoming.is_object() {
            return Err(StoreError::WrongShape { path: src.to_path_buf(), expected: "object" });
        }
        let mut candidate = self.entries.get(key).cloned().unwrap_or_else(|| Value::Object(Map::new()));
        merge_json(&mut candidate, incoming);
        let decoded = T::deserialize(&candidate).map_err(|source| StoreError::Rejected { key, source })?;
        self.entries.insert(key.to_string(), candidate);
        self.flush()?;
        debug!(key, src = %src.display(), "imported document");
        Ok(decoded)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let map: Map<String, Value> = self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "store flushed");
        Ok(())
    }
}

/// Parse the JSON file at `src`.
pub fn read_json(src: &Path) -> Result<Value, StoreError> {
    let bytes = fs::read(src).map_err(|e| StoreError::io(src, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write `value` to `dest` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(dest: &Path, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(dest, text).map_err(|e| StoreError::io(dest, e))
}

/// Objects merge key by key, recursively; anything else replaces the target.
pub fn merge_json(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                let nested = value.is_object() && dst.get(&key).is_some_and(Value::is_object);
                if !nested {
                    dst.insert(key, value);
                } else if let Some(existing) = dst.get_mut(&key) {
                    merge_json(existing, value);
                }
            }
        }
        (target, source) => *target = source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn missing_file_starts_empty_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        assert!(store.get::<Sample>("x").is_none());
        store.set("x", &Sample { name: "a".into(), count: 2 }).unwrap();

        let reopened = Store::open_in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get::<Sample>("x"), Some(Sample { name: "a".into(), count: 2 }));
        assert!(!dir.path().join("milbase.json.tmp").exists());
    }

    #[test]
    fn undecodable_value_falls_back() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store.set("x", &json!({"name": 5})).unwrap();
        assert_eq!(store.get::<Sample>("x"), None);
        assert_eq!(store.get_or_default::<Sample>("x"), Sample::default());
        assert_eq!(store.get_or("missing", 7u32), 7);
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(Store::open(&path), Err(StoreError::Corrupt(_))));
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Store::open(&path), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store.set("a", &1).unwrap();
        store.set("b", &2).unwrap();
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["b"]);
        store.clear().unwrap();
        assert!(!Store::open(store.path()).unwrap().contains("b"));
    }

    #[test]
    fn merge_is_deep_for_objects_only() {
        let mut target = json!({"user": {"name": "kim", "rank": "pvt"}, "tags": [1, 2]});
        merge_json(&mut target, json!({"user": {"rank": "cpl"}, "tags": [3], "extra": true}));
        assert_eq!(target, json!({"user": {"name": "kim", "rank": "cpl"}, "tags": [3], "extra": true}));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Doc {
        user: Sample,
        theme: String,
    }

    impl Default for Doc {
        fn default() -> Self {
            Doc { user: Sample { name: "soldier".into(), count: 0 }, theme: "dark".into() }
        }
    }

    #[test]
    fn export_then_import_merges() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store.set("doc", &json!({"user": {"name": "kim", "count": 1}})).unwrap();
        let out = dir.path().join("export.json");
        store.export_to::<Doc, _>("doc", &out).unwrap();

        fs::write(&out, r#"{"user": {"count": 2}, "theme": "light"}"#).unwrap();
        let doc: Doc = store.import_from("doc", &out).unwrap();
        assert_eq!(doc, Doc { user: Sample { name: "kim".into(), count: 2 }, theme: "light".into() });
        assert_eq!(store.raw("doc"), Some(&json!({"user": {"name": "kim", "count": 2}, "theme": "light"})));
    }

    #[test]
    fn export_of_fresh_store_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let store = Store::open_in_dir(dir.path()).unwrap();
        let out = dir.path().join("export.json");
        store.export_to::<Doc, _>("doc", &out).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, json!({"user": {"name": "soldier", "count": 0}, "theme": "dark"}));
    }

    #[test]
    fn malformed_import_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store.set("doc", &json!({"user": {"name": "kim"}})).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{oops").unwrap();
        assert!(matches!(store.import_from::<Doc, _>("doc", &bad), Err(StoreError::Json(_))));
        fs::write(&bad, "42").unwrap();
        assert!(matches!(store.import_from::<Doc, _>("doc", &bad), Err(StoreError::WrongShape { .. })));
        assert_eq!(store.raw("doc"), Some(&json!({"user": {"name": "kim"}})));
    }

    #[test]
    fn mistyped_import_is_rejected_before_merging() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store.set("doc", &json!({"user": {"name": "kim", "count": 3}})).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"user": {"count": "three"}}"#).unwrap();
        assert!(matches!(
            store.import_from::<Doc, _>("doc", &bad),
            Err(StoreError::Rejected { key: "doc", .. })
        ));
        let reopened = Store::open(store.path()).unwrap();
        assert_eq!(reopened.raw("doc"), Some(&json!({"user": {"name": "kim", "count": 3}})));
    }
}
