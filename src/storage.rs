// File: ./src/storage.rs
// Manages the on-disk store of analyses.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to AnalysisRecord or its nested types (Task, CalendarEvent, ...) require
// incrementing ANALYSES_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::{AnalysisRecord, ListPage, ListQuery};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: {version, analyses} wrapper around camelCase records
const ANALYSES_STORAGE_VERSION: u32 = 1;

/// Wrapper struct for the versioned store file
#[derive(Serialize, Deserialize)]
struct AnalysesData {
    #[serde(default)]
    version: u32,
    analyses: Vec<AnalysisRecord>,
}

#[derive(Deserialize)]
struct VersionHeader {
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Clone)]
pub struct AnalysisStore {
    path: PathBuf,
}

impl AnalysisStore {
    pub fn new(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::at(ctx.get_analyses_path()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive advisory lock on a sidecar file.
    /// Not re-entrant: `f` must not call `with_lock` on the same path.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Reads the file without locking. Callers hold the lock.
    fn read_unlocked(&self) -> Result<Vec<AnalysisRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;

        // Bare arrays predate the versioned wrapper.
        if json.trim_start().starts_with('[') {
            log::info!("Migrating {:?} to v{}", self.path, ANALYSES_STORAGE_VERSION);
            let analyses: Vec<AnalysisRecord> = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse legacy store {:?}", self.path))?;
            self.write_unlocked(&analyses)?;
            return Ok(analyses);
        }

        let header: VersionHeader = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {:?}", self.path))?;
        if header.version > ANALYSES_STORAGE_VERSION {
            return Err(anyhow::anyhow!(
                "Store version {} is newer than supported version {}. Please upgrade.",
                header.version,
                ANALYSES_STORAGE_VERSION
            ));
        }
        if header.version == 0 {
            return Err(anyhow::anyhow!("Unknown store version: {}", header.version));
        }

        let data: AnalysesData = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {:?}", self.path))?;
        Ok(data.analyses)
    }

    /// Writes the file without locking. Callers hold the lock.
    fn write_unlocked(&self, analyses: &[AnalysisRecord]) -> Result<()> {
        let data = AnalysesData {
            version: ANALYSES_STORAGE_VERSION,
            analyses: analyses.to_vec(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        Self::atomic_write(&self.path, json)
    }

    /// Read-modify-write under a single lock. The file is rewritten only when `f`
    /// reports a change.
    fn modify<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<AnalysisRecord>) -> Result<(T, bool)>,
    {
        Self::with_lock(&self.path, || {
            let mut analyses = self.read_unlocked()?;
            let (out, changed) = f(&mut analyses)?;
            if changed {
                self.write_unlocked(&analyses)?;
            }
            Ok(out)
        })
    }

    /// Loads every stored record, in file order.
    ///
    /// Errors are never swallowed: a store that cannot be read must not be
    /// overwritten by a subsequent insert with an empty list.
    pub fn load(&self) -> Result<Vec<AnalysisRecord>> {
        Self::with_lock(&self.path, || self.read_unlocked())
    }

    pub fn insert(&self, record: AnalysisRecord) -> Result<()> {
        log::debug!("Storing analysis {}", record.id);
        self.modify(|analyses| {
            analyses.push(record);
            Ok(((), true))
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Replaces the record with the same id. Returns false if there is none.
    pub fn replace(&self, record: AnalysisRecord) -> Result<bool> {
        self.modify(|analyses| match analyses.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok((true, true))
            }
            None => Ok((false, false)),
        })
    }

    /// Applies `f` to the record with the given id under the store lock and
    /// returns the updated record.
    pub fn update<F>(&self, id: &str, f: F) -> Result<Option<AnalysisRecord>>
    where
        F: FnOnce(&mut AnalysisRecord) -> Result<()>,
    {
        self.modify(|analyses| match analyses.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                f(record)?;
                Ok((Some(record.clone()), true))
            }
            None => Ok((None, false)),
        })
    }

    /// Returns whether a record was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.modify(|analyses| {
            let before = analyses.len();
            analyses.retain(|r| r.id != id);
            let removed = analyses.len() != before;
            Ok((removed, removed))
        })
    }

    /// Filtered page of records, newest first.
    pub fn list(&self, query: &ListQuery) -> Result<ListPage> {
        let mut matching: Vec<AnalysisRecord> = self
            .load()?
            .into_iter()
            .filter(|r| query.matches(r))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let analyses = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(ListPage {
            analyses,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalyzerOptions, analyze};
    use crate::context::TestContext;
    use crate::model::{AnalysisInput, ContextType, SourceType};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;

    fn record(text: &str, minutes_after: i64) -> AnalysisRecord {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let input = AnalysisInput::new(text, SourceType::Chat, ContextType::Family);
        let result = analyze(&input, &AnalyzerOptions::default(), now);
        AnalysisRecord::new(input, result, now + Duration::minutes(minutes_after))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_versioned_save_format() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        store.insert(record("Ciao, tutto ok?", 0)).unwrap();

        let json = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], ANALYSES_STORAGE_VERSION);
        assert_eq!(value["analyses"].as_array().unwrap().len(), 1);
        assert!(value["analyses"][0]["input"]["rawText"].is_string());
    }

    #[test]
    fn test_future_version_is_refused_and_file_kept() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        let future = r#"{"version": 99, "analyses": []}"#;
        fs::write(store.path(), future).unwrap();

        assert!(store.load().is_err());
        assert!(store.insert(record("Ciao", 0)).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), future);
    }

    #[test]
    fn test_legacy_array_is_migrated() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        let rec = record("Ci vediamo domani alle 10", 0);
        fs::write(store.path(), serde_json::to_string(&vec![rec.clone()]).unwrap()).unwrap();

        assert_eq!(store.load().unwrap(), vec![rec]);
        let json = fs::read_to_string(store.path()).unwrap();
        assert!(json.contains("\"version\""));
    }

    #[test]
    fn test_replace_and_remove() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        let mut rec = record("Mi mandi il contratto?", 0);
        store.insert(rec.clone()).unwrap();

        rec.input.person_name = Some("Giulia".to_string());
        assert!(store.replace(rec.clone()).unwrap());
        assert_eq!(store.get(&rec.id).unwrap(), Some(rec.clone()));

        assert!(store.remove(&rec.id).unwrap());
        assert!(!store.remove(&rec.id).unwrap());
        assert!(store.get(&rec.id).unwrap().is_none());

        let unknown = record("altro", 1);
        assert!(!store.replace(unknown).unwrap());
    }

    #[test]
    fn test_list_orders_newest_first_and_paginates() {
        let ctx = TestContext::new();
        let store = AnalysisStore::new(&ctx).unwrap();
        for i in 0..5 {
            store.insert(record(&format!("messaggio numero {}", i), i)).unwrap();
        }

        let page = store
            .list(&ListQuery {
                limit: 2,
                offset: 1,
                ..ListQuery::default()
            })
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.analyses.len(), 2);
        assert_eq!(page.analyses[0].input.raw_text, "messaggio numero 3");
        assert_eq!(page.analyses[1].input.raw_text, "messaggio numero 2");
    }

    #[test]
    fn test_concurrent_inserts_are_not_lost() {
        let ctx = TestContext::new();
        let store = Arc::new(AnalysisStore::new(&ctx).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    store.insert(record(&format!("thread {}", i), i)).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.load().unwrap().len(), 8);
    }
}
