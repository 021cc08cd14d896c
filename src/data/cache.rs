use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{self, LoadError, LoadOptions};
use super::model::ProjectTable;

// ---------------------------------------------------------------------------
// Source cache
// ---------------------------------------------------------------------------

/// Modification signature of a source file.  A cache entry is reused only
/// while the signature matches, so editing or replacing the file forces a
/// reparse on the next load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceSignature {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceSignature {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|e| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(SourceSignature {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CacheEntry {
    signature: SourceSignature,
    options: LoadOptions,
    table: Arc<ProjectTable>,
}

/// Parse cache keyed by source path.  Repeated loads of an unchanged source
/// return the previously built table without touching the parser; the table
/// is shared behind an `Arc` and never mutated after load.
#[derive(Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, reusing the cached table when neither the file's
    /// modification signature nor the load options changed.
    pub fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<Arc<ProjectTable>, LoadError> {
        let signature = SourceSignature::of(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.signature == signature && entry.options == *options {
                log::debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        let table = Arc::new(loader::load_file(path, options)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                signature,
                options: options.clone(),
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Forget one cached source so the next load reparses it.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    /// Forget everything.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_source_returns_shared_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        std::fs::write(&path, "company_name,region\nAcme,Asia\n").unwrap();

        let mut cache = SourceCache::new();
        let options = LoadOptions::default();
        let first = cache.load(&path, &options).unwrap();
        let second = cache.load(&path, &options).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn invalidate_forces_reparse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        std::fs::write(&path, "company_name\nAcme\n").unwrap();

        let mut cache = SourceCache::new();
        let options = LoadOptions::default();
        let first = cache.load(&path, &options).unwrap();
        cache.invalidate(&path);
        let second = cache.load(&path, &options).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn changed_options_bypass_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        std::fs::write(&path, "company_name,host_country\nAcme,China\nBolt,Japan\n").unwrap();

        let mut cache = SourceCache::new();
        let first = cache.load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(first.len(), 2);

        let options = LoadOptions {
            exclusions: vec![crate::data::loader::ExclusionRule::ForbidValue {
                field: "host_country".to_string(),
                value: "China".to_string(),
            }],
            ..LoadOptions::default()
        };
        let second = cache.load(&path, &options).unwrap();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn missing_source_is_unavailable() {
        let mut cache = SourceCache::new();
        let err = cache
            .load(Path::new("/no/such/projects.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }
}
