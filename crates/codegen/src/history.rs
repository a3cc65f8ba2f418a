use chrono::Utc;
use crudforge_core::{
    ComponentType, CoreError, GenerateHistory, GenerateRequest, HistoryFile, GENERATED_BY,
};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Whole-document persistence for the history file
pub trait HistoryStore {
    /// An absent store reads as an empty document
    fn load(&self) -> Result<HistoryFile, CoreError>;

    fn save(&self, file: &HistoryFile) -> Result<(), CoreError>;
}

/// History persisted as pretty-printed JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<HistoryFile, CoreError> {
        if !self.path.exists() {
            debug!("no history at {}, starting empty", self.path.display());
            return Ok(HistoryFile::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CoreError::file_operation("read history", self.path.display(), e))?;
        serde_json::from_str(&content).map_err(|e| {
            CoreError::history(format!("cannot parse '{}': {}", self.path.display(), e))
        })
    }

    fn save(&self, file: &HistoryFile) -> Result<(), CoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| CoreError::file_operation("create directory", dir.display(), e))?;

        let json = serde_json::to_string_pretty(file)?;
        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| CoreError::file_operation("create temporary file", dir.display(), e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| CoreError::file_operation("write history", self.path.display(), e))?;
        temp.persist(&self.path)
            .map_err(|e| CoreError::file_operation("write history", self.path.display(), e.error))?;
        Ok(())
    }
}

/// In-process store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    file: RefCell<HistoryFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HistoryFile {
        self.file.borrow().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<HistoryFile, CoreError> {
        Ok(self.file.borrow().clone())
    }

    fn save(&self, file: &HistoryFile) -> Result<(), CoreError> {
        *self.file.borrow_mut() = file.clone();
        Ok(())
    }
}

/// Outcome of removing a record's generated files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub removed: Vec<String>,
    /// Listed files that were already gone
    pub missing: Vec<String>,
    pub failed: Vec<String>,
}

impl Removal {
    fn merge(&mut self, other: Removal) {
        self.removed.extend(other.removed);
        self.missing.extend(other.missing);
        self.failed.extend(other.failed);
    }
}

/// Per-module generation records. Every operation is one load-mutate-save
/// transaction against the store.
pub struct HistoryManager<S> {
    store: S,
    /// Root the recorded relative file paths resolve against
    root: PathBuf,
}

impl<S: HistoryStore> HistoryManager<S> {
    pub fn new(store: S, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> Result<HistoryFile, CoreError> {
        self.store.load()
    }

    pub fn save(&self, file: &HistoryFile) -> Result<(), CoreError> {
        self.store.save(file)
    }

    /// Load, apply `f`, save. Nothing is saved when `f` fails.
    pub fn transact<T>(
        &self,
        f: impl FnOnce(&mut HistoryFile) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut file = self.store.load()?;
        let result = f(&mut file)?;
        self.store.save(&file)?;
        Ok(result)
    }

    /// Record `files` for the request's module, replacing any record with the
    /// same `(moduleName, packagePath)`
    pub fn add(
        &self,
        request: &GenerateRequest,
        components: &[ComponentType],
        files: Vec<String>,
    ) -> Result<(), CoreError> {
        let record = GenerateHistory {
            module_name: request.model_name.clone(),
            generated_at: Utc::now(),
            components: components.iter().map(ToString::to_string).collect(),
            model_name: request.model_name.clone(),
            table_name: request.resolved_table_name(),
            package_path: request.package_path.clone(),
            generated_by: GENERATED_BY.to_string(),
            generated_files: files,
        };

        self.transact(|file| {
            match file
                .history
                .iter_mut()
                .find(|existing| existing.matches(&record.module_name, &record.package_path))
            {
                Some(existing) => *existing = record,
                None => file.history.push(record),
            }
            Ok(())
        })?;

        info!("history updated for {}", request.model_name);
        Ok(())
    }

    pub fn get_all(&self) -> Result<Vec<GenerateHistory>, CoreError> {
        Ok(self.store.load()?.history)
    }

    /// First record for `module_name`
    pub fn get_by_module(&self, module_name: &str) -> Result<GenerateHistory, CoreError> {
        self.store
            .load()?
            .history
            .into_iter()
            .find(|h| h.module_name == module_name)
            .ok_or_else(|| no_history(module_name))
    }

    /// Drop the first record for `module_name` and delete the files it lists
    pub fn delete_by_module(&self, module_name: &str) -> Result<Removal, CoreError> {
        self.transact(|file| {
            let index = file
                .history
                .iter()
                .position(|h| h.module_name == module_name)
                .ok_or_else(|| no_history(module_name))?;
            let record = file.history.remove(index);
            Ok(self.remove_files(&record.generated_files))
        })
    }

    /// Delete every listed file, then reset to an empty document
    pub fn clear(&self) -> Result<Removal, CoreError> {
        self.transact(|file| {
            let mut removal = Removal::default();
            for record in &file.history {
                removal.merge(self.remove_files(&record.generated_files));
            }
            *file = HistoryFile::default();
            Ok(removal)
        })
    }

    fn remove_files(&self, files: &[String]) -> Removal {
        let mut removal = Removal::default();
        for relative in files {
            let path = self.root.join(relative);
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!("removed {}", relative);
                    removal.removed.push(relative.clone());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("{} was already removed", relative);
                    removal.missing.push(relative.clone());
                }
                Err(e) => {
                    warn!("failed to remove {}: {}", relative, e);
                    removal.failed.push(relative.clone());
                }
            }
        }
        removal
    }
}

fn no_history(module_name: &str) -> CoreError {
    CoreError::history(format!("no history for module {}", module_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::FieldDefinition;
    use tempfile::TempDir;

    fn request(model: &str, package: &str) -> GenerateRequest {
        GenerateRequest::new(ComponentType::Model, model)
            .with_package_path(package)
            .with_field(FieldDefinition::new("Name", "string"))
    }

    #[test]
    fn test_add_replaces_same_key() {
        let manager = HistoryManager::new(MemoryStore::new(), "/unused");
        let req = request("Product", "internal/admin");

        manager.add(&req, &[ComponentType::Model], vec!["a.go".to_string()]).unwrap();
        manager.add(&req, &[ComponentType::Model], vec!["b.go".to_string()]).unwrap();

        let all = manager.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].generated_files, vec!["b.go"]);
        assert_eq!(all[0].table_name, "products");
        assert_eq!(all[0].generated_by, GENERATED_BY);
    }

    #[test]
    fn test_same_module_different_package_appends() {
        let manager = HistoryManager::new(MemoryStore::new(), "/unused");
        manager.add(&request("Product", "internal/admin"), &[], vec![]).unwrap();
        manager.add(&request("Product", "internal/master"), &[], vec![]).unwrap();

        assert_eq!(manager.get_all().unwrap().len(), 2);
        assert_eq!(manager.get_by_module("Product").unwrap().package_path, "internal/admin");
    }

    #[test]
    fn test_unknown_module_is_a_history_error() {
        let manager = HistoryManager::new(MemoryStore::new(), "/unused");
        assert!(matches!(manager.get_by_module("Ghost"), Err(CoreError::History { .. })));
        assert!(matches!(manager.delete_by_module("Ghost"), Err(CoreError::History { .. })));
    }

    #[test]
    fn test_failed_transaction_is_not_saved() {
        let manager = HistoryManager::new(MemoryStore::new(), "/unused");
        manager.add(&request("Product", ""), &[], vec![]).unwrap();

        let result: Result<(), CoreError> = manager.transact(|file| {
            file.history.clear();
            Err(CoreError::history("abort"))
        });
        assert!(result.is_err());
        assert_eq!(manager.store().snapshot().history.len(), 1);
    }

    #[test]
    fn test_json_store_round_trip_and_absent_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data/code-generate-history.json");
        let store = JsonFileStore::new(&path);

        let empty = store.load().unwrap();
        assert_eq!(empty.version, "1.0.0");
        assert!(empty.history.is_empty());

        let manager = HistoryManager::new(store, temp_dir.path());
        manager.add(&request("Product", "internal/admin"), &[ComponentType::Model], vec!["x.go".to_string()]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"moduleName\": \"Product\""));
        assert!(raw.contains("\"components\": [\n        \"model\"\n      ]"));
    }

    #[test]
    fn test_corrupt_history_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::History { .. }));
    }

    #[test]
    fn test_delete_removes_files_and_tolerates_missing() {
        let temp_dir = TempDir::new().unwrap();
        let manager = HistoryManager::new(MemoryStore::new(), temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("internal/shared/models")).unwrap();
        std::fs::write(temp_dir.path().join("internal/shared/models/product.go"), "x").unwrap();

        manager
            .add(
                &request("Product", "internal/admin"),
                &[ComponentType::Model],
                vec![
                    "internal/shared/models/product.go".to_string(),
                    "internal/admin/service/product.go".to_string(),
                ],
            )
            .unwrap();

        let removal = manager.delete_by_module("Product").unwrap();
        assert_eq!(removal.removed, vec!["internal/shared/models/product.go"]);
        assert_eq!(removal.missing, vec!["internal/admin/service/product.go"]);
        assert!(!temp_dir.path().join("internal/shared/models/product.go").exists());
        assert!(manager.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let temp_dir = TempDir::new().unwrap();
        let manager = HistoryManager::new(MemoryStore::new(), temp_dir.path());
        std::fs::write(temp_dir.path().join("a.go"), "a").unwrap();
        std::fs::write(temp_dir.path().join("b.go"), "b").unwrap();

        manager.add(&request("Alpha", ""), &[], vec!["a.go".to_string()]).unwrap();
        manager.add(&request("Beta", ""), &[], vec!["b.go".to_string()]).unwrap();

        let removal = manager.clear().unwrap();
        assert_eq!(removal.removed.len(), 2);
        assert!(!temp_dir.path().join("a.go").exists());
        assert!(manager.get_all().unwrap().is_empty());
        assert_eq!(manager.load().unwrap().version, "1.0.0");
    }
}
