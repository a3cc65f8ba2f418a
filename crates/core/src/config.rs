use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level generator settings, read from `.crudforge/config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Root every generated relative path resolves against
    pub output_root: PathBuf,
    /// Named templates directory; relative paths resolve against `output_root`
    pub templates_dir: PathBuf,
    pub history_file: PathBuf,
    /// Import-path prefix used by rendered Go files
    pub module_name: String,
    pub formatter: Vec<String>,
    pub import_optimizer: Vec<String>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            templates_dir: PathBuf::from("templates"),
            history_file: PathBuf::from("data/code-generate-history.json"),
            module_name: "app".to_string(),
            formatter: vec!["gofmt".to_string(), "-w".to_string()],
            import_optimizer: vec!["goimports".to_string(), "-w".to_string()],
        }
    }
}

impl ForgeConfig {
    pub fn config_path() -> PathBuf {
        PathBuf::from(".crudforge/config.yaml")
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::file_operation("read config", path.display(), e))?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<root>/.crudforge/config.yaml` when present, defaults otherwise.
    /// A relative `output_root` in the file is taken relative to `root`.
    pub fn load_or_default(root: &Path) -> Result<Self, CoreError> {
        let path = root.join(Self::config_path());
        let mut config = if path.exists() {
            debug!("loading config from {}", path.display());
            Self::load(&path)?
        } else {
            debug!("no config at {}, using defaults", path.display());
            Self::default()
        };

        if config.output_root.is_relative() {
            config.output_root = root.join(&config.output_root);
        }
        Ok(config)
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn templates_path(&self) -> PathBuf {
        self.resolve(&self.templates_dir)
    }

    pub fn history_path(&self) -> PathBuf {
        self.resolve(&self.history_file)
    }

    /// Absolute location of an output-relative path
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.output_root.join(relative)
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.module_name.trim().is_empty() {
            return Err(CoreError::configuration("module_name must not be empty"));
        }
        if self.history_file.as_os_str().is_empty() {
            return Err(CoreError::configuration("history_file must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = ForgeConfig::load_or_default(temp_dir.path()).unwrap();

        assert_eq!(config.module_name, "app");
        assert_eq!(config.formatter, vec!["gofmt", "-w"]);
        assert_eq!(
            config.history_path(),
            temp_dir.path().join(".").join("data/code-generate-history.json")
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".crudforge");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            "module_name: github.com/acme/admin\nformatter: []\n",
        )
        .unwrap();

        let config = ForgeConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.module_name, "github.com/acme/admin");
        assert!(config.formatter.is_empty());
        assert_eq!(config.import_optimizer, vec!["goimports", "-w"]);
    }

    #[test]
    fn test_empty_module_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "module_name: \"\"\n").unwrap();

        let err = ForgeConfig::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }
}
