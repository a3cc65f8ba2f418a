pub mod generate;
pub mod history;

use crudforge_core::{CoreError, ForgeConfig};
use std::path::Path;
use tracing::debug;

/// Configuration for `root`: an explicit file, else `.crudforge/config.yaml`
/// when present, else defaults. `templates` overrides the configured directory.
pub fn load_config(root: &Path, config: Option<&Path>, templates: Option<&Path>) -> Result<ForgeConfig, CoreError> {
    let mut config = match config {
        Some(path) => {
            let mut loaded = ForgeConfig::load(path)?;
            if loaded.output_root.is_relative() {
                loaded.output_root = root.join(&loaded.output_root);
            }
            loaded
        }
        None => ForgeConfig::load_or_default(root)?,
    };

    if let Some(templates) = templates {
        config = config.with_templates_dir(templates);
    }

    debug!(
        "output root {}, templates {}",
        config.output_root.display(),
        config.templates_path().display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_resolves_against_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("forge.yaml");
        std::fs::write(&file, "output_root: out\nmodule_name: github.com/acme/shop\n").unwrap();

        let config = load_config(temp_dir.path(), Some(&file), Some(Path::new("/opt/templates"))).unwrap();
        assert_eq!(config.output_root, temp_dir.path().join("out"));
        assert_eq!(config.module_name, "github.com/acme/shop");
        assert_eq!(config.templates_path(), Path::new("/opt/templates"));
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path(), None, None).unwrap();
        assert_eq!(config.module_name, "app");
        assert_eq!(config.templates_path(), config.output_root.join("templates"));
    }
}
