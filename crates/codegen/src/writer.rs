use crudforge_core::{CoreError, ForgeConfig, GenerateOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Writes generated files under the output root.
///
/// Content goes to a temporary file in the destination directory and is then
/// renamed into place, so a failed write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    root: PathBuf,
    formatter: Vec<String>,
    import_optimizer: Vec<String>,
}

impl CodeWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            formatter: Vec::new(),
            import_optimizer: Vec::new(),
        }
    }

    pub fn from_config(config: &ForgeConfig) -> Self {
        Self {
            root: config.output_root.clone(),
            formatter: config.formatter.clone(),
            import_optimizer: config.import_optimizer.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Fails with a conflict naming `relative` when it exists and overwriting is off
    pub fn check_conflict(&self, relative: &str, options: &GenerateOptions) -> Result<(), CoreError> {
        if !options.overwrite_existing && self.resolve(relative).exists() {
            return Err(CoreError::conflict(relative));
        }
        Ok(())
    }

    /// Write `content` to `relative` and run the configured post-processors.
    /// Returns the relative path that was written.
    pub fn write(
        &self,
        relative: &str,
        content: &str,
        options: &GenerateOptions,
    ) -> Result<String, CoreError> {
        self.check_conflict(relative, options)?;

        let path = self.resolve(relative);
        let dir = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(dir)
            .map_err(|e| CoreError::file_operation("create directory", dir.display(), e))?;

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| CoreError::file_operation("create temporary file", dir.display(), e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| CoreError::file_operation("write", path.display(), e))?;

        let persisted = if options.overwrite_existing {
            temp.persist(&path)
        } else {
            temp.persist_noclobber(&path)
        };
        persisted.map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                CoreError::conflict(relative)
            } else {
                CoreError::file_operation("write", path.display(), e.error)
            }
        })?;

        info!("wrote {}", relative);

        if is_go_source(&path) {
            if options.format_code {
                self.run_best_effort("format", &self.formatter, &path);
            }
            if options.optimize_imports {
                self.run_best_effort("optimize imports", &self.import_optimizer, &path);
            }
        }

        Ok(relative.to_string())
    }

    /// Run an external post-processor; failures are logged and swallowed
    fn run_best_effort(&self, step: &str, command: &[String], path: &Path) {
        let Some((program, args)) = command.split_first() else {
            return;
        };

        debug!("{} {}: {} {:?}", step, path.display(), program, args);
        match Command::new(program).args(args).arg(path).output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                "{} failed for {}: {}",
                step,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("{} skipped for {}: cannot run '{}': {}", step, path.display(), program, e),
        }
    }
}

fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_options(overwrite: bool) -> GenerateOptions {
        GenerateOptions {
            overwrite_existing: overwrite,
            format_code: false,
            optimize_imports: false,
        }
    }

    #[test]
    fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CodeWriter::new(temp_dir.path());

        let written = writer
            .write("internal/shared/models/product.go", "package models\n", &quiet_options(false))
            .unwrap();

        assert_eq!(written, "internal/shared/models/product.go");
        let content = std::fs::read_to_string(temp_dir.path().join(&written)).unwrap();
        assert_eq!(content, "package models\n");
    }

    #[test]
    fn test_conflict_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CodeWriter::new(temp_dir.path());
        writer.write("a/b.go", "first", &quiet_options(false)).unwrap();

        let err = writer.write("a/b.go", "second", &quiet_options(false)).unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("a/b.go"));

        let content = std::fs::read_to_string(temp_dir.path().join("a/b.go")).unwrap();
        assert_eq!(content, "first");
    }

    #[test]
    fn test_overwrite_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CodeWriter::new(temp_dir.path());
        writer.write("a/b.go", "first", &quiet_options(false)).unwrap();
        writer.write("a/b.go", "second", &quiet_options(true)).unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("a/b.go")).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_missing_formatter_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ForgeConfig::default().with_output_root(temp_dir.path());
        config.formatter = vec!["crudforge-no-such-formatter".to_string()];
        config.import_optimizer = vec!["crudforge-no-such-optimizer".to_string(), "-w".to_string()];
        let writer = CodeWriter::from_config(&config);

        let options = GenerateOptions::default();
        assert!(writer.write("x.go", "package x\n", &options).is_ok());
        assert_eq!(std::fs::read_to_string(temp_dir.path().join("x.go")).unwrap(), "package x\n");
    }
}
