//! File-producing generators for the four architectural layers.

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub use handler::HandlerGenerator;
pub use model::ModelGenerator;
pub use repository::RepositoryGenerator;
pub use service::ServiceGenerator;

use crate::context::{TemplateData, TemplateDataBuilder};
use crate::templates::{template_file, TemplateEngine};
use crate::writer::CodeWriter;
use crudforge_core::{CodeSnippet, ComponentType, CoreError, GenerateRequest};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What a generator can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub writes_files: bool,
    pub emits_snippets: bool,
}

impl Capabilities {
    pub const FILES: Self = Self {
        writes_files: true,
        emits_snippets: false,
    };

    pub const SNIPPETS: Self = Self {
        writes_files: false,
        emits_snippets: true,
    };
}

pub trait ComponentGenerator {
    fn component(&self) -> ComponentType;

    fn capabilities(&self) -> Capabilities;
}

/// Renders whole files from named templates and writes them
pub trait FileGenerator: ComponentGenerator {
    /// Output paths relative to the output root, in write order
    fn output_paths(&self, data: &TemplateData) -> Vec<String>;

    /// Returns the relative paths written
    fn generate(&self, request: &GenerateRequest, env: &GenerateEnv<'_>) -> Result<Vec<String>, CoreError>;
}

/// Produces fragments for hand-maintained files; never touches the file system
pub trait SnippetGenerator: ComponentGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError>;
}

/// One file a generator renders: template `name` from `dir` into `path`
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub path: String,
    pub template: &'static str,
    pub dir: PathBuf,
}

/// Shared collaborators handed to every file generator
pub struct GenerateEnv<'a> {
    pub writer: &'a CodeWriter,
    pub builder: &'a TemplateDataBuilder,
    pub templates_dir: &'a Path,
    /// Fallback for the Model template
    pub builtin_dir: &'a Path,
}

impl<'a> GenerateEnv<'a> {
    /// Check every target for conflicts, render every template, then write.
    /// Nothing is written unless all renders succeed.
    pub fn render_and_write(
        &self,
        request: &GenerateRequest,
        component: ComponentType,
        targets: &[RenderTarget],
        data: &TemplateData,
    ) -> Result<Vec<String>, CoreError> {
        for target in targets {
            self.writer.check_conflict(&target.path, &request.options)?;
        }

        let mut engine = TemplateEngine::new();
        let mut rendered = Vec::with_capacity(targets.len());
        for target in targets {
            engine.load(target.template, &target.dir)?;
            rendered.push((&target.path, engine.render(target.template, data)?));
        }

        debug!("rendered {} file(s) for {}", rendered.len(), component);
        let mut written = Vec::with_capacity(rendered.len());
        let mut created = Vec::new();
        for (path, content) in rendered {
            let existed = self.writer.resolve(path).exists();
            match self.writer.write(path, &content, &request.options) {
                Ok(relative) => {
                    if !existed {
                        created.push(path.as_str());
                    }
                    written.push(relative);
                }
                Err(e) => {
                    self.remove_created(&created);
                    return Err(e);
                }
            }
        }
        Ok(written)
    }

    /// Undo a partial write; overwritten files keep their new content
    fn remove_created(&self, created: &[&str]) {
        for relative in created {
            match std::fs::remove_file(self.writer.resolve(relative)) {
                Ok(()) => debug!("rolled back {}", relative),
                Err(e) => warn!("failed to roll back {}: {}", relative, e),
            }
        }
    }
}

/// Pick the configured templates directory if it holds `name`, else the builtin one.
/// Fails naming both paths when neither has it.
pub fn resolve_with_fallback(templates_dir: &Path, builtin_dir: &Path, name: &str) -> Result<PathBuf, CoreError> {
    if template_file(templates_dir, name).exists() {
        return Ok(templates_dir.to_path_buf());
    }
    if template_file(builtin_dir, name).exists() {
        debug!("template {} not in {}, using builtin", name, templates_dir.display());
        return Ok(builtin_dir.to_path_buf());
    }
    Err(CoreError::render(
        name,
        format!(
            "template not found at '{}' or builtin '{}'",
            template_file(templates_dir, name).display(),
            template_file(builtin_dir, name).display()
        ),
    ))
}

/// `<dir>/<stem>.go` with a `/` separator regardless of platform
pub(crate) fn go_path(dir: &str, stem: &str) -> String {
    format!("{}/{}.go", dir, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::FieldDefinition;
    use tempfile::TempDir;

    #[test]
    fn test_fallback_prefers_configured_dir() {
        let configured = TempDir::new().unwrap();
        let builtin = TempDir::new().unwrap();
        std::fs::write(configured.path().join("model.go.tera"), "x").unwrap();
        std::fs::write(builtin.path().join("model.go.tera"), "y").unwrap();

        let dir = resolve_with_fallback(configured.path(), builtin.path(), "model.go").unwrap();
        assert_eq!(dir, configured.path());
    }

    #[test]
    fn test_fallback_uses_builtin() {
        let configured = TempDir::new().unwrap();
        let builtin = TempDir::new().unwrap();
        std::fs::write(builtin.path().join("model.go.tera"), "y").unwrap();

        let dir = resolve_with_fallback(configured.path(), builtin.path(), "model.go").unwrap();
        assert_eq!(dir, builtin.path());
    }

    #[test]
    fn test_fallback_error_names_both_paths() {
        let configured = TempDir::new().unwrap();
        let builtin = TempDir::new().unwrap();

        let err = resolve_with_fallback(configured.path(), builtin.path(), "model.go").unwrap_err();
        let message = err.to_string();
        assert!(err.is_render());
        assert!(message.contains(&configured.path().join("model.go.tera").display().to_string()));
        assert!(message.contains(&builtin.path().join("model.go.tera").display().to_string()));
    }

    #[test]
    fn test_layer_output_paths() {
        let request = GenerateRequest::new(ComponentType::Handler, "OrderItem")
            .with_package_path("internal/master")
            .with_field(FieldDefinition::new("Quantity", "int"));
        let data = TemplateDataBuilder::new("app").build(&request, &ComponentType::Handler);

        assert_eq!(ModelGenerator.output_paths(&data), vec!["internal/shared/models/order_item.go"]);
        assert_eq!(
            RepositoryGenerator.output_paths(&data),
            vec!["internal/master/repository/order_item.go"]
        );
        assert_eq!(ServiceGenerator.output_paths(&data), vec!["internal/master/service/order_item.go"]);
        assert_eq!(
            HandlerGenerator.output_paths(&data),
            vec![
                "internal/master/handler/order_item.go",
                "internal/master/types/order_item_types.go"
            ]
        );
    }
}
