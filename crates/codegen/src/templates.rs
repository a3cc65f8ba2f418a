use crudforge_core::naming::{to_camel_case, to_kebab_case, to_pascal_case, to_plural, to_snake_case};
use crudforge_core::CoreError;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use tera::{try_get_value, Context, Tera, Value};
use tracing::debug;

/// Bundled templates shipped with the crate, used as the Model fallback
pub fn builtin_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn template_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.tera", name))
}

/// Tera wrapper that loads named templates from disk at generation time
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.register_filter("snake_case", snake_case_filter);
        tera.register_filter("camel_case", camel_case_filter);
        tera.register_filter("pascal_case", pascal_case_filter);
        tera.register_filter("kebab_case", kebab_case_filter);
        tera.register_filter("plural", plural_filter);

        Self { tera }
    }

    /// Register `<dir>/<name>.tera` under `name`
    pub fn load(&mut self, name: &str, dir: &Path) -> Result<PathBuf, CoreError> {
        let path = template_file(dir, name);
        let source = std::fs::read_to_string(&path).map_err(|e| {
            CoreError::render(name, format!("cannot read template '{}': {}", path.display(), e))
        })?;
        self.add_raw_template(name, &source)?;
        debug!("loaded template {} from {}", name, path.display());
        Ok(path)
    }

    pub fn add_raw_template(&mut self, name: &str, source: &str) -> Result<(), CoreError> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|e| CoreError::render(name, error_chain(&e)))
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, CoreError> {
        let context = Context::from_serialize(data).map_err(|e| CoreError::render(name, error_chain(&e)))?;
        self.tera
            .render(name, &context)
            .map_err(|e| CoreError::render(name, error_chain(&e)))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten an error and its sources into one message; tera hides the useful
/// part ("Variable `x` not found") in the source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn snake_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("snake_case", "value", String, value);
    Ok(Value::String(to_snake_case(&s)))
}

fn camel_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("camel_case", "value", String, value);
    Ok(Value::String(to_camel_case(&s)))
}

fn pascal_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("pascal_case", "value", String, value);
    Ok(Value::String(to_pascal_case(&s)))
}

fn kebab_case_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("kebab_case", "value", String, value);
    Ok(Value::String(to_kebab_case(&s)))
}

fn plural_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = try_get_value!("plural", "value", String, value);
    Ok(Value::String(to_plural(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_filters_are_registered() {
        let mut engine = TemplateEngine::new();
        engine
            .add_raw_template(
                "names.go",
                "{{ name | snake_case }} {{ name | kebab_case }} {{ name | snake_case | plural }}",
            )
            .unwrap();

        let rendered = engine.render("names.go", &json!({ "name": "OrderItem" })).unwrap();
        assert_eq!(rendered, "order_item order-item order_items");
    }

    #[test]
    fn test_no_html_escaping() {
        let mut engine = TemplateEngine::new();
        engine.add_raw_template("tag.go", "`{{ tag }}`").unwrap();

        let rendered = engine.render("tag.go", &json!({ "tag": "json:\"name\" gorm:\"size:<100>\"" })).unwrap();
        assert_eq!(rendered, "`json:\"name\" gorm:\"size:<100>\"`");
    }

    #[test]
    fn test_missing_template_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = TemplateEngine::new();

        let err = engine.load("model.go", temp_dir.path()).unwrap_err();
        assert!(err.is_render());
        assert!(err.to_string().contains("model.go.tera"));
    }

    #[test]
    fn test_render_error_keeps_cause() {
        let mut engine = TemplateEngine::new();
        engine.add_raw_template("broken.go", "{{ missing_value }}").unwrap();

        let err = engine.render("broken.go", &json!({})).unwrap_err();
        assert!(err.is_render());
        assert!(err.to_string().contains("missing_value"));
    }

    #[test]
    fn test_builtin_templates_exist() {
        for name in ["model.go", "repository.go", "service.go", "handler.go", "handler_types.go"] {
            assert!(template_file(&builtin_templates_dir(), name).exists(), "{}", name);
        }
    }
}
