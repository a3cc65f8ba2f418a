use crate::naming::{to_plural, to_snake_case};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The generable layers and auxiliary artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Model,
    Repository,
    Service,
    Handler,
    Routes,
    Wire,
    Migration,
    Permission,
    FrontendApi,
    FrontendPage,
    FrontendForm,
    FrontendRoute,
    All,
    /// Anything else a caller sent; rejected by validation
    Unknown(String),
}

impl ComponentType {
    /// File-producing layers in dependency order
    pub const LAYERS: [ComponentType; 4] = [
        ComponentType::Model,
        ComponentType::Repository,
        ComponentType::Service,
        ComponentType::Handler,
    ];

    /// Snippet-producing components in the order `All` runs them
    pub const SNIPPETS: [ComponentType; 8] = [
        ComponentType::Routes,
        ComponentType::Wire,
        ComponentType::Migration,
        ComponentType::Permission,
        ComponentType::FrontendApi,
        ComponentType::FrontendPage,
        ComponentType::FrontendForm,
        ComponentType::FrontendRoute,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Handler => "handler",
            Self::Routes => "routes",
            Self::Wire => "wire",
            Self::Migration => "migration",
            Self::Permission => "permission",
            Self::FrontendApi => "frontend_api",
            Self::FrontendPage => "frontend_page",
            Self::FrontendForm => "frontend_form",
            Self::FrontendRoute => "frontend_route",
            Self::All => "all",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    pub fn is_snippet(&self) -> bool {
        Self::SNIPPETS.contains(self)
    }
}

impl From<String> for ComponentType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "model" => Self::Model,
            "repository" => Self::Repository,
            "service" => Self::Service,
            "handler" => Self::Handler,
            "routes" | "route" => Self::Routes,
            "wire" => Self::Wire,
            "migration" => Self::Migration,
            "permission" => Self::Permission,
            "frontend_api" | "frontendapi" => Self::FrontendApi,
            "frontend_page" | "frontendpage" => Self::FrontendPage,
            "frontend_form" | "frontendform" => Self::FrontendForm,
            "frontend_route" | "frontendroute" => Self::FrontendRoute,
            "all" => Self::All,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ComponentType> for String {
    fn from(component: ComponentType) -> Self {
        component.as_str().to_string()
    }
}

impl FromStr for ComponentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-declared model attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(alias = "type", alias = "logical_type")]
    pub logical_type: String,
    #[serde(default, alias = "gorm_tag", alias = "storage_tag")]
    pub storage_tag: String,
    #[serde(default, alias = "json_tag", alias = "serialization_tag")]
    pub serialization_tag: String,
    #[serde(default, alias = "validate", alias = "validation_rule")]
    pub validation_rule: String,
    #[serde(default)]
    pub comment: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_validation(mut self, rule: impl Into<String>) -> Self {
        self.validation_rule = rule.into();
        self
    }

    /// Wire-format key, defaulting to the snake_case field name
    pub fn serialization_key(&self) -> String {
        if self.serialization_tag.trim().is_empty() {
            to_snake_case(&self.name)
        } else {
            self.serialization_tag.trim().to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(default, alias = "overwrite_existing")]
    pub overwrite_existing: bool,
    #[serde(default = "default_true", alias = "format_code")]
    pub format_code: bool,
    #[serde(default = "default_true", alias = "optimize_imports")]
    pub optimize_imports: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            overwrite_existing: false,
            format_code: true,
            optimize_imports: true,
        }
    }
}

/// A request-scoped description of what to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(alias = "component_type")]
    pub component_type: ComponentType,
    #[serde(alias = "model_name")]
    pub model_name: String,
    /// Human-facing name used for labels and titles
    #[serde(default, alias = "model_name_cn", alias = "display_name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, alias = "table_name")]
    pub table_name: Option<String>,
    #[serde(default, alias = "package_path")]
    pub package_path: String,
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(component_type: ComponentType, model_name: impl Into<String>) -> Self {
        Self {
            component_type,
            model_name: model_name.into(),
            display_name: None,
            fields: Vec::new(),
            table_name: None,
            package_path: String::new(),
            options: GenerateOptions::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_package_path(mut self, package_path: impl Into<String>) -> Self {
        self.package_path = package_path.into();
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// The same request retargeted at another component; used by `All` mode
    pub fn for_component(&self, component_type: ComponentType) -> Self {
        Self {
            component_type,
            ..self.clone()
        }
    }

    /// Explicit table name, or the pluralized snake_case model name
    pub fn resolved_table_name(&self) -> String {
        match self.table_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => to_plural(&to_snake_case(&self.model_name)),
        }
    }

    pub fn resolved_display_name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.model_name.clone(),
        }
    }
}

/// A fragment meant to be spliced into a hand-maintained file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub id: String,
    pub content: String,
    pub target_file: String,
    pub insertion_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<String>,
    pub description: String,
    pub priority: u32,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub generated_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_snippets: Vec<CodeSnippet>,
    pub message: String,
    pub history_updated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl GenerateResponse {
    pub fn files(files: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            generated_files: files,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn snippets(snippets: Vec<CodeSnippet>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code_snippets: snippets,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
            ..Default::default()
        }
    }
}

pub const HISTORY_VERSION: &str = "1.0.0";
pub const GENERATED_BY: &str = "crudforge";

/// Durable record of the files one module's last generation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateHistory {
    pub module_name: String,
    pub generated_at: DateTime<Utc>,
    pub components: Vec<String>,
    pub model_name: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub package_path: String,
    #[serde(default)]
    pub generated_by: String,
    #[serde(default)]
    pub generated_files: Vec<String>,
}

impl GenerateHistory {
    pub fn matches(&self, module_name: &str, package_path: &str) -> bool {
        self.module_name == module_name && self.package_path == package_path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    pub version: String,
    #[serde(default)]
    pub history: Vec<GenerateHistory>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION.to_string(),
            history: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
