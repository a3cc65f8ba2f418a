use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Core error type for the crudforge generator
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {errors}")]
    Validation { errors: ValidationErrors },

    #[error("File '{path}' already exists; set overwriteExisting to replace it")]
    Conflict { path: String },

    #[error("Render error in template '{template}': {message}")]
    Render { template: String, message: String },

    #[error("IO error during {operation} of '{path}': {source}")]
    FileOperation {
        operation: String,
        path: String,
        source: std::io::Error,
    },

    #[error("History error: {message}")]
    History { message: String },

    #[error("Component '{component}' does not support {operation}")]
    Unsupported { component: String, operation: String },

    #[error("Anchor error in '{target}': {message}")]
    Anchor { target: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CoreError {
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation { errors }
    }

    pub fn conflict(path: impl Into<String>) -> Self {
        Self::Conflict { path: path.into() }
    }

    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Wrap an IO failure with the operation that caused it
    pub fn file_operation(
        operation: impl Into<String>,
        path: impl fmt::Display,
        source: std::io::Error,
    ) -> Self {
        Self::FileOperation {
            operation: operation.into(),
            path: path.to_string(),
            source,
        }
    }

    pub fn history(message: impl Into<String>) -> Self {
        Self::History {
            message: message.into(),
        }
    }

    pub fn unsupported(component: impl fmt::Display, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            component: component.to_string(),
            operation: operation.into(),
        }
    }

    pub fn anchor(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Anchor {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }

    /// Messages suitable for `GenerateResponse::errors`.
    ///
    /// Validation failures expand to one entry per field error so a caller can show
    /// every problem at once.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation { errors } => errors.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every validation failure found in a request, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True when at least one error is reported against `field` or one of its children
    pub fn mentions(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|e| e.field == field || e.field.starts_with(&format!("{}[", field)))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
