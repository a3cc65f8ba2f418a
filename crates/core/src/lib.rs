pub mod config;
pub mod error;
pub mod naming;
pub mod spec;
pub mod types;

pub use config::ForgeConfig;
pub use error::{CoreError, ValidationError, ValidationErrors};
pub use spec::{
    CodeSnippet, ComponentType, FieldDefinition, GenerateHistory, GenerateOptions,
    GenerateRequest, GenerateResponse, HistoryFile, GENERATED_BY, HISTORY_VERSION,
};
pub use types::{MappedType, TypeMapper};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
