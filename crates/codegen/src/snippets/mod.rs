//! Fragment generators for files the generator does not own.
//!
//! Each generator is a pure function from [`TemplateData`] to snippets; merging
//! is left to [`anchor::apply_snippet`] or a human.

/// `writeln!` for a `String` buffer
macro_rules! push_line {
    ($buf:expr, $($arg:tt)*) => {{
        $buf.push_str(&format!($($arg)*));
        $buf.push('\n');
    }};
}

pub mod anchor;
pub mod frontend;
pub mod migration;
pub mod permission;
pub mod route;
pub mod wire;

pub use anchor::{apply_snippet, marker, marker_pattern, resolve_insertion, splice, ApplyOutcome, Splice};
pub use frontend::{FrontendApiGenerator, FrontendFormGenerator, FrontendPageGenerator, FrontendRouteGenerator};
pub use migration::MigrationGenerator;
pub use permission::PermissionGenerator;
pub use route::RouteGenerator;
pub use wire::WireGenerator;

use crate::context::TemplateData;
use crudforge_core::CodeSnippet;

/// Where a snippet goes and how to find the spot
pub(crate) struct Placement<'a> {
    pub category: &'a str,
    pub target_file: String,
    /// Marker kind; `None` for fragments that make up a whole new file
    pub marker: Option<&'a str>,
    pub insertion_point: String,
    pub description: String,
    pub priority: u32,
}

impl<'a> Placement<'a> {
    pub fn into_snippet(self, data: &TemplateData, content: String) -> CodeSnippet {
        CodeSnippet {
            id: format!("{}_{}", self.category, data.names.snake),
            content,
            target_file: self.target_file,
            insertion_point: self.insertion_point,
            insert_before: self.marker.map(marker_pattern),
            insert_after: None,
            description: self.description,
            priority: self.priority,
            category: self.category.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::{TemplateData, TemplateDataBuilder};
    use crudforge_core::{ComponentType, FieldDefinition, GenerateRequest};

    pub fn product_data(component: ComponentType) -> TemplateData {
        let mut request = GenerateRequest::new(component.clone(), "Product")
            .with_package_path("internal/admin")
            .with_field(
                FieldDefinition::new("Name", "string")
                    .with_comment("Product name, required")
                    .with_validation("required"),
            )
            .with_field(FieldDefinition::new("Price", "decimal").with_comment("Price (CNY)"))
            .with_field(FieldDefinition::new("Status", "int").with_comment("Status"))
            .with_field(FieldDefinition::new("ReleasedAt", "date"));
        request.display_name = Some("Goods".to_string());
        TemplateDataBuilder::new("github.com/acme/admin").build(&request, &component)
    }
}
