use super::Placement;
use crate::context::TemplateData;
use crate::generators::{Capabilities, ComponentGenerator, SnippetGenerator};
use crudforge_core::{CodeSnippet, ComponentType, CoreError};

/// Dependency-injection provider set entries and the handler aggregate field
#[derive(Debug, Clone, Copy, Default)]
pub struct WireGenerator;

impl ComponentGenerator for WireGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Wire
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for WireGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;
        let ns = &names.namespace_dir;

        let providers = format!(
            "\t// {display}\n\trepository.New{model}Repository,\n\tservice.New{model}Service,\n\thandler.New{model}Handler,",
            display = names.display,
            model = names.model,
        );
        let field = format!("\t{} *{}", names.handler, names.handler);

        Ok(vec![
            Placement {
                category: "wire_provider",
                target_file: format!("{}/wire.go", ns),
                marker: Some("providers"),
                insertion_point: "inside the wire.NewSet provider list, before the providers marker".to_string(),
                description: format!("Register the {} repository, service and handler constructors", names.display),
                priority: 1,
            }
            .into_snippet(data, providers),
            Placement {
                category: "wire_handler",
                target_file: format!("{}/handler/handlers.go", ns),
                marker: Some("handlers"),
                insertion_point: "inside the Handlers struct, before the handlers marker".to_string(),
                description: format!("Expose {} on the handler aggregate", names.handler),
                priority: 2,
            }
            .into_snippet(data, field),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippets::test_support::product_data;

    #[test]
    fn test_wire_snippets() {
        let snippets = WireGenerator.generate_snippets(&product_data(ComponentType::Wire)).unwrap();

        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].target_file, "internal/admin/wire.go");
        assert!(snippets[0].content.contains("service.NewProductService,"));
        assert_eq!(snippets[1].target_file, "internal/admin/handler/handlers.go");
        assert_eq!(snippets[1].content, "\tProductHandler *ProductHandler");
        assert!(snippets[0].priority < snippets[1].priority);
    }
}
