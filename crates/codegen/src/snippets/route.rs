use super::Placement;
use crate::context::TemplateData;
use crate::generators::{Capabilities, ComponentGenerator, SnippetGenerator};
use crudforge_core::{CodeSnippet, ComponentType, CoreError};

/// CRUD actions every generated handler exposes: (method, http verb, sub-path, permission action)
pub(crate) const CRUD_ROUTES: [(&str, &str, &str, &str); 5] = [
    ("GetList", "GET", "", "list"),
    ("GetByID", "GET", "/:id", "list"),
    ("Create", "POST", "", "create"),
    ("Update", "PUT", "/:id", "update"),
    ("Delete", "DELETE", "/:id", "delete"),
];

/// Route group registration for the model's handler
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGenerator;

impl ComponentGenerator for RouteGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Routes
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for RouteGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;
        let group = format!("{}Group", names.lower_camel);

        let mut content = String::new();
        push_line!(content, "\t// {} routes", names.display);
        push_line!(content, "\t{} := router.Group(\"{}\")", group, names.route_path);
        content.push_str("\t{\n");
        for (method, verb, path, action) in CRUD_ROUTES {
            push_line!(
                content,
                "\t\t{}.{}(\"{}\", middleware.RequirePermission(\"system.{}:{}\"), handlers.{}.{})",
                group, verb, path, names.permission_prefix, action, names.handler, method
            );
        }
        content.push_str("\t}");

        let placement = Placement {
            category: "routes",
            target_file: format!("{}/routes/routes.go", names.namespace_dir),
            marker: Some("routes"),
            insertion_point: "before the // <<<FORGE:INSERT routes>>> marker in the route registration function".to_string(),
            description: format!("Register the {} CRUD routes", names.display),
            priority: 1,
        };

        Ok(vec![placement.into_snippet(data, content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippets::test_support::product_data;

    #[test]
    fn test_route_snippet() {
        let data = product_data(ComponentType::Routes);
        let snippets = RouteGenerator.generate_snippets(&data).unwrap();

        assert_eq!(snippets.len(), 1);
        let snippet = &snippets[0];
        assert_eq!(snippet.id, "routes_product");
        assert_eq!(snippet.target_file, "internal/admin/routes/routes.go");
        assert!(snippet.content.contains("productGroup := router.Group(\"/product\")"));
        assert!(snippet
            .content
            .contains("productGroup.DELETE(\"/:id\", middleware.RequirePermission(\"system.product:delete\"), handlers.ProductHandler.Delete)"));
        assert!(snippet.insert_before.is_some());
    }
}
