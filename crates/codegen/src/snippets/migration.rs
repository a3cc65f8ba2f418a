use super::Placement;
use crate::context::TemplateData;
use crate::generators::{Capabilities, ComponentGenerator, SnippetGenerator};
use crudforge_core::{CodeSnippet, ComponentType, CoreError};

/// Auto-migration registry entry
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationGenerator;

impl ComponentGenerator for MigrationGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Migration
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for MigrationGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;
        let content = format!("\t\t&models.{}{{}}, // {}", names.model, names.table);

        Ok(vec![Placement {
            category: "migration",
            target_file: format!("{}/initializer/migrations.go", names.namespace_dir),
            marker: Some("models"),
            insertion_point: "in the AutoMigrate model list, before the models marker".to_string(),
            description: format!("Migrate the {} table", names.table),
            priority: 1,
        }
        .into_snippet(data, content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippets::test_support::product_data;

    #[test]
    fn test_migration_snippet() {
        let snippets = MigrationGenerator
            .generate_snippets(&product_data(ComponentType::Migration))
            .unwrap();

        assert_eq!(snippets[0].content, "\t\t&models.Product{}, // products");
        assert_eq!(snippets[0].target_file, "internal/admin/initializer/migrations.go");
        assert_eq!(snippets[0].id, "migration_product");
    }
}
