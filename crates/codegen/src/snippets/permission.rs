use super::Placement;
use crate::context::TemplateData;
use crate::generators::{Capabilities, ComponentGenerator, SnippetGenerator};
use crudforge_core::{CodeSnippet, ComponentType, CoreError};

pub(crate) const PERMISSION_ACTIONS: [(&str, &str); 4] = [
    ("list", "View"),
    ("create", "Create"),
    ("update", "Edit"),
    ("delete", "Delete"),
];

/// Permission tree entry: one module node plus one action per CRUD operation
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGenerator;

impl ComponentGenerator for PermissionGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Permission
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SNIPPETS
    }
}

impl SnippetGenerator for PermissionGenerator {
    fn generate_snippets(&self, data: &TemplateData) -> Result<Vec<CodeSnippet>, CoreError> {
        let names = &data.names;
        let module = format!("system.{}", names.permission_prefix);

        let mut content = String::new();
        push_line!(
            content,
            "\t{{Code: \"{}\", Name: \"{}\", Parent: \"system\", Type: \"module\"}},",
            module, names.display
        );
        for (action, verb) in PERMISSION_ACTIONS {
            push_line!(
                content,
                "\t{{Code: \"{module}:{action}\", Name: \"{verb} {display}\", Parent: \"{module}\", Type: \"action\", APIs: \"{api}\"}},",
                module = module,
                action = action,
                verb = verb,
                display = names.display,
                api = names.api_base,
            );
        }

        Ok(vec![Placement {
            category: "permission",
            target_file: format!("{}/definitions/permissions.go", names.namespace_dir),
            marker: Some("permissions"),
            insertion_point: "in the permission definition list, before the permissions marker".to_string(),
            description: format!("Define {} permissions", names.display),
            priority: 1,
        }
        .into_snippet(data, content.trim_end().to_string())])
    }
}
