use super::{go_path, Capabilities, ComponentGenerator, FileGenerator, GenerateEnv, RenderTarget};
use crate::context::TemplateData;
use crudforge_core::{ComponentType, CoreError, GenerateRequest};

pub const HANDLER_TEMPLATE: &str = "handler.go";
pub const HANDLER_TYPES_TEMPLATE: &str = "handler_types.go";

/// HTTP handler plus its companion request/response types file
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerGenerator;

impl ComponentGenerator for HandlerGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Handler
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FILES
    }
}

impl FileGenerator for HandlerGenerator {
    fn output_paths(&self, data: &TemplateData) -> Vec<String> {
        let ns = &data.names.namespace_dir;
        vec![
            go_path(&format!("{}/handler", ns), &data.names.snake),
            go_path(&format!("{}/types", ns), &format!("{}_types", data.names.snake)),
        ]
    }

    fn generate(&self, request: &GenerateRequest, env: &GenerateEnv<'_>) -> Result<Vec<String>, CoreError> {
        let data = env.builder.build(request, &ComponentType::Handler);
        let targets: Vec<RenderTarget> = self
            .output_paths(&data)
            .into_iter()
            .zip([HANDLER_TEMPLATE, HANDLER_TYPES_TEMPLATE])
            .map(|(path, template)| RenderTarget {
                path,
                template,
                dir: env.templates_dir.to_path_buf(),
            })
            .collect();

        env.render_and_write(request, ComponentType::Handler, &targets, &data)
    }
}
