use super::{go_path, Capabilities, ComponentGenerator, FileGenerator, GenerateEnv, RenderTarget};
use crate::context::TemplateData;
use crudforge_core::{ComponentType, CoreError, GenerateRequest};

pub const SERVICE_TEMPLATE: &str = "service.go";

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceGenerator;

impl ComponentGenerator for ServiceGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Service
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FILES
    }
}

impl FileGenerator for ServiceGenerator {
    fn output_paths(&self, data: &TemplateData) -> Vec<String> {
        let dir = format!("{}/service", data.names.namespace_dir);
        vec![go_path(&dir, &data.names.snake)]
    }

    fn generate(&self, request: &GenerateRequest, env: &GenerateEnv<'_>) -> Result<Vec<String>, CoreError> {
        let data = env.builder.build(request, &ComponentType::Service);
        let targets: Vec<RenderTarget> = self
            .output_paths(&data)
            .into_iter()
            .map(|path| RenderTarget {
                path,
                template: SERVICE_TEMPLATE,
                dir: env.templates_dir.to_path_buf(),
            })
            .collect();

        env.render_and_write(request, ComponentType::Service, &targets, &data)
    }
}
