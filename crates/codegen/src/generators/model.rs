use super::{go_path, resolve_with_fallback, Capabilities, ComponentGenerator, FileGenerator, GenerateEnv, RenderTarget};
use crate::context::TemplateData;
use crudforge_core::{ComponentType, CoreError, GenerateRequest};

pub const MODEL_DIR: &str = "internal/shared/models";
pub const MODEL_TEMPLATE: &str = "model.go";

/// Persistence model shared by every namespace
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelGenerator;

impl ComponentGenerator for ModelGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Model
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FILES
    }
}

impl FileGenerator for ModelGenerator {
    fn output_paths(&self, data: &TemplateData) -> Vec<String> {
        vec![go_path(MODEL_DIR, &data.names.snake)]
    }

    fn generate(&self, request: &GenerateRequest, env: &GenerateEnv<'_>) -> Result<Vec<String>, CoreError> {
        let data = env.builder.build(request, &ComponentType::Model);
        let dir = resolve_with_fallback(env.templates_dir, env.builtin_dir, MODEL_TEMPLATE)?;

        let targets: Vec<RenderTarget> = self
            .output_paths(&data)
            .into_iter()
            .map(|path| RenderTarget {
                path,
                template: MODEL_TEMPLATE,
                dir: dir.clone(),
            })
            .collect();

        env.render_and_write(request, ComponentType::Model, &targets, &data)
    }
}
