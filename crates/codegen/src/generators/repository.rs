use super::{go_path, Capabilities, ComponentGenerator, FileGenerator, GenerateEnv, RenderTarget};
use crate::context::TemplateData;
use crudforge_core::{ComponentType, CoreError, GenerateRequest};

pub const REPOSITORY_TEMPLATE: &str = "repository.go";

#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryGenerator;

impl ComponentGenerator for RepositoryGenerator {
    fn component(&self) -> ComponentType {
        ComponentType::Repository
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FILES
    }
}

impl FileGenerator for RepositoryGenerator {
    fn output_paths(&self, data: &TemplateData) -> Vec<String> {
        let dir = format!("{}/repository", data.names.namespace_dir);
        vec![go_path(&dir, &data.names.snake)]
    }

    fn generate(&self, request: &GenerateRequest, env: &GenerateEnv<'_>) -> Result<Vec<String>, CoreError> {
        let data = env.builder.build(request, &ComponentType::Repository);
        let targets: Vec<RenderTarget> = self
            .output_paths(&data)
            .into_iter()
            .map(|path| RenderTarget {
                path,
                template: REPOSITORY_TEMPLATE,
                dir: env.templates_dir.to_path_buf(),
            })
            .collect();

        env.render_and_write(request, ComponentType::Repository, &targets, &data)
    }
}
