//! Validation, rendering and writing for crudforge.
//!
//! [`CodeGenerator`] is the entry point: it validates a [`GenerateRequest`],
//! dispatches to the generator registered for the requested component and
//! records the outcome in the generation history.

pub mod context;
pub mod generators;
pub mod history;
pub mod snippets;
pub mod templates;
pub mod validator;
pub mod writer;

pub use context::{FieldContext, ModelNames, Namespace, TemplateData, TemplateDataBuilder};
pub use generators::{
    Capabilities, ComponentGenerator, FileGenerator, GenerateEnv, HandlerGenerator, ModelGenerator,
    RepositoryGenerator, ServiceGenerator, SnippetGenerator,
};
pub use history::{HistoryManager, HistoryStore, JsonFileStore, MemoryStore, Removal};
pub use snippets::{
    apply_snippet, ApplyOutcome, FrontendApiGenerator, FrontendFormGenerator, FrontendPageGenerator,
    FrontendRouteGenerator, MigrationGenerator, PermissionGenerator, RouteGenerator, WireGenerator,
};
pub use templates::{builtin_templates_dir, TemplateEngine};
pub use validator::Validator;
pub use writer::CodeWriter;

use crudforge_core::{
    CodeSnippet, ComponentType, CoreError, ForgeConfig, GenerateRequest, GenerateResponse,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A registered generator, tagged with what it produces
pub enum Stage {
    Files(Box<dyn FileGenerator>),
    Snippets(Box<dyn SnippetGenerator>),
}

impl Stage {
    pub fn component(&self) -> ComponentType {
        match self {
            Stage::Files(generator) => generator.component(),
            Stage::Snippets(generator) => generator.component(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Stage::Files(generator) => generator.capabilities(),
            Stage::Snippets(generator) => generator.capabilities(),
        }
    }

    pub fn files(&self) -> Result<&dyn FileGenerator, CoreError> {
        match self {
            Stage::Files(generator) if generator.capabilities().writes_files => Ok(generator.as_ref()),
            _ => Err(CoreError::unsupported(self.component(), "file generation")),
        }
    }

    pub fn snippets(&self) -> Result<&dyn SnippetGenerator, CoreError> {
        match self {
            Stage::Snippets(generator) if generator.capabilities().emits_snippets => {
                Ok(generator.as_ref())
            }
            _ => Err(CoreError::unsupported(self.component(), "snippet generation")),
        }
    }
}

/// One slot per concrete component type
#[derive(Default)]
pub struct GeneratorSet {
    model: Option<Stage>,
    repository: Option<Stage>,
    service: Option<Stage>,
    handler: Option<Stage>,
    routes: Option<Stage>,
    wire: Option<Stage>,
    migration: Option<Stage>,
    permission: Option<Stage>,
    frontend_api: Option<Stage>,
    frontend_page: Option<Stage>,
    frontend_form: Option<Stage>,
    frontend_route: Option<Stage>,
}

impl GeneratorSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in generator
    pub fn standard() -> Self {
        Self::empty()
            .with(Stage::Files(Box::new(ModelGenerator)))
            .with(Stage::Files(Box::new(RepositoryGenerator)))
            .with(Stage::Files(Box::new(ServiceGenerator)))
            .with(Stage::Files(Box::new(HandlerGenerator)))
            .with(Stage::Snippets(Box::new(RouteGenerator)))
            .with(Stage::Snippets(Box::new(WireGenerator)))
            .with(Stage::Snippets(Box::new(MigrationGenerator)))
            .with(Stage::Snippets(Box::new(PermissionGenerator)))
            .with(Stage::Snippets(Box::new(FrontendApiGenerator)))
            .with(Stage::Snippets(Box::new(FrontendPageGenerator)))
            .with(Stage::Snippets(Box::new(FrontendFormGenerator)))
            .with(Stage::Snippets(Box::new(FrontendRouteGenerator)))
    }

    /// Register `stage` in the slot for its component, replacing any previous one.
    /// Stages claiming `All` or an unknown component are dropped.
    pub fn with(mut self, stage: Stage) -> Self {
        let component = stage.component();
        match self.slot_mut(&component) {
            Some(slot) => *slot = Some(stage),
            None => warn!("cannot register a generator for '{}'", component),
        }
        self
    }

    pub fn get(&self, component: &ComponentType) -> Result<&Stage, CoreError> {
        self.slot(component)
            .ok_or_else(|| CoreError::unsupported(component, "generation"))
    }

    fn slot(&self, component: &ComponentType) -> Option<&Stage> {
        match component {
            ComponentType::Model => self.model.as_ref(),
            ComponentType::Repository => self.repository.as_ref(),
            ComponentType::Service => self.service.as_ref(),
            ComponentType::Handler => self.handler.as_ref(),
            ComponentType::Routes => self.routes.as_ref(),
            ComponentType::Wire => self.wire.as_ref(),
            ComponentType::Migration => self.migration.as_ref(),
            ComponentType::Permission => self.permission.as_ref(),
            ComponentType::FrontendApi => self.frontend_api.as_ref(),
            ComponentType::FrontendPage => self.frontend_page.as_ref(),
            ComponentType::FrontendForm => self.frontend_form.as_ref(),
            ComponentType::FrontendRoute => self.frontend_route.as_ref(),
            ComponentType::All | ComponentType::Unknown(_) => None,
        }
    }

    fn slot_mut(&mut self, component: &ComponentType) -> Option<&mut Option<Stage>> {
        match component {
            ComponentType::Model => Some(&mut self.model),
            ComponentType::Repository => Some(&mut self.repository),
            ComponentType::Service => Some(&mut self.service),
            ComponentType::Handler => Some(&mut self.handler),
            ComponentType::Routes => Some(&mut self.routes),
            ComponentType::Wire => Some(&mut self.wire),
            ComponentType::Migration => Some(&mut self.migration),
            ComponentType::Permission => Some(&mut self.permission),
            ComponentType::FrontendApi => Some(&mut self.frontend_api),
            ComponentType::FrontendPage => Some(&mut self.frontend_page),
            ComponentType::FrontendForm => Some(&mut self.frontend_form),
            ComponentType::FrontendRoute => Some(&mut self.frontend_route),
            ComponentType::All | ComponentType::Unknown(_) => None,
        }
    }
}

/// Validates requests, dispatches them to generators and records history
pub struct CodeGenerator<S> {
    config: ForgeConfig,
    generators: GeneratorSet,
    history: HistoryManager<S>,
    writer: CodeWriter,
    builder: TemplateDataBuilder,
    validator: Validator,
    builtin_dir: PathBuf,
}

impl CodeGenerator<JsonFileStore> {
    /// Standard generators with history kept in the configured JSON file
    pub fn from_config(config: ForgeConfig) -> Self {
        let store = JsonFileStore::new(config.history_path());
        let history = HistoryManager::new(store, config.output_root.clone());
        Self::new(config, history)
    }
}

impl<S: HistoryStore> CodeGenerator<S> {
    pub fn new(config: ForgeConfig, history: HistoryManager<S>) -> Self {
        Self {
            writer: CodeWriter::from_config(&config),
            builder: TemplateDataBuilder::new(config.module_name.clone()),
            validator: Validator::new(),
            generators: GeneratorSet::standard(),
            builtin_dir: builtin_templates_dir(),
            history,
            config,
        }
    }

    pub fn with_generators(mut self, generators: GeneratorSet) -> Self {
        self.generators = generators;
        self
    }

    /// Directory the Model generator falls back to
    pub fn with_builtin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.builtin_dir = dir.into();
        self
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager<S> {
        &self.history
    }

    /// Run one generation request. Every expected failure ends up in the
    /// response's `errors`.
    pub fn generate(&self, request: &GenerateRequest) -> GenerateResponse {
        debug!("validating {} request for {}", request.component_type, request.model_name);
        let errors = self.validator.validate(request);
        if errors.has_errors() {
            warn!("rejected request for '{}': {} problem(s)", request.model_name, errors.len());
            return GenerateResponse::failure(
                "validation failed",
                CoreError::validation(errors).messages(),
            );
        }

        match &request.component_type {
            ComponentType::All => self.generate_all(request),
            component if component.is_snippet() => match self.run_snippets(request, component) {
                Ok(snippets) => {
                    let message = format!("generated {} snippet(s) for {}", snippets.len(), component);
                    GenerateResponse::snippets(snippets, message)
                }
                Err(e) => GenerateResponse::failure(format!("{} generation failed", component), e.messages()),
            },
            component => match self.run_files(request, component) {
                Ok(files) => {
                    let message = format!("generated {} file(s) for {}", files.len(), component);
                    let mut response = GenerateResponse::files(files, message);
                    response.history_updated =
                        self.record(request, &[component.clone()], &response.generated_files);
                    response
                }
                Err(e) => GenerateResponse::failure(format!("{} generation failed", component), e.messages()),
            },
        }
    }

    /// Layers in order, then every snippet generator. A failed stage is
    /// reported and the rest still run.
    fn generate_all(&self, request: &GenerateRequest) -> GenerateResponse {
        let mut files = Vec::new();
        let mut snippets = Vec::new();
        let mut errors = Vec::new();
        let mut succeeded = Vec::new();

        for layer in ComponentType::LAYERS {
            match self.run_files(&request.for_component(layer.clone()), &layer) {
                Ok(written) => {
                    files.extend(written);
                    succeeded.push(layer);
                }
                Err(e) => {
                    warn!("{} stage failed: {}", layer, e);
                    errors.extend(e.messages().into_iter().map(|m| format!("{}: {}", layer, m)));
                }
            }
        }

        for component in ComponentType::SNIPPETS {
            match self.run_snippets(&request.for_component(component.clone()), &component) {
                Ok(produced) => snippets.extend(produced),
                Err(e) => {
                    warn!("{} snippets failed: {}", component, e);
                    errors.extend(e.messages().into_iter().map(|m| format!("{}: {}", component, m)));
                }
            }
        }

        let history_updated = !files.is_empty() && self.record(request, &succeeded, &files);
        let message = if errors.is_empty() {
            format!("generated {} file(s) and {} snippet(s)", files.len(), snippets.len())
        } else {
            format!(
                "generated {} file(s) and {} snippet(s) with {} error(s)",
                files.len(),
                snippets.len(),
                errors.len()
            )
        };

        GenerateResponse {
            success: errors.is_empty(),
            generated_files: files,
            code_snippets: snippets,
            message,
            history_updated,
            errors,
        }
    }

    fn run_files(&self, request: &GenerateRequest, component: &ComponentType) -> Result<Vec<String>, CoreError> {
        let generator = self.generators.get(component)?.files()?;
        let templates_dir = self.config.templates_path();
        let env = GenerateEnv {
            writer: &self.writer,
            builder: &self.builder,
            templates_dir: &templates_dir,
            builtin_dir: &self.builtin_dir,
        };
        debug!("running {} generator", component);
        generator.generate(request, &env)
    }

    fn run_snippets(&self, request: &GenerateRequest, component: &ComponentType) -> Result<Vec<CodeSnippet>, CoreError> {
        let generator = self.generators.get(component)?.snippets()?;
        let data = self.builder.build(request, component);
        debug!("running {} snippet generator", component);
        generator.generate_snippets(&data)
    }

    /// History failures never fail a generation that already wrote files
    fn record(&self, request: &GenerateRequest, components: &[ComponentType], files: &[String]) -> bool {
        match self.history.add(request, components, files.to_vec()) {
            Ok(()) => {
                info!("recorded {} file(s) for {}", files.len(), request.model_name);
                true
            }
            Err(e) => {
                warn!("failed to update history for {}: {}", request.model_name, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::FieldDefinition;
    use tempfile::TempDir;

    fn generator(root: &TempDir) -> CodeGenerator<MemoryStore> {
        let mut config = ForgeConfig::default()
            .with_output_root(root.path())
            .with_templates_dir(builtin_templates_dir());
        config.formatter.clear();
        config.import_optimizer.clear();
        let history = HistoryManager::new(MemoryStore::new(), root.path());
        CodeGenerator::new(config, history)
    }

    fn request(component: ComponentType) -> GenerateRequest {
        GenerateRequest::new(component, "Product")
            .with_package_path("internal/admin")
            .with_field(FieldDefinition::new("Name", "string"))
    }

    #[test]
    fn test_standard_set_covers_every_component() {
        let set = GeneratorSet::standard();
        for layer in ComponentType::LAYERS {
            assert!(set.get(&layer).unwrap().files().is_ok());
        }
        for component in ComponentType::SNIPPETS {
            assert!(set.get(&component).unwrap().snippets().is_ok());
        }
        assert!(set.get(&ComponentType::All).is_err());
    }

    #[test]
    fn test_capability_mismatch_is_unsupported() {
        let stage = Stage::Snippets(Box::new(RouteGenerator));
        assert!(matches!(stage.files(), Err(CoreError::Unsupported { .. })));
        assert!(stage.snippets().is_ok());
    }

    #[test]
    fn test_snippet_component_writes_nothing() {
        let root = TempDir::new().unwrap();
        let response = generator(&root).generate(&request(ComponentType::Routes));

        assert!(response.success, "{:?}", response.errors);
        assert!(response.generated_files.is_empty());
        assert_eq!(response.code_snippets.len(), 1);
        assert!(!response.history_updated);
        assert!(!root.path().join("internal").exists());
    }

    #[test]
    fn test_empty_slot_is_unsupported() {
        let root = TempDir::new().unwrap();
        let generator = generator(&root)
            .with_generators(GeneratorSet::empty().with(Stage::Files(Box::new(ModelGenerator))));

        let response = generator.generate(&request(ComponentType::Service));
        assert!(!response.success);
        assert!(response.errors[0].contains("service"));
        assert!(generator.history().get_all().unwrap().is_empty());
    }

    #[test]
    fn test_validation_failure_has_no_side_effects() {
        let root = TempDir::new().unwrap();
        let mut bad = request(ComponentType::Model);
        bad.model_name = "product".to_string();

        let response = generator(&root).generate(&bad);
        assert!(!response.success);
        assert_eq!(response.message, "validation failed");
        assert!(!root.path().join("internal").exists());
    }
}
