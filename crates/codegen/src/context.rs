//! Per-layer rendering contexts.
//!
//! Every derived identifier is computed once in [`ModelNames`] so sibling
//! artifacts (repository, service, handler, snippets) agree on names.

use chrono::{DateTime, Utc};
use crudforge_core::naming::{
    clean_comment, display_label, sanitize_identifier, to_kebab_case, to_lower_camel_case,
    to_plural, to_snake_case,
};
use crudforge_core::{ComponentType, FieldDefinition, GenerateRequest, TypeMapper};
use serde::Serialize;

/// Output namespace inferred from the request's package path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Admin,
    Master,
    Shared,
}

impl Namespace {
    pub fn from_package_path(package_path: &str) -> Self {
        if package_path.contains("admin") {
            Self::Admin
        } else if package_path.contains("master") {
            Self::Master
        } else {
            Self::Shared
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Master => "master",
            Self::Shared => "shared",
        }
    }

    /// Root directory of the namespace, relative to the output root
    pub fn dir(&self) -> String {
        format!("internal/{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelNames {
    pub model: String,
    pub display: String,
    pub lower_camel: String,
    pub snake: String,
    pub kebab: String,
    pub plural_kebab: String,
    pub table: String,
    pub namespace: Namespace,
    pub namespace_dir: String,
    pub repository: String,
    pub repository_impl: String,
    pub service: String,
    pub service_impl: String,
    pub handler: String,
    pub handler_field: String,
    pub create_request: String,
    pub update_request: String,
    pub list_request: String,
    pub response: String,
    pub route_path: String,
    pub api_base: String,
    pub permission_prefix: String,
}

impl ModelNames {
    pub fn from_request(request: &GenerateRequest) -> Self {
        let model = request.model_name.clone();
        let lower_camel = to_lower_camel_case(&model);
        let snake = to_snake_case(&model);
        let kebab = to_kebab_case(&model);
        let namespace = Namespace::from_package_path(&request.package_path);

        Self {
            display: request.resolved_display_name(),
            plural_kebab: to_plural(&snake).replace('_', "-"),
            table: request.resolved_table_name(),
            namespace_dir: namespace.dir(),
            namespace,
            repository: format!("{}Repository", model),
            repository_impl: format!("{}RepositoryImpl", lower_camel),
            service: format!("{}Service", model),
            service_impl: format!("{}ServiceImpl", model),
            handler: format!("{}Handler", model),
            handler_field: format!("{}Handler", lower_camel),
            create_request: format!("{}CreateRequest", model),
            update_request: format!("{}UpdateRequest", model),
            list_request: format!("{}ListRequest", model),
            response: format!("{}Response", model),
            route_path: format!("/{}", kebab),
            api_base: format!("/admin-api/{}", kebab),
            permission_prefix: snake.clone(),
            model,
            lower_camel,
            snake,
            kebab,
        }
    }
}

/// One field, transformed for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldContext {
    /// Exported Go identifier
    pub name: String,
    pub source_name: String,
    pub logical_type: String,
    pub go_type: String,
    pub ts_type: String,
    pub ts_name: String,
    pub temporal: bool,
    pub json_key: String,
    pub storage_tag: String,
    pub validation_rule: String,
    pub required: bool,
    pub comment: String,
    pub clean_comment: String,
    pub label: String,
    pub is_status: bool,
}

impl FieldContext {
    pub fn from_definition(field: &FieldDefinition, mapper: &TypeMapper) -> Self {
        let mapped = mapper.map_logical_type(&field.logical_type);
        let name = sanitize_identifier(&field.name);
        let cleaned = clean_comment(&field.comment);

        Self {
            ts_type: mapper.typescript_type(&field.logical_type).to_string(),
            ts_name: to_lower_camel_case(&name),
            temporal: mapped.temporal,
            go_type: mapped.target,
            json_key: field.serialization_key(),
            storage_tag: field.storage_tag.trim().to_string(),
            validation_rule: field.validation_rule.trim().to_string(),
            required: field.validation_rule.contains("required"),
            label: display_label(&cleaned, &name),
            clean_comment: cleaned,
            comment: field.comment.clone(),
            is_status: mapper.is_status_field(&field.name, &field.logical_type),
            logical_type: field.logical_type.clone(),
            source_name: field.name.clone(),
            name,
        }
    }
}

/// Everything one layer's template may reference
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    pub component: String,
    pub package_name: String,
    pub module_name: String,
    pub names: ModelNames,
    pub fields: Vec<FieldContext>,
    /// At least one field maps to a temporal type
    pub has_time_field: bool,
    pub has_status_field: bool,
    pub has_validation: bool,
    pub generated_at: DateTime<Utc>,
}

/// Turns a validated request into a [`TemplateData`] for one component
#[derive(Debug, Clone)]
pub struct TemplateDataBuilder {
    module_name: String,
    mapper: TypeMapper,
}

impl TemplateDataBuilder {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            mapper: TypeMapper::new(),
        }
    }

    pub fn build(&self, request: &GenerateRequest, component: &ComponentType) -> TemplateData {
        let fields: Vec<FieldContext> = request
            .fields
            .iter()
            .map(|field| FieldContext::from_definition(field, &self.mapper))
            .collect();

        TemplateData {
            component: component.to_string(),
            package_name: package_name(component).to_string(),
            module_name: self.module_name.clone(),
            names: ModelNames::from_request(request),
            has_time_field: fields.iter().any(|f| f.temporal),
            has_status_field: fields.iter().any(|f| f.is_status),
            has_validation: fields.iter().any(|f| !f.validation_rule.is_empty()),
            fields,
            generated_at: Utc::now(),
        }
    }
}

fn package_name(component: &ComponentType) -> &'static str {
    match component {
        ComponentType::Model => "models",
        ComponentType::Repository => "repository",
        ComponentType::Service => "service",
        ComponentType::Handler => "handler",
        ComponentType::Routes => "routes",
        ComponentType::Migration => "initializer",
        ComponentType::Permission => "definitions",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest::new(ComponentType::Model, "OrderItem")
            .with_package_path("internal/admin")
            .with_field(FieldDefinition::new("Quantity", "int").with_comment("Quantity, units ordered"))
            .with_field(FieldDefinition::new("ShippedAt", "datetime"))
            .with_field(FieldDefinition::new("Status", "int").with_validation("required,oneof=0 1"))
    }

    #[test]
    fn test_model_names_follow_conventions() {
        let names = ModelNames::from_request(&request());

        assert_eq!(names.snake, "order_item");
        assert_eq!(names.kebab, "order-item");
        assert_eq!(names.plural_kebab, "order-items");
        assert_eq!(names.table, "order_items");
        assert_eq!(names.repository, "OrderItemRepository");
        assert_eq!(names.service_impl, "OrderItemServiceImpl");
        assert_eq!(names.create_request, "OrderItemCreateRequest");
        assert_eq!(names.handler_field, "orderItemHandler");
        assert_eq!(names.namespace, Namespace::Admin);
        assert_eq!(names.namespace_dir, "internal/admin");
        assert_eq!(names.api_base, "/admin-api/order-item");
    }

    #[test]
    fn test_namespace_inference() {
        assert_eq!(Namespace::from_package_path("app/internal/master"), Namespace::Master);
        assert_eq!(Namespace::from_package_path(""), Namespace::Shared);
        assert_eq!(Namespace::from_package_path("internal/admin/x"), Namespace::Admin);
    }

    #[test]
    fn test_field_contexts() {
        let data = TemplateDataBuilder::new("app").build(&request(), &ComponentType::Model);

        assert_eq!(data.package_name, "models");
        assert!(data.has_time_field);
        assert!(data.has_status_field);
        assert!(data.has_validation);

        let quantity = &data.fields[0];
        assert_eq!(quantity.go_type, "int");
        assert_eq!(quantity.json_key, "quantity");
        assert_eq!(quantity.label, "Quantity");
        assert_eq!(quantity.ts_type, "number");

        let shipped = &data.fields[1];
        assert_eq!(shipped.go_type, "*time.Time");
        assert_eq!(shipped.json_key, "shipped_at");
        assert_eq!(shipped.ts_name, "shippedAt");

        assert!(data.fields[2].required);
        assert!(data.fields[2].is_status);
    }

    #[test]
    fn test_no_time_field_without_temporal_types() {
        let request = GenerateRequest::new(ComponentType::Model, "Product")
            .with_field(FieldDefinition::new("Name", "string"))
            .with_field(FieldDefinition::new("Price", "decimal"));

        let data = TemplateDataBuilder::new("app").build(&request, &ComponentType::Model);
        assert!(!data.has_time_field);
        assert_eq!(data.fields[1].go_type, "float64");
    }
}
