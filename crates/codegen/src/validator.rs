use crudforge_core::naming::{is_reserved_word, is_valid_identifier, sanitize_identifier};
use crudforge_core::{GenerateRequest, ValidationErrors};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

pub const MAX_MODEL_NAME_LEN: usize = 50;
pub const MAX_FIELDS: usize = 50;
pub const MAX_TABLE_NAME_LEN: usize = 64;

/// Structural and semantic request checks.
///
/// Every check runs; the result lists all failures in check order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, request: &GenerateRequest) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !request.component_type.is_known() {
            errors.push(
                "componentType",
                format!("unknown component type '{}'", request.component_type),
            );
        }

        self.validate_model_name(&request.model_name, &mut errors);
        self.validate_fields(request, &mut errors);

        if let Some(table_name) = request.table_name.as_deref().filter(|t| !t.is_empty()) {
            self.validate_table_name(table_name, &mut errors);
        }

        errors
    }

    fn validate_model_name(&self, name: &str, errors: &mut ValidationErrors) {
        const FIELD: &str = "modelName";

        if name.is_empty() {
            errors.push(FIELD, "must not be empty");
            return;
        }
        if name.chars().count() > MAX_MODEL_NAME_LEN {
            errors.push(FIELD, format!("must be at most {} characters", MAX_MODEL_NAME_LEN));
        }
        if !is_valid_identifier(name) {
            errors.push(FIELD, format!("'{}' is not a valid identifier", name));
        }
        if is_reserved_word(name) {
            errors.push(FIELD, format!("'{}' is a reserved word", name));
        }
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            errors.push(FIELD, "must start with an uppercase letter");
        }
    }

    fn validate_fields(&self, request: &GenerateRequest, errors: &mut ValidationErrors) {
        let fields = &request.fields;
        if fields.is_empty() {
            errors.push("fields", "at least one field is required");
            return;
        }
        if fields.len() > MAX_FIELDS {
            errors.push("fields", format!("at most {} fields are allowed", MAX_FIELDS));
        }

        let mut seen = HashSet::new();
        // Go identifier -> index of the first field rendered under it
        let mut identifiers: HashMap<String, usize> = HashMap::new();
        for (i, field) in fields.iter().enumerate() {
            let key = format!("fields[{}].name", i);

            if field.name.is_empty() {
                errors.push(key, "must not be empty");
            } else {
                if !is_valid_identifier(&field.name) {
                    errors.push(key.clone(), format!("'{}' is not a valid identifier", field.name));
                }
                if is_reserved_word(&field.name) {
                    errors.push(key.clone(), format!("'{}' is a reserved word", field.name));
                }
                if !seen.insert(field.name.as_str()) {
                    errors.push(key, format!("duplicate field name '{}'", field.name));
                } else {
                    match identifiers.entry(sanitize_identifier(&field.name)) {
                        Entry::Occupied(first) => errors.push(
                            key,
                            format!(
                                "'{}' renders as '{}', same as fields[{}]",
                                field.name,
                                first.key(),
                                first.get()
                            ),
                        ),
                        Entry::Vacant(slot) => {
                            slot.insert(i);
                        }
                    }
                }
            }

            if field.logical_type.trim().is_empty() {
                errors.push(format!("fields[{}].logicalType", i), "must not be empty");
            }
        }
    }

    fn validate_table_name(&self, table_name: &str, errors: &mut ValidationErrors) {
        const FIELD: &str = "tableName";

        if table_name.len() > MAX_TABLE_NAME_LEN {
            errors.push(FIELD, format!("must be at most {} characters", MAX_TABLE_NAME_LEN));
        }
        if !table_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            errors.push(FIELD, "may only contain lowercase letters, digits and underscores");
        }
    }
}
