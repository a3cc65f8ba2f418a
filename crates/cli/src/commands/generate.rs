use crate::GenerateArgs;
use console::style;
use crudforge_codegen::{apply_snippet, builtin_templates_dir, ApplyOutcome, CodeGenerator};
use crudforge_core::{
    CodeSnippet, ComponentType, CoreError, FieldDefinition, ForgeConfig, GenerateRequest,
    GenerateResponse,
};
use std::path::Path;
use tracing::{info, warn};

/// Returns whether the generation succeeded
pub fn run(mut config: ForgeConfig, args: &GenerateArgs) -> Result<bool, CoreError> {
    let request = build_request(args)?;

    if !config.templates_path().exists() {
        warn!(
            "templates directory {} not found, using the bundled templates",
            config.templates_path().display()
        );
        config = config.with_templates_dir(builtin_templates_dir());
    }

    let root = config.output_root.clone();
    let generator = CodeGenerator::from_config(config);
    let response = generator.generate(&request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    if args.apply_snippets && !response.code_snippets.is_empty() {
        apply_all(&root, &response.code_snippets, args.json);
    }

    Ok(response.success)
}

fn build_request(args: &GenerateArgs) -> Result<GenerateRequest, CoreError> {
    let mut request = match &args.request {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CoreError::file_operation("read request", path.display(), e))?;
            GenerateRequest::from_json(&content)?
        }
        None => {
            let (component, model) = match (&args.component, &args.model) {
                (Some(component), Some(model)) => (component, model),
                _ => {
                    return Err(CoreError::configuration(
                        "a component and a model name are required unless --request is given",
                    ))
                }
            };
            GenerateRequest::new(ComponentType::from(component.clone()), model.clone())
        }
    };

    if args.request.is_some() {
        if let Some(component) = &args.component {
            request.component_type = ComponentType::from(component.clone());
        }
        if let Some(model) = &args.model {
            request.model_name = model.clone();
        }
    }

    if let Some(fields) = &args.fields {
        request.fields = parse_fields(fields)?;
    }
    if let Some(table) = &args.table {
        request.table_name = Some(table.clone());
    }
    if let Some(package) = &args.package {
        request.package_path = package.clone();
    }
    if let Some(display_name) = &args.display_name {
        request.display_name = Some(display_name.clone());
    }

    if args.overwrite {
        request.options.overwrite_existing = true;
    }
    if args.no_format {
        request.options.format_code = false;
    }
    if args.no_optimize_imports {
        request.options.optimize_imports = false;
    }

    Ok(request)
}

/// Parse `name:type[:comment],...`. The comment keeps any further colons,
/// and commas unless the text after one starts a new `name:` entry.
pub fn parse_fields(input: &str) -> Result<Vec<FieldDefinition>, CoreError> {
    split_entries(input)
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let name = parts.next().unwrap_or_default().trim();
            let logical_type = parts.next().map(str::trim).unwrap_or_default();
            if name.is_empty() || logical_type.is_empty() {
                return Err(CoreError::configuration(format!(
                    "invalid field '{}', expected name:type[:comment]",
                    entry
                )));
            }

            let field = FieldDefinition::new(name, logical_type);
            Ok(match parts.next().map(str::trim) {
                Some(comment) if !comment.is_empty() => field.with_comment(comment),
                _ => field,
            })
        })
        .collect()
}

/// Only an entry that already has a comment absorbs a following segment
fn split_entries(input: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for segment in input.split(',') {
        match entries.last_mut() {
            Some(last) if !starts_entry(segment) && last.matches(':').count() >= 2 => {
                last.push(',');
                last.push_str(segment);
            }
            _ => entries.push(segment.to_string()),
        }
    }
    entries
}

fn starts_entry(segment: &str) -> bool {
    let segment = segment.trim_start();
    match segment.split_once(':') {
        Some((name, _)) => {
            let name = name.trim_end();
            name.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

fn print_response(response: &GenerateResponse) {
    if response.success {
        println!("{} {}", style("✓").green().bold(), response.message);
    } else {
        println!("{} {}", style("✗").red().bold(), response.message);
    }

    for file in &response.generated_files {
        println!("  {} {}", style("+").green(), file);
    }

    for snippet in &response.code_snippets {
        println!();
        println!(
            "{} {} {}",
            style(&snippet.id).cyan().bold(),
            style("→").dim(),
            snippet.target_file
        );
        println!("  {}", style(&snippet.insertion_point).dim());
        for line in snippet.content.lines() {
            println!("  {}", line);
        }
    }

    for error in &response.errors {
        println!("  {} {}", style("✗").red(), error);
    }

    if response.history_updated {
        println!("{}", style("History updated").dim());
    }
}

fn apply_all(root: &Path, snippets: &[CodeSnippet], quiet: bool) {
    let mut ordered: Vec<&CodeSnippet> = snippets.iter().collect();
    ordered.sort_by_key(|snippet| snippet.priority);

    for snippet in ordered {
        let line = match apply_snippet(root, snippet) {
            Ok(ApplyOutcome::Merged) => {
                format!("{} merged {} into {}", style("✓").green(), snippet.id, snippet.target_file)
            }
            Ok(ApplyOutcome::Created) => {
                format!("{} created {}", style("✓").green(), snippet.target_file)
            }
            Ok(ApplyOutcome::AlreadyPresent) => {
                format!("{} {} already present", style("-").dim(), snippet.id)
            }
            Ok(ApplyOutcome::Skipped(reason)) => {
                info!("skipped snippet {}: {}", snippet.id, reason);
                format!("{} skipped {}: {}", style("!").yellow(), snippet.id, reason)
            }
            Err(e) => {
                warn!("failed to apply snippet {}: {}", snippet.id, e);
                format!("{} {}: {}", style("✗").red(), snippet.id, e)
            }
        };

        if quiet {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields("Name:string:Product name, Price:decimal , ReleasedAt:date:Release: UTC").unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "Name");
        assert_eq!(fields[0].logical_type, "string");
        assert_eq!(fields[0].comment, "Product name");
        assert_eq!(fields[1].logical_type, "decimal");
        assert!(fields[1].comment.is_empty());
        assert_eq!(fields[2].comment, "Release: UTC");
    }

    #[test]
    fn test_parse_fields_rejects_missing_type() {
        assert!(parse_fields("Name").is_err());
        assert!(parse_fields("Name:string,:int").is_err());
        assert!(parse_fields("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_fields_comment_with_commas() {
        let fields = parse_fields("Name:string:Product name, shown in lists").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].comment, "Product name, shown in lists");

        let fields = parse_fields("Name:string:Label, short, Price:decimal:Unit price, in cents").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].comment, "Label, short");
        assert_eq!(fields[1].name, "Price");
        assert_eq!(fields[1].comment, "Unit price, in cents");
    }

    #[test]
    fn test_parse_fields_stray_segment_without_comment_fails() {
        assert!(parse_fields("Name:string, shown in lists").is_err());
    }
}
