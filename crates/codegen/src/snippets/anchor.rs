//! Anchor resolution and splicing for snippets.
//!
//! Hand-maintained files carry marker comments such as
//! `// <<<FORGE:INSERT routes>>>`; a snippet's `insertBefore`/`insertAfter`
//! is a regular expression located in the target's current content.

use crudforge_core::{CodeSnippet, CoreError};
use regex::Regex;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Marker comment for an insertion point of the given kind
pub fn marker(kind: &str) -> String {
    format!("// <<<FORGE:INSERT {}>>>", kind)
}

/// `insertBefore` pattern matching [`marker`] literally
pub fn marker_pattern(kind: &str) -> String {
    regex::escape(&marker(kind))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Splice {
    Merged(String),
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Merged,
    Created,
    AlreadyPresent,
    Skipped(String),
}

/// Byte offset in `content` where `snippet` goes.
///
/// `insertAfter` wins: the offset is the start of the line after its first
/// match. Otherwise `insertBefore` gives the start of the line holding its first
/// match. With no anchor the snippet is appended.
pub fn resolve_insertion(content: &str, snippet: &CodeSnippet) -> Result<usize, CoreError> {
    if let Some(pattern) = non_empty(&snippet.insert_after) {
        let found = compile(pattern, snippet)?
            .find(content)
            .ok_or_else(|| not_found(pattern, snippet))?;
        return Ok(match content[found.end()..].find('\n') {
            Some(newline) => found.end() + newline + 1,
            None => content.len(),
        });
    }

    if let Some(pattern) = non_empty(&snippet.insert_before) {
        let found = compile(pattern, snippet)?
            .find(content)
            .ok_or_else(|| not_found(pattern, snippet))?;
        return Ok(content[..found.start()].rfind('\n').map_or(0, |newline| newline + 1));
    }

    Ok(content.len())
}

pub fn splice(content: &str, snippet: &CodeSnippet) -> Result<Splice, CoreError> {
    let fragment = snippet.content.trim_end();
    if !fragment.trim().is_empty() && content.contains(fragment) {
        return Ok(Splice::AlreadyPresent);
    }

    let offset = resolve_insertion(content, snippet)?;
    let mut merged = String::with_capacity(content.len() + fragment.len() + 2);
    merged.push_str(&content[..offset]);
    if offset > 0 && !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(fragment);
    merged.push('\n');
    merged.push_str(&content[offset..]);

    Ok(Splice::Merged(merged))
}

/// Merge `snippet` into its target under `root`.
///
/// An existing target with an anchor is merged in place; a missing target with
/// no anchor is created from the snippet. Anything else is skipped.
pub fn apply_snippet(root: &Path, snippet: &CodeSnippet) -> Result<ApplyOutcome, CoreError> {
    let path = root.join(&snippet.target_file);
    let anchored = has_anchor(snippet);

    match (path.exists(), anchored) {
        (true, true) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| CoreError::file_operation("read", path.display(), e))?;
            match splice(&content, snippet)? {
                Splice::AlreadyPresent => {
                    debug!("snippet {} already in {}", snippet.id, snippet.target_file);
                    Ok(ApplyOutcome::AlreadyPresent)
                }
                Splice::Merged(merged) => {
                    replace_contents(&path, &merged)?;
                    info!("merged snippet {} into {}", snippet.id, snippet.target_file);
                    Ok(ApplyOutcome::Merged)
                }
            }
        }
        (false, false) => {
            let mut content = snippet.content.trim_end().to_string();
            content.push('\n');
            replace_contents(&path, &content)?;
            info!("created {} from snippet {}", snippet.target_file, snippet.id);
            Ok(ApplyOutcome::Created)
        }
        (true, false) => Ok(ApplyOutcome::Skipped(format!(
            "{} exists and the snippet has no anchor",
            snippet.target_file
        ))),
        (false, true) => Ok(ApplyOutcome::Skipped(format!(
            "{} does not exist; add the {} anchor first",
            snippet.target_file, snippet.insertion_point
        ))),
    }
}

fn has_anchor(snippet: &CodeSnippet) -> bool {
    non_empty(&snippet.insert_after).is_some() || non_empty(&snippet.insert_before).is_some()
}

fn non_empty(anchor: &Option<String>) -> Option<&str> {
    anchor.as_deref().filter(|a| !a.is_empty())
}

fn compile(pattern: &str, snippet: &CodeSnippet) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|e| {
        CoreError::anchor(&snippet.target_file, format!("invalid anchor '{}': {}", pattern, e))
    })
}

fn not_found(pattern: &str, snippet: &CodeSnippet) -> CoreError {
    CoreError::anchor(&snippet.target_file, format!("anchor '{}' not found", pattern))
}

fn replace_contents(path: &Path, content: &str) -> Result<(), CoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| CoreError::file_operation("create directory", dir.display(), e))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| CoreError::file_operation("create temporary file", dir.display(), e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| CoreError::file_operation("write", path.display(), e))?;
    temp.persist(path)
        .map_err(|e| CoreError::file_operation("write", path.display(), e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snippet(content: &str, before: Option<&str>, after: Option<&str>) -> CodeSnippet {
        CodeSnippet {
            id: "routes_product".to_string(),
            content: content.to_string(),
            target_file: "internal/admin/routes/routes.go".to_string(),
            insertion_point: "routes marker".to_string(),
            insert_before: before.map(str::to_string),
            insert_after: after.map(str::to_string),
            description: String::new(),
            priority: 1,
            category: "routes".to_string(),
        }
    }

    const FILE: &str = "func Register() {\n\tusers()\n\t// <<<FORGE:INSERT routes>>>\n}\n";

    #[test]
    fn test_insert_before_is_line_start() {
        let s = snippet("\tproducts()", Some(&marker_pattern("routes")), None);
        let offset = resolve_insertion(FILE, &s).unwrap();
        assert_eq!(&FILE[offset..], "\t// <<<FORGE:INSERT routes>>>\n}\n");
    }

    #[test]
    fn test_insert_after_wins() {
        let s = snippet("\tproducts()", Some(&marker_pattern("routes")), Some(r"users\(\)"));
        let offset = resolve_insertion(FILE, &s).unwrap();
        assert_eq!(&FILE[offset..], "\t// <<<FORGE:INSERT routes>>>\n}\n");

        let s = snippet("x", None, Some(r"func Register"));
        assert_eq!(resolve_insertion(FILE, &s).unwrap(), "func Register() {\n".len());
    }

    #[test]
    fn test_no_anchor_appends() {
        let s = snippet("x", None, None);
        assert_eq!(resolve_insertion(FILE, &s).unwrap(), FILE.len());
    }

    #[test]
    fn test_missing_anchor_is_an_error() {
        let s = snippet("x", Some(&marker_pattern("wire")), None);
        let err = resolve_insertion(FILE, &s).unwrap_err();
        assert!(matches!(err, CoreError::Anchor { .. }));
        assert!(err.to_string().contains("internal/admin/routes/routes.go"));
    }

    #[test]
    fn test_splice_keeps_marker_and_is_idempotent() {
        let s = snippet("\tproducts()", Some(&marker_pattern("routes")), None);
        let merged = match splice(FILE, &s).unwrap() {
            Splice::Merged(merged) => merged,
            Splice::AlreadyPresent => panic!("expected merge"),
        };
        assert_eq!(
            merged,
            "func Register() {\n\tusers()\n\tproducts()\n\t// <<<FORGE:INSERT routes>>>\n}\n"
        );
        assert_eq!(splice(&merged, &s).unwrap(), Splice::AlreadyPresent);
    }

    #[test]
    fn test_apply_snippet_cases() {
        let temp_dir = TempDir::new().unwrap();
        let anchored = snippet("\tproducts()", Some(&marker_pattern("routes")), None);

        let outcome = apply_snippet(temp_dir.path(), &anchored).unwrap();
        assert!(matches!(outcome, ApplyOutcome::Skipped(_)));

        let target = temp_dir.path().join(&anchored.target_file);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, FILE).unwrap();
        assert_eq!(apply_snippet(temp_dir.path(), &anchored).unwrap(), ApplyOutcome::Merged);
        assert_eq!(apply_snippet(temp_dir.path(), &anchored).unwrap(), ApplyOutcome::AlreadyPresent);

        let mut whole_file = snippet("export const a = 1", None, None);
        whole_file.target_file = "web/src/api/product.ts".to_string();
        assert_eq!(apply_snippet(temp_dir.path(), &whole_file).unwrap(), ApplyOutcome::Created);
        let created = std::fs::read_to_string(temp_dir.path().join("web/src/api/product.ts")).unwrap();
        assert_eq!(created, "export const a = 1\n");
        assert!(matches!(
            apply_snippet(temp_dir.path(), &whole_file).unwrap(),
            ApplyOutcome::Skipped(_)
        ));
    }
}
