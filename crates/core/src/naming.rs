//! Pure string transforms shared by every generator: case conversion,
//! pluralization and identifier hygiene for the emitted Go sources.

use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym boundary pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("word boundary pattern"));

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("man", "men"),
    ("woman", "women"),
];

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const BRACKET_PAIRS: &[(&str, &str)] = &[
    ("(", ")"),
    ("（", "）"),
    ("[", "]"),
    ("【", "】"),
    ("{", "}"),
    ("｛", "｝"),
];

const LABEL_SUFFIXES: &[&str] = &["字段", "信息"];

/// `XMLHttpRequest` becomes `xml_http_request`; a run of capitals followed by a
/// lowercase letter is an acronym plus the start of a new word.
pub fn to_snake_case(s: &str) -> String {
    let s = ACRONYM_BOUNDARY.replace_all(s, "${1}_${2}");
    let s = WORD_BOUNDARY.replace_all(&s, "${1}_${2}");
    s.to_lowercase()
}

pub fn to_pascal_case(s: &str) -> String {
    if is_pascal_case(s) {
        return s.to_string();
    }

    split_words(s).map(capitalize).collect()
}

/// `user_profile` and `UserProfile` both become `userProfile`
pub fn to_camel_case(s: &str) -> String {
    to_lower_camel_case(&to_pascal_case(s))
}

/// Lowercase the first character, leave the rest untouched
pub fn to_lower_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// English plural of a lowercase word or snake_case compound.
///
/// Irregular forms apply to the last `_` segment, so `sales_person` pluralizes
/// to `sales_people`.
pub fn to_plural(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let word = word.to_lowercase();
    let (head, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word.as_str()),
    };

    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(single, _)| *single == last) {
        return format!("{}{}", head, plural);
    }

    if let Some(stem) = word.strip_suffix('y') {
        if let Some(prev) = stem.chars().last() {
            if !is_vowel(prev) {
                return format!("{}ies", stem);
            }
        }
    }

    if ["s", "sh", "ch", "x", "z"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }

    if let Some(stem) = word.strip_suffix('f') {
        return format!("{}ves", stem);
    }

    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{}ves", stem);
    }

    format!("{}s", word)
}

pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Coerce arbitrary input into an exported, legal, non-reserved identifier.
///
/// Idempotent: sanitizing an already sanitized name returns it unchanged.
pub fn sanitize_identifier(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len() + 1);
    for (i, c) in name.chars().enumerate() {
        if i == 0 && !(c.is_alphabetic() || c == '_') {
            sanitized.push('F');
            if c.is_ascii_digit() {
                sanitized.push(c);
            }
        } else if c.is_alphanumeric() || c == '_' {
            sanitized.push(c);
        }
    }

    if sanitized.is_empty() {
        return "Field".to_string();
    }

    if is_reserved_word(&sanitized) {
        sanitized.push_str("Field");
    }

    upper_first(&sanitized)
}

/// Strip bracketed asides (ASCII or full-width, nested included) and trailing
/// punctuation from a field comment.
pub fn clean_comment(comment: &str) -> String {
    let mut result = comment.to_string();
    for (open, close) in BRACKET_PAIRS {
        result = remove_bracketed(&result, open, close);
    }

    let mut result = result.trim();
    for punct in ["，", ",", "；", ";", "：", ":"] {
        result = result.strip_suffix(punct).unwrap_or(result);
    }
    result.trim().to_string()
}

/// UI label for a field: the comment up to the first comma, without a trailing
/// "field"/"info" suffix. Falls back to the field name when there is no comment.
pub fn display_label(comment: &str, field_name: &str) -> String {
    let head = comment
        .split(|c: char| c == ',' || c == '，')
        .next()
        .unwrap_or_default()
        .trim();

    let mut label = head;
    for suffix in LABEL_SUFFIXES {
        label = label.strip_suffix(suffix).unwrap_or(label);
    }

    let label = label.trim();
    if label.is_empty() {
        field_name.to_string()
    } else {
        label.to_string()
    }
}

fn split_words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn is_pascal_case(s: &str) -> bool {
    s.chars().next().map_or(false, char::is_uppercase) && s.chars().all(char::is_alphanumeric)
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn remove_bracketed(text: &str, open: &str, close: &str) -> String {
    let mut text = text.to_string();
    while let Some(start) = text.find(open) {
        match matching_close(&text, start + open.len(), open, close) {
            Some(end) => text.replace_range(start..end + close.len(), ""),
            None => {
                text.truncate(start);
                break;
            }
        }
    }
    text
}

fn matching_close(text: &str, from: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 1;
    let mut i = from;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with(open) {
            depth += 1;
            i += open.len();
        } else if rest.starts_with(close) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += close.len();
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}
