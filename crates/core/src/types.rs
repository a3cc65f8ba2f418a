use serde::Serialize;

/// Result of mapping a logical field type onto a Go type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedType {
    pub target: String,
    /// True when the emitted file must import the `time` package
    pub temporal: bool,
}

/// Logical type → target language type lookups
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

const STATUS_NAMES: &[&str] = &["status", "state", "enabled", "active"];

const INTEGER_TYPES: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
];

impl TypeMapper {
    pub fn new() -> Self {
        Self
    }

    /// Unknown logical types fall back to `string`. Anything that already looks
    /// like a qualified or pointer Go type passes through untouched.
    pub fn map_logical_type(&self, logical_type: &str) -> MappedType {
        let logical_type = logical_type.trim();
        if logical_type.contains('*') || logical_type.contains('.') {
            return MappedType {
                target: logical_type.to_string(),
                temporal: logical_type.contains("time.Time"),
            };
        }

        let target = match logical_type.to_lowercase().as_str() {
            "time" | "date" | "datetime" | "timestamp" => "*time.Time",
            "decimal" | "float64" => "float64",
            "float32" => "float32",
            "bool" | "boolean" => "bool",
            "text" | "json" | "string" => "string",
            other if INTEGER_TYPES.contains(&other) => {
                return MappedType {
                    target: other.to_string(),
                    temporal: false,
                }
            }
            _ => "string",
        };

        MappedType {
            target: target.to_string(),
            temporal: target.contains("time.Time"),
        }
    }

    /// TypeScript type for the frontend API typings
    pub fn typescript_type(&self, logical_type: &str) -> &'static str {
        let mapped = self.map_logical_type(logical_type);
        let base = mapped.target.trim_start_matches('*');
        match base {
            "string" | "time.Time" => "string",
            "float32" | "float64" => "number",
            "bool" => "boolean",
            other if INTEGER_TYPES.contains(&other) => "number",
            _ => "any",
        }
    }

    /// A status field is named like one and stores an integer or boolean flag
    pub fn is_status_field(&self, name: &str, logical_type: &str) -> bool {
        let name = name.to_lowercase();
        if !STATUS_NAMES.contains(&name.as_str()) {
            return false;
        }

        let mapped = self.map_logical_type(logical_type);
        let base = mapped.target.trim_start_matches('*');
        base == "bool" || INTEGER_TYPES.contains(&base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_logical_type() {
        let mapper = TypeMapper::new();

        assert_eq!(mapper.map_logical_type("string").target, "string");
        assert_eq!(mapper.map_logical_type("int64").target, "int64");
        assert_eq!(mapper.map_logical_type("decimal").target, "float64");
        assert_eq!(mapper.map_logical_type("text").target, "string");
        assert_eq!(mapper.map_logical_type("json").target, "string");
        assert_eq!(mapper.map_logical_type("mystery").target, "string");

        let date = mapper.map_logical_type("DateTime");
        assert_eq!(date.target, "*time.Time");
        assert!(date.temporal);
        assert!(!mapper.map_logical_type("decimal").temporal);
    }

    #[test]
    fn test_qualified_types_pass_through() {
        let mapper = TypeMapper::new();

        let mapped = mapper.map_logical_type("decimal.Decimal");
        assert_eq!(mapped.target, "decimal.Decimal");
        assert!(!mapped.temporal);

        let mapped = mapper.map_logical_type("time.Time");
        assert_eq!(mapped.target, "time.Time");
        assert!(mapped.temporal);
    }

    #[test]
    fn test_typescript_type() {
        let mapper = TypeMapper::new();

        assert_eq!(mapper.typescript_type("string"), "string");
        assert_eq!(mapper.typescript_type("uint"), "number");
        assert_eq!(mapper.typescript_type("decimal"), "number");
        assert_eq!(mapper.typescript_type("bool"), "boolean");
        assert_eq!(mapper.typescript_type("timestamp"), "string");
        assert_eq!(mapper.typescript_type("geo.Point"), "any");
    }

    #[test]
    fn test_status_field_detection() {
        let mapper = TypeMapper::new();

        assert!(mapper.is_status_field("Status", "int"));
        assert!(mapper.is_status_field("enabled", "bool"));
        assert!(mapper.is_status_field("State", "*int8"));
        assert!(!mapper.is_status_field("Status", "string"));
        assert!(!mapper.is_status_field("StatusText", "int"));
    }
}
