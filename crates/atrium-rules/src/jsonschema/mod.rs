//! JSON Schema document grammar.
//!
//! A raw document is parsed into a [`SchemaNode`] tree with one variant per
//! schema construct. Classification follows keyword precedence: `$ref`, then
//! `const`/`enum`, then composition keywords, then the `type` keyword (or the
//! keywords that imply one). Exhaustive pattern matches over the node kinds
//! replace the deep wrapper-class hierarchies such grammars often grow.

mod diff;

pub use diff::diff;

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One parsed schema construct.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Accepts every instance (`{}` or `true`).
    Anything,
    /// Accepts no instance (`false`).
    Nothing,
    /// A single permitted value (`const`).
    Const(Value),
    /// A closed set of permitted values (`enum`).
    Enum(Vec<Value>),
    /// An object schema (`type: object`, `properties`, `required`, …).
    Object(ObjectSchema),
    /// An array schema (`type: array`, `items`, …).
    Array(ArraySchema),
    /// A numeric schema (`type: number`/`integer` and range keywords).
    Number(NumberSchema),
    /// A string schema (`type: string` and length/pattern keywords).
    Str(StringSchema),
    /// `type: boolean`.
    BooleanType,
    /// `type: null`.
    NullType,
    /// A composition of subschemas (`allOf`/`anyOf`/`oneOf`).
    Combined(CombinedSchema),
    /// A negated subschema (`not`).
    Not(Box<SchemaNode>),
    /// A reference to another schema (`$ref`).
    Reference(String),
    /// A `type` keyword listing several primitive type names.
    TypeSet(BTreeSet<String>),
}

/// Constraints of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Declared properties, by name.
    pub properties: BTreeMap<String, SchemaNode>,
    /// Names listed in `required`.
    pub required: BTreeSet<String>,
    /// Names of properties that declare a `default`.
    pub defaults: BTreeSet<String>,
    /// The `additionalProperties` policy.
    pub additional: Additional,
}

/// The `additionalProperties` policy of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Additional {
    /// Undeclared properties are accepted (the JSON Schema default).
    #[default]
    Allowed,
    /// Undeclared properties are rejected.
    Forbidden,
    /// Undeclared properties must match a schema.
    Schema(Box<SchemaNode>),
}

/// Constraints of an array schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    /// The schema every item must match, if constrained.
    pub items: Option<Box<SchemaNode>>,
    /// Minimum item count.
    pub min_items: Option<u64>,
    /// Maximum item count.
    pub max_items: Option<u64>,
    /// Whether items must be unique.
    pub unique_items: bool,
}

/// Constraints of a numeric schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    /// Whether the type is `integer` rather than `number`.
    pub integer: bool,
    /// Lower bound.
    pub minimum: Option<f64>,
    /// Upper bound.
    pub maximum: Option<f64>,
    /// Whether the lower bound is exclusive.
    pub exclusive_minimum: bool,
    /// Whether the upper bound is exclusive.
    pub exclusive_maximum: bool,
    /// Required divisor.
    pub multiple_of: Option<f64>,
}

/// Constraints of a string schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    /// Minimum length.
    pub min_length: Option<u64>,
    /// Maximum length.
    pub max_length: Option<u64>,
    /// Regular expression the value must match.
    pub pattern: Option<String>,
}

/// The composition keyword of a [`CombinedSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationKeyword {
    /// Every subschema must match.
    AllOf,
    /// At least one subschema must match.
    AnyOf,
    /// Exactly one subschema must match.
    OneOf,
}

impl CombinationKeyword {
    /// The keyword as written in a document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
        }
    }
}

/// A composition of subschemas.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSchema {
    /// Which composition keyword combined the subschemas.
    pub keyword: CombinationKeyword,
    /// The combined subschemas, in document order.
    pub subschemas: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Parses a JSON value into a schema node.
    ///
    /// Unknown or unsupported keywords are ignored; a document using none of
    /// the recognized keywords parses as [`SchemaNode::Anything`].
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::Anything,
            Value::Bool(false) => Self::Nothing,
            Value::Object(_) => Self::parse_object_form(value),
            _ => Self::Anything,
        }
    }

    fn parse_object_form(value: &Value) -> Self {
        if let Some(reference) = value.get("$ref").and_then(Value::as_str) {
            return Self::Reference(reference.to_string());
        }
        if let Some(konst) = value.get("const") {
            return Self::Const(konst.clone());
        }
        if let Some(values) = value.get("enum").and_then(Value::as_array) {
            return Self::Enum(values.clone());
        }
        for (key, keyword) in [
            ("allOf", CombinationKeyword::AllOf),
            ("anyOf", CombinationKeyword::AnyOf),
            ("oneOf", CombinationKeyword::OneOf),
        ] {
            if let Some(subs) = value.get(key).and_then(Value::as_array) {
                return Self::Combined(CombinedSchema {
                    keyword,
                    subschemas: subs.iter().map(Self::parse).collect(),
                });
            }
        }
        if let Some(inner) = value.get("not") {
            return Self::Not(Box::new(Self::parse(inner)));
        }

        match value.get("type") {
            Some(Value::String(name)) => Self::parse_typed(name, value),
            Some(Value::Array(names)) => Self::TypeSet(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => Self::parse_untyped(value),
        }
    }

    fn parse_typed(name: &str, value: &Value) -> Self {
        match name {
            "object" => Self::Object(parse_object_schema(value)),
            "array" => Self::Array(parse_array_schema(value)),
            "number" => Self::Number(parse_number_schema(value, false)),
            "integer" => Self::Number(parse_number_schema(value, true)),
            "string" => Self::Str(parse_string_schema(value)),
            "boolean" => Self::BooleanType,
            "null" => Self::NullType,
            _ => Self::Anything,
        }
    }

    /// Infers the node kind from constraint keywords when `type` is absent.
    fn parse_untyped(value: &Value) -> Self {
        if value.get("properties").is_some()
            || value.get("required").is_some()
            || value.get("additionalProperties").is_some()
        {
            return Self::Object(parse_object_schema(value));
        }
        if value.get("items").is_some() {
            return Self::Array(parse_array_schema(value));
        }
        if value.get("minimum").is_some()
            || value.get("maximum").is_some()
            || value.get("multipleOf").is_some()
        {
            return Self::Number(parse_number_schema(value, false));
        }
        if value.get("minLength").is_some()
            || value.get("maxLength").is_some()
            || value.get("pattern").is_some()
        {
            return Self::Str(parse_string_schema(value));
        }
        Self::Anything
    }

    /// A short name for the node kind, used in diff messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Anything => "unconstrained",
            Self::Nothing => "nothing",
            Self::Const(_) => "const",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Number(n) if n.integer => "integer",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::BooleanType => "boolean",
            Self::NullType => "null",
            Self::Combined(c) => c.keyword.as_str(),
            Self::Not(_) => "not",
            Self::Reference(_) => "$ref",
            Self::TypeSet(_) => "type set",
        }
    }

    /// The primitive type name this node constrains to, when it is a plain
    /// single-type schema. Used to compare against `type` arrays.
    #[must_use]
    pub fn simple_type_name(&self) -> Option<&'static str> {
        match self {
            Self::Object(_) => Some("object"),
            Self::Array(_) => Some("array"),
            Self::Number(n) if n.integer => Some("integer"),
            Self::Number(_) => Some("number"),
            Self::Str(_) => Some("string"),
            Self::BooleanType => Some("boolean"),
            Self::NullType => Some("null"),
            _ => None,
        }
    }
}

fn parse_object_schema(value: &Value) -> ObjectSchema {
    let mut schema = ObjectSchema::default();

    if let Some(props) = value.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            if prop.get("default").is_some() {
                schema.defaults.insert(name.clone());
            }
            schema.properties.insert(name.clone(), SchemaNode::parse(prop));
        }
    }
    if let Some(required) = value.get("required").and_then(Value::as_array) {
        schema.required = required
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    schema.additional = match value.get("additionalProperties") {
        Some(Value::Bool(false)) => Additional::Forbidden,
        Some(v @ Value::Object(_)) => Additional::Schema(Box::new(SchemaNode::parse(v))),
        _ => Additional::Allowed,
    };

    schema
}

fn parse_array_schema(value: &Value) -> ArraySchema {
    ArraySchema {
        items: value
            .get("items")
            .map(|v| Box::new(SchemaNode::parse(v))),
        min_items: value.get("minItems").and_then(Value::as_u64),
        max_items: value.get("maxItems").and_then(Value::as_u64),
        unique_items: value
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn parse_number_schema(value: &Value, integer: bool) -> NumberSchema {
    NumberSchema {
        integer,
        minimum: value.get("minimum").and_then(Value::as_f64),
        maximum: value.get("maximum").and_then(Value::as_f64),
        exclusive_minimum: value
            .get("exclusiveMinimum")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        exclusive_maximum: value
            .get("exclusiveMaximum")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        multiple_of: value.get("multipleOf").and_then(Value::as_f64),
    }
}

fn parse_string_schema(value: &Value) -> StringSchema {
    StringSchema {
        min_length: value.get("minLength").and_then(Value::as_u64),
        max_length: value.get("maxLength").and_then(Value::as_u64),
        pattern: value
            .get("pattern")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_boolean_schemas() {
        assert_eq!(SchemaNode::parse(&json!(true)), SchemaNode::Anything);
        assert_eq!(SchemaNode::parse(&json!(false)), SchemaNode::Nothing);
        assert_eq!(SchemaNode::parse(&json!({})), SchemaNode::Anything);
    }

    #[test]
    fn const_takes_precedence_over_type() {
        let node = SchemaNode::parse(&json!({"type": "string", "const": "a"}));
        assert_eq!(node, SchemaNode::Const(json!("a")));
    }

    #[test]
    fn parses_object_with_required_and_defaults() {
        let node = SchemaNode::parse(&json!({
            "type": "object",
            "properties": {
                "x": {"type": "string"},
                "y": {"type": "integer", "default": 0}
            },
            "required": ["x"]
        }));
        let SchemaNode::Object(obj) = node else {
            panic!("expected object schema");
        };
        assert!(obj.required.contains("x"));
        assert!(obj.defaults.contains("y"));
        assert!(!obj.defaults.contains("x"));
        assert_eq!(obj.additional, Additional::Allowed);
    }

    #[test]
    fn untyped_properties_imply_object() {
        let node = SchemaNode::parse(&json!({"properties": {"x": {"type": "string"}}}));
        assert!(matches!(node, SchemaNode::Object(_)));
    }

    #[test]
    fn parses_type_arrays() {
        let node = SchemaNode::parse(&json!({"type": ["string", "null"]}));
        let SchemaNode::TypeSet(types) = node else {
            panic!("expected type set");
        };
        assert!(types.contains("string"));
        assert!(types.contains("null"));
    }

    #[test]
    fn parses_composition() {
        let node = SchemaNode::parse(&json!({"anyOf": [{"type": "string"}, {"type": "null"}]}));
        let SchemaNode::Combined(combined) = node else {
            panic!("expected combined schema");
        };
        assert_eq!(combined.keyword, CombinationKeyword::AnyOf);
        assert_eq!(combined.subschemas.len(), 2);
    }

    #[test]
    fn parses_not_and_ref() {
        assert!(matches!(
            SchemaNode::parse(&json!({"not": {"type": "string"}})),
            SchemaNode::Not(_)
        ));
        assert_eq!(
            SchemaNode::parse(&json!({"$ref": "#/defs/a"})),
            SchemaNode::Reference("#/defs/a".to_string())
        );
    }
}
