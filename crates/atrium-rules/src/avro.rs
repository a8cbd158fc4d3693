//! Structural diff between two Avro schemas.
//!
//! Works over the JSON form of the schemas. Record fields are compared by
//! name with default-awareness: a reader can fill a missing field only when
//! its schema declares a default. Primitive type changes along the Avro
//! promotion chain (int → long → float → double) count as widening.

use serde_json::Value;

use crate::{Breakage, DiffIssue};

const PROMOTION_CHAIN: [&str; 4] = ["int", "long", "float", "double"];

/// Walks `old` and `new` and returns every structural difference.
#[must_use]
pub fn diff(old: &Value, new: &Value) -> Vec<DiffIssue> {
    let mut issues = Vec::new();
    diff_schemas(old, new, "", &mut issues);
    issues
}

fn diff_schemas(old: &Value, new: &Value, path: &str, issues: &mut Vec<DiffIssue>) {
    match (type_name(old), type_name(new)) {
        (Some("record"), Some("record")) => diff_records(old, new, path, issues),
        (Some("enum"), Some("enum")) => diff_enums(old, new, path, issues),
        (Some(a), Some(b)) if a == b => {}
        (Some(a), Some(b)) => {
            let (old_rank, new_rank) = (promotion_rank(a), promotion_rank(b));
            match (old_rank, new_rank) {
                (Some(o), Some(n)) if n > o => issues.push(DiffIssue::new(
                    pointer(path),
                    Breakage::Forward,
                    format!("type widened from {a} to {b}"),
                )),
                (Some(o), Some(n)) if n < o => issues.push(DiffIssue::new(
                    pointer(path),
                    Breakage::Backward,
                    format!("type narrowed from {a} to {b}"),
                )),
                _ => issues.push(DiffIssue::new(
                    pointer(path),
                    Breakage::Both,
                    format!("type changed from {a} to {b}"),
                )),
            }
        }
        _ => issues.push(DiffIssue::new(
            pointer(path),
            Breakage::Both,
            "schema form changed",
        )),
    }
}

fn diff_records(old: &Value, new: &Value, path: &str, issues: &mut Vec<DiffIssue>) {
    if old.get("name") != new.get("name") {
        issues.push(DiffIssue::new(
            pointer(path),
            Breakage::Both,
            "record name changed",
        ));
    }

    let old_fields = field_map(old);
    let new_fields = field_map(new);

    for (name, old_field) in &old_fields {
        if !new_fields.contains_key(name.as_str()) && old_field.get("default").is_none() {
            issues.push(DiffIssue::new(
                format!("{}/fields/{name}", path),
                Breakage::Forward,
                format!("field '{name}' was removed and has no default in the old schema"),
            ));
        }
    }

    for (name, new_field) in &new_fields {
        if !old_fields.contains_key(name.as_str()) && new_field.get("default").is_none() {
            issues.push(DiffIssue::new(
                format!("{}/fields/{name}", path),
                Breakage::Backward,
                format!("field '{name}' was added without a default"),
            ));
        }
    }

    for (name, old_field) in &old_fields {
        if let Some(new_field) = new_fields.get(name.as_str()) {
            if let (Some(old_type), Some(new_type)) = (old_field.get("type"), new_field.get("type"))
            {
                diff_schemas(old_type, new_type, &format!("{path}/fields/{name}"), issues);
            }
        }
    }
}

fn diff_enums(old: &Value, new: &Value, path: &str, issues: &mut Vec<DiffIssue>) {
    let old_symbols = symbols(old);
    let new_symbols = symbols(new);

    for symbol in &old_symbols {
        if !new_symbols.contains(symbol) {
            issues.push(DiffIssue::new(
                pointer(path),
                Breakage::Backward,
                format!("enum symbol '{symbol}' was removed"),
            ));
        }
    }
    for symbol in &new_symbols {
        if !old_symbols.contains(symbol) {
            issues.push(DiffIssue::new(
                pointer(path),
                Breakage::Forward,
                format!("enum symbol '{symbol}' was added"),
            ));
        }
    }
}

/// The Avro type name of a schema in any of its JSON forms: a bare string,
/// an object with a `type` key, or a union (treated opaquely by name list).
fn type_name(schema: &Value) -> Option<&str> {
    match schema {
        Value::String(s) => Some(s.as_str()),
        Value::Object(_) => schema.get("type").and_then(Value::as_str),
        _ => None,
    }
}

fn promotion_rank(name: &str) -> Option<usize> {
    PROMOTION_CHAIN.iter().position(|t| *t == name)
}

fn field_map(record: &Value) -> std::collections::BTreeMap<String, &Value> {
    record
        .get("fields")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| {
                    f.get("name")
                        .and_then(Value::as_str)
                        .map(|n| (n.to_string(), f))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn symbols(schema: &Value) -> Vec<String> {
    schema
        .get("symbols")
        .and_then(Value::as_array)
        .map(|syms| {
            syms.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn pointer(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: serde_json::Value) -> serde_json::Value {
        json!({"type": "record", "name": "User", "fields": fields})
    }

    #[test]
    fn identical_records_have_no_issues() {
        let schema = record(json!([{"name": "id", "type": "long"}]));
        assert!(diff(&schema, &schema).is_empty());
    }

    #[test]
    fn field_added_without_default_breaks_backward() {
        let issues = diff(
            &record(json!([{"name": "id", "type": "long"}])),
            &record(json!([
                {"name": "id", "type": "long"},
                {"name": "email", "type": "string"}
            ])),
        );
        assert!(issues.iter().any(|i| i.breakage.breaks_backward()));
        assert!(!issues.iter().any(|i| i.breakage.breaks_forward()));
    }

    #[test]
    fn field_added_with_default_is_compatible() {
        let issues = diff(
            &record(json!([{"name": "id", "type": "long"}])),
            &record(json!([
                {"name": "id", "type": "long"},
                {"name": "email", "type": "string", "default": ""}
            ])),
        );
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn field_removed_without_default_breaks_forward() {
        let issues = diff(
            &record(json!([
                {"name": "id", "type": "long"},
                {"name": "email", "type": "string"}
            ])),
            &record(json!([{"name": "id", "type": "long"}])),
        );
        assert!(issues.iter().any(|i| i.breakage.breaks_forward()));
        assert!(!issues.iter().any(|i| i.breakage.breaks_backward()));
    }

    #[test]
    fn type_widening_is_backward_compatible() {
        let issues = diff(
            &record(json!([{"name": "n", "type": "int"}])),
            &record(json!([{"name": "n", "type": "long"}])),
        );
        assert!(!issues.iter().any(|i| i.breakage.breaks_backward()));
        assert!(issues.iter().any(|i| i.breakage.breaks_forward()));
    }

    #[test]
    fn incompatible_type_change_breaks_both() {
        let issues = diff(
            &record(json!([{"name": "n", "type": "string"}])),
            &record(json!([{"name": "n", "type": "bytes"}])),
        );
        assert!(issues.iter().any(|i| i.breakage.breaks_backward()));
        assert!(issues.iter().any(|i| i.breakage.breaks_forward()));
    }

    #[test]
    fn enum_symbol_removed_breaks_backward() {
        let issues = diff(
            &json!({"type": "enum", "name": "Suit", "symbols": ["HEARTS", "SPADES"]}),
            &json!({"type": "enum", "name": "Suit", "symbols": ["HEARTS"]}),
        );
        assert!(issues.iter().any(|i| i.breakage.breaks_backward()));
    }
}
