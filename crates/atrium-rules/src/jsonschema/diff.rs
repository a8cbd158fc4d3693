//! Recursive structural diff between two JSON Schema documents.
//!
//! Every detected change is classified by the direction it breaks:
//! a change that makes the new schema accept **less** than the old one
//! (tightening) breaks backward compatibility, a change that makes it accept
//! **more** (loosening) breaks forward compatibility, and an incomparable
//! change breaks both. The caller filters the issues by the configured level.
//!
//! Recursing under `not` inverts the classification: tightening the negated
//! subschema loosens the enclosing one.

use super::{
    Additional, ArraySchema, CombinedSchema, CombinationKeyword, NumberSchema, ObjectSchema,
    SchemaNode, StringSchema,
};
use crate::{Breakage, DiffIssue};

const EPSILON: f64 = 1e-9;

/// Walks `old` and `new` and returns every structural difference.
#[must_use]
pub fn diff(old: &SchemaNode, new: &SchemaNode) -> Vec<DiffIssue> {
    let mut walker = Walker {
        issues: Vec::new(),
        flip: false,
    };
    walker.diff_nodes(old, new, "");
    walker.issues
}

struct Walker {
    issues: Vec<DiffIssue>,
    flip: bool,
}

impl Walker {
    fn push(&mut self, path: &str, breakage: Breakage, message: impl Into<String>) {
        let breakage = if self.flip { breakage.inverted() } else { breakage };
        let path = if path.is_empty() { "/" } else { path };
        self.issues.push(DiffIssue::new(path, breakage, message));
    }

    fn tightened(&mut self, path: &str, message: impl Into<String>) {
        self.push(path, Breakage::Backward, message);
    }

    fn loosened(&mut self, path: &str, message: impl Into<String>) {
        self.push(path, Breakage::Forward, message);
    }

    fn changed(&mut self, path: &str, message: impl Into<String>) {
        self.push(path, Breakage::Both, message);
    }

    #[allow(clippy::too_many_lines)]
    fn diff_nodes(&mut self, old: &SchemaNode, new: &SchemaNode, path: &str) {
        use SchemaNode::{
            Anything, Array, BooleanType, Combined, Const, Enum, Not, Nothing, NullType, Number,
            Object, Reference, Str, TypeSet,
        };

        match (old, new) {
            (Anything, Anything)
            | (Nothing, Nothing)
            | (BooleanType, BooleanType)
            | (NullType, NullType) => {}

            (Anything, Nothing) => self.tightened(path, "schema no longer accepts any value"),
            (Nothing, Anything) => self.loosened(path, "schema now accepts any value"),
            (Anything, _) => self.tightened(
                path,
                format!("unconstrained schema was constrained to {}", new.kind_name()),
            ),
            (_, Anything) => self.loosened(
                path,
                format!("{} constraint was removed", old.kind_name()),
            ),
            (Nothing, _) => self.loosened(path, "schema accepting nothing was relaxed"),
            (_, Nothing) => self.tightened(path, "schema no longer accepts any value"),

            (Const(a), Const(b)) => {
                if a != b {
                    self.changed(path, format!("const value changed from {a} to {b}"));
                }
            }
            (Const(a), Enum(values)) => {
                if values.contains(a) {
                    self.loosened(path, "const was relaxed to an enum containing it");
                } else {
                    self.changed(path, "const was replaced by an enum without the original value");
                }
            }
            (Enum(values), Const(b)) => {
                if values.len() == 1 && values[0] == *b {
                    // Singleton enum and const are equivalent.
                } else if values.contains(b) {
                    self.tightened(path, "enum was narrowed to a single const value");
                } else {
                    self.changed(path, "enum was replaced by a const outside the enum");
                }
            }
            (Enum(old_values), Enum(new_values)) => {
                for value in old_values {
                    if !new_values.contains(value) {
                        self.tightened(path, format!("enum value {value} was removed"));
                    }
                }
                for value in new_values {
                    if !old_values.contains(value) {
                        self.loosened(path, format!("enum value {value} was added"));
                    }
                }
            }

            (Object(a), Object(b)) => self.diff_objects(a, b, path),
            (Array(a), Array(b)) => self.diff_arrays(a, b, path),
            (Number(a), Number(b)) => self.diff_numbers(a, b, path),
            (Str(a), Str(b)) => self.diff_strings(a, b, path),

            (Combined(a), Combined(b)) => self.diff_combined(a, b, path),
            (Not(a), Not(b)) => {
                self.flip = !self.flip;
                self.diff_nodes(a, b, &join(path, "not"));
                self.flip = !self.flip;
            }
            (Reference(a), Reference(b)) => {
                if a != b {
                    self.changed(path, format!("reference target changed from {a} to {b}"));
                }
            }

            (TypeSet(a), TypeSet(b)) => {
                for name in a.difference(b) {
                    self.tightened(path, format!("type '{name}' is no longer allowed"));
                }
                for name in b.difference(a) {
                    self.loosened(path, format!("type '{name}' is now allowed"));
                }
            }
            (TypeSet(a), _) => match new.simple_type_name() {
                Some(name) if a.contains(name) && a.len() == 1 => {}
                Some(name) if a.contains(name) => {
                    self.tightened(path, format!("type set was narrowed to '{name}'"));
                }
                _ => self.changed(
                    path,
                    format!("type changed from a type set to {}", new.kind_name()),
                ),
            },
            (_, TypeSet(b)) => match old.simple_type_name() {
                Some(name) if b.contains(name) && b.len() == 1 => {}
                Some(name) if b.contains(name) => {
                    self.loosened(path, format!("type '{name}' was widened to a type set"));
                }
                _ => self.changed(
                    path,
                    format!("type changed from {} to a type set", old.kind_name()),
                ),
            },

            _ => self.changed(
                path,
                format!(
                    "type changed from {} to {}",
                    old.kind_name(),
                    new.kind_name()
                ),
            ),
        }
    }

    fn diff_objects(&mut self, old: &ObjectSchema, new: &ObjectSchema, path: &str) {
        for name in old.properties.keys() {
            if !new.properties.contains_key(name) {
                self.loosened(
                    &join(&join(path, "properties"), name),
                    format!("property '{name}' constraint was removed"),
                );
            }
        }

        // Adding an optional property constrains nothing under the open-world
        // default, so only required-set changes are reported.
        for name in new.required.difference(&old.required) {
            if new.defaults.contains(name) {
                continue;
            }
            self.tightened(
                &join(&join(path, "properties"), name),
                format!("property '{name}' is now required and has no default"),
            );
        }
        for name in old.required.difference(&new.required) {
            self.loosened(
                &join(&join(path, "properties"), name),
                format!("property '{name}' is no longer required"),
            );
        }

        match (&old.additional, &new.additional) {
            (Additional::Allowed, Additional::Forbidden) => {
                self.tightened(path, "additional properties are no longer allowed");
            }
            (Additional::Allowed, Additional::Schema(_)) => {
                self.tightened(path, "additional properties are now constrained");
            }
            (Additional::Forbidden, Additional::Allowed) => {
                self.loosened(path, "additional properties are now allowed");
            }
            (Additional::Forbidden, Additional::Schema(_)) => {
                self.loosened(path, "forbidden additional properties are now constrained only");
            }
            (Additional::Schema(_), Additional::Allowed) => {
                self.loosened(path, "additional property constraint was removed");
            }
            (Additional::Schema(_), Additional::Forbidden) => {
                self.tightened(path, "constrained additional properties are now forbidden");
            }
            (Additional::Schema(a), Additional::Schema(b)) => {
                self.diff_nodes(a, b, &join(path, "additionalProperties"));
            }
            (Additional::Allowed, Additional::Allowed)
            | (Additional::Forbidden, Additional::Forbidden) => {}
        }

        for (name, old_prop) in &old.properties {
            if let Some(new_prop) = new.properties.get(name) {
                self.diff_nodes(old_prop, new_prop, &join(&join(path, "properties"), name));
            }
        }
    }

    fn diff_arrays(&mut self, old: &ArraySchema, new: &ArraySchema, path: &str) {
        match (&old.items, &new.items) {
            (None, Some(_)) => self.tightened(path, "items constraint was added"),
            (Some(_), None) => self.loosened(path, "items constraint was removed"),
            (Some(a), Some(b)) => self.diff_nodes(a, b, &join(path, "items")),
            (None, None) => {}
        }

        self.diff_lower_bound(
            old.min_items.map(|v| v as f64),
            new.min_items.map(|v| v as f64),
            path,
            "minItems",
        );
        self.diff_upper_bound(
            old.max_items.map(|v| v as f64),
            new.max_items.map(|v| v as f64),
            path,
            "maxItems",
        );

        match (old.unique_items, new.unique_items) {
            (false, true) => self.tightened(path, "items must now be unique"),
            (true, false) => self.loosened(path, "items are no longer required to be unique"),
            _ => {}
        }
    }

    fn diff_numbers(&mut self, old: &NumberSchema, new: &NumberSchema, path: &str) {
        match (old.integer, new.integer) {
            (false, true) => self.tightened(path, "number was narrowed to integer"),
            (true, false) => self.loosened(path, "integer was widened to number"),
            _ => {}
        }

        self.diff_lower_bound(old.minimum, new.minimum, path, "minimum");
        self.diff_upper_bound(old.maximum, new.maximum, path, "maximum");

        match (old.exclusive_minimum, new.exclusive_minimum) {
            (false, true) => self.tightened(path, "minimum is now exclusive"),
            (true, false) => self.loosened(path, "minimum is no longer exclusive"),
            _ => {}
        }
        match (old.exclusive_maximum, new.exclusive_maximum) {
            (false, true) => self.tightened(path, "maximum is now exclusive"),
            (true, false) => self.loosened(path, "maximum is no longer exclusive"),
            _ => {}
        }

        match (old.multiple_of, new.multiple_of) {
            (None, Some(n)) => self.tightened(path, format!("multipleOf {n} was added")),
            (Some(_), None) => self.loosened(path, "multipleOf was removed"),
            (Some(o), Some(n)) => {
                if (o - n).abs() < EPSILON {
                    // Unchanged.
                } else if (n % o).abs() < EPSILON {
                    self.tightened(path, format!("multipleOf narrowed from {o} to {n}"));
                } else if (o % n).abs() < EPSILON {
                    self.loosened(path, format!("multipleOf widened from {o} to {n}"));
                } else {
                    self.changed(path, format!("multipleOf changed from {o} to {n}"));
                }
            }
            (None, None) => {}
        }
    }

    fn diff_strings(&mut self, old: &StringSchema, new: &StringSchema, path: &str) {
        self.diff_lower_bound(
            old.min_length.map(|v| v as f64),
            new.min_length.map(|v| v as f64),
            path,
            "minLength",
        );
        self.diff_upper_bound(
            old.max_length.map(|v| v as f64),
            new.max_length.map(|v| v as f64),
            path,
            "maxLength",
        );

        match (&old.pattern, &new.pattern) {
            (None, Some(p)) => self.tightened(path, format!("pattern '{p}' was added")),
            (Some(_), None) => self.loosened(path, "pattern was removed"),
            (Some(a), Some(b)) if a != b => {
                self.changed(path, format!("pattern changed from '{a}' to '{b}'"));
            }
            _ => {}
        }
    }

    fn diff_combined(&mut self, old: &CombinedSchema, new: &CombinedSchema, path: &str) {
        if old.keyword != new.keyword {
            self.changed(
                path,
                format!(
                    "combination keyword changed from {} to {}",
                    old.keyword.as_str(),
                    new.keyword.as_str()
                ),
            );
            return;
        }

        let keyword = old.keyword.as_str();
        let (old_len, new_len) = (old.subschemas.len(), new.subschemas.len());
        if new_len > old_len {
            // An extra conjunct tightens; an extra alternative loosens.
            match old.keyword {
                CombinationKeyword::AllOf => {
                    self.tightened(path, format!("{keyword} branch was added"));
                }
                CombinationKeyword::AnyOf | CombinationKeyword::OneOf => {
                    self.loosened(path, format!("{keyword} alternative was added"));
                }
            }
        } else if new_len < old_len {
            match old.keyword {
                CombinationKeyword::AllOf => {
                    self.loosened(path, format!("{keyword} branch was removed"));
                }
                CombinationKeyword::AnyOf | CombinationKeyword::OneOf => {
                    self.tightened(path, format!("{keyword} alternative was removed"));
                }
            }
        }

        for (i, (a, b)) in old.subschemas.iter().zip(new.subschemas.iter()).enumerate() {
            self.diff_nodes(a, b, &join(&join(path, keyword), &i.to_string()));
        }
    }

    /// Lower bounds: raising tightens, lowering or removing loosens.
    fn diff_lower_bound(&mut self, old: Option<f64>, new: Option<f64>, path: &str, keyword: &str) {
        match (old, new) {
            (None, Some(n)) => self.tightened(path, format!("{keyword} {n} was added")),
            (Some(_), None) => self.loosened(path, format!("{keyword} was removed")),
            (Some(o), Some(n)) => {
                if n > o + EPSILON {
                    self.tightened(path, format!("{keyword} was raised from {o} to {n}"));
                } else if n < o - EPSILON {
                    self.loosened(path, format!("{keyword} was lowered from {o} to {n}"));
                }
            }
            (None, None) => {}
        }
    }

    /// Upper bounds: lowering tightens, raising or removing loosens.
    fn diff_upper_bound(&mut self, old: Option<f64>, new: Option<f64>, path: &str, keyword: &str) {
        match (old, new) {
            (None, Some(n)) => self.tightened(path, format!("{keyword} {n} was added")),
            (Some(_), None) => self.loosened(path, format!("{keyword} was removed")),
            (Some(o), Some(n)) => {
                if n < o - EPSILON {
                    self.tightened(path, format!("{keyword} was lowered from {o} to {n}"));
                } else if n > o + EPSILON {
                    self.loosened(path, format!("{keyword} was raised from {o} to {n}"));
                }
            }
            (None, None) => {}
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    format!("{path}/{segment}")
}
