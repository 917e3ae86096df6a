//! Declarative shape of a cloud-config document
//!
//! A [`Schema`] is an immutable tree describing what each key may hold. The
//! process-wide cloud-config schema lives in [`CLOUD_CONFIG`] and is built on
//! first use.

mod cloud_config;

pub use cloud_config::CLOUD_CONFIG;

use cloud_config_yaml::{MappingEntry, Node, NodeKind};
use regex::Regex;
use std::borrow::Cow;
use yaml_rust2::Yaml;

/// Expected shape of one slot in the document.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Any scalar, optionally constrained by a pattern
    String(StringSchema),
    Int,
    /// Integers are accepted where a float is expected
    Float,
    Bool,
    /// A sequence whose elements match the inner schema
    List(Box<Schema>),
    /// A mapping with a fixed set of known keys
    Struct(StructSchema),
}

/// String slot.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    /// Non-empty values must match this pattern
    pub pattern: Option<Regex>,
}

/// Struct slot: named fields, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct StructSchema {
    fields: Vec<(String, Schema)>,
}

impl StructSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    /// Look up a field by its (normalized) name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, schema)| schema)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    /// A string whose non-empty values must match `pattern`.
    pub fn string_matching(pattern: Regex) -> Self {
        Schema::String(StringSchema {
            pattern: Some(pattern),
        })
    }

    pub fn list(item: Schema) -> Self {
        Schema::List(Box::new(item))
    }

    /// Shorthand for a list of strings.
    pub fn strings() -> Self {
        Self::list(Self::string())
    }

    pub fn structure(schema: StructSchema) -> Self {
        Schema::Struct(schema)
    }

    /// Name used in type diagnostics (`string`, `[]struct`, ...).
    pub fn human_type(&self) -> Cow<'static, str> {
        match self {
            Schema::String(_) => Cow::Borrowed("string"),
            Schema::Int => Cow::Borrowed("int"),
            Schema::Float => Cow::Borrowed("float64"),
            Schema::Bool => Cow::Borrowed("bool"),
            Schema::List(item) => Cow::Owned(format!("[]{}", item.human_type())),
            Schema::Struct(_) => Cow::Borrowed("struct"),
        }
    }

    /// Whether `node` has a shape this slot accepts.
    ///
    /// Only the shape is judged: any scalar fits a string slot, whatever its
    /// text looks like. A null node means "unset" and fits everywhere.
    pub fn accepts(&self, node: &Node) -> bool {
        match (self, &node.kind) {
            (_, NodeKind::Null) => true,
            (Schema::String(_), NodeKind::Scalar(_)) => true,
            (Schema::Int, NodeKind::Scalar(s)) => matches!(s.value, Yaml::Integer(_)),
            (Schema::Float, NodeKind::Scalar(s)) => {
                matches!(s.value, Yaml::Integer(_) | Yaml::Real(_))
            }
            (Schema::Bool, NodeKind::Scalar(s)) => matches!(s.value, Yaml::Boolean(_)),
            (Schema::List(_), NodeKind::Sequence(_)) => true,
            (Schema::Struct(_), NodeKind::Mapping(_)) => true,
            _ => false,
        }
    }

    /// Value pattern, for string slots that carry one.
    pub fn pattern(&self) -> Option<&Regex> {
        match self {
            Schema::String(s) => s.pattern.as_ref(),
            _ => None,
        }
    }
}

/// Normalize a key the way cloud-config loaders do: `-` is read as `_`.
pub fn normalize_key(name: &str) -> Cow<'_, str> {
    if name.contains('-') {
        Cow::Owned(name.replace('-', "_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Get a mapping value by normalized key; the last matching entry wins.
pub(crate) fn child<'a>(node: &'a Node, name: &str) -> Option<&'a MappingEntry> {
    node.find_entry(|key| normalize_key(key) == name)
}
