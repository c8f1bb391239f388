//! LK script records.
//!
//! Every scene object is written with the same two-statement idiom:
//!
//! ```text
//! O = create('<Category>');
//! property(O, {Name='<Name>', <Key1>=<Value1>, ...});
//! ```
//!
//! Field order is significant to the consumer and is kept exactly as the
//! fields were added.

use std::fmt;

/// Statement that resets the scene before any objects are created.
pub const CLEAR_SCENE: &str = "clear_scene();\n";

/// Object category in the target scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A solar panel surface.
    ActiveSurface,
    /// A building.
    Box,
    /// A tree.
    Tree,
}

impl Category {
    /// Category name as understood by `create(...)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ActiveSurface => "Active surface",
            Category::Box => "Box",
            Category::Tree => "Tree",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string.
    Text(String),
    /// Integer literal.
    Int(i64),
    /// Real number, shortest round-trip form.
    Real(f64),
}

impl Value {
    /// The numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Text(_) => None,
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{s}'"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" on integral reals
            Value::Real(r) => write!(f, "{r:?}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// One scene object: a category, a name, and a flat list of properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Object category.
    pub category: Category,
    /// Object name, emitted as the leading `Name` property.
    pub name: String,
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    /// Start a record with no properties besides its name.
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a property.
    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((key, value.into()));
        self
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Property keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "O = create('{}');", self.category)?;
        write!(f, "property(O, {{Name='{}'", self.name)?;
        for (key, value) in &self.fields {
            write!(f, ", {key}={value}")?;
        }
        writeln!(f, "}});")
    }
}
