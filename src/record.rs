//! Typed view over an open component record.
//!
//! Records are arbitrary JSON. [`ComponentRecord`] borrows one and exposes the
//! fields the query endpoints understand (`title`, `description`, `props`,
//! `examples`) as `Option`s, so a missing or oddly-typed field is an absence
//! rather than an error.

use serde_json::{Map, Value};

/// Borrowed view of one component's JSON value.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRecord<'a>(&'a Value);

impl<'a> ComponentRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// The raw JSON value backing this record.
    pub fn value(&self) -> &'a Value {
        self.0
    }

    /// Any top-level field, whatever its type.
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    pub fn title(&self) -> Option<&'a str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.0.get("description").and_then(Value::as_str)
    }

    /// `props` when it is an object of prop name to metadata.
    pub fn props(&self) -> Option<&'a Map<String, Value>> {
        self.0.get("props").and_then(Value::as_object)
    }

    pub fn examples(&self) -> Option<&'a Vec<Value>> {
        self.0.get("examples").and_then(Value::as_array)
    }

    /// True when `props` holds anything truthy, whatever its shape.
    pub fn has_props(&self) -> bool {
        self.0.get("props").is_some_and(is_truthy)
    }

    /// True when `examples` is present with a non-zero length.
    pub fn has_examples(&self) -> bool {
        match self.0.get("examples") {
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }

    /// Look up a section by name, ignoring case.
    ///
    /// The lower-cased key wins; otherwise the first key equal to `name`
    /// ignoring case. Falsy values (`null`, `false`, `0`, `""`) count as
    /// absent.
    pub fn section(&self, name: &str) -> Option<&'a Value> {
        let fields = self.0.as_object()?;
        let lowered = name.to_lowercase();
        fields
            .get(&lowered)
            .or_else(|| {
                fields
                    .iter()
                    .find(|(key, _)| key.to_lowercase() == lowered)
                    .map(|(_, value)| value)
            })
            .filter(|value| is_truthy(value))
    }

    /// Keys whose values are objects or arrays: the retrievable sections.
    pub fn section_names(&self) -> Vec<String> {
        self.0
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, value)| value.is_object() || value.is_array())
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// JavaScript-style truthiness for a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Case-insensitive substring test. `needle` must already be lower-cased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
