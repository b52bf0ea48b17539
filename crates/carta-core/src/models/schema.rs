//! Flat field schemas and the records built from them.

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Map, Value};

use crate::repair::find_field;

/// An ordered set of named string fields with no nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Schema name, used in logs.
    pub name: &'static str,
    /// Field names in display and serialization order.
    pub fields: &'static [&'static str],
}

impl FieldSchema {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    /// Record with every field set to `""`.
    pub fn empty_record(&self) -> ExtractedRecord {
        ExtractedRecord {
            schema: *self,
            values: vec![String::new(); self.fields.len()],
        }
    }

    /// Take each field from a parsed object, defaulting to `""`.
    ///
    /// Unknown keys are ignored. Never fails.
    pub fn from_object(&self, object: &Map<String, Value>) -> ExtractedRecord {
        let values = self
            .fields
            .iter()
            .map(|field| object.get(*field).map(value_to_string).unwrap_or_default())
            .collect();

        ExtractedRecord {
            schema: *self,
            values,
        }
    }

    /// Recover each field independently from unparseable text.
    pub fn from_fallback(&self, text: &str) -> ExtractedRecord {
        let values = self
            .fields
            .iter()
            .map(|field| find_field(text, field).unwrap_or_default())
            .collect();

        ExtractedRecord {
            schema: *self,
            values,
        }
    }
}

/// String form of a parsed JSON value.
///
/// `null` becomes `""`, numbers and booleans keep their JSON text, and
/// arrays or objects are rendered as compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A value for every field of a [`FieldSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    schema: FieldSchema,
    values: Vec<String>,
}

impl ExtractedRecord {
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Value of a schema field, `None` for names outside the schema.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.position(field).map(|i| self.values[i].as_str())
    }

    /// Value of a schema field, `""` for names outside the schema.
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Move a field's value out, leaving `""` behind.
    pub fn take(&mut self, field: &str) -> String {
        match self.position(field) {
            Some(i) => std::mem::take(&mut self.values[i]),
            None => String::new(),
        }
    }

    /// `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.schema
            .fields
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// True when no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| *f == field)
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// A typed record the repair pipeline can produce.
pub trait Schema: Sized + Serialize {
    /// Schema name, used in logs.
    const NAME: &'static str;

    /// Prompt sent to the model alongside the image.
    fn prompt() -> &'static str;

    /// Build the record from a successfully parsed object.
    fn from_object(object: &Map<String, Value>) -> Self;

    /// Build the record from text that failed to parse.
    fn from_fallback(candidate: &str) -> Self;

    /// Advisory issues with the extracted data. Never alters the record.
    fn validate(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PARTY: FieldSchema = FieldSchema::new("party", &["name", "gstin"]);

    #[test]
    fn test_from_object_defaults_missing_fields() {
        let object = json!({"name": "Shop"});
        let record = PARTY.from_object(object.as_object().unwrap());
        assert_eq!(record.value("name"), "Shop");
        assert_eq!(record.get("gstin"), Some(""));
    }

    #[test]
    fn test_from_object_converts_non_strings() {
        let object = json!({"name": null, "gstin": 42});
        let record = PARTY.from_object(object.as_object().unwrap());
        assert_eq!(record.value("name"), "");
        assert_eq!(record.value("gstin"), "42");

        let object = json!({"name": ["a", "b"], "gstin": {"x": true}});
        let record = PARTY.from_object(object.as_object().unwrap());
        assert_eq!(record.value("name"), r#"["a","b"]"#);
        assert_eq!(record.value("gstin"), r#"{"x":true}"#);
    }

    #[test]
    fn test_field_lookup_is_case_sensitive_after_parse() {
        let object = json!({"NAME": "Shop"});
        let record = PARTY.from_object(object.as_object().unwrap());
        assert_eq!(record.value("name"), "");
    }

    #[test]
    fn test_serializes_in_schema_order() {
        let object = json!({"gstin": "G", "name": "N"});
        let record = PARTY.from_object(object.as_object().unwrap());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"name":"N","gstin":"G"}"#);
    }

    #[test]
    fn test_take_and_is_empty() {
        let mut record = PARTY.from_fallback(r#""name": "Shop""#);
        assert!(!record.is_empty());
        assert_eq!(record.take("name"), "Shop");
        assert_eq!(record.take("unknown"), "");
        assert!(record.is_empty());
        assert_eq!(PARTY.empty_record(), record);
    }
}
