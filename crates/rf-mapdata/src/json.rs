//! Reading definition records
//!
//! Definitions arrive as JSON objects. [`FieldReader`] implements the
//! mandatory/optional member rules: a mandatory member may only be omitted
//! when the record patches an already loaded definition, and an omitted
//! optional member resets to its default unless the record is a patch.
//! Malformed members are reported to [`Diagnostics`] and keep their value.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Errors raised while reading definition records
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("expected a JSON array of objects")]
    NotAnArray,

    #[error("missing member \"{0}\"")]
    MissingMember(String),

    #[error("member \"{key}\": {source}")]
    InvalidMember {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Borrowed view of one JSON object
#[derive(Debug, Clone, Copy)]
pub struct JsonObject<'a> {
    members: &'a Map<String, Value>,
}

impl<'a> JsonObject<'a> {
    pub fn new(value: &'a Value) -> Result<Self, JsonError> {
        value
            .as_object()
            .map(|members| Self { members })
            .ok_or(JsonError::NotAnObject)
    }

    pub fn has_member(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn has_string(&self, key: &str) -> bool {
        matches!(self.members.get(key), Some(Value::String(_)))
    }

    pub fn has_array(&self, key: &str) -> bool {
        matches!(self.members.get(key), Some(Value::Array(_)))
    }

    pub fn has_object(&self, key: &str) -> bool {
        matches!(self.members.get(key), Some(Value::Object(_)))
    }

    pub fn has_number(&self, key: &str) -> bool {
        matches!(self.members.get(key), Some(Value::Number(_)))
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.members.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.members.get(key).and_then(Value::as_str)
    }

    pub fn get_object(&self, key: &str) -> Option<JsonObject<'a>> {
        self.members
            .get(key)
            .and_then(Value::as_object)
            .map(|members| JsonObject { members })
    }

    /// Read and convert one member; `None` if it is absent
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, JsonError>> {
        self.members.get(key).map(|value| {
            T::deserialize(value).map_err(|source| JsonError::InvalidMember {
                key: key.to_string(),
                source,
            })
        })
    }
}

/// Member reader for one definition record.
pub struct FieldReader<'j, 'd> {
    obj: JsonObject<'j>,
    /// True when the record patches an existing definition (or copies one)
    pub was_loaded: bool,
    context: String,
    diag: &'d mut Diagnostics,
}

impl<'j, 'd> FieldReader<'j, 'd> {
    pub fn new(
        obj: JsonObject<'j>,
        was_loaded: bool,
        context: impl Into<String>,
        diag: &'d mut Diagnostics,
    ) -> Self {
        Self {
            obj,
            was_loaded,
            context: context.into(),
            diag,
        }
    }

    pub fn obj(&self) -> JsonObject<'j> {
        self.obj
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Reader over a nested object, reporting under its own context
    pub fn nested<'s>(
        &'s mut self,
        obj: JsonObject<'j>,
        context: impl Into<String>,
    ) -> FieldReader<'j, 's> {
        FieldReader {
            obj,
            was_loaded: false,
            context: context.into(),
            diag: &mut *self.diag,
        }
    }

    pub fn report(&mut self, message: impl Into<String>) {
        self.diag.report(self.context.clone(), message);
    }

    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diag
    }

    /// Parse `key` if present; a malformed value is reported and `None` returned
    pub fn read<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        match self.obj.read(key)? {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(err.to_string());
                None
            }
        }
    }

    pub fn mandatory<T: DeserializeOwned>(&mut self, key: &str, target: &mut T) {
        if self.obj.has_member(key) {
            if let Some(value) = self.read(key) {
                *target = value;
            }
        } else if !self.was_loaded {
            self.report(JsonError::MissingMember(key.to_string()).to_string());
        }
    }

    pub fn optional<T: DeserializeOwned>(&mut self, key: &str, target: &mut T, default: T) {
        if self.obj.has_member(key) {
            match self.read(key) {
                Some(value) => *target = value,
                None if !self.was_loaded => *target = default,
                None => {}
            }
        } else if !self.was_loaded {
            *target = default;
        }
    }

    /// Like [`optional`](Self::optional) with `T::default()`
    pub fn optional_default<T: DeserializeOwned + Default>(&mut self, key: &str, target: &mut T) {
        self.optional(key, target, T::default());
    }

    /// Overwrite `target` only if `key` is present
    pub fn assign<T: DeserializeOwned>(&mut self, key: &str, target: &mut T) -> bool {
        match self.read(key) {
            Some(value) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    pub fn get_bool(&mut self, key: &str, default: bool) -> bool {
        self.read(key).unwrap_or(default)
    }

    pub fn get_int(&mut self, key: &str, default: i32) -> i32 {
        self.read(key).unwrap_or(default)
    }

    pub fn get_string(&mut self, key: &str, default: &str) -> String {
        self.read(key).unwrap_or_else(|| default.to_string())
    }

    /// String array member; absent reads as empty
    pub fn get_string_array(&mut self, key: &str) -> Vec<String> {
        self.read(key).unwrap_or_default()
    }
}

/// Split a JSON document into its records: either one object or an array of them
pub fn records(value: &Value) -> Result<Vec<&Value>, JsonError> {
    match value {
        Value::Object(_) => Ok(vec![value]),
        Value::Array(items) => Ok(items.iter().collect()),
        _ => Err(JsonError::NotAnArray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mandatory_missing_reports() {
        let value = json!({ "name": "wall" });
        let obj = JsonObject::new(&value).unwrap();
        let mut diag = Diagnostics::new();
        let mut reader = FieldReader::new(obj, false, "terrain t_wall", &mut diag);
        let mut name = String::new();
        let mut cost = 7;
        reader.mandatory("name", &mut name);
        reader.mandatory("move_cost", &mut cost);
        assert_eq!(name, "wall");
        assert_eq!(cost, 7);
        assert!(diag.contains("missing member \"move_cost\""));
    }

    #[test]
    fn test_mandatory_missing_on_patch_is_silent() {
        let value = json!({});
        let obj = JsonObject::new(&value).unwrap();
        let mut diag = Diagnostics::new();
        let mut reader = FieldReader::new(obj, true, "terrain t_wall", &mut diag);
        let mut cost = 7;
        reader.mandatory("move_cost", &mut cost);
        assert_eq!(cost, 7);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_optional_default_and_patch() {
        let value = json!({});
        let obj = JsonObject::new(&value).unwrap();
        let mut diag = Diagnostics::new();

        let mut coverage = 40;
        FieldReader::new(obj, false, "t", &mut diag).optional("coverage", &mut coverage, 0);
        assert_eq!(coverage, 0);

        let mut coverage = 40;
        FieldReader::new(obj, true, "t", &mut diag).optional("coverage", &mut coverage, 0);
        assert_eq!(coverage, 40);
    }

    #[test]
    fn test_malformed_member_keeps_value() {
        let value = json!({ "coverage": "lots" });
        let obj = JsonObject::new(&value).unwrap();
        let mut diag = Diagnostics::new();
        let mut coverage = 40;
        FieldReader::new(obj, true, "t", &mut diag).optional("coverage", &mut coverage, 0);
        assert_eq!(coverage, 40);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_records_shapes() {
        let single = json!({ "type": "terrain" });
        assert_eq!(records(&single).unwrap().len(), 1);
        let many = json!([{ "type": "terrain" }, { "type": "furniture" }]);
        assert_eq!(records(&many).unwrap().len(), 2);
        assert!(records(&json!(3)).is_err());
    }
}
