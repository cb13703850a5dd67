//! Immutable user profile records.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

use crate::error::ValidationError;

/// Identity fields of the signed-in user.
///
/// The record is opaque apart from `id` and `name`; it is frozen on
/// construction and shared by reference count, so clones are cheap and no
/// holder can mutate what another sees.
#[derive(Clone, PartialEq)]
pub struct UserProfile {
    fields: Rc<Map<String, Value>>,
}

impl UserProfile {
    /// Build a profile from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProfile`] for `null` and
    /// [`ValidationError::InvalidProfile`] for any non-object value.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: Rc::new(map.clone()),
            }),
            Value::Null => Err(ValidationError::MissingProfile),
            other => Err(ValidationError::InvalidProfile(kind_of(other))),
        }
    }

    /// The user identifier, normalised to a string.
    ///
    /// Numeric ids (as issued by chat platforms) are rendered in decimal.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => integer_id(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        ["name", "first_name", "username"]
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
    }
}

impl fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfile")
            .field("id", &self.id())
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl Serialize for UserProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// JavaScript numbers arrive as floats; integral ones are printed without a fraction.
#[allow(clippy::cast_possible_truncation)] // Only integral values within the exact f64 range are cast.
fn integer_id(n: &serde_json::Number) -> Option<String> {
    if let Some(v) = n.as_u64() {
        return Some(v.to_string());
    }
    if let Some(v) = n.as_i64() {
        return Some(v.to_string());
    }
    let v = n.as_f64()?;
    let in_range = v.is_finite() && v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0;
    in_range.then(|| (v as i64).to_string())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_objects_and_exposes_identity() {
        let profile = UserProfile::from_value(&json!({"id": "u1", "name": "Ada"})).unwrap();
        assert_eq!(profile.id().as_deref(), Some("u1"));
        assert_eq!(profile.name(), Some("Ada"));
    }

    #[test]
    fn numeric_ids_are_normalised() {
        let profile =
            UserProfile::from_value(&json!({"id": 123_456_789, "first_name": "Bo"})).unwrap();
        assert_eq!(profile.id().as_deref(), Some("123456789"));
        assert_eq!(profile.name(), Some("Bo"));
    }

    #[test]
    fn float_encoded_ids_drop_the_fraction() {
        let profile = UserProfile::from_value(&json!({"id": 42.0})).unwrap();
        assert_eq!(profile.id().as_deref(), Some("42"));
        let profile = UserProfile::from_value(&json!({"id": 4.5})).unwrap();
        assert!(profile.id().is_none());
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(
            UserProfile::from_value(&Value::Null),
            Err(ValidationError::MissingProfile)
        );
        assert_eq!(
            UserProfile::from_value(&json!("u1")),
            Err(ValidationError::InvalidProfile("string"))
        );
        assert_eq!(
            UserProfile::from_value(&json!([1, 2])),
            Err(ValidationError::InvalidProfile("array"))
        );
    }

    #[test]
    fn copy_is_detached_from_source() {
        let mut source = json!({"id": "u1"});
        let profile = UserProfile::from_value(&source).unwrap();
        source["id"] = json!("changed");
        assert_eq!(profile.id().as_deref(), Some("u1"));
    }

    #[test]
    fn blank_id_counts_as_missing() {
        let profile = UserProfile::from_value(&json!({"id": "  "})).unwrap();
        assert!(profile.id().is_none());
    }
}
