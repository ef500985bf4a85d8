//! Submitted form values and the update request built from them.

use profile_core::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::FieldDescriptor;

/// Validated values produced by a form host, keyed by field name.
///
/// Only input-type fields contribute values; display-only fields are never
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(Map<String, Value>);

impl FormValues {
  pub fn new() -> Self { Self::default() }

  /// Seed values from the initial values of every input field in `fields`.
  pub fn from_initial(fields: &[FieldDescriptor]) -> Self {
    let map = fields
      .iter()
      .filter_map(|f| f.initial_value().map(|v| (f.name.clone(), v)))
      .collect();
    Self(map)
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.0.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&Value> { self.0.get(name) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Build the save request for subject `id`. Any `id` among the values is
  /// replaced, so edited input can never redirect the update.
  pub fn into_request(self, id: UserId) -> UpdateRequest {
    let mut map = self.0;
    map.insert("id".to_string(), Value::from(id));
    UpdateRequest(map)
  }
}

impl From<Map<String, Value>> for FormValues {
  fn from(map: Map<String, Value>) -> Self { Self(map) }
}

/// The body sent to the save transport: form values plus the subject id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UpdateRequest(Map<String, Value>);

impl UpdateRequest {
  pub fn id(&self) -> Option<UserId> { self.0.get("id").and_then(Value::as_i64) }

  pub fn get(&self, name: &str) -> Option<&Value> { self.0.get(name) }

  pub fn as_map(&self) -> &Map<String, Value> { &self.0 }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn request_id_overrides_submitted_id() {
    let mut values = FormValues::new();
    values.set("id", 99);
    values.set("name", "Ann");

    let request = values.into_request(7);
    assert_eq!(request.id(), Some(7));
    assert_eq!(request.get("name"), Some(&json!("Ann")));
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "id": 7, "name": "Ann" }));
  }

  #[test]
  fn request_without_submitted_id_gets_subject_id() {
    let request = FormValues::new().into_request(3);
    assert_eq!(request.as_map().len(), 1);
    assert_eq!(request.id(), Some(3));
  }
}
