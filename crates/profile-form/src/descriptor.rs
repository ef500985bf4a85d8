//! Field descriptors: the declarative input consumed by a form host.
//!
//! A descriptor is ephemeral: it is derived on every relevant input change and
//! never persisted. Serialised, it is a flat JSON object tagged by `type`:
//!
//! ```json
//! { "name": "email", "title": "Email", "read_only": false, "required": true,
//!   "type": "email", "initial_value": "a@x.com" }
//! ```

use profile_core::{Group, GroupId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Field type ──────────────────────────────────────────────────────────────

/// The discriminant of a [`FieldKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
  Text,
  Email,
  Select,
  Content,
}

impl FieldType {
  /// Input types produce a value on submit; `content` is display-only.
  pub fn is_input(self) -> bool { !matches!(self, Self::Content) }
}

/// Selection mode of a `select` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
  #[default]
  Multiple,
}

/// One choice in a `select` field. `name` is the label shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
  pub name:  String,
  pub value: GroupId,
}

impl From<&Group> for SelectOption {
  fn from(group: &Group) -> Self {
    Self { name: group.name.clone(), value: group.id }
  }
}

/// Body of a display-only `content` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldContent {
  /// A plain status line, e.g. the loading indicator.
  Text(String),
  /// The subject's groups, rendered by the host as a list.
  Groups(Vec<Group>),
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Type-specific attributes of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
  Text {
    initial_value: String,
  },
  Email {
    initial_value: String,
  },
  Select {
    mode:          SelectMode,
    options:       Vec<SelectOption>,
    initial_value: Vec<GroupId>,
    loading:       bool,
    placeholder:   String,
  },
  Content {
    content: FieldContent,
  },
}

impl FieldKind {
  pub fn field_type(&self) -> FieldType {
    match self {
      Self::Text { .. } => FieldType::Text,
      Self::Email { .. } => FieldType::Email,
      Self::Select { .. } => FieldType::Select,
      Self::Content { .. } => FieldType::Content,
    }
  }
}

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// A fully resolved field, ready for a form host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
  pub name:      String,
  pub title:     String,
  pub read_only: bool,
  pub required:  bool,
  #[serde(flatten)]
  pub kind:      FieldKind,
}

impl FieldDescriptor {
  pub fn field_type(&self) -> FieldType { self.kind.field_type() }

  pub fn is_input(&self) -> bool { self.field_type().is_input() }

  /// The value a host should seed this field with, or `None` for
  /// display-only fields and selects whose options are still loading.
  pub fn initial_value(&self) -> Option<Value> {
    match &self.kind {
      FieldKind::Text { initial_value } | FieldKind::Email { initial_value } => {
        Some(Value::String(initial_value.clone()))
      }
      FieldKind::Select { loading: true, .. } | FieldKind::Content { .. } => None,
      FieldKind::Select { initial_value, .. } => Some(Value::from(initial_value.clone())),
    }
  }
}

// ─── Merge rule ──────────────────────────────────────────────────────────────

/// Attributes applied uniformly to every field of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefaults {
  pub required:  bool,
  pub read_only: bool,
}

/// A per-field literal before the uniform defaults are applied.
///
/// A literal `required` wins over the default; `read_only` has no per-field
/// literal and always comes from [`FieldDefaults`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
  pub name:     &'static str,
  pub title:    &'static str,
  pub required: Option<bool>,
  pub kind:     FieldKind,
}

impl FieldSpec {
  pub fn new(name: &'static str, title: &'static str, kind: FieldKind) -> Self {
    Self { name, title, required: None, kind }
  }

  pub fn resolve(self, defaults: FieldDefaults) -> FieldDescriptor {
    FieldDescriptor {
      name:      self.name.to_string(),
      title:     self.title.to_string(),
      read_only: defaults.read_only,
      required:  self.required.unwrap_or(defaults.required),
      kind:      self.kind,
    }
  }
}
