//! Contracts with the surrounding application: the generic form host, the
//! identity provider, and the override registry.

use std::{collections::HashMap, sync::Arc};

use profile_core::ActorIdentity;

use crate::{
  descriptor::FieldDescriptor,
  form::UserInfoProps,
  submit::Feedback,
  values::FormValues,
};

// ─── Form host ───────────────────────────────────────────────────────────────

/// Called by the host once per user-initiated submit with validated values.
pub type SubmitHandler = Arc<dyn Fn(FormValues, Feedback) + Send + Sync>;

/// Everything a host needs to render the form.
#[derive(Clone)]
pub struct FormProps {
  pub fields:             Vec<FieldDescriptor>,
  pub on_submit:          SubmitHandler,
  pub hide_submit_button: bool,
}

impl std::fmt::Debug for FormProps {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FormProps")
      .field("fields", &self.fields)
      .field("hide_submit_button", &self.hide_submit_button)
      .finish_non_exhaustive()
  }
}

/// A generic renderer that owns per-field input state and validation.
///
/// Hosts must only report values for input-type fields
/// ([`FieldDescriptor::is_input`]) and call `on_submit` only with values that
/// passed their validation.
pub trait FormHost {
  fn mount(&mut self, props: FormProps);
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Supplies the authenticated actor. Read on every render.
pub trait IdentityContext: Send + Sync {
  fn current_user(&self) -> Option<ActorIdentity>;
}

impl IdentityContext for ActorIdentity {
  fn current_user(&self) -> Option<ActorIdentity> { Some(self.clone()) }
}

impl IdentityContext for Option<ActorIdentity> {
  fn current_user(&self) -> Option<ActorIdentity> { self.clone() }
}

// ─── Overrides ───────────────────────────────────────────────────────────────

/// A replacement renderer for a named component. It receives the same props
/// the default form would have.
pub trait FormOverride: Send + Sync {
  fn render(&self, props: &UserInfoProps, host: &mut dyn FormHost);
}

/// Named overrides, consulted before a component renders its default form.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
  overrides: HashMap<String, Arc<dyn FormOverride>>,
}

impl ComponentRegistry {
  pub fn new() -> Self { Self::default() }

  /// Register `component` under `name`, returning any override it replaces.
  pub fn register(
    &mut self,
    name: impl Into<String>,
    component: Arc<dyn FormOverride>,
  ) -> Option<Arc<dyn FormOverride>> {
    self.overrides.insert(name.into(), component)
  }

  pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn FormOverride>> {
    self.overrides.remove(name)
  }

  pub fn get(&self, name: &str) -> Option<Arc<dyn FormOverride>> {
    self.overrides.get(name).cloned()
  }
}
