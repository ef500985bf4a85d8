//! A terminal form host: keeps the last mounted form, fills its values from
//! command-line edits, and validates them before submitting.

use anyhow::{Result, anyhow, bail};
use profile_core::GroupId;
use profile_form::{FieldDescriptor, FieldKind, FieldType, FormHost, FormProps, FormValues};
use serde_json::Value;

/// Edits requested on the command line. `None` keeps the initial value.
#[derive(Debug, Clone, Default)]
pub struct Edits {
  pub name:   Option<String>,
  pub email:  Option<String>,
  pub groups: Option<Vec<GroupId>>,
}

#[derive(Default)]
pub struct TerminalHost {
  mounted: Option<FormProps>,
}

impl FormHost for TerminalHost {
  fn mount(&mut self, props: FormProps) { self.mounted = Some(props); }
}

impl TerminalHost {
  pub fn props(&self) -> Result<&FormProps> {
    self.mounted.as_ref().ok_or_else(|| anyhow!("form was not mounted"))
  }

  /// Build the values to submit: initial values of every input field with
  /// `edits` applied, then validated.
  pub fn values(&self, edits: Edits) -> Result<FormValues> {
    let props = self.props()?;
    if props.hide_submit_button {
      bail!("this user is disabled and cannot be edited");
    }

    let mut values = FormValues::from_initial(&props.fields);
    if let Some(name) = edits.name {
      set(&props.fields, &mut values, "name", Value::from(name))?;
    }
    if let Some(email) = edits.email {
      set(&props.fields, &mut values, "email", Value::from(email))?;
    }
    if let Some(groups) = edits.groups {
      set(&props.fields, &mut values, "group_ids", Value::from(groups))?;
    }

    validate(&props.fields, &values)?;
    Ok(values)
  }
}

fn set(fields: &[FieldDescriptor], values: &mut FormValues, name: &str, value: Value) -> Result<()> {
  let field = fields
    .iter()
    .find(|f| f.name == name)
    .ok_or_else(|| anyhow!("the form has no {name} field"))?;
  if field.read_only || !field.is_input() {
    bail!("{} can't be edited here", field.title);
  }
  if let FieldKind::Select { loading: true, .. } = field.kind {
    bail!("{} could not be loaded; try again later", field.title);
  }
  values.set(name, value);
  Ok(())
}

/// Required text fields must be non-blank and email fields must look like an
/// address.
fn validate(fields: &[FieldDescriptor], values: &FormValues) -> Result<()> {
  for field in fields.iter().filter(|f| f.is_input()) {
    let value = values.get(&field.name);
    match field.field_type() {
      FieldType::Text | FieldType::Email => {
        let text = value.and_then(Value::as_str).unwrap_or_default().trim();
        if field.required && text.is_empty() {
          bail!("{} is required", field.title);
        }
        if field.field_type() == FieldType::Email && !text.contains('@') {
          bail!("{} must be an email address", field.title);
        }
      }
      FieldType::Select | FieldType::Content => {}
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use profile_core::{ActorIdentity, MembershipState, UserProfile};
  use profile_form::schema;

  use super::*;

  fn host_for(subject: &UserProfile, actor_id: i64) -> TerminalHost {
    let actor = ActorIdentity { id: actor_id, name: "A".into(), email: "a@x.com".into() };
    let mut host = TerminalHost::default();
    host.mount(FormProps {
      fields:             schema::generate(subject, &actor, &MembershipState::default()),
      on_submit:          Arc::new(|_: FormValues, _: profile_form::Feedback| {}),
      hide_submit_button: subject.is_disabled,
    });
    host
  }

  #[test]
  fn edits_override_initial_values() {
    let host = host_for(&UserProfile::new(7, "Ann", "ann@x.com"), 1);
    let values = host
      .values(Edits { name: Some("Annie".into()), groups: Some(vec![1]), ..Edits::default() })
      .unwrap();
    assert_eq!(values.get("name"), Some(&Value::from("Annie")));
    assert_eq!(values.get("email"), Some(&Value::from("ann@x.com")));
    assert_eq!(values.get("group_ids"), Some(&Value::from(vec![1])));
  }

  #[test]
  fn own_groups_cannot_be_set() {
    let host = host_for(&UserProfile::new(7, "Ann", "ann@x.com"), 7);
    let err = host
      .values(Edits { groups: Some(vec![1]), ..Edits::default() })
      .unwrap_err();
    assert!(err.to_string().contains("Groups"));
  }

  #[test]
  fn blank_name_fails_validation() {
    let host = host_for(&UserProfile::new(7, "Ann", "ann@x.com"), 1);
    assert!(host.values(Edits { name: Some("  ".into()), ..Edits::default() }).is_err());
  }

  #[test]
  fn unloaded_groups_are_left_out() {
    let subject = UserProfile::new(7, "Ann", "ann@x.com");
    let actor = ActorIdentity { id: 1, name: "A".into(), email: "a@x.com".into() };
    let mut host = TerminalHost::default();
    host.mount(FormProps {
      fields:             schema::generate(&subject, &actor, &MembershipState::loading()),
      on_submit:          Arc::new(|_: FormValues, _: profile_form::Feedback| {}),
      hide_submit_button: false,
    });

    let values = host.values(Edits { name: Some("Annie".into()), ..Edits::default() }).unwrap();
    assert_eq!(values.get("group_ids"), None);
    assert!(host.values(Edits { groups: Some(vec![1]), ..Edits::default() }).is_err());
  }

  #[test]
  fn disabled_user_refuses_submit() {
    let mut user = UserProfile::new(7, "Ann", "ann@x.com");
    user.is_disabled = true;
    assert!(host_for(&user, 1).values(Edits::default()).is_err());
  }
}
