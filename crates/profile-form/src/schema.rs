//! Field schema generation for the user info form.
//!
//! [`generate`] is a pure function of the subject, the actor and the
//! membership snapshot. It always yields three fields in fixed order: `name`,
//! `email` and `group_ids`.

use profile_core::{ActorIdentity, GroupId, MembershipState, UserProfile};

use crate::descriptor::{
  FieldContent, FieldDefaults, FieldDescriptor, FieldKind, FieldSpec,
  SelectMode, SelectOption,
};

/// Placeholder and status text shown while groups are being fetched.
pub const LOADING: &str = "Loading...";

/// Name of the group membership field.
pub const GROUPS_FIELD: &str = "group_ids";

// ─── Group field policy ──────────────────────────────────────────────────────

/// Whether `actor` may change `subject`'s groups. Nobody edits their own
/// groups, and a disabled user's groups are frozen.
pub fn can_edit_groups(subject: &UserProfile, actor: &ActorIdentity) -> bool {
  !subject.is_disabled && !actor.is(subject)
}

/// The two renderings of the group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupField {
  /// A multiple select over every assignable group.
  Editable {
    options:           Vec<SelectOption>,
    initial_selection: Vec<GroupId>,
    loading:           bool,
  },
  /// A display of the subject's current groups with no edit affordance.
  ReadOnly { display: FieldContent },
}

impl GroupField {
  pub fn for_subject(
    subject: &UserProfile,
    actor: &ActorIdentity,
    membership: &MembershipState,
  ) -> Self {
    if can_edit_groups(subject, actor) {
      Self::Editable {
        options:           membership.all_groups.iter().map(SelectOption::from).collect(),
        initial_selection: membership.subject_groups.iter().map(|g| g.id).collect(),
        loading:           membership.is_loading,
      }
    } else if membership.is_loading {
      Self::ReadOnly { display: FieldContent::Text(LOADING.to_string()) }
    } else {
      Self::ReadOnly {
        display: FieldContent::Groups(membership.subject_groups.clone()),
      }
    }
  }

  fn into_kind(self) -> FieldKind {
    match self {
      Self::Editable { options, initial_selection, loading } => FieldKind::Select {
        mode: SelectMode::Multiple,
        options,
        initial_value: initial_selection,
        loading,
        placeholder: if loading { LOADING.to_string() } else { String::new() },
      },
      Self::ReadOnly { display } => FieldKind::Content { content: display },
    }
  }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Derive the form's fields for `subject` as seen by `actor`.
pub fn generate(
  subject: &UserProfile,
  actor: &ActorIdentity,
  membership: &MembershipState,
) -> Vec<FieldDescriptor> {
  let defaults = FieldDefaults { required: true, read_only: subject.is_disabled };

  let groups = GroupField::for_subject(subject, actor, membership);

  [
    FieldSpec::new("name", "Name", FieldKind::Text {
      initial_value: subject.name.clone(),
    }),
    FieldSpec::new("email", "Email", FieldKind::Email {
      initial_value: subject.email.clone(),
    }),
    FieldSpec::new(GROUPS_FIELD, "Groups", groups.into_kind()),
  ]
  .into_iter()
  .map(|spec| spec.resolve(defaults))
  .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use profile_core::Group;

  use super::*;
  use crate::descriptor::FieldType;

  fn subject(id: i64, disabled: bool) -> UserProfile {
    let mut user = UserProfile::new(id, "Ann", "a@x.com");
    user.is_disabled = disabled;
    user.group_ids = vec![2];
    user
  }

  fn actor(id: i64) -> ActorIdentity {
    ActorIdentity { id, name: "Admin".into(), email: "admin@x.com".into() }
  }

  fn groups() -> Vec<Group> {
    vec![
      Group { id: 1, name: "admin".into() },
      Group { id: 2, name: "default".into() },
      Group { id: 3, name: "ops".into() },
    ]
  }

  fn loaded(subject: &UserProfile) -> MembershipState {
    MembershipState::resolved(groups(), subject)
  }

  fn group_field(fields: &[FieldDescriptor]) -> &FieldDescriptor {
    let matches: Vec<_> = fields.iter().filter(|f| f.name == GROUPS_FIELD).collect();
    assert_eq!(matches.len(), 1, "exactly one group field");
    matches[0]
  }

  #[test]
  fn fields_in_fixed_order() {
    let s = subject(1, false);
    let fields = generate(&s, &actor(2), &loaded(&s));
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["name", "email", "group_ids"]);
    assert_eq!(fields[0].field_type(), FieldType::Text);
    assert_eq!(fields[1].field_type(), FieldType::Email);
    assert!(fields.iter().all(|f| f.required));
  }

  #[test]
  fn initial_values_come_from_subject() {
    let s = subject(1, false);
    let fields = generate(&s, &actor(2), &loaded(&s));
    assert_eq!(fields[0].initial_value(), Some("Ann".into()));
    assert_eq!(fields[1].initial_value(), Some("a@x.com".into()));
  }

  #[test]
  fn disabled_subject_is_read_only_everywhere() {
    for actor_id in [1, 2] {
      for membership in [MembershipState::loading(), loaded(&subject(1, true))] {
        let fields = generate(&subject(1, true), &actor(actor_id), &membership);
        assert!(fields.iter().all(|f| f.read_only));
        assert_eq!(group_field(&fields).field_type(), FieldType::Content);
      }
    }
  }

  #[test]
  fn enabled_subject_is_never_read_only() {
    let s = subject(1, false);
    for actor_id in [1, 2] {
      let fields = generate(&s, &actor(actor_id), &loaded(&s));
      assert!(fields.iter().all(|f| !f.read_only));
    }
  }

  #[test]
  fn own_groups_are_display_only() {
    for disabled in [false, true] {
      let s = subject(5, disabled);
      for membership in [MembershipState::loading(), loaded(&s)] {
        let fields = generate(&s, &actor(5), &membership);
        assert_eq!(group_field(&fields).field_type(), FieldType::Content);
      }
    }
  }

  #[test]
  fn read_only_display_shows_groups_once_loaded() {
    let s = subject(5, false);
    let fields = generate(&s, &actor(5), &loaded(&s));
    assert_eq!(
      group_field(&fields).kind,
      FieldKind::Content {
        content: FieldContent::Groups(vec![Group { id: 2, name: "default".into() }]),
      }
    );

    let fields = generate(&s, &actor(5), &MembershipState::loading());
    assert_eq!(
      group_field(&fields).kind,
      FieldKind::Content { content: FieldContent::Text(LOADING.into()) }
    );
  }

  #[test]
  fn other_enabled_subject_gets_multiple_select() {
    let mut s = subject(1, false);
    s.group_ids = vec![3, 1];
    let fields = generate(&s, &actor(2), &loaded(&s));

    let FieldKind::Select { mode, options, initial_value, loading, placeholder } =
      &group_field(&fields).kind
    else {
      panic!("expected a select field");
    };
    assert_eq!(*mode, SelectMode::Multiple);
    assert_eq!(options.len(), 3);
    assert_eq!(options[1], SelectOption { name: "default".into(), value: 2 });
    let selected: HashSet<_> = initial_value.iter().copied().collect();
    assert_eq!(selected, HashSet::from([1, 3]));
    assert!(!loading);
    assert!(placeholder.is_empty());
  }

  #[test]
  fn empty_group_universe_yields_empty_select() {
    let s = subject(1, false);
    let fields = generate(&s, &actor(2), &MembershipState::default());
    let FieldKind::Select { options, initial_value, .. } = &group_field(&fields).kind else {
      panic!("expected a select field");
    };
    assert!(options.is_empty());
    assert!(initial_value.is_empty());
  }

  #[test]
  fn loading_then_loaded() {
    let s = subject(1, false);

    let fields = generate(&s, &actor(2), &MembershipState::loading());
    let FieldKind::Select { options, loading, placeholder, .. } = &group_field(&fields).kind
    else {
      panic!("expected a select field while loading");
    };
    assert!(*loading);
    assert_eq!(placeholder, LOADING);
    assert!(options.is_empty());

    let fields = generate(&s, &actor(2), &loaded(&s));
    let FieldKind::Select { options, loading, initial_value, .. } = &group_field(&fields).kind
    else {
      panic!("expected a select field once loaded");
    };
    assert!(!*loading);
    assert_eq!(options.len(), 3);
    assert_eq!(initial_value, &vec![2]);
  }

  #[test]
  fn generation_is_idempotent() {
    let s = subject(1, false);
    let membership = loaded(&s);
    assert_eq!(generate(&s, &actor(2), &membership), generate(&s, &actor(2), &membership));
  }
}
