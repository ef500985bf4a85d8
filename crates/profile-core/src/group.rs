//! Groups and the membership snapshot a form renders from.

use serde::{Deserialize, Serialize};

use crate::user::UserProfile;

pub type GroupId = i64;

/// An assignable group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
  pub id:   GroupId,
  pub name: String,
}

/// The subject's groups, the universe of assignable groups, and whether the
/// fetch behind them is still in flight.
///
/// While `is_loading` is set the two collections hold whatever has arrived so
/// far, which may be nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipState {
  pub subject_groups: Vec<Group>,
  pub all_groups:     Vec<Group>,
  pub is_loading:     bool,
}

impl MembershipState {
  /// An empty snapshot for a fetch that has not resolved yet.
  pub fn loading() -> Self {
    Self { is_loading: true, ..Self::default() }
  }

  /// A resolved snapshot: the subject's groups are the members of
  /// `all_groups` whose ids appear in `subject.group_ids`.
  pub fn resolved(all_groups: Vec<Group>, subject: &UserProfile) -> Self {
    let subject_groups = all_groups
      .iter()
      .filter(|g| subject.group_ids.contains(&g.id))
      .cloned()
      .collect();
    Self { subject_groups, all_groups, is_loading: false }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn group(id: GroupId, name: &str) -> Group {
    Group { id, name: name.into() }
  }

  #[test]
  fn resolved_filters_by_subject_group_ids() {
    let mut subject = UserProfile::new(1, "Ann", "a@x.com");
    subject.group_ids = vec![2, 9];

    let state = MembershipState::resolved(
      vec![group(1, "admin"), group(2, "default"), group(3, "ops")],
      &subject,
    );

    assert!(!state.is_loading);
    assert_eq!(state.all_groups.len(), 3);
    assert_eq!(state.subject_groups, vec![group(2, "default")]);
  }

  #[test]
  fn loading_is_empty() {
    let state = MembershipState::loading();
    assert!(state.is_loading);
    assert!(state.all_groups.is_empty());
    assert!(state.subject_groups.is_empty());
  }
}
