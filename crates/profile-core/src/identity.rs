//! The authenticated actor performing an edit.

use serde::{Deserialize, Serialize};

use crate::user::{UserId, UserProfile};

/// Identity of the currently authenticated user. Read-only for the lifetime
/// of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
  pub id:    UserId,
  pub name:  String,
  pub email: String,
}

impl ActorIdentity {
  /// Whether `subject` is the actor's own record.
  pub fn is(&self, subject: &UserProfile) -> bool { self.id == subject.id }
}
