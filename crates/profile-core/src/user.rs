//! User records: the wire shape persisted by the server and the normalized
//! shape handed to callers.
//!
//! The server speaks [`ServerUser`]. Everything on the client side works with
//! [`UserProfile`], produced by [`convert_user_info`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::group::GroupId;

pub type UserId = i64;

// ─── Wire shape ──────────────────────────────────────────────────────────────

/// A user as persisted and returned by the API.
///
/// May carry server-computed fields (`updated_at`, `active_at`) that never
/// appear in submitted form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerUser {
  pub id:                    UserId,
  pub name:                  String,
  pub email:                 String,
  #[serde(default)]
  pub profile_image_url:     Option<String>,
  /// Ids of the groups this user belongs to.
  #[serde(default)]
  pub groups:                Vec<GroupId>,
  /// Set when the account was disabled; `None` for active accounts.
  #[serde(default)]
  pub disabled_at:           Option<DateTime<Utc>>,
  #[serde(default)]
  pub is_invitation_pending: bool,
  #[serde(default)]
  pub is_email_verified:     bool,
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
  #[serde(default)]
  pub active_at:             Option<DateTime<Utc>>,
}

// ─── Normalized shape ────────────────────────────────────────────────────────

/// The user record being edited. Owned by the caller; the form never mutates
/// it and only ever hands back a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id:                    UserId,
  pub name:                  String,
  pub email:                 String,
  pub profile_image_url:     Option<String>,
  pub group_ids:             Vec<GroupId>,
  pub is_disabled:           bool,
  pub is_invitation_pending: bool,
  pub is_email_verified:     bool,
  pub created_at:            Option<DateTime<Utc>>,
  pub updated_at:            Option<DateTime<Utc>>,
  pub active_at:             Option<DateTime<Utc>>,
}

impl UserProfile {
  /// Minimal constructor; timestamps and flags take their empty defaults.
  pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      email: email.into(),
      profile_image_url: None,
      group_ids: Vec::new(),
      is_disabled: false,
      is_invitation_pending: false,
      is_email_verified: false,
      created_at: None,
      updated_at: None,
      active_at: None,
    }
  }
}

/// Normalization adapter: turn a server record into the shape callers use.
pub fn convert_user_info(user: ServerUser) -> UserProfile {
  UserProfile {
    id:                    user.id,
    name:                  user.name,
    email:                 user.email,
    profile_image_url:     user.profile_image_url,
    group_ids:             user.groups,
    is_disabled:           user.disabled_at.is_some(),
    is_invitation_pending: user.is_invitation_pending,
    is_email_verified:     user.is_email_verified,
    created_at:            Some(user.created_at),
    updated_at:            Some(user.updated_at),
    active_at:             user.active_at,
  }
}
