//! The `UserStore` trait and its update input.
//!
//! The trait is implemented by storage backends (e.g. the in-memory store in
//! `profile-api`). The HTTP layer depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  group::{Group, GroupId},
  user::{ServerUser, UserId},
};

// ─── Update input ────────────────────────────────────────────────────────────

/// Input to [`UserStore::update_user`]. `None` leaves a field untouched.
///
/// `updated_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub name:      Option<String>,
  pub email:     Option<String>,
  pub group_ids: Option<Vec<GroupId>>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.email.is_none() && self.group_ids.is_none()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a user store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<ServerUser>, Self::Error>> + Send + '_;

  /// Look a user up by (already normalized) email address.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<ServerUser>, Self::Error>> + Send + 'a;

  /// Apply `patch` to the user and return the persisted record.
  ///
  /// The write is rejected as a whole if the user does not exist, a group id
  /// is unknown, or another user already holds the patched email. Backends
  /// must check email uniqueness in the same critical section as the write.
  fn update_user(
    &self,
    id: UserId,
    patch: UserPatch,
  ) -> impl Future<Output = Result<ServerUser, Self::Error>> + Send + '_;

  /// List every assignable group, ordered by id.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;
}
