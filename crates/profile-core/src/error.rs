//! Error types for `profile-core`.

use thiserror::Error;

use crate::{group::GroupId, user::UserId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("unknown group: {0}")]
  UnknownGroup(GroupId),

  #[error("email already in use: {0}")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
