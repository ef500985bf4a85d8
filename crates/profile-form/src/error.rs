//! Error type for `profile-form`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The form was rendered outside an authenticated session.
  #[error("no authenticated user in the identity context")]
  MissingIdentity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
