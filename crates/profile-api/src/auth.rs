//! HTTP Basic-auth extractor and credential checks.
//!
//! Passwords are keyed by user id. The email in the credentials is resolved
//! through the store on every request, so a saved email change moves the
//! login with it. A successful check yields the id of the authenticated user,
//! which handlers treat as the acting identity.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use profile_core::{UserId, store::UserStore};

use crate::{AppState, SeedUser, error::ApiError};

/// Password hashes accepted by this server instance, by user id.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  /// PHC strings produced by argon2, e.g. `$argon2id$v=19$…`
  hashes: HashMap<UserId, String>,
}

impl AuthConfig {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, user_id: UserId, password_hash: impl Into<String>) {
    self.hashes.insert(user_id, password_hash.into());
  }

  /// Hashes for every seed user that has one.
  pub fn from_seed(users: &[SeedUser]) -> Self {
    let mut auth = Self::new();
    for user in users {
      if let Some(hash) = &user.password_hash {
        auth.insert(user.id, hash.clone());
      }
    }
    auth
  }

  /// Check `password` against the hash stored for `user_id`.
  pub fn verify(&self, user_id: UserId, password: &str) -> Result<(), ApiError> {
    let hash = self.hashes.get(&user_id).ok_or(ApiError::Unauthorized)?;
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ApiError::Unauthorized)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| ApiError::Unauthorized)
  }
}

/// Basic-auth credentials as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  /// Lowercased, matching how the store keeps emails.
  pub email:    String,
  pub password: String,
}

/// Parse the `Authorization: Basic` header.
pub fn credentials(headers: &HeaderMap) -> Result<Credentials, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok(Credentials { email: email.trim().to_lowercase(), password: password.to_string() })
}

/// Resolve the credentials in `headers` to a user id.
pub async fn authenticate<S>(headers: &HeaderMap, state: &AppState<S>) -> Result<UserId, ApiError>
where
  S: UserStore,
{
  let creds = credentials(headers)?;
  let user = state
    .store
    .find_user_by_email(&creds.email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  state.auth.verify(user.id, &creds.password)?;
  Ok(user.id)
}

/// The authenticated user's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub UserId);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: UserStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state).await.map(Authenticated)
  }
}
