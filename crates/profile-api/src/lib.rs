//! JSON REST API for user profiles.
//!
//! Exposes an axum [`Router`] backed by any [`profile_core::store::UserStore`].
//! Every route requires HTTP Basic auth; the authenticated user is the actor.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", profile_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod groups;
pub mod memory;
pub mod session;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use profile_core::{Group, GroupId, UserId, store::UserStore};
use serde::Deserialize;

pub use auth::{AuthConfig, Authenticated};
pub use error::ApiError;
pub use memory::MemoryStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:   String,
  pub port:   u16,
  #[serde(default)]
  pub groups: Vec<Group>,
  #[serde(default)]
  pub users:  Vec<SeedUser>,
}

/// A user loaded into the store at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
  pub id:            UserId,
  pub name:          String,
  pub email:         String,
  /// Argon2 PHC string. Users without one cannot log in.
  #[serde(default)]
  pub password_hash: Option<String>,
  #[serde(default)]
  pub groups:        Vec<GroupId>,
  #[serde(default)]
  pub disabled:      bool,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), auth: self.auth.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: UserStore + 'static,
{
  Router::new()
    .route("/session", get(session::current::<S>))
    .route("/users/{id}", get(users::get_one::<S>).post(users::update::<S>))
    .route("/groups", get(groups::list::<S>))
    .with_state(state)
}
