//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `POST` | `/users/:id` | Body: [`UpdateBody`]; returns the stored user |
//!
//! Updates are normalized before they reach the store: names are trimmed,
//! emails trimmed and lowercased, group ids sorted and deduplicated. The
//! store rejects taken emails and unknown groups atomically with the write.

use axum::{
  Json,
  extract::{Path, State},
};
use profile_core::{GroupId, ServerUser, UserId, store::{UserPatch, UserStore}};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authenticated(_): Authenticated,
  Path(id): Path<UserId>,
) -> Result<Json<ServerUser>, ApiError>
where
  S: UserStore + 'static,
{
  let user = load(&state, id).await?;
  Ok(Json(user))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Partial update body. Unknown keys, including `id`, are ignored; the path
/// decides which user is updated.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub name:      Option<String>,
  pub email:     Option<String>,
  pub group_ids: Option<Vec<GroupId>>,
}

/// `POST /users/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<UserId>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<ServerUser>, ApiError>
where
  S: UserStore + 'static,
{
  let current = load(&state, id).await?;
  if current.disabled_at.is_some() {
    return Err(ApiError::Forbidden("This user is disabled.".into()));
  }

  let patch = normalize(body)?;

  if let Some(groups) = &patch.group_ids
    && actor == id
    && *groups != sorted(current.groups.clone())
  {
    return Err(ApiError::Forbidden("You can't change your own groups.".into()));
  }

  // Email uniqueness and group ids are checked by the store under its write
  // lock and come back as domain errors.
  tracing::info!(user_id = id, actor, "updating user");
  let saved = state
    .store
    .update_user(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(saved))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn load<S: UserStore>(state: &AppState<S>, id: UserId) -> Result<ServerUser, ApiError> {
  state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("User {id} not found.")))
}

fn sorted(mut ids: Vec<GroupId>) -> Vec<GroupId> {
  ids.sort_unstable();
  ids.dedup();
  ids
}

/// Validate and normalize an update body into a store patch.
fn normalize(body: UpdateBody) -> Result<UserPatch, ApiError> {
  let name = match body.name.map(|n| n.trim().to_string()) {
    Some(n) if n.is_empty() => {
      return Err(ApiError::BadRequest("Name can't be empty.".into()));
    }
    other => other,
  };

  let email = match body.email.map(|e| e.trim().to_lowercase()) {
    Some(e) if !is_email(&e) => {
      return Err(ApiError::BadRequest("Invalid email address.".into()));
    }
    other => other,
  };

  Ok(UserPatch { name, email, group_ids: body.group_ids.map(sorted) })
}

fn is_email(s: &str) -> bool {
  match s.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }
    None => false,
  }
}
