//! Handler for `GET /session`: the authenticated actor.

use axum::{Json, extract::State};
use profile_core::{ActorIdentity, store::UserStore};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /session`
pub async fn current<S>(
  State(state): State<AppState<S>>,
  Authenticated(id): Authenticated,
) -> Result<Json<ActorIdentity>, ApiError>
where
  S: UserStore + 'static,
{
  // An account whose user record is gone can no longer act.
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  Ok(Json(ActorIdentity { id: user.id, name: user.name, email: user.email }))
}
