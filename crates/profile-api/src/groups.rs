//! Handler for `GET /groups`: every assignable group, ordered by id.

use axum::{Json, extract::State};
use profile_core::{Group, store::UserStore};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /groups`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(_): Authenticated,
) -> Result<Json<Vec<Group>>, ApiError>
where
  S: UserStore + 'static,
{
  let groups = state.store.list_groups().await.map_err(ApiError::store)?;
  Ok(Json(groups))
}
