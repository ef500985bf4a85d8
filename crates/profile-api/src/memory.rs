//! In-memory [`UserStore`] backend, seeded from configuration.

use std::collections::BTreeMap;

use chrono::Utc;
use profile_core::{
  Error, Group, GroupId, ServerUser, UserId,
  store::{UserPatch, UserStore},
};
use tokio::sync::RwLock;

use crate::SeedUser;

#[derive(Default)]
struct State {
  users:  BTreeMap<UserId, ServerUser>,
  groups: BTreeMap<GroupId, Group>,
}

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
  state: RwLock<State>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Build a store holding `groups` and `users`.
  pub fn seeded(groups: &[Group], users: &[SeedUser]) -> Self {
    let now = Utc::now();
    let mut state = State::default();
    for group in groups {
      state.groups.insert(group.id, group.clone());
    }
    for seed in users {
      state.users.insert(seed.id, ServerUser {
        id:                    seed.id,
        name:                  seed.name.clone(),
        email:                 seed.email.to_lowercase(),
        profile_image_url:     None,
        groups:                seed.groups.clone(),
        disabled_at:           seed.disabled.then_some(now),
        is_invitation_pending: false,
        is_email_verified:     true,
        created_at:            now,
        updated_at:            now,
        active_at:             None,
      });
    }
    Self { state: RwLock::new(state) }
  }
}

impl UserStore for MemoryStore {
  type Error = Error;

  async fn get_user(&self, id: UserId) -> Result<Option<ServerUser>, Error> {
    Ok(self.state.read().await.users.get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<ServerUser>, Error> {
    let state = self.state.read().await;
    Ok(state.users.values().find(|u| u.email == email).cloned())
  }

  async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<ServerUser, Error> {
    let mut state = self.state.write().await;

    if let Some(ids) = &patch.group_ids
      && let Some(unknown) = ids.iter().find(|g| !state.groups.contains_key(*g))
    {
      return Err(Error::UnknownGroup(*unknown));
    }

    if let Some(email) = &patch.email
      && state.users.values().any(|u| u.id != id && &u.email == email)
    {
      return Err(Error::EmailTaken(email.clone()));
    }

    let user = state.users.get_mut(&id).ok_or(Error::UserNotFound(id))?;
    if let Some(name) = patch.name {
      user.name = name;
    }
    if let Some(email) = patch.email {
      user.email = email;
    }
    if let Some(groups) = patch.group_ids {
      user.groups = groups;
    }
    user.updated_at = Utc::now();
    Ok(user.clone())
  }

  async fn list_groups(&self) -> Result<Vec<Group>, Error> {
    Ok(self.state.read().await.groups.values().cloned().collect())
  }
}
