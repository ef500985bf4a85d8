//! Background loading of group membership for the subject being edited.
//!
//! [`MembershipLoader::track`] is called on every render. A new subject id
//! starts a fresh fetch of the group universe; the subject's own groups are
//! always derived from the latest subject record, so a save that changes
//! `group_ids` shows up without a refetch.
//!
//! A fetch that fails leaves the form in the loading state. The subject's
//! groups are never seeded from a list that did not arrive.

use std::sync::Arc;

use profile_core::{Group, MembershipState, UserId, UserProfile};
use tokio::{sync::watch, task::JoinHandle};

use crate::transport::GroupDirectory;

/// Progress of the group fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFetch {
  Pending,
  Ready(Vec<Group>),
  /// The directory could not be reached. Treated as still loading.
  Failed,
}

impl GroupFetch {
  /// Whether the fetch has finished, successfully or not.
  pub fn is_settled(&self) -> bool { !matches!(self, Self::Pending) }
}

/// Owns the fetch task and its latest result.
pub struct MembershipLoader<D> {
  directory:  Arc<D>,
  tx:         Arc<watch::Sender<GroupFetch>>,
  rx:         watch::Receiver<GroupFetch>,
  subject_id: Option<UserId>,
  task:       Option<JoinHandle<()>>,
}

impl<D: GroupDirectory + 'static> MembershipLoader<D> {
  pub fn new(directory: Arc<D>) -> Self {
    let (tx, rx) = watch::channel(GroupFetch::Pending);
    Self { directory, tx: Arc::new(tx), rx, subject_id: None, task: None }
  }

  /// Observe `subject`, refetching if its id differs from the last one seen,
  /// and return the current snapshot.
  pub fn track(&mut self, subject: &UserProfile) -> MembershipState {
    if self.subject_id != Some(subject.id) {
      self.refetch(subject.id);
    }
    self.snapshot(subject)
  }

  /// The current snapshot for `subject` without triggering a fetch.
  pub fn snapshot(&self, subject: &UserProfile) -> MembershipState {
    match &*self.rx.borrow() {
      GroupFetch::Pending | GroupFetch::Failed => MembershipState::loading(),
      GroupFetch::Ready(groups) => MembershipState::resolved(groups.clone(), subject),
    }
  }

  /// A receiver that changes whenever a fetch starts or resolves. Hosts
  /// re-render when it fires.
  pub fn subscribe(&self) -> watch::Receiver<GroupFetch> { self.rx.clone() }

  fn refetch(&mut self, subject_id: UserId) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
    self.subject_id = Some(subject_id);
    self.tx.send_replace(GroupFetch::Pending);

    tracing::debug!(subject_id, "fetching groups");
    let directory = self.directory.clone();
    let tx = self.tx.clone();
    self.task = Some(tokio::spawn(async move {
      let fetch = match directory.all_groups().await {
        Ok(groups) => GroupFetch::Ready(groups),
        Err(e) => {
          tracing::warn!(subject_id, error = %e, "failed to load groups");
          GroupFetch::Failed
        }
      };
      tx.send_replace(fetch);
    }));
  }
}

impl<D> Drop for MembershipLoader<D> {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}
