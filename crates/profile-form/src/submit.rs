//! The submission pipeline: form values in, one save attempt out, and the
//! outcome routed to the host's feedback callbacks and the caller's sink.

use std::sync::Arc;

use profile_core::{UserProfile, convert_user_info};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
  sink::SinkSlot,
  transport::{SaveTransport, TransportError},
  values::FormValues,
};

/// Confirmation passed to the host on success.
pub const SAVED: &str = "Saved.";

/// Message used when the error carries no server-supplied message.
pub const FAILED_SAVING: &str = "Failed saving.";

/// Where a server-supplied message sits in [`TransportError::envelope`].
pub const MESSAGE_POINTER: &str = "/response/data/message";

/// Extract the display message for a failed save.
pub fn error_message(error: &TransportError) -> String {
  error
    .envelope()
    .pointer(MESSAGE_POINTER)
    .and_then(Value::as_str)
    .unwrap_or(FAILED_SAVING)
    .to_string()
}

// ─── Feedback ────────────────────────────────────────────────────────────────

/// The host's outcome callbacks for one submission. Exactly one fires.
pub struct Feedback {
  on_success: Box<dyn FnOnce(String) + Send>,
  on_error:   Box<dyn FnOnce(String) + Send>,
}

impl Feedback {
  pub fn new(
    on_success: impl FnOnce(String) + Send + 'static,
    on_error: impl FnOnce(String) + Send + 'static,
  ) -> Self {
    Self { on_success: Box::new(on_success), on_error: Box::new(on_error) }
  }

  fn success(self, message: &str) { (self.on_success)(message.to_string()) }

  fn error(self, message: String) { (self.on_error)(message) }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Saves form values through a [`SaveTransport`].
///
/// There is no retry and no deduplication: each call is exactly one save
/// attempt, and concurrent submissions race.
pub struct SubmissionPipeline<T> {
  transport: Arc<T>,
  sink:      SinkSlot,
}

impl<T> Clone for SubmissionPipeline<T> {
  fn clone(&self) -> Self {
    Self { transport: self.transport.clone(), sink: self.sink.clone() }
  }
}

impl<T: SaveTransport + 'static> SubmissionPipeline<T> {
  pub fn new(transport: Arc<T>, sink: SinkSlot) -> Self { Self { transport, sink } }

  /// Save `values` for `subject` and report the outcome.
  ///
  /// On success the host hears [`SAVED`] first, then the normalized record
  /// goes to the sink current at completion time.
  pub async fn submit(&self, values: FormValues, subject: &UserProfile, feedback: Feedback) {
    let request = values.into_request(subject.id);
    tracing::debug!(user_id = subject.id, "saving user");

    match self.transport.save(&request).await {
      Ok(saved) => {
        feedback.success(SAVED);
        self.sink.notify(convert_user_info(saved));
      }
      Err(e) => {
        tracing::debug!(user_id = subject.id, error = %e, "save failed");
        feedback.error(error_message(&e));
      }
    }
  }

  /// Run [`Self::submit`] on the runtime and return immediately.
  pub fn spawn(&self, values: FormValues, subject: UserProfile, feedback: Feedback) -> JoinHandle<()> {
    let pipeline = self.clone();
    tokio::spawn(async move { pipeline.submit(values, &subject, feedback).await })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{DateTime, Utc};
  use profile_core::ServerUser;
  use serde_json::json;
  use tokio::sync::oneshot;

  use super::*;
  use crate::values::UpdateRequest;

  /// Records every request and answers with a canned result.
  struct FakeTransport {
    requests: Mutex<Vec<UpdateRequest>>,
    reply:    fn() -> Result<ServerUser, TransportError>,
  }

  impl FakeTransport {
    fn new(reply: fn() -> Result<ServerUser, TransportError>) -> Arc<Self> {
      Arc::new(Self { requests: Mutex::new(Vec::new()), reply })
    }
  }

  impl SaveTransport for FakeTransport {
    async fn save(&self, request: &UpdateRequest) -> Result<ServerUser, TransportError> {
      self.requests.lock().unwrap().push(request.clone());
      (self.reply)()
    }
  }

  fn ann() -> Result<ServerUser, TransportError> {
    let now: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
    Ok(ServerUser {
      id:                    7,
      name:                  "Ann".into(),
      email:                 "a@x.com".into(),
      profile_image_url:     None,
      groups:                vec![2],
      disabled_at:           None,
      is_invitation_pending: false,
      is_email_verified:     true,
      created_at:            now,
      updated_at:            now,
      active_at:             None,
    })
  }

  fn email_taken() -> Result<ServerUser, TransportError> {
    Err(TransportError::Response { status: 400, data: json!({ "message": "Email taken" }) })
  }

  fn bare_500() -> Result<ServerUser, TransportError> {
    Err(TransportError::Response { status: 500, data: serde_json::Value::Null })
  }

  fn offline() -> Result<ServerUser, TransportError> {
    Err(TransportError::Request("connection refused".into()))
  }

  #[derive(Debug, PartialEq)]
  enum Outcome {
    Success(String),
    Error(String),
  }

  fn feedback() -> (Feedback, oneshot::Receiver<Outcome>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let tx2 = tx.clone();
    let feedback = Feedback::new(
      move |m| {
        if let Some(tx) = tx.lock().unwrap().take() {
          let _ = tx.send(Outcome::Success(m));
        }
      },
      move |m| {
        if let Some(tx) = tx2.lock().unwrap().take() {
          let _ = tx.send(Outcome::Error(m));
        }
      },
    );
    (feedback, rx)
  }

  fn recording_slot() -> (SinkSlot, Arc<Mutex<Vec<UserProfile>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let slot = SinkSlot::new(Arc::new(move |u: UserProfile| sink_seen.lock().unwrap().push(u)));
    (slot, seen)
  }

  #[tokio::test]
  async fn success_reports_saved_and_notifies_sink() {
    let transport = FakeTransport::new(ann);
    let (slot, seen) = recording_slot();
    let pipeline = SubmissionPipeline::new(transport.clone(), slot);
    let (fb, rx) = feedback();

    let mut values = FormValues::new();
    values.set("name", "Ann");
    pipeline.submit(values, &UserProfile::new(7, "A", "a@x.com"), fb).await;

    assert_eq!(rx.await.unwrap(), Outcome::Success("Saved.".into()));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], convert_user_info(ann().unwrap()));
  }

  #[tokio::test]
  async fn request_carries_subject_id_not_submitted_id() {
    let transport = FakeTransport::new(ann);
    let pipeline = SubmissionPipeline::new(transport.clone(), SinkSlot::default());
    let (fb, _rx) = feedback();

    let mut values = FormValues::new();
    values.set("id", 1);
    values.set("email", "a@x.com");
    pipeline.submit(values, &UserProfile::new(7, "Ann", "a@x.com"), fb).await;

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id(), Some(7));
  }

  #[tokio::test]
  async fn server_message_is_surfaced() {
    let (slot, seen) = recording_slot();
    let pipeline = SubmissionPipeline::new(FakeTransport::new(email_taken), slot);
    let (fb, rx) = feedback();

    pipeline.submit(FormValues::new(), &UserProfile::new(7, "Ann", "a@x.com"), fb).await;

    assert_eq!(rx.await.unwrap(), Outcome::Error("Email taken".into()));
    assert!(seen.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn missing_message_falls_back() {
    for reply in [bare_500 as fn() -> _, offline] {
      let transport = FakeTransport::new(reply);
      let pipeline = SubmissionPipeline::new(transport.clone(), SinkSlot::default());
      let (fb, rx) = feedback();

      pipeline.submit(FormValues::new(), &UserProfile::new(7, "Ann", "a@x.com"), fb).await;

      assert_eq!(rx.await.unwrap(), Outcome::Error("Failed saving.".into()));
      assert_eq!(transport.requests.lock().unwrap().len(), 1, "no retry");
    }
  }

  #[test]
  fn non_string_message_falls_back() {
    let error = TransportError::Response { status: 400, data: json!({ "message": 12 }) };
    assert_eq!(error_message(&error), FAILED_SAVING);
  }

  /// Holds every save until released.
  struct GatedTransport {
    gate: tokio::sync::Notify,
  }

  impl SaveTransport for GatedTransport {
    async fn save(&self, _: &UpdateRequest) -> Result<ServerUser, TransportError> {
      self.gate.notified().await;
      ann()
    }
  }

  #[tokio::test]
  async fn sink_is_resolved_at_completion() {
    let transport = Arc::new(GatedTransport { gate: tokio::sync::Notify::new() });
    let (stale, stale_seen) = recording_slot();
    let pipeline = SubmissionPipeline::new(transport.clone(), stale.clone());

    let (fb, _outcome) = feedback();
    let handle = pipeline.spawn(FormValues::new(), UserProfile::new(7, "Ann", "a@x.com"), fb);

    // The caller re-renders with a new sink while the save is in flight.
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));
    stale.set(Arc::new(move |u: UserProfile| {
      if let Some(tx) = tx.lock().unwrap().take() {
        let _ = tx.send(u.id);
      }
    }));

    transport.gate.notify_one();
    handle.await.unwrap();

    assert_eq!(rx.await.unwrap(), 7);
    assert!(stale_seen.lock().unwrap().is_empty());
  }
}
