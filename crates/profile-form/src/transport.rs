//! Contracts for the remote side: saving a user and listing groups.
//!
//! Implemented over HTTP by `profile-cli`; tests supply in-process doubles.

use std::future::Future;

use profile_core::{Group, ServerUser};
use serde_json::{Value, json};
use thiserror::Error;

use crate::values::UpdateRequest;

// ─── Error ───────────────────────────────────────────────────────────────────

/// Failure reported by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
  /// The server answered with a non-success status. `data` is the decoded
  /// response body, or `Value::Null` if it was not JSON.
  #[error("server responded with status {status}")]
  Response { status: u16, data: Value },

  /// No response was received.
  #[error("request failed: {0}")]
  Request(String),

  /// A success response whose body could not be decoded.
  #[error("malformed response: {0}")]
  Decode(String),
}

impl TransportError {
  /// The error as a JSON envelope. Server responses are nested under
  /// `response`, so a server-supplied message lives at
  /// `/response/data/message`.
  pub fn envelope(&self) -> Value {
    match self {
      Self::Response { status, data } => json!({
        "response": { "status": status, "data": data },
      }),
      other => json!({ "error": other.to_string() }),
    }
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Persists an update and returns the record as stored server-side.
pub trait SaveTransport: Send + Sync {
  fn save<'a>(
    &'a self,
    request: &'a UpdateRequest,
  ) -> impl Future<Output = Result<ServerUser, TransportError>> + Send + 'a;
}

/// Lists the universe of assignable groups.
pub trait GroupDirectory: Send + Sync {
  fn all_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, TransportError>> + Send + '_;
}
