//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"message": "..."}` so clients can show the
//! server's wording directly.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error. Domain rejections raised by the store keep their
  /// client-facing status and message.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
    match boxed.downcast::<profile_core::Error>() {
      Ok(domain) => Self::from(*domain),
      Err(other) => Self::Store(other),
    }
  }
}

impl From<profile_core::Error> for ApiError {
  fn from(e: profile_core::Error) -> Self {
    use profile_core::Error;
    match e {
      Error::UserNotFound(id) => Self::NotFound(format!("User {id} not found.")),
      Error::UnknownGroup(id) => Self::BadRequest(format!("Unknown group {id}.")),
      Error::EmailTaken(_) => Self::BadRequest("Email taken".into()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "message": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"profile\""),
      );
    }
    res
  }
}
