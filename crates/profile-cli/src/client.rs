//! Async HTTP client wrapping the profile JSON API.
//!
//! Implements [`SaveTransport`] and [`GroupDirectory`] so the form can talk to
//! the server directly.

use std::time::Duration;

use anyhow::{Context, Result};
use profile_core::{ActorIdentity, Group, ServerUser, UserId};
use profile_form::{GroupDirectory, SaveTransport, TransportError, UpdateRequest};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connection settings for the profile API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the profile JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `GET /api/session`
  pub async fn session(&self) -> Result<ActorIdentity> {
    let resp = self.auth(self.client.get(self.url("/session"))).send().await;
    decode(resp).await.context("GET /session failed")
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /api/users/<id>`
  pub async fn get_user(&self, id: UserId) -> Result<ServerUser> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/users/{id}"))))
      .send()
      .await;
    decode(resp)
      .await
      .with_context(|| format!("GET /users/{id} failed"))
  }
}

impl SaveTransport for ApiClient {
  /// `POST /api/users/<id>`
  async fn save(&self, request: &UpdateRequest) -> Result<ServerUser, TransportError> {
    let id = request
      .id()
      .ok_or_else(|| TransportError::Request("update request has no id".into()))?;
    let resp = self
      .auth(self.client.post(self.url(&format!("/users/{id}"))))
      .json(request)
      .send()
      .await;
    decode(resp).await
  }
}

impl GroupDirectory for ApiClient {
  /// `GET /api/groups`
  async fn all_groups(&self) -> Result<Vec<Group>, TransportError> {
    let resp = self.auth(self.client.get(self.url("/groups"))).send().await;
    decode(resp).await
  }
}

/// Turn a response into `T`, keeping the decoded error body on failure so the
/// server's message stays reachable.
async fn decode<T: DeserializeOwned>(
  resp: reqwest::Result<Response>,
) -> Result<T, TransportError> {
  let resp = resp.map_err(|e| TransportError::Request(e.to_string()))?;
  let status = resp.status();
  if !status.is_success() {
    let data = resp.json::<Value>().await.unwrap_or(Value::Null);
    return Err(TransportError::Response { status: status.as_u16(), data });
  }
  resp
    .json()
    .await
    .map_err(|e| TransportError::Decode(e.to_string()))
}
