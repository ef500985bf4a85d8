//! `profile`: view and edit a user profile from the terminal.
//!
//! # Usage
//!
//! ```
//! profile --url http://localhost:8080 --user admin@x.com --password secret fields 7
//! profile --config ~/.config/profile/config.toml edit 7 --email ann@example.com --group 1 --group 2
//! ```

mod client;
mod host;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use host::{Edits, TerminalHost};
use profile_core::{GroupId, UserId, UserProfile, convert_user_info};
use profile_form::{
  Feedback, UserInfoForm, UserInfoProps, membership::GroupFetch,
};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "profile", about = "View and edit user profiles")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the profile server (default: http://localhost:8080).
  #[arg(long, env = "PROFILE_URL")]
  url: Option<String>,

  /// Email to authenticate as.
  #[arg(long, env = "PROFILE_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "PROFILE_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the form fields for a user as JSON.
  Fields {
    user_id: UserId,
  },
  /// Edit a user. Unspecified fields keep their current values.
  Edit {
    user_id: UserId,
    #[arg(long)]
    name:    Option<String>,
    #[arg(long)]
    email:   Option<String>,
    /// Group id to assign; repeat for several. Replaces the current groups.
    #[arg(long = "group", value_name = "GROUP_ID")]
    groups:  Vec<GroupId>,
    /// Remove the user from every group.
    #[arg(long, conflicts_with = "groups")]
    no_groups: bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = Arc::new(ApiClient::new(api_config)?);

  match args.command {
    Command::Fields { user_id } => {
      let session = Session::open(client, user_id, None).await?;
      let fields = &session.host.props()?.fields;
      println!("{}", serde_json::to_string_pretty(fields)?);
    }
    Command::Edit { user_id, name, email, groups, no_groups } => {
      let groups = if no_groups {
        Some(Vec::new())
      } else {
        (!groups.is_empty()).then_some(groups)
      };
      let edits = Edits { name, email, groups };

      let (changes_tx, mut changes_rx) = mpsc::unbounded_channel();
      let session = Session::open(client, user_id, Some(changes_tx)).await?;
      let values = session.host.values(edits)?;

      let (outcome_tx, outcome_rx) = oneshot::channel();
      let error_tx = Arc::new(std::sync::Mutex::new(Some(outcome_tx)));
      let success_tx = error_tx.clone();
      let feedback = Feedback::new(
        move |m| send_once(&success_tx, Ok(m)),
        move |m| send_once(&error_tx, Err(m)),
      );
      (session.host.props()?.on_submit)(values, feedback);

      match outcome_rx.await.context("save was dropped")? {
        Ok(message) => {
          eprintln!("{message}");
          let updated = changes_rx.recv().await.context("no updated record")?;
          println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Err(message) => bail!(message),
      }
    }
  }

  Ok(())
}

type Outcome = Result<String, String>;

fn send_once(slot: &std::sync::Mutex<Option<oneshot::Sender<Outcome>>>, outcome: Outcome) {
  let sender = slot.lock().ok().and_then(|mut s| s.take());
  if let Some(tx) = sender {
    let _ = tx.send(outcome);
  }
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// A rendered form for one user, re-rendered once the group fetch settles.
struct Session {
  host: TerminalHost,
  // Kept alive so in-flight saves can still reach the change sink.
  _form: UserInfoForm<ApiClient, ApiClient, profile_core::ActorIdentity>,
}

impl Session {
  async fn open(
    client: Arc<ApiClient>,
    user_id: UserId,
    changes: Option<mpsc::UnboundedSender<UserProfile>>,
  ) -> Result<Self> {
    let actor = client.session().await?;
    tracing::debug!(user_id, actor = actor.id, "opening form");
    let user = convert_user_info(client.get_user(user_id).await?);

    let mut props = UserInfoProps::new(user);
    if let Some(tx) = changes {
      props = props.on_change(move |u| {
        let _ = tx.send(u);
      });
    }

    let mut form = UserInfoForm::new(client.clone(), client, Arc::new(actor));
    let mut host = TerminalHost::default();

    form.render(&props, &mut host)?;
    form
      .membership()
      .subscribe()
      .wait_for(GroupFetch::is_settled)
      .await
      .context("group loader stopped")?;
    form.render(&props, &mut host)?;

    Ok(Self { host, _form: form })
  }
}
