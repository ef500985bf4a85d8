//! Core types and trait definitions for user profile editing.
//!
//! This crate is deliberately free of HTTP and form-rendering dependencies.
//! The form, API and CLI crates all depend on it.

pub mod error;
pub mod group;
pub mod identity;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use group::{Group, GroupId, MembershipState};
pub use identity::ActorIdentity;
pub use user::{ServerUser, UserId, UserProfile, convert_user_info};
