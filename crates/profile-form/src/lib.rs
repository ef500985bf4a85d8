//! Permission-aware form for editing a single user profile.
//!
//! The two pieces that carry policy are [`schema::generate`], which decides
//! what fields the form shows and whether they can be edited, and
//! [`submit::SubmissionPipeline`], which saves what the user entered and routes
//! the outcome. [`form::UserInfoForm`] ties them to a [`host::FormHost`].
//!
//! Rendering, transport and identity are supplied by the caller through the
//! traits in [`host`] and [`transport`].

pub mod descriptor;
pub mod error;
pub mod form;
pub mod host;
pub mod membership;
pub mod schema;
pub mod sink;
pub mod submit;
pub mod transport;
pub mod values;

pub use descriptor::{FieldDescriptor, FieldKind, FieldType};
pub use error::{Error, Result};
pub use form::{COMPONENT_NAME, UserInfoForm, UserInfoProps};
pub use host::{ComponentRegistry, FormHost, FormOverride, FormProps, IdentityContext};
pub use submit::{Feedback, SubmissionPipeline};
pub use transport::{GroupDirectory, SaveTransport, TransportError};
pub use values::{FormValues, UpdateRequest};
