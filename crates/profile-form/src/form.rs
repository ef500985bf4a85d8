//! The user info form component.
//!
//! [`UserInfoForm`] is long-lived: the caller keeps one per mounted form and
//! calls [`UserInfoForm::render`] whenever its props change or the membership
//! loader signals progress. Each render records the caller's latest change
//! sink, recomputes fields only when an input changed, and mounts the result
//! on the host (or hands the props to a registered override).

use std::sync::Arc;

use profile_core::{ActorIdentity, MembershipState, UserProfile};

use crate::{
  Error, Result,
  descriptor::FieldDescriptor,
  host::{ComponentRegistry, FormHost, FormProps, IdentityContext, SubmitHandler},
  membership::MembershipLoader,
  schema,
  sink::{self, ChangeSink, SinkSlot},
  submit::{Feedback, SubmissionPipeline},
  transport::{GroupDirectory, SaveTransport},
  values::FormValues,
};

/// Registry name under which an override replaces this form.
pub const COMPONENT_NAME: &str = "UserProfile.UserInfoForm";

// ─── Props ───────────────────────────────────────────────────────────────────

/// Input from the caller for one render.
#[derive(Clone)]
pub struct UserInfoProps {
  pub user:      UserProfile,
  /// Called with the normalized record after each successful save. Defaults
  /// to a no-op.
  pub on_change: Option<ChangeSink>,
}

impl UserInfoProps {
  pub fn new(user: UserProfile) -> Self { Self { user, on_change: None } }

  pub fn on_change(mut self, sink: impl Fn(UserProfile) + Send + Sync + 'static) -> Self {
    self.on_change = Some(Arc::new(sink));
    self
  }
}

// ─── Memo ────────────────────────────────────────────────────────────────────

struct FieldCache {
  subject:    UserProfile,
  actor:      ActorIdentity,
  membership: MembershipState,
  fields:     Vec<FieldDescriptor>,
}

impl FieldCache {
  fn matches(&self, subject: &UserProfile, actor: &ActorIdentity, membership: &MembershipState) -> bool {
    &self.subject == subject && &self.actor == actor && &self.membership == membership
  }
}

// ─── Component ───────────────────────────────────────────────────────────────

pub struct UserInfoForm<T, D, I> {
  identity:   Arc<I>,
  pipeline:   SubmissionPipeline<T>,
  membership: MembershipLoader<D>,
  registry:   Arc<ComponentRegistry>,
  sink:       SinkSlot,
  cache:      Option<FieldCache>,
}

impl<T, D, I> UserInfoForm<T, D, I>
where
  T: SaveTransport + 'static,
  D: GroupDirectory + 'static,
  I: IdentityContext,
{
  pub fn new(transport: Arc<T>, directory: Arc<D>, identity: Arc<I>) -> Self {
    let sink = SinkSlot::default();
    Self {
      identity,
      pipeline: SubmissionPipeline::new(transport, sink.clone()),
      membership: MembershipLoader::new(directory),
      registry: Arc::new(ComponentRegistry::new()),
      sink,
      cache: None,
    }
  }

  /// Use `registry` to look up an override for [`COMPONENT_NAME`].
  pub fn with_registry(mut self, registry: Arc<ComponentRegistry>) -> Self {
    self.registry = registry;
    self
  }

  /// The membership loader, so hosts can subscribe to fetch progress.
  pub fn membership(&self) -> &MembershipLoader<D> { &self.membership }

  /// Render the form for `props` onto `host`.
  ///
  /// Fails only when the identity context has no authenticated user.
  pub fn render(&mut self, props: &UserInfoProps, host: &mut dyn FormHost) -> Result<()> {
    self.sink.set(props.on_change.clone().unwrap_or_else(sink::noop));

    let membership = self.membership.track(&props.user);
    let actor = self.identity.current_user().ok_or(Error::MissingIdentity)?;

    if let Some(component) = self.registry.get(COMPONENT_NAME) {
      component.render(props, host);
      return Ok(());
    }

    let fields = self.fields(&props.user, actor, membership);
    host.mount(FormProps {
      fields,
      on_submit: self.submit_handler(&props.user),
      hide_submit_button: props.user.is_disabled,
    });
    Ok(())
  }

  fn fields(
    &mut self,
    subject: &UserProfile,
    actor: ActorIdentity,
    membership: MembershipState,
  ) -> Vec<FieldDescriptor> {
    if let Some(cache) = &self.cache
      && cache.matches(subject, &actor, &membership)
    {
      return cache.fields.clone();
    }

    tracing::debug!(user_id = subject.id, loading = membership.is_loading, "generating fields");
    let fields = schema::generate(subject, &actor, &membership);
    self.cache = Some(FieldCache {
      subject: subject.clone(),
      actor,
      membership,
      fields: fields.clone(),
    });
    fields
  }

  /// A handler bound to this render's subject. Each call spawns one save and
  /// returns immediately.
  fn submit_handler(&self, subject: &UserProfile) -> SubmitHandler {
    let pipeline = self.pipeline.clone();
    let subject = subject.clone();
    Arc::new(move |values: FormValues, feedback: Feedback| {
      let _ = pipeline.spawn(values, subject.clone(), feedback);
    })
  }
}
