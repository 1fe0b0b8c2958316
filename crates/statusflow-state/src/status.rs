//! # Status Values
//!
//! A [`Status`] pairs a current state with a shared, sealed [`Workflow`].
//! Many statuses reference the same workflow; the workflow outlives any one
//! of them.
//!
//! ## Binding
//!
//! There are two ways to obtain a status:
//!
//! - **Implicit.** A type implementing [`StatusKind`] declares its token
//!   types and a `define` initializer. Its workflow is the singleton stored
//!   in the global [`WorkflowRegistry`] under the kind's key, built on first
//!   use. `ArticleStatus::status(state)` binds to it.
//! - **Explicit.** [`Status::new`] binds any sealed workflow, so a caller can
//!   pick a different rule set over the same tokens for one particular value.
//!
//! ## Construction Policy
//!
//! A state the workflow does not recognize, or text that names no state, is
//! handled per the workflow's [`UnrecognizedState`] policy: by default it is
//! replaced by the workflow's first valid state; under `reject` the
//! construction fails. If the workflow has no valid states at all, a
//! recognized-or-not state is kept as given and unparseable text becomes the
//! first declared state.
//!
//! ## Chaining
//!
//! `transition` mutates in place and returns `&mut Self`. The `+` operator
//! and [`Status::then`] produce a new status and leave the receiver alone:
//!
//! ```text
//! let published = &draft + Submit + Publish;   // draft unchanged
//! status += Withdraw;                           // in place
//! ```
//!
//! Operations the workflow does not permit are dropped silently.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use statusflow_core::{RawStatus, Token, TokenError, UnrecognizedState, WorkflowError};

use crate::behavior::StateBehavior;
use crate::registry::{WorkflowKey, WorkflowRegistry};
use crate::workflow::Workflow;

/// A current state bound to a sealed workflow.
#[derive(Clone)]
pub struct Status<S: Token, O: Token> {
    state: S,
    workflow: Arc<Workflow<S, O>>,
}

impl<S: Token, O: Token> Status<S, O> {
    /// Bind `state` to `workflow`, applying the workflow's recognition policy.
    ///
    /// Fails if the workflow is not sealed, or if the state is unrecognized
    /// under [`UnrecognizedState::Reject`].
    pub fn new(workflow: Arc<Workflow<S, O>>, state: S) -> Result<Self, WorkflowError> {
        ensure_bindable(&workflow)?;
        if workflow.recognizes(state) {
            return Ok(Self { state, workflow });
        }
        let policy = workflow.config().unrecognized_state;
        match policy {
            UnrecognizedState::Reject => Err(WorkflowError::UnrecognizedState {
                state: state.name().to_string(),
            }),
            UnrecognizedState::Fallback => {
                let fallback = workflow.default_state().unwrap_or(state);
                if fallback != state {
                    tracing::debug!(
                        state = %state,
                        fallback = %fallback,
                        "unrecognized state, using fallback"
                    );
                }
                Ok(Self {
                    state: fallback,
                    workflow,
                })
            }
        }
    }

    /// Bind the state named by `text` to `workflow`.
    ///
    /// Parsing is an exact match on canonical names. Unparseable text falls
    /// back like an unrecognized state, or fails under the `reject` policy.
    pub fn parse(workflow: Arc<Workflow<S, O>>, text: &str) -> Result<Self, WorkflowError> {
        if let Some(state) = S::parse(text) {
            return Self::new(workflow, state);
        }
        ensure_bindable(&workflow)?;
        let unparseable = || TokenError::Unparseable {
            kind: S::KIND,
            token: text.to_string(),
        };
        let policy = workflow.config().unrecognized_state;
        match policy {
            UnrecognizedState::Reject => Err(unparseable().into()),
            UnrecognizedState::Fallback => {
                let fallback = workflow
                    .default_state()
                    .or_else(S::first)
                    .ok_or_else(unparseable)?;
                tracing::debug!(
                    token = text,
                    fallback = %fallback,
                    "unparseable status, using fallback"
                );
                Ok(Self {
                    state: fallback,
                    workflow,
                })
            }
        }
    }

    /// Bind a state or its textual form to `workflow`.
    pub fn from_raw(
        workflow: Arc<Workflow<S, O>>,
        raw: impl Into<RawStatus<S>>,
    ) -> Result<Self, WorkflowError> {
        let raw = raw.into();
        match raw.resolve() {
            Some(state) => Self::new(workflow, state),
            None => Self::parse(workflow, &raw.as_text()),
        }
    }

    /// The current state.
    pub fn value(&self) -> S {
        self.state
    }

    /// The bound workflow.
    pub fn workflow(&self) -> &Arc<Workflow<S, O>> {
        &self.workflow
    }

    /// Apply `operation` in place. Unpermitted operations leave the state
    /// unchanged.
    pub fn transition(&mut self, operation: O) -> &mut Self {
        // The bound workflow is sealed, so the lookup cannot fail.
        if let Ok(next) = self.workflow.transition(self.state, operation) {
            self.state = next;
        }
        self
    }

    /// A copy of this status with `operation` applied.
    pub fn then(&self, operation: O) -> Self {
        let mut next = self.clone();
        next.transition(operation);
        next
    }

    /// Whether `operation` has a rule from the current state.
    pub fn can(&self, operation: O) -> bool {
        self.workflow.permits(self.state, operation)
    }

    /// Operations with a rule from the current state.
    pub fn available_operations(&self) -> Vec<O> {
        self.workflow.operations_from(self.state)
    }

    /// The behaviour variant for the current state.
    pub fn behavior<B: StateBehavior<State = S>>(&self) -> B {
        B::for_state(self.state)
    }

    /// Whether both statuses hold the same state under the same workflow
    /// instance.
    pub fn same_binding(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.workflow, &other.workflow)
    }
}

fn ensure_bindable<S: Token, O: Token>(workflow: &Workflow<S, O>) -> Result<(), WorkflowError> {
    if workflow.is_sealed() {
        Ok(())
    } else {
        Err(WorkflowError::unsealed("bind status"))
    }
}

impl<S: Token, O: Token> fmt::Display for Status<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state.name())
    }
}

impl<S: Token, O: Token> fmt::Debug for Status<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Status")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: Token, O: Token> PartialEq for Status<S, O> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.same_binding(other)
    }
}

impl<S: Token, O: Token> Eq for Status<S, O> {}

impl<S: Token, O: Token> Add<O> for Status<S, O> {
    type Output = Status<S, O>;

    fn add(mut self, operation: O) -> Self::Output {
        self.transition(operation);
        self
    }
}

impl<S: Token, O: Token> Add<O> for &Status<S, O> {
    type Output = Status<S, O>;

    fn add(self, operation: O) -> Self::Output {
        self.then(operation)
    }
}

impl<S: Token, O: Token> AddAssign<O> for Status<S, O> {
    fn add_assign(&mut self, operation: O) {
        self.transition(operation);
    }
}

/// A status type with its own registry-managed workflow.
///
/// The implementing type is the owner discriminator: every status created
/// through it shares one workflow, built by [`define`](StatusKind::define)
/// on first use and sealed by the registry.
///
/// ```
/// use statusflow_core::{tokens, WorkflowError};
/// use statusflow_state::{StatusKind, Workflow};
///
/// tokens! { pub enum Light { Off, On } }
/// tokens! { pub enum Switch { Flip } }
///
/// struct LampStatus;
///
/// impl StatusKind for LampStatus {
///     type State = Light;
///     type Operation = Switch;
///
///     fn define(workflow: &mut Workflow<Light, Switch>) -> Result<(), WorkflowError> {
///         workflow
///             .add_rule(Light::Off, Switch::Flip, Light::On)?
///             .add_rule(Light::On, Switch::Flip, Light::Off)?;
///         Ok(())
///     }
/// }
///
/// let lamp = LampStatus::status(Light::Off)? + Switch::Flip;
/// assert_eq!(lamp.value(), Light::On);
/// assert_eq!(LampStatus::from_raw("On")?.to_string(), "On");
/// # Ok::<(), WorkflowError>(())
/// ```
pub trait StatusKind: 'static {
    /// State token type.
    type State: Token;
    /// Operation token type.
    type Operation: Token;

    /// Populate the kind's workflow. Runs once per registry.
    fn define(workflow: &mut Workflow<Self::State, Self::Operation>) -> Result<(), WorkflowError>;

    /// Registry holding this kind's workflow.
    fn registry() -> &'static WorkflowRegistry {
        WorkflowRegistry::global()
    }

    /// Registry key of this kind's workflow.
    fn key() -> WorkflowKey {
        WorkflowKey::of::<Self::State, Self::Operation, Self>()
    }

    /// The kind's workflow, created on first access.
    fn workflow() -> Result<Arc<Workflow<Self::State, Self::Operation>>, WorkflowError> {
        Self::registry().get_or_create(Self::key(), Self::define)
    }

    /// Build the kind's workflow ahead of first use.
    fn initialize() -> Result<(), WorkflowError> {
        Self::workflow().map(|_| ())
    }

    /// A status of this kind in `state`.
    fn status(state: Self::State) -> Result<Status<Self::State, Self::Operation>, WorkflowError> {
        Status::new(Self::workflow()?, state)
    }

    /// A status of this kind from text.
    fn parse(text: &str) -> Result<Status<Self::State, Self::Operation>, WorkflowError> {
        Status::parse(Self::workflow()?, text)
    }

    /// A status of this kind from a state or its textual form.
    fn from_raw(
        raw: impl Into<RawStatus<Self::State>>,
    ) -> Result<Status<Self::State, Self::Operation>, WorkflowError> {
        Status::from_raw(Self::workflow()?, raw)
    }
}
