//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Hard failures are reserved for API-ordering mistakes: mutating a sealed
//!   workflow, evaluating an unsealed one, binding a status to an unsealed
//!   workflow.
//! - A missing rule is never an error. The transition returns the input
//!   state unchanged.
//! - Unparseable text is an error only on strict paths (`parse_strict`,
//!   deserialization, definitions, the `reject` recognition policy).

use thiserror::Error;

use crate::lifecycle::Lifecycle;

/// Text that does not name any token of a domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token of `kind` has this canonical name.
    #[error("unparseable {kind} token: {token:?}")]
    Unparseable {
        /// Token domain (e.g., "ArticleState").
        kind: &'static str,
        /// The offending text.
        token: String,
    },
}

/// Errors raised by workflows, statuses and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// An operation was invoked in the wrong lifecycle phase.
    #[error("{operation} is not permitted while the workflow is {lifecycle}")]
    InvalidLifecycleState {
        /// The rejected operation (e.g., "add_rule").
        operation: &'static str,
        /// The phase the workflow was in.
        lifecycle: Lifecycle,
    },

    /// Strict parsing failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A status was constructed with a state its workflow does not use,
    /// under the `reject` policy.
    #[error("state {state} is not recognized by the workflow")]
    UnrecognizedState {
        /// Canonical name of the rejected state.
        state: String,
    },

    /// A workflow is already registered under this key.
    #[error("workflow {key} is already registered")]
    AlreadyRegistered {
        /// Display form of the registry key.
        key: String,
    },

    /// A registry key and workflow disagree on the token types.
    #[error("workflow {key} does not hold the requested state/operation types")]
    KindMismatch {
        /// Display form of the registry key.
        key: String,
    },

    /// A business action is not permitted in the current state.
    #[error("{action} is not permitted in state {state}")]
    Forbidden {
        /// Canonical name of the current state.
        state: String,
        /// Canonical name of the rejected action.
        action: String,
    },
}

impl WorkflowError {
    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLifecycleState { .. } => "INVALID_LIFECYCLE_STATE",
            Self::Token(_) => "UNPARSEABLE_TOKEN",
            Self::UnrecognizedState { .. } => "UNRECOGNIZED_STATE",
            Self::AlreadyRegistered { .. } => "ALREADY_REGISTERED",
            Self::KindMismatch { .. } => "KIND_MISMATCH",
            Self::Forbidden { .. } => "FORBIDDEN",
        }
    }

    /// Shorthand for an [`InvalidLifecycleState`](Self::InvalidLifecycleState)
    /// raised while the workflow is still building.
    pub fn unsealed(operation: &'static str) -> Self {
        Self::InvalidLifecycleState {
            operation,
            lifecycle: Lifecycle::Building,
        }
    }

    /// Shorthand for an [`InvalidLifecycleState`](Self::InvalidLifecycleState)
    /// raised after the workflow was sealed.
    pub fn sealed(operation: &'static str) -> Self {
        Self::InvalidLifecycleState {
            operation,
            lifecycle: Lifecycle::Sealed,
        }
    }
}
