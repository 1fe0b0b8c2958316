//! # Workflow
//!
//! A workflow wraps one [`TransitionTable`] and moves through a one-way
//! lifecycle:
//!
//! ```text
//! Building ──seal()──▶ Sealed
//!    │                   │
//!    ├ add_rule          ├ transition
//!    └ add_rules         ├ valid_statuses / valid_operations
//!                        └ permits / operations_from
//! ```
//!
//! ## Transition Policy
//!
//! Invalid transitions are no-ops, not errors. When no rule maps
//! `(state, operation)`, [`Workflow::transition`] returns the input state
//! unchanged. The only failure is calling it before the workflow is sealed.
//!
//! ## Derived Views
//!
//! `valid_operations` and `valid_statuses` are computed from the rules in
//! insertion order on first access after sealing, then memoized. For each
//! rule the operation is recorded, then the source state, then the target
//! state; duplicates keep their first position. Before sealing both views
//! are empty, or rejected under [`PreSealQueries::Reject`].
//!
//! ## Example
//!
//! ```
//! use statusflow_core::tokens;
//! use statusflow_state::Workflow;
//!
//! tokens! {
//!     pub enum Door { Open, Closed }
//! }
//! tokens! {
//!     pub enum Push { Close, Open }
//! }
//!
//! let mut workflow = Workflow::new();
//! workflow
//!     .add_rule(Door::Open, Push::Close, Door::Closed)?
//!     .add_rule(Door::Closed, Push::Open, Door::Open)?;
//! workflow.seal();
//!
//! assert_eq!(workflow.transition(Door::Open, Push::Close)?, Door::Closed);
//! assert_eq!(workflow.transition(Door::Open, Push::Open)?, Door::Open);
//! # Ok::<(), statusflow_core::WorkflowError>(())
//! ```

use std::sync::OnceLock;

use statusflow_core::{Lifecycle, PreSealQueries, Token, WorkflowConfig, WorkflowError};

use crate::table::TransitionTable;

/// A rule table with a build-then-seal lifecycle.
#[derive(Debug, Clone)]
pub struct Workflow<S: Token, O: Token> {
    table: TransitionTable<S, O>,
    lifecycle: Lifecycle,
    config: WorkflowConfig,
    valid_operations: OnceLock<Vec<O>>,
    valid_statuses: OnceLock<Vec<S>>,
}

impl<S: Token, O: Token> Workflow<S, O> {
    /// Create an empty workflow in the `Building` phase with default config.
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    /// Create an empty workflow in the `Building` phase.
    pub fn with_config(config: WorkflowConfig) -> Self {
        Self {
            table: TransitionTable::new(),
            lifecycle: Lifecycle::Building,
            config,
            valid_operations: OnceLock::new(),
            valid_statuses: OnceLock::new(),
        }
    }

    /// Add `from --on--> to`.
    ///
    /// If `(from, on)` already has a result the call is ignored; the first
    /// rule wins. Fails once the workflow is sealed.
    pub fn add_rule(&mut self, from: S, on: O, to: S) -> Result<&mut Self, WorkflowError> {
        if self.lifecycle.is_sealed() {
            return Err(WorkflowError::sealed("add_rule"));
        }
        if !self.table.insert(from, on, to) {
            tracing::trace!(
                from = %from,
                on = %on,
                ignored = %to,
                "rule already defined, keeping first"
            );
        }
        Ok(self)
    }

    /// Add several branches leaving `from` at once.
    ///
    /// ```
    /// # use statusflow_core::tokens;
    /// # use statusflow_state::Workflow;
    /// # tokens! { pub enum S { Modified, Submitted, Published } }
    /// # tokens! { pub enum O { Submit, Publish } }
    /// let mut workflow = Workflow::new();
    /// workflow.add_rules(S::Modified, [(O::Submit, S::Submitted), (O::Publish, S::Published)])?;
    /// # Ok::<(), statusflow_core::WorkflowError>(())
    /// ```
    pub fn add_rules<I>(&mut self, from: S, branches: I) -> Result<&mut Self, WorkflowError>
    where
        I: IntoIterator<Item = (O, S)>,
    {
        if self.lifecycle.is_sealed() {
            return Err(WorkflowError::sealed("add_rules"));
        }
        for (on, to) in branches {
            self.add_rule(from, on, to)?;
        }
        Ok(self)
    }

    /// Freeze the rule table. Idempotent.
    ///
    /// Prunes states without outgoing rules from the table. The derived
    /// views are not computed here.
    pub fn seal(&mut self) -> &mut Self {
        if !self.lifecycle.is_sealed() {
            let pruned = self.table.prune();
            self.lifecycle = Lifecycle::Sealed;
            tracing::debug!(rules = self.table.len(), pruned, "workflow sealed");
        }
        self
    }

    /// By-value form of [`seal`](Self::seal), for builder-style construction.
    pub fn sealed(mut self) -> Self {
        self.seal();
        self
    }

    /// Current lifecycle phase.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the workflow has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.lifecycle.is_sealed()
    }

    /// Policy settings of this workflow.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Read-only access to the rule table.
    pub fn table(&self) -> &TransitionTable<S, O> {
        &self.table
    }

    /// Operations used by at least one rule, in first-seen order.
    pub fn valid_operations(&self) -> Result<&[O], WorkflowError> {
        if !self.is_sealed() {
            return self.pre_seal_view("valid_operations");
        }
        let operations = self.valid_operations.get_or_init(|| {
            let mut seen = Vec::new();
            for rule in self.table.rules() {
                push_unique(&mut seen, rule.on);
            }
            seen
        });
        Ok(operations)
    }

    /// States that are the source or target of at least one rule, in
    /// first-seen order.
    pub fn valid_statuses(&self) -> Result<&[S], WorkflowError> {
        if !self.is_sealed() {
            return self.pre_seal_view("valid_statuses");
        }
        let statuses = self.valid_statuses.get_or_init(|| {
            let mut seen = Vec::new();
            for rule in self.table.rules() {
                push_unique(&mut seen, rule.from);
                push_unique(&mut seen, rule.to);
            }
            seen
        });
        Ok(statuses)
    }

    /// The first valid state: the substitute for unrecognized values.
    ///
    /// `None` before sealing or when the workflow has no rules.
    pub fn default_state(&self) -> Option<S> {
        if !self.is_sealed() {
            return None;
        }
        self.valid_statuses().ok()?.first().copied()
    }

    /// Whether `state` appears in the sealed workflow's valid statuses.
    pub fn recognizes(&self, state: S) -> bool {
        self.is_sealed()
            && self
                .valid_statuses()
                .map(|statuses| statuses.contains(&state))
                .unwrap_or(false)
    }

    /// Apply `on` to `from`.
    ///
    /// Returns the mapped state, or `from` unchanged if no rule matches.
    /// Fails only when the workflow is not yet sealed.
    pub fn transition(&self, from: S, on: O) -> Result<S, WorkflowError> {
        if !self.is_sealed() {
            return Err(WorkflowError::unsealed("transition"));
        }
        match self.table.lookup(from, on) {
            Some(to) => Ok(to),
            None => {
                tracing::trace!(from = %from, on = %on, "no matching rule, state unchanged");
                Ok(from)
            }
        }
    }

    /// Whether a rule maps `(from, on)`.
    pub fn permits(&self, from: S, on: O) -> bool {
        self.is_sealed() && self.table.lookup(from, on).is_some()
    }

    /// Operations with a rule leaving `from`, in insertion order.
    ///
    /// Empty before sealing.
    pub fn operations_from(&self, from: S) -> Vec<O> {
        if !self.is_sealed() {
            return Vec::new();
        }
        self.table.operations_from(from)
    }

    fn pre_seal_view<T>(&self, operation: &'static str) -> Result<&[T], WorkflowError> {
        match self.config.pre_seal_queries {
            PreSealQueries::Empty => Ok(&[]),
            PreSealQueries::Reject => Err(WorkflowError::unsealed(operation)),
        }
    }
}

impl<S: Token, O: Token> Default for Workflow<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique<T: PartialEq>(seen: &mut Vec<T>, value: T) {
    if !seen.contains(&value) {
        seen.push(value);
    }
}
