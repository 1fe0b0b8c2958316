//! # Workflow Registry
//!
//! Associates a [`WorkflowKey`] with exactly one sealed workflow.
//!
//! ## Keys
//!
//! A key pairs the identity of the state type, the identity of the
//! operation type, and an owner. The owner is either a Rust type (the
//! implicit per-status-kind singleton, see [`StatusKind`](crate::StatusKind))
//! or an explicit name, so several rule sets over the same token pair can
//! coexist:
//!
//! ```text
//! (ArticleState, ArticleAction, type ArticleStatus)   → workflow #1
//! (ArticleState, ArticleAction, "simplified")         → workflow #2
//! (ArticleState, ArticleAction, "complete")           → workflow #3
//! ```
//!
//! ## Initialization
//!
//! Workflows enter the registry either lazily through
//! [`WorkflowRegistry::get_or_create`], which runs a one-time initializer and
//! seals the result, or explicitly at startup through
//! [`WorkflowRegistry::register`]. Either way an entry is written once and is
//! read-only afterwards.
//!
//! ## Concurrency
//!
//! First creation for a key happens under the registry's write lock, so
//! concurrent first access builds exactly one workflow. The lock is a
//! `parking_lot::RwLock`: non-poisoning, never held across user-visible
//! calls other than the initializer. The initializer must not call back
//! into the same registry.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use statusflow_core::{Token, WorkflowConfig, WorkflowError};

use crate::workflow::Workflow;

/// The owner half of a [`WorkflowKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    /// A Rust type owns the workflow (one workflow per type).
    Type {
        /// Identity of the owning type.
        id: TypeId,
        /// Name of the owning type, for diagnostics.
        name: &'static str,
    },
    /// An explicitly named workflow.
    Named(Cow<'static, str>),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { name, .. } => f.write_str(name),
            Self::Named(name) => write!(f, "{name:?}"),
        }
    }
}

/// Registry key: (state type, operation type, owner).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkflowKey {
    state: TypeId,
    operation: TypeId,
    state_kind: &'static str,
    operation_kind: &'static str,
    owner: Owner,
}

impl WorkflowKey {
    /// Key for the workflow owned by type `K`.
    pub fn of<S: Token, O: Token, K: ?Sized + 'static>() -> Self {
        Self::with_owner::<S, O>(Owner::Type {
            id: TypeId::of::<K>(),
            name: std::any::type_name::<K>(),
        })
    }

    /// Key for an explicitly named workflow.
    pub fn named<S: Token, O: Token>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_owner::<S, O>(Owner::Named(name.into()))
    }

    fn with_owner<S: Token, O: Token>(owner: Owner) -> Self {
        Self {
            state: TypeId::of::<S>(),
            operation: TypeId::of::<O>(),
            state_kind: S::KIND,
            operation_kind: O::KIND,
            owner,
        }
    }

    /// The owner of the keyed workflow.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Whether this key addresses workflows over `S` and `O`.
    pub fn matches<S: Token, O: Token>(&self) -> bool {
        self.state == TypeId::of::<S>() && self.operation == TypeId::of::<O>()
    }

    fn ensure_matches<S: Token, O: Token>(&self) -> Result<(), WorkflowError> {
        if self.matches::<S, O>() {
            Ok(())
        } else {
            Err(WorkflowError::KindMismatch {
                key: self.to_string(),
            })
        }
    }
}

impl fmt::Display for WorkflowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}, {}>", self.owner, self.state_kind, self.operation_kind)
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Write-once map from [`WorkflowKey`] to a sealed [`Workflow`].
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    config: WorkflowConfig,
    entries: RwLock<HashMap<WorkflowKey, Entry>>,
}

impl WorkflowRegistry {
    /// An empty registry whose created workflows use the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry whose created workflows use `config`.
    pub fn with_config(config: WorkflowConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static WorkflowRegistry {
        static GLOBAL: OnceLock<WorkflowRegistry> = OnceLock::new();
        GLOBAL.get_or_init(WorkflowRegistry::new)
    }

    /// Config applied to workflows created by [`get_or_create`](Self::get_or_create).
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Return the workflow for `key`, creating it on first access.
    ///
    /// On first access `define` receives a fresh, unsealed workflow; the
    /// registry seals it after `define` returns. If `define` fails nothing is
    /// stored and the error is returned; a later call retries.
    pub fn get_or_create<S, O, F>(
        &self,
        key: WorkflowKey,
        define: F,
    ) -> Result<Arc<Workflow<S, O>>, WorkflowError>
    where
        S: Token,
        O: Token,
        F: FnOnce(&mut Workflow<S, O>) -> Result<(), WorkflowError>,
    {
        key.ensure_matches::<S, O>()?;
        if let Some(entry) = self.entries.read().get(&key) {
            return downcast(&key, entry);
        }

        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(&key) {
            return downcast(&key, entry);
        }

        let mut workflow = Workflow::with_config(self.config);
        define(&mut workflow)?;
        workflow.seal();
        let workflow = Arc::new(workflow);
        tracing::debug!(key = %key, rules = workflow.table().len(), "workflow created");
        entries.insert(key, Arc::clone(&workflow) as Entry);
        Ok(workflow)
    }

    /// Install a sealed workflow under `key`.
    ///
    /// Fails if the workflow is still building or the key is taken.
    pub fn register<S: Token, O: Token>(
        &self,
        key: WorkflowKey,
        workflow: Workflow<S, O>,
    ) -> Result<Arc<Workflow<S, O>>, WorkflowError> {
        key.ensure_matches::<S, O>()?;
        if !workflow.is_sealed() {
            return Err(WorkflowError::unsealed("register"));
        }
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Err(WorkflowError::AlreadyRegistered {
                key: key.to_string(),
            });
        }
        let workflow = Arc::new(workflow);
        tracing::debug!(key = %key, rules = workflow.table().len(), "workflow registered");
        entries.insert(key, Arc::clone(&workflow) as Entry);
        Ok(workflow)
    }

    /// The workflow stored under `key`, if any.
    pub fn get<S: Token, O: Token>(&self, key: &WorkflowKey) -> Option<Arc<Workflow<S, O>>> {
        let entries = self.entries.read();
        downcast(key, entries.get(key)?).ok()
    }

    /// Whether a workflow is stored under `key`.
    pub fn contains(&self, key: &WorkflowKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All keys, in no particular order.
    pub fn keys(&self) -> Vec<WorkflowKey> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of stored workflows.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no workflow is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn downcast<S: Token, O: Token>(
    key: &WorkflowKey,
    entry: &Entry,
) -> Result<Arc<Workflow<S, O>>, WorkflowError> {
    Arc::clone(entry)
        .downcast::<Workflow<S, O>>()
        .map_err(|_| WorkflowError::KindMismatch { key: key.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    use statusflow_core::{tokens, Lifecycle, PreSealQueries};

    tokens! {
        enum Ticket {
            Open,
            Resolved,
            Closed,
        }
    }

    tokens! {
        enum Step {
            Resolve,
            Close,
            Reopen,
        }
    }

    struct TicketStatus;
    struct EscalatedStatus;

    fn define_basic(workflow: &mut Workflow<Ticket, Step>) -> Result<(), WorkflowError> {
        workflow
            .add_rule(Ticket::Open, Step::Resolve, Ticket::Resolved)?
            .add_rule(Ticket::Resolved, Step::Close, Ticket::Closed)?;
        Ok(())
    }

    #[test]
    fn test_key_identity() {
        let a = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        let b = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        let c = WorkflowKey::of::<Ticket, Step, EscalatedStatus>();
        let d = WorkflowKey::of::<Step, Ticket, TicketStatus>();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(
            WorkflowKey::named::<Ticket, Step>("simple"),
            WorkflowKey::named::<Ticket, Step>("complete")
        );
    }

    #[test]
    fn test_key_display() {
        let key = WorkflowKey::named::<Ticket, Step>("simple");
        assert_eq!(key.to_string(), "\"simple\"<Ticket, Step>");
        let key = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        assert!(key.to_string().ends_with("TicketStatus<Ticket, Step>"));
    }

    #[test]
    fn test_get_or_create_builds_once() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        let calls = AtomicUsize::new(0);

        let first = registry
            .get_or_create(key.clone(), |w| {
                calls.fetch_add(1, Ordering::SeqCst);
                define_basic(w)
            })
            .unwrap();
        let second = registry
            .get_or_create(key.clone(), |w: &mut Workflow<Ticket, Step>| {
                calls.fetch_add(1, Ordering::SeqCst);
                define_basic(w)
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.lifecycle(), Lifecycle::Sealed);
    }

    #[test]
    fn test_get_or_create_failure_stores_nothing() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Ticket, Step>("broken");
        let err = registry
            .get_or_create(key.clone(), |w: &mut Workflow<Ticket, Step>| {
                w.seal();
                define_basic(w)
            })
            .unwrap_err();
        assert_eq!(err, WorkflowError::sealed("add_rule"));
        assert!(!registry.contains(&key));

        let workflow = registry.get_or_create(key.clone(), define_basic).unwrap();
        assert_eq!(workflow.table().len(), 2);
    }

    #[test]
    fn test_concurrent_first_access_builds_once() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let workflows: Vec<Arc<Workflow<Ticket, Step>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        registry
                            .get_or_create(key.clone(), |w| {
                                calls.fetch_add(1, Ordering::SeqCst);
                                define_basic(w)
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for workflow in &workflows[1..] {
            assert!(Arc::ptr_eq(&workflows[0], workflow));
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Ticket, Step>("simple");
        let mut workflow = Workflow::new();
        define_basic(&mut workflow).unwrap();

        let stored = registry.register(key.clone(), workflow.sealed()).unwrap();
        let fetched = registry.get::<Ticket, Step>(&key).unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.keys(), vec![key]);
    }

    #[test]
    fn test_register_rejects_unsealed() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Ticket, Step>("draft");
        let err = registry
            .register(key.clone(), Workflow::<Ticket, Step>::new())
            .unwrap_err();
        assert_eq!(err, WorkflowError::unsealed("register"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicate_key() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Ticket, Step>("simple");
        registry
            .register(key.clone(), Workflow::<Ticket, Step>::new().sealed())
            .unwrap();
        let err = registry
            .register(key.clone(), Workflow::<Ticket, Step>::new().sealed())
            .unwrap_err();
        assert_eq!(err.code(), "ALREADY_REGISTERED");
    }

    #[test]
    fn test_get_or_create_after_register_returns_registered() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::of::<Ticket, Step, EscalatedStatus>();
        let registered = registry
            .register(key.clone(), Workflow::<Ticket, Step>::new().sealed())
            .unwrap();
        let fetched = registry.get_or_create(key, define_basic).unwrap();
        assert!(Arc::ptr_eq(&registered, &fetched));
        assert!(fetched.table().is_empty());
    }

    #[test]
    fn test_get_or_create_rejects_key_for_other_tokens() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Step, Ticket>("swapped");
        let err = registry.get_or_create(key.clone(), define_basic).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::KindMismatch {
                key: key.to_string()
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_rejects_key_for_other_tokens() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Step, Step>("mismatch");
        let err = registry
            .register(key.clone(), Workflow::<Ticket, Step>::new().sealed())
            .unwrap_err();
        assert_eq!(err.code(), "KIND_MISMATCH");
        assert!(!registry.contains(&key));
    }

    #[test]
    fn test_key_matches() {
        let key = WorkflowKey::of::<Ticket, Step, TicketStatus>();
        assert!(key.matches::<Ticket, Step>());
        assert!(!key.matches::<Step, Ticket>());
    }

    #[test]
    fn test_get_missing() {
        let registry = WorkflowRegistry::new();
        let key = WorkflowKey::named::<Ticket, Step>("absent");
        assert!(registry.get::<Ticket, Step>(&key).is_none());
    }

    #[test]
    fn test_registry_config_applies_to_created_workflows() {
        let registry = WorkflowRegistry::with_config(WorkflowConfig::strict());
        let key = WorkflowKey::named::<Ticket, Step>("strict");
        let workflow = registry.get_or_create(key, define_basic).unwrap();
        assert_eq!(workflow.config().pre_seal_queries, PreSealQueries::Reject);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(WorkflowRegistry::global(), WorkflowRegistry::global()));
    }
}
