//! # Transition Table
//!
//! Two-level mapping `state → (operation → state)`.
//!
//! A fresh table holds an empty bucket for every declared state. Rules are
//! inserted with "insert if absent" semantics: the first result recorded for
//! a (state, operation) pair wins and later inserts for the same pair are
//! ignored. Pruning removes the buckets that never received a rule.
//!
//! The table also keeps the rules in insertion order, which is what the
//! workflow's derived views are computed from.

use std::collections::HashMap;

use statusflow_core::Token;

/// One `from --on--> to` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule<S, O> {
    /// Source state.
    pub from: S,
    /// Triggering operation.
    pub on: O,
    /// Resulting state.
    pub to: S,
}

/// State-to-operation-to-state mapping with insertion-ordered rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable<S: Token, O: Token> {
    buckets: HashMap<S, HashMap<O, S>>,
    rules: Vec<Rule<S, O>>,
}

impl<S: Token, O: Token> TransitionTable<S, O> {
    /// Create a table with an empty bucket for every declared state.
    pub fn new() -> Self {
        Self {
            buckets: S::ALL.iter().map(|&state| (state, HashMap::new())).collect(),
            rules: Vec::new(),
        }
    }

    /// Insert `from --on--> to` unless `(from, on)` is already mapped.
    ///
    /// Returns `true` if the rule was recorded.
    pub(crate) fn insert(&mut self, from: S, on: O, to: S) -> bool {
        let bucket = self.buckets.entry(from).or_default();
        if bucket.contains_key(&on) {
            return false;
        }
        bucket.insert(on, to);
        self.rules.push(Rule { from, on, to });
        true
    }

    /// Remove buckets that hold no rules. Returns how many were removed.
    pub(crate) fn prune(&mut self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        before - self.buckets.len()
    }

    /// The result recorded for `(from, on)`, if any.
    pub fn lookup(&self, from: S, on: O) -> Option<S> {
        self.buckets.get(&from)?.get(&on).copied()
    }

    /// States that currently own a bucket, in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = S> + '_ {
        S::ALL
            .iter()
            .copied()
            .filter(move |state| self.buckets.contains_key(state))
    }

    /// Operations mapped from `from`, in insertion order.
    pub fn operations_from(&self, from: S) -> Vec<O> {
        self.rules
            .iter()
            .filter(|rule| rule.from == from)
            .map(|rule| rule.on)
            .collect()
    }

    /// All recorded rules, in insertion order.
    pub fn rules(&self) -> &[Rule<S, O>] {
        &self.rules
    }

    /// Number of recorded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Token, O: Token> Default for TransitionTable<S, O> {
    fn default() -> Self {
        Self::new()
    }
}
