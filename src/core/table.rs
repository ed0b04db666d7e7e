//! The table of states a machine executes over.
//!
//! The table owns every [`State`] record plus the start-state id. It is pure
//! bookkeeping: no events fire here and nothing here touches the active set.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::state::{is_epsilon, is_null_state, State, StateId, Target};

/// Mapping from state id to state record, plus the start state.
///
/// Policy decisions, kept deliberately (see the crate docs):
///
/// - The first state ever added becomes the start state unless one was set
///   explicitly beforehand.
/// - Adding a state whose id already exists is a silent no-op; the existing
///   record is never overwritten.
/// - Deleting a state does not repair other states' transitions that
///   reference it; the engine treats such dangling references as the null
///   state when it encounters them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateTable {
    states: IndexMap<StateId, State>,
    start: Option<StateId>,
}

impl StateTable {
    /// Create an empty table with no start state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state explicitly. Overrides first-added promotion.
    pub(crate) fn set_start(&mut self, id: impl Into<StateId>) {
        self.start = Some(id.into());
    }

    /// The start-state id, if any state has been added or one was set.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Insert a new state. Returns `true` if the state was inserted.
    ///
    /// If `id` is already present this is a pure no-op: the final flag and
    /// transitions arguments are ignored and `false` is returned. The null
    /// state id is accepted but always stored as non-final.
    pub fn add_state<I>(&mut self, id: impl Into<StateId>, is_final: bool, transitions: I) -> bool
    where
        I: IntoIterator<Item = (String, Target)>,
    {
        let id = id.into();
        if self.states.contains_key(&id) {
            return false;
        }

        let mut state = State::new(id.clone(), is_final);
        for (symbol, target) in transitions {
            state.insert_transition(symbol, target);
        }

        if self.start.is_none() {
            self.start = Some(id.clone());
        }
        self.states.insert(id, state);
        true
    }

    /// Remove the state with `id`. Returns `true` if it existed.
    ///
    /// Transitions in other states that reference `id` are left dangling.
    /// The start-state id is not cleared either: resetting a machine whose
    /// start state was deleted yields the empty set.
    pub fn delete_state(&mut self, id: &str) -> bool {
        self.states.shift_remove(id).is_some()
    }

    /// Set or overwrite the destination for `(from, symbol)`.
    ///
    /// Returns `false` if `from` names no state. Targets are not checked
    /// here; the machine façade and builder validate them.
    pub fn add_transition(&mut self, from: &str, symbol: impl Into<String>, to: Target) -> bool {
        match self.states.get_mut(from) {
            Some(state) => {
                state.insert_transition(symbol, to);
                true
            }
            None => false,
        }
    }

    /// Remove the mapping for `(from, symbol)`, if present.
    pub fn delete_transition(&mut self, from: &str, symbol: &str) -> bool {
        self.states
            .get_mut(from)
            .and_then(|state| state.remove_transition(symbol))
            .is_some()
    }

    /// Update a state's final flag. Returns `false` if `id` names no state.
    /// The null state stays non-final no matter what is requested.
    pub fn set_final(&mut self, id: &str, is_final: bool) -> bool {
        match self.states.get_mut(id) {
            Some(state) => {
                state.set_final(is_final);
                true
            }
            None => false,
        }
    }

    /// Whether `(id, symbol)` resolves to a transition.
    ///
    /// True if an explicit mapping exists, or if `symbol` is the empty
    /// symbol and the state exists: epsilon is always conceptually
    /// available, defaulting to "stay put".
    pub fn has_transition(&self, id: &str, symbol: &str) -> bool {
        match self.states.get(id) {
            Some(state) => state.transition(symbol).is_some() || is_epsilon(symbol),
            None => false,
        }
    }

    /// Whether the state exists and defines at least one explicit transition.
    pub fn has_transitions(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(State::has_transitions)
    }

    /// Look up a state record.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// Whether `id` names a state in the table.
    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Iterate over all states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    /// Number of states in the table.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the table holds no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check that every destination of `target` names a state or the null
    /// sentinel, returning the first offending id otherwise.
    pub(crate) fn unknown_target<'t>(&self, target: &'t Target) -> Option<&'t str> {
        target
            .iter()
            .map(StateId::as_str)
            .find(|id| !is_null_state(id) && !self.contains(id))
    }
}
