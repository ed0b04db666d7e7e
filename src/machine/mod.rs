//! The machine façade: feed symbols, observe the active set.
//!
//! A [`Machine`] composes the state table, the event dispatcher, and the
//! transition engine, and owns the active set and the step trace. The
//! active set is replaced wholesale by the engine on every `input`/`reset`;
//! nothing else writes it.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::builder::MachineBuilder;
use crate::core::{
    is_null_state, State, StateId, StateTable, StepRecord, StepTrace, Target, EPSILON,
};
use crate::engine::{ActiveSet, Engine};
use crate::events::{EventDispatcher, HandlerResult, MachineEvent, StateEvent};

pub mod error;

pub use error::MachineError;

/// A running automaton: states, transitions, handlers, and the set of
/// states currently active.
///
/// # Example
///
/// ```rust
/// use superpose::Machine;
///
/// let mut machine = Machine::builder()
///     .state("A", false)
///     .state("D", true)
///     .state("E", false)
///     .transition("A", "", "E")
///     .transition("E", "d", "D")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.state(), ["E"]);
///
/// machine.input("d").unwrap();
/// assert!(machine.accepted());
///
/// machine.input("x").unwrap();
/// assert!(machine.null_state());
/// ```
pub struct Machine {
    id: Uuid,
    table: StateTable,
    events: EventDispatcher,
    active: ActiveSet,
    trace: StepTrace,
}

impl Machine {
    /// Create an empty machine: no states, no start state, empty active
    /// set. The first state added becomes the start state; call [`reset`]
    /// afterwards to seed the active set from it.
    ///
    /// [`reset`]: Machine::reset
    pub fn new() -> Self {
        Self::from_table(StateTable::new())
    }

    /// Start building a machine from a definition.
    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    pub(crate) fn from_table(table: StateTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            events: EventDispatcher::new(),
            active: ActiveSet::new(),
            trace: StepTrace::new(),
        }
    }

    /// Feed one symbol and return the new active set.
    ///
    /// Runs one logical transition: a pass consuming `symbol`, then epsilon
    /// passes to the closure fixed point. The returned vector is a
    /// snapshot; mutating it does not touch the machine.
    ///
    /// If a bound handler fails, the error propagates and the active set is
    /// left as it was before the call.
    pub fn input(&mut self, symbol: &str) -> Result<Vec<StateId>, MachineError> {
        self.step(symbol)
    }

    /// Re-seed the active set from the start state and apply its epsilon
    /// closure, regardless of prior history.
    ///
    /// With no start state (or a start state that has since been deleted)
    /// the machine comes up empty.
    pub fn reset(&mut self) -> Result<Vec<StateId>, MachineError> {
        self.active = self.table.start().map(str::to_string).into_iter().collect();
        self.step(EPSILON)
    }

    fn step(&mut self, symbol: &str) -> Result<Vec<StateId>, MachineError> {
        let from = self.state();
        let outcome =
            Engine::new(&self.table, &mut self.events).advance(self.active.clone(), symbol)?;
        self.active = outcome.active;

        let to = self.state();
        debug!(
            machine = %self.id,
            symbol,
            from = ?from,
            to = ?to,
            passes = outcome.passes,
            "step"
        );
        self.trace = self.trace.record(StepRecord {
            symbol: symbol.to_string(),
            from,
            to: to.clone(),
            passes: outcome.passes,
            timestamp: Utc::now(),
        });
        Ok(to)
    }

    /// Snapshot of the active set, in first-discovery order.
    pub fn state(&self) -> Vec<StateId> {
        self.active.iter().cloned().collect()
    }

    /// Whether some active state is final.
    pub fn accepted(&self) -> bool {
        self.active
            .iter()
            .any(|id| self.table.state(id).is_some_and(State::is_final))
    }

    /// Whether the active set is empty: the machine has rejected its input.
    /// Once empty it stays empty for any further input.
    pub fn null_state(&self) -> bool {
        self.active.is_empty()
    }

    /// The start-state id, if one has been set or promoted.
    pub fn start_state(&self) -> Option<&str> {
        self.table.start()
    }

    /// Read-only view of the state table.
    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// The step-by-step trace of every `input`/`reset` so far.
    pub fn trace(&self) -> &StepTrace {
        &self.trace
    }

    /// Add a state. Returns `Ok(true)` if it was inserted, `Ok(false)` if
    /// the id already existed (a silent no-op: the existing state is never
    /// overwritten).
    ///
    /// On an empty machine the added state is promoted to start state. The
    /// active set is untouched; call [`reset`] to seed it. Transition
    /// targets must name an existing state, the state being added, or the
    /// null sentinel.
    ///
    /// [`reset`]: Machine::reset
    pub fn add_state<I>(
        &mut self,
        id: impl Into<StateId>,
        is_final: bool,
        transitions: I,
    ) -> Result<bool, MachineError>
    where
        I: IntoIterator<Item = (String, Target)>,
    {
        let id = id.into();
        let transitions: Vec<(String, Target)> = transitions.into_iter().collect();
        for (_, target) in &transitions {
            if let Some(unknown) = self.table.unknown_target(target) {
                if unknown != id {
                    return Err(MachineError::UnknownState(unknown.to_string()));
                }
            }
        }
        Ok(self.table.add_state(id, is_final, transitions))
    }

    /// Remove a state and every handler bound to it. Returns `true` if it
    /// existed.
    ///
    /// Transitions elsewhere that reference the removed state are left in
    /// place and resolve to the null state from then on; the active set is
    /// not rewritten until the next step.
    pub fn delete_state(&mut self, id: &str) -> bool {
        let removed = self.table.delete_state(id);
        if removed {
            self.events.remove_state(id);
        }
        removed
    }

    /// Set or overwrite the destination for `(from, symbol)`.
    ///
    /// Every destination must name an existing state or the null sentinel.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: impl Into<String>,
        to: impl Into<Target>,
    ) -> Result<(), MachineError> {
        let target = to.into();
        if !self.table.contains(from) {
            return Err(MachineError::UnknownState(from.to_string()));
        }
        if let Some(unknown) = self.table.unknown_target(&target) {
            return Err(MachineError::UnknownState(unknown.to_string()));
        }
        self.table.add_transition(from, symbol, target);
        Ok(())
    }

    /// Remove the mapping for `(from, symbol)`. Returns `true` if one
    /// existed; a missing state or mapping is a no-op.
    pub fn delete_transition(&mut self, from: &str, symbol: &str) -> bool {
        self.table.delete_transition(from, symbol)
    }

    /// Update a state's final flag. The null state stays non-final.
    pub fn set_final(&mut self, id: &str, is_final: bool) -> Result<(), MachineError> {
        if self.table.set_final(id, is_final) {
            Ok(())
        } else {
            Err(MachineError::UnknownState(id.to_string()))
        }
    }

    /// Whether `(id, symbol)` resolves to a transition. Epsilon is always
    /// available on a live state.
    pub fn has_transition(&self, id: &str, symbol: &str) -> bool {
        self.table.has_transition(id, symbol)
    }

    /// Whether the state exists and defines at least one explicit
    /// transition.
    pub fn has_transitions(&self, id: &str) -> bool {
        self.table.has_transitions(id)
    }

    /// Whether any of `ids` defines at least one explicit transition.
    pub fn any_has_transitions<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().any(|id| self.table.has_transitions(id))
    }

    /// Whether any currently active state defines at least one explicit
    /// transition — i.e. whether feeding more symbols can still move the
    /// machine somewhere other than "stay or die".
    pub fn active_has_transitions(&self) -> bool {
        self.active
            .iter()
            .any(|id| self.table.has_transitions(id))
    }

    /// Bind a handler to a state-lifecycle event.
    ///
    /// The state must exist; the null sentinel is rejected because its
    /// events can never fire.
    pub fn bind_state_event<F>(
        &mut self,
        state: &str,
        event: StateEvent,
        handler: F,
    ) -> Result<(), MachineError>
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        if is_null_state(state) || !self.table.contains(state) {
            return Err(MachineError::UnknownState(state.to_string()));
        }
        self.events.bind_state(state, event, handler);
        Ok(())
    }

    /// Bind a handler to a machine-lifecycle event.
    pub fn bind_machine_event<F>(&mut self, event: MachineEvent, handler: F)
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        self.events.bind_machine(event, handler);
    }

    /// [`bind_state_event`] with the event given by name, for
    /// configuration-driven callers. Names outside the fixed enumeration
    /// fail with a descriptive error.
    ///
    /// [`bind_state_event`]: Machine::bind_state_event
    pub fn bind_state_event_named<F>(
        &mut self,
        state: &str,
        event: &str,
        handler: F,
    ) -> Result<(), MachineError>
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        let event: StateEvent = event.parse()?;
        self.bind_state_event(state, event, handler)
    }

    /// [`bind_machine_event`] with the event given by name.
    ///
    /// [`bind_machine_event`]: Machine::bind_machine_event
    pub fn bind_machine_event_named<F>(
        &mut self,
        event: &str,
        handler: F,
    ) -> Result<(), MachineError>
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        let event: MachineEvent = event.parse()?;
        self.bind_machine_event(event, handler);
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
