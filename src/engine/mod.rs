//! The transition engine.
//!
//! Given the active set and one input symbol, the engine computes the next
//! active set: a pass over the queue of current states, then epsilon passes
//! repeated to a fixed point. The engine is the single writer of the active
//! set; it borrows the state table read-only and the dispatcher mutably so
//! every rule operates on an explicit receiver rather than captured
//! variables.
//!
//! Pass semantics, per source state popped off the queue in insertion
//! order:
//!
//! 1. `leaving` fires once.
//! 2. Destinations resolve to the explicit target for the symbol if one is
//!    defined; otherwise, on the empty symbol, to the state itself (staying
//!    put is the default epsilon behavior); otherwise to the null state —
//!    the branch dies.
//! 3. Each destination not already collected and not the null state fires
//!    `leave` (source), `arriving` (destination), is appended, then fires
//!    `arrive`. A source's `leave` therefore fires once per newly
//!    discovered destination, and not at all if every destination was a
//!    duplicate or null.
//!
//! `changing` fires before a pass consumes its queue and `change` after the
//! pass's set is finalized, for every internal pass.
//!
//! The epsilon closure runs as long as the frontier is non-empty and some
//! member defines an explicit epsilon transition, accumulating every state
//! visited by this call. A pass that produces no previously-unvisited state
//! means the frontier has entered an epsilon cycle; the step then finalizes
//! to the visited superset. Each state is discovered at most once per call,
//! so the work is bounded by the number of distinct states.

use indexmap::IndexSet;
use tracing::trace;

use crate::core::{is_epsilon, is_null_state, StateId, StateTable, EPSILON};
use crate::events::{DispatchError, EventDispatcher, MachineEvent, StateEvent};

/// The active set: insertion-ordered, duplicate-free.
pub(crate) type ActiveSet = IndexSet<StateId>;

/// Result of one logical transition.
#[derive(Debug)]
pub(crate) struct StepOutcome {
    /// The new active set, in first-discovery order.
    pub active: ActiveSet,
    /// Internal passes run, the initial symbol pass included.
    pub passes: usize,
}

/// One step's worth of borrowed machine state.
pub(crate) struct Engine<'m> {
    table: &'m StateTable,
    events: &'m mut EventDispatcher,
}

impl<'m> Engine<'m> {
    pub(crate) fn new(table: &'m StateTable, events: &'m mut EventDispatcher) -> Self {
        Self { table, events }
    }

    /// Run one logical transition of `symbol` against `active`.
    pub(crate) fn advance(
        &mut self,
        active: ActiveSet,
        symbol: &str,
    ) -> Result<StepOutcome, DispatchError> {
        // States visited by this call's closure computation. When the public
        // symbol is itself epsilon the whole step is closure work, so the
        // incoming set counts as visited too.
        let mut visited: ActiveSet = if is_epsilon(symbol) {
            active.clone()
        } else {
            ActiveSet::new()
        };

        let mut current = self.pass(&active, symbol)?;
        let mut passes = 1;
        visited.extend(current.iter().cloned());
        self.events.emit_machine(MachineEvent::Change)?;

        while !current.is_empty() && self.frontier_has_epsilon(&current) {
            let next = self.pass(&current, EPSILON)?;
            passes += 1;

            let grew = next.iter().any(|id| !visited.contains(id.as_str()));
            visited.extend(next.iter().cloned());

            if grew {
                current = next;
                self.events.emit_machine(MachineEvent::Change)?;
            } else {
                // The frontier oscillates inside already-visited states: an
                // epsilon cycle. Close over everything this call visited;
                // each of those states was discovered exactly once.
                trace!(passes, "epsilon cycle, closing over visited states");
                current = visited;
                self.events.emit_machine(MachineEvent::Change)?;
                return Ok(StepOutcome {
                    active: current,
                    passes,
                });
            }
        }

        Ok(StepOutcome {
            active: current,
            passes,
        })
    }

    /// One pass: drain `queue` on `symbol`, building the next set.
    fn pass(&mut self, queue: &ActiveSet, symbol: &str) -> Result<ActiveSet, DispatchError> {
        self.events.emit_machine(MachineEvent::Changing)?;

        let mut next = ActiveSet::new();
        for source in queue {
            self.events.emit_state(source, StateEvent::Leaving)?;

            let Some(state) = self.table.state(source) else {
                // Dangling source (deleted after it went active): no
                // destinations resolve, the branch dies.
                continue;
            };

            match state.transition(symbol) {
                Some(target) => {
                    for dest in target.iter() {
                        if is_null_state(dest) || next.contains(dest.as_str()) {
                            continue;
                        }
                        if !self.table.contains(dest) {
                            // Dangling destination: treated as the null state.
                            continue;
                        }
                        self.events.emit_state(source, StateEvent::Leave)?;
                        self.events.emit_state(dest, StateEvent::Arriving)?;
                        next.insert(dest.clone());
                        self.events.emit_state(dest, StateEvent::Arrive)?;
                    }
                }
                None if is_epsilon(symbol) => {
                    // No explicit epsilon move: stay put.
                    if !next.contains(source.as_str()) {
                        self.events.emit_state(source, StateEvent::Leave)?;
                        self.events.emit_state(source, StateEvent::Arriving)?;
                        next.insert(source.clone());
                        self.events.emit_state(source, StateEvent::Arrive)?;
                    }
                }
                None => {
                    // No transition on this symbol: the branch dies.
                }
            }
        }

        trace!(symbol, from = ?queue, to = ?next, "pass");
        Ok(next)
    }

    /// Whether any frontier state defines an explicit epsilon transition.
    fn frontier_has_epsilon(&self, frontier: &ActiveSet) -> bool {
        frontier.iter().any(|id| {
            self.table
                .state(id)
                .is_some_and(|state| state.transition(EPSILON).is_some())
        })
    }
}
