//! Builder API for constructing machines from a definition.
//!
//! A definition is a set of states (id, final flag, transition map) plus an
//! optional explicit start state. Validation runs at `build` time, after
//! every state has been collected, so states may reference each other in
//! any order. The built machine comes up already reset: its active set is
//! the epsilon closure of the start state.

pub mod error;
pub mod macros;

pub use error::BuildError;

use crate::core::{StateId, StateTable, Target};
use crate::machine::Machine;

/// Fluent builder for a [`Machine`].
///
/// # Example
///
/// ```rust
/// use superpose::Machine;
///
/// let machine = Machine::builder()
///     .state("A", false)
///     .state("E", false)
///     .state("D", true)
///     .transition("A", "", "E")
///     .transition("E", "d", "D")
///     .start("A")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.start_state(), Some("A"));
/// assert_eq!(machine.state(), ["E"]);
/// ```
pub struct MachineBuilder {
    start: Option<StateId>,
    states: Vec<(StateId, bool, Vec<(String, Target)>)>,
    transitions: Vec<(StateId, String, Target)>,
}

impl MachineBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            start: None,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Set the start state explicitly. Without this, the first state added
    /// becomes the start state.
    pub fn start(mut self, id: impl Into<StateId>) -> Self {
        self.start = Some(id.into());
        self
    }

    /// Add a state with no transitions.
    pub fn state(self, id: impl Into<StateId>, is_final: bool) -> Self {
        self.state_with(id, is_final, Vec::new())
    }

    /// Add a state with its transition map (see the
    /// [`transitions!`](crate::transitions) macro).
    pub fn state_with<I>(mut self, id: impl Into<StateId>, is_final: bool, transitions: I) -> Self
    where
        I: IntoIterator<Item = (String, Target)>,
    {
        self.states
            .push((id.into(), is_final, transitions.into_iter().collect()));
        self
    }

    /// Add a transition between already-declared (or later-declared)
    /// states.
    pub fn transition(
        mut self,
        from: impl Into<StateId>,
        symbol: impl Into<String>,
        to: impl Into<Target>,
    ) -> Self {
        self.transitions
            .push((from.into(), symbol.into(), to.into()));
        self
    }

    /// Build the machine.
    ///
    /// Validates that the start state (if explicit) and every transition
    /// source and target name a defined state or the null sentinel, then
    /// seeds the active set by resetting.
    pub fn build(self) -> Result<Machine, BuildError> {
        let mut table = StateTable::new();
        if let Some(start) = &self.start {
            table.set_start(start.clone());
        }

        for (id, is_final, transitions) in self.states {
            table.add_state(id, is_final, transitions);
        }
        for (from, symbol, target) in self.transitions {
            if !table.contains(&from) {
                return Err(BuildError::UnknownSource { from, symbol });
            }
            table.add_transition(&from, symbol, target);
        }

        for state in table.states() {
            for (symbol, target) in state.transitions() {
                if let Some(unknown) = table.unknown_target(target) {
                    return Err(BuildError::UnknownTarget {
                        from: state.id().to_string(),
                        symbol: symbol.to_string(),
                        target: unknown.to_string(),
                    });
                }
            }
        }

        if let Some(start) = table.start() {
            if !table.contains(start) {
                return Err(BuildError::UnknownStartState(start.to_string()));
            }
        }

        let mut machine = Machine::from_table(table);
        machine
            .reset()
            .expect("no handlers are bound at build time");
        Ok(machine)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NULL_STATE;
    use crate::transitions;

    #[test]
    fn first_declared_state_is_the_default_start() {
        let machine = MachineBuilder::new()
            .state("A", false)
            .state("B", true)
            .build()
            .unwrap();

        assert_eq!(machine.start_state(), Some("A"));
        assert_eq!(machine.state(), ["A"]);
    }

    #[test]
    fn explicit_start_overrides_declaration_order() {
        let machine = MachineBuilder::new()
            .state("A", false)
            .state("B", true)
            .start("B")
            .build()
            .unwrap();

        assert_eq!(machine.state(), ["B"]);
        assert!(machine.accepted());
    }

    #[test]
    fn built_machine_is_already_closed_over_the_start() {
        let machine = MachineBuilder::new()
            .state_with("A", false, transitions! { "" => "E" })
            .state("E", false)
            .build()
            .unwrap();

        assert_eq!(machine.state(), ["E"]);
        assert_eq!(machine.trace().len(), 1);
    }

    #[test]
    fn forward_references_are_fine() {
        let machine = MachineBuilder::new()
            .state_with("A", false, transitions! { "x" => ["B", "C"] })
            .state("B", false)
            .state("C", false)
            .build();

        assert!(machine.is_ok());
    }

    #[test]
    fn null_targets_are_always_legal() {
        let machine = MachineBuilder::new()
            .state_with("A", false, transitions! { "x" => NULL_STATE })
            .build();

        assert!(machine.is_ok());
    }

    #[test]
    fn unknown_start_is_rejected() {
        let result = MachineBuilder::new().state("A", false).start("Z").build();

        assert!(matches!(result, Err(BuildError::UnknownStartState(id)) if id == "Z"));
    }

    #[test]
    fn unknown_transition_source_is_rejected() {
        let result = MachineBuilder::new()
            .state("A", false)
            .transition("ghost", "x", "A")
            .build();

        assert!(
            matches!(result, Err(BuildError::UnknownSource { from, .. }) if from == "ghost")
        );
    }

    #[test]
    fn unknown_transition_target_is_rejected() {
        let result = MachineBuilder::new()
            .state_with("A", false, transitions! { "x" => ["A", "ghost"] })
            .build();

        assert!(
            matches!(result, Err(BuildError::UnknownTarget { target, .. }) if target == "ghost")
        );
    }

    #[test]
    fn duplicate_state_declarations_keep_the_first() {
        let machine = MachineBuilder::new()
            .state("A", true)
            .state("A", false)
            .build()
            .unwrap();

        assert!(machine.accepted());
    }

    #[test]
    fn empty_definition_builds_an_empty_machine() {
        let machine = MachineBuilder::new().build().unwrap();
        assert_eq!(machine.start_state(), None);
        assert!(machine.null_state());
    }
}
