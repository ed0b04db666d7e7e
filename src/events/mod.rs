//! Lifecycle events and their synchronous dispatcher.
//!
//! Two fixed namespaces: state events fire on the states an engine pass
//! touches, machine events bracket each internal pass. Handler lists are
//! kept per `(state, event)` and per machine event, invoked in registration
//! order with no error isolation: the first failing handler aborts the
//! remainder of the dispatch and the error propagates to the caller that
//! fed the machine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::StateId;

pub mod error;

pub use error::{BoxError, DispatchError, UnknownEventError};

/// Result a handler returns; `Err` aborts the dispatch in progress.
pub type HandlerResult = Result<(), BoxError>;

type Handler = Box<dyn FnMut() -> HandlerResult + Send>;

/// Lifecycle events of a single state.
///
/// `Leaving` fires once each time the state is dequeued as a source;
/// `Leave` fires once per newly-discovered distinct destination the state
/// produces. `Arriving` and `Arrive` bracket a state's insertion into the
/// new active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateEvent {
    Arriving,
    Arrive,
    Leaving,
    Leave,
}

impl StateEvent {
    /// Every state event, in dispatch-documentation order.
    pub const ALL: [StateEvent; 4] = [
        StateEvent::Arriving,
        StateEvent::Arrive,
        StateEvent::Leaving,
        StateEvent::Leave,
    ];

    /// The event's wire name.
    pub fn name(self) -> &'static str {
        match self {
            StateEvent::Arriving => "arriving",
            StateEvent::Arrive => "arrive",
            StateEvent::Leaving => "leaving",
            StateEvent::Leave => "leave",
        }
    }
}

impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateEvent {
    type Err = UnknownEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arriving" => Ok(StateEvent::Arriving),
            "arrive" => Ok(StateEvent::Arrive),
            "leaving" => Ok(StateEvent::Leaving),
            "leave" => Ok(StateEvent::Leave),
            other => Err(UnknownEventError {
                namespace: "state",
                name: other.to_string(),
                expected: "arriving, arrive, leaving, leave",
            }),
        }
    }
}

/// Lifecycle events of the machine as a whole.
///
/// `Changing` fires before a pass begins consuming its queue, `Change`
/// after the pass's new set is finalized. A single public `input` call can
/// emit several pairs, one per internal pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineEvent {
    Changing,
    Change,
}

impl MachineEvent {
    /// Every machine event.
    pub const ALL: [MachineEvent; 2] = [MachineEvent::Changing, MachineEvent::Change];

    /// The event's wire name.
    pub fn name(self) -> &'static str {
        match self {
            MachineEvent::Changing => "changing",
            MachineEvent::Change => "change",
        }
    }
}

impl fmt::Display for MachineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MachineEvent {
    type Err = UnknownEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "changing" => Ok(MachineEvent::Changing),
            "change" => Ok(MachineEvent::Change),
            other => Err(UnknownEventError {
                namespace: "machine",
                name: other.to_string(),
                expected: "changing, change",
            }),
        }
    }
}

/// Ordered handler lists for both event namespaces.
#[derive(Default)]
pub struct EventDispatcher {
    state_handlers: HashMap<StateId, HashMap<StateEvent, Vec<Handler>>>,
    machine_handlers: HashMap<MachineEvent, Vec<Handler>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no handlers bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the list for `(state, event)`.
    pub fn bind_state<F>(&mut self, state: impl Into<StateId>, event: StateEvent, handler: F)
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        self.state_handlers
            .entry(state.into())
            .or_default()
            .entry(event)
            .or_default()
            .push(Box::new(handler));
    }

    /// Append a handler to the list for `event`.
    pub fn bind_machine<F>(&mut self, event: MachineEvent, handler: F)
    where
        F: FnMut() -> HandlerResult + Send + 'static,
    {
        self.machine_handlers
            .entry(event)
            .or_default()
            .push(Box::new(handler));
    }

    /// Invoke the handlers bound to `(state, event)`, in registration order.
    pub fn emit_state(&mut self, state: &str, event: StateEvent) -> Result<(), DispatchError> {
        let Some(handlers) = self
            .state_handlers
            .get_mut(state)
            .and_then(|slots| slots.get_mut(&event))
        else {
            return Ok(());
        };

        for handler in handlers {
            handler().map_err(|source| DispatchError::State {
                state: state.to_string(),
                event,
                source,
            })?;
        }
        Ok(())
    }

    /// Invoke the handlers bound to `event`, in registration order.
    pub fn emit_machine(&mut self, event: MachineEvent) -> Result<(), DispatchError> {
        let Some(handlers) = self.machine_handlers.get_mut(&event) else {
            return Ok(());
        };

        for handler in handlers {
            handler().map_err(|source| DispatchError::Machine { event, source })?;
        }
        Ok(())
    }

    /// Drop every handler bound to `state`. Called when the state is
    /// deleted from the table.
    pub fn remove_state(&mut self, state: &str) {
        self.state_handlers.remove(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Handler) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let log = Arc::clone(&log);
            move |tag: &str| -> Handler {
                let log = Arc::clone(&log);
                let tag = tag.to_string();
                Box::new(move || {
                    log.lock().unwrap().push(tag.clone());
                    Ok(())
                })
            }
        };
        (log, make)
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();

        dispatcher.bind_state("A", StateEvent::Arrive, make("first"));
        dispatcher.bind_state("A", StateEvent::Arrive, make("second"));
        dispatcher.bind_state("A", StateEvent::Leave, make("other event"));

        dispatcher.emit_state("A", StateEvent::Arrive).unwrap();
        assert_eq!(*log.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn emit_without_bindings_is_a_no_op() {
        let mut dispatcher = EventDispatcher::new();
        assert!(dispatcher.emit_state("A", StateEvent::Arriving).is_ok());
        assert!(dispatcher.emit_machine(MachineEvent::Change).is_ok());
    }

    #[test]
    fn failing_handler_aborts_the_rest() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();

        dispatcher.bind_state("A", StateEvent::Arrive, make("ran"));
        dispatcher.bind_state("A", StateEvent::Arrive, || Err("boom".into()));
        dispatcher.bind_state("A", StateEvent::Arrive, make("never"));

        let err = dispatcher.emit_state("A", StateEvent::Arrive).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::State {
                event: StateEvent::Arrive,
                ..
            }
        ));
        assert_eq!(err.to_string(), "`arrive` handler for state `A` failed: boom");
        assert_eq!(*log.lock().unwrap(), ["ran"]);
    }

    #[test]
    fn machine_handler_failure_carries_the_event() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.bind_machine(MachineEvent::Changing, || Err("nope".into()));

        let err = dispatcher.emit_machine(MachineEvent::Changing).unwrap_err();
        assert_eq!(err.to_string(), "`changing` handler failed: nope");
    }

    #[test]
    fn remove_state_drops_all_bindings() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.bind_state("A", StateEvent::Arrive, make("gone"));

        dispatcher.remove_state("A");
        dispatcher.emit_state("A", StateEvent::Arrive).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn event_names_parse_and_display() {
        for event in StateEvent::ALL {
            assert_eq!(event.name().parse::<StateEvent>().unwrap(), event);
        }
        for event in MachineEvent::ALL {
            assert_eq!(event.name().parse::<MachineEvent>().unwrap(), event);
        }
    }

    #[test]
    fn unknown_event_names_are_descriptive_errors() {
        let err = "arrival".parse::<StateEvent>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown state event type `arrival`; expected one of [arriving, arrive, leaving, leave]"
        );

        let err = "changed".parse::<MachineEvent>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown machine event type `changed`; expected one of [changing, change]"
        );
    }

    #[test]
    fn event_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&StateEvent::Arriving).unwrap(),
            "\"arriving\""
        );
        assert_eq!(
            serde_json::from_str::<MachineEvent>("\"change\"").unwrap(),
            MachineEvent::Change
        );
    }
}
