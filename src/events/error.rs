//! Errors for event binding and dispatch.

use thiserror::Error;

use super::{MachineEvent, StateEvent};
use crate::core::StateId;

/// Boxed error a handler may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An event name outside the fixed enumeration was used.
#[derive(Debug, Error)]
#[error("unknown {namespace} event type `{name}`; expected one of [{expected}]")]
pub struct UnknownEventError {
    /// Which namespace was addressed, `"state"` or `"machine"`.
    pub namespace: &'static str,
    /// The offending name.
    pub name: String,
    /// The accepted names, for the error message.
    pub expected: &'static str,
}

/// A bound handler failed during dispatch.
///
/// Dispatch is aborted at the failing handler; the error carries the event
/// (and state, for state events) that was being delivered.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A state-event handler failed.
    #[error("`{event}` handler for state `{state}` failed: {source}")]
    State {
        state: StateId,
        event: StateEvent,
        #[source]
        source: BoxError,
    },

    /// A machine-event handler failed.
    #[error("`{event}` handler failed: {source}")]
    Machine {
        event: MachineEvent,
        #[source]
        source: BoxError,
    },
}
