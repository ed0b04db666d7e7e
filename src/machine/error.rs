//! Machine-level errors.

use thiserror::Error;

use crate::core::StateId;
use crate::events::{DispatchError, UnknownEventError};

/// Errors surfaced by the machine façade.
#[derive(Debug, Error)]
pub enum MachineError {
    /// An operation referenced a state id with no corresponding state.
    #[error("unknown state `{0}`")]
    UnknownState(StateId),

    /// An event name outside the fixed enumerations was used.
    #[error(transparent)]
    UnknownEvent(#[from] UnknownEventError),

    /// A bound handler failed while a step was dispatching events.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
