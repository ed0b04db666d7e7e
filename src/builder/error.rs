//! Build errors for machine construction.

use thiserror::Error;

use crate::core::StateId;

/// Errors that can occur when building a machine from a definition.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("start state `{0}` is not a defined state")]
    UnknownStartState(StateId),

    #[error("transition source `{from}` on {symbol:?} is not a defined state")]
    UnknownSource { from: StateId, symbol: String },

    #[error("transition from `{from}` on {symbol:?} targets undefined state `{target}`")]
    UnknownTarget {
        from: StateId,
        symbol: String,
        target: StateId,
    },
}
