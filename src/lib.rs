//! Superpose: a nondeterministic finite automaton that tracks every state
//! it could be in at once.
//!
//! A machine owns a table of states, each with a final flag and a map from
//! input symbols to one or more destination states. Feeding a symbol moves
//! the whole *active set* at once: every active state resolves its
//! destinations, duplicates collapse, and epsilon moves (the empty symbol)
//! are followed to a fixed point. Lifecycle handlers fire along the way, in
//! a defined order, so callers can react to states being entered and left.
//!
//! # Core Concepts
//!
//! - **Active set**: the states the machine occupies simultaneously, in
//!   first-discovery order. Replaced wholesale on every [`Machine::input`].
//! - **Epsilon moves**: transitions on the empty symbol, consumed without
//!   input. A state without an explicit epsilon move "stays put"; closure
//!   expansion is bounded even through epsilon cycles.
//! - **Null state**: the reserved id [`NULL_STATE`] marking a dead branch.
//!   Never final, never active.
//! - **Events**: `arriving`/`arrive`/`leaving`/`leave` per state,
//!   `changing`/`change` per machine pass, dispatched synchronously in
//!   registration order.
//!
//! # Example
//!
//! ```rust
//! use superpose::{transitions, Machine};
//!
//! let mut machine = Machine::builder()
//!     .state_with("A", false, transitions! { "" => "E" })
//!     .state_with("E", false, transitions! { "d" => "D" })
//!     .state_with("D", true, transitions! { "c" => ["B", "D"] })
//!     .state_with("B", false, transitions! { "d" => "E" })
//!     .build()
//!     .unwrap();
//!
//! // The start state A epsilon-moves straight to E.
//! assert_eq!(machine.state(), ["E"]);
//!
//! machine.input("d").unwrap();
//! assert!(machine.accepted());
//!
//! // Non-deterministic fork: both branches stay active.
//! assert_eq!(machine.input("c").unwrap(), ["B", "D"]);
//!
//! // An unknown symbol kills every branch.
//! machine.input("?").unwrap();
//! assert!(machine.null_state());
//! ```

pub mod builder;
pub mod core;
mod engine;
pub mod events;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{
    is_epsilon, is_null_state, State, StateId, StateTable, StepRecord, StepTrace, Target, EPSILON,
    NULL_STATE,
};
pub use events::{
    BoxError, DispatchError, EventDispatcher, HandlerResult, MachineEvent, StateEvent,
    UnknownEventError,
};
pub use machine::{Machine, MachineError};
