//! State records and the symbols that move between them.
//!
//! A state is a plain data record: an id, a final flag, and a map from input
//! symbols to transition targets. Everything behavioral (event handlers, the
//! active set) lives outside the record, on the machine that owns it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of a state within one machine.
pub type StateId = String;

/// The empty symbol, reserved for epsilon moves. It is never a normal
/// alphabet symbol: feeding it advances the machine without consuming input.
pub const EPSILON: &str = "";

/// Reserved id of the null state: the "no match" destination of a dead
/// branch. It is never final and never appears in the active set, but it may
/// be named as a transition destination to kill a branch explicitly.
pub const NULL_STATE: &str = "null";

/// Whether `symbol` is the empty symbol.
pub fn is_epsilon(symbol: &str) -> bool {
    symbol.is_empty()
}

/// Whether `id` is the reserved null-state id.
pub fn is_null_state(id: &str) -> bool {
    id == NULL_STATE
}

/// Destination of a transition: one state, or an ordered list of states for
/// a non-deterministic branch on the same symbol.
///
/// The variant is fixed when the transition is added; lists are
/// de-duplicated then, preserving first occurrence order. Serialization is
/// untagged, so a target reads and writes as either a bare id or a list of
/// ids.
///
/// # Example
///
/// ```rust
/// use superpose::Target;
///
/// let one = Target::single("B");
/// let fork = Target::many(["B", "D", "B"]);
///
/// assert_eq!(one.iter().collect::<Vec<_>>(), ["B"]);
/// assert_eq!(fork.iter().collect::<Vec<_>>(), ["B", "D"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A single destination state.
    Single(StateId),
    /// An ordered, de-duplicated list of destination states.
    Many(Vec<StateId>),
}

impl Target {
    /// Create a single-destination target.
    pub fn single(id: impl Into<StateId>) -> Self {
        Target::Single(id.into())
    }

    /// Create a multi-destination target, dropping duplicate ids while
    /// preserving the order in which ids first appear.
    pub fn many<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateId>,
    {
        let mut unique: Vec<StateId> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Target::Many(unique)
    }

    /// Iterate over the destination ids in order.
    pub fn iter(&self) -> std::slice::Iter<'_, StateId> {
        match self {
            Target::Single(id) => std::slice::from_ref(id).iter(),
            Target::Many(ids) => ids.iter(),
        }
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        match self {
            Target::Single(_) => 1,
            Target::Many(ids) => ids.len(),
        }
    }

    /// Whether the target names no destination at all (an empty list).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::single(id)
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Single(id)
    }
}

impl From<Vec<&str>> for Target {
    fn from(ids: Vec<&str>) -> Self {
        Target::many(ids)
    }
}

impl From<Vec<String>> for Target {
    fn from(ids: Vec<String>) -> Self {
        Target::many(ids)
    }
}

/// One state of the automaton: id, final flag, and its transition map.
///
/// The transition map is keyed by input symbol; [`EPSILON`] keys an explicit
/// epsilon move. A state with no explicit epsilon entry implicitly "stays
/// put" on the empty symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    id: StateId,
    is_final: bool,
    transitions: IndexMap<String, Target>,
}

impl State {
    pub(crate) fn new(id: impl Into<StateId>, is_final: bool) -> Self {
        let id = id.into();
        let is_final = is_final && !is_null_state(&id);
        Self {
            id,
            is_final,
            transitions: IndexMap::new(),
        }
    }

    /// The state's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the state is final (accepting).
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub(crate) fn set_final(&mut self, is_final: bool) {
        // The null state is never final.
        self.is_final = is_final && !is_null_state(&self.id);
    }

    /// The explicit target for `symbol`, if one is defined.
    pub fn transition(&self, symbol: &str) -> Option<&Target> {
        self.transitions.get(symbol)
    }

    /// Whether the state defines any explicit transition.
    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Iterate over the explicit transitions in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.transitions.iter().map(|(s, t)| (s.as_str(), t))
    }

    pub(crate) fn insert_transition(&mut self, symbol: impl Into<String>, target: Target) {
        self.transitions.insert(symbol.into(), target);
    }

    pub(crate) fn remove_transition(&mut self, symbol: &str) -> Option<Target> {
        self.transitions.shift_remove(symbol)
    }
}
