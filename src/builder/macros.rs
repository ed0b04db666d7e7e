//! Macros for ergonomic machine construction.

/// Build a transition-map literal: `symbol => target` rows, where a target
/// is a single state id or a bracketed list of ids.
///
/// Expands to a `Vec<(String, Target)>` suitable for
/// [`MachineBuilder::state_with`](crate::builder::MachineBuilder::state_with)
/// and [`Machine::add_state`](crate::Machine::add_state).
///
/// # Example
///
/// ```
/// use superpose::{transitions, Machine};
///
/// let machine = Machine::builder()
///     .state_with("A", false, transitions! { "" => "E" })
///     .state_with("D", true, transitions! { "c" => ["B", "D"] })
///     .state("B", false)
///     .state_with("E", false, transitions! { "d" => "D" })
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.state(), ["E"]);
/// ```
#[macro_export]
macro_rules! transitions {
    (@target [ $($id:expr),+ $(,)? ]) => {
        $crate::Target::many([ $($id),+ ])
    };
    (@target $id:expr) => {
        $crate::Target::single($id)
    };
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::Target)>::new()
    };
    ( $( $symbol:expr => $target:tt ),+ $(,)? ) => {
        ::std::vec![
            $( ($symbol.to_string(), $crate::transitions!(@target $target)) ),+
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Target;

    #[test]
    fn single_targets_stay_single() {
        let map = transitions! { "b" => "B" };
        assert_eq!(map, vec![("b".to_string(), Target::single("B"))]);
    }

    #[test]
    fn bracketed_targets_become_many() {
        let map = transitions! {
            "c" => ["B", "D"],
            "" => "E",
        };
        assert_eq!(
            map,
            vec![
                ("c".to_string(), Target::many(["B", "D"])),
                ("".to_string(), Target::single("E")),
            ]
        );
    }

    #[test]
    fn empty_map_builds() {
        let map = transitions! {};
        assert!(map.is_empty());
    }
}
