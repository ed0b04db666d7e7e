//! A mutual epsilon cycle: closure terminates with both states active.
//!
//! Run with: `cargo run --example epsilon_cycle`

use superpose::{transitions, Machine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = Machine::builder()
        .state_with("X", false, transitions! { "" => "Y" })
        .state_with("Y", true, transitions! { "" => "X" })
        .build()?;

    println!("closure of X: {:?}", machine.state());
    println!("accepted: {}", machine.accepted());

    // Feeding epsilon again changes nothing.
    println!("after epsilon: {:?}", machine.input("")?);
    println!("steps taken: {}", machine.trace().len());

    Ok(())
}
