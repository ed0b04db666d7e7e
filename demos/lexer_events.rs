//! Drive a small automaton and watch its lifecycle events.
//!
//! Run with: `cargo run --example lexer_events`

use superpose::{transitions, Machine, MachineEvent, StateEvent};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut machine = Machine::builder()
        .state_with("A", false, transitions! { "" => "E" })
        .state_with("E", false, transitions! { "d" => "D" })
        .state_with("D", true, transitions! { "c" => ["B", "D"] })
        .state_with("B", false, transitions! { "d" => "E" })
        .build()?;

    for id in ["B", "D", "E"] {
        machine.bind_state_event(id, StateEvent::Arrive, move || {
            println!("  -> arrived at {id}");
            Ok(())
        })?;
        machine.bind_state_event(id, StateEvent::Leave, move || {
            println!("  <- left {id}");
            Ok(())
        })?;
    }
    machine.bind_machine_event(MachineEvent::Change, || {
        println!("  == pass finished");
        Ok(())
    });

    machine.reset()?;
    println!("start: {:?}", machine.state());

    for symbol in ["d", "c", "d"] {
        println!("input {symbol:?}:");
        let active = machine.input(symbol)?;
        println!("active: {active:?}, accepted: {}", machine.accepted());
    }

    println!("input \"?\":");
    machine.input("?")?;
    println!("rejected: {}", machine.null_state());

    Ok(())
}
