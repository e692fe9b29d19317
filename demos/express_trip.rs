//! Express Trip
//!
//! This example rides an express car from deep underground to the edge
//! of the stratosphere and back.
//!
//! Key concepts:
//! - Express profiles skip every other floor
//! - Requests for unreachable floors snap to the nearest reachable one
//! - Environment readings follow the car
//! - Pressure alarm and its warning light
//!
//! Run with: cargo run --example express_trip

use liftsim::environment::format_pressure;
use liftsim::{
    format_floor, Elevator, ElevatorConfig, ElevatorEvent, SpeedProfile,
};
use std::time::Duration;

fn report(elevator: &Elevator) {
    let env = elevator.environment();
    print!(
        "  {:>7}  {:>10}",
        format_floor(elevator.current_floor()),
        format_pressure(env.pressure_pa)
    );
    if let Some(layer) = env.geology {
        print!("  {} {}", layer.icon(), layer.name());
    }
    if let Some(reading) = env.atmosphere {
        print!(
            "  {} {} ({:.1} °C)",
            reading.layer.icon(),
            reading.layer.name(),
            reading.temperature_c
        );
    }
    println!();
}

fn main() {
    println!("=== Express Trip ===\n");

    let config = ElevatorConfig {
        initial_floor: -40,
        speed_profile: SpeedProfile::Custom(40.0),
        ..ElevatorConfig::default()
    };
    let mut elevator = Elevator::new(config).unwrap();
    elevator.set_floor_range(-100, 20_000).unwrap();

    println!("Starting point:");
    report(&elevator);

    println!("\nGoing up to F1000 (not reachable in steps of two):");
    elevator.request_go_to(1_000).unwrap();
    elevator.run_until_idle(Duration::from_secs(600));
    report(&elevator);

    println!("\nOn to F19000:");
    elevator.request_go_to(19_000).unwrap();
    elevator.run_until_idle(Duration::from_secs(600));
    report(&elevator);

    elevator.acknowledge_alarms().unwrap();

    println!("\nBack down to B7:");
    elevator.request_go_to(-7).unwrap();
    elevator.run_until_idle(Duration::from_secs(600));
    report(&elevator);

    println!("\nNotable events:");
    for record in elevator.drain_events() {
        match record.event {
            ElevatorEvent::SnappedToNearest { requested, landed } => println!(
                "  {}  asked for {}, stopped at {}",
                record.at,
                format_floor(requested),
                format_floor(landed)
            ),
            ElevatorEvent::AlarmRaised { kind, reading } => {
                println!("  {}  {kind} alarm raised ({reading:.1})", record.at)
            }
            ElevatorEvent::AlarmCleared { kind } => {
                println!("  {}  {kind} alarm cleared", record.at)
            }
            ElevatorEvent::Arrived { floor } => {
                println!("  {}  arrived at {}", record.at, format_floor(floor))
            }
            _ => {}
        }
    }

    println!("\n=== Example Complete ===");
}
