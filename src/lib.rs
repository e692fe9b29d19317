//! Liftsim: a deterministic elevator simulation core
//!
//! Liftsim simulates an elevator car travelling through a building that
//! may reach far below ground and far into the sky. The car's position
//! drives an environment model (pressure, rock strata, atmospheric layers
//! and temperature), which in turn drives pressure and temperature
//! alarms. An emergency stop overrides everything.
//!
//! The simulation runs on a virtual clock: commands change state at the
//! current simulated instant and schedule timers, and
//! [`Elevator::advance`] moves the clock forward, firing those timers in
//! order. Nothing depends on wall-clock time, so every run is
//! reproducible.
//!
//! # Core Concepts
//!
//! - **Motion**: trip plans played out as a `Stopped → Accelerating →
//!   Cruising → Decelerating → Stopped` phase sequence
//! - **Environment**: pure functions from a display position to readings
//! - **Alarms**: threshold supervision with hysteresis, suppressed by SOS
//! - **Door**: timer-driven open/hold/close cycle
//! - **Guards**: predicates gating commands on motion and emergency state
//!
//! # Example
//!
//! ```rust
//! use liftsim::{DoorState, Elevator, ElevatorConfig};
//! use std::time::Duration;
//!
//! let mut elevator = Elevator::new(ElevatorConfig::default()).unwrap();
//! elevator.set_floor_range(-1000, 2000).unwrap();
//! elevator.request_go_to(-5).unwrap();
//!
//! elevator.advance(Duration::from_millis(2_040));
//! assert_eq!(elevator.current_floor(), -5);
//! assert_eq!(elevator.door_state(), DoorState::Open);
//!
//! elevator.advance(Duration::from_millis(4_000));
//! assert_eq!(elevator.door_state(), DoorState::Closed);
//! ```

pub mod alarm;
pub mod config;
pub mod core;
pub mod door;
pub mod elevator;
pub mod environment;
pub mod error;
pub mod input;
pub mod motion;
pub mod scenario;
pub mod scheduler;
pub mod sos;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{format_floor, FloorRange, State, StateHistory, StateTransition};
pub use alarm::{AlarmKind, AlarmStatus, AlarmThresholds};
pub use config::{ConfigError, ElevatorConfig, TimingConfig};
pub use door::DoorState;
pub use elevator::{Command, Elevator, ElevatorEvent, ElevatorSnapshot, EventRecord};
pub use environment::EnvironmentSample;
pub use error::{Accepted, BusyReason, CommandResult, ElevatorError, FloorRejection, Warning};
pub use motion::{Direction, MotionPhase, SpeedProfile};
pub use scenario::{Scenario, ScenarioReport};
pub use scheduler::{Scheduler, SimInstant};
pub use sos::SosStatus;
