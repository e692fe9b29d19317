//! Scripted runs.
//!
//! A scenario is a configuration plus a list of commands, each issued
//! after a wait. Running it yields a report of every command outcome, the
//! full event log and the final state:
//!
//! ```json
//! {
//!   "name": "basement",
//!   "steps": [
//!     { "command": "set_floor_range", "min": -1000, "max": 2000 },
//!     { "command": "go_to", "floor": -5 },
//!     { "wait_ms": 3000, "command": "toggle_sos" }
//!   ]
//! }
//! ```

use crate::config::{ConfigError, ElevatorConfig};
use crate::elevator::{Command, Elevator, ElevatorSnapshot, EventRecord};
use crate::error::Warning;
use crate::motion::{Direction, SpeedProfile};
use crate::scheduler::SimInstant;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

fn default_settle_ms() -> u64 {
    60_000
}

/// One command, issued `wait_ms` after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(default)]
    pub wait_ms: u64,
    #[serde(flatten)]
    pub command: Command,
}

impl ScenarioStep {
    pub fn new(wait_ms: u64, command: Command) -> Self {
        Self { wait_ms, command }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: ElevatorConfig,
    pub steps: Vec<ScenarioStep>,
    /// How long to let the elevator settle after the last step
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub at: SimInstant,
    pub command: Command,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub outcomes: Vec<StepOutcome>,
    pub events: Vec<EventRecord>,
    pub final_state: ElevatorSnapshot,
    /// Whether everything came to rest within the settle time
    pub settled: bool,
}

impl ScenarioReport {
    pub fn rejected(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.accepted)
    }
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Built-in tour: a basement trip, an express climb into the
    /// pressure alarm, an emergency stop and a reset.
    pub fn demo() -> Self {
        use Command::*;
        Self {
            name: "demo".to_string(),
            config: ElevatorConfig::default(),
            steps: vec![
                ScenarioStep::new(0, SetFloorRange { min: -1000, max: 2000 }),
                ScenarioStep::new(0, GoTo { floor: -5 }),
                ScenarioStep::new(6_500, OpenDoor),
                ScenarioStep::new(1_000, CloseDoor),
                ScenarioStep::new(1_500, Move {
                    direction: Direction::Up,
                }),
                ScenarioStep::new(5_000, SetSpeedProfile {
                    profile: SpeedProfile::Custom(40.0),
                }),
                ScenarioStep::new(0, GoTo { floor: 1_200 }),
                ScenarioStep::new(20_000, AcknowledgeAlarms),
                ScenarioStep::new(0, ToggleSos),
                ScenarioStep::new(2_000, GoTo { floor: 3 }),
                ScenarioStep::new(0, ToggleSos),
                ScenarioStep::new(0, Reset),
            ],
            settle_ms: default_settle_ms(),
        }
    }

    /// Build the elevator and start stepping through the script.
    pub fn start(&self) -> Result<ScenarioRun<'_>, ConfigError> {
        Ok(ScenarioRun {
            scenario: self,
            elevator: Elevator::new(self.config.clone())?,
            next: 0,
            outcomes: Vec::with_capacity(self.steps.len()),
        })
    }

    /// Run the whole script on the simulated clock.
    pub fn run(&self) -> Result<ScenarioReport, ConfigError> {
        let mut run = self.start()?;
        while run.step() {}
        Ok(run.finish())
    }
}

/// A scenario in progress.
pub struct ScenarioRun<'a> {
    scenario: &'a Scenario,
    elevator: Elevator,
    next: usize,
    outcomes: Vec<StepOutcome>,
}

impl ScenarioRun<'_> {
    pub fn elevator(&self) -> &Elevator {
        &self.elevator
    }

    /// Wait before the next step, `None` once the script is done.
    pub fn next_wait(&self) -> Option<Duration> {
        self.scenario
            .steps
            .get(self.next)
            .map(|step| Duration::from_millis(step.wait_ms))
    }

    /// Advance through the next step's wait and issue its command.
    /// Returns false once there are no steps left.
    pub fn step(&mut self) -> bool {
        let Some(step) = self.scenario.steps.get(self.next) else {
            return false;
        };
        self.next += 1;
        self.elevator.advance(Duration::from_millis(step.wait_ms));

        let at = self.elevator.now();
        let outcome = match self.elevator.execute(step.command) {
            Ok(accepted) => {
                debug!(%at, command = ?step.command, "command accepted");
                StepOutcome {
                    at,
                    command: step.command,
                    accepted: true,
                    warnings: accepted.warnings,
                    error: None,
                }
            }
            Err(err) => {
                warn!(%at, command = ?step.command, error = %err, "command rejected");
                StepOutcome {
                    at,
                    command: step.command,
                    accepted: false,
                    warnings: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        };
        self.outcomes.push(outcome);
        true
    }

    /// Let the elevator settle and collect the report.
    pub fn finish(mut self) -> ScenarioReport {
        let settled = self
            .elevator
            .run_until_idle(Duration::from_millis(self.scenario.settle_ms));
        ScenarioReport {
            name: self.scenario.name.clone(),
            outcomes: self.outcomes,
            events: self.elevator.drain_events(),
            final_state: self.elevator.snapshot(),
            settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::DoorState;
    use crate::elevator::ElevatorEvent;

    #[test]
    fn parses_flattened_steps() {
        let scenario = Scenario::from_json_str(
            r#"{
                "name": "basement",
                "steps": [
                    { "command": "go_to", "floor": -5 },
                    { "wait_ms": 3000, "command": "move", "direction": "up" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.settle_ms, 60_000);
        assert_eq!(
            scenario.steps,
            vec![
                ScenarioStep::new(0, Command::GoTo { floor: -5 }),
                ScenarioStep::new(
                    3_000,
                    Command::Move {
                        direction: Direction::Up
                    }
                ),
            ]
        );
    }

    #[test]
    fn invalid_embedded_config_is_refused() {
        let result = Scenario::from_json_str(
            r#"{ "name": "bad", "config": { "initial_floor": 0 }, "steps": [] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn basement_trip_report() {
        let scenario = Scenario {
            name: "basement".to_string(),
            config: ElevatorConfig {
                display_jitter: false,
                ..ElevatorConfig::default()
            },
            steps: vec![
                ScenarioStep::new(0, Command::SetFloorRange { min: -1000, max: 2000 }),
                ScenarioStep::new(0, Command::GoTo { floor: -5 }),
                ScenarioStep::new(100, Command::GoTo { floor: 3 }),
            ],
            settle_ms: 60_000,
        };
        let report = scenario.run().unwrap();

        assert!(report.settled);
        assert_eq!(report.rejected().count(), 1);
        assert_eq!(report.final_state.current_floor, -5);
        assert_eq!(report.final_state.door, DoorState::Closed);
        assert!(report.events.iter().any(|record| {
            record.at == SimInstant::from_millis(1_740)
                && record.event == ElevatorEvent::Arrived { floor: -5 }
        }));
    }

    #[test]
    fn demo_runs_to_rest() {
        let report = Scenario::demo().run().unwrap();
        assert!(report.settled);
        assert_eq!(report.final_state.current_floor, 1);
        assert!(!report.final_state.sos.active);
        assert!(report
            .events
            .iter()
            .any(|record| matches!(record.event, ElevatorEvent::AlarmRaised { .. })));
    }
}
