//! Property-based tests for the environment model and trip planning.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use liftsim::core::floor::nearest_floor;
use liftsim::environment::{atmospheric_layer, geological_layer, pressure, sample};
use liftsim::motion::plan_direct;
use liftsim::motion::reach::{landing_floor, ordinal};
use liftsim::{
    format_floor, DoorState, Elevator, ElevatorConfig, FloorRange, MotionPhase, SpeedProfile,
};
use proptest::prelude::*;
use std::time::Duration;

prop_compose! {
    fn nonzero_floor(limit: i64)(floor in -limit..=limit) -> i64 {
        off_zero(floor)
    }
}

prop_compose! {
    fn small_range()(min in -60i64..-1, max in 1i64..60) -> FloorRange {
        FloorRange::new(min, max).unwrap()
    }
}

fn off_zero(floor: i64) -> i64 {
    if floor == 0 { 1 } else { floor }
}

prop_compose! {
    /// A range with a start and a target floor inside it.
    fn trip()(min in -60i64..-1, max in 1i64..60)(
        current in min..=max,
        target in min..=max,
        min in Just(min),
        max in Just(max),
    ) -> (FloorRange, i64, i64) {
        (FloorRange::new(min, max).unwrap(), off_zero(current), off_zero(target))
    }
}

fn quiet(range: FloorRange, start: i64, profile: SpeedProfile) -> Elevator {
    Elevator::new(ElevatorConfig {
        initial_floor: start,
        floor_range: range,
        speed_profile: profile,
        display_jitter: false,
        ..ElevatorConfig::default()
    })
    .unwrap()
}

proptest! {
    #[test]
    fn floor_labels_carry_sign_and_magnitude(floor in any::<i64>()) {
        let label = format_floor(floor);
        if floor < 0 {
            prop_assert_eq!(label, format!("B{}", floor.unsigned_abs()));
        } else if floor > 0 {
            prop_assert_eq!(label, format!("F{floor}"));
        } else {
            prop_assert_eq!(label, "0");
        }
    }

    #[test]
    fn pressure_never_rises_with_height(a in -1.0e7f64..1.0e7, b in -1.0e7f64..1.0e7) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(pressure(low) >= pressure(high));
    }

    #[test]
    fn pressure_bottoms_out_at_vacuum(floor in 2_815.0f64..1.0e12) {
        prop_assert_eq!(pressure(floor), 0);
    }

    #[test]
    fn exactly_one_layer_off_the_ground(floor in any::<i64>()) {
        let geology = geological_layer(floor);
        let atmosphere = atmospheric_layer(floor);
        match floor {
            0 => prop_assert!(geology.is_none() && atmosphere.is_none()),
            f if f < 0 => prop_assert!(geology.is_some() && atmosphere.is_none()),
            _ => prop_assert!(geology.is_none() && atmosphere.is_some()),
        }
    }

    #[test]
    fn sample_layers_follow_the_rounded_floor(display in -500.0f64..500.0) {
        let env = sample(display);
        let floor = display.round() as i64;
        prop_assert_eq!(env.geology, geological_layer(floor));
        prop_assert_eq!(env.atmosphere, atmospheric_layer(floor));
        prop_assert_eq!(env.pressure_pa, pressure(display));
    }

    #[test]
    fn nearest_floor_is_in_range_and_never_zero(
        display in -100.0f64..100.0,
        range in small_range(),
    ) {
        let floor = nearest_floor(display, &range);
        prop_assert_ne!(floor, 0);
        prop_assert!(range.contains(floor));
    }

    #[test]
    fn express_landing_is_reachable_and_close((range, current, target) in trip()) {
        let landing = landing_floor(current, target, 2, &range);

        prop_assert!(range.contains(landing.floor));
        prop_assert_ne!(landing.floor, 0);
        let moved = (ordinal(landing.floor) - ordinal(current)).abs();
        prop_assert_eq!(moved % 2, 0);
        let off = (ordinal(landing.floor) - ordinal(target)).abs();
        prop_assert!(off <= 1);
        prop_assert_eq!(landing.exact, landing.floor == target);
    }

    #[test]
    fn direct_plans_end_on_their_destination(
        (range, current, target) in trip(),
        express in any::<bool>(),
    ) {
        let profile = if express { SpeedProfile::Custom(40.0) } else { SpeedProfile::Normal };
        if let Some(plan) = plan_direct(current, target, &profile, &range) {
            let last = *plan.ticks().end();
            prop_assert_eq!(plan.tick(last).commit, Some(plan.destination()));
            prop_assert!(plan.arrival_offset() > plan.tick_offset(last));
        }
    }

    #[test]
    fn go_to_reaches_the_target((range, current, target) in trip()) {
        let mut elevator = quiet(range, current, SpeedProfile::Fast);

        elevator.request_go_to(target).unwrap();
        prop_assert!(elevator.run_until_idle(Duration::from_secs(120)));
        prop_assert_eq!(elevator.current_floor(), target);
        prop_assert_eq!(elevator.display_floor(), target as f64);
        prop_assert_eq!(elevator.phase(), MotionPhase::Stopped);
        prop_assert_eq!(elevator.door_state(), DoorState::Closed);
    }

    #[test]
    fn sos_freezes_on_the_nearest_floor(
        target in 2i64..40,
        after_ms in 0u64..8_000,
    ) {
        let range = FloorRange::new(-50, 50).unwrap();
        let mut elevator = quiet(range, 1, SpeedProfile::Normal);
        elevator.request_go_to(target).unwrap();
        elevator.advance(Duration::from_millis(after_ms));
        let display = elevator.display_floor();

        elevator.toggle_sos().unwrap();
        prop_assert_eq!(elevator.phase(), MotionPhase::Stopped);
        prop_assert_eq!(elevator.current_floor(), nearest_floor(display, &range));
        prop_assert!(!elevator.alarm_status().pressure);
        prop_assert!(!elevator.alarm_status().temperature);
        prop_assert!(!elevator.is_moving());
    }

    #[test]
    fn committed_floor_is_never_zero(
        target in nonzero_floor(30),
        steps in proptest::collection::vec(1u64..400, 1..20),
    ) {
        let range = FloorRange::new(-30, 30).unwrap();
        let mut elevator = quiet(range, 1, SpeedProfile::Normal);
        elevator.request_go_to(target).unwrap();
        for step in steps {
            elevator.advance(Duration::from_millis(step));
            prop_assert_ne!(elevator.current_floor(), 0);
        }
    }
}
