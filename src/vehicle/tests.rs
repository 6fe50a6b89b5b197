use super::*;
use crate::scenario::fixtures::{line, timeline, vehicle, BLOCK, HOLD};

fn new_state(def: Arc<VehicleDef>) -> VehicleState {
    VehicleState::new(def, &timeline())
}

fn run_to(state: &mut VehicleState, last_tick: u64) {
    let tl = timeline();
    for t in 1..=last_tick {
        state.advance(t, &tl);
    }
}

#[test]
fn test_fixed_vehicle_never_moves() {
    let mut state = new_state(vehicle("base", "base", Movement::Fixed { hold: HOLD }));
    assert_eq!(state.phase(), Phase::Hold);
    assert_eq!(state.position(), HOLD);

    let tl = timeline();
    for t in 1..240 {
        state.advance(t, &tl);
        assert_eq!(state.phase(), Phase::Hold);
        assert_eq!(state.position(), HOLD);
        assert!(state.is_visible());
    }
}

#[test]
fn test_loop_position_is_route_at_tick_mod_len() {
    let route = line(0.0, 7);
    let mut state = new_state(vehicle(
        "loop",
        "patrol",
        Movement::Loop {
            route: route.clone(),
        },
    ));
    assert_eq!(state.position(), route[0]);

    // Loop vehicles ignore the timeline markers entirely.
    let tl = timeline();
    for t in 1..1000u64 {
        state.advance(t, &tl);
        let expected = (t % 7) as usize;
        assert_eq!(state.cursor(), expected, "tick {}", t);
        assert_eq!(state.position(), route[expected], "tick {}", t);
        assert_eq!(state.phase(), Phase::Patrol);
    }
}

#[test]
fn test_single_point_loop_stays_put() {
    let route = line(5.0, 1);
    let mut state = new_state(vehicle("loop", "patrol", Movement::Loop { route: route.clone() }));
    run_to(&mut state, 10);
    assert_eq!(state.cursor(), 0);
    assert_eq!(state.position(), route[0]);
}

fn interceptor() -> (VehicleState, Vec<Coord>, Vec<Coord>) {
    let patrol = line(100.0, 6);
    let intercept = line(200.0, 12);
    let state = new_state(vehicle(
        "patrol-1",
        "patrol",
        Movement::PatrolIntercept {
            patrol: patrol.clone(),
            intercept: intercept.clone(),
            hold: BLOCK,
        },
    ));
    (state, patrol, intercept)
}

#[test]
fn test_interceptor_patrols_before_intercept_start() {
    let (mut state, patrol, _) = interceptor();
    let tl = timeline();
    for t in 1..tl.intercept_start {
        state.advance(t, &tl);
        assert_eq!(state.phase(), Phase::Patrol);
        assert_eq!(state.position(), patrol[(t % 6) as usize]);
    }
}

#[test]
fn test_interceptor_enters_intercept_at_cursor_zero() {
    let (mut state, _, intercept) = interceptor();
    run_to(&mut state, 90);
    assert_eq!(state.phase(), Phase::Intercept);
    assert_eq!(state.cursor(), 0);
    assert_eq!(state.position(), intercept[0]);
}

#[test]
fn test_interceptor_clamps_at_end_of_intercept_route() {
    let (mut state, _, intercept) = interceptor();
    let tl = timeline();
    run_to(&mut state, tl.intercept_start - 1);

    for t in tl.intercept_start..tl.capture {
        state.advance(t, &tl);
        let expected = ((t - tl.intercept_start) as usize).min(intercept.len() - 1);
        assert_eq!(state.phase(), Phase::Intercept);
        assert_eq!(state.cursor(), expected, "tick {}", t);
        assert_eq!(state.position(), intercept[expected]);
    }
    // Parked, not wrapped
    assert_eq!(state.position(), *intercept.last().unwrap());
}

#[test]
fn test_interceptor_holds_from_capture_until_reset() {
    let (mut state, _, _) = interceptor();
    let tl = timeline();
    run_to(&mut state, tl.capture - 1);

    for t in tl.capture..tl.reset {
        state.advance(t, &tl);
        assert_eq!(state.phase(), Phase::Hold);
        assert_eq!(state.position(), BLOCK);
    }
}

fn suspect(spawn_tick: u64) -> (VehicleState, Vec<Coord>) {
    let route = line(300.0, 50);
    let state = new_state(vehicle(
        "suspect",
        "suspect",
        Movement::SpawnRoute {
            spawn_tick,
            route: route.clone(),
            hold: HOLD,
        },
    ));
    (state, route)
}

#[test]
fn test_suspect_hidden_before_spawn() {
    let (mut state, route) = suspect(40);
    assert!(!state.is_visible());
    assert_eq!(state.phase(), Phase::Hidden);

    let tl = timeline();
    for t in 1..40 {
        state.advance(t, &tl);
        assert!(!state.is_visible());
        assert_eq!(state.phase(), Phase::Hidden);
        assert_eq!(state.position(), route[0]);
    }
}

#[test]
fn test_suspect_spawns_moving_at_cursor_zero() {
    let (mut state, route) = suspect(40);
    run_to(&mut state, 40);
    assert!(state.is_visible());
    assert_eq!(state.phase(), Phase::Moving);
    assert_eq!(state.cursor(), 0);
    assert_eq!(state.position(), route[0]);
}

#[test]
fn test_suspect_parks_on_last_point_then_holds() {
    let (mut state, route) = suspect(40);
    let tl = timeline();
    run_to(&mut state, 39);

    for t in 40..tl.capture {
        state.advance(t, &tl);
        let expected = ((t - 40) as usize).min(49);
        assert_eq!(state.cursor(), expected, "tick {}", t);
        assert_eq!(state.position(), route[expected]);
        if t >= 89 {
            assert_eq!(state.position(), route[49]);
        }
    }

    for t in tl.capture..tl.reset {
        state.advance(t, &tl);
        assert!(state.is_visible());
        assert_eq!(state.phase(), Phase::Hold);
        assert_eq!(state.position(), HOLD);
    }
}

#[test]
fn test_suspect_uses_its_own_spawn_tick() {
    let (mut state, _) = suspect(60);
    run_to(&mut state, 59);
    assert!(!state.is_visible());

    state.advance(60, &timeline());
    assert!(state.is_visible());
    assert_eq!(state.phase(), Phase::Moving);
}

#[test]
fn test_spawn_at_tick_zero_is_visible_from_the_start() {
    let route = line(300.0, 5);
    let mut state = new_state(vehicle(
        "suspect",
        "suspect",
        Movement::SpawnRoute {
            spawn_tick: 0,
            route: route.clone(),
            hold: HOLD,
        },
    ));
    assert!(state.is_visible());
    assert_eq!(state.phase(), Phase::Moving);
    assert_eq!(state.position(), route[0]);

    let tl = timeline();
    for t in 1..10u64 {
        state.advance(t, &tl);
        let expected = (t as usize).min(4);
        assert_eq!(state.cursor(), expected, "tick {}", t);
        assert_eq!(state.position(), route[expected], "tick {}", t);
    }
}

#[test]
fn test_intercept_start_at_tick_zero_skips_patrol() {
    let intercept = line(200.0, 4);
    let tl = Timeline {
        spawn: 0,
        intercept_start: 0,
        capture: 10,
        reset: 20,
    };
    let mut state = VehicleState::new(
        vehicle(
            "patrol-1",
            "patrol",
            Movement::PatrolIntercept {
                patrol: line(100.0, 3),
                intercept: intercept.clone(),
                hold: BLOCK,
            },
        ),
        &tl,
    );
    assert_eq!(state.phase(), Phase::Intercept);
    assert_eq!(state.position(), intercept[0]);

    state.advance(1, &tl);
    assert_eq!(state.phase(), Phase::Intercept);
    assert_eq!(state.position(), intercept[1]);
}

#[test]
fn test_capture_at_tick_zero_holds_immediately() {
    let tl = Timeline {
        spawn: 0,
        intercept_start: 0,
        capture: 0,
        reset: 5,
    };
    let state = VehicleState::new(
        vehicle(
            "suspect",
            "suspect",
            Movement::SpawnRoute {
                spawn_tick: 0,
                route: line(300.0, 3),
                hold: HOLD,
            },
        ),
        &tl,
    );
    assert!(state.is_visible());
    assert_eq!(state.phase(), Phase::Hold);
    assert_eq!(state.position(), HOLD);
}

#[test]
fn test_new_state_equals_reset_state() {
    let (mut state, _) = suspect(40);
    let fresh = state.clone();
    run_to(&mut state, 150);
    assert_ne!(state, fresh);

    let reset = new_state(Arc::new(state.def().clone()));
    assert_eq!(reset, fresh);
}

#[test]
fn test_phase_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Phase::Intercept).unwrap(), "\"intercept\"");
    assert_eq!(Phase::Hidden.to_string(), "hidden");
}
