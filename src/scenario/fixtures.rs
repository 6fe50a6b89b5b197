// Shared scenario builders for unit tests

use super::{Coord, Movement, Scenario, Timeline, VehicleDef};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// `n` distinct points along a line; point `i` has `lat == base + i`.
pub fn line(base: f64, n: usize) -> Vec<Coord> {
    (0..n).map(|i| Coord::new(base + i as f64, -70.0)).collect()
}

pub fn vehicle(id: &str, category: &str, movement: Movement) -> Arc<VehicleDef> {
    Arc::new(VehicleDef {
        id: id.to_string(),
        category: category.to_string(),
        area: "Vitacura".to_string(),
        speed_kmh: serde_json::Number::from(40),
        movement,
        labels: HashMap::new(),
    })
}

/// 800ms ticks; spawn=40, intercept=90, capture=130, reset=240.
pub fn timeline() -> Timeline {
    Timeline {
        spawn: 40,
        intercept_start: 90,
        capture: 130,
        reset: 240,
    }
}

pub const HOLD: Coord = Coord::new(-33.39, -70.59);
pub const BLOCK: Coord = Coord::new(-33.40, -70.60);

/// One vehicle of each movement mode:
/// - `base`: fixed at `HOLD`
/// - `patrol-loop`: 7-point loop
/// - `patrol-1`: 6-point patrol, 12-point intercept, holds at `BLOCK`
/// - `suspect`: 50-point route, spawns at the schedule marker, holds at `HOLD`
pub fn scenario() -> Scenario {
    Scenario {
        tick_period: Duration::from_millis(800),
        timeline: timeline(),
        vehicles: vec![
            vehicle("base", "base", Movement::Fixed { hold: HOLD }),
            vehicle("patrol-loop", "patrol", Movement::Loop { route: line(0.0, 7) }),
            vehicle(
                "patrol-1",
                "patrol",
                Movement::PatrolIntercept {
                    patrol: line(100.0, 6),
                    intercept: line(200.0, 12),
                    hold: BLOCK,
                },
            ),
            vehicle(
                "suspect",
                "suspect",
                Movement::SpawnRoute {
                    spawn_tick: 40,
                    route: line(300.0, 50),
                    hold: HOLD,
                },
            ),
        ],
    }
}
