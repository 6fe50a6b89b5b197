use super::{
    Coord, Movement, RawMode, RawScenario, RawVehicle, Scenario, Timeline, VehicleDef,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration faults detected while loading a scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    ZeroTickPeriod,
    ZeroResetTick,
    UnorderedTimeline(Timeline),
    MissingId,
    DuplicateId(String),
    MissingRoute { vehicle: String, field: &'static str },
    EmptyRoute { vehicle: String, field: &'static str },
    MissingHoldPosition(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::ZeroTickPeriod => write!(f, "meta.tick_ms must be positive"),
            ScenarioError::ZeroResetTick => write!(f, "schedule.reset_tick must be positive"),
            ScenarioError::UnorderedTimeline(t) => write!(
                f,
                "schedule markers must satisfy spawn <= intercept_start <= capture <= reset, got {} / {} / {} / {}",
                t.spawn, t.intercept_start, t.capture, t.reset
            ),
            ScenarioError::MissingId => write!(f, "vehicle id is required"),
            ScenarioError::DuplicateId(id) => write!(f, "duplicate vehicle id '{}'", id),
            ScenarioError::MissingRoute { vehicle, field } => {
                write!(f, "vehicle '{}' requires '{}'", vehicle, field)
            }
            ScenarioError::EmptyRoute { vehicle, field } => {
                write!(f, "vehicle '{}' has an empty '{}'", vehicle, field)
            }
            ScenarioError::MissingHoldPosition(id) => {
                write!(f, "vehicle '{}' requires 'hold_position'", id)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Validates a raw scenario and converts it into its typed form.
///
/// Rules:
/// - `tick_ms` and `reset_tick` must be positive
/// - Markers ordered: spawn <= intercept_start <= capture <= reset
/// - Vehicle ids non-empty and unique
/// - Every route the mode reads is present and non-empty
/// - Every mode except `loop` needs a hold position
/// - `spawn_tick` defaults to the schedule's spawn marker
pub fn validate(raw: RawScenario) -> Result<Scenario, ScenarioError> {
    let tick_period = Duration::from_millis(raw.meta.tick_ms);
    let timeline = Timeline {
        spawn: raw.schedule.suspect_spawn_tick,
        intercept_start: raw.schedule.intercept_start_tick,
        capture: raw.schedule.capture_tick,
        reset: raw.schedule.reset_tick,
    };
    check_clock(tick_period, &timeline)?;

    let vehicles = raw
        .vehicles
        .into_iter()
        .map(|v| convert_vehicle(v, &timeline).map(Arc::new))
        .collect::<Result<Vec<_>, _>>()?;
    check_vehicles(&vehicles)?;

    Ok(Scenario {
        tick_period,
        timeline,
        vehicles,
    })
}

/// Checks an already-typed scenario against the same rules as `validate`.
///
/// Scenarios assembled in code never pass through the loader; the engine
/// runs this before building a world from one.
pub fn check(scenario: &Scenario) -> Result<(), ScenarioError> {
    check_clock(scenario.tick_period, &scenario.timeline)?;
    check_vehicles(&scenario.vehicles)
}

fn check_clock(tick_period: Duration, timeline: &Timeline) -> Result<(), ScenarioError> {
    if tick_period.is_zero() {
        return Err(ScenarioError::ZeroTickPeriod);
    }
    if timeline.reset == 0 {
        return Err(ScenarioError::ZeroResetTick);
    }
    if !(timeline.spawn <= timeline.intercept_start
        && timeline.intercept_start <= timeline.capture
        && timeline.capture <= timeline.reset)
    {
        return Err(ScenarioError::UnorderedTimeline(*timeline));
    }
    Ok(())
}

fn check_vehicles(vehicles: &[Arc<VehicleDef>]) -> Result<(), ScenarioError> {
    let mut seen = HashSet::new();
    for v in vehicles {
        if v.id.is_empty() {
            return Err(ScenarioError::MissingId);
        }
        if !seen.insert(v.id.as_str()) {
            return Err(ScenarioError::DuplicateId(v.id.clone()));
        }
        check_routes(&v.id, &v.movement)?;
    }
    Ok(())
}

fn check_routes(vehicle: &str, movement: &Movement) -> Result<(), ScenarioError> {
    match movement {
        Movement::Fixed { .. } => Ok(()),
        Movement::Loop { route } => non_empty(vehicle, route, "patrol_route"),
        Movement::PatrolIntercept {
            patrol, intercept, ..
        } => {
            non_empty(vehicle, patrol, "patrol_route")?;
            non_empty(vehicle, intercept, "intercept_route")
        }
        Movement::SpawnRoute { route, .. } => non_empty(vehicle, route, "route"),
    }
}

fn non_empty(vehicle: &str, route: &[Coord], field: &'static str) -> Result<(), ScenarioError> {
    if route.is_empty() {
        return Err(ScenarioError::EmptyRoute {
            vehicle: vehicle.to_string(),
            field,
        });
    }
    Ok(())
}

fn convert_vehicle(v: RawVehicle, timeline: &Timeline) -> Result<VehicleDef, ScenarioError> {
    let movement = match v.mode {
        RawMode::Fixed => Movement::Fixed {
            hold: hold_of(&v)?,
        },
        RawMode::Loop => Movement::Loop {
            route: route_of(&v.id, v.patrol_route.clone(), "patrol_route")?,
        },
        RawMode::LoopThenInterceptThenHold => Movement::PatrolIntercept {
            patrol: route_of(&v.id, v.patrol_route.clone(), "patrol_route")?,
            intercept: route_of(&v.id, v.intercept_route.clone(), "intercept_route")?,
            hold: hold_of(&v)?,
        },
        RawMode::SpawnThenRouteThenHold => Movement::SpawnRoute {
            spawn_tick: v.spawn_tick.unwrap_or(timeline.spawn),
            route: route_of(&v.id, v.route.clone(), "route")?,
            hold: hold_of(&v)?,
        },
    };

    Ok(VehicleDef {
        id: v.id,
        category: v.category,
        area: v.area,
        speed_kmh: v.speed_kmh,
        movement,
        labels: v.state_labels,
    })
}

fn hold_of(v: &RawVehicle) -> Result<Coord, ScenarioError> {
    v.hold_position
        .ok_or_else(|| ScenarioError::MissingHoldPosition(v.id.clone()))
}

fn route_of(
    vehicle: &str,
    route: Option<Vec<Coord>>,
    field: &'static str,
) -> Result<Vec<Coord>, ScenarioError> {
    route.ok_or_else(|| ScenarioError::MissingRoute {
        vehicle: vehicle.to_string(),
        field,
    })
}
