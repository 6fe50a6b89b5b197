use crate::scenario::{Coord, Movement, Timeline, VehicleDef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Behavioral stage of a vehicle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Patrol,
    Intercept,
    Hold,
    Hidden,
    Moving,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Patrol => "patrol",
            Phase::Intercept => "intercept",
            Phase::Hold => "hold",
            Phase::Hidden => "hidden",
            Phase::Moving => "moving",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-vehicle simulation state.
///
/// `cursor` is always the index of the route point currently occupied, in
/// whichever route the current phase walks. It is meaningless in `hold`.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    def: Arc<VehicleDef>,
    position: Coord,
    phase: Phase,
    cursor: usize,
    visible: bool,
}

impl VehicleState {
    /// State at tick 0 of an epoch, also used for every epoch reset.
    ///
    /// A marker or spawn tick of 0 already applies here, so the walk starts
    /// at index 0 on tick 0 and reaches index `t` on tick `t`. Routes must be
    /// non-empty (see `scenario::check`).
    pub(crate) fn new(def: Arc<VehicleDef>, timeline: &Timeline) -> Self {
        let (position, phase, visible) = match &def.movement {
            Movement::Fixed { hold } => (*hold, Phase::Hold, true),
            Movement::Loop { route } => (route[0], Phase::Patrol, true),
            Movement::PatrolIntercept {
                patrol,
                intercept,
                hold,
            } => {
                if timeline.capture == 0 {
                    (*hold, Phase::Hold, true)
                } else if timeline.intercept_start == 0 {
                    (intercept[0], Phase::Intercept, true)
                } else {
                    (patrol[0], Phase::Patrol, true)
                }
            }
            Movement::SpawnRoute {
                spawn_tick,
                route,
                hold,
            } => {
                if *spawn_tick > 0 {
                    (route[0], Phase::Hidden, false)
                } else if timeline.capture == 0 {
                    (*hold, Phase::Hold, true)
                } else {
                    (route[0], Phase::Moving, true)
                }
            }
        };

        Self {
            def,
            position,
            phase,
            cursor: 0,
            visible,
        }
    }

    pub fn def(&self) -> &VehicleDef {
        &self.def
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Advance this vehicle to global tick `tick`.
    ///
    /// Called exactly once per tick, in increasing tick order within an
    /// epoch. Reads only this vehicle's state and the shared timeline.
    pub fn advance(&mut self, tick: u64, timeline: &Timeline) {
        // Clone the Arc so the match can borrow geometry while mutating self.
        let def = Arc::clone(&self.def);

        match &def.movement {
            Movement::Fixed { hold } => {
                self.position = *hold;
                self.phase = Phase::Hold;
            }

            Movement::Loop { route } => self.step_loop(route),

            Movement::PatrolIntercept {
                patrol,
                intercept,
                hold,
            } => {
                if tick < timeline.intercept_start {
                    self.step_loop(patrol);
                } else if tick < timeline.capture {
                    self.step_once(intercept, Phase::Intercept);
                } else {
                    self.hold_at(*hold);
                }
            }

            Movement::SpawnRoute {
                spawn_tick,
                route,
                hold,
            } => {
                if tick < *spawn_tick {
                    self.visible = false;
                    self.phase = Phase::Hidden;
                } else if tick < timeline.capture {
                    self.visible = true;
                    self.step_once(route, Phase::Moving);
                } else {
                    self.visible = true;
                    self.hold_at(*hold);
                }
            }
        }
    }

    /// Next point of a cyclic route.
    fn step_loop(&mut self, route: &[Coord]) {
        self.phase = Phase::Patrol;
        self.cursor = (self.cursor + 1) % route.len();
        self.position = route[self.cursor];
    }

    /// Walk a route once, parking on its last point.
    /// Entering `phase` restarts the walk at index 0.
    fn step_once(&mut self, route: &[Coord], phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.cursor = 0;
        } else if self.cursor + 1 < route.len() {
            self.cursor += 1;
        }
        self.position = route[self.cursor];
    }

    fn hold_at(&mut self, hold: Coord) {
        self.phase = Phase::Hold;
        self.position = hold;
    }
}
