use crate::scenario::Scenario;
use crate::sim::WorldSnapshot;
use crate::vehicle::VehicleState;
use std::sync::Arc;
use tracing::info;

/// Result of one clock step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every vehicle advanced to this tick.
    Advanced(u64),
    /// The reset marker was reached; the world is back at tick 0.
    Reset { epoch: u64 },
}

/// Tick counter plus every vehicle's state. Owned by the engine.
pub struct World {
    scenario: Arc<Scenario>,
    tick: u64,
    epoch: u64,
    vehicles: Vec<VehicleState>,
}

impl World {
    /// Expects a scenario that has passed `scenario::check`.
    pub(crate) fn new(scenario: Arc<Scenario>) -> Self {
        let vehicles = initial_vehicles(&scenario);
        Self {
            scenario,
            tick: 0,
            epoch: 0,
            vehicles,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of completed epochs
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::build(self.tick, &self.vehicles)
    }

    /// Advance the world by one tick, or reset it at the reset marker.
    pub fn step(&mut self) -> StepOutcome {
        self.tick += 1;

        if self.tick >= self.scenario.timeline.reset {
            self.reset();
            return StepOutcome::Reset { epoch: self.epoch };
        }

        let timeline = self.scenario.timeline;
        for vehicle in &mut self.vehicles {
            vehicle.advance(self.tick, &timeline);
        }

        StepOutcome::Advanced(self.tick)
    }

    /// Rebuild every vehicle from its definition and rewind to tick 0
    pub fn reset(&mut self) {
        self.vehicles = initial_vehicles(&self.scenario);
        self.tick = 0;
        self.epoch += 1;

        info!(epoch = self.epoch, "Simulation epoch reset");
    }
}

fn initial_vehicles(scenario: &Scenario) -> Vec<VehicleState> {
    scenario
        .vehicles
        .iter()
        .map(|def| VehicleState::new(Arc::clone(def), &scenario.timeline))
        .collect()
}
