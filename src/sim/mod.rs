// Simulation clock, world state and snapshots

mod driver;
mod engine;
mod snapshot;
mod world;

pub use driver::DriverHandle;
pub use engine::SimulationEngine;
pub use snapshot::{status_label, VehicleView, WorldSnapshot};
pub use world::{StepOutcome, World};
