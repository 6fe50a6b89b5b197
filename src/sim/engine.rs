use crate::scenario::{self, Scenario, ScenarioError};
use crate::sim::driver::{self, DriverHandle};
use crate::sim::world::{StepOutcome, World};
use crate::sim::WorldSnapshot;
use crate::subscription::{ChannelSink, SubscriberId, SubscriberRegistry};
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Simulation engine: sole writer of the world, source of snapshots.
///
/// A tick (advance, build, publish, broadcast) runs entirely under the world
/// lock, so ticks never overlap and broadcasts leave in tick order. Pollers
/// read the last published snapshot and never touch the world itself.
pub struct SimulationEngine {
    scenario: Arc<Scenario>,

    world: Mutex<World>,

    /// Last snapshot built from a settled world
    latest: RwLock<Arc<WorldSnapshot>>,

    registry: SubscriberRegistry,

    /// True while a periodic driver owns the clock
    pub(crate) running: AtomicBool,
}

impl SimulationEngine {
    /// Build an engine at tick 0.
    ///
    /// Runs the load-time checks again, so a scenario assembled in code fails
    /// here with a configuration fault rather than inside a tick.
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario::check(&scenario)?;
        let scenario = Arc::new(scenario);
        let world = World::new(Arc::clone(&scenario));
        let latest = Arc::new(world.snapshot());

        Ok(Self {
            scenario,
            world: Mutex::new(world),
            latest: RwLock::new(latest),
            registry: SubscriberRegistry::new(),
            running: AtomicBool::new(false),
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Run one tick.
    ///
    /// Returns the broadcast snapshot, or `None` when this step hit the reset
    /// marker (nothing is broadcast on a reset; pollers see the fresh tick-0
    /// world).
    pub fn step(&self) -> Option<Arc<WorldSnapshot>> {
        let mut world = self.world.lock().unwrap_or_else(|e| e.into_inner());

        match world.step() {
            StepOutcome::Reset { .. } => {
                self.publish(Arc::new(world.snapshot()));
                None
            }
            StepOutcome::Advanced(tick) => {
                let snapshot = Arc::new(world.snapshot());
                self.publish(Arc::clone(&snapshot));
                self.registry.broadcast(&snapshot);

                debug!(tick, visible = snapshot.vehicles.len(), "Tick complete");
                Some(snapshot)
            }
        }
    }

    /// Most recently published snapshot
    pub fn current_snapshot(&self) -> Arc<WorldSnapshot> {
        let latest = self.latest.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&latest)
    }

    pub fn current_tick(&self) -> u64 {
        self.current_snapshot().tick
    }

    /// Completed epochs since the engine was created
    pub fn epoch(&self) -> u64 {
        self.world.lock().unwrap_or_else(|e| e.into_inner()).epoch()
    }

    /// Register a channel-backed subscriber that receives every snapshot
    /// from the next tick onward.
    pub fn subscribe(&self, buffer: usize) -> (SubscriberId, mpsc::Receiver<Arc<WorldSnapshot>>) {
        let id = Uuid::new_v4();
        let (sink, rx) = ChannelSink::channel(buffer);
        self.registry.register(id, Arc::new(sink));
        (id, rx)
    }

    pub fn unsubscribe(&self, id: &SubscriberId) -> bool {
        self.registry.unregister(id)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the periodic clock on the current tokio runtime.
    ///
    /// Fails if a driver is already running for this engine.
    pub fn start(self: &Arc<Self>) -> Result<DriverHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            bail!("simulation driver already running");
        }

        info!(
            tick_ms = self.scenario.tick_period.as_millis() as u64,
            vehicles = self.scenario.vehicles.len(),
            reset_tick = self.scenario.timeline.reset,
            "Simulation engine started"
        );

        Ok(driver::spawn(Arc::clone(self)))
    }

    fn publish(&self, snapshot: Arc<WorldSnapshot>) {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *latest = snapshot;
    }
}
