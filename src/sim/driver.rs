use crate::sim::SimulationEngine;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Handle to a running simulation clock.
///
/// Dropping the handle signals the clock to stop, but the engine keeps
/// reporting `is_running()` until the detached task has exited. Use
/// [`DriverHandle::stop`] to restart straight away.
pub struct DriverHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop the clock and wait for the in-flight tick to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub(crate) fn spawn(engine: Arc<SimulationEngine>) -> DriverHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(run_clock(engine, shutdown_rx));
    DriverHandle { shutdown_tx, task }
}

/// Step the engine once per tick period until shut down.
///
/// The first tick fires one full period after start.
async fn run_clock(engine: Arc<SimulationEngine>, mut shutdown_rx: oneshot::Receiver<()>) {
    let period = engine.scenario().tick_period;
    let mut ticker = interval_at(Instant::now() + period, period);

    // Skip missed ticks to prevent a burst after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.step();
            }
            _ = &mut shutdown_rx => break,
        }
    }

    engine.running.store(false, Ordering::SeqCst);
    info!(tick = engine.current_tick(), "Simulation engine stopped");
}
