use crate::sim::WorldSnapshot;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opaque identity of a live subscriber
pub type SubscriberId = Uuid;

/// Why a snapshot could not be handed to a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side is gone; the subscriber is pruned.
    Closed,
    /// The subscriber is behind; this tick is skipped for it.
    Full,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Closed => write!(f, "subscriber channel closed"),
            DeliveryError::Full => write!(f, "subscriber channel full"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Destination for pushed snapshots.
///
/// `deliver` must not block: the clock calls it from inside a tick.
pub trait SnapshotSink: Send + Sync {
    fn deliver(&self, snapshot: &Arc<WorldSnapshot>) -> Result<(), DeliveryError>;
}

/// Sink backed by a bounded tokio channel, one per connection
pub struct ChannelSink {
    tx: mpsc::Sender<Arc<WorldSnapshot>>,
}

impl ChannelSink {
    /// Create a sink and the receiver its connection reads from
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Arc<WorldSnapshot>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

impl SnapshotSink for ChannelSink {
    fn deliver(&self, snapshot: &Arc<WorldSnapshot>) -> Result<(), DeliveryError> {
        self.tx.try_send(Arc::clone(snapshot)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Outcome of one broadcast pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub lagged: usize,
    pub pruned: usize,
}

/// Set of live subscribers, shared between the clock and connection handlers
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, Arc<dyn SnapshotSink>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Add a subscriber. Registering an id that is already present keeps
    /// the existing sink and returns false.
    pub fn register(&self, id: SubscriberId, sink: Arc<dyn SnapshotSink>) -> bool {
        let mut inserted = false;
        self.subscribers.entry(id).or_insert_with(|| {
            inserted = true;
            sink
        });

        if inserted {
            info!(subscriber = %id, total = self.subscribers.len(), "Subscriber registered");
        }
        inserted
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        let removed = self.subscribers.remove(id).is_some();
        if removed {
            info!(subscriber = %id, total = self.subscribers.len(), "Subscriber unregistered");
        }
        removed
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Push `snapshot` to every registered subscriber.
    ///
    /// Two passes: deliver to a copy of the current membership, then remove
    /// the subscribers whose channel was closed. Failures never escape.
    pub fn broadcast(&self, snapshot: &Arc<WorldSnapshot>) -> BroadcastReport {
        let targets: Vec<(SubscriberId, Arc<dyn SnapshotSink>)> = self
            .subscribers
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut report = BroadcastReport::default();
        let mut dead = Vec::new();

        for (id, sink) in targets {
            match sink.deliver(snapshot) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::Full) => {
                    warn!(subscriber = %id, tick = snapshot.tick, "Subscriber lagging, tick skipped");
                    report.lagged += 1;
                }
                Err(DeliveryError::Closed) => dead.push(id),
            }
        }

        for id in dead {
            if self.subscribers.remove(&id).is_some() {
                info!(subscriber = %id, "Pruned subscriber after failed delivery");
                report.pruned += 1;
            }
        }

        debug!(
            tick = snapshot.tick,
            delivered = report.delivered,
            lagged = report.lagged,
            pruned = report.pruned,
            "Broadcast complete"
        );

        report
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
