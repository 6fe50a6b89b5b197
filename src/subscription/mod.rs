// Subscriber registry, broadcast fan-out and WebSocket connections

pub mod manager;
pub mod registry;

pub use manager::ConnectionManager;
pub use registry::{
    BroadcastReport, ChannelSink, DeliveryError, SnapshotSink, SubscriberId, SubscriberRegistry,
};
