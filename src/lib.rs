// Scenario definitions and loading
pub mod scenario;

// Per-vehicle state machine
pub mod vehicle;

// Simulation clock, world and snapshots
pub mod sim;

// Subscriber registry and snapshot fan-out
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;

// Configuration
pub mod config;
