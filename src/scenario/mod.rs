use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod validation;
#[cfg(test)]
pub(crate) mod fixtures;

pub use validation::{check, validate, ScenarioError};

/// Latitude/longitude pair. Serialized as `[lat, lng]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coord {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coord> for [f64; 2] {
    fn from(c: Coord) -> Self {
        [c.lat, c.lng]
    }
}

/// The four global timeline markers of an epoch.
///
/// Invariant (checked at load): `spawn <= intercept_start <= capture <= reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeline {
    pub spawn: u64,
    pub intercept_start: u64,
    pub capture: u64,
    pub reset: u64,
}

/// Movement mode with only the geometry that mode uses.
#[derive(Clone, Debug, PartialEq)]
pub enum Movement {
    /// Parked at `hold` forever.
    Fixed { hold: Coord },
    /// Cycles through `route` without end.
    Loop { route: Vec<Coord> },
    /// Loops `patrol` until intercept start, walks `intercept` once, then holds.
    PatrolIntercept {
        patrol: Vec<Coord>,
        intercept: Vec<Coord>,
        hold: Coord,
    },
    /// Hidden until `spawn_tick`, walks `route` once, then holds.
    SpawnRoute {
        spawn_tick: u64,
        route: Vec<Coord>,
        hold: Coord,
    },
}

/// A validated vehicle definition. Immutable for the process lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleDef {
    pub id: String,
    /// Category label (`"patrol"`, `"suspect"`, ...)
    pub category: String,
    pub area: String,
    /// Passed through as loaded, so integer speeds stay integers on the wire
    pub speed_kmh: serde_json::Number,
    pub movement: Movement,
    /// Optional phase name -> display label overrides
    pub labels: HashMap<String, String>,
}

/// A validated scenario: tick period, timeline and vehicle definitions.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub tick_period: Duration,
    pub timeline: Timeline,
    pub vehicles: Vec<Arc<VehicleDef>>,
}

impl Scenario {
    /// Parse and validate a scenario from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawScenario =
            serde_json::from_str(json).context("Failed to parse scenario JSON")?;
        Ok(validate(raw)?)
    }

    /// Load a scenario file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid scenario file {}", path.display()))
    }
}

// ── On-disk format ──────────────────────────────────────────────────────────

/// Scenario file as written on disk, before validation.
#[derive(Clone, Debug, Deserialize)]
pub struct RawScenario {
    pub meta: RawMeta,
    pub schedule: RawSchedule,
    #[serde(default)]
    pub vehicles: Vec<RawVehicle>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawMeta {
    pub tick_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawSchedule {
    pub suspect_spawn_tick: u64,
    pub intercept_start_tick: u64,
    pub capture_tick: u64,
    pub reset_tick: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawMode {
    #[default]
    Fixed,
    Loop,
    LoopThenInterceptThenHold,
    SpawnThenRouteThenHold,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawVehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub mode: RawMode,
    #[serde(default)]
    pub area: String,
    #[serde(default = "default_speed")]
    pub speed_kmh: serde_json::Number,
    pub hold_position: Option<Coord>,
    pub patrol_route: Option<Vec<Coord>>,
    pub intercept_route: Option<Vec<Coord>>,
    pub route: Option<Vec<Coord>>,
    pub spawn_tick: Option<u64>,
    #[serde(default)]
    pub state_labels: HashMap<String, String>,
}

fn default_speed() -> serde_json::Number {
    serde_json::Number::from(0)
}
