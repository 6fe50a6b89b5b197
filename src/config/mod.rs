use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete fleetsim configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// HTTP/WebSocket server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Allowed CORS origin; "*" allows any
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Scenario JSON (routes, schedule, tick period)
    #[serde(default = "default_scenario_path")]
    pub scenario_path: PathBuf,
    /// Per-subscriber queue depth before ticks are skipped for it
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
    /// Start the clock when the server starts
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}

fn default_scenario_path() -> PathBuf {
    PathBuf::from("data/fleet_routes.json")
}

fn default_subscriber_buffer() -> usize {
    16
}

fn default_autostart() -> bool {
    true
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario_path: default_scenario_path(),
            subscriber_buffer: default_subscriber_buffer(),
            autostart: default_autostart(),
        }
    }
}

impl FleetConfig {
    /// Apply `FLEETSIM_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("FLEETSIM_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Ok(v) = std::env::var("FLEETSIM_CORS_ORIGIN") {
            self.server.cors_origin = v;
        }
        if let Ok(v) = std::env::var("FLEETSIM_SCENARIO_PATH") {
            self.simulation.scenario_path = PathBuf::from(v);
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<FleetConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: FleetConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Resolve configuration for the binary.
///
/// Reads the file named by `FLEETSIM_CONFIG` (default `fleetsim.toml`) if it
/// exists, falls back to defaults otherwise, then applies env overrides.
pub fn from_env() -> Result<FleetConfig> {
    let path = std::env::var("FLEETSIM_CONFIG").unwrap_or_else(|_| "fleetsim.toml".to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        FleetConfig::default()
    };
    config.apply_env_overrides();
    Ok(config)
}
