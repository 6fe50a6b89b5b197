use crate::vehicle::{Phase, VehicleState};
use serde::{Deserialize, Serialize};

/// World view pushed to subscribers and served to pollers.
///
/// Built fresh every tick and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub vehicles: Vec<VehicleView>,
}

/// Observable fields of one visible vehicle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: String,
    #[serde(rename = "type")]
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    pub status: String,
    pub speed_kmh: serde_json::Number,
    pub area: String,
    pub phase: Phase,
}

impl WorldSnapshot {
    /// Project vehicle states into a snapshot, skipping hidden vehicles
    pub fn build(tick: u64, vehicles: &[VehicleState]) -> Self {
        let vehicles = vehicles
            .iter()
            .filter(|v| v.is_visible())
            .map(|v| {
                let def = v.def();
                let position = v.position();
                VehicleView {
                    id: def.id.clone(),
                    category: def.category.clone(),
                    lat: position.lat,
                    lng: position.lng,
                    status: status_label(v),
                    speed_kmh: def.speed_kmh.clone(),
                    area: def.area.clone(),
                    phase: v.phase(),
                }
            })
            .collect();

        Self { tick, vehicles }
    }

    pub fn vehicle(&self, id: &str) -> Option<&VehicleView> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// Human status for a vehicle's current phase.
///
/// Per-vehicle overrides win; otherwise `hold` reads "blocking" for patrol
/// units and "neutralized" for everything else.
pub fn status_label(state: &VehicleState) -> String {
    let def = state.def();
    let phase = state.phase();

    if let Some(label) = def.labels.get(phase.as_str()) {
        return label.clone();
    }

    let label = match phase {
        Phase::Patrol => "patrolling",
        Phase::Intercept => "responding",
        Phase::Hidden => "concealed",
        Phase::Moving => "moving",
        Phase::Hold if def.category == "patrol" => "blocking",
        Phase::Hold => "neutralized",
    };
    label.to_string()
}
