use serde::{Deserialize, Serialize};

/// The ten continuous/ordinal inputs for one 30m×30m patch.
/// Field order matches the feature schema's measurement block.
/// Defaults mirror the demo form's slider defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartographicMeasurements {
    /// 0–4000 m, default 2500.
    pub elevation: f32,
    /// 0–360° azimuth, default 180.
    pub aspect: f32,
    /// 0–60°, default 15.
    pub slope: f32,
    /// 0–1500 m, default 300. Distance to the nearest surface water feature.
    pub horizontal_distance_to_hydrology: f32,
    /// −500–700 m, default 50. Signed vertical offset to the nearest surface water.
    pub vertical_distance_to_hydrology: f32,
    /// 0–8000 m, default 1000.
    pub horizontal_distance_to_roadways: f32,
    /// 0–8000 m, default 1500. Distance to the nearest wildfire ignition point.
    pub horizontal_distance_to_fire_points: f32,
    /// 0–255 hillshade index at 9am on the summer solstice, default 150.
    pub hillshade_9am: f32,
    /// 0–255 hillshade index at noon, default 200.
    pub hillshade_noon: f32,
    /// 0–255 hillshade index at 3pm, default 150.
    pub hillshade_3pm: f32,
}

impl Default for CartographicMeasurements {
    fn default() -> Self {
        Self {
            elevation: 2500.0,
            aspect: 180.0,
            slope: 15.0,
            horizontal_distance_to_hydrology: 300.0,
            vertical_distance_to_hydrology: 50.0,
            horizontal_distance_to_roadways: 1000.0,
            horizontal_distance_to_fire_points: 1500.0,
            hillshade_9am: 150.0,
            hillshade_noon: 200.0,
            hillshade_3pm: 150.0,
        }
    }
}
