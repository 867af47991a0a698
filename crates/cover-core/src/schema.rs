//! The 54-column feature schema shared with the training process.
//!
//! Column order is a versioned contract: the classifier was fitted against
//! exactly this layout, and beyond the column count a mismatch is
//! undetectable at runtime. The count is therefore checked both when an
//! artifact is loaded and again before every prediction.
//!
//! Layout: 10 measurements, then 4 wilderness indicators, then 40 soil
//! indicators.

use serde::{Deserialize, Serialize};

use crate::categorical::{one_hot, SoilType, WildernessArea, SOIL_TYPES, WILDERNESS_AREAS};
use crate::measurements::CartographicMeasurements;

/// Feature schema revision recorded in model artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Columns in the measurement block.
pub const MEASUREMENT_COUNT: usize = 10;

/// Total feature columns.
pub const FEATURE_COUNT: usize = MEASUREMENT_COUNT + WILDERNESS_AREAS + SOIL_TYPES;

/// Column indices, for artifact tooling that splits on named features.
pub mod col {
    pub const ELEVATION: usize = 0;
    pub const ASPECT: usize = 1;
    pub const SLOPE: usize = 2;
    pub const HORIZ_HYDROLOGY: usize = 3;
    pub const VERT_HYDROLOGY: usize = 4;
    pub const HORIZ_ROADWAYS: usize = 5;
    pub const HORIZ_FIRE_POINTS: usize = 6;
    pub const HILLSHADE_9AM: usize = 7;
    pub const HILLSHADE_NOON: usize = 8;
    pub const HILLSHADE_3PM: usize = 9;
    /// First wilderness indicator column.
    pub const WILDERNESS_START: usize = 10;
    /// First soil indicator column.
    pub const SOIL_START: usize = 14;
}

/// One assembled input row in schema column order.
/// Only `assemble` produces these with the invariants intact;
/// `from_values` exists for tooling and deliberately skips them, leaving
/// the model's shape check to reject wrong-length rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// Wrap raw values without schema checks.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Assemble one row: measurements, then wilderness indicators, then soil
/// indicators. Pure and deterministic; an absent choice leaves its group
/// all zero.
pub fn assemble(
    m: &CartographicMeasurements,
    wilderness: Option<WildernessArea>,
    soil: Option<SoilType>,
) -> FeatureVector {
    let mut values = Vec::with_capacity(FEATURE_COUNT);
    values.extend_from_slice(&[
        m.elevation,
        m.aspect,
        m.slope,
        m.horizontal_distance_to_hydrology,
        m.vertical_distance_to_hydrology,
        m.horizontal_distance_to_roadways,
        m.horizontal_distance_to_fire_points,
        m.hillshade_9am,
        m.hillshade_noon,
        m.hillshade_3pm,
    ]);
    values.extend(one_hot(wilderness.map(WildernessArea::slot), WILDERNESS_AREAS));
    values.extend(one_hot(soil.map(SoilType::slot), SOIL_TYPES));
    FeatureVector { values }
}
