//! Request pipeline: typed prediction plus the form-facing string boundary.

use crate::categorical::{SoilType, WildernessArea};
use crate::cover_type::CoverType;
use crate::error::CoverError;
use crate::forest::ForestModel;
use crate::measurements::CartographicMeasurements;
use crate::schema;

/// Format the line shown in the form's result box.
pub fn prediction_line(cover: CoverType) -> String {
    format!("Predicted Cover Type: {}", cover.label())
}

/// Owns the loaded model and runs the per-request pipeline:
/// encode → assemble → predict → map. Holds no other state, so identical
/// inputs always produce identical outputs.
pub struct CoverPredictor {
    model: ForestModel,
}

impl CoverPredictor {
    /// The model is injected explicitly — loaded once at startup by the
    /// host, never reloaded.
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }

    /// Read-only view of the loaded artifact.
    pub fn model(&self) -> &ForestModel {
        &self.model
    }

    /// Typed prediction for one patch.
    pub fn predict(
        &self,
        m: &CartographicMeasurements,
        wilderness: Option<WildernessArea>,
        soil: Option<SoilType>,
    ) -> Result<CoverType, CoverError> {
        let features = schema::assemble(m, wilderness, soil);
        let code = self.model.predict(&features)?;
        CoverType::from_code(code)
    }

    /// The form-facing operation: parse the optional display labels, run
    /// the pipeline, format the result line. An absent label means "no
    /// selection yet" and leaves its indicator group all zero; a label
    /// that is present but malformed is an error the form shows in place
    /// of the prediction.
    pub fn predict_cover(
        &self,
        m: &CartographicMeasurements,
        wilderness_choice: Option<&str>,
        soil_choice: Option<&str>,
    ) -> Result<String, CoverError> {
        let wilderness = wilderness_choice
            .map(WildernessArea::from_label)
            .transpose()?;
        let soil = soil_choice.map(SoilType::from_label).transpose()?;
        let cover = self.predict(m, wilderness, soil)?;
        Ok(prediction_line(cover))
    }
}
