//! Browser bindings for the forest cover demo.
//!
//! `www/index.html` owns the widgets (sliders, radio groups, submit
//! button) and calls `CoverApp::predict` with the form state as JSON; the
//! page renders either the prediction line or the error text in the
//! result box. The model artifact is fetched once and handed to the
//! `CoverApp` constructor — a failed load never produces a usable app.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use cover_core::categorical::{SoilType, WildernessArea, SOIL_TYPES};
use cover_core::forest::ForestModel;
use cover_core::measurements::CartographicMeasurements;
use cover_core::predictor::{prediction_line, CoverPredictor};

/// One form submission: the ten measurements plus the optional radio
/// selections as their display labels.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub measurements: CartographicMeasurements,
    pub wilderness_area: Option<String>,
    pub soil_type: Option<String>,
}

/// Structured reply for the result box.
#[derive(Debug, Serialize)]
pub struct PredictReply {
    pub text: String,
    pub class_code: u8,
    pub label: String,
    pub elapsed_ms: f64,
}

/// Choice labels for the page to render its radio groups from, keeping
/// the display strings single-sourced in the core crate.
#[derive(Debug, Serialize)]
struct ChoiceLabels {
    wilderness_areas: Vec<String>,
    soil_types: Vec<String>,
}

#[wasm_bindgen]
pub fn choice_labels() -> Result<JsValue, JsValue> {
    let labels = ChoiceLabels {
        wilderness_areas: WildernessArea::ALL.iter().map(|a| a.label()).collect(),
        soil_types: (1..=SOIL_TYPES)
            .filter_map(|k| SoilType::new(k).ok())
            .map(SoilType::label)
            .collect(),
    };
    serde_wasm_bindgen::to_value(&labels).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The demo application: one predictor constructed from the artifact
/// JSON at page load, then reused read-only for every submission.
#[wasm_bindgen]
pub struct CoverApp {
    predictor: CoverPredictor,
}

#[wasm_bindgen]
impl CoverApp {
    /// Construct from the model artifact JSON. Load/validation failure
    /// is surfaced here so the page can refuse to offer predictions.
    #[wasm_bindgen(constructor)]
    pub fn new(model_json: &str) -> Result<CoverApp, JsValue> {
        let model = ForestModel::from_json(model_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(CoverApp {
            predictor: CoverPredictor::new(model),
        })
    }

    /// Run one prediction from the request JSON. Per-request errors come
    /// back as JS strings for the page to show in place of the
    /// prediction line.
    pub fn predict(&self, inputs_json: &str) -> Result<JsValue, JsValue> {
        let started = js_sys::Date::now();

        let request: PredictRequest = serde_json::from_str(inputs_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid inputs: {e}")))?;

        let wilderness = request
            .wilderness_area
            .as_deref()
            .map(WildernessArea::from_label)
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let soil = request
            .soil_type
            .as_deref()
            .map(SoilType::from_label)
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let cover = self
            .predictor
            .predict(&request.measurements, wilderness, soil)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let reply = PredictReply {
            text: prediction_line(cover),
            class_code: cover.code(),
            label: cover.label().to_string(),
            elapsed_ms: js_sys::Date::now() - started,
        };
        serde_wasm_bindgen::to_value(&reply).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_json_parses_flattened_measurements() {
        let json = r#"{
            "elevation": 2500, "aspect": 180, "slope": 15,
            "horizontal_distance_to_hydrology": 300,
            "vertical_distance_to_hydrology": 50,
            "horizontal_distance_to_roadways": 1000,
            "horizontal_distance_to_fire_points": 1500,
            "hillshade_9am": 150, "hillshade_noon": 200, "hillshade_3pm": 150,
            "wilderness_area": "Wilderness Area 1",
            "soil_type": "Soil Type 1"
        }"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.measurements.elevation, 2500.0);
        assert_eq!(request.wilderness_area.as_deref(), Some("Wilderness Area 1"));
        assert_eq!(request.soil_type.as_deref(), Some("Soil Type 1"));
    }

    #[test]
    fn request_json_tolerates_absent_selections() {
        let json = r#"{
            "elevation": 2500, "aspect": 180, "slope": 15,
            "horizontal_distance_to_hydrology": 300,
            "vertical_distance_to_hydrology": 50,
            "horizontal_distance_to_roadways": 1000,
            "horizontal_distance_to_fire_points": 1500,
            "hillshade_9am": 150, "hillshade_noon": 200, "hillshade_3pm": 150
        }"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();
        assert!(request.wilderness_area.is_none());
        assert!(request.soil_type.is_none());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    const STUB_MODEL: &str = r#"{
        "schema_version": 1,
        "n_features": 54,
        "classes": [2],
        "trees": [{ "nodes": [{ "kind": "leaf", "class": 2 }] }]
    }"#;

    #[wasm_bindgen_test]
    fn app_predicts_from_request_json() {
        let app = CoverApp::new(STUB_MODEL).unwrap();
        let inputs = r#"{
            "elevation": 2500, "aspect": 180, "slope": 15,
            "horizontal_distance_to_hydrology": 300,
            "vertical_distance_to_hydrology": 50,
            "horizontal_distance_to_roadways": 1000,
            "horizontal_distance_to_fire_points": 1500,
            "hillshade_9am": 150, "hillshade_noon": 200, "hillshade_3pm": 150
        }"#;
        assert!(app.predict(inputs).is_ok());
    }

    #[wasm_bindgen_test]
    fn bad_model_json_never_constructs_an_app() {
        assert!(CoverApp::new("{}").is_err());
    }
}
