/// Single-patch prediction from the command line. Flag defaults mirror
/// the demo form's slider defaults, so `predict` with no arguments scores
/// the form's initial state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cover_core::forest::ForestModel;
use cover_core::measurements::CartographicMeasurements;
use cover_core::predictor::CoverPredictor;

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Predict the forest cover type for one 30m×30m patch")]
struct Args {
    /// Model artifact path (.json or .json.gz).
    #[arg(long, default_value = "data/forest_cover_model.json")]
    model: PathBuf,

    /// Elevation (m).
    #[arg(long, default_value = "2500")]
    elevation: f32,

    /// Aspect (azimuth degrees).
    #[arg(long, default_value = "180")]
    aspect: f32,

    /// Slope (degrees).
    #[arg(long, default_value = "15")]
    slope: f32,

    /// Horizontal distance to hydrology (m).
    #[arg(long, default_value = "300")]
    hydrology: f32,

    /// Vertical distance to hydrology (m).
    #[arg(long, default_value = "50", allow_hyphen_values = true)]
    vertical_hydrology: f32,

    /// Horizontal distance to roadways (m).
    #[arg(long, default_value = "1000")]
    roadways: f32,

    /// Horizontal distance to fire points (m).
    #[arg(long, default_value = "1500")]
    fire_points: f32,

    /// Hillshade index at 9am.
    #[arg(long, default_value = "150")]
    hillshade_9am: f32,

    /// Hillshade index at noon.
    #[arg(long, default_value = "200")]
    hillshade_noon: f32,

    /// Hillshade index at 3pm.
    #[arg(long, default_value = "150")]
    hillshade_3pm: f32,

    /// Wilderness area label, e.g. "Wilderness Area 1" (omit for none).
    #[arg(long)]
    wilderness: Option<String>,

    /// Soil type label, e.g. "Soil Type 1" (omit for none).
    #[arg(long)]
    soil: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let model = ForestModel::load(&args.model)
        .with_context(|| format!("Cannot load model {}", args.model.display()))?;
    let predictor = CoverPredictor::new(model);

    let measurements = CartographicMeasurements {
        elevation: args.elevation,
        aspect: args.aspect,
        slope: args.slope,
        horizontal_distance_to_hydrology: args.hydrology,
        vertical_distance_to_hydrology: args.vertical_hydrology,
        horizontal_distance_to_roadways: args.roadways,
        horizontal_distance_to_fire_points: args.fire_points,
        hillshade_9am: args.hillshade_9am,
        hillshade_noon: args.hillshade_noon,
        hillshade_3pm: args.hillshade_3pm,
    };

    let line = predictor.predict_cover(
        &measurements,
        args.wilderness.as_deref(),
        args.soil.as_deref(),
    )?;
    println!("{line}");
    Ok(())
}
