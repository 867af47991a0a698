/// Writes the bundled demonstration forest to data/. This is artifact
/// generation, not training: the splits are fixed elevation bands with
/// hydrology and hillshade refinements, chosen so that every cover class is
/// reachable and the three trees disagree enough to exercise the vote.
///
/// Regenerate after a schema change with:
///   cargo run -p modelgen

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cover_core::forest::{ForestModel, Tree, TreeNode};
use cover_core::measurements::CartographicMeasurements;
use cover_core::predictor::CoverPredictor;
use cover_core::schema::{col, FEATURE_COUNT, SCHEMA_VERSION};

#[derive(Parser, Debug)]
#[command(name = "modelgen", about = "Write the bundled demonstration forest artifact")]
struct Args {
    /// Output artifact path.
    #[arg(short, long, default_value = "data/forest_cover_model.json")]
    output: PathBuf,
}

fn split(feature: usize, threshold: f32, left: usize, right: usize) -> TreeNode {
    TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    }
}

fn leaf(class: u8) -> TreeNode {
    TreeNode::Leaf { class }
}

/// Elevation bands follow the study area's ecology: cottonwood/willow and
/// ponderosa at the bottom (split on distance to water), aspen and
/// douglas-fir mid-slope, lodgepole then spruce/fir above, krummholz at
/// the treeline.
fn demo_forest() -> ForestModel {
    let tree_1 = Tree {
        nodes: vec![
            split(col::ELEVATION, 2400.0, 1, 2),
            split(col::HORIZ_HYDROLOGY, 150.0, 3, 4),
            split(col::ELEVATION, 3000.0, 5, 6),
            leaf(4),
            leaf(3),
            split(col::ELEVATION, 2700.0, 7, 8),
            split(col::ELEVATION, 3350.0, 9, 10),
            split(col::HILLSHADE_NOON, 180.0, 11, 12),
            leaf(2),
            leaf(1),
            leaf(7),
            leaf(6),
            leaf(5),
        ],
    };

    // Shifted band edges, and the mid band keys on the Cache la Poudre
    // indicator instead of noon hillshade.
    let tree_2 = Tree {
        nodes: vec![
            split(col::ELEVATION, 2450.0, 1, 2),
            split(col::HORIZ_HYDROLOGY, 200.0, 3, 4),
            split(col::ELEVATION, 3050.0, 5, 6),
            leaf(4),
            leaf(3),
            split(col::ELEVATION, 2650.0, 7, 8),
            split(col::ELEVATION, 3400.0, 9, 10),
            split(col::WILDERNESS_START + 3, 0.5, 11, 12),
            leaf(2),
            leaf(1),
            leaf(7),
            leaf(5),
            leaf(6),
        ],
    };

    // Top-down banding with a morning-shade split for the mid band.
    let tree_3 = Tree {
        nodes: vec![
            split(col::ELEVATION, 3300.0, 1, 2),
            split(col::ELEVATION, 2950.0, 3, 4),
            leaf(7),
            split(col::ELEVATION, 2350.0, 5, 6),
            leaf(1),
            split(col::HORIZ_HYDROLOGY, 100.0, 7, 8),
            split(col::HILLSHADE_9AM, 160.0, 9, 10),
            leaf(4),
            leaf(3),
            leaf(6),
            leaf(5),
        ],
    };

    ForestModel {
        schema_version: SCHEMA_VERSION,
        n_features: FEATURE_COUNT,
        classes: vec![1, 2, 3, 4, 5, 6, 7],
        trees: vec![tree_1, tree_2, tree_3],
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let model = demo_forest();
    let json = serde_json::to_string_pretty(&model)?;

    // Round-trip through the loading path so a structural mistake here
    // fails now rather than at the next startup.
    let reloaded = ForestModel::from_json(&json)?;
    let predictor = CoverPredictor::new(reloaded);
    let line = predictor.predict_cover(
        &CartographicMeasurements::default(),
        Some("Wilderness Area 1"),
        Some("Soil Type 1"),
    )?;

    if let Some(dir) = args.output.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&args.output, json)
        .with_context(|| format!("Write failed: {}", args.output.display()))?;

    eprintln!(
        "[modelgen] wrote {} ({} trees, {} classes)",
        args.output.display(),
        model.trees.len(),
        model.classes.len()
    );
    eprintln!("[modelgen] form-default check: {line}");
    Ok(())
}
