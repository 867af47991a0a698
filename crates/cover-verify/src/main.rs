//! Offline acceptance battery for a model artifact: runs the pipeline's
//! golden scenarios against the given model and reports per-check
//! pass/fail. Exits nonzero if any check fails, so it can gate releases
//! of a re-exported artifact.

use anyhow::{bail, Result};
use clap::Parser;

use cover_core::categorical::{one_hot, SoilType, WildernessArea, SOIL_TYPES, WILDERNESS_AREAS};
use cover_core::cover_type::CoverType;
use cover_core::error::CoverError;
use cover_core::forest::ForestModel;
use cover_core::measurements::CartographicMeasurements;
use cover_core::predictor::CoverPredictor;
use cover_core::schema::{assemble, FEATURE_COUNT};

#[derive(Parser, Debug)]
#[command(name = "cover-verify", about = "Run the prediction acceptance battery against a model artifact")]
struct Args {
    /// Model artifact path (.json or .json.gz).
    #[arg(short, long, default_value = "data/forest_cover_model.json")]
    model: String,
}

/// One battery check: a name and a closure returning Err(reason) on fail.
struct Check<'a> {
    name: &'static str,
    run: Box<dyn Fn() -> Result<(), String> + 'a>,
}

fn check<'a>(name: &'static str, run: impl Fn() -> Result<(), String> + 'a) -> Check<'a> {
    Check {
        name,
        run: Box::new(run),
    }
}

fn battery(predictor: &CoverPredictor) -> Vec<Check<'_>> {
    vec![
        check("wilderness indicators: one 1 at position k-1", move || {
            for k in 1..=WILDERNESS_AREAS {
                let area = WildernessArea::from_label(&format!("Wilderness Area {k}"))
                    .map_err(|e| e.to_string())?;
                let group = one_hot(Some(area.slot()), WILDERNESS_AREAS);
                if group.len() != WILDERNESS_AREAS || group[k - 1] != 1.0 {
                    return Err(format!("group for k={k}: {group:?}"));
                }
                if group.iter().sum::<f32>() != 1.0 {
                    return Err(format!("more than one indicator set for k={k}"));
                }
            }
            Ok(())
        }),
        check("soil indicators: one 1 at position k-1", move || {
            for k in 1..=SOIL_TYPES {
                let soil = SoilType::from_label(&format!("Soil Type {k}"))
                    .map_err(|e| e.to_string())?;
                let group = one_hot(Some(soil.slot()), SOIL_TYPES);
                if group.len() != SOIL_TYPES || group[k - 1] != 1.0 || group.iter().sum::<f32>() != 1.0 {
                    return Err(format!("group for k={k} malformed"));
                }
            }
            Ok(())
        }),
        check("assembled rows are always 54 columns", move || {
            let m = CartographicMeasurements::default();
            for wilderness in [None, Some(WildernessArea::CacheLaPoudre)] {
                let row = assemble(&m, wilderness, None);
                if row.len() != FEATURE_COUNT {
                    return Err(format!("row length {}", row.len()));
                }
            }
            Ok(())
        }),
        check("label mapping is total and bijective over 1..=7", move || {
            let mut seen = std::collections::HashSet::new();
            for code in 1u8..=7 {
                let cover = CoverType::from_code(code).map_err(|e| e.to_string())?;
                if !seen.insert(cover.label()) {
                    return Err(format!("duplicate label {:?}", cover.label()));
                }
            }
            Ok(())
        }),
        check("golden scenario: 2500 m patch predicts a labelled cover", move || {
            let line = predictor
                .predict_cover(
                    &CartographicMeasurements::default(),
                    Some("Wilderness Area 1"),
                    Some("Soil Type 1"),
                )
                .map_err(|e| e.to_string())?;
            let label = line
                .strip_prefix("Predicted Cover Type: ")
                .ok_or_else(|| format!("unexpected line {line:?}"))?;
            if !CoverType::ALL.iter().any(|c| c.label() == label) {
                return Err(format!("unknown label {label:?}"));
            }
            Ok(())
        }),
        check("missing wilderness selection still completes", move || {
            predictor
                .predict_cover(&CartographicMeasurements::default(), None, Some("Soil Type 1"))
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
        check("malformed choice string is rejected", move || {
            match predictor.predict_cover(&CartographicMeasurements::default(), Some("Wilderness Area"), None) {
                Err(CoverError::InvalidChoiceFormat { .. }) => Ok(()),
                Err(other) => Err(format!("wrong error: {other}")),
                Ok(line) => Err(format!("accepted malformed choice: {line:?}")),
            }
        }),
        check("pipeline is idempotent", move || {
            let m = CartographicMeasurements::default();
            let a = predictor
                .predict_cover(&m, Some("Wilderness Area 2"), Some("Soil Type 10"))
                .map_err(|e| e.to_string())?;
            let b = predictor
                .predict_cover(&m, Some("Wilderness Area 2"), Some("Soil Type 10"))
                .map_err(|e| e.to_string())?;
            if a != b {
                return Err(format!("{a:?} != {b:?}"));
            }
            Ok(())
        }),
        check("batch predictions match single-row predictions", move || {
            let rows: Vec<_> = [1800.0f32, 2500.0, 3100.0, 3700.0]
                .iter()
                .map(|&elevation| {
                    let m = CartographicMeasurements {
                        elevation,
                        ..Default::default()
                    };
                    assemble(&m, Some(WildernessArea::Rawah), None)
                })
                .collect();
            let model = predictor.model();
            let batch = model.predict_batch(&rows).map_err(|e| e.to_string())?;
            for (row, &code) in rows.iter().zip(&batch) {
                if model.predict(row).map_err(|e| e.to_string())? != code {
                    return Err("batch diverged from single-row".to_string());
                }
            }
            Ok(())
        }),
        check("every cover class is reachable in the artifact", move || {
            let mut seen = std::collections::HashSet::new();
            for tree in &predictor.model().trees {
                for node in &tree.nodes {
                    if let cover_core::forest::TreeNode::Leaf { class } = node {
                        seen.insert(*class);
                    }
                }
            }
            for code in 1u8..=7 {
                if !seen.contains(&code) {
                    return Err(format!("class code {code} unreachable"));
                }
            }
            Ok(())
        }),
    ]
}

fn main() -> Result<()> {
    let args = Args::parse();

    let model = ForestModel::load(&args.model)?;
    eprintln!(
        "[cover-verify] loaded {} ({} trees, {} classes)",
        args.model,
        model.trees.len(),
        model.classes.len()
    );
    let predictor = CoverPredictor::new(model);

    let mut failures = 0usize;
    let checks = battery(&predictor);
    let total = checks.len();
    for check in &checks {
        match (check.run)() {
            Ok(()) => eprintln!("[cover-verify] ok   {}", check.name),
            Err(reason) => {
                failures += 1;
                eprintln!("[cover-verify] FAIL {}: {}", check.name, reason);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {total} checks failed");
    }
    eprintln!("[cover-verify] all {total} checks passed");
    Ok(())
}
