//! Decision forest model artifact: loading and single-row prediction.
//!
//! The artifact is JSON (optionally gzip-compressed as `.json.gz`): a list
//! of trees, each an array of nodes indexed by position with node 0 the
//! root. Evaluation walks `row[feature] <= threshold ? left : right` to a
//! leaf; the forest predicts by majority vote over tree leaves, the lowest
//! class code winning ties so repeated runs are identical.
//!
//! Loading happens exactly once at process startup. The structure is
//! validated then, so prediction itself only re-checks the row length.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::cover_type::CoverType;
use crate::error::CoverError;
use crate::schema::{FeatureVector, FEATURE_COUNT, SCHEMA_VERSION};

/// One node of a decision tree, addressed by array index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split: `row[feature] <= threshold` descends left.
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Terminal vote for a class code.
    Leaf { class: u8 },
}

/// A single decision tree. Node 0 is the root; validated trees only
/// reference children at higher indices, so every walk terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk one row to a leaf and return its class code.
    fn decide(&self, row: &[f32]) -> u8 {
        let mut at = 0usize;
        loop {
            match self.nodes[at] {
                TreeNode::Leaf { class } => return class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// The pre-trained classifier artifact. Immutable after load; callers
/// hold it read-only for the life of the process and inject it into the
/// predictor explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Feature schema revision the artifact was exported against.
    pub schema_version: u32,
    /// Number of feature columns the trees were fitted on.
    pub n_features: usize,
    /// Class codes the forest may emit.
    pub classes: Vec<u8>,
    pub trees: Vec<Tree>,
}

impl ForestModel {
    /// Load and validate an artifact from `.json` or `.json.gz`.
    /// Failure here is fatal at startup: the caller must not serve
    /// requests over a model that did not load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoverError> {
        let path = path.as_ref();
        let text = read_artifact(path).map_err(|e| CoverError::ModelLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| match e {
            CoverError::ModelLoad { reason, .. } => CoverError::ModelLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse and validate an artifact from its JSON text. Used directly
    /// by hosts that hold the artifact in memory (the browser bundle).
    pub fn from_json(text: &str) -> Result<Self, CoverError> {
        let model: ForestModel = serde_json::from_str(text).map_err(|e| CoverError::ModelLoad {
            path: "<json>".to_string(),
            reason: e.to_string(),
        })?;
        model.validate().map_err(|reason| CoverError::ModelLoad {
            path: "<json>".to_string(),
            reason,
        })?;
        Ok(model)
    }

    /// Structural checks run once at load: schema contract, tree
    /// presence, child indices that terminate, and leaf classes that all
    /// carry labels.
    fn validate(&self) -> Result<(), String> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(format!(
                "artifact schema version {} (serving schema is {})",
                self.schema_version, SCHEMA_VERSION
            ));
        }
        if self.n_features != FEATURE_COUNT {
            return Err(format!(
                "artifact expects {} feature columns, schema has {}",
                self.n_features, FEATURE_COUNT
            ));
        }
        if self.trees.is_empty() {
            return Err("artifact contains no trees".to_string());
        }
        if self.classes.is_empty() {
            return Err("artifact declares no classes".to_string());
        }
        for &class in &self.classes {
            CoverType::from_code(class)
                .map_err(|_| format!("artifact declares unmapped class code {class}"))?;
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {t} is empty"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if feature >= self.n_features {
                            return Err(format!(
                                "tree {t} node {i} splits on feature {feature} (only {} columns)",
                                self.n_features
                            ));
                        }
                        // Children must sit strictly after their parent:
                        // guarantees every walk makes progress and ends.
                        if left <= i || right <= i || left >= tree.nodes.len() || right >= tree.nodes.len() {
                            return Err(format!(
                                "tree {t} node {i} has dangling or non-descending children ({left}, {right})"
                            ));
                        }
                    }
                    TreeNode::Leaf { class } => {
                        if !self.classes.contains(&class) {
                            return Err(format!(
                                "tree {t} node {i} votes for undeclared class {class}"
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Predict the class code for one assembled row. Single synchronous
    /// attempt, no retry; the only failure is a row/model shape mismatch.
    pub fn predict(&self, features: &FeatureVector) -> Result<u8, CoverError> {
        if features.len() != self.n_features {
            return Err(CoverError::ShapeMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        Ok(self.vote(features.as_slice()))
    }

    /// Predict class codes for many rows, preserving order. With the
    /// `threading` feature rows are scored in parallel; the model is
    /// read-only, so no locking is involved.
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<u8>, CoverError> {
        #[cfg(feature = "threading")]
        {
            rows.par_iter().map(|row| self.predict(row)).collect()
        }
        #[cfg(not(feature = "threading"))]
        {
            rows.iter().map(|row| self.predict(row)).collect()
        }
    }

    /// Majority vote across trees; ties resolve to the lowest class code.
    fn vote(&self, row: &[f32]) -> u8 {
        let mut counts = [0u32; 256];
        for tree in &self.trees {
            counts[tree.decide(row) as usize] += 1;
        }
        let mut best = 0usize;
        for (code, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = code;
            }
        }
        best as u8
    }
}

/// Read the artifact text, transparently gunzipping `.gz` files.
fn read_artifact(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text)?;
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::CartographicMeasurements;
    use crate::schema::{assemble, col};

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

    /// Two trees splitting on elevation at 3000 m: below → Lodgepole Pine,
    /// above → Spruce/Fir. The third tree always votes Krummholz, so the
    /// vote is 2:1 either way.
    fn three_tree_model() -> ForestModel {
        ForestModel {
            schema_version: SCHEMA_VERSION,
            n_features: FEATURE_COUNT,
            classes: vec![1, 2, 7],
            trees: vec![
                Tree {
                    nodes: vec![split(col::ELEVATION, 3000.0, 1, 2), leaf(2), leaf(1)],
                },
                Tree {
                    nodes: vec![split(col::ELEVATION, 3000.0, 1, 2), leaf(2), leaf(1)],
                },
                Tree {
                    nodes: vec![leaf(7)],
                },
            ],
        }
    }

    fn row_at_elevation(elevation: f32) -> FeatureVector {
        let m = CartographicMeasurements {
            elevation,
            ..Default::default()
        };
        assemble(&m, None, None)
    }

    #[test]
    fn majority_vote_beats_the_odd_tree_out() {
        let model = three_tree_model();
        assert_eq!(model.predict(&row_at_elevation(2500.0)).unwrap(), 2);
        assert_eq!(model.predict(&row_at_elevation(3500.0)).unwrap(), 1);
    }

    #[test]
    fn ties_resolve_to_the_lowest_class_code() {
        let mut model = three_tree_model();
        model.trees.pop();
        model.trees[1] = Tree {
            nodes: vec![leaf(7)],
        };
        // One vote for 2, one for 7.
        assert_eq!(model.predict(&row_at_elevation(2500.0)).unwrap(), 2);
    }

    #[test]
    fn shape_mismatch_is_rejected_before_walking_trees() {
        let model = three_tree_model();
        let short = FeatureVector::from_values(vec![0.0; 10]);
        let err = model.predict(&short).unwrap_err();
        assert!(
            matches!(err, CoverError::ShapeMismatch { expected: 54, got: 10 }),
            "got {err}"
        );
    }

    #[test]
    fn batch_matches_single_row_predictions() {
        let model = three_tree_model();
        let rows: Vec<FeatureVector> = [2100.0, 2900.0, 3100.0, 3900.0]
            .iter()
            .map(|&e| row_at_elevation(e))
            .collect();
        let batch = model.predict_batch(&rows).unwrap();
        let singles: Vec<u8> = rows.iter().map(|r| model.predict(r).unwrap()).collect();
        assert_eq!(batch, singles);
    }

    #[test]
    fn json_round_trip_preserves_predictions() {
        let model = three_tree_model();
        let json = serde_json::to_string(&model).unwrap();
        let back = ForestModel::from_json(&json).unwrap();
        let row = row_at_elevation(2500.0);
        assert_eq!(back.predict(&row).unwrap(), model.predict(&row).unwrap());
    }

    #[test]
    fn load_reads_plain_and_gzipped_artifacts() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let model = three_tree_model();
        let json = serde_json::to_string(&model).unwrap();
        let dir = std::env::temp_dir();

        let plain = dir.join("cover_core_test_model.json");
        std::fs::write(&plain, &json).unwrap();
        assert_eq!(ForestModel::load(&plain).unwrap().trees.len(), 3);

        let gz_path = dir.join("cover_core_test_model.json.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(json.as_bytes()).unwrap();
        std::fs::write(&gz_path, enc.finish().unwrap()).unwrap();
        assert_eq!(ForestModel::load(&gz_path).unwrap().trees.len(), 3);

        std::fs::remove_file(plain).ok();
        std::fs::remove_file(gz_path).ok();
    }

    #[test]
    fn load_missing_file_is_model_load_error() {
        let err = ForestModel::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CoverError::ModelLoad { .. }), "got {err}");
    }

    #[test]
    fn validation_rejects_wrong_feature_count() {
        let mut model = three_tree_model();
        model.n_features = 53;
        let json = serde_json::to_string(&model).unwrap();
        let err = ForestModel::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("feature columns"), "got {err}");
    }

    #[test]
    fn validation_rejects_dangling_children() {
        let mut model = three_tree_model();
        model.trees[0] = Tree {
            nodes: vec![split(col::ELEVATION, 3000.0, 1, 99), leaf(2)],
        };
        let json = serde_json::to_string(&model).unwrap();
        assert!(ForestModel::from_json(&json).is_err());
    }

    #[test]
    fn validation_rejects_backward_children() {
        let mut model = three_tree_model();
        model.trees[0] = Tree {
            nodes: vec![split(col::ELEVATION, 3000.0, 0, 1), leaf(2)],
        };
        let json = serde_json::to_string(&model).unwrap();
        assert!(ForestModel::from_json(&json).is_err());
    }

    #[test]
    fn validation_rejects_unmapped_class_codes() {
        let mut model = three_tree_model();
        model.classes = vec![1, 2, 9];
        let json = serde_json::to_string(&model).unwrap();
        let err = ForestModel::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("unmapped class code 9"), "got {err}");
    }

    #[test]
    fn validation_rejects_undeclared_leaf_votes() {
        let mut model = three_tree_model();
        model.trees[2] = Tree {
            nodes: vec![leaf(4)],
        };
        let json = serde_json::to_string(&model).unwrap();
        let err = ForestModel::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("undeclared class 4"), "got {err}");
    }

    #[test]
    fn validation_rejects_empty_forest() {
        let mut model = three_tree_model();
        model.trees.clear();
        let json = serde_json::to_string(&model).unwrap();
        assert!(ForestModel::from_json(&json).is_err());
    }
}
