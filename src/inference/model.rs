//! Regression model interface and the gradient-boosted tree ensemble.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::ArtifactError;
use crate::features::{FeatureVector, FEATURE_COUNT, TRAINING_COLUMNS};

/// A fitted model producing one raw (log and scaled) target value
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

/// One regression tree in array form.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise a sample goes
/// left when `x[feature[i]] <= threshold[i]`. Trees are only obtained through
/// [`GradientBoostedTrees::load`], which checks the structure first.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl RegressionTree {
    fn check(&self) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err("tree arrays differ in length".to_string());
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == -1 {
                continue;
            }
            // Children always follow their parent, which also rules out cycles
            let in_range = |c: i64| c > i as i64 && (c as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {i} has invalid children ({left}, {right})"));
            }
            let feature = self.feature[i];
            if feature < 0 || feature as usize >= FEATURE_COUNT {
                return Err(format!("node {i} splits on unknown feature {feature}"));
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Leaf value reached by a sample of [`FEATURE_COUNT`] values
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == -1 {
                return self.value[node];
            }
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// Additive ensemble: `init_value + learning_rate * Σ tree(x)`
#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoostedTrees {
    feature_names: Vec<String>,
    init_value: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    /// Load an exported ensemble and verify it against the training layout
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        info!("Loading model from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: GradientBoostedTrees =
            serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        model.check().map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            "Loaded ensemble with {} trees, {} nodes (learning rate {})",
            model.trees.len(),
            model.trees.iter().map(RegressionTree::node_count).sum::<usize>(),
            model.learning_rate
        );
        Ok(model)
    }

    fn check(&self) -> Result<(), String> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "model expects {} features, training layout has {}",
                self.feature_names.len(),
                FEATURE_COUNT
            ));
        }
        for (i, (got, want)) in self.feature_names.iter().zip(TRAINING_COLUMNS).enumerate() {
            if got != want {
                return Err(format!("feature {i} is '{got}', expected '{want}'"));
            }
        }
        if !self.init_value.is_finite() || !self.learning_rate.is_finite() {
            return Err("non-finite init value or learning rate".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for GradientBoostedTrees {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let x = features.values();
        if x.len() != self.feature_names.len() {
            bail!(
                "feature vector has {} columns, model expects {}",
                x.len(),
                self.feature_names.len()
            );
        }
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(x)).sum();
        Ok(self.init_value + self.learning_rate * sum)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// Stump splitting on `column`: left leaf `low`, right leaf `high`
    pub(crate) fn stump(column: &str, threshold: f64, low: f64, high: f64) -> serde_json::Value {
        let feature = TRAINING_COLUMNS.iter().position(|c| *c == column).unwrap();
        json!({
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [feature, -2, -2],
            "threshold": [threshold, -2.0, -2.0],
            "value": [0.0, low, high]
        })
    }

    pub(crate) fn model_json(init: f64, rate: f64, trees: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "feature_names": TRAINING_COLUMNS.to_vec(),
            "init_value": init,
            "learning_rate": rate,
            "trees": trees
        })
    }

    fn vector_with(column: &str, value: f64) -> FeatureVector {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[TRAINING_COLUMNS.iter().position(|c| *c == column).unwrap()] = value;
        FeatureVector::from_values(values).unwrap()
    }

    #[test]
    fn test_stump_prediction() {
        let model: GradientBoostedTrees = serde_json::from_value(model_json(
            10.0,
            0.5,
            vec![stump("Area", 6.0, -2.0, 4.0), stump("AssetLevelId_A", 0.5, 0.0, 1.0)],
        ))
        .unwrap();
        assert!(model.check().is_ok());

        let small = vector_with("Area", 5.0);
        assert_eq!(model.predict(&small).unwrap(), 10.0 + 0.5 * (-2.0 + 0.0));

        let large = vector_with("Area", 7.0);
        assert_eq!(model.predict(&large).unwrap(), 10.0 + 0.5 * 4.0);

        // equal to threshold goes left
        let edge = vector_with("Area", 6.0);
        assert_eq!(model.predict(&edge).unwrap(), 9.0);
    }

    #[test]
    fn test_load_checks_feature_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let mut json = model_json(0.0, 0.1, vec![stump("Area", 1.0, 0.0, 1.0)]);
        json["feature_names"][3] = json!("SARm2");
        fs::write(&path, json.to_string()).unwrap();

        let err = GradientBoostedTrees::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_load_rejects_backward_children() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let tree = json!({
            "children_left": [1, 0, -1],
            "children_right": [2, 2, -1],
            "feature": [0, 0, -2],
            "threshold": [1.0, 1.0, -2.0],
            "value": [0.0, 0.0, 1.0]
        });
        fs::write(&path, model_json(0.0, 0.1, vec![tree]).to_string()).unwrap();

        let err = GradientBoostedTrees::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_load_rejects_unknown_split_feature() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let mut tree = stump("Area", 1.0, 0.0, 1.0);
        tree["feature"][0] = json!(FEATURE_COUNT);
        fs::write(&path, model_json(0.0, 0.1, vec![tree]).to_string()).unwrap();

        let err = GradientBoostedTrees::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_load_rejects_ragged_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let mut tree = stump("Area", 1.0, 0.0, 1.0);
        tree["value"] = json!([0.0, 1.0]);
        fs::write(&path, model_json(0.0, 0.1, vec![tree]).to_string()).unwrap();

        let err = GradientBoostedTrees::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = GradientBoostedTrees::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
