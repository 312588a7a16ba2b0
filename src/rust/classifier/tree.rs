use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{argmax, average_vectors, normalize_weights};

const LEAF: i64 = -1;

/// A fitted decision tree in the flat array layout used by tree estimators.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise a sample goes left
/// when `x[feature[i]] <= threshold[i]`. `value[i]` holds the class weights seen
/// at the node during fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f32>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Checks the arrays describe a well-formed tree.
    ///
    /// Children must point strictly forward, which rules out cycles and keeps
    /// traversal bounded by the node count.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!(
                "node arrays disagree in length (children_left={}, children_right={}, \
                 feature={}, threshold={}, value={})",
                n,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            ));
        }
        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {node} has {} class weights, expected {n_classes}",
                    self.value[node].len()
                ));
            }
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {node} has a right child but no left child"));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} points to invalid child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {node} splits on feature {feature}, model has {n_features} features"
                ));
            }
        }
        Ok(())
    }

    /// Walks the tree for one sample and returns the leaf's class probabilities.
    pub fn predict_proba(&self, sample: ArrayView1<f32>) -> Array1<f32> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let value = sample[self.feature[node] as usize] as f64;
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        normalize_weights(&Array1::from(self.value[node].clone()))
    }
}

/// A forest of decision trees whose class probabilities are averaged.
///
/// A single decision tree is an ensemble of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Label emitted for each probability column.
    pub classes: Vec<i64>,
    /// Width of the feature vectors the trees were fitted on.
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.len() < 2 {
            return Err(ClassifierError::ValidationError(
                "Model must contain at least 2 classes".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Model must contain at least 1 tree".to_string(),
            ));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|msg| ClassifierError::ValidationError(format!("Tree {idx}: {msg}")))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, sample: ArrayView1<f32>) -> Array1<f32> {
        let per_tree: Vec<Array1<f32>> = self
            .trees
            .iter()
            .map(|tree| tree.predict_proba(sample))
            .collect();
        average_vectors(&per_tree, self.classes.len())
    }

    pub fn predict(&self, features: ArrayView2<f32>) -> Result<Vec<i64>, ClassifierError> {
        if features.ncols() != self.n_features {
            return Err(ClassifierError::ValidationError(format!(
                "Expected {} feature columns, got {}",
                self.n_features,
                features.ncols()
            )));
        }
        Ok(features
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(&self.predict_proba(row))])
            .collect())
    }
}
