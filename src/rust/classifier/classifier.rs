use std::path::{Path, PathBuf};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::onnx::OnnxClassifier;
use super::tree::TreeEnsemble;
use crate::runtime::RuntimeConfig;

/// The `model` section of a bundle file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Decision tree or random forest stored inline.
    TreeEnsemble(TreeEnsemble),
    /// An ONNX export; relative paths resolve against the bundle's directory.
    Onnx { path: PathBuf },
}

/// A loaded binary classifier mapping encoded feature rows to integer labels.
///
/// Immutable after construction and `Send + Sync`, so a single instance can back
/// every request for the lifetime of the process.
#[derive(Debug)]
pub enum Classifier {
    TreeEnsemble(TreeEnsemble),
    Onnx(OnnxClassifier),
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Materializes a model spec, validating it against the expected feature width.
    ///
    /// # Errors
    /// - `ValidationError` if a tree ensemble is malformed or fitted on a different width
    /// - `BuildError` if the ONNX file is missing or ONNX Runtime rejects it
    /// - `ModelError` if the ONNX graph has no inputs or outputs
    pub fn from_spec(
        spec: ModelSpec,
        base_dir: &Path,
        n_features: usize,
        config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        match spec {
            ModelSpec::TreeEnsemble(ensemble) => {
                ensemble.validate()?;
                if ensemble.n_features != n_features {
                    return Err(ClassifierError::ValidationError(format!(
                        "Model was fitted on {} features but the schema has {}",
                        ensemble.n_features, n_features
                    )));
                }
                Ok(Self::TreeEnsemble(ensemble))
            }
            ModelSpec::Onnx { path } => {
                let path = if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                };
                Ok(Self::Onnx(OnnxClassifier::load(&path, n_features, config)?))
            }
        }
    }

    /// Predicts one label per row of an encoded feature matrix.
    ///
    /// # Arguments
    /// * `features` - Shape [rows, n_features], columns in schema order
    ///
    /// # Example
    /// ```
    /// use mushroom_classifier::classifier::{Classifier, DecisionTree, TreeEnsemble};
    /// use ndarray::array;
    ///
    /// let classifier = Classifier::TreeEnsemble(TreeEnsemble {
    ///     classes: vec![0, 1],
    ///     n_features: 1,
    ///     trees: vec![DecisionTree {
    ///         children_left: vec![1, -1, -1],
    ///         children_right: vec![2, -1, -1],
    ///         feature: vec![0, -2, -2],
    ///         threshold: vec![0.5, -2.0, -2.0],
    ///         value: vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
    ///     }],
    /// });
    /// let labels = classifier.predict(array![[0.0], [1.0]].view()).unwrap();
    /// assert_eq!(labels, vec![0, 1]);
    /// ```
    pub fn predict(&self, features: ArrayView2<f32>) -> Result<Vec<i64>, ClassifierError> {
        match self {
            Self::TreeEnsemble(ensemble) => ensemble.predict(features),
            Self::Onnx(model) => model.predict(features),
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Self::TreeEnsemble(ensemble) => ensemble.n_features,
            Self::Onnx(model) => model.n_features,
        }
    }

    /// Returns information about the classifier's backend
    pub fn info(&self) -> super::ClassifierInfo {
        match self {
            Self::TreeEnsemble(ensemble) => super::ClassifierInfo {
                kind: "tree_ensemble",
                model_path: None,
                n_features: ensemble.n_features,
                num_trees: Some(ensemble.trees.len()),
            },
            Self::Onnx(model) => super::ClassifierInfo {
                kind: "onnx",
                model_path: Some(model.model_path.to_string_lossy().to_string()),
                n_features: model.n_features,
                num_trees: None,
            },
        }
    }
}
