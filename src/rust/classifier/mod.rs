mod classifier;
mod error;
pub mod onnx;
pub mod tree;
mod utils;

pub use classifier::{Classifier, ModelSpec};
pub use error::ClassifierError;
pub use onnx::OnnxClassifier;
pub use tree::{DecisionTree, TreeEnsemble};

/// Information about the loaded classifier, shown in the window footer and logs
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Backend name ("tree_ensemble" or "onnx")
    pub kind: &'static str,
    /// Path to the ONNX model file, when the backend is ONNX
    pub model_path: Option<String>,
    /// Width of the feature vectors the model expects
    pub n_features: usize,
    /// Number of trees, when the backend is a tree ensemble
    pub num_trees: Option<usize>,
}
