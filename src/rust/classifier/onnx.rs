use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use ndarray::ArrayView2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A classifier exported to ONNX and executed through ONNX Runtime.
///
/// The graph is expected to:
/// - Accept one float input of shape [batch_size, n_features]
/// - Emit the predicted labels as its first output, int64 of shape [batch_size]
#[derive(Debug)]
pub struct OnnxClassifier {
    pub model_path: PathBuf,
    pub n_features: usize,
    input_name: String,
    session: Session,
}

impl OnnxClassifier {
    pub fn load(
        model_path: &Path,
        n_features: usize,
        config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::BuildError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let session = create_session_builder(config)?.commit_from_file(model_path)?;
        Self::validate_model(&session)?;
        info!("ONNX model structure validated successfully");

        Ok(Self {
            model_path: model_path.to_path_buf(),
            n_features,
            input_name: session.inputs[0].name.clone(),
            session,
        })
    }

    /// Validates that the model has at least one input and one output
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have 1 input for the feature matrix, found none".to_string(),
            ));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for labels".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predict(&self, features: ArrayView2<f32>) -> Result<Vec<i64>, ClassifierError> {
        if features.ncols() != self.n_features {
            return Err(ClassifierError::ValidationError(format!(
                "Expected {} feature columns, got {}",
                self.n_features,
                features.ncols()
            )));
        }

        let input_dyn = features.to_owned().into_dyn();
        let input = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(&input).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0].try_extract_tensor::<i64>().map_err(|e| {
            ClassifierError::ModelError(format!("Failed to extract label tensor: {}", e))
        })?;

        let labels: Vec<i64> = labels.iter().copied().collect();
        if labels.len() != features.nrows() {
            return Err(ClassifierError::PredictionError(format!(
                "Model returned {} labels for {} rows",
                labels.len(),
                features.nrows()
            )));
        }
        Ok(labels)
    }
}
