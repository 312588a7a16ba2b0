mod common;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use mushroom_classifier::classifier::OnnxClassifier;
use mushroom_classifier::{
    Classifier, ClassifierError, Feature, InputTable, ModelBundle, Prediction, Predictor,
    RuntimeConfig,
};
use ndarray::Array2;

/// Labels a row poisonous when its `odor` code (column 4) is above 5.5.
fn odor_threshold_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("odor_threshold.onnx")
}

/// Emits one label per cell instead of one per row.
fn flat_labels_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("flat_labels.onnx")
}

fn rows_with_odor(codes: &[f32]) -> Array2<f32> {
    let mut features = Array2::<f32>::zeros((codes.len(), 22));
    for (row, &code) in codes.iter().enumerate() {
        features[[row, 4]] = code;
    }
    features
}

#[test]
fn predicts_one_label_per_row() -> Result<(), ClassifierError> {
    let model = OnnxClassifier::load(&odor_threshold_model(), 22, &RuntimeConfig::default())?;
    let labels = model.predict(rows_with_odor(&[0.0, 5.0, 6.0, 8.0]).view())?;
    assert_eq!(labels, vec![0, 0, 1, 1]);
    Ok(())
}

#[test]
fn threaded_runtime_config_gives_same_labels() -> Result<(), ClassifierError> {
    let config = RuntimeConfig {
        inter_threads: 1,
        intra_threads: 2,
        ..RuntimeConfig::default()
    };
    let model = OnnxClassifier::load(&odor_threshold_model(), 22, &config)?;
    assert_eq!(model.predict(rows_with_odor(&[7.0]).view())?, vec![1]);
    Ok(())
}

#[test]
fn rejects_wrong_feature_width() -> Result<(), ClassifierError> {
    let model = OnnxClassifier::load(&odor_threshold_model(), 22, &RuntimeConfig::default())?;
    let narrow = Array2::<f32>::zeros((2, 21));
    assert!(matches!(
        model.predict(narrow.view()),
        Err(ClassifierError::ValidationError(_))
    ));
    Ok(())
}

#[test]
fn rejects_label_count_that_differs_from_rows() -> Result<(), ClassifierError> {
    let model = OnnxClassifier::load(&flat_labels_model(), 22, &RuntimeConfig::default())?;
    match model.predict(rows_with_odor(&[0.0, 6.0]).view()) {
        Err(ClassifierError::PredictionError(msg)) => {
            assert!(msg.contains("44 labels for 2 rows"), "{msg}");
        }
        other => panic!("expected prediction error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn onnx_bundle_runs_full_request() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::copy(odor_threshold_model(), dir.path().join("odor_threshold.onnx"))?;

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(common::sample_bundle_path())?)?;
    value["model"] = serde_json::json!({ "kind": "onnx", "path": "odor_threshold.onnx" });
    let path = dir.path().join("model_with_encoders.json");
    fs::write(&path, serde_json::to_vec(&value)?)?;

    let bundle = Arc::new(ModelBundle::load(&path)?);
    assert!(matches!(bundle.classifier(), Classifier::Onnx(_)));
    assert_eq!(bundle.classifier().info().kind, "onnx");

    let rows = vec![
        common::row(&bundle, &[(Feature::Odor, "n")]),
        common::row(&bundle, &[(Feature::Odor, "p")]),
    ];
    let table = InputTable::new(common::header(), rows);
    let report = Predictor::new(bundle).predict(Some(&table))?;
    assert_eq!(report.predictions(), [Prediction::Edible, Prediction::Poisonous]);
    Ok(())
}
