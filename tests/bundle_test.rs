mod common;

use std::fs;

use mushroom_classifier::{BundleError, BundleLoader, Feature, ModelBundle};
use serde_json::Value;

fn sample_json() -> Value {
    serde_json::from_str(&fs::read_to_string(common::sample_bundle_path()).unwrap()).unwrap()
}

fn write_bundle(dir: &tempfile::TempDir, value: &Value) -> std::path::PathBuf {
    let path = dir.path().join("model_with_encoders.json");
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn sample_bundle_loads() {
    let bundle = common::sample_bundle();
    assert_eq!(bundle.schema().len(), 22);
    assert_eq!(bundle.encoders().len(), 22);
    assert_eq!(bundle.encoders().options(Feature::VeilType), ["p".to_string()]);
    assert_eq!(bundle.classifier().info().kind, "tree_ensemble");
    assert!(bundle.source().unwrap().ends_with("model_with_encoders.json"));
}

#[test]
fn missing_bundle_is_fatal() {
    let err = ModelBundle::load("/nonexistent/dir/model_with_encoders.json").unwrap_err();
    assert!(matches!(err, BundleError::NotFound(_)));
}

#[test]
fn corrupt_bundle_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, b"\x80\x04\x95pickle bytes").unwrap();
    assert!(matches!(
        ModelBundle::load(&path),
        Err(BundleError::ParseError(_))
    ));
}

#[test]
fn checksum_is_enforced() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_bundle(&dir, &sample_json());

    let actual = match BundleLoader::new()
        .with_expected_sha256(Some("00".repeat(32)))
        .load(&path)
    {
        Err(BundleError::HashMismatch { actual, .. }) => actual,
        other => panic!("expected hash mismatch, got {other:?}"),
    };

    assert!(BundleLoader::verify_file(&path, &actual)?);
    let bundle = BundleLoader::new()
        .with_expected_sha256(Some(actual.to_uppercase()))
        .load(&path)?;
    assert_eq!(bundle.schema().len(), 22);
    Ok(())
}

#[test]
fn malformed_tree_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut value = sample_json();
    value["model"]["trees"][0]["children_left"][2] = Value::from(1);
    let path = write_bundle(&dir, &value);
    assert!(matches!(
        ModelBundle::load(&path),
        Err(BundleError::Classifier(_))
    ));
}

#[test]
fn schema_and_encoders_must_agree() {
    let dir = tempfile::tempdir().unwrap();

    let mut value = sample_json();
    value["label_encoders"].as_object_mut().unwrap().remove("habitat");
    let path = write_bundle(&dir, &value);
    assert!(matches!(
        ModelBundle::load(&path),
        Err(BundleError::MissingEncoder(Feature::Habitat))
    ));

    let mut value = sample_json();
    value["label_encoders"]["class"] = serde_json::json!(["e", "p"]);
    let path = write_bundle(&dir, &value);
    assert!(matches!(
        ModelBundle::load(&path),
        Err(BundleError::UnknownEncoderColumn(_))
    ));

    let mut value = sample_json();
    value["feature_columns"].as_array_mut().unwrap().pop();
    let path = write_bundle(&dir, &value);
    assert!(matches!(ModelBundle::load(&path), Err(BundleError::Schema(_))));
}

#[test]
fn repeated_encoder_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let text = serde_json::to_string(&sample_json()).unwrap();
    let text = text.replacen(
        "\"label_encoders\":{",
        "\"label_encoders\":{\"odor\":[\"n\",\"f\"],",
        1,
    );
    let path = dir.path().join("model_with_encoders.json");
    fs::write(&path, text).unwrap();
    assert!(matches!(
        ModelBundle::load(&path),
        Err(BundleError::DuplicateEncoder(Feature::Odor))
    ));
}

#[test]
fn onnx_model_path_is_relative_to_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let mut value = sample_json();
    value["model"] = serde_json::json!({ "kind": "onnx", "path": "missing.onnx" });
    let path = write_bundle(&dir, &value);
    let err = ModelBundle::load(&path).unwrap_err();
    let expected = dir.path().join("missing.onnx");
    assert!(err.to_string().contains(&expected.display().to_string()));
}
