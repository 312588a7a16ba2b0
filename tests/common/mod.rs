#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use mushroom_classifier::{CategoricalEncoder, Feature, ModelBundle};

pub fn sample_bundle_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("model_with_encoders.json")
}

pub fn sample_bundle() -> Arc<ModelBundle> {
    Arc::new(ModelBundle::load(sample_bundle_path()).expect("sample bundle loads"))
}

pub fn header() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.column_name().to_string()).collect()
}

/// A row of first-listed categories, in `header()` order, with some columns overridden.
pub fn row(bundle: &ModelBundle, overrides: &[(Feature, &str)]) -> Vec<String> {
    Feature::ALL
        .iter()
        .map(|&feature| {
            overrides
                .iter()
                .find(|(f, _)| *f == feature)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| bundle.encoders().get(feature).unwrap().classes()[0].clone())
        })
        .collect()
}

pub fn to_csv(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut out = columns.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
