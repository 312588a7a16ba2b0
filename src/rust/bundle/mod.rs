//! The model bundle: feature schema, fitted encoders and classifier, loaded once
//! at startup and shared read-only afterwards.

mod builder;
mod loader;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classifier::{Classifier, ClassifierError, ModelSpec};
use crate::encoder::{EncoderTable, InvalidEncoder, LabelEncoder};
use crate::features::{Feature, FeatureSchema, SchemaError};

pub use builder::ModelBundleBuilder;
pub use loader::BundleLoader;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Bundle file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Malformed bundle: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for bundle file")]
    HashMismatch { expected: String, actual: String },
    #[error("Invalid feature schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("Invalid encoder for column '{column}': {source}")]
    InvalidEncoder {
        column: String,
        #[source]
        source: InvalidEncoder,
    },
    #[error("Encoder given for unknown column '{0}'")]
    UnknownEncoderColumn(String),
    #[error("Encoder for column '{0}' given more than once")]
    DuplicateEncoder(Feature),
    #[error("No encoder fitted for schema column '{0}'")]
    MissingEncoder(Feature),
    #[error("Bundle is missing its {0}")]
    Incomplete(&'static str),
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

/// On-disk layout of a bundle file.
///
/// `label_encoders` is a JSON object read entry by entry, so a repeated column key
/// reaches the builder and is rejected there rather than silently overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleFile {
    pub feature_columns: Vec<String>,
    #[serde(
        serialize_with = "serialize_encoder_entries",
        deserialize_with = "deserialize_encoder_entries"
    )]
    pub label_encoders: Vec<(String, LabelEncoder)>,
    pub model: ModelSpec,
}

fn serialize_encoder_entries<S>(
    entries: &[(String, LabelEncoder)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (column, encoder) in entries {
        map.serialize_entry(column, encoder)?;
    }
    map.end()
}

fn deserialize_encoder_entries<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, LabelEncoder)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, LabelEncoder)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from column name to encoder classes")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// Everything a prediction request needs, immutable after load.
#[derive(Debug)]
pub struct ModelBundle {
    source: Option<PathBuf>,
    schema: FeatureSchema,
    encoders: EncoderTable,
    classifier: Classifier,
}

impl ModelBundle {
    /// Creates a new ModelBundleBuilder for fluent construction
    pub fn builder() -> ModelBundleBuilder {
        ModelBundleBuilder::new()
    }

    /// Loads and validates a bundle file with default options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        BundleLoader::new().load(path)
    }

    /// The file this bundle was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encoders(&self) -> &EncoderTable {
        &self.encoders
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}
