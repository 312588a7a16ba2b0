use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::Feature;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("column '{column}' contains previously unseen label '{value}'")]
    UnseenLabel { column: String, value: String },
    #[error("column '{column}' has no label for code {code}")]
    UnknownCode { column: String, code: i64 },
    #[error("no encoder fitted for column '{0}'")]
    MissingEncoder(Feature),
}

/// Maps a feature's raw category strings onto the dense integer codes a model was
/// trained with. Both directions fail on values outside the trained vocabulary.
pub trait CategoricalEncoder {
    fn encode(&self, value: &str) -> Result<i64, EncodeError>;

    fn decode(&self, code: i64) -> Result<&str, EncodeError>;

    /// Trained categories, ordered by code.
    fn classes(&self) -> &[String];
}

/// A fitted label encoder: the code of a category is its position in `classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEncoder {
    #[error("encoder has no classes")]
    Empty,
    #[error("encoder lists class '{0}' more than once")]
    DuplicateClass(String),
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, InvalidEncoder> {
        if classes.is_empty() {
            return Err(InvalidEncoder::Empty);
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as i64).is_some() {
                return Err(InvalidEncoder::DuplicateClass(class.clone()));
            }
        }
        Ok(Self {
            column: String::new(),
            classes,
            codes,
        })
    }

    /// Names the column this encoder serves, used in error messages.
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = InvalidEncoder;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

impl CategoricalEncoder for LabelEncoder {
    fn encode(&self, value: &str) -> Result<i64, EncodeError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| EncodeError::UnseenLabel {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    fn decode(&self, code: i64) -> Result<&str, EncodeError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| EncodeError::UnknownCode {
                column: self.column.clone(),
                code,
            })
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Fitted encoders keyed by feature. Immutable once the bundle is loaded.
#[derive(Debug, Clone, Default)]
pub struct EncoderTable {
    encoders: HashMap<Feature, LabelEncoder>,
}

impl EncoderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        feature: Feature,
        encoder: LabelEncoder,
    ) -> Option<LabelEncoder> {
        self.encoders
            .insert(feature, encoder.for_column(feature.column_name()))
    }

    pub fn get(&self, feature: Feature) -> Result<&LabelEncoder, EncodeError> {
        self.encoders
            .get(&feature)
            .ok_or(EncodeError::MissingEncoder(feature))
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.encoders.contains_key(&feature)
    }

    pub fn encode(&self, feature: Feature, value: &str) -> Result<i64, EncodeError> {
        self.get(feature)?.encode(value)
    }

    pub fn decode(&self, feature: Feature, code: i64) -> Result<&str, EncodeError> {
        self.get(feature)?.decode(code)
    }

    /// The selectable options for a feature: exactly the trained categories.
    pub fn options(&self, feature: Feature) -> &[String] {
        self.encoders
            .get(&feature)
            .map(|encoder| encoder.classes())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
