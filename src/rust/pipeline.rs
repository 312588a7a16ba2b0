use std::collections::HashSet;
use std::fmt;
use std::io;
use std::sync::Arc;

use log::{debug, info, warn};
use ndarray::Array2;
use thiserror::Error;

use crate::bundle::ModelBundle;
use crate::classifier::ClassifierError;
use crate::encoder::EncodeError;
use crate::features::FeatureSchema;
use crate::input::InputTable;
use crate::report::{Prediction, PredictionReport};

/// Where a predict request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InputReady,
    Validated,
    Encoded,
    Predicted,
    Presented,
    Aborted,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::InputReady => "input ready",
            Self::Validated => "validated",
            Self::Encoded => "encoded",
            Self::Predicted => "predicted",
            Self::Presented => "presented",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Recoverable failures of a single request. None of them affect the loaded bundle.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Please upload a file or complete the manual inputs.")]
    MissingInput,
    #[error("Uploaded file must contain exactly these columns: {}", .required.join(", "))]
    SchemaMismatch { required: Vec<String> },
    #[error("Encoding error: {source} (row {row})")]
    Encoding {
        row: usize,
        #[source]
        source: EncodeError,
    },
    #[error("Row {row} has {found} values but the header names {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Could not read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Classifier(#[from] ClassifierError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl RequestError {
    /// The lifecycle state the request was in when it gave up.
    pub fn aborted_from(&self) -> RequestState {
        match self {
            Self::MissingInput | Self::Csv(_) | Self::Io(_) => RequestState::InputReady,
            Self::SchemaMismatch { .. } | Self::RaggedRow { .. } => RequestState::Validated,
            Self::Encoding { .. } => RequestState::Encoded,
            Self::Classifier(_) => RequestState::Predicted,
        }
    }
}

/// Accepts a header iff it names every schema column exactly once, in any order.
pub fn validate_columns(columns: &[String], schema: &FeatureSchema) -> Result<(), RequestError> {
    let required = schema.column_names();
    let uploaded: HashSet<&str> = columns.iter().map(String::as_str).collect();
    let expected: HashSet<&str> = required.iter().copied().collect();
    if uploaded == expected && columns.len() == required.len() {
        Ok(())
    } else {
        Err(RequestError::SchemaMismatch {
            required: required.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Encodes a validated table into a `[rows, features]` matrix in schema order.
///
/// Stops at the first row whose width disagrees with the header, or the first value
/// outside its encoder's vocabulary; `row` in either error is 1-based.
pub fn encode_table(
    table: &InputTable,
    bundle: &ModelBundle,
) -> Result<Array2<f32>, RequestError> {
    let schema = bundle.schema();
    let positions = schema
        .features()
        .iter()
        .map(|feature| {
            table
                .column_index(feature.column_name())
                .ok_or_else(|| RequestError::SchemaMismatch {
                    required: schema.column_names().into_iter().map(str::to_string).collect(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut encoded = Array2::<f32>::zeros((table.len(), schema.len()));
    for (row_idx, row) in table.rows().iter().enumerate() {
        if row.len() != table.columns().len() {
            return Err(RequestError::RaggedRow {
                row: row_idx + 1,
                expected: table.columns().len(),
                found: row.len(),
            });
        }
        let cells = schema.features().iter().zip(&positions).enumerate();
        for (col, (&feature, &source_col)) in cells {
            let code = bundle
                .encoders()
                .encode(feature, &row[source_col])
                .map_err(|source| RequestError::Encoding {
                    row: row_idx + 1,
                    source,
                })?;
            encoded[[row_idx, col]] = code as f32;
        }
    }
    Ok(encoded)
}

/// Runs predict requests against a shared, read-only bundle.
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: Arc<ModelBundle>,
}

impl Predictor {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Takes one request from `Idle` to `Presented`, or aborts it.
    ///
    /// `None` and tables without rows are both treated as missing input.
    pub fn predict(&self, input: Option<&InputTable>) -> Result<PredictionReport, RequestError> {
        let result = self.run(input);
        match &result {
            Ok(report) => {
                debug!("request {}", RequestState::Presented);
                info!(
                    "Predicted {} rows: {} edible, {} poisonous",
                    report.summary().total,
                    report.summary().edible,
                    report.summary().poisonous
                );
            }
            Err(err) => warn!("Request aborted while {}: {}", err.aborted_from(), err),
        }
        result
    }

    fn run(&self, input: Option<&InputTable>) -> Result<PredictionReport, RequestError> {
        debug!("request {}", RequestState::Idle);
        let table = match input {
            Some(table) if !table.is_empty() => table,
            _ => return Err(RequestError::MissingInput),
        };
        debug!("request {} ({} rows)", RequestState::InputReady, table.len());

        validate_columns(table.columns(), self.bundle.schema())?;
        debug!("request {}", RequestState::Validated);

        let encoded = encode_table(table, &self.bundle)?;
        debug!("request {}", RequestState::Encoded);

        let labels = self.bundle.classifier().predict(encoded.view())?;
        debug!("request {}", RequestState::Predicted);

        let predictions = labels
            .into_iter()
            .map(|label| {
                Prediction::from_label(label).ok_or_else(|| {
                    ClassifierError::PredictionError(format!("Unexpected label {label}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PredictionReport::new(table.clone(), predictions))
    }
}
