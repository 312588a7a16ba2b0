use std::io;
use std::path::Path;

use csv::ReaderBuilder;

use crate::encoder::{CategoricalEncoder, EncodeError, EncoderTable};
use crate::features::{Feature, FeatureSchema};

/// Raw categorical rows as supplied by the user, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl InputTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Parses CSV text with a header row. Rows whose length differs from the
    /// header are rejected by the reader.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The first `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One manually entered specimen.
///
/// Values can only be set to a feature's trained categories, so a manual row is
/// always encodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    values: Vec<(Feature, String)>,
}

impl ManualEntry {
    /// Starts every feature at its first trained category.
    pub fn first_options(
        schema: &FeatureSchema,
        encoders: &EncoderTable,
    ) -> Result<Self, EncodeError> {
        let values = schema
            .features()
            .iter()
            .map(|&feature| {
                encoders
                    .get(feature)?
                    .decode(0)
                    .map(|value| (feature, value.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn value(&self, feature: Feature) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, v)| v.as_str())
    }

    /// Selects a value for a feature, refusing anything outside its vocabulary.
    pub fn set(
        &mut self,
        feature: Feature,
        value: &str,
        encoders: &EncoderTable,
    ) -> Result<(), EncodeError> {
        encoders.encode(feature, value)?;
        let slot = self
            .values
            .iter_mut()
            .find(|(f, _)| *f == feature)
            .ok_or(EncodeError::MissingEncoder(feature))?;
        slot.1 = value.to_string();
        Ok(())
    }

    /// A single-row table with the schema's columns, in schema order.
    pub fn to_table(&self) -> InputTable {
        let columns = self
            .values
            .iter()
            .map(|(f, _)| f.column_name().to_string())
            .collect();
        let row = self.values.iter().map(|(_, v)| v.clone()).collect();
        InputTable::new(columns, vec![row])
    }
}
