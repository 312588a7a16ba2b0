use std::fmt;
use std::path::Path;

use csv::Writer;

use crate::input::InputTable;
use crate::pipeline::RequestError;

/// Header of the column appended to exported results.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Suggested file name for the results download.
pub const DOWNLOAD_FILE_NAME: &str = "mushroom_predictions.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prediction {
    Edible,
    Poisonous,
}

impl Prediction {
    /// Maps a binary classifier label; anything but 0 or 1 has no meaning here.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Self::Edible),
            1 => Some(Self::Poisonous),
            _ => None,
        }
    }

    pub fn label(self) -> i64 {
        match self {
            Self::Edible => 0,
            Self::Poisonous => 1,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Edible => "🟢 Edible",
            Self::Poisonous => "🔴 Poisonous",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Counts and shares per class for one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub edible: usize,
    pub poisonous: usize,
    pub pct_edible: f64,
    pub pct_poisonous: f64,
}

impl Summary {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let total = predictions.len();
        let edible = predictions
            .iter()
            .filter(|p| **p == Prediction::Edible)
            .count();
        let poisonous = total - edible;
        Self {
            total,
            edible,
            poisonous,
            pct_edible: percentage(edible, total),
            pct_poisonous: percentage(poisonous, total),
        }
    }

    /// e.g. `"60 (60.0%)"`
    pub fn edible_display(&self) -> String {
        format!("{} ({}%)", self.edible, format_pct(self.pct_edible))
    }

    pub fn poisonous_display(&self) -> String {
        format!("{} ({}%)", self.poisonous, format_pct(self.pct_poisonous))
    }
}

/// `100 * count / total`, rounded to two decimals. Zero for an empty batch.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Whole percentages keep one decimal place.
fn format_pct(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{pct:.1}")
    } else {
        format!("{pct}")
    }
}

/// The outcome of a successful request: the rows as uploaded, one prediction each.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    input: InputTable,
    predictions: Vec<Prediction>,
    summary: Summary,
}

impl PredictionReport {
    pub fn new(input: InputTable, predictions: Vec<Prediction>) -> Self {
        let summary = Summary::from_predictions(&predictions);
        Self {
            input,
            predictions,
            summary,
        }
    }

    pub fn input(&self) -> &InputTable {
        &self.input
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Input columns in their original order plus `Prediction`, raw values kept.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, RequestError> {
        let mut wtr = Writer::from_writer(Vec::new());
        let mut header: Vec<&str> = self.input.columns().iter().map(String::as_str).collect();
        header.push(PREDICTION_COLUMN);
        wtr.write_record(&header)?;
        for (row, prediction) in self.input.rows().iter().zip(&self.predictions) {
            let mut record: Vec<&str> = row.iter().map(String::as_str).collect();
            record.push(prediction.tag());
            wtr.write_record(&record)?;
        }
        wtr.into_inner().map_err(|e| RequestError::Io(e.into_error()))
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), RequestError> {
        std::fs::write(path, self.to_csv_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(edible: usize, poisonous: usize) -> Vec<Prediction> {
        let mut out = vec![Prediction::Edible; edible];
        out.extend(vec![Prediction::Poisonous; poisonous]);
        out
    }

    #[test]
    fn labels_map_to_tags() {
        assert_eq!(Prediction::from_label(0).map(Prediction::tag), Some("🟢 Edible"));
        assert_eq!(Prediction::from_label(1).map(Prediction::tag), Some("🔴 Poisonous"));
        assert_eq!(Prediction::from_label(2), None);
        assert_eq!(Prediction::Poisonous.label(), 1);
    }

    #[test]
    fn summary_counts_and_rounds() {
        let summary = Summary::from_predictions(&batch(60, 40));
        assert_eq!(summary.total, 100);
        assert_eq!(summary.edible_display(), "60 (60.0%)");
        assert_eq!(summary.poisonous_display(), "40 (40.0%)");

        let summary = Summary::from_predictions(&batch(1, 2));
        assert_eq!(summary.pct_edible, 33.33);
        assert_eq!(summary.pct_poisonous, 66.67);
        assert_eq!(summary.edible_display(), "1 (33.33%)");
    }

    #[test]
    fn shares_always_sum_to_one_hundred() {
        for total in 1..60 {
            for edible in 0..=total {
                let summary = Summary::from_predictions(&batch(edible, total - edible));
                assert_eq!(summary.edible + summary.poisonous, summary.total);
                assert!((summary.pct_edible + summary.pct_poisonous - 100.0).abs() <= 0.01 + 1e-9);
            }
        }
    }

    #[test]
    fn csv_keeps_original_columns_and_appends_prediction() {
        let input = InputTable::new(
            vec!["odor".into(), "habitat".into()],
            vec![vec!["n".into(), "d".into()], vec!["f".into(), "g".into()]],
        );
        let report = PredictionReport::new(input, batch(1, 1));
        let text = String::from_utf8(report.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            "odor,habitat,Prediction\nn,d,🟢 Edible\nf,g,🔴 Poisonous\n"
        );
    }
}
