use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use crate::bundle::ModelBundle;
use crate::encoder::EncodeError;
use crate::features::Feature;
use crate::input::{InputTable, ManualEntry};
use crate::pipeline::{validate_columns, Predictor, RequestError};
use crate::report::PredictionReport;

/// Rows shown in the upload preview.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Manual,
    Upload,
}

impl InputMode {
    pub const ALL: [InputMode; 2] = [InputMode::Manual, InputMode::Upload];

    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "Manual Entry",
            Self::Upload => "Upload CSV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub tone: StatusTone,
}

/// A parsed CSV upload and the result of checking its header.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub table: InputTable,
    pub schema_error: Option<RequestError>,
}

/// UI-independent state behind the form: current mode, manual selections, the
/// uploaded table and the latest request outcome.
///
/// Any change to the inputs discards the previous outcome; each predict action
/// starts a fresh request.
#[derive(Debug)]
pub struct FormController {
    predictor: Predictor,
    mode: InputMode,
    manual: ManualEntry,
    upload: Option<Upload>,
    outcome: Option<Result<PredictionReport, RequestError>>,
    status: Option<Status>,
}

impl FormController {
    pub fn new(bundle: Arc<ModelBundle>) -> Result<Self, EncodeError> {
        let manual = ManualEntry::first_options(bundle.schema(), bundle.encoders())?;
        Ok(Self {
            predictor: Predictor::new(bundle),
            mode: InputMode::default(),
            manual,
            upload: None,
            outcome: None,
            status: None,
        })
    }

    pub fn bundle(&self) -> &ModelBundle {
        self.predictor.bundle()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            self.mode = mode;
            self.reset_outcome();
        }
    }

    /// Features in schema order, one dropdown each.
    pub fn features(&self) -> Vec<Feature> {
        self.bundle().schema().features().to_vec()
    }

    pub fn options(&self, feature: Feature) -> &[String] {
        self.bundle().encoders().options(feature)
    }

    pub fn selected(&self, feature: Feature) -> Option<&str> {
        self.manual.value(feature)
    }

    pub fn select(&mut self, feature: Feature, value: &str) {
        let encoders = self.predictor.bundle().encoders();
        match self.manual.set(feature, value, encoders) {
            Ok(()) => self.reset_outcome(),
            Err(err) => self.set_status(err.to_string(), StatusTone::Error),
        }
    }

    pub fn load_upload_path(&mut self, path: &Path) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let parsed = InputTable::from_csv_path(path);
        self.accept_upload(file_name, parsed);
    }

    pub fn load_upload_reader<R: Read>(&mut self, file_name: &str, reader: R) {
        let parsed = InputTable::from_csv_reader(reader);
        self.accept_upload(file_name.to_string(), parsed);
    }

    fn accept_upload(&mut self, file_name: String, parsed: Result<InputTable, csv::Error>) {
        self.reset_outcome();
        match parsed {
            Ok(table) => {
                let schema_error = validate_columns(table.columns(), self.bundle().schema()).err();
                match &schema_error {
                    Some(err) => {
                        warn!("Upload {file_name} rejected: {err}");
                        self.set_status(
                            "⚠️ Uploaded file must contain exactly these columns:",
                            StatusTone::Error,
                        );
                    }
                    None => {
                        info!("Upload {file_name}: {} rows", table.len());
                        self.set_status(
                            format!("Loaded {} rows from {file_name}", table.len()),
                            StatusTone::Info,
                        );
                    }
                }
                self.upload = Some(Upload {
                    file_name,
                    table,
                    schema_error,
                });
            }
            Err(err) => {
                warn!("Upload {file_name} unreadable: {err}");
                self.upload = None;
                self.set_status(RequestError::from(err).to_string(), StatusTone::Error);
            }
        }
    }

    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.reset_outcome();
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// Rows of the current upload shown before predicting.
    pub fn preview(&self) -> Option<&[Vec<String>]> {
        self.upload.as_ref().map(|upload| upload.table.head(PREVIEW_ROWS))
    }

    /// False while an upload with the wrong columns is loaded.
    pub fn can_predict(&self) -> bool {
        match self.mode {
            InputMode::Manual => true,
            InputMode::Upload => self
                .upload
                .as_ref()
                .map_or(true, |upload| upload.schema_error.is_none()),
        }
    }

    /// The table the next predict request would run on, if any.
    pub fn current_input(&self) -> Option<InputTable> {
        match self.mode {
            InputMode::Manual => Some(self.manual.to_table()),
            InputMode::Upload => self.upload.as_ref().map(|upload| upload.table.clone()),
        }
    }

    pub fn predict(&mut self) {
        let input = self.current_input();
        let outcome = self.predictor.predict(input.as_ref());
        match &outcome {
            Ok(_) => self.set_status("🎯 Prediction Results", StatusTone::Success),
            Err(RequestError::MissingInput) => {
                self.set_status(RequestError::MissingInput.to_string(), StatusTone::Warning)
            }
            Err(err) => self.set_status(err.to_string(), StatusTone::Error),
        }
        self.outcome = Some(outcome);
    }

    pub fn outcome(&self) -> Option<&Result<PredictionReport, RequestError>> {
        self.outcome.as_ref()
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().ok())
    }

    /// Writes the latest results as CSV.
    pub fn save_report(&mut self, path: &Path) -> Result<(), RequestError> {
        let Some(report) = self.report() else {
            return Err(RequestError::MissingInput);
        };
        let result = report.save_csv(path);
        match &result {
            Ok(()) => {
                info!("Saved predictions to {}", path.display());
                self.set_status(format!("Saved results to {}", path.display()), StatusTone::Info);
            }
            Err(err) => self.set_status(err.to_string(), StatusTone::Error),
        }
        result
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = Some(Status {
            text: text.into(),
            tone,
        });
    }

    fn reset_outcome(&mut self) {
        self.outcome = None;
        self.status = None;
    }
}
