//! Edible/poisonous mushroom classification from categorical field observations.
//!
//! A [`ModelBundle`] holds the three fitted artifacts: the ordered feature schema,
//! one label encoder per feature, and the classifier. It is loaded once and shared
//! read-only; every prediction request runs through a [`Predictor`].
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use mushroom_classifier::{InputTable, ModelBundle, Predictor};
//!
//! let bundle = Arc::new(ModelBundle::load("assets/model_with_encoders.json")?);
//! let predictor = Predictor::new(bundle);
//!
//! let table = InputTable::from_csv_path("specimens.csv")?;
//! let report = predictor.predict(Some(&table))?;
//! println!("{} of {} look edible", report.summary().edible, report.summary().total);
//! std::fs::write("mushroom_predictions.csv", report.to_csv_bytes()?)?;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod features;
pub mod input;
pub mod pipeline;
pub mod report;
mod runtime;
pub mod ui;

pub use bundle::{BundleError, BundleLoader, ModelBundle, ModelBundleBuilder};
pub use classifier::{Classifier, ClassifierError, ClassifierInfo, ModelSpec};
pub use encoder::{CategoricalEncoder, EncodeError, EncoderTable, LabelEncoder};
pub use features::{Feature, FeatureSchema};
pub use input::{InputTable, ManualEntry};
pub use pipeline::{Predictor, RequestError, RequestState};
pub use report::{Prediction, PredictionReport, Summary};
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
