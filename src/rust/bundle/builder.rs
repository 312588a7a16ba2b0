use std::path::PathBuf;

use log::info;

use super::{BundleError, BundleFile, ModelBundle};
use crate::classifier::{Classifier, ModelSpec};
use crate::encoder::{EncoderTable, LabelEncoder};
use crate::features::{Feature, FeatureSchema};
use crate::runtime::RuntimeConfig;

/// A builder for constructing a ModelBundle with a fluent interface.
///
/// Applies the same validation as loading a bundle file, so tests and embedders can
/// assemble bundles in code.
#[derive(Default, Debug)]
pub struct ModelBundleBuilder {
    source: Option<PathBuf>,
    base_dir: PathBuf,
    schema: Option<FeatureSchema>,
    encoders: EncoderTable,
    model: Option<ModelSpec>,
    runtime_config: RuntimeConfig,
}

impl ModelBundleBuilder {
    /// Creates a new empty ModelBundleBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from a parsed bundle file.
    pub fn from_file(file: BundleFile) -> Result<Self, BundleError> {
        let mut builder = Self::new()
            .with_feature_columns(&file.feature_columns)?
            .with_model(file.model);
        for (column, encoder) in file.label_encoders {
            builder = builder.add_encoder(&column, encoder)?;
        }
        Ok(builder)
    }

    /// Sets the runtime configuration used if the model is an ONNX export
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Records where the bundle came from; relative model paths resolve against its directory.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.base_dir = path
            .parent()
            .map(|dir| dir.to_path_buf())
            .unwrap_or_default();
        self.source = Some(path);
        self
    }

    /// Sets the ordered feature columns from their names
    ///
    /// # Returns
    /// * `Result<Self, BundleError>` - fails if a name is unknown or repeated, or a feature
    ///   is missing
    pub fn with_feature_columns<S: AsRef<str>>(
        mut self,
        columns: &[S],
    ) -> Result<Self, BundleError> {
        self.schema = Some(FeatureSchema::from_column_names(columns)?);
        Ok(self)
    }

    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Adds the fitted encoder for one column
    ///
    /// # Returns
    /// * `Result<Self, BundleError>` - fails if the column is unknown or already has an encoder
    pub fn add_encoder(mut self, column: &str, encoder: LabelEncoder) -> Result<Self, BundleError> {
        let feature: Feature = column
            .parse()
            .map_err(|_| BundleError::UnknownEncoderColumn(column.to_string()))?;
        if self.encoders.contains(feature) {
            return Err(BundleError::DuplicateEncoder(feature));
        }
        self.encoders.insert(feature, encoder);
        Ok(self)
    }

    /// Adds an encoder from its ordered class list
    pub fn add_classes<S: Into<String>>(
        self,
        column: &str,
        classes: Vec<S>,
    ) -> Result<Self, BundleError> {
        let encoder = LabelEncoder::new(classes.into_iter().map(Into::into).collect()).map_err(
            |source| BundleError::InvalidEncoder {
                column: column.to_string(),
                source,
            },
        )?;
        self.add_encoder(column, encoder)
    }

    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = Some(model);
        self
    }

    /// Builds and returns the final ModelBundle instance
    ///
    /// # Returns
    /// * `Result<ModelBundle, BundleError>` - fails if:
    ///   - No feature schema or model was set
    ///   - A schema column has no encoder
    ///   - The classifier cannot be constructed for the schema's width
    pub fn build(self) -> Result<ModelBundle, BundleError> {
        let schema = self.schema.ok_or(BundleError::Incomplete("feature columns"))?;
        let model = self.model.ok_or(BundleError::Incomplete("model"))?;

        if let Some(missing) = schema
            .features()
            .iter()
            .find(|feature| !self.encoders.contains(**feature))
        {
            return Err(BundleError::MissingEncoder(*missing));
        }

        let classifier =
            Classifier::from_spec(model, &self.base_dir, schema.len(), &self.runtime_config)?;
        let info = classifier.info();
        info!(
            "Bundle ready: {} features, {} encoders, {} classifier",
            schema.len(),
            self.encoders.len(),
            info.kind
        );

        Ok(ModelBundle {
            source: self.source,
            schema,
            encoders: self.encoders,
            classifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{DecisionTree, TreeEnsemble};

    fn constant_model() -> ModelSpec {
        ModelSpec::TreeEnsemble(TreeEnsemble {
            classes: vec![0, 1],
            n_features: 22,
            trees: vec![DecisionTree {
                children_left: vec![-1],
                children_right: vec![-1],
                feature: vec![-2],
                threshold: vec![-2.0],
                value: vec![vec![1.0, 0.0]],
            }],
        })
    }

    fn with_all_encoders(mut builder: ModelBundleBuilder) -> ModelBundleBuilder {
        for feature in Feature::ALL {
            builder = builder
                .add_classes(feature.column_name(), vec!["a", "b"])
                .unwrap();
        }
        builder
    }

    #[test]
    fn builds_complete_bundle() {
        let bundle = with_all_encoders(ModelBundle::builder())
            .with_schema(FeatureSchema::default())
            .with_model(constant_model())
            .build()
            .unwrap();
        assert_eq!(bundle.schema().len(), 22);
        assert_eq!(bundle.encoders().options(Feature::Odor).len(), 2);
        assert!(bundle.source().is_none());
    }

    #[test]
    fn missing_pieces_are_reported() {
        let result = with_all_encoders(ModelBundle::builder())
            .with_model(constant_model())
            .build();
        assert!(matches!(result, Err(BundleError::Incomplete("feature columns"))));

        let result = ModelBundle::builder()
            .with_schema(FeatureSchema::default())
            .add_classes("odor", vec!["a"])
            .unwrap()
            .with_model(constant_model())
            .build();
        assert!(matches!(result, Err(BundleError::MissingEncoder(Feature::CapShape))));
    }

    #[test]
    fn encoder_columns_are_checked() {
        assert!(matches!(
            ModelBundle::builder().add_classes("smell", vec!["a"]),
            Err(BundleError::UnknownEncoderColumn(_))
        ));
        assert!(matches!(
            ModelBundle::builder()
                .add_classes("odor", vec!["a"])
                .and_then(|b| b.add_classes("odor", vec!["b"])),
            Err(BundleError::DuplicateEncoder(Feature::Odor))
        ));
        assert!(matches!(
            ModelBundle::builder().add_classes("odor", Vec::<String>::new()),
            Err(BundleError::InvalidEncoder { .. })
        ));
    }

    #[test]
    fn source_sets_base_dir() {
        let builder = ModelBundle::builder().with_source("/srv/models/bundle.json");
        assert_eq!(builder.base_dir, PathBuf::from("/srv/models"));
    }
}
