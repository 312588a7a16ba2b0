use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the 22 categorical mushroom attributes the classifier was trained on.
///
/// The column name is the CSV header spelling (`"cap-shape"`), the label is the
/// form caption (`"Cap Shape"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    CapShape,
    CapSurface,
    CapColor,
    Bruises,
    Odor,
    GillAttachment,
    GillSpacing,
    GillSize,
    GillColor,
    StalkShape,
    StalkRoot,
    StalkSurfaceAboveRing,
    StalkSurfaceBelowRing,
    StalkColorAboveRing,
    StalkColorBelowRing,
    VeilType,
    VeilColor,
    RingNumber,
    RingType,
    SporePrintColor,
    Population,
    Habitat,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature column '{0}'")]
pub struct UnknownFeature(pub String);

impl Feature {
    /// Every feature, in the canonical training layout.
    pub const ALL: [Feature; 22] = [
        Feature::CapShape,
        Feature::CapSurface,
        Feature::CapColor,
        Feature::Bruises,
        Feature::Odor,
        Feature::GillAttachment,
        Feature::GillSpacing,
        Feature::GillSize,
        Feature::GillColor,
        Feature::StalkShape,
        Feature::StalkRoot,
        Feature::StalkSurfaceAboveRing,
        Feature::StalkSurfaceBelowRing,
        Feature::StalkColorAboveRing,
        Feature::StalkColorBelowRing,
        Feature::VeilType,
        Feature::VeilColor,
        Feature::RingNumber,
        Feature::RingType,
        Feature::SporePrintColor,
        Feature::Population,
        Feature::Habitat,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Self::CapShape => "cap-shape",
            Self::CapSurface => "cap-surface",
            Self::CapColor => "cap-color",
            Self::Bruises => "bruises",
            Self::Odor => "odor",
            Self::GillAttachment => "gill-attachment",
            Self::GillSpacing => "gill-spacing",
            Self::GillSize => "gill-size",
            Self::GillColor => "gill-color",
            Self::StalkShape => "stalk-shape",
            Self::StalkRoot => "stalk-root",
            Self::StalkSurfaceAboveRing => "stalk-surface-above-ring",
            Self::StalkSurfaceBelowRing => "stalk-surface-below-ring",
            Self::StalkColorAboveRing => "stalk-color-above-ring",
            Self::StalkColorBelowRing => "stalk-color-below-ring",
            Self::VeilType => "veil-type",
            Self::VeilColor => "veil-color",
            Self::RingNumber => "ring-number",
            Self::RingType => "ring-type",
            Self::SporePrintColor => "spore-print-color",
            Self::Population => "population",
            Self::Habitat => "habitat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CapShape => "Cap Shape",
            Self::CapSurface => "Cap Surface",
            Self::CapColor => "Cap Color",
            Self::Bruises => "Bruises",
            Self::Odor => "Odor",
            Self::GillAttachment => "Gill Attachment",
            Self::GillSpacing => "Gill Spacing",
            Self::GillSize => "Gill Size",
            Self::GillColor => "Gill Color",
            Self::StalkShape => "Stalk Shape",
            Self::StalkRoot => "Stalk Root",
            Self::StalkSurfaceAboveRing => "Stalk Surface Above Ring",
            Self::StalkSurfaceBelowRing => "Stalk Surface Below Ring",
            Self::StalkColorAboveRing => "Stalk Color Above Ring",
            Self::StalkColorBelowRing => "Stalk Color Below Ring",
            Self::VeilType => "Veil Type",
            Self::VeilColor => "Veil Color",
            Self::RingNumber => "Ring Number",
            Self::RingType => "Ring Type",
            Self::SporePrintColor => "Spore Print Color",
            Self::Population => "Population",
            Self::Habitat => "Habitat",
        }
    }
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.column_name() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Unknown(#[from] UnknownFeature),
    #[error("feature column '{0}' is listed more than once")]
    Duplicate(Feature),
    #[error("feature column '{0}' is missing from the schema")]
    Missing(Feature),
}

/// The ordered list of columns the classifier expects.
///
/// Always holds every [`Feature`] exactly once; the order is the one the model was
/// fitted with and may differ from [`Feature::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    pub fn new(features: Vec<Feature>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(features.len());
        for &feature in &features {
            if !seen.insert(feature) {
                return Err(SchemaError::Duplicate(feature));
            }
        }
        if let Some(missing) = Feature::ALL.iter().find(|f| !seen.contains(*f)) {
            return Err(SchemaError::Missing(*missing));
        }
        Ok(Self { features })
    }

    /// Parses the column names stored in a bundle.
    pub fn from_column_names<S: AsRef<str>>(columns: &[S]) -> Result<Self, SchemaError> {
        let features = columns
            .iter()
            .map(|name| name.as_ref().parse::<Feature>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(features)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.column_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            features: Feature::ALL.to_vec(),
        }
    }
}
