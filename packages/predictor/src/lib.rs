#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Encoder/predictor adapter.
//!
//! [`ArrestPredictor`] is the single entry point a front end calls: it
//! encodes an [`IncidentInput`], lays out the feature vector, and scores it
//! with the loaded model. Every outcome is either a [`PredictionResult`] or
//! a [`PredictorError`] with a message suitable for display.

pub use arrest_predictor_classifier::{
    ArrestClassifier, ClassifierFault, PredictionError,
    forest::{ModelLoadError, RandomForest},
};
pub use arrest_predictor_encoding::{CategoryTable, UnknownCategoryError};
pub use arrest_predictor_incident_models::{
    FeatureVector, IncidentFeatures, IncidentInput, PredictionResult,
};

use arrest_predictor_encoding::{
    build_feature_vector, community_area_table, encode_incident, ward_table,
};
use serde::Serialize;
use thiserror::Error;

/// Why a prediction request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictorError {
    /// A categorical field named an entry missing from its table. The model
    /// was not called.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    /// The model call failed.
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl PredictorError {
    /// Short tag identifying the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "unknown_category",
            Self::Prediction(_) => "prediction",
        }
    }
}

/// JSON-friendly view of a [`PredictorError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Error kind tag.
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl From<&PredictorError> for ErrorReport {
    fn from(err: &PredictorError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Owns a loaded model and answers prediction requests against it.
pub struct ArrestPredictor<M> {
    model: M,
}

impl<M: ArrestClassifier> ArrestPredictor<M> {
    /// Wraps a loaded model.
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self { model }
    }

    /// The wrapped model.
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Encodes `input` and scores it.
    ///
    /// Numeric fields are not range-checked here; constraining them is the
    /// front end's job.
    ///
    /// # Errors
    ///
    /// Returns [`PredictorError::UnknownCategory`] before touching the model
    /// if either categorical field is not in its table, or
    /// [`PredictorError::Prediction`] if the model call fails.
    pub fn predict(&self, input: &IncidentInput) -> Result<PredictionResult, PredictorError> {
        let features = encode_incident(input)?;
        let vector = build_feature_vector(&features);
        log::debug!("Encoded {input:?} as {vector}");

        let result = arrest_predictor_classifier::predict(&vector, &self.model)?;
        log::info!("{result}");
        Ok(result)
    }
}

/// Entries of the "Ward" dropdown, in code order.
#[must_use]
pub fn ward_options() -> &'static [String] {
    ward_table().names()
}

/// Entries of the "Community Area" dropdown, in code order.
#[must_use]
pub fn community_area_options() -> &'static [String] {
    community_area_table().names()
}
