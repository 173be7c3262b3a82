#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary classifier abstraction and single-row prediction.
//!
//! A trained model is consumed through the [`ArrestClassifier`] trait: one
//! ordered row in, a class label and a `[negative, positive]` probability
//! pair out. [`predict`] wraps a model call so that any failure, including a
//! panic inside the model, comes back as a [`PredictionError`] carrying only
//! the cause's description.
//!
//! [`forest::RandomForest`] is the concrete model shipped with the CLI.

pub mod forest;

use std::panic::{AssertUnwindSafe, catch_unwind};

use arrest_predictor_incident_models::{FeatureVector, PredictionResult};
use thiserror::Error;

/// Error type models return from a failed call.
pub type ClassifierFault = Box<dyn std::error::Error + Send + Sync>;

/// A trained binary classifier that scores one row at a time.
///
/// Class `0` is "no arrest" and class `1` is "arrest".
pub trait ArrestClassifier {
    /// Returns the predicted class (`0` or `1`) for `row`.
    ///
    /// # Errors
    ///
    /// Returns a fault if the model cannot score `row`.
    fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierFault>;

    /// Returns `[P(class 0), P(class 1)]` for `row`.
    ///
    /// # Errors
    ///
    /// Returns a fault if the model cannot score `row`.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierFault>;
}

impl<T: ArrestClassifier + ?Sized> ArrestClassifier for Box<T> {
    fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierFault> {
        (**self).predict_label(row)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
        (**self).predict_proba(row)
    }
}

/// A model call that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error making prediction: {message}")]
pub struct PredictionError {
    /// Description of the underlying cause.
    pub message: String,
}

impl PredictionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Scores one feature vector with `model`.
///
/// The model is called exactly once for the label and once for the
/// probabilities. Nothing is retried.
///
/// # Errors
///
/// Returns [`PredictionError`] if the model returns a fault, panics, returns
/// a label other than `0`/`1`, or returns a positive-class probability that
/// is not a finite value in `[0, 1]`.
pub fn predict<M: ArrestClassifier + ?Sized>(
    features: &FeatureVector,
    model: &M,
) -> Result<PredictionResult, PredictionError> {
    let row = features.as_slice();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let label = model.predict_label(row)?;
        let proba = model.predict_proba(row)?;
        Ok::<_, ClassifierFault>((label, proba))
    }));

    let (label, proba) = match outcome {
        Ok(Ok(scored)) => scored,
        Ok(Err(fault)) => {
            log::error!("Model failed on {features}: {fault}");
            return Err(PredictionError::new(fault.to_string()));
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            log::error!("Model panicked on {features}: {message}");
            return Err(PredictionError::new(format!("model panicked: {message}")));
        }
    };

    let arrest_likely = match label {
        0 => false,
        1 => true,
        other => {
            return Err(PredictionError::new(format!(
                "model returned unknown class label {other}"
            )));
        }
    };

    let probability = proba[1];
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(PredictionError::new(format!(
            "model returned invalid probability {probability}"
        )));
    }

    log::debug!("Scored {features}: label={label} proba={proba:?}");

    Ok(PredictionResult {
        arrest_likely,
        probability,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FixedModel {
        label: u8,
        proba: [f64; 2],
    }

    impl ArrestClassifier for FixedModel {
        fn predict_label(&self, _row: &[f64]) -> Result<u8, ClassifierFault> {
            Ok(self.label)
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
            Ok(self.proba)
        }
    }

    struct FailingModel;

    impl ArrestClassifier for FailingModel {
        fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierFault> {
            Err(format!("expected 7 features, got {}", row.len()).into())
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
            Err("unreachable".into())
        }
    }

    struct PanickingModel;

    impl ArrestClassifier for PanickingModel {
        fn predict_label(&self, _row: &[f64]) -> Result<u8, ClassifierFault> {
            panic!("model not fitted");
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
            Ok([0.5, 0.5])
        }
    }

    struct RecordingModel {
        seen: Cell<Option<Vec<f64>>>,
    }

    impl ArrestClassifier for RecordingModel {
        fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierFault> {
            self.seen.set(Some(row.to_vec()));
            Ok(0)
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
            Ok([0.9, 0.1])
        }
    }

    fn vector() -> FeatureVector {
        FeatureVector::new([2023.0, 6.0, 14.0, 5.0, 2.0, 0.0])
    }

    #[test]
    fn positive_label_and_probability_pass_through() {
        let model = FixedModel {
            label: 1,
            proba: [0.27, 0.73],
        };
        let result = predict(&vector(), &model).unwrap();
        assert!(result.arrest_likely);
        assert!((result.probability - 0.73).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_label_keeps_positive_class_probability() {
        let model = FixedModel {
            label: 0,
            proba: [0.6, 0.4],
        };
        let result = predict(&vector(), &model).unwrap();
        assert!(!result.arrest_likely);
        assert!((result.probability - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn model_fault_becomes_prediction_error() {
        let err = predict(&vector(), &FailingModel).unwrap_err();
        assert_eq!(err.message, "expected 7 features, got 6");
        assert_eq!(
            err.to_string(),
            "Error making prediction: expected 7 features, got 6"
        );
    }

    #[test]
    fn model_panic_becomes_prediction_error() {
        let err = predict(&vector(), &PanickingModel).unwrap_err();
        assert_eq!(err.message, "model panicked: model not fitted");
    }

    #[test]
    fn rejects_unknown_label() {
        let model = FixedModel {
            label: 2,
            proba: [0.5, 0.5],
        };
        assert!(predict(&vector(), &model).is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        for bad in [f64::NAN, -0.1, 1.5, f64::INFINITY] {
            let model = FixedModel {
                label: 1,
                proba: [0.0, bad],
            };
            assert!(predict(&vector(), &model).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn model_sees_row_in_column_order() {
        let model = RecordingModel {
            seen: Cell::new(None),
        };
        predict(&vector(), &model).unwrap();
        assert_eq!(
            model.seen.take().unwrap(),
            vec![2023.0, 6.0, 14.0, 5.0, 2.0, 0.0]
        );
    }

    #[test]
    fn boxed_models_are_classifiers() {
        let model: Box<dyn ArrestClassifier> = Box::new(FixedModel {
            label: 1,
            proba: [0.1, 0.9],
        });
        assert!(predict(&vector(), &model).unwrap().arrest_likely);
    }
}
