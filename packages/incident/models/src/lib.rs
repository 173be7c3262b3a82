#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident feature records and prediction result types.
//!
//! This crate defines the shapes that flow through the arrest predictor:
//! the raw [`IncidentInput`] a front end submits, the encoded
//! [`IncidentFeatures`] record, the ordered [`FeatureVector`] handed to the
//! classifier, and the [`PredictionResult`] that comes back.
//!
//! The column order in [`FeatureColumn::all()`] is the order the model was
//! trained with. Models have no column-name binding at inference time, so
//! changing that order silently breaks every persisted model.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of columns in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 6;

/// One column of the model's input row, in training order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FeatureColumn {
    /// Calendar year of the incident.
    Year,
    /// Calendar month (1-12).
    Month,
    /// Hour of day (0-23).
    Hour,
    /// Police district number.
    District,
    /// Encoded offense type.
    Ward,
    /// Encoded location description.
    #[serde(rename = "Community Area")]
    #[strum(serialize = "Community Area")]
    CommunityArea,
}

impl FeatureColumn {
    /// Position of this column within a [`FeatureVector`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns all columns in training order.
    #[must_use]
    pub const fn all() -> &'static [Self; FEATURE_COUNT] {
        &[
            Self::Year,
            Self::Month,
            Self::Hour,
            Self::District,
            Self::Ward,
            Self::CommunityArea,
        ]
    }
}

/// Inclusive bounds and form default for one numeric input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    /// Field label as shown to the user.
    pub label: &'static str,
    /// Smallest accepted value.
    pub min: u16,
    /// Largest accepted value.
    pub max: u16,
    /// Value pre-filled in the input form.
    pub default: u16,
}

impl FieldBounds {
    /// Returns whether `value` lies within `min..=max`.
    #[must_use]
    pub const fn contains(&self, value: u16) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bounds for the incident year.
pub const YEAR_BOUNDS: FieldBounds = FieldBounds {
    label: "Year",
    min: 2001,
    max: 2024,
    default: 2024,
};

/// Bounds for the incident month.
pub const MONTH_BOUNDS: FieldBounds = FieldBounds {
    label: "Month",
    min: 1,
    max: 12,
    default: 1,
};

/// Bounds for the incident hour.
pub const HOUR_BOUNDS: FieldBounds = FieldBounds {
    label: "Hour",
    min: 0,
    max: 23,
    default: 0,
};

/// Bounds for the police district number.
pub const DISTRICT_BOUNDS: FieldBounds = FieldBounds {
    label: "District",
    min: 1,
    max: 25,
    default: 1,
};

/// Error returned by [`IncidentInput::check_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBoundsError {
    /// The bounds that were violated.
    pub bounds: FieldBounds,
    /// The rejected value.
    pub value: u16,
}

impl std::fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} out of range: expected {}-{}",
            self.bounds.label, self.value, self.bounds.min, self.bounds.max
        )
    }
}

impl std::error::Error for OutOfBoundsError {}

/// A prediction request as submitted by a front end, before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInput {
    /// Calendar year.
    pub year: u16,
    /// Calendar month (1-12).
    pub month: u8,
    /// Hour of day (0-23).
    pub hour: u8,
    /// Police district number (1-25).
    pub district: u8,
    /// Offense type name, one of the ward table's entries.
    pub ward: String,
    /// Location description, one of the community area table's entries.
    pub community_area: String,
}

impl IncidentInput {
    /// Checks the numeric fields against the form bounds.
    ///
    /// Encoding does not call this; it exists for front ends that need to
    /// constrain user input to the form ranges.
    ///
    /// # Errors
    ///
    /// Returns the first field whose value falls outside its bounds.
    pub fn check_bounds(&self) -> Result<(), OutOfBoundsError> {
        [
            (YEAR_BOUNDS, self.year),
            (MONTH_BOUNDS, u16::from(self.month)),
            (HOUR_BOUNDS, u16::from(self.hour)),
            (DISTRICT_BOUNDS, u16::from(self.district)),
        ]
        .into_iter()
        .find(|(bounds, value)| !bounds.contains(*value))
        .map_or(Ok(()), |(bounds, value)| {
            Err(OutOfBoundsError { bounds, value })
        })
    }
}

/// An incident with both categorical fields resolved to their codes.
///
/// Built fresh for each request and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFeatures {
    /// Calendar year.
    pub year: u16,
    /// Calendar month.
    pub month: u8,
    /// Hour of day.
    pub hour: u8,
    /// Police district number.
    pub district: u8,
    /// Position of the offense name in the ward table.
    pub ward_code: u32,
    /// Position of the location name in the community area table.
    pub community_area_code: u32,
}

impl IncidentFeatures {
    /// Returns the value of a single column.
    #[must_use]
    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::Year => f64::from(self.year),
            FeatureColumn::Month => f64::from(self.month),
            FeatureColumn::Hour => f64::from(self.hour),
            FeatureColumn::District => f64::from(self.district),
            FeatureColumn::Ward => f64::from(self.ward_code),
            FeatureColumn::CommunityArea => f64::from(self.community_area_code),
        }
    }
}

/// One model input row: exactly [`FEATURE_COUNT`] values in
/// [`FeatureColumn`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wraps an already-ordered row.
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Returns the value of a single column.
    #[must_use]
    pub const fn get(&self, column: FeatureColumn) -> f64 {
        self.0[column.index()]
    }

    /// Returns the row as a slice in column order.
    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of values in the row. Always [`FEATURE_COUNT`].
    #[must_use]
    pub const fn len(&self) -> usize {
        FEATURE_COUNT
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// The outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Whether the model's label is the positive (arrest) class.
    pub arrest_likely: bool,
    /// Model probability of the positive class, in `[0, 1]`.
    pub probability: f64,
}

impl std::fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.arrest_likely {
            "likely"
        } else {
            "unlikely"
        };
        write!(
            f,
            "Arrest is {verdict} with a probability of {:.2}",
            self.probability
        )
    }
}
