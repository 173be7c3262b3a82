#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Categorical encoding and feature-vector assembly.
//!
//! Turns an [`IncidentInput`] into the six-column [`FeatureVector`] the
//! classifier expects. The two categorical fields are resolved against the
//! embedded [`CategoryTable`]s in [`registry`]; lookups are exact string
//! matches and an unknown name is an error, never a default code.

pub mod registry;
pub mod table;

use arrest_predictor_incident_models::{
    FeatureColumn, FeatureVector, IncidentFeatures, IncidentInput,
};
use thiserror::Error;

pub use registry::{all_tables, community_area_table, ward_table};
pub use table::{CategoryTable, CategoryTableError};

/// A category name that is not present in its lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {label} '{name}'")]
pub struct UnknownCategoryError {
    /// Identifier of the table that was searched.
    pub table: String,
    /// Human-readable label of that table.
    pub label: String,
    /// The name that was not found.
    pub name: String,
}

/// Resolves `name` to its code in `table`.
///
/// # Errors
///
/// Returns [`UnknownCategoryError`] if `name` is not an exact entry of
/// `table`.
pub fn encode_category(table: &CategoryTable, name: &str) -> Result<u32, UnknownCategoryError> {
    table.code_for(name).ok_or_else(|| {
        log::warn!("Rejected unknown {} '{name}'", table.id());
        UnknownCategoryError {
            table: table.id().to_string(),
            label: table.label().to_string(),
            name: name.to_string(),
        }
    })
}

/// Encodes both categorical fields of `input`, ward first.
///
/// Numeric fields are copied through unchanged; range checks are the
/// caller's concern.
///
/// # Errors
///
/// Returns [`UnknownCategoryError`] for the first categorical field whose
/// name is not in its table.
pub fn encode_incident(input: &IncidentInput) -> Result<IncidentFeatures, UnknownCategoryError> {
    let ward_code = encode_category(ward_table(), &input.ward)?;
    let community_area_code = encode_category(community_area_table(), &input.community_area)?;

    Ok(IncidentFeatures {
        year: input.year,
        month: input.month,
        hour: input.hour,
        district: input.district,
        ward_code,
        community_area_code,
    })
}

/// Lays out `features` in `[Year, Month, Hour, District, Ward, CommunityArea]`
/// order.
#[must_use]
pub fn build_feature_vector(features: &IncidentFeatures) -> FeatureVector {
    FeatureVector::new(FeatureColumn::all().map(|column| features.value(column)))
}

#[cfg(test)]
mod tests {
    use arrest_predictor_incident_models::FEATURE_COUNT;

    use super::*;

    fn input(ward: &str, community_area: &str) -> IncidentInput {
        IncidentInput {
            year: 2023,
            month: 6,
            hour: 14,
            district: 5,
            ward: ward.to_string(),
            community_area: community_area.to_string(),
        }
    }

    #[test]
    fn encodes_known_category() {
        assert_eq!(encode_category(ward_table(), "NARCOTICS"), Ok(2));
        assert_eq!(encode_category(community_area_table(), "ALLEY"), Ok(6));
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = encode_category(community_area_table(), "NOT_IN_LIST").unwrap_err();
        assert_eq!(err.table, "community_area");
        assert_eq!(err.name, "NOT_IN_LIST");
        assert_eq!(err.to_string(), "Unknown Community Area 'NOT_IN_LIST'");
    }

    #[test]
    fn lookup_does_not_normalize() {
        assert!(encode_category(ward_table(), "narcotics").is_err());
        assert!(encode_category(ward_table(), "NARCOTICS ").is_err());
        assert!(encode_category(ward_table(), "").is_err());
    }

    #[test]
    fn tables_are_not_interchangeable() {
        assert!(encode_category(ward_table(), "STREET").is_err());
        assert!(encode_category(community_area_table(), "NARCOTICS").is_err());
    }

    #[test]
    fn encodes_reference_incident() {
        let features = encode_incident(&input("NARCOTICS", "STREET")).unwrap();
        assert_eq!(features.ward_code, 2);
        assert_eq!(features.community_area_code, 0);

        let vector = build_feature_vector(&features);
        assert_eq!(
            vector.as_slice(),
            &[2023.0, 6.0, 14.0, 5.0, 2.0, 0.0][..]
        );
    }

    #[test]
    fn unknown_community_area_fails_encoding() {
        let err = encode_incident(&input("NARCOTICS", "NOT_IN_LIST")).unwrap_err();
        assert_eq!(err.table, "community_area");
    }

    #[test]
    fn ward_is_checked_first() {
        let err = encode_incident(&input("NOPE", "ALSO_NOPE")).unwrap_err();
        assert_eq!(err.table, "ward");
        assert_eq!(err.name, "NOPE");
    }

    #[test]
    fn vector_shape_is_fixed_for_every_category_pair() {
        for ward in ward_table().names() {
            for area in community_area_table().names() {
                let features = encode_incident(&input(ward, area)).unwrap();
                let vector = build_feature_vector(&features);
                assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
                assert!(
                    (vector.get(FeatureColumn::Ward) - f64::from(features.ward_code)).abs()
                        < f64::EPSILON
                );
                assert!(
                    (vector.get(FeatureColumn::CommunityArea)
                        - f64::from(features.community_area_code))
                    .abs()
                        < f64::EPSILON
                );
                assert!((vector.get(FeatureColumn::Year) - 2023.0).abs() < f64::EPSILON);
            }
        }
    }
}
