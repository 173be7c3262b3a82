#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the arrest predictor.
//!
//! Hosts the config file loader, the `dialoguer` input form used when the
//! binary runs without a subcommand, and the plain-text renderers shared by
//! both modes.

pub mod config;
pub mod interactive;

use std::fmt::Write as _;
use std::path::Path;

use arrest_predictor::{
    ArrestClassifier, ArrestPredictor, CategoryTable, ErrorReport, IncidentInput, ModelLoadError,
    RandomForest,
};

/// Loads the forest at `path` and wraps it in a predictor.
///
/// # Errors
///
/// Returns an error if the model file cannot be read or is invalid.
pub fn load_predictor(path: &Path) -> Result<ArrestPredictor<RandomForest>, ModelLoadError> {
    RandomForest::load(path).map(ArrestPredictor::new)
}

/// A prediction rendered for display, plain text or JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrediction {
    /// Text to print.
    pub text: String,
    /// Whether the request failed. The binary exits with status 1 when set.
    pub is_error: bool,
}

/// Checks `input` against the form bounds, scores it, and renders the
/// outcome.
///
/// Out-of-range numeric fields are reported with the `out_of_bounds` kind
/// without calling the predictor.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render_prediction<M: ArrestClassifier>(
    predictor: &ArrestPredictor<M>,
    input: &IncidentInput,
    json: bool,
) -> Result<RenderedPrediction, serde_json::Error> {
    let report = match input.check_bounds() {
        Err(e) => {
            log::warn!("Rejected input: {e}");
            ErrorReport {
                kind: "out_of_bounds",
                message: e.to_string(),
            }
        }
        Ok(()) => match predictor.predict(input) {
            Ok(result) => {
                let text = if json {
                    serde_json::to_string_pretty(&result)?
                } else {
                    result.to_string()
                };
                return Ok(RenderedPrediction {
                    text,
                    is_error: false,
                });
            }
            Err(e) => ErrorReport::from(&e),
        },
    };

    let text = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.message
    };
    Ok(RenderedPrediction {
        text,
        is_error: true,
    })
}

/// Renders a category table as a `CODE  NAME` listing with a header line.
#[must_use]
pub fn format_table(table: &CategoryTable) -> String {
    let mut out = format!("{} (v{})\n", table.label(), table.version());
    let _ = writeln!(out, "{:<6} NAME", "CODE");
    let _ = writeln!(out, "{}", "-".repeat(50));
    for (code, name) in table.entries() {
        let _ = writeln!(out, "{code:<6} {name}");
    }
    out
}

/// Renders a one-screen summary of a loaded forest.
#[must_use]
pub fn format_model_summary(path: &Path, forest: &RandomForest) -> String {
    format!(
        "Model:    {}\nVersion:  {}\nFeatures: {}\nTrees:    {}\nNodes:    {}\n",
        path.display(),
        forest.version(),
        forest.n_features(),
        forest.tree_count(),
        forest.node_count()
    )
}
