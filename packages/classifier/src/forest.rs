//! Random forest classifier loaded from JSON.
//!
//! # Model format
//!
//! ```json
//! {
//!   "version": 1,
//!   "n_features": 6,
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"kind": "split", "feature": 4, "threshold": 2.5, "left": 1, "right": 2},
//!         {"kind": "leaf", "counts": [10.0, 2.0]},
//!         {"kind": "leaf", "counts": [1.0, 9.0]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Traversal starts at node 0 and goes `left` when
//! `row[feature] <= threshold`. A leaf's `counts` are the per-class training
//! sample counts (or weights) that reached it. The forest's probabilities
//! are the mean of each tree's normalized leaf counts.

use std::path::Path;

use arrest_predictor_incident_models::FEATURE_COUNT;
use serde::Deserialize;
use thiserror::Error;

use crate::{ArrestClassifier, ClassifierFault};

/// Model format version this loader understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// Errors raised while loading a [`RandomForest`].
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The model file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The model file is not valid JSON for this format.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model parsed but is structurally unusable.
    #[error("Invalid model: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

impl ModelLoadError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// A node in a [`DecisionTree`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Internal node routing on one feature.
    Split {
        /// Column index into the input row.
        feature: usize,
        /// Values `<=` this go left.
        threshold: f64,
        /// Index of the left child.
        left: usize,
        /// Index of the right child.
        right: usize,
    },
    /// Terminal node.
    Leaf {
        /// `[class 0, class 1]` sample counts.
        counts: [f64; 2],
    },
}

/// One tree of a [`RandomForest`], stored as a flat node list rooted at
/// index 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Creates a tree from its node list. Validation happens when the tree
    /// is added to a [`RandomForest`].
    #[must_use]
    pub const fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Number of nodes in this tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelLoadError> {
        if self.nodes.is_empty() {
            return Err(ModelLoadError::invalid(format!("tree {tree} has no nodes")));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(ModelLoadError::invalid(format!(
                            "tree {tree} node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelLoadError::invalid(format!(
                            "tree {tree} node {i} has a NaN threshold"
                        )));
                    }
                    // Children must come after their parent, which rules out
                    // cycles and guarantees traversal terminates.
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelLoadError::invalid(format!(
                                "tree {tree} node {i} has invalid child index {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { counts } => {
                    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
                        return Err(ModelLoadError::invalid(format!(
                            "tree {tree} leaf {i} has invalid counts {counts:?}"
                        )));
                    }
                    let total = counts[0] + counts[1];
                    if total <= 0.0 {
                        return Err(ModelLoadError::invalid(format!(
                            "tree {tree} leaf {i} has no samples"
                        )));
                    }
                    if !total.is_finite() {
                        return Err(ModelLoadError::invalid(format!(
                            "tree {tree} leaf {i} counts overflow when summed"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn leaf_proba(&self, row: &[f64]) -> [f64; 2] {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if row[feature] <= threshold { left } else { right };
                }
                Node::Leaf { counts } => {
                    let total = counts[0] + counts[1];
                    return [counts[0] / total, counts[1] / total];
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct RandomForestDef {
    version: u32,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

/// An ensemble of decision trees scored by averaging leaf probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    version: u32,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Builds a forest, validating every tree.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::Invalid`] if `n_features` is not
    /// [`FEATURE_COUNT`], the forest is empty, or any tree is malformed
    /// (dangling or backward child index, out-of-range feature, NaN
    /// threshold, leaf without samples or with counts summing to infinity).
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Result<Self, ModelLoadError> {
        if n_features != FEATURE_COUNT {
            return Err(ModelLoadError::invalid(format!(
                "model declares {n_features} features, expected {FEATURE_COUNT}"
            )));
        }
        if trees.is_empty() {
            return Err(ModelLoadError::invalid("model has no trees"));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }

        Ok(Self {
            version: SUPPORTED_VERSION,
            n_features,
            trees,
        })
    }

    /// Parses a forest from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the version is not
    /// [`SUPPORTED_VERSION`], or the forest fails validation.
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let def: RandomForestDef = serde_json::from_str(json)?;
        if def.version != SUPPORTED_VERSION {
            return Err(ModelLoadError::invalid(format!(
                "unsupported model version {} (expected {SUPPORTED_VERSION})",
                def.version
            )));
        }
        Self::new(def.n_features, def.trees)
    }

    /// Reads and parses a forest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents fail
    /// [`RandomForest::from_json`].
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        log::info!("Loading model from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        let forest = Self::from_json(&json)?;
        log::info!(
            "Loaded model v{}: {} trees, {} nodes, {} features",
            forest.version,
            forest.tree_count(),
            forest.node_count(),
            forest.n_features
        );
        Ok(forest)
    }

    /// Model format version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Number of input columns the model expects.
    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Total nodes across all trees.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.trees.iter().map(DecisionTree::node_count).sum()
    }

    fn check_row(&self, row: &[f64]) -> Result<(), ClassifierFault> {
        if row.len() != self.n_features {
            return Err(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )
            .into());
        }
        if let Some(i) = row.iter().position(|v| !v.is_finite()) {
            return Err(format!("feature {i} is not a finite number").into());
        }
        Ok(())
    }
}

impl ArrestClassifier for RandomForest {
    fn predict_label(&self, row: &[f64]) -> Result<u8, ClassifierFault> {
        let [negative, positive] = self.predict_proba(row)?;
        // Ties go to the first class.
        Ok(u8::from(positive > negative))
    }

    #[allow(clippy::cast_precision_loss)]
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierFault> {
        self.check_row(row)?;

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [negative, positive] = tree.leaf_proba(row);
            sum[0] += negative;
            sum[1] += positive;
        }

        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}
