//! Regression model specifications and scoring.
//!
//! A model arrives as a serialized [`ModelSpec`] and is validated once,
//! up front, into a [`RegressionModel`] implementation. Validation and
//! scoring are split on purpose: everything structural (node indices,
//! feature indices, finite parameters) is rejected at build time, so the
//! per-request hot path only has to check input width, guard against
//! node cycles, and confirm the score is finite.
//!
//! Two fitted families are supported. `linear` is a plain dot product
//! plus intercept; `gbdt` sums the leaf values of binary decision trees
//! on top of a base score. Both predict in `log1p` space; undoing that
//! transform is the engine's job, not the model's.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the prediction stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// The input row width does not match what the model was fitted on.
    #[error("model expects {expected} features, got {actual}")]
    FeatureCountMismatch {
        /// Width the model was fitted on.
        expected: usize,
        /// Width of the rejected input.
        actual: usize,
    },

    /// The serialized specification is structurally unusable.
    #[error("model spec rejected: {0}")]
    InvalidSpec(String),

    /// A tree walk revisited nodes instead of reaching a leaf.
    #[error("tree {tree} walk exceeded {limit} steps without reaching a leaf")]
    TreeCycle {
        /// Index of the offending tree.
        tree: usize,
        /// Step limit that was exceeded.
        limit: usize,
    },

    /// Scoring produced NaN or an infinity.
    #[error("model produced a non-finite score: {0}")]
    NonFiniteScore(f64),
}

/// Serialized form of a fitted regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Linear regression: `intercept + coefficients · x`.
    Linear(LinearSpec),
    /// Gradient-boosted decision trees: `base_score + Σ leaf(x)`.
    Gbdt(GbdtSpec),
}

/// Fitted parameters of a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSpec {
    /// One coefficient per feature column, in fitted order.
    pub coefficients: Vec<f64>,
    /// Additive intercept.
    pub intercept: f64,
}

/// Fitted parameters of a boosted-tree model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtSpec {
    /// Width of the feature row the trees were fitted on.
    pub num_features: usize,
    /// Score before any tree contributions.
    pub base_score: f64,
    /// The fitted trees, applied additively.
    pub trees: Vec<TreeSpec>,
}

/// One fitted decision tree as a flat node arena rooted at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    /// The nodes; child links are indices into this list.
    pub nodes: Vec<TreeNode>,
}

/// One node of a fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Interior node: go left when `x[feature] < threshold`, else right.
    Split {
        /// Feature column the split tests.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Node index taken when the feature is below the threshold.
        left: usize,
        /// Node index taken otherwise.
        right: usize,
    },
    /// Terminal node carrying the tree's contribution.
    Leaf {
        /// Value added to the score.
        value: f64,
    },
}

/// A validated, scoring-ready regression model.
pub trait RegressionModel: fmt::Debug + Send + Sync {
    /// Width of feature row this model was fitted on.
    fn expected_features(&self) -> usize;

    /// Scores one feature row, in `log1p` space.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;

    /// Short family name for logs and summaries.
    fn family(&self) -> &'static str;
}

/// Validates a specification into a scoring-ready model.
pub fn build_model(spec: ModelSpec) -> Result<Box<dyn RegressionModel>, PredictionError> {
    match spec {
        ModelSpec::Linear(spec) => Ok(Box::new(LinearModel::from_spec(spec)?)),
        ModelSpec::Gbdt(spec) => Ok(Box::new(GbdtModel::from_spec(spec)?)),
    }
}

/// Linear regression over the feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Validates a linear specification.
    pub fn from_spec(spec: LinearSpec) -> Result<Self, PredictionError> {
        if spec.coefficients.is_empty() {
            return Err(PredictionError::InvalidSpec(
                "linear model has no coefficients".to_string(),
            ));
        }
        if let Some(pos) = spec.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(PredictionError::InvalidSpec(format!(
                "linear coefficient {pos} is not finite"
            )));
        }
        if !spec.intercept.is_finite() {
            return Err(PredictionError::InvalidSpec(
                "linear intercept is not finite".to_string(),
            ));
        }
        Ok(LinearModel {
            coefficients: spec.coefficients,
            intercept: spec.intercept,
        })
    }
}

impl RegressionModel for LinearModel {
    fn expected_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictionError::FeatureCountMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let mut score = self.intercept;
        for (coef, value) in self.coefficients.iter().zip(features) {
            score += coef * value;
        }
        if !score.is_finite() {
            return Err(PredictionError::NonFiniteScore(score));
        }
        Ok(score)
    }

    fn family(&self) -> &'static str {
        "linear"
    }
}

/// Gradient-boosted decision trees over the feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct GbdtModel {
    num_features: usize,
    base_score: f64,
    trees: Vec<TreeSpec>,
}

impl GbdtModel {
    /// Validates a boosted-tree specification.
    ///
    /// Checks every child link and feature index against their bounds and
    /// every parameter for finiteness. After this passes, a tree walk can
    /// only fail by cycling, which scoring guards with a step limit.
    pub fn from_spec(spec: GbdtSpec) -> Result<Self, PredictionError> {
        if spec.num_features == 0 {
            return Err(PredictionError::InvalidSpec(
                "gbdt model declares zero features".to_string(),
            ));
        }
        if !spec.base_score.is_finite() {
            return Err(PredictionError::InvalidSpec(
                "gbdt base score is not finite".to_string(),
            ));
        }
        for (t, tree) in spec.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(PredictionError::InvalidSpec(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match *node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= spec.num_features {
                            return Err(PredictionError::InvalidSpec(format!(
                                "tree {t} node {n} splits on feature {feature}, \
                                 but the model has {} features",
                                spec.num_features
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(PredictionError::InvalidSpec(format!(
                                "tree {t} node {n} has non-finite threshold"
                            )));
                        }
                        if left >= tree.nodes.len() || right >= tree.nodes.len() {
                            return Err(PredictionError::InvalidSpec(format!(
                                "tree {t} node {n} links outside the tree \
                                 (left {left}, right {right}, {} nodes)",
                                tree.nodes.len()
                            )));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(PredictionError::InvalidSpec(format!(
                                "tree {t} node {n} has non-finite leaf value"
                            )));
                        }
                    }
                }
            }
        }
        Ok(GbdtModel {
            num_features: spec.num_features,
            base_score: spec.base_score,
            trees: spec.trees,
        })
    }

    fn walk_tree(&self, index: usize, features: &[f64]) -> Result<f64, PredictionError> {
        let nodes = &self.trees[index].nodes;
        // A real tree visits each node at most once on the way down.
        let limit = nodes.len();
        let mut node = 0;
        for _ in 0..limit {
            match nodes[node] {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[feature] < threshold { left } else { right };
                }
            }
        }
        Err(PredictionError::TreeCycle { tree: index, limit })
    }
}

impl RegressionModel for GbdtModel {
    fn expected_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.num_features {
            return Err(PredictionError::FeatureCountMismatch {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let mut score = self.base_score;
        for index in 0..self.trees.len() {
            score += self.walk_tree(index, features)?;
        }
        if !score.is_finite() {
            return Err(PredictionError::NonFiniteScore(score));
        }
        Ok(score)
    }

    fn family(&self) -> &'static str {
        "gbdt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, below: f64, above: f64) -> TreeSpec {
        TreeSpec {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: below },
                TreeNode::Leaf { value: above },
            ],
        }
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearModel::from_spec(LinearSpec {
            coefficients: vec![2.0, -1.0, 0.5],
            intercept: 10.0,
        })
        .unwrap();
        assert_eq!(model.expected_features(), 3);
        assert_eq!(model.predict(&[1.0, 2.0, 4.0]).unwrap(), 12.0);
        assert_eq!(model.family(), "linear");
    }

    #[test]
    fn test_linear_feature_count_mismatch() {
        let model = LinearModel::from_spec(LinearSpec {
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
        })
        .unwrap();
        assert_eq!(
            model.predict(&[1.0]),
            Err(PredictionError::FeatureCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_linear_rejects_bad_spec() {
        assert!(matches!(
            LinearModel::from_spec(LinearSpec {
                coefficients: vec![],
                intercept: 0.0
            }),
            Err(PredictionError::InvalidSpec(_))
        ));
        assert!(matches!(
            LinearModel::from_spec(LinearSpec {
                coefficients: vec![f64::NAN],
                intercept: 0.0
            }),
            Err(PredictionError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_gbdt_sums_base_and_leaves() {
        let model = GbdtModel::from_spec(GbdtSpec {
            num_features: 2,
            base_score: 10.0,
            trees: vec![stump(0, 0.5, -1.0, 1.0), stump(1, 0.0, -2.0, 2.0)],
        })
        .unwrap();
        // x0 below, x1 above: 10 - 1 + 2
        assert_eq!(model.predict(&[0.0, 5.0]).unwrap(), 11.0);
        // x0 above, x1 below: 10 + 1 - 2
        assert_eq!(model.predict(&[1.0, -5.0]).unwrap(), 9.0);
        assert_eq!(model.family(), "gbdt");
    }

    #[test]
    fn test_gbdt_split_goes_right_on_equal_threshold() {
        let model = GbdtModel::from_spec(GbdtSpec {
            num_features: 1,
            base_score: 0.0,
            trees: vec![stump(0, 1.0, -1.0, 1.0)],
        })
        .unwrap();
        assert_eq!(model.predict(&[1.0]).unwrap(), 1.0);
        assert_eq!(model.predict(&[0.999]).unwrap(), -1.0);
    }

    #[test]
    fn test_gbdt_with_no_trees_scores_base() {
        let model = GbdtModel::from_spec(GbdtSpec {
            num_features: 3,
            base_score: 4.5,
            trees: vec![],
        })
        .unwrap();
        assert_eq!(model.predict(&[0.0, 0.0, 0.0]).unwrap(), 4.5);
    }

    #[test]
    fn test_gbdt_rejects_out_of_range_links() {
        let spec = GbdtSpec {
            num_features: 1,
            base_score: 0.0,
            trees: vec![TreeSpec {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 1,
                    right: 7,
                }],
            }],
        };
        assert!(matches!(
            GbdtModel::from_spec(spec),
            Err(PredictionError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_gbdt_rejects_out_of_range_feature() {
        let spec = GbdtSpec {
            num_features: 2,
            base_score: 0.0,
            trees: vec![stump(5, 0.0, -1.0, 1.0)],
        };
        assert!(matches!(
            GbdtModel::from_spec(spec),
            Err(PredictionError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_gbdt_cycle_is_caught_at_scoring_time() {
        // Node 0 links to itself; structurally in range, so build accepts
        // it and the walk's step limit has to catch it.
        let model = GbdtModel::from_spec(GbdtSpec {
            num_features: 1,
            base_score: 0.0,
            trees: vec![TreeSpec {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 1,
                    },
                    TreeNode::Leaf { value: 1.0 },
                ],
            }],
        })
        .unwrap();
        assert_eq!(
            model.predict(&[-1.0]),
            Err(PredictionError::TreeCycle { tree: 0, limit: 2 })
        );
        // The non-cycling branch still scores.
        assert_eq!(model.predict(&[1.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_spec_json_round_trip() {
        let spec = ModelSpec::Gbdt(GbdtSpec {
            num_features: 10,
            base_score: 9.9,
            trees: vec![stump(0, 0.0, -0.1, 0.1)],
        });
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"family\":\"gbdt\""));
        assert!(json.contains("\"kind\":\"split\""));
        let back: ModelSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_build_model_dispatches_on_family() {
        let linear = build_model(ModelSpec::Linear(LinearSpec {
            coefficients: vec![1.0],
            intercept: 0.0,
        }))
        .unwrap();
        assert_eq!(linear.family(), "linear");

        let gbdt = build_model(ModelSpec::Gbdt(GbdtSpec {
            num_features: 1,
            base_score: 0.0,
            trees: vec![],
        }))
        .unwrap();
        assert_eq!(gbdt.family(), "gbdt");
    }
}
