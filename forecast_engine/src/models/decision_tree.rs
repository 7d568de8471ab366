//! Regression tree (CART, squared-error splits)

use super::{check_training_shape, normalize, Regressor};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Samples going left, in the node's order sorted by `feature`
    left_count: usize,
    /// Reduction in summed squared error
    gain: f64,
}

/// Regression tree with nodes stored in a flat arena, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    nodes: Vec<Node>,
    feature_importances: Vec<f64>,
}

/// Borrowed training data for one fit
struct Builder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    config: &'a TreeConfig,
    rng: ChaCha8Rng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Fit on the rows of `x` listed in `samples`; repeated indices count once per repeat
    pub fn fit_samples(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        samples: &mut [usize],
    ) -> Result<()> {
        check_training_shape(x, y)?;
        if samples.is_empty() {
            return Err(ForecastError::ModelError(
                "cannot grow a tree from zero samples".to_string(),
            ));
        }

        let mut builder = Builder {
            x,
            y,
            config: &self.config,
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            nodes: Vec::new(),
            importances: vec![0.0; x.ncols()],
        };
        builder.grow(samples, 0);

        let Builder {
            nodes,
            mut importances,
            ..
        } = builder;
        normalize(&mut importances);

        self.nodes = nodes;
        self.feature_importances = importances;
        Ok(())
    }

    /// Predict a single row
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx).ok_or(ForecastError::NotFitted)? {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Depth of the fitted tree (a lone leaf has depth 1)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Number of leaves in the fitted tree
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

impl<'a> Builder<'a> {
    /// Grow the subtree for `samples` and return its node index
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let n = samples.len();
        let sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let value = sum / n as f64;

        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
        {
            return node;
        }

        let Some(split) = self.best_split(samples, sum) else {
            return node;
        };

        let feature = split.feature;
        let x = self.x;
        samples.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
        self.importances[feature] += split.gain;

        let (left_samples, right_samples) = samples.split_at_mut(split.left_count);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);

        self.nodes[node] = Node::Split {
            feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.x.ncols();
        match self.config.max_features {
            Some(k) if k < n_features => {
                let mut chosen = index::sample(&mut self.rng, n_features, k.max(1)).into_vec();
                chosen.sort_unstable();
                chosen
            }
            _ => (0..n_features).collect(),
        }
    }

    /// Best squared-error split over the candidate features.
    ///
    /// Each feature is scanned once in sorted order with running target sums;
    /// maximising `sum_l²/n_l + sum_r²/n_r` minimises the children's error.
    fn best_split(&mut self, samples: &[usize], total: f64) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let parent_score = total * total / n as f64;
        // Gains below rounding noise of the score would split pure nodes
        let min_gain = 1e-12 * parent_score.max(1.0);
        let mut best: Option<SplitCandidate> = None;

        let mut order = samples.to_vec();
        for feature in self.candidate_features() {
            let x = self.x;
            order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += self.y[order[k - 1]];

                let below = x[[order[k - 1], feature]];
                let above = x[[order[k], feature]];
                if below >= above || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / k as f64
                    + right_sum * right_sum / (n - k) as f64;
                let gain = score - parent_score;

                if gain > min_gain && best.map_or(true, |b| gain > b.gain) {
                    let mut threshold = (below + above) / 2.0;
                    if !threshold.is_finite() || threshold >= above {
                        threshold = below;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        left_count: k,
                        gain,
                    });
                }
            }
        }

        best
    }
}

impl Regressor for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let mut samples: Vec<usize> = (0..x.nrows()).collect();
        self.fit_samples(x, y, &mut samples)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        x.rows().into_iter().map(|row| self.predict_row(row)).collect()
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(&self.feature_importances)
        }
    }
}
