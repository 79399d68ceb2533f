//! Random forest classifier (bootstrap-aggregated Gini decision trees)
//!
//! Trees are grown on weighted bootstrap samples. A sample's weight is its
//! bootstrap multiplicity times its class weight, with balanced class weights
//! `n / (k * count_c)` so minority profiles carry as much mass as the majority.
//! Leaves store normalised class weights; the forest probability is the mean
//! of the leaf distributions reached by every tree.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Gini gain below which a split is not worth making
const MIN_GAIN: f64 = 1e-12;

/// Hyper-parameters for forest training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features tried per split; `None` means `sqrt(n_features)`
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 8,
            min_samples_split: 2,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single CART tree; node 0 is the root and children always follow parents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Normalised impurity decrease per feature
    importances: Vec<f64>,
}

/// A training sample reference: row index and weight
#[derive(Debug, Clone, Copy)]
struct Sample {
    row: usize,
    weight: f64,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    max_features: usize,
    params: &'a ForestParams,
    rng: StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

fn gini(distribution: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - distribution.iter().map(|w| (w / total).powi(2)).sum::<f64>()
}

fn normalise(distribution: &[f64]) -> Vec<f64> {
    let total: f64 = distribution.iter().sum();
    if total > 0.0 {
        distribution.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / distribution.len() as f64; distribution.len()]
    }
}

impl<'a> TreeBuilder<'a> {
    fn class_distribution(&self, samples: &[Sample]) -> Vec<f64> {
        let mut dist = vec![0.0; self.n_classes];
        for s in samples {
            dist[self.y[s.row]] += s.weight;
        }
        dist
    }

    fn build(&mut self, samples: Vec<Sample>, depth: usize) -> usize {
        let dist = self.class_distribution(&samples);
        let total: f64 = dist.iter().sum();
        let impurity = gini(&dist, total);

        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution: normalise(&dist) });

        if depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split
            || impurity <= MIN_GAIN
        {
            return node_idx;
        }

        let Some(split) = self.best_split(&samples, &dist, total, impurity) else {
            return node_idx;
        };

        let (left, right): (Vec<Sample>, Vec<Sample>) = samples
            .into_iter()
            .partition(|s| self.x[s.row][split.feature] <= split.threshold);
        if left.is_empty() || right.is_empty() {
            return node_idx;
        }

        self.importances[split.feature] += split.gain;
        let left_idx = self.build(left, depth + 1);
        let right_idx = self.build(right, depth + 1);
        self.nodes[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_idx,
            right: right_idx,
        };
        node_idx
    }

    /// Best Gini split over a random subset of features
    fn best_split(&mut self, samples: &[Sample], dist: &[f64], total: f64, impurity: f64) -> Option<SplitCandidate> {
        let n_features = self.x[samples[0].row].len();
        let features = index::sample(&mut self.rng, n_features, self.max_features.min(n_features));

        let parent = total * impurity;
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = samples.to_vec();

        for feature in features.iter() {
            sorted.sort_by(|a, b| self.x[a.row][feature].total_cmp(&self.x[b.row][feature]));

            let mut left = vec![0.0; self.n_classes];
            let mut left_total = 0.0;
            for k in 0..sorted.len() - 1 {
                let s = sorted[k];
                left[self.y[s.row]] += s.weight;
                left_total += s.weight;

                let current = self.x[s.row][feature];
                let next = self.x[sorted[k + 1].row][feature];
                if next <= current {
                    continue;
                }

                let right: Vec<f64> = dist.iter().zip(&left).map(|(d, l)| d - l).collect();
                let right_total = total - left_total;
                let children = left_total * gini(&left, left_total) + right_total * gini(&right, right_total);
                let gain = parent - children;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(SplitCandidate { feature, threshold, gain });
                }
            }
        }

        best
    }
}

impl DecisionTree {
    fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        samples: Vec<Sample>,
        params: &ForestParams,
        rng: StdRng,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let max_features = params
            .max_features
            .unwrap_or_else(|| ((n_features as f64).sqrt() as usize).max(1));

        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            max_features,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.build(samples, 0);

        let total: f64 = builder.importances.iter().sum();
        if total > 0.0 {
            builder.importances.iter_mut().for_each(|v| *v /= total);
        }

        Self {
            nodes: builder.nodes,
            importances: builder.importances,
        }
    }

    /// Leaf class distribution reached by `row`
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Structural checks for a deserialised tree
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        if self.importances.len() != n_features {
            return Err(format!("tree importances cover {} features, expected {}", self.importances.len(), n_features));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!("leaf {} has {} classes, expected {}", idx, distribution.len(), n_classes));
                    }
                }
                Node::Split { feature, threshold, left, right } => {
                    let len = self.nodes.len();
                    if *feature >= n_features || !threshold.is_finite() {
                        return Err(format!("split {} is malformed", idx));
                    }
                    if *left <= idx || *right <= idx || *left >= len || *right >= len {
                        return Err(format!("split {} points outside the tree", idx));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_classes: usize,
    pub n_features: usize,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

/// Balanced class weights `n / (k * count_c)`; zero for absent classes
pub fn balanced_class_weights(y: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    let n = y.len() as f64;
    counts
        .iter()
        .map(|&c| if c == 0 { 0.0 } else { n / (n_classes as f64 * c as f64) })
        .collect()
}

/// Weighted bootstrap sample of `n` rows drawn with replacement
fn bootstrap(y: &[usize], class_weights: &[f64], rng: &mut StdRng) -> Vec<Sample> {
    let n = y.len();
    let mut counts = vec![0u32; n];
    for _ in 0..n {
        counts[rng.gen_range(0..n)] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .map(|(row, &c)| Sample { row, weight: c as f64 * class_weights[y[row]] })
        .collect()
}

/// Per-tree seed derived from the forest seed, independent of scheduling
fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed ^ (tree as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl RandomForest {
    /// Fit a forest on already-scaled rows
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, params: &ForestParams) -> Result<Self, ProfileError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ProfileError::EmptyTrainingSet);
        }
        if params.n_trees == 0 {
            return Err(ProfileError::InconsistentArtifact("forest needs at least one tree".to_string()));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ProfileError::InconsistentArtifact(format!(
                "label {} outside {} classes",
                bad, n_classes
            )));
        }

        let n_features = x[0].len();
        let class_weights = balanced_class_weights(y, n_classes);

        let trees: Vec<DecisionTree> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(tree_seed(params.seed, t));
                let samples = bootstrap(y, &class_weights, &mut rng);
                DecisionTree::fit(x, y, n_classes, samples, params, rng)
            })
            .collect();

        let mut feature_importances = vec![0.0; n_features];
        for tree in &trees {
            for (acc, v) in feature_importances.iter_mut().zip(&tree.importances) {
                *acc += v;
            }
        }
        let total: f64 = feature_importances.iter().sum();
        if total > 0.0 {
            feature_importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(Self {
            n_classes,
            n_features,
            trees,
            feature_importances,
        })
    }

    /// Mean leaf distribution across trees
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }

    /// Class with the highest mean probability (lowest index wins ties)
    pub fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.predict_proba(row))
    }

    /// Mean impurity decrease per feature, summing to 1
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Structural checks for a deserialised forest
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.trees.is_empty() {
            return Err(ProfileError::InconsistentArtifact("forest has no trees".to_string()));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(ProfileError::InconsistentArtifact(
                "feature importances do not match feature count".to_string(),
            ));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| ProfileError::InconsistentArtifact(format!("tree {}: {}", t, e)))?;
        }
        Ok(())
    }
}

/// Index of the largest value; first index on ties
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Two well-separated clusters on feature 0, noise on feature 1
    fn two_clusters() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut rng = StdRng::seed_from_u64(5);
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..200 {
            let class = i % 2;
            let centre = if class == 0 { -2.0 } else { 2.0 };
            x.push(vec![centre + rng.gen_range(-0.5..0.5), rng.gen_range(-1.0..1.0)]);
            y.push(class);
        }
        (x, y)
    }

    fn small_params() -> ForestParams {
        ForestParams { n_trees: 15, max_depth: 4, min_samples_split: 2, max_features: Some(2), seed: 11 }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[5.0, 0.0], 5.0), 0.0);
        assert_abs_diff_eq!(gini(&[1.0, 1.0], 2.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(gini(&[1.0, 1.0, 1.0], 3.0), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_balanced_weights() {
        let weights = balanced_class_weights(&[0, 0, 0, 1], 3);
        assert_abs_diff_eq!(weights[0], 4.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], 4.0 / 3.0, epsilon = 1e-12);
        assert_eq!(weights[2], 0.0);
    }

    #[test]
    fn test_separable_data_is_learned() {
        let (x, y) = two_clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();

        assert_eq!(forest.predict(&[-2.0, 0.0]), 0);
        assert_eq!(forest.predict(&[2.0, 0.0]), 1);

        let proba = forest.predict_proba(&[2.1, 0.3]);
        assert_abs_diff_eq!(proba.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(proba[1] > 0.9);
    }

    #[test]
    fn test_importances_favour_informative_feature() {
        let (x, y) = two_clusters();
        let forest = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();

        let importances = forest.feature_importances();
        assert_abs_diff_eq!(importances.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_depth_limit_respected() {
        let (x, y) = two_clusters();
        let params = ForestParams { max_depth: 2, ..small_params() };
        let forest = RandomForest::fit(&x, &y, 2, &params).unwrap();
        assert!(forest.trees().iter().all(|t| t.depth() <= 2));
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = two_clusters();
        let a = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();
        let b = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_features_give_single_leaf() {
        let x = vec![vec![1.0]; 10];
        let y = vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        let forest = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();
        assert!(forest.trees().iter().all(|t| t.n_nodes() == 1));
        assert!(forest.feature_importances().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_bad_labels() {
        let x = vec![vec![0.0], vec![1.0]];
        assert!(RandomForest::fit(&x, &[0, 3], 2, &small_params()).is_err());
        assert!(RandomForest::fit(&[], &[], 2, &small_params()).is_err());
    }

    #[test]
    fn test_validate_catches_class_mismatch() {
        let (x, y) = two_clusters();
        let mut forest = RandomForest::fit(&x, &y, 2, &small_params()).unwrap();
        forest.n_classes = 3;
        assert!(matches!(forest.validate(), Err(ProfileError::InconsistentArtifact(_))));
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5]), 0);
    }
}
