//! Robust WARP loss
//!
//! A robustified variant of the WARP (Weighted Approximate-Rank Pairwise)
//! loss for multi-label classification. Positives are pushed above the
//! margin, negatives below it, and every positive/negative pair is
//! penalized in proportion to the estimated rank of the positive. A
//! secondary discount margin subtracts back part of the penalty for scores
//! that are far outside the margin, so outliers are not over-penalized.
use crate::constants::{BATCH_NORM_FACTOR, DISCOUNT_FACTOR, DISCOUNT_MARGIN, MARGIN};
use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::RobustWarpError;
use crate::objective_functions::objective::MultiLabelObjective;
use crate::partition::ClassPartition;
use crate::rank::rank_weight;
use crate::utils::{validate_finite_parameter, validate_unit_interval_parameter};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Robust WARP loss
#[derive(Default, Debug, Deserialize, Serialize, Clone)]
pub struct RobustWarp {
    /// Secondary margin used by the discount terms.
    pub discount_margin: Option<f64>,
    /// Fraction of an over-satisfied hinge subtracted back. Must lie in [0, 1].
    pub discount_factor: Option<f64>,
    /// Pins the rank-estimation draw sequence. Each example derives its own
    /// generator from this, so results are stable under parallel scheduling.
    /// When unset, every example seeds from entropy.
    pub seed: Option<u64>,
}

impl RobustWarp {
    pub fn validate(&self) -> Result<(), RobustWarpError> {
        if let Some(beta) = self.discount_factor {
            validate_unit_interval_parameter(beta, "discount_factor")?;
        }
        if let Some(s) = self.discount_margin {
            validate_finite_parameter(s, "discount_margin")?;
        }
        Ok(())
    }

    /// Dump the configuration as a json object.
    pub fn json_dump(&self) -> Result<String, RobustWarpError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(RobustWarpError::UnableToWrite(e.to_string())),
        }
    }

    /// Load a configuration from a json string.
    pub fn from_json(json_str: &str) -> Result<Self, RobustWarpError> {
        match serde_json::from_str::<RobustWarp>(json_str) {
            Ok(m) => Ok(m),
            Err(e) => Err(RobustWarpError::UnableToRead(e.to_string())),
        }
    }

    fn example_rng(&self, row: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(row as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Check the boundary contract, returning `(batch_size, no_classes)`.
fn validate_batch(labels: &Matrix<f64>, scores: &Matrix<f64>) -> Result<(usize, usize), RobustWarpError> {
    if labels.cols != scores.cols + 1 {
        return Err(RobustWarpError::ClassCountMismatch(labels.cols, scores.cols));
    }
    if labels.rows != scores.rows {
        return Err(RobustWarpError::BatchSizeMismatch(labels.rows, scores.rows));
    }
    if labels.rows == 0 {
        return Err(RobustWarpError::EmptyBatch);
    }
    Ok((labels.rows, scores.cols))
}

/// Negative weights flip the sign of an example's contribution. They are the
/// caller's responsibility, so surface them without rejecting the batch.
fn warn_on_negative_weights(labels: &Matrix<f64>, no_classes: usize) {
    let negatives = (0..labels.rows).filter(|&i| labels.get_row(i)[no_classes] < 0.0).count();
    if negatives > 0 {
        warn!(
            "{} examples carry a negative weight; their loss contributions flip sign.",
            negatives
        );
    }
}

/// Unscaled loss contribution of a single example.
fn example_loss(
    partition: &ClassPartition,
    cu: f64,
    no_classes: usize,
    s: f64,
    beta: f64,
    rng: &mut StdRng,
) -> f64 {
    let mut loss = 0.0;

    for pos in &partition.positive {
        loss += f64::max(0.0, MARGIN - pos.score) * cu;
        loss -= f64::max(0.0, s - pos.score) * cu * beta;
    }

    for neg in &partition.negative {
        loss += f64::max(0.0, MARGIN + neg.score) * cu;
        loss -= f64::max(0.0, s + neg.score) * cu * beta;
    }

    let scores_neg = partition.negative_scores();
    for pos in &partition.positive {
        // One rank estimate per positive, reused across all of its pairs.
        let importance = rank_weight(pos.score, &scores_neg, no_classes, rng);
        for neg in &partition.negative {
            let hinge = f64::max(0.0, MARGIN - pos.score + neg.score);
            let discount_hinge = f64::max(0.0, s - pos.score + neg.score);
            loss += importance * cu * (hinge - beta * discount_hinge);
        }
    }

    loss
}

/// Fill one gradient row. Increments arrive pre-scaled by `cu / (batch * 10)`;
/// every hinge boundary is strict, so an exactly-zero hinge argument
/// contributes nothing. The weight column stays zero.
#[allow(clippy::too_many_arguments)]
fn example_gradient(
    partition: &ClassPartition,
    cu: f64,
    no_classes: usize,
    batch_size: usize,
    s: f64,
    beta: f64,
    rng: &mut StdRng,
    grad_row: &mut [f32],
) {
    let scale = cu / (batch_size as f64 * BATCH_NORM_FACTOR);
    let mut acc = vec![0.0f64; no_classes];

    for pos in &partition.positive {
        if MARGIN - pos.score > 0.0 {
            acc[pos.class] -= scale;
        }
        if s - pos.score > 0.0 {
            acc[pos.class] += scale * beta;
        }
    }

    for neg in &partition.negative {
        if MARGIN + neg.score > 0.0 {
            acc[neg.class] += scale;
        }
        if s + neg.score > 0.0 {
            acc[neg.class] -= scale * beta;
        }
    }

    let scores_neg = partition.negative_scores();
    for pos in &partition.positive {
        let importance = rank_weight(pos.score, &scores_neg, no_classes, rng);
        let norm = importance * scale;
        for neg in &partition.negative {
            if MARGIN - pos.score + neg.score > 0.0 {
                acc[pos.class] -= norm;
                acc[neg.class] += norm;
            }
            if s - pos.score + neg.score > 0.0 {
                acc[pos.class] += norm * beta;
                acc[neg.class] -= norm * beta;
            }
        }
    }

    for (class, g) in acc.iter().enumerate() {
        grad_row[class] = *g as f32;
    }
    grad_row[no_classes] = 0.0;
}

impl MultiLabelObjective for RobustWarp {
    #[inline]
    fn loss(&self, labels: &Matrix<f64>, scores: &Matrix<f64>) -> Result<f32, RobustWarpError> {
        self.validate()?;
        let (batch_size, no_classes) = validate_batch(labels, scores)?;
        warn_on_negative_weights(labels, no_classes);

        let s = self.discount_margin.unwrap_or(DISCOUNT_MARGIN);
        let beta = self.discount_factor.unwrap_or(DISCOUNT_FACTOR);
        debug!("robust warp loss over {} examples with {} classes", batch_size, no_classes);

        // Collect per-example contributions first so the final sum runs in
        // row order: the reported loss must not depend on how rayon splits
        // the batch.
        let contributions: Vec<f64> = (0..batch_size)
            .into_par_iter()
            .map(|row| {
                let label_row = labels.get_row(row);
                let score_row = scores.get_row(row);
                let cu = label_row[no_classes];
                let partition = ClassPartition::from_example(label_row, score_row);
                let mut rng = self.example_rng(row);
                example_loss(&partition, cu, no_classes, s, beta, &mut rng)
            })
            .collect();
        let total: f64 = contributions.iter().sum();

        Ok((total / (batch_size as f64 * BATCH_NORM_FACTOR)) as f32)
    }

    #[inline]
    fn gradient(&self, labels: &Matrix<f64>, scores: &Matrix<f64>) -> Result<RowMajorMatrix<f32>, RobustWarpError> {
        self.validate()?;
        let (batch_size, no_classes) = validate_batch(labels, scores)?;
        warn_on_negative_weights(labels, no_classes);

        let s = self.discount_margin.unwrap_or(DISCOUNT_MARGIN);
        let beta = self.discount_factor.unwrap_or(DISCOUNT_FACTOR);
        debug!(
            "robust warp gradient over {} examples with {} classes",
            batch_size, no_classes
        );

        let mut output = RowMajorMatrix::new(vec![0.0f32; batch_size * labels.cols], batch_size, labels.cols);
        // Each example owns exactly one output row, so rows can be filled
        // concurrently without synchronization.
        output
            .data
            .par_chunks_mut(no_classes + 1)
            .enumerate()
            .for_each(|(row, grad_row)| {
                let label_row = labels.get_row(row);
                let score_row = scores.get_row(row);
                let cu = label_row[no_classes];
                let partition = ClassPartition::from_example(label_row, score_row);
                let mut rng = self.example_rng(row);
                example_gradient(&partition, cu, no_classes, batch_size, s, beta, &mut rng, grad_row);
            });

        Ok(output)
    }
}
