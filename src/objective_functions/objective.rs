use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::RobustWarpError;

/// A multi-label ranking objective: a scalar batch loss and its analytic
/// gradient with respect to every predicted score.
///
/// * `labels` - `[batch, no_classes + 1]`, row major; the trailing column
///   of each row is the example weight, the rest are multi-hot labels.
/// * `scores` - `[batch, no_classes]`, row major, same row order.
///
/// The gradient output matches the labels shape, with the weight column
/// always zero: the weight is not a trainable quantity.
pub trait MultiLabelObjective: Send + Sync {
    fn loss(&self, labels: &Matrix<f64>, scores: &Matrix<f64>) -> Result<f32, RobustWarpError>;
    fn gradient(&self, labels: &Matrix<f64>, scores: &Matrix<f64>) -> Result<RowMajorMatrix<f32>, RobustWarpError>;
}
