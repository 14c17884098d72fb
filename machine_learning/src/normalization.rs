use log::warn;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::{MlErr, Result};

/// Per-column `(min, max)` statistics of a label matrix.
///
/// Network targets live in `[-0.5, 0.5]`: a physical value `v` of column `k` is mapped to
/// `(v - min[k]) / (max[k] - min[k]) - 0.5`. The statistics must come from the training
/// partition only; rescaling test predictions with test-derived statistics leaks the test set
/// into the evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMax {
    min: Array1<f32>,
    max: Array1<f32>,
}

impl MinMax {
    /// Creates a new `MinMax` from explicit bounds.
    ///
    /// # Arguments
    /// * `min` - The per-column minimums.
    /// * `max` - The per-column maximums.
    ///
    /// # Returns
    /// An error if the vectors differ in length, a bound isn't finite or any `min > max`.
    pub fn new(min: Array1<f32>, max: Array1<f32>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(MlErr::SizeMismatch {
                what: "min/max columns",
                got: max.len(),
                expected: min.len(),
            });
        }

        if min.is_empty() {
            return Err(MlErr::EmptyInput { what: "min/max columns" });
        }

        for (column, (lo, hi)) in min.iter().zip(&max).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(MlErr::NonFinite {
                    what: "min/max bounds",
                    column,
                });
            }

            if lo > hi {
                return Err(MlErr::InvalidSpec(format!(
                    "column {column}: minimum ({lo}) is greater than maximum ({hi})"
                )));
            }
        }

        Ok(Self { min, max })
    }

    /// Computes the per-column statistics of `values`.
    ///
    /// # Arguments
    /// * `values` - The training labels, one sample per row.
    ///
    /// # Returns
    /// The statistics or an error if there are no rows or a value isn't finite.
    pub fn fit(values: ArrayView2<f32>) -> Result<Self> {
        if values.nrows() == 0 {
            return Err(MlErr::EmptyInput {
                what: "training labels",
            });
        }

        if let Some(column) = values
            .columns()
            .into_iter()
            .position(|c| c.iter().any(|v| !v.is_finite()))
        {
            return Err(MlErr::NonFinite {
                what: "training labels",
                column,
            });
        }

        let min = values.fold_axis(Axis(0), f32::INFINITY, |&acc, &v| acc.min(v));
        let max = values.fold_axis(Axis(0), f32::NEG_INFINITY, |&acc, &v| acc.max(v));

        for (k, (lo, hi)) in min.iter().zip(&max).enumerate() {
            if lo == hi {
                warn!(column = k, value = *lo; "label column has zero range");
            }
        }

        Self::new(min, max)
    }

    pub fn min(&self) -> ArrayView1<'_, f32> {
        self.min.view()
    }

    pub fn max(&self) -> ArrayView1<'_, f32> {
        self.max.view()
    }

    /// Returns the amount of columns these statistics cover.
    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// Maps physical values into the network's `[-0.5, 0.5]` space.
    ///
    /// A zero-range column maps to `0`.
    pub fn normalize(&self, values: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_columns(values.ncols())?;

        let mut out = values.to_owned();
        for mut row in out.rows_mut() {
            Zip::from(&mut row)
                .and(&self.min)
                .and(&self.max)
                .for_each(|v, &lo, &hi| {
                    let range = hi - lo;
                    *v = if range > 0. { (*v - lo) / range - 0.5 } else { 0. };
                });
        }

        Ok(out)
    }

    /// Rescales normalized network outputs back to physical units:
    /// `pred[i, k] = (p[i, k] + 0.5) * (max[k] - min[k]) + min[k]`.
    ///
    /// # Arguments
    /// * `preds` - The normalized predictions, one sample per row.
    ///
    /// # Returns
    /// The physical-scale predictions, with the same shape as `preds`, or an error if the
    /// column count doesn't match the statistics.
    pub fn denormalize(&self, preds: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_columns(preds.ncols())?;

        let range = &self.max - &self.min;
        Ok((&preds + 0.5) * &range + &self.min)
    }

    fn check_columns(&self, ncols: usize) -> Result<()> {
        if ncols != self.len() {
            return Err(MlErr::SizeMismatch {
                what: "label columns",
                got: ncols,
                expected: self.len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    use super::*;

    #[test]
    fn denormalize_known_points() {
        let stats = MinMax::new(array![0.], array![10.]).unwrap();
        let preds = array![[0.], [-0.5], [0.5]];

        let out = stats.denormalize(preds.view()).unwrap();

        assert_eq!(out, array![[5.], [0.], [10.]]);
    }

    #[test]
    fn denormalize_keeps_shape() {
        let stats = MinMax::new(array![0., -5., 2.], array![1., 5., 4.]).unwrap();
        let preds = Array2::<f32>::zeros((7, 3));

        let out = stats.denormalize(preds.view()).unwrap();

        assert_eq!(out.dim(), (7, 3));
        assert_eq!(out.row(0), array![0.5, 0., 3.]);
    }

    #[test]
    fn normalize_then_denormalize_recovers_values() {
        let values = array![
            [-180., 12.5, 0.003],
            [179.5, -40., 0.25],
            [3.25, 7., -0.75],
            [90., 0., 0.]
        ];
        let stats = MinMax::fit(values.view()).unwrap();

        let normalized = stats.normalize(values.view()).unwrap();
        assert!(normalized.iter().all(|v| (-0.5..=0.5).contains(v)));

        let back = stats.denormalize(normalized.view()).unwrap();
        for (a, b) in back.iter().zip(values.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn fit_takes_column_extremes() {
        let values = array![[1., -2.], [4., 8.], [-3., 0.]];
        let stats = MinMax::fit(values.view()).unwrap();

        assert_eq!(stats.min(), array![-3., -2.]);
        assert_eq!(stats.max(), array![4., 8.]);
    }

    #[test]
    fn zero_range_column_maps_to_center_and_back_to_min() {
        let values = array![[2., 0.], [2., 1.]];
        let stats = MinMax::fit(values.view()).unwrap();

        let normalized = stats.normalize(values.view()).unwrap();
        assert_eq!(normalized.column(0), array![0., 0.]);

        let back = stats.denormalize(normalized.view()).unwrap();
        assert_eq!(back.column(0), array![2., 2.]);
    }

    #[test]
    fn disjoint_partitions_give_distinct_statistics() {
        let train = array![[0.], [10.], [5.]];
        let test = array![[100.], [120.]];

        let train_stats = MinMax::fit(train.view()).unwrap();
        let test_stats = MinMax::fit(test.view()).unwrap();
        assert_ne!(train_stats, test_stats);

        let preds = array![[0.5]];
        let with_train = train_stats.denormalize(preds.view()).unwrap();
        let with_test = test_stats.denormalize(preds.view()).unwrap();
        assert_eq!(with_train, array![[10.]]);
        assert_eq!(with_test, array![[120.]]);
    }

    #[test]
    fn column_count_mismatch_is_an_error() {
        let stats = MinMax::new(array![0., 0.], array![1., 1.]).unwrap();
        let preds = array![[0., 0., 0.]];

        assert!(matches!(
            stats.denormalize(preds.view()),
            Err(MlErr::SizeMismatch { got: 3, expected: 2, .. })
        ));
    }

    #[test]
    fn fit_rejects_empty_training_set() {
        let values = Array2::<f32>::zeros((0, 5));
        assert!(matches!(
            MinMax::fit(values.view()),
            Err(MlErr::EmptyInput { .. })
        ));
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert!(matches!(
            MinMax::new(array![1.], array![0.]),
            Err(MlErr::InvalidSpec(_))
        ));
    }

    #[test]
    fn fit_rejects_non_finite_labels() {
        let partly_nan = array![[f32::NAN, 1.], [2., 3.]];
        assert!(matches!(
            MinMax::fit(partly_nan.view()),
            Err(MlErr::NonFinite { column: 0, .. })
        ));

        let infinite = array![[0., 1.], [2., f32::INFINITY]];
        assert!(matches!(
            MinMax::fit(infinite.view()),
            Err(MlErr::NonFinite { column: 1, .. })
        ));
    }

    #[test]
    fn new_rejects_nan_bounds() {
        assert!(matches!(
            MinMax::new(array![0., f32::NAN], array![1., 1.]),
            Err(MlErr::NonFinite { column: 1, .. })
        ));
    }
}
