use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{MlErr, Result};

/// Wraps a difference of two periodic quantities onto its shortest equivalent,
/// `((d + period / 2) mod period) - period / 2`.
///
/// # Arguments
/// * `d` - The raw difference.
/// * `period` - The natural period of the quantity (e.g. 360 for degrees).
///
/// # Returns
/// A value in `[-period / 2, period / 2]`.
pub fn circular_diff(d: f32, period: f32) -> f32 {
    let half = period / 2.;
    (d + half).rem_euclid(period) - half
}

/// Declares which columns of a prediction matrix hold periodic quantities and how their errors
/// should be measured.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularCorrection {
    period: f32,
    columns: Vec<usize>,
    reflect: bool,
}

impl CircularCorrection {
    /// Creates a new `CircularCorrection`.
    ///
    /// # Arguments
    /// * `period` - The natural period shared by the circular columns.
    /// * `columns` - The indices of the circular columns.
    ///
    /// # Returns
    /// A new `CircularCorrection` or an error if the period isn't finite and positive.
    pub fn new<I>(period: f32, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        if !period.is_finite() || period <= 0. {
            return Err(MlErr::InvalidPeriod(period));
        }

        let mut columns: Vec<_> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();

        Ok(Self {
            period,
            columns,
            reflect: false,
        })
    }

    /// Reflects predictions that fall outside `[-period / 2, period / 2]` back into range before
    /// differencing them.
    pub fn with_reflection(mut self, reflect: bool) -> Self {
        self.reflect = reflect;
        self
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn reflects(&self) -> bool {
        self.reflect
    }

    fn reflect(&self, p: f32) -> f32 {
        let half = self.period / 2.;
        if p > half {
            self.period - p
        } else if p < -half {
            -self.period - p
        } else {
            p
        }
    }
}

/// Per-column errors of a prediction matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnErrors {
    per_column: Array1<f32>,
}

impl ColumnErrors {
    pub fn new(per_column: Array1<f32>) -> Self {
        Self { per_column }
    }

    pub fn per_column(&self) -> ArrayView1<'_, f32> {
        self.per_column.view()
    }

    pub fn get(&self, column: usize) -> Option<f32> {
        self.per_column.get(column).copied()
    }

    /// The mean of the per-column errors.
    pub fn overall(&self) -> f32 {
        self.per_column.mean().unwrap_or_default()
    }
}

/// Computes `y_pred - y`, correcting the declared circular columns.
///
/// # Errors
/// Returns `MlErr::SizeMismatch` if the shapes differ or a circular column is out of range, and
/// `MlErr::EmptyInput` if there are no rows.
pub fn differences(
    y_pred: ArrayView2<f32>,
    y: ArrayView2<f32>,
    correction: Option<&CircularCorrection>,
) -> Result<Array2<f32>> {
    if y_pred.ncols() != y.ncols() {
        return Err(MlErr::SizeMismatch {
            what: "prediction columns",
            got: y_pred.ncols(),
            expected: y.ncols(),
        });
    }

    if y_pred.nrows() != y.nrows() {
        return Err(MlErr::SizeMismatch {
            what: "prediction rows",
            got: y_pred.nrows(),
            expected: y.nrows(),
        });
    }

    if y.nrows() == 0 {
        return Err(MlErr::EmptyInput { what: "predictions" });
    }

    let mut d = &y_pred - &y;

    let Some(correction) = correction else {
        return Ok(d);
    };

    for &k in correction.columns() {
        if k >= d.ncols() {
            return Err(MlErr::SizeMismatch {
                what: "circular column index",
                got: k,
                expected: d.ncols(),
            });
        }

        let mut column = d.column_mut(k);
        if correction.reflects() {
            let reflected = y_pred.column(k).mapv(|p| correction.reflect(p));
            column.assign(&(&reflected - &y.column(k)));
        }

        column.mapv_inplace(|d| circular_diff(d, correction.period()));
    }

    Ok(d)
}

/// Mean absolute error per column.
pub fn mae(
    y_pred: ArrayView2<f32>,
    y: ArrayView2<f32>,
    correction: Option<&CircularCorrection>,
) -> Result<ColumnErrors> {
    let d = differences(y_pred, y, correction)?;
    column_means(d.mapv(f32::abs))
}

/// Mean squared error per column.
pub fn mse(
    y_pred: ArrayView2<f32>,
    y: ArrayView2<f32>,
    correction: Option<&CircularCorrection>,
) -> Result<ColumnErrors> {
    let d = differences(y_pred, y, correction)?;
    column_means(d.mapv(|d| d.powi(2)))
}

fn column_means(errors: Array2<f32>) -> Result<ColumnErrors> {
    let per_column = errors
        .mean_axis(Axis(0))
        .ok_or(MlErr::EmptyInput { what: "predictions" })?;

    Ok(ColumnErrors::new(per_column))
}
