use std::f32::consts::PI;

use ndarray::ArrayView2;

use super::LossFn;

/// Floor that keeps the loss strictly positive when predictions are exact.
const FLOOR: f32 = 1e-10;

/// Cosine loss for targets scaled to `[-0.5, 0.5]`.
///
/// The difference of two such values lies in `[-1, 1]`, so `0.5 * (1 - cos(pi * diff))` grows
/// from 0 at a perfect match to 1 at half a period away.
#[derive(Default, Clone, Copy, Debug)]
pub struct Circular;

impl Circular {
    /// Returns a new `Circular`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Circular {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        (&y_pred - &y)
            .mapv(|d| (0.5 * (1. - (PI * d).cos())).max(FLOOR))
            .mean()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn perfect_prediction_hits_the_floor() {
        let y = array![[0.1, -0.3]];
        assert_eq!(Circular.loss(y.view(), y.view()), FLOOR);
    }

    #[test]
    fn opposite_ends_cost_one() {
        let y_pred = array![[0.5]];
        let y = array![[-0.5]];

        assert_abs_diff_eq!(Circular.loss(y_pred.view(), y.view()), 1., epsilon = 1e-6);
    }

    #[test]
    fn quarter_period_costs_half() {
        let y_pred = array![[0.25]];
        let y = array![[-0.25]];

        assert_abs_diff_eq!(Circular.loss(y_pred.view(), y.view()), 0.5, epsilon = 1e-6);
    }
}
