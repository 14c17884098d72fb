use ndarray::ArrayView2;

/// A loss over predictions and targets expressed in the network's normalized space.
pub trait LossFn {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;
}
