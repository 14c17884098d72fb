use std::num::NonZeroUsize;

use crate::MlError;

/// A pure computational model used for inference.
///
/// A `Model` defines how to evaluate a function given a flat parameter slice.
/// It does not:
/// - own parameters,
/// - access datasets,
/// - know how its outputs are scaled or scored.
pub trait Model {
    /// Input type consumed by the model.
    type Input;

    /// Output type produced by the model.
    type Output;

    /// Returns the number of scalar parameters expected in `weights`.
    fn num_params(&self) -> NonZeroUsize;

    /// Returns the width of a single flattened input row.
    fn input_size(&self) -> usize;

    /// Returns the width of a single output row.
    fn output_size(&self) -> usize;

    /// Computes the model output for a given input.
    ///
    /// # Errors
    /// Returns `MlError` if invariants are violated (e.g., shape mismatch).
    fn forward(&self, weights: &[f32], input: &Self::Input) -> Result<Self::Output, MlError>;
}
