use std::num::NonZeroUsize;

use log::debug;
use ml_core::Model;
use ndarray::{Array2, ArrayView4, Axis, concatenate, s};

use crate::EvalError;

/// Runs `model` over every sample, `batch_size` samples at a time.
///
/// Each `H x W x C` sample is flattened row-major into one input row.
///
/// # Returns
/// The stacked network outputs, one row per sample.
///
/// # Errors
/// Returns `EvalError::Incompatible` if the model's input width isn't `H * W * C`.
pub fn predict<M>(
    model: &M,
    params: &[f32],
    samples: ArrayView4<f32>,
    batch_size: NonZeroUsize,
) -> Result<Array2<f32>, EvalError>
where
    M: Model<Input = Array2<f32>, Output = Array2<f32>>,
{
    let (n, h, w, c) = samples.dim();
    let width = h * w * c;

    if model.input_size() != width {
        return Err(EvalError::Incompatible(format!(
            "model takes {} inputs but samples are {h} x {w} x {c} ({width} values)",
            model.input_size()
        )));
    }

    let mut outputs = Vec::with_capacity(n.div_ceil(batch_size.get()));

    for start in (0..n).step_by(batch_size.get()) {
        let end = (start + batch_size.get()).min(n);
        let batch = samples.slice(s![start..end, .., .., ..]);
        let x = batch.to_shape((end - start, width))?.into_owned();

        let y = model.forward(params, &x)?;
        if y.dim() != (end - start, model.output_size()) {
            return Err(EvalError::Incompatible(format!(
                "forward pass produced shape {:?} for a batch of {}",
                y.dim(),
                end - start
            )));
        }

        debug!(start = start, end = end; "predicted batch");
        outputs.push(y);
    }

    if outputs.is_empty() {
        return Ok(Array2::zeros((0, model.output_size())));
    }

    let views: Vec<_> = outputs.iter().map(|y| y.view()).collect();
    Ok(concatenate(Axis(0), &views)?)
}
