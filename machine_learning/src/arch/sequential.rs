use std::num::NonZeroUsize;

use ml_core::{MlError, Model};
use ndarray::{Array2, ArrayView2};
use rand::Rng;

use super::{LayerSpec, ModelSpec, layers::Layer};
use crate::{
    MlErr, Result,
    initialization::{ConstParamGen, ParamGen, RandParamGen},
};

/// A sequential model: information flows forward through its layers, each one reading its own
/// contiguous chunk of the flat parameter slice.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance or an error if the layers can't be chained together.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let layers: Vec<_> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(MlErr::InvalidSpec(
                "model must have at least one layer".into(),
            ));
        }

        for (i, layer) in layers.iter().enumerate() {
            let (n, m) = layer.dim();
            if n == 0 || m == 0 {
                return Err(MlErr::InvalidSpec(format!(
                    "layer {i}: dimensions must be greater than 0, got ({n}, {m})"
                )));
            }
        }

        // Adjacent layers must have compatible dimensions: prev.m == next.n
        for i in 1..layers.len() {
            let (_, prev_m) = layers[i - 1].dim();
            let (curr_n, _) = layers[i].dim();
            if prev_m != curr_n {
                return Err(MlErr::InvalidSpec(format!(
                    "layer {i}: input size ({curr_n}) does not match \
                     previous layer output size ({prev_m})"
                )));
            }
        }

        Ok(Self { layers })
    }

    /// Builds the model described by `spec`.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        match spec {
            ModelSpec::Sequential { layers } => Self::new(layers.iter().copied().map(Layer::from)),
        }
    }

    pub fn spec(&self) -> ModelSpec {
        ModelSpec::Sequential {
            layers: self.layers.iter().map(Layer::spec).collect::<Vec<LayerSpec>>(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the amount of parameters in the model.
    pub fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    /// Generates a fresh set of parameters: non-negative Glorot uniform weights and zero biases.
    ///
    /// # Arguments
    /// * `rng` - The source of randomness.
    ///
    /// # Returns
    /// The flat parameter vector, laid out the way `forward` expects it.
    pub fn init_params<R: Rng>(&self, rng: &mut R) -> Result<Vec<f32>> {
        let mut params = Vec::with_capacity(self.size());

        for layer in &self.layers {
            let (n, m) = layer.dim();
            let mut weight_gen = RandParamGen::glorot_uniform_non_negative(&mut *rng, n * m, n, m)?;
            let mut bias_gen = ConstParamGen::zeros(m);

            extend_from(&mut weight_gen, n * m, &mut params)?;
            extend_from(&mut bias_gen, m, &mut params)?;
        }

        Ok(params)
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input data, one flattened sample per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(
        &self,
        params: &[f32],
        x: ArrayView2<f32>,
    ) -> std::result::Result<Array2<f32>, MlError> {
        let size = self.size();
        if params.len() != size {
            return Err(MlError::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: size,
            });
        }

        let mut rest = params;
        let mut out: Option<Array2<f32>> = None;

        for layer in &self.layers {
            let (layer_params, tail) = rest.split_at(layer.size());
            rest = tail;

            out = Some(match &out {
                Some(a) => layer.forward(layer_params, a.view())?,
                None => layer.forward(layer_params, x)?,
            });
        }

        out.ok_or(MlError::InvalidInput("model has no layers"))
    }
}

/// Draws exactly `amount` parameters from `param_gen` into `params`.
fn extend_from<G: ParamGen>(param_gen: &mut G, amount: usize, params: &mut Vec<f32>) -> Result<()> {
    let sample = param_gen.sample_exact(amount).ok_or(MlErr::SizeMismatch {
        what: "generated params",
        got: 0,
        expected: amount,
    })?;

    params.extend(sample);
    Ok(())
}

impl Model for Sequential {
    type Input = Array2<f32>;
    type Output = Array2<f32>;

    fn num_params(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.size()).unwrap_or(NonZeroUsize::MIN)
    }

    fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.dim().0)
    }

    fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.dim().1)
    }

    fn forward(
        &self,
        weights: &[f32],
        input: &Array2<f32>,
    ) -> std::result::Result<Array2<f32>, MlError> {
        Sequential::forward(self, weights, input.view())
    }
}
