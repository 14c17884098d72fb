use ml_core::MlError;
use ndarray::{Array2, ArrayView2};

use super::Dense;
use crate::arch::{LayerSpec, activations::ActFn};

#[derive(Clone, Debug)]
pub enum Layer {
    Dense(Dense),
}

impl Layer {
    pub fn dense(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(dim, act_fn))
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Dense(l) => l.size(),
        }
    }

    /// The input and output widths of the layer.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Self::Dense(l) => l.dim(),
        }
    }

    pub fn forward(&self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>, MlError> {
        match self {
            Self::Dense(l) => l.forward(params, x),
        }
    }

    pub fn spec(&self) -> LayerSpec {
        match self {
            Self::Dense(l) => LayerSpec::Dense {
                dim: l.dim(),
                act_fn: l.act_fn().map(ActFn::spec),
            },
        }
    }
}

impl From<LayerSpec> for Layer {
    fn from(spec: LayerSpec) -> Self {
        match spec {
            LayerSpec::Dense { dim, act_fn } => Self::dense(dim, act_fn.map(ActFn::from)),
        }
    }
}
