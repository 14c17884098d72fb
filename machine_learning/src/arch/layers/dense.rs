use ml_core::MlError;
use ndarray::prelude::*;

use crate::arch::activations::ActFn;

/// A fully connected layer that reads its weights and biases from a flat parameter slice.
///
/// The slice holds the `n x m` weight matrix in row-major order followed by the `m` biases.
#[derive(Clone, Debug)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The input and output widths of the layer.
    /// * `act_fn` - The activation applied to the affine output, if any.
    ///
    /// # Returns
    /// A new `Dense` instance.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
        }
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn act_fn(&self) -> Option<&ActFn> {
        self.act_fn.as_ref()
    }

    /// Computes `act_fn(x · W + b)` for a batch of rows.
    ///
    /// # Arguments
    /// * `params` - This layer's slice of parameters.
    /// * `x` - The input batch, one sample per row.
    ///
    /// # Returns
    /// The output batch or an error if `params` or `x` have the wrong size.
    pub fn forward(&self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>, MlError> {
        if x.ncols() != self.dim.0 {
            return Err(MlError::ShapeMismatch {
                what: "dense input",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params)?;
        let mut z = x.dot(&w);
        z += &b;

        if let Some(act_fn) = &self.act_fn {
            z.mapv_inplace(|z| act_fn.f(z));
        }

        Ok(z)
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// A tuple containing the weights and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>), MlError> {
        if params.len() != self.size {
            return Err(MlError::ShapeMismatch {
                what: "dense params",
                got: params.len(),
                expected: self.size,
            });
        }

        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size])
            .map_err(|_| MlError::InvalidInput("dense weights are not contiguous"))?;
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..])
            .map_err(|_| MlError::InvalidInput("dense biases are not contiguous"))?;

        Ok((weights, biases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_affine_without_activation() {
        // w = [[1, 2], [3, 4]], b = [0.5, -1]
        let params = [1., 2., 3., 4., 0.5, -1.];
        let layer = Dense::new((2, 2), None);
        let x = array![[1., 1.], [0., 2.]];

        let y = layer.forward(&params, x.view()).unwrap();

        assert_eq!(y, array![[4.5, 5.], [6.5, 7.]]);
    }

    #[test]
    fn forward_applies_activation() {
        let params = [-1., 0.];
        let layer = Dense::new((1, 1), Some(ActFn::Relu));
        let x = array![[2.], [-3.]];

        let y = layer.forward(&params, x.view()).unwrap();

        assert_eq!(y, array![[0.], [3.]]);
    }

    #[test]
    fn forward_rejects_wrong_param_count() {
        let layer = Dense::new((2, 1), None);
        let x = array![[1., 1.]];

        let err = layer.forward(&[1., 2.], x.view()).unwrap_err();

        assert_eq!(
            err,
            MlError::ShapeMismatch {
                what: "dense params",
                got: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn forward_rejects_wrong_input_width() {
        let layer = Dense::new((3, 1), None);
        let x = array![[1., 1.]];

        assert!(layer.forward(&[0.; 4], x.view()).is_err());
    }
}
