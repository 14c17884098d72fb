use std::{borrow::Cow, collections::HashMap, fs, path::Path};

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use safetensors::{Dtype, SafeTensors, View, serialize};

use super::{ModelSpec, Sequential};
use crate::{MlErr, Result};

/// Metadata key holding the JSON encoded `ModelSpec`.
pub const ARCHITECTURE_KEY: &str = "architecture";

/// A network together with its trained parameters, as stored on disk.
///
/// The file is a safetensors container: the architecture travels as JSON in the header metadata
/// and every dense layer `i` contributes a `layers.{i}.weight` tensor of shape `[n, m]` and a
/// `layers.{i}.bias` tensor of shape `[m]`.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    model: Sequential,
    params: Vec<f32>,
}

impl Checkpoint {
    /// Creates a new `Checkpoint`.
    ///
    /// # Returns
    /// An error if `params` doesn't match the size of `model`.
    pub fn new(model: Sequential, params: Vec<f32>) -> Result<Self> {
        if params.len() != model.size() {
            return Err(MlErr::SizeMismatch {
                what: "checkpoint params",
                got: params.len(),
                expected: model.size(),
            });
        }

        Ok(Self { model, params })
    }

    /// Creates an untrained checkpoint for `model`, its parameters drawn from a generator seeded
    /// with `seed`.
    pub fn init(model: Sequential, seed: u64) -> Result<Self> {
        let params = model.init_params(&mut StdRng::seed_from_u64(seed))?;
        debug!(seed = seed, params = params.len(); "initialized parameters");
        Self::new(model, params)
    }

    /// Reads a checkpoint from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("loading checkpoint from {}", path.display());

        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Writes this checkpoint to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("saving checkpoint to {}", path.display());

        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (_, metadata) = SafeTensors::read_metadata(bytes)?;
        let architecture = metadata
            .metadata()
            .as_ref()
            .and_then(|m| m.get(ARCHITECTURE_KEY))
            .ok_or_else(|| MlErr::Checkpoint(format!("missing `{ARCHITECTURE_KEY}` metadata")))?;

        let spec: ModelSpec = serde_json::from_str(architecture)?;
        let model = Sequential::from_spec(&spec)?;

        let tensors = SafeTensors::deserialize(bytes)?;
        let mut params = Vec::with_capacity(model.size());

        for (i, layer) in model.layers().iter().enumerate() {
            let (n, m) = layer.dim();
            params.extend(read_tensor(&tensors, &format!("layers.{i}.weight"), &[n, m])?);
            params.extend(read_tensor(&tensors, &format!("layers.{i}.bias"), &[m])?);
        }

        debug!(layers = model.layers().len(), params = params.len(); "checkpoint decoded");
        Self::new(model, params)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut tensors = Vec::with_capacity(2 * self.model.layers().len());
        let mut rest = self.params.as_slice();

        for (i, layer) in self.model.layers().iter().enumerate() {
            let (n, m) = layer.dim();
            let (weights, tail) = rest.split_at(n * m);
            let (biases, tail) = tail.split_at(m);
            rest = tail;

            tensors.push((format!("layers.{i}.weight"), F32Tensor::new(vec![n, m], weights)));
            tensors.push((format!("layers.{i}.bias"), F32Tensor::new(vec![m], biases)));
        }

        let architecture = serde_json::to_string(&self.model.spec())?;
        let metadata = HashMap::from([(ARCHITECTURE_KEY.to_string(), architecture)]);

        Ok(serialize(tensors, &Some(metadata))?)
    }

    pub fn model(&self) -> &Sequential {
        &self.model
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn into_parts(self) -> (Sequential, Vec<f32>) {
        (self.model, self.params)
    }
}

/// Reads a tensor as `f32`, checking its shape.
fn read_tensor(tensors: &SafeTensors<'_>, name: &str, shape: &[usize]) -> Result<Vec<f32>> {
    let view = tensors.tensor(name)?;

    if view.shape() != shape {
        return Err(MlErr::Checkpoint(format!(
            "tensor `{name}` has shape {:?}, expected {shape:?}",
            view.shape()
        )));
    }

    let data = view.data();
    let values = match view.dtype() {
        Dtype::F32 => data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        Dtype::F16 => data
            .chunks_exact(2)
            .map(|b| half::f16::from_le_bytes([b[0], b[1]]).to_f32())
            .collect(),
        Dtype::F64 => data
            .chunks_exact(8)
            .map(|b| {
                let mut raw = [0; 8];
                raw.copy_from_slice(b);
                f64::from_le_bytes(raw) as f32
            })
            .collect(),
        dtype => {
            return Err(MlErr::Checkpoint(format!(
                "tensor `{name}` has unsupported dtype {dtype:?}"
            )));
        }
    };

    Ok(values)
}

/// An owned little endian `f32` tensor ready to be serialized.
struct F32Tensor {
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl F32Tensor {
    fn new(shape: Vec<usize>, values: &[f32]) -> Self {
        let data: Vec<u8> = if cfg!(target_endian = "little") {
            bytemuck::cast_slice(values).to_vec()
        } else {
            values.iter().flat_map(|v| v.to_le_bytes()).collect()
        };

        Self { shape, data }
    }
}

impl View for F32Tensor {
    fn dtype(&self) -> Dtype {
        Dtype::F32
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn data(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }

    fn data_len(&self) -> usize {
        self.data.len()
    }
}
