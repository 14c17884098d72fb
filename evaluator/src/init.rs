use std::{fs, path::Path};

use log::info;
use machine_learning::arch::{Checkpoint, ModelSpec, Sequential};

use crate::EvalError;

/// Writes an untrained checkpoint for the architecture described in `architecture`.
///
/// # Arguments
/// * `architecture` - A JSON `ModelSpec` file.
/// * `out` - Where to write the checkpoint.
/// * `seed` - Seeds the weight initialization.
///
/// # Errors
/// Returns an `EvalError` if the architecture can't be read or is invalid, or the checkpoint
/// can't be written.
pub fn init_checkpoint(
    architecture: &Path,
    out: &Path,
    seed: u64,
) -> Result<Checkpoint, EvalError> {
    let content = fs::read_to_string(architecture).map_err(|source| EvalError::ConfigIo {
        path: architecture.to_path_buf(),
        source,
    })?;

    let spec: ModelSpec =
        serde_json::from_str(&content).map_err(|source| EvalError::ConfigJson {
            path: architecture.to_path_buf(),
            source,
        })?;

    let checkpoint = Checkpoint::init(Sequential::from_spec(&spec)?, seed)?;
    checkpoint.save(out)?;

    info!(
        "initialized {} parameters into {}",
        checkpoint.params().len(),
        out.display()
    );
    Ok(checkpoint)
}
