use std::{fmt, io, path::PathBuf};

use dataset::DataErr;
use machine_learning::MlErr;
use ml_core::MlError;
use ndarray::ShapeError;

/// All errors that can occur while evaluating a model.
#[derive(Debug)]
pub enum EvalError {
    /// Invalid configuration, caught before touching any data.
    InvalidConfig(String),
    /// The configuration file couldn't be read.
    ConfigIo { path: PathBuf, source: io::Error },
    /// The configuration file isn't valid JSON for an `EvalConfig`.
    ConfigJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The model doesn't fit the data it's evaluated on.
    Incompatible(String),
    Data(DataErr),
    Ml(MlErr),
    Model(MlError),
    Shape(ShapeError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::ConfigIo { path, source } => {
                write!(f, "cannot read config '{}': {source}", path.display())
            }
            Self::ConfigJson { path, source } => {
                write!(f, "invalid config '{}': {source}", path.display())
            }
            Self::Incompatible(msg) => write!(f, "model doesn't fit the data: {msg}"),
            Self::Data(e) => write!(f, "dataset error: {e}"),
            Self::Ml(e) => write!(f, "{e}"),
            Self::Model(e) => write!(f, "forward pass failed: {e}"),
            Self::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigJson { source, .. } => Some(source),
            Self::Data(e) => Some(e),
            Self::Ml(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataErr> for EvalError {
    fn from(e: DataErr) -> Self {
        Self::Data(e)
    }
}

impl From<MlErr> for EvalError {
    fn from(e: MlErr) -> Self {
        Self::Ml(e)
    }
}

impl From<MlError> for EvalError {
    fn from(e: MlError) -> Self {
        Self::Model(e)
    }
}

impl From<ShapeError> for EvalError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}
