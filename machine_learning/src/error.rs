use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ml_core::MlError;
use safetensors::SafeTensorError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyInput {
        what: &'static str,
    },
    InvalidSpec(String),
    NonFinite {
        what: &'static str,
        column: usize,
    },
    InvalidPeriod(f32),
    Distribution(String),
    Checkpoint(String),
    SafeTensors(SafeTensorError),
    Json(serde_json::Error),
    Model(MlError),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::EmptyInput { what } => write!(f, "The {what} must not be empty"),
            MlErr::InvalidSpec(msg) => write!(f, "Invalid model specification: {msg}"),
            MlErr::NonFinite { what, column } => {
                write!(f, "The {what} hold a NaN or infinite value in column {column}")
            }
            MlErr::InvalidPeriod(period) => write!(
                f,
                "The circular period must be finite and positive, got {period}"
            ),
            MlErr::Distribution(msg) => write!(f, "Invalid distribution: {msg}"),
            MlErr::Checkpoint(msg) => write!(f, "Invalid checkpoint: {msg}"),
            MlErr::SafeTensors(e) => write!(f, "safetensors error: {e}"),
            MlErr::Json(e) => write!(f, "json error: {e}"),
            MlErr::Model(e) => write!(f, "model error: {e}"),
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::SafeTensors(e) => Some(e),
            MlErr::Json(e) => Some(e),
            MlErr::Model(e) => Some(e),
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SafeTensorError> for MlErr {
    fn from(value: SafeTensorError) -> Self {
        Self::SafeTensors(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<MlError> for MlErr {
    fn from(value: MlError) -> Self {
        Self::Model(value)
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
