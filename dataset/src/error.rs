use std::{error::Error, fmt, io, path::PathBuf};

use ndarray::ShapeError;

use crate::LabelColumn;

/// The dataset module's result type.
pub type Result<T> = std::result::Result<T, DataErr>;

/// Failures while loading or partitioning observations.
#[derive(Debug)]
pub enum DataErr {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    Shape(ShapeError),
    NoInput(&'static str),
    MissingArray {
        path: PathBuf,
        name: String,
    },
    AmbiguousArchive {
        path: PathBuf,
        names: Vec<String>,
    },
    UnsupportedRank {
        path: PathBuf,
        rank: usize,
    },
    SampleShapeMismatch {
        path: PathBuf,
        got: Vec<usize>,
        expected: Vec<usize>,
    },
    /// `row` counts data rows of `path` from 0, the header excluded.
    NonFiniteLabel {
        path: PathBuf,
        row: usize,
        column: LabelColumn,
        value: f32,
    },
    LengthMismatch {
        samples: usize,
        labels: usize,
    },
    TestSizeTooLarge {
        test: usize,
        total: usize,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for DataErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataErr::Io { path, source } => write!(f, "cannot read '{}': {source}", path.display()),
            DataErr::Csv { path, source } => {
                write!(f, "invalid label file '{}': {source}", path.display())
            }
            DataErr::Shape(e) => write!(f, "shape error: {e}"),
            DataErr::NoInput(what) => write!(f, "at least one {what} is required"),
            DataErr::MissingArray { path, name } => {
                write!(f, "archive '{}' has no array named '{name}'", path.display())
            }
            DataErr::AmbiguousArchive { path, names } => write!(
                f,
                "archive '{}' holds {} arrays ({}), the array name must be given",
                path.display(),
                names.len(),
                names.join(", ")
            ),
            DataErr::UnsupportedRank { path, rank } => write!(
                f,
                "samples in '{}' have rank {rank}, expected N x H x W [x C]",
                path.display()
            ),
            DataErr::SampleShapeMismatch {
                path,
                got,
                expected,
            } => write!(
                f,
                "samples in '{}' have shape {got:?} per observation, expected {expected:?}",
                path.display()
            ),
            DataErr::NonFiniteLabel {
                path,
                row,
                column,
                value,
            } => write!(
                f,
                "label file '{}' row {row} has a non-finite {column} ({value})",
                path.display()
            ),
            DataErr::LengthMismatch { samples, labels } => {
                write!(f, "there are {samples} samples but {labels} label rows")
            }
            DataErr::TestSizeTooLarge { test, total } => {
                write!(f, "test size ({test}) exceeds the number of observations ({total})")
            }
            DataErr::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for {len} observations")
            }
        }
    }
}

impl Error for DataErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataErr::Io { source, .. } => Some(source),
            DataErr::Csv { source, .. } => Some(source),
            DataErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for DataErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}
