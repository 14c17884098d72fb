use std::{fmt, path::Path};

use log::{debug, info};
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::{DataErr, Result};

/// One row of a label file, as written by the dataset generator.
///
/// The rotation direction is a unit vector and `obs_rot_r` its rate.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawLabel {
    obs_heading_x: f32,
    obs_heading_y: f32,
    obs_rot_x: f32,
    obs_rot_y: f32,
    obs_rot_z: f32,
    obs_rot_r: f32,
}

/// An output column of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColumn {
    HeadingX,
    HeadingY,
    RotX,
    RotY,
    RotZ,
}

impl LabelColumn {
    /// Every column in the order the network emits them.
    pub const ALL: [LabelColumn; 5] = [
        LabelColumn::HeadingX,
        LabelColumn::HeadingY,
        LabelColumn::RotX,
        LabelColumn::RotY,
        LabelColumn::RotZ,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelColumn::HeadingX => "heading_x",
            LabelColumn::HeadingY => "heading_y",
            LabelColumn::RotX => "rot_x",
            LabelColumn::RotY => "rot_y",
            LabelColumn::RotZ => "rot_z",
        }
    }

    /// Extracts this column from a raw row, scaling rotation directions by their rate.
    fn extract(self, raw: &RawLabel) -> f32 {
        match self {
            LabelColumn::HeadingX => raw.obs_heading_x,
            LabelColumn::HeadingY => raw.obs_heading_y,
            LabelColumn::RotX => raw.obs_rot_r * raw.obs_rot_x,
            LabelColumn::RotY => raw.obs_rot_r * raw.obs_rot_y,
            LabelColumn::RotZ => raw.obs_rot_r * raw.obs_rot_z,
        }
    }
}

impl fmt::Display for LabelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ground-truth labels, one observation per row and one `LabelColumn` per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    columns: Vec<LabelColumn>,
    values: Array2<f32>,
}

impl Labels {
    /// Creates a new `Labels` instance.
    ///
    /// # Errors
    /// Returns `DataErr::Shape` if `values` doesn't have one column per entry of `columns`.
    pub fn new(columns: Vec<LabelColumn>, values: Array2<f32>) -> Result<Self> {
        if values.ncols() != columns.len() {
            return Err(DataErr::Shape(ndarray::ShapeError::from_kind(
                ndarray::ErrorKind::IncompatibleShape,
            )));
        }

        Ok(Self { columns, values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    #[inline]
    pub fn columns(&self) -> &[LabelColumn] {
        &self.columns
    }

    #[inline]
    pub fn values(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }

    /// Returns the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }
}

/// Reads and concatenates label files, deriving the selected `columns`.
///
/// # Arguments
/// * `paths` - The delimited label files, read in order. Columns are matched by header name and
///   unknown columns are ignored.
/// * `columns` - The output columns to derive, in order.
///
/// # Returns
/// The labels of every row of every file, or `DataErr::NonFiniteLabel` if a derived value is NaN
/// or infinite.
pub fn load_labels<P: AsRef<Path>>(paths: &[P], columns: &[LabelColumn]) -> Result<Labels> {
    if paths.is_empty() {
        return Err(DataErr::NoInput("label file"));
    }

    if columns.is_empty() {
        return Err(DataErr::NoInput("label column"));
    }

    let mut flat = Vec::new();
    let mut rows = 0;

    for path in paths {
        let path = path.as_ref();
        let csv_err = |source| DataErr::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let before = rows;

        for (row, record) in reader.deserialize::<RawLabel>().enumerate() {
            let raw = record.map_err(csv_err)?;

            for &column in columns {
                let value = column.extract(&raw);
                if !value.is_finite() {
                    return Err(DataErr::NonFiniteLabel {
                        path: path.to_path_buf(),
                        row,
                        column,
                        value,
                    });
                }

                flat.push(value);
            }

            rows += 1;
        }

        debug!(rows = rows - before; "read label file {}", path.display());
    }

    info!("loaded {rows} label rows from {} file(s)", paths.len());
    let values = Array2::from_shape_vec((rows, columns.len()), flat)?;
    Labels::new(columns.to_vec(), values)
}
