use std::{io, path::Path};

use log::{debug, info};
use ndarray::{Array4, ArrayD, Axis, Ix4, IxDyn, ShapeBuilder, concatenate};
use npyz::{AutoSerialize, NpyFile, Order, npz::NpzArchive};

use crate::{DataErr, Result};

/// Reads and concatenates sample archives along the observation axis.
///
/// # Arguments
/// * `paths` - The `.npz` archives, read in order.
/// * `array` - The name of the array holding the samples, or `None` if every archive holds
///   exactly one array.
///
/// # Returns
/// An `N x H x W x C` tensor. Rank 3 arrays are read as single channel.
pub fn load_samples<P: AsRef<Path>>(paths: &[P], array: Option<&str>) -> Result<Array4<f32>> {
    if paths.is_empty() {
        return Err(DataErr::NoInput("sample archive"));
    }

    let mut parts = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let part = read_archive(path, array)?;

        if let Some(first) = parts.first() {
            let expected = observation_shape(first);
            let got = observation_shape(&part);

            if got != expected {
                return Err(DataErr::SampleShapeMismatch {
                    path: path.to_path_buf(),
                    got,
                    expected,
                });
            }
        }

        debug!(rows = part.len_of(Axis(0)); "read sample archive {}", path.display());
        parts.push(part);
    }

    let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
    let samples = concatenate(Axis(0), &views)?;

    info!(
        "loaded {} samples of shape {:?} from {} archive(s)",
        samples.len_of(Axis(0)),
        observation_shape(&samples),
        paths.len()
    );
    Ok(samples)
}

fn observation_shape(samples: &Array4<f32>) -> Vec<usize> {
    samples.shape()[1..].to_vec()
}

fn read_archive(path: &Path, array: Option<&str>) -> Result<Array4<f32>> {
    let io_err = |source| DataErr::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut archive = NpzArchive::open(path).map_err(io_err)?;

    let name = match array {
        Some(name) => name.to_string(),
        None => {
            let names: Vec<String> = archive.array_names().map(str::to_string).collect();
            match <[String; 1]>::try_from(names) {
                Ok([name]) => name,
                Err(names) => {
                    return Err(DataErr::AmbiguousArchive {
                        path: path.to_path_buf(),
                        names,
                    });
                }
            }
        }
    };

    let file = archive
        .by_name(&name)
        .map_err(io_err)?
        .ok_or_else(|| DataErr::MissingArray {
            path: path.to_path_buf(),
            name: name.clone(),
        })?;

    let shape: Vec<usize> = file.shape().iter().map(|&d| d as usize).collect();
    let fortran = file.order() == Order::Fortran;
    let data = read_values(file).map_err(io_err)?;

    let dim = IxDyn(&shape);
    let values = if fortran {
        ArrayD::from_shape_vec(dim.f(), data)?
    } else {
        ArrayD::from_shape_vec(dim, data)?
    };

    let values = match shape.len() {
        3 => values.insert_axis(Axis(3)),
        4 => values,
        rank => {
            return Err(DataErr::UnsupportedRank {
                path: path.to_path_buf(),
                rank,
            });
        }
    };

    Ok(values.into_dimensionality::<Ix4>()?.as_standard_layout().into_owned())
}

/// Reads every element as `f32`, narrowing `f64` archives.
fn read_values<R: io::Read>(file: NpyFile<R>) -> io::Result<Vec<f32>> {
    if file.dtype() == f64::default_dtype() {
        Ok(file.into_vec::<f64>()?.into_iter().map(|v| v as f32).collect())
    } else {
        file.into_vec::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use npyz::{WriterBuilder, npz::NpzWriter};

    use super::*;

    fn write_npz<T: AutoSerialize + Copy>(
        path: &Path,
        arrays: &[(&str, Vec<u64>, Vec<T>)],
    ) -> PathBuf {
        let mut npz = NpzWriter::create(path).unwrap();
        for (name, shape, data) in arrays {
            let mut writer = npz
                .array(name, Default::default())
                .unwrap()
                .default_dtype()
                .shape(shape)
                .begin_nd()
                .unwrap();
            writer.extend(data.iter().copied()).unwrap();
            writer.finish().unwrap();
        }
        path.to_path_buf()
    }

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn concatenates_archives_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_npz(&dir.path().join("a.npz"), &[("x", vec![2, 2, 3, 1], ramp(12))]);
        let b = write_npz(
            &dir.path().join("b.npz"),
            &[("x", vec![1, 2, 3, 1], vec![-1f32; 6])],
        );

        let samples = load_samples(&[a, b], Some("x")).unwrap();

        assert_eq!(samples.shape(), &[3, 2, 3, 1]);
        assert_eq!(samples[[1, 0, 0, 0]], 6.);
        assert_eq!(samples[[2, 1, 2, 0]], -1.);
    }

    #[test]
    fn single_array_is_picked_without_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_npz(&dir.path().join("a.npz"), &[("flow", vec![2, 2, 2], ramp(8))]);

        let samples = load_samples(&[path], None).unwrap();

        assert_eq!(samples.shape(), &[2, 2, 2, 1]);
        assert_eq!(samples[[1, 1, 0, 0]], 6.);
    }

    #[test]
    fn f64_archives_are_narrowed() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<f64> = vec![0.25, -1.5, 3., 4.];
        let path = write_npz(&dir.path().join("a.npz"), &[("x", vec![1, 2, 2], data)]);

        let samples = load_samples(&[path], None).unwrap();

        assert_eq!(samples.iter().copied().collect::<Vec<_>>(), vec![0.25, -1.5, 3., 4.]);
    }

    #[test]
    fn ambiguous_archive_needs_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_npz(
            &dir.path().join("a.npz"),
            &[("x", vec![1, 1, 1], vec![0f32]), ("y", vec![1, 1, 1], vec![1f32])],
        );

        assert!(matches!(
            load_samples(&[&path], None),
            Err(DataErr::AmbiguousArchive { .. })
        ));
        assert_eq!(load_samples(&[&path], Some("y")).unwrap()[[0, 0, 0, 0]], 1.);
        assert!(matches!(
            load_samples(&[&path], Some("z")),
            Err(DataErr::MissingArray { .. })
        ));
    }

    #[test]
    fn disagreeing_observation_shapes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_npz(&dir.path().join("a.npz"), &[("x", vec![1, 2, 2], ramp(4))]);
        let b = write_npz(&dir.path().join("b.npz"), &[("x", vec![1, 2, 3], ramp(6))]);

        assert!(matches!(
            load_samples(&[a, b], None),
            Err(DataErr::SampleShapeMismatch { .. })
        ));
    }

    #[test]
    fn unsupported_rank_and_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_npz(&dir.path().join("a.npz"), &[("x", vec![4, 2], ramp(8))]);

        assert!(matches!(
            load_samples(&[path], None),
            Err(DataErr::UnsupportedRank { rank: 2, .. })
        ));
        assert!(matches!(
            load_samples::<PathBuf>(&[], None),
            Err(DataErr::NoInput(_))
        ));
    }
}
