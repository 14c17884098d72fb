use ndarray::{Array4, ArrayView4, Axis};

use crate::{DataErr, Labels, Partition, Result};

/// Samples paired row by row with their labels.
#[derive(Debug, Clone)]
pub struct Observations {
    samples: Array4<f32>,
    labels: Labels,
}

impl Observations {
    /// Creates a new `Observations` instance.
    ///
    /// # Errors
    /// Returns `DataErr::LengthMismatch` if the number of samples and label rows differ.
    pub fn new(samples: Array4<f32>, labels: Labels) -> Result<Self> {
        let n = samples.len_of(Axis(0));
        if n != labels.len() {
            return Err(DataErr::LengthMismatch {
                samples: n,
                labels: labels.len(),
            });
        }

        Ok(Self { samples, labels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> ArrayView4<'_, f32> {
        self.samples.view()
    }

    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Splits the observations into `(train, test)`, moving samples and labels in lockstep.
    pub fn split(&self, partition: &Partition) -> Result<(Observations, Observations)> {
        Ok((self.select(partition.train())?, self.select(partition.test())?))
    }

    fn select(&self, indices: &[usize]) -> Result<Observations> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(DataErr::IndexOutOfBounds { index, len });
        }

        Ok(Observations {
            samples: self.samples.select(Axis(0), indices),
            labels: self.labels.select(indices),
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array4};

    use super::*;
    use crate::{LabelColumn, partition};

    /// Every sample is filled with its row index, and so is its label.
    fn tagged(n: usize) -> Observations {
        let samples = Array4::from_shape_fn((n, 2, 2, 1), |(i, ..)| i as f32);
        let values = Array2::from_shape_fn((n, 2), |(i, k)| if k == 0 { i as f32 } else { -(i as f32) });
        let labels = Labels::new(vec![LabelColumn::HeadingX, LabelColumn::RotX], values).unwrap();

        Observations::new(samples, labels).unwrap()
    }

    #[test]
    fn split_keeps_samples_and_labels_aligned() {
        let observations = tagged(20);
        let partition = partition(20, 6, 3).unwrap();

        let (train, test) = observations.split(&partition).unwrap();

        assert_eq!(train.len(), 14);
        assert_eq!(test.len(), 6);

        for part in [&train, &test] {
            let labels = part.labels().values();
            for (sample, label) in part.samples().outer_iter().zip(labels.rows()) {
                assert!(sample.iter().all(|&v| v == label[0]));
                assert_eq!(label[1], -label[0]);
            }
        }

        let test_tags: Vec<usize> = test
            .labels()
            .values()
            .column(0)
            .iter()
            .map(|&v| v as usize)
            .collect();
        assert_eq!(test_tags, partition.test());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let samples = Array4::zeros((3, 1, 1, 1));
        let labels = Labels::new(vec![LabelColumn::RotZ], Array2::zeros((2, 1))).unwrap();

        assert!(matches!(
            Observations::new(samples, labels),
            Err(DataErr::LengthMismatch { samples: 3, labels: 2 })
        ));
    }

    #[test]
    fn partition_for_other_length_is_rejected() {
        let observations = tagged(4);
        let partition = partition(10, 2, 0).unwrap();

        assert!(matches!(
            observations.split(&partition),
            Err(DataErr::IndexOutOfBounds { len: 4, .. })
        ));
    }
}
