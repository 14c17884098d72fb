use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{DataErr, Result};

/// A train/test split of `total` observation indices.
///
/// Properties:
/// - `train` and `test` are disjoint and together cover `[0..total)`.
/// - `test` holds exactly the requested amount of indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Partition {
    #[inline]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    #[inline]
    pub fn test(&self) -> &[usize] {
        &self.test
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.train.len() + self.test.len()
    }
}

/// Shuffles `[0..total)` with a generator seeded by `seed` and splits off the last `test_count`
/// indices as the test set.
///
/// The result depends only on the arguments, so the same seed always yields the same split.
///
/// # Errors
/// Returns `DataErr::TestSizeTooLarge` if `test_count > total`.
pub fn partition(total: usize, test_count: usize, seed: u64) -> Result<Partition> {
    if test_count > total {
        return Err(DataErr::TestSizeTooLarge {
            test: test_count,
            total,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..total).collect();
    indices.shuffle(&mut rng);

    let test = indices.split_off(total - test_count);
    Ok(Partition {
        train: indices,
        test,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn partition_is_disjoint_and_covering() {
        let p = partition(100, 30, 5).unwrap();

        assert_eq!(p.train().len(), 70);
        assert_eq!(p.test().len(), 30);
        assert_eq!(p.total(), 100);

        let train: HashSet<_> = p.train().iter().copied().collect();
        let test: HashSet<_> = p.test().iter().copied().collect();
        assert!(train.is_disjoint(&test));

        let all: HashSet<_> = train.union(&test).copied().collect();
        assert_eq!(all, (0..100).collect());
    }

    #[test]
    fn same_seed_same_partition() {
        assert_eq!(partition(50, 10, 42).unwrap(), partition(50, 10, 42).unwrap());
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        assert_ne!(partition(50, 10, 1).unwrap(), partition(50, 10, 2).unwrap());
    }

    #[test]
    fn edge_sizes() {
        let p = partition(4, 0, 0).unwrap();
        assert!(p.test().is_empty());
        assert_eq!(p.train().len(), 4);

        let p = partition(4, 4, 0).unwrap();
        assert!(p.train().is_empty());
        assert_eq!(p.test().len(), 4);
    }

    #[test]
    fn test_size_larger_than_total() {
        assert!(matches!(
            partition(3, 4, 0),
            Err(DataErr::TestSizeTooLarge { test: 4, total: 3 })
        ));
    }
}
