//! Randomized train/test partitioning.

use rand::Rng;
use rand::seq::SliceRandom;

use super::vocabulary::EncodedSample;

/// Default fraction of samples assigned to the training partition.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;

/// Disjoint train/test partitions of one shuffled sample set.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<EncodedSample>,
    pub test: Vec<EncodedSample>,
}

/// Index at which a set of `n` samples is cut for `ratio`.
///
/// This is `floor(ratio * n)`, raised to one when the corpus is non-empty so a
/// classifier always has something to memorize. A single-sample corpus
/// therefore ends up with an empty test partition.
pub fn split_index(n: usize, ratio: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = (ratio * n as f64).floor();
    (raw as usize).clamp(1, n)
}

/// Shuffle `samples` with `rng` and cut them into train and test partitions.
pub fn split_train_test<R: Rng + ?Sized>(
    mut samples: Vec<EncodedSample>,
    ratio: f64,
    rng: &mut R,
) -> TrainTestSplit {
    samples.shuffle(rng);
    let cut = split_index(samples.len(), ratio);
    let test = samples.split_off(cut);
    TrainTestSplit {
        train: samples,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn samples(n: usize) -> Vec<EncodedSample> {
        (0..n)
            .map(|i| EncodedSample {
                features: vec![(i % 2) as u8, 1],
                label: i,
            })
            .collect()
    }

    #[test]
    fn split_index_follows_floor_of_ratio() {
        assert_eq!(split_index(50, 0.8), 40);
        assert_eq!(split_index(7, 0.8), 5);
        assert_eq!(split_index(2, 0.8), 1);
        assert_eq!(split_index(1, 0.8), 1);
        assert_eq!(split_index(0, 0.8), 0);
        assert_eq!(split_index(3, 0.1), 1);
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let split = split_train_test(samples(50), 0.8, &mut rng);
        assert_eq!(split.train.len(), 40);
        assert_eq!(split.test.len(), 10);
        let mut labels: Vec<usize> = split
            .train
            .iter()
            .chain(split.test.iter())
            .map(|sample| sample.label)
            .collect();
        labels.sort_unstable();
        assert_eq!(labels, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_gives_same_split() {
        let a = split_train_test(samples(20), 0.8, &mut StdRng::seed_from_u64(42));
        let b = split_train_test(samples(20), 0.8, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn different_seeds_can_give_different_splits() {
        let a = split_train_test(samples(50), 0.8, &mut StdRng::seed_from_u64(1));
        let differs = (2..20u64).any(|seed| {
            let b = split_train_test(samples(50), 0.8, &mut StdRng::seed_from_u64(seed));
            a.test != b.test
        });
        assert!(differs);
    }

    #[test]
    fn single_sample_leaves_test_empty() {
        let split = split_train_test(samples(1), 0.8, &mut StdRng::seed_from_u64(3));
        assert_eq!(split.train.len(), 1);
        assert!(split.test.is_empty());
    }
}
