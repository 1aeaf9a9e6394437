//! Train/test splitting
//!
//! Seeded shuffle-and-slice splitting of row indices. The same seed over the
//! same number of rows always yields the same partition, which is what makes
//! repeated training runs reproduce their metrics exactly.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split `n_rows` row indices into a train and test partition.
///
/// * `n_rows` - Total number of rows to partition.
/// * `test_size` - Fraction of rows held out, e.g. `0.2`.
/// * `seed` - Seed for the shuffle.
///
/// Returns `(train_index, test_index)`. The test partition is rounded up, so
/// it is never empty for a non-zero `test_size` on a non-empty dataset.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64) * test_size).ceil() as usize;
    let test_index = indices[..n_test].to_vec();
    let train_index = indices[n_test..].to_vec();
    (train_index, test_index)
}
