//! Weighted random choice between idle animations.

use rand::{
	Rng,
	distr::{Distribution, weighted::WeightedIndex},
};

/// Picks an index with probability proportional to its weight.
///
/// Zero weights are never picked. Returns `None` if there is nothing to pick from,
/// which includes the case where every weight is zero.
pub fn pick_weighted<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
	match WeightedIndex::<u32>::new(weights) {
		Ok(distribution) => Some(distribution.sample(rng)),
		Err(_) => None,
	}
}

#[cfg(test)]
mod tests {
	use rand::{SeedableRng, rngs::SmallRng};

	use super::*;

	#[test]
	fn test_equal_weights_split_evenly() {
		let mut rng = SmallRng::seed_from_u64(0x5eed);
		let mut counts = [0u32; 2];
		for _ in 0..20_000 {
			counts[pick_weighted(&[100, 100], &mut rng).unwrap()] += 1;
		}
		let ratio = f64::from(counts[0]) / f64::from(counts[1]);
		assert!((0.9..1.1).contains(&ratio), "{counts:?}");
	}

	#[test]
	fn test_zero_weight_is_never_picked() {
		let mut rng = SmallRng::seed_from_u64(1);
		for _ in 0..10_000 {
			assert_eq!(pick_weighted(&[0, 100], &mut rng), Some(1));
		}
	}

	#[test]
	fn test_nothing_to_pick() {
		let mut rng = SmallRng::seed_from_u64(2);
		assert_eq!(pick_weighted(&[], &mut rng), None);
		assert_eq!(pick_weighted(&[0, 0], &mut rng), None);
	}
}
