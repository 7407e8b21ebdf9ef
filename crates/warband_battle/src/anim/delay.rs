//! Randomized idle timer.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// A timer that fires after a random share of a base delay.
///
/// Every arming picks a duration in `[0.75 * base, 1.25 * base]`, so units sharing a
/// base delay drift apart instead of idling in lock-step.
#[derive(Debug, Clone)]
pub struct RandomizedDelay {
	base: u32,
	duration: u64,
	armed_at: Option<u64>,
	rng: SmallRng,
}

impl RandomizedDelay {
	/// Creates a disarmed timer seeded from the OS.
	pub fn new(base: u32) -> Self {
		Self::with_rng(base, SmallRng::from_os_rng())
	}

	/// Creates a disarmed timer with a fixed seed.
	pub fn with_seed(base: u32, seed: u64) -> Self {
		Self::with_rng(base, SmallRng::seed_from_u64(seed))
	}

	fn with_rng(base: u32, rng: SmallRng) -> Self {
		Self {
			base,
			duration: u64::from(base),
			armed_at: None,
			rng,
		}
	}

	/// Arms the timer if it is idle and returns true once the armed duration passed.
	///
	/// Firing disarms the timer; the next call arms it again with a new duration.
	pub fn check_delay(&mut self, now: u64) -> bool {
		match self.armed_at {
			None => {
				let base = u64::from(self.base);
				let low = base * 3 / 4;
				let high = base + base / 4;
				self.duration = self.rng.random_range(low..=high);
				self.armed_at = Some(now);
				false
			}
			Some(start) if now.saturating_sub(start) >= self.duration => {
				self.armed_at = None;
				true
			}
			Some(_) => false,
		}
	}

	/// Disarms the timer.
	pub fn reset(&mut self) {
		self.armed_at = None;
	}

	/// Returns true while the timer is counting.
	pub fn is_armed(&self) -> bool {
		self.armed_at.is_some()
	}

	/// Base delay in milliseconds.
	pub fn base(&self) -> u32 {
		self.base
	}

	/// Duration picked by the last arming.
	pub fn duration(&self) -> u64 {
		self.duration
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fires_within_randomized_window() {
		for seed in 0..50 {
			let mut delay = RandomizedDelay::with_seed(1000, seed);
			assert!(!delay.check_delay(10_000));
			assert!(delay.is_armed());
			let duration = delay.duration();
			assert!((750..=1250).contains(&duration), "{duration}");

			assert!(!delay.check_delay(10_000 + duration - 1));
			assert!(delay.check_delay(10_000 + duration));
			assert!(!delay.is_armed());
		}
	}

	#[test]
	fn test_rearms_after_firing() {
		let mut delay = RandomizedDelay::with_seed(400, 3);
		assert!(!delay.check_delay(0));
		assert!(delay.check_delay(500));
		assert!(!delay.check_delay(500));
		assert!(delay.is_armed());
		assert!(delay.check_delay(1000));
	}

	#[test]
	fn test_zero_base_fires_on_second_check() {
		let mut delay = RandomizedDelay::with_seed(0, 0);
		assert!(!delay.check_delay(5));
		assert!(delay.check_delay(5));
	}

	#[test]
	fn test_huge_base_does_not_overflow() {
		let mut delay = RandomizedDelay::with_seed(u32::MAX, 1);
		assert!(!delay.check_delay(0));
		let base = u64::from(u32::MAX);
		assert!((base * 3 / 4..=base + base / 4).contains(&delay.duration()));
		assert!(!delay.check_delay(base / 2));
		assert!(delay.check_delay(base * 2));
	}

	#[test]
	fn test_reset_disarms() {
		let mut delay = RandomizedDelay::with_seed(100, 0);
		delay.check_delay(0);
		delay.reset();
		assert!(!delay.is_armed());
		assert!(!delay.check_delay(1000));
	}
}
