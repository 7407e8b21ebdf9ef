//! Frame pacing.
//!
//! Every kind of animation runs on its own [`DelayChannel`]. A channel fires once per
//! delay; the battle speed shortens or stretches the delays of the animated channels.
//! Time comes from a [`Clock`] so hosts and tests can drive it.

use std::{cell::Cell, rc::Rc, time::Instant};

/// The battle speed at which channels run at their base delay.
pub const DEFAULT_SPEED_DELAY: u32 = 5;

/// Millisecond time source.
pub trait Clock {
	/// Milliseconds since an arbitrary fixed origin.
	fn now_ms(&self) -> u64;
}

/// Wall clock time since creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
	start: Instant,
}

impl SystemClock {
	/// Starts a new clock at zero.
	pub fn new() -> Self {
		Self {
			start: Instant::now(),
		}
	}
}

impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for SystemClock {
	fn now_ms(&self) -> u64 {
		u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
	}
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
	now: Rc<Cell<u64>>,
}

impl ManualClock {
	/// Creates a clock at zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward.
	pub fn advance(&self, ms: u64) {
		self.now.set(self.now.get() + ms);
	}

	/// Jumps to an absolute time.
	pub fn set(&self, ms: u64) {
		self.now.set(ms);
	}
}

impl Clock for ManualClock {
	fn now_ms(&self) -> u64 {
		self.now.get()
	}
}

/// Independent animation timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayChannel {
	/// Unit animation frames
	BattleFrame,
	/// Projectile flight
	Missile,
	/// Spell effects
	Spell,
	/// Background idle animation of all units
	Idle,
	/// Disrupting ray and similar fast effects
	Disrupting,
	/// Catapult swing
	Catapult,
	/// Catapult boulder flight
	Catapult2,
	/// Catapult dust cloud
	Catapult3,
	/// Drawbridge
	Bridge,
	/// Opponent portraits
	Opponents,
	/// Army flags
	Flags,
	/// Popup messages
	Popup,
	/// Pulse of the current unit's contour
	Contour,
	/// One-off delays set with [`Delays::set_custom_delay`]
	Custom,
}

impl DelayChannel {
	/// Number of channels
	pub const COUNT: usize = 14;

	/// Every channel in declaration order.
	pub const ALL: [DelayChannel; Self::COUNT] = [
		DelayChannel::BattleFrame,
		DelayChannel::Missile,
		DelayChannel::Spell,
		DelayChannel::Idle,
		DelayChannel::Disrupting,
		DelayChannel::Catapult,
		DelayChannel::Catapult2,
		DelayChannel::Catapult3,
		DelayChannel::Bridge,
		DelayChannel::Opponents,
		DelayChannel::Flags,
		DelayChannel::Popup,
		DelayChannel::Contour,
		DelayChannel::Custom,
	];

	fn index(self) -> usize {
		self as usize
	}

	/// Delay in milliseconds at the default battle speed.
	pub fn base_delay(self) -> u32 {
		match self {
			DelayChannel::BattleFrame => 120,
			DelayChannel::Missile | DelayChannel::Catapult2 | DelayChannel::Catapult3 => 40,
			DelayChannel::Spell | DelayChannel::Catapult | DelayChannel::Bridge => 90,
			DelayChannel::Idle => 150,
			DelayChannel::Disrupting => 20,
			DelayChannel::Opponents => 500,
			DelayChannel::Flags => 300,
			DelayChannel::Popup => 800,
			DelayChannel::Contour => 100,
			DelayChannel::Custom => 0,
		}
	}

	/// Milliseconds removed per battle speed level, `None` for fixed channels.
	pub fn speed_step(self) -> Option<u32> {
		match self {
			DelayChannel::BattleFrame | DelayChannel::Idle => Some(20),
			DelayChannel::Missile | DelayChannel::Catapult2 | DelayChannel::Catapult3 => Some(7),
			DelayChannel::Spell | DelayChannel::Catapult | DelayChannel::Bridge => Some(17),
			DelayChannel::Disrupting => Some(3),
			DelayChannel::Opponents
			| DelayChannel::Flags
			| DelayChannel::Popup
			| DelayChannel::Contour
			| DelayChannel::Custom => None,
		}
	}

	/// Delay of the channel at a battle speed: `base - (speed - 5) * step`.
	pub fn delay_at_speed(self, battle_speed: u32) -> u32 {
		let base = self.base_delay();
		match self.speed_step() {
			Some(step) => {
				let shift = i64::from(battle_speed) - i64::from(DEFAULT_SPEED_DELAY);
				let delay = i64::from(base) - shift * i64::from(step);
				u32::try_from(delay.max(1)).unwrap_or(base)
			}
			None => base,
		}
	}
}

/// Scales a base delay by the battle speed: `(10 - speed) * (delay / 5)`.
pub fn apply_battle_speed(delay: u32, battle_speed: u32) -> u32 {
	10u32.saturating_sub(battle_speed) * (delay / DEFAULT_SPEED_DELAY)
}

#[derive(Debug, Clone, Copy, Default)]
struct Timer {
	delay: u32,
	start: u64,
}

/// The set of delay channels of one battle.
pub struct Delays {
	clock: Rc<dyn Clock>,
	battle_speed: u32,
	timers: [Timer; DelayChannel::COUNT],
}

impl Delays {
	/// Creates the channels and starts all of them now.
	pub fn new(clock: Rc<dyn Clock>, battle_speed: u32) -> Self {
		let now = clock.now_ms();
		let mut delays = Self {
			clock,
			battle_speed,
			timers: [Timer {
				delay: 0,
				start: now,
			}; DelayChannel::COUNT],
		};
		delays.set_battle_speed(battle_speed);
		delays
	}

	/// Recomputes the speed-dependent delays.
	pub fn set_battle_speed(&mut self, battle_speed: u32) {
		self.battle_speed = battle_speed;
		for channel in DelayChannel::ALL {
			if channel != DelayChannel::Custom {
				self.timers[channel.index()].delay = channel.delay_at_speed(battle_speed);
			}
		}
	}

	/// Current battle speed.
	pub fn battle_speed(&self) -> u32 {
		self.battle_speed
	}

	/// Current time of the underlying clock.
	pub fn now(&self) -> u64 {
		self.clock.now_ms()
	}

	/// Shared handle to the underlying clock.
	pub fn clock(&self) -> Rc<dyn Clock> {
		Rc::clone(&self.clock)
	}

	/// Delay of a channel in milliseconds.
	pub fn delay(&self, channel: DelayChannel) -> u32 {
		self.timers[channel.index()].delay
	}

	/// Returns true if a full delay passed since the channel last fired.
	pub fn has_delay_elapsed(&self, channel: DelayChannel) -> bool {
		let timer = &self.timers[channel.index()];
		self.now().saturating_sub(timer.start) >= u64::from(timer.delay)
	}

	/// Fires the channel if its delay elapsed and restarts it from now.
	///
	/// Channels with a zero delay always fire.
	pub fn trigger(&mut self, channel: DelayChannel) -> bool {
		if self.delay(channel) == 0 {
			return true;
		}
		if !self.has_delay_elapsed(channel) {
			return false;
		}
		self.reset_delay(channel);
		true
	}

	/// Number of whole delays elapsed since the channel last fired.
	///
	/// The channel start advances by exactly that many delays, so a late caller
	/// keeps its cadence.
	pub fn take_ticks(&mut self, channel: DelayChannel) -> u32 {
		let now = self.now();
		let timer = &mut self.timers[channel.index()];
		if timer.delay == 0 {
			timer.start = now;
			return 1;
		}
		let ticks = now.saturating_sub(timer.start) / u64::from(timer.delay);
		timer.start += ticks * u64::from(timer.delay);
		u32::try_from(ticks).unwrap_or(u32::MAX)
	}

	/// Restarts the channel from now.
	pub fn reset_delay(&mut self, channel: DelayChannel) {
		let now = self.now();
		self.timers[channel.index()].start = now;
	}

	/// Makes the channel fire on its next check.
	pub fn pass(&mut self, channel: DelayChannel) {
		let now = self.now();
		let timer = &mut self.timers[channel.index()];
		timer.start = now.saturating_sub(u64::from(timer.delay));
	}

	/// Sets the delay of the [`DelayChannel::Custom`] channel.
	pub fn set_custom_delay(&mut self, ms: u32) {
		self.timers[DelayChannel::Custom.index()].delay = ms;
	}

	/// Scales a base delay by the current battle speed.
	pub fn apply_speed_scaling(&self, base_delay: u32) -> u32 {
		apply_battle_speed(base_delay, self.battle_speed)
	}
}

impl std::fmt::Debug for Delays {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Delays")
			.field("battle_speed", &self.battle_speed)
			.field("now", &self.now())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn delays(speed: u32) -> (ManualClock, Delays) {
		let clock = ManualClock::new();
		let delays = Delays::new(Rc::new(clock.clone()), speed);
		(clock, delays)
	}

	#[test]
	fn test_channel_delays_follow_speed() {
		assert_eq!(DelayChannel::BattleFrame.delay_at_speed(5), 120);
		assert_eq!(DelayChannel::BattleFrame.delay_at_speed(1), 200);
		assert_eq!(DelayChannel::BattleFrame.delay_at_speed(10), 20);
		assert_eq!(DelayChannel::Missile.delay_at_speed(4), 47);
		assert_eq!(DelayChannel::Spell.delay_at_speed(10), 5);
		assert_eq!(DelayChannel::Disrupting.delay_at_speed(10), 5);
		assert_eq!(DelayChannel::Opponents.delay_at_speed(10), 500);
		for channel in DelayChannel::ALL {
			for speed in 1..=10 {
				if channel != DelayChannel::Custom {
					assert!(channel.delay_at_speed(speed) > 0, "{channel:?} at {speed}");
				}
			}
		}
	}

	#[test]
	fn test_apply_battle_speed() {
		assert_eq!(apply_battle_speed(1000, 5), 1000);
		assert_eq!(apply_battle_speed(1000, 4), 1200);
		assert_eq!(apply_battle_speed(1000, 10), 0);
		assert_eq!(apply_battle_speed(13, 5), 10);
	}

	#[test]
	fn test_trigger_restarts_channel() {
		let (clock, mut delays) = delays(5);
		assert!(!delays.trigger(DelayChannel::BattleFrame));
		clock.advance(119);
		assert!(!delays.trigger(DelayChannel::BattleFrame));
		clock.advance(1);
		assert!(delays.trigger(DelayChannel::BattleFrame));
		assert!(!delays.has_delay_elapsed(DelayChannel::BattleFrame));
	}

	#[test]
	fn test_take_ticks_catches_up() {
		let (clock, mut delays) = delays(5);
		clock.advance(370);
		assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 3);
		// 10 ms of the next tick are already spent
		clock.advance(110);
		assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 1);
		assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 0);
	}

	#[test]
	fn test_pass_and_custom_delay() {
		let (clock, mut delays) = delays(5);
		clock.advance(1000);
		delays.reset_delay(DelayChannel::Bridge);
		assert!(!delays.has_delay_elapsed(DelayChannel::Bridge));
		delays.pass(DelayChannel::Bridge);
		assert!(delays.has_delay_elapsed(DelayChannel::Bridge));

		assert!(delays.trigger(DelayChannel::Custom));
		delays.set_custom_delay(50);
		delays.reset_delay(DelayChannel::Custom);
		assert!(!delays.trigger(DelayChannel::Custom));
		clock.advance(50);
		assert!(delays.trigger(DelayChannel::Custom));
	}

	#[test]
	fn test_speed_change_updates_delays() {
		let (_, mut delays) = delays(5);
		delays.set_battle_speed(8);
		assert_eq!(delays.delay(DelayChannel::BattleFrame), 60);
		assert_eq!(delays.apply_speed_scaling(500), 200);
	}
}
