use std::rc::Rc;

use warband_battle::prelude::*;

fn delays(speed: u32) -> (ManualClock, Delays) {
	let clock = ManualClock::new();
	let delays = Delays::new(Rc::new(clock.clone()), speed);
	(clock, delays)
}

#[test_log::test]
fn frame_channel_follows_battle_speed() {
	let (_, slow) = delays(1);
	let (_, normal) = delays(4);
	let (_, fast) = delays(10);
	assert_eq!(normal.delay(DelayChannel::BattleFrame), 140);
	assert!(slow.delay(DelayChannel::BattleFrame) > normal.delay(DelayChannel::BattleFrame));
	assert!(fast.delay(DelayChannel::BattleFrame) < normal.delay(DelayChannel::BattleFrame));
	assert_eq!(fast.delay(DelayChannel::Opponents), normal.delay(DelayChannel::Opponents));
}

#[test_log::test]
fn channel_fires_once_per_delay() {
	let (clock, mut delays) = delays(5);
	assert!(!delays.trigger(DelayChannel::Missile));
	clock.advance(39);
	assert!(!delays.trigger(DelayChannel::Missile));
	clock.advance(1);
	assert!(delays.trigger(DelayChannel::Missile));
	assert!(!delays.trigger(DelayChannel::Missile));

	delays.pass(DelayChannel::Missile);
	assert!(delays.trigger(DelayChannel::Missile));
}

#[test_log::test]
fn late_caller_keeps_cadence() {
	let (clock, mut delays) = delays(5);
	clock.advance(250);
	assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 2);
	clock.advance(110);
	assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 1);
	assert_eq!(delays.take_ticks(DelayChannel::BattleFrame), 0);
}

#[test_log::test]
fn custom_delay_is_independent() {
	let (clock, mut delays) = delays(5);
	delays.set_custom_delay(300);
	clock.advance(299);
	assert!(!delays.trigger(DelayChannel::Custom));
	clock.advance(1);
	assert!(delays.trigger(DelayChannel::Custom));
	delays.set_battle_speed(9);
	assert_eq!(delays.delay(DelayChannel::Custom), 300);
}

#[test]
fn settings_reject_out_of_range_speed() {
	let err = BattleSettings::from_toml_str("battle_speed = 11").unwrap_err();
	assert!(matches!(err, BattleError::InvalidBattleSpeed(11)));

	let settings = BattleSettings::from_toml_str("show_grid = false").unwrap();
	assert_eq!(settings.battle_speed, 4);
	assert!(!settings.show_grid);
}
