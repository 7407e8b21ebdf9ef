//! Benchmark suite for unit animation stepping
//!
//! Measures building animation references, switching states and advancing frames,
//! the work every battle frame does for every unit on the field.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use warband_battle::anim::{AnimState, AnimationReference, AnimationState, AttackDirection};
use warband_benches::{archer_record, complete_record, monsters};
use warband_types::file::MonsterAnimInfo;

fn bench_reference_build(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_reference");

	for monster in monsters::SAMPLE {
		let info = Arc::new(MonsterAnimInfo::decode(monster, &complete_record()));
		group.bench_with_input(BenchmarkId::new("build", monster.name()), &info, |b, info| {
			b.iter(|| black_box(AnimationReference::new(monster, Arc::clone(info))));
		});
	}

	group.finish();
}

fn bench_switch_states(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_switch");
	let monster = monsters::SAMPLE[3];
	let info = Arc::new(MonsterAnimInfo::decode(monster, &archer_record()));
	let reference = Arc::new(AnimationReference::new(monster, info));

	group.bench_function("walk_composite", |b| {
		let mut state = AnimationState::with_seed(Arc::clone(&reference), 1);
		b.iter(|| black_box(state.switch_animations(&[AnimState::MoveStart, AnimState::Moving], false)));
	});

	group.bench_function("attack_cycle", |b| {
		let mut state = AnimationState::with_seed(Arc::clone(&reference), 1);
		b.iter(|| {
			for direction in [AttackDirection::Top, AttackDirection::Front, AttackDirection::Bottom] {
				let (start, end) = AnimState::ranged(direction);
				state.switch_animation(start, false);
				state.switch_animation(end, false);
			}
			black_box(state.frame())
		});
	});

	group.finish();
}

fn bench_play_to_end(c: &mut Criterion) {
	let mut group = c.benchmark_group("anim_play");

	for monster in monsters::SAMPLE {
		let info = Arc::new(MonsterAnimInfo::decode(monster, &complete_record()));
		let reference = Arc::new(AnimationReference::new(monster, info));
		group.bench_with_input(BenchmarkId::new("kill", monster.name()), &reference, |b, reference| {
			let mut state = AnimationState::with_seed(Arc::clone(reference), 1);
			b.iter(|| {
				state.switch_animation(AnimState::Kill, false);
				while state.is_valid() && !state.is_last_frame() {
					state.play_animation(false);
				}
				black_box(state.frame())
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_reference_build, bench_switch_states, bench_play_to_end);
criterion_main!(benches);
