//! Benchmark suite for FRM record decoding
//!
//! Measures raw record decoding, data corrections and the per-monster cache.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use warband_benches::{archer_record, complete_record, monsters, record_stream};
use warband_types::{
	file::{AnimationSource, FrmError, FrmFile, MonsterAnimCache, MonsterAnimInfo},
	monster::MonsterId,
};

/// Serves the same synthetic record for every monster
#[derive(Clone)]
struct Synthetic(Arc<Vec<u8>>);

impl AnimationSource for Synthetic {
	fn raw_frm(&self, _monster: MonsterId) -> Result<Vec<u8>, FrmError> {
		Ok(self.0.as_ref().clone())
	}
}

fn bench_decode_record(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_decode");
	group.throughput(Throughput::Elements(1));

	for (name, record) in [("complete", complete_record()), ("archer", archer_record())] {
		group.bench_with_input(BenchmarkId::new("decode", name), &record, |b, record| {
			b.iter(|| black_box(MonsterAnimInfo::decode(black_box(MonsterId::Archer), black_box(record))));
		});
	}

	group.finish();
}

fn bench_corrections(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_corrections");
	let record = complete_record();

	// Corrected and uncorrected monsters share the decode path
	for monster in monsters::SAMPLE {
		group.bench_with_input(BenchmarkId::new("decode", monster.name()), &record, |b, record| {
			b.iter(|| black_box(MonsterAnimInfo::decode(monster, record)));
		});
	}

	group.finish();
}

fn bench_file_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_file");

	for count in [1usize, 8, 64] {
		let stream = record_stream(count);
		group.throughput(Throughput::Bytes(stream.len() as u64));
		group.bench_with_input(BenchmarkId::new("from_reader", count), &stream, |b, stream| {
			b.iter(|| {
				let file = FrmFile::from_reader(&mut black_box(stream).as_slice());
				black_box(file)
			});
		});
	}

	group.finish();
}

fn bench_cache(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_cache");
	let source = Synthetic(Arc::new(complete_record()));

	group.bench_function("cold_all_monsters", |b| {
		b.iter(|| {
			let mut cache = MonsterAnimCache::new(source.clone());
			cache.preload();
			black_box(cache.len())
		});
	});

	group.bench_function("warm_lookup", |b| {
		let mut cache = MonsterAnimCache::new(source.clone());
		cache.preload();
		b.iter(|| black_box(cache.get(black_box(MonsterId::Goblin))));
	});

	group.finish();
}

criterion_group!(benches, bench_decode_record, bench_corrections, bench_file_parse, bench_cache);
criterion_main!(benches);
