//! Streaming engine and one-shot AES-GCM benchmarks.
use aes_gcm_stream::{Aes128Gcm, Config, Direction, Engine, KeyInit, KeySize, Word, WordWidth};
use criterion::{BenchmarkGroup, BenchmarkId, Throughput, criterion_group, criterion_main};

mod utils;
use utils::{Benchmarker, Measurement, config};

const KEY: [u8; 16] = [0x42; 16];
const IV: [u8; 12] = [0x24; 12];

fn encrypt_stream<const D: usize>(width: WordWidth, plaintext: &[u8]) -> usize {
    let config = Config::new(KeySize::Aes128, Direction::Encrypt).with_word_width(width);
    let mut engine = Engine::<D>::new(config);
    let mut produced = 0;

    for word in width.split(&KEY).chain(width.split(&IV)) {
        engine.push_key_iv(word).unwrap();
    }
    engine.push_data(Word::empty_last()).unwrap();

    for word in width.split(plaintext) {
        engine.push_data(word).unwrap();
        while let Some(out) = engine.pull_text() {
            produced += out.len();
        }
    }
    while let Some(tag) = engine.pull_tag() {
        produced += tag.len();
    }
    produced
}

fn bench_engine<const D: usize>(
    group: &mut BenchmarkGroup<'_, Measurement>,
    width: usize,
    buf: &[u8],
) {
    let width = WordWidth::new(width).unwrap();
    let id = format!("engine/d{D}/w{}", width.get());
    group.bench_function(BenchmarkId::new(id, buf.len()), |b| {
        b.iter(|| encrypt_stream::<D>(width, buf));
    });
}

fn bench(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("aes-gcm-stream");

    for size in &[16, 256, 1024, 16384] {
        let mut buf = vec![0u8; *size];

        group.throughput(Throughput::Bytes(*size as u64));

        bench_engine::<8>(&mut group, 4, &buf);
        bench_engine::<8>(&mut group, 16, &buf);
        bench_engine::<128>(&mut group, 16, &buf);

        group.bench_function(BenchmarkId::new("one-shot/d128", size), |b| {
            let cipher = Aes128Gcm::<128>::new(&KEY.into());
            b.iter(|| cipher.encrypt_in_place_detached_with_iv(&IV, &[], &mut buf).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = config();
    targets = bench
);

criterion_main!(benches);
