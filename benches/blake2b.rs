use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nebula_crypto_core::hash::blake2b;

pub fn bench_blake2b_64_bytes(c: &mut Criterion) {
    let data = [0u8; 64];
    let mut out = [0u8; 64];

    c.bench_function("blake2b 64 bytes", |b| {
        b.iter(|| blake2b(&mut out, 64, black_box(&data), b"").unwrap())
    });
}

pub fn bench_blake2b_1kb(c: &mut Criterion) {
    let data = vec![0u8; 1024];
    let mut out = [0u8; 64];

    c.bench_function("blake2b 1024 bytes", |b| {
        b.iter(|| blake2b(&mut out, 64, black_box(&data), b"").unwrap())
    });
}

criterion_group!(benches, bench_blake2b_64_bytes, bench_blake2b_1kb);
criterion_main!(benches);
