//! Signing Benchmarks
//!
//! Sign and verify cost for short, medium and long clips.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ed25519_dalek::SigningKey;
use lsbsign::engine::{generate_test_tone, ByteOrder, PcmFormat};
use lsbsign::signing::{sign, verify};

const CLIP_SECONDS: [(f32, &str); 3] = [(0.1, "100ms"), (1.0, "1s"), (60.0, "60s")];

fn benchmark_sign(c: &mut Criterion) {
    let format = PcmFormat::new(2, 2, 44100, ByteOrder::Little).unwrap();
    let key = SigningKey::from_bytes(&[7; 32]);

    for (seconds, label) in CLIP_SECONDS {
        let mut buffer = generate_test_tone(440.0, seconds, format).unwrap();

        c.bench_function(&format!("sign_{}_stereo16", label), |b| {
            b.iter(|| {
                sign(black_box(&mut buffer), &key).unwrap();
            })
        });
    }
}

fn benchmark_verify(c: &mut Criterion) {
    let format = PcmFormat::new(2, 2, 44100, ByteOrder::Little).unwrap();
    let key = SigningKey::from_bytes(&[7; 32]);
    let verifying_key = key.verifying_key();

    for (seconds, label) in CLIP_SECONDS {
        let mut buffer = generate_test_tone(440.0, seconds, format).unwrap();
        sign(&mut buffer, &key).unwrap();

        c.bench_function(&format!("verify_{}_stereo16", label), |b| {
            b.iter(|| {
                // verify leaves the buffer normalized, so work on a fresh copy
                let mut copy = buffer.clone();
                assert!(verify(black_box(&mut copy), &verifying_key).unwrap());
            })
        });
    }
}

criterion_group!(benches, benchmark_sign, benchmark_verify);
criterion_main!(benches);
