//! Benchmarks for the block-code decoders and the fuzzy extractor.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fuzzy_ecc::cs::ecc::{
    create_bch, create_bch_15_5_7, create_golay, create_hamming, create_reed_muller,
    ErrorCorrection, Word,
};
use fuzzy_ecc::cs::security::FuzzyExtractor;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Encodes a random message and adds `errors` random symbol errors
fn noisy_codeword<C: ErrorCorrection>(code: &C, errors: usize, rng: &mut ChaCha20Rng) -> Word {
    let params = code.parameters();
    let message: Word = (0..params.k).map(|_| rng.gen_range(0..params.q)).collect();
    let mut word = code.encode(&message).unwrap();
    let mut hit = Vec::new();
    while hit.len() < errors {
        let p = rng.gen_range(0..params.n);
        if !hit.contains(&p) {
            hit.push(p);
            word[p] = (word[p] + rng.gen_range(1..params.q)) % params.q;
        }
    }
    word
}

fn bench_bch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bch_decode");
    let mut rng = ChaCha20Rng::from_seed([42u8; 32]);

    let binary = create_bch_15_5_7().unwrap();
    let ternary = create_bch(3, 7, 1, "alpha^3+2*alpha+1").unwrap();
    for errors in 0..=3 {
        let received = noisy_codeword(&binary, errors, &mut rng);
        group.bench_with_input(BenchmarkId::new("pgz_15_5", errors), &received, |b, r| {
            b.iter(|| binary.decode(black_box(r)))
        });
        group.bench_with_input(BenchmarkId::new("bm_15_5", errors), &received, |b, r| {
            b.iter(|| binary.decode_berlekamp_massey(black_box(r)))
        });

        let received = noisy_codeword(&ternary, errors, &mut rng);
        group.bench_with_input(BenchmarkId::new("pgz_26_14", errors), &received, |b, r| {
            b.iter(|| ternary.decode(black_box(r)))
        });
    }

    group.finish();
}

fn bench_syndrome_codes(c: &mut Criterion) {
    let mut group = c.benchmark_group("syndrome_decode");
    let mut rng = ChaCha20Rng::from_seed([7u8; 32]);

    let hamming = create_hamming(4, 2).unwrap();
    let received = noisy_codeword(&hamming, 1, &mut rng);
    group.bench_function("hamming_15_11", |b| {
        b.iter(|| hamming.decode(black_box(&received)))
    });

    let golay = create_golay(24).unwrap();
    let received = noisy_codeword(&golay, 3, &mut rng);
    group.bench_function("golay_24", |b| b.iter(|| golay.decode(black_box(&received))));

    let golay = create_golay(23).unwrap();
    let received = noisy_codeword(&golay, 3, &mut rng);
    group.bench_function("golay_23", |b| b.iter(|| golay.decode(black_box(&received))));

    group.finish();
}

fn bench_reed_muller(c: &mut Criterion) {
    let mut group = c.benchmark_group("reed_muller_decode");
    let mut rng = ChaCha20Rng::from_seed([9u8; 32]);

    for (r, m) in [(1, 5), (2, 5), (2, 7)] {
        let code = create_reed_muller(r, m).unwrap();
        let t = code.parameters().correction_radius();
        let received = noisy_codeword(&code, t, &mut rng);
        group.bench_with_input(
            BenchmarkId::new("majority", format!("RM({},{})", r, m)),
            &received,
            |b, w| b.iter(|| code.decode_message(black_box(w))),
        );
    }

    group.finish();
}

fn bench_fuzzy_extractor(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let code = create_bch_15_5_7().unwrap();
    let extractor = FuzzyExtractor::new(&code, 5, 10).unwrap();
    let reading: Word = (0..15).map(|_| rng.gen_range(0..2)).collect();
    extractor
        .generate_helper_data_with_rng(&reading, &mut rng)
        .unwrap();

    let mut noisy = reading.clone();
    noisy[4] ^= 1;
    noisy[11] ^= 1;
    c.bench_function("fuzzy_extract_bch_15_5", |b| {
        b.iter(|| extractor.extract(black_box(&noisy)))
    });
}

criterion_group!(
    benches,
    bench_bch,
    bench_syndrome_codes,
    bench_reed_muller,
    bench_fuzzy_extractor
);
criterion_main!(benches);
