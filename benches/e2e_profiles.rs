use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use e2e_guard::crc::variants::{crc16_ccitt_false, crc32_ethernet, crc8_j1850};
use e2e_guard::profile1::{Profile1, Profile1CheckState, Profile1Config, Profile1ProtectState};
use e2e_guard::profile5::{Profile5, Profile5CheckState, Profile5Config, Profile5ProtectState};
use e2e_guard::sm::{AggregationConfig, AggregationSm, CheckStatus};

fn benchmark_crc_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("Crc");

    for size in &[16, 64, 256, 1024] {
        let data = vec![0xA5u8; *size];

        group.bench_with_input(BenchmarkId::new("crc8_j1850", size), size, |b, _| {
            b.iter(|| crc8_j1850::compute(black_box(&data), 0xFF, true))
        });

        group.bench_with_input(BenchmarkId::new("crc16_ccitt_false", size), size, |b, _| {
            b.iter(|| crc16_ccitt_false::compute(black_box(&data), 0xFFFF, true))
        });

        group.bench_with_input(BenchmarkId::new("crc32_ethernet", size), size, |b, _| {
            b.iter(|| crc32_ethernet::compute(black_box(&data), 0xFFFFFFFF, true))
        });
    }

    group.finish();
}

fn benchmark_profile1(c: &mut Criterion) {
    let config = Profile1Config {
        data_length_bits: 64,
        ..Default::default()
    };
    let profile = Profile1::new(config.clone()).unwrap();
    let mut tx_state = Profile1ProtectState::default();
    let mut rx_state = Profile1CheckState::new(&config);
    let mut data = [0x00u8; 8];
    profile.protect(&mut tx_state, &mut data).unwrap();

    let mut group = c.benchmark_group("Profile1");

    group.bench_function("protect", |b| {
        b.iter(|| {
            let mut data_copy = data;
            profile.protect(black_box(&mut tx_state), black_box(&mut data_copy)).unwrap();
        })
    });

    group.bench_function("check", |b| {
        b.iter(|| {
            profile.check(black_box(&mut rx_state), black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn benchmark_profile5(c: &mut Criterion) {
    let config = Profile5Config {
        data_length_bits: 8 * 8,
        ..Default::default()
    };
    let profile = Profile5::new(config).unwrap();
    let mut tx_state = Profile5ProtectState::default();
    let mut rx_state = Profile5CheckState::default();
    let mut data = [0x00u8; 8];
    profile.protect(&mut tx_state, &mut data).unwrap();

    let mut group = c.benchmark_group("Profile5");

    group.bench_function("protect", |b| {
        b.iter(|| {
            let mut data_copy = data;
            profile.protect(black_box(&mut tx_state), black_box(&mut data_copy)).unwrap();
        })
    });

    group.bench_function("check", |b| {
        b.iter(|| {
            profile.check(black_box(&mut rx_state), black_box(Some(&data[..]))).unwrap();
        })
    });

    group.finish();
}

fn benchmark_aggregation_sm(c: &mut Criterion) {
    let config = AggregationConfig {
        window_size_valid: 20,
        window_size_init: 10,
        window_size_invalid: 5,
        min_ok_state_init: 5,
        max_error_state_init: 3,
        min_ok_state_valid: 14,
        max_error_state_valid: 6,
        min_ok_state_invalid: 3,
        max_error_state_invalid: 1,
        clear_to_invalid: true,
    };
    let mut sm = AggregationSm::new(config).unwrap();
    sm.init();
    for _ in 0..5 {
        sm.check(CheckStatus::Ok).unwrap();
    }

    c.bench_function("AggregationSm/check", |b| {
        b.iter(|| sm.check(black_box(CheckStatus::Ok)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_crc_variants,
    benchmark_profile1,
    benchmark_profile5,
    benchmark_aggregation_sm,
);
criterion_main!(benches);
