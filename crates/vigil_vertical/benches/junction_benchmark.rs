//! Benchmark for the per-tick exemption junction.
//!
//! TARGET: well under a microsecond per call; the junction runs once per
//! entity per tick on the hot path of the movement check.
//!
//! Run with: cargo bench --package vigil_vertical --bench junction_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vigil_core::move_record::{LocationSnapshot, MoveHistory, MoveRecord};
use vigil_core::state::EntityVerticalState;
use vigil_vertical::rules::{junction, HostSignals, MoveInput};

fn airborne_record(y_distance: f64) -> MoveRecord {
    MoveRecord {
        y_distance,
        to_is_valid: true,
        from: LocationSnapshot {
            extra_properties_valid: true,
            ..LocationSnapshot::default()
        },
        to: LocationSnapshot {
            extra_properties_valid: true,
            ..LocationSnapshot::default()
        },
        ..MoveRecord::default()
    }
}

fn falling_input(y_distance: f64, last_y_distance: f64) -> MoveInput {
    MoveInput {
        y_distance,
        y_dist_diff_ex: 0.02,
        y_dist_change: y_distance - last_y_distance,
        allowed_distance: y_distance - 0.02,
        max_jump_gain: 0.42,
        strict_v_dist_rel: true,
        reset_to: false,
        reset_from: false,
        from_on_ground: false,
        to_on_ground: false,
        now_ms: 1_000_000,
    }
}

fn benchmark_junction_no_match(c: &mut Criterion) {
    let mut history = MoveHistory::new();
    history.push(airborne_record(-0.3));
    history.push(airborne_record(-0.35));
    history.push(airborne_record(-0.6));
    let signals = HostSignals::default();

    c.bench_function("junction_no_match", |b| {
        let mut state = EntityVerticalState::new();
        state.jump_phase = 8;
        let input = falling_input(-0.6, -0.35);
        b.iter(|| {
            black_box(junction(
                black_box(&input),
                black_box(&history),
                black_box(&signals),
                &mut state,
            ))
        });
    });
}

fn benchmark_junction_throughput(c: &mut Criterion) {
    let mut history = MoveHistory::new();
    history.push(airborne_record(-0.2));
    history.push(airborne_record(-0.28));
    history.push(airborne_record(-0.35));
    let signals = HostSignals::default();

    let mut group = c.benchmark_group("junction_per_tick");
    group.throughput(Throughput::Elements(10_000));
    group.sample_size(50);

    group.bench_function("10k_entities", |b| {
        let mut state = EntityVerticalState::new();
        state.jump_phase = 8;
        b.iter(|| {
            for i in 0..10_000u32 {
                let y_distance = -0.3 - f64::from(i % 100) * 0.001;
                let input = falling_input(y_distance, -0.28);
                black_box(junction(&input, &history, &signals, &mut state));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_junction_no_match,
    benchmark_junction_throughput
);
criterion_main!(benches);
