#![allow(dead_code)]

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use checkpoint_schedules::algorithms::{HRevolve, Multistage, Revolve, TwoLevel};
use checkpoint_schedules::cost::CostParams;
use checkpoint_schedules::table::Opt0Table;
use checkpoint_schedules::Schedule;

const WARM_UP_TIME_MS: u64 = 500;
const MEASUREMENT_TIME_MS: u64 = 2000;

criterion_group!(
    benches,
    benchmark_table_construction,
    benchmark_revolve_generation,
    benchmark_h_revolve_generation,
    benchmark_multistage_generation,
    benchmark_two_level_generation,
);
criterion_main!(benches);

fn benchmark_table_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bench Opt0Table Construction");
    group.warm_up_time(Duration::from_millis(WARM_UP_TIME_MS));
    group.sample_size(20);

    group.bench_function("Opt0Table l=200 c=10", |b| {
        b.iter(|| Opt0Table::build(200, 10, CostParams::default()))
    });
    group.bench_function("Opt0Table l=1000 c=20", |b| {
        b.iter(|| Opt0Table::build(1000, 20, CostParams::default()))
    });

    group.finish();
}

fn benchmark_revolve_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bench Revolve Full Generation");
    group.warm_up_time(Duration::from_millis(WARM_UP_TIME_MS));
    group.measurement_time(Duration::from_millis(MEASUREMENT_TIME_MS));
    group.sample_size(20);

    group.bench_function("Revolve steps=1000 ram=10", |b| {
        b.iter(|| bench_drain_revolve(1000, 10))
    });
    group.bench_function("Revolve steps=5000 ram=15", |b| {
        b.iter(|| bench_drain_revolve(5000, 15))
    });

    group.finish();
}

fn benchmark_h_revolve_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bench HRevolve Full Generation");
    group.warm_up_time(Duration::from_millis(WARM_UP_TIME_MS));
    group.sample_size(20);

    group.bench_function("HRevolve steps=1000 ram=10 disk=20", |b| {
        b.iter(|| bench_drain_h_revolve(1000, 10, 20))
    });

    group.finish();
}

fn benchmark_multistage_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bench Multistage Full Generation");
    group.warm_up_time(Duration::from_millis(WARM_UP_TIME_MS));
    group.sample_size(20);

    group.bench_function("Multistage steps=1000 ram=10 disk=20", |b| {
        b.iter(|| bench_drain_multistage(1000, 10, 20))
    });

    group.finish();
}

fn benchmark_two_level_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bench TwoLevel Full Generation");
    group.warm_up_time(Duration::from_millis(WARM_UP_TIME_MS));
    group.sample_size(20);

    group.bench_function("TwoLevel steps=1000 period=50 inner=5", |b| {
        b.iter(|| bench_drain_two_level(1000, 50, 5))
    });

    group.finish();
}

fn bench_drain_revolve(max_n: u64, snaps_in_ram: u64) {
    let mut s = Revolve::new(max_n, snaps_in_ram).unwrap();
    let mut count = 0u64;
    while s.next_action().unwrap().is_some() {
        count += 1;
    }
    assert!(count > 0);
}

fn bench_drain_h_revolve(max_n: u64, snaps_in_ram: u64, snaps_on_disk: u64) {
    let mut s = HRevolve::new(max_n, snaps_in_ram, snaps_on_disk).unwrap();
    let mut count = 0u64;
    while s.next_action().unwrap().is_some() {
        count += 1;
    }
    assert!(count > 0);
}

fn bench_drain_multistage(max_n: u64, snaps_in_ram: u64, snaps_on_disk: u64) {
    let mut s = Multistage::new(max_n, snaps_in_ram, snaps_on_disk).unwrap();
    let mut count = 0u64;
    while s.next_action().unwrap().is_some() {
        count += 1;
    }
    assert!(count > 0);
}

fn bench_drain_two_level(max_n: u64, period: u64, inner: u64) {
    let mut s = TwoLevel::new(period, inner).unwrap();
    s.next_action().unwrap(); // one block emitted online, before max_n is known
    s.finalize(max_n).unwrap();
    let mut count = 1u64;
    while s.next_action().unwrap().is_some() {
        count += 1;
    }
    assert!(count > 0);
}
