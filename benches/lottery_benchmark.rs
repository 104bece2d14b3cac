/*!
 * Lottery Benchmark
 * Draw and periodic-pass throughput at realistic table occupancy
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lotsched::{
    Executor, ExecutorError, Pid, Priority, SchedConfig, Scheduler, StartRequest, StdRandom,
};
use std::sync::Arc;
use std::time::Duration;

struct NullExecutor;

impl Executor for NullExecutor {
    fn commit(&self, _pid: Pid, _priority: Priority, _quantum: Duration) -> Result<(), ExecutorError> {
        Ok(())
    }
}

fn populated_scheduler(processes: u32) -> Scheduler {
    let scheduler = Scheduler::with_config(
        SchedConfig::default().with_capacity(processes as usize + 1),
        Arc::new(NullExecutor),
        Arc::new(StdRandom::seeded(42)),
    )
    .expect("valid config");

    scheduler
        .request_start(StartRequest::explicit(1, 8, Duration::from_millis(200)))
        .expect("admit parent");
    for pid in 2..=processes + 1 {
        scheduler
            .request_start(StartRequest::inherit(pid, 1, 15))
            .expect("admit child");
    }
    scheduler
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("lottery_draw");
    for &processes in &[8u32, 32, 128] {
        let scheduler = populated_scheduler(processes);
        group.bench_with_input(
            BenchmarkId::from_parameter(processes),
            &scheduler,
            |b, scheduler| b.iter(|| black_box(scheduler.draw_lottery())),
        );
    }
    group.finish();
}

fn bench_periodic_pass(c: &mut Criterion) {
    let scheduler = populated_scheduler(128);
    c.bench_function("periodic_pass_128", |b| {
        b.iter(|| scheduler.on_periodic_tick());
    });
}

fn bench_expiration(c: &mut Criterion) {
    let scheduler = populated_scheduler(128);
    c.bench_function("quantum_expiration", |b| {
        b.iter(|| {
            let _ = black_box(scheduler.notify_quantum_expired(64));
        });
    });
}

criterion_group!(benches, bench_draw, bench_periodic_pass, bench_expiration);
criterion_main!(benches);
