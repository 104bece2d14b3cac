/*!
 * lotschedd - Demo Driver
 * Runs the policy core against a logging executor with a simulated workload
 */

use lotsched::{
    BalancerTask, Collector, LoggingExecutor, SchedConfig, Scheduler, StartRequest, StdRandom,
    TicketGrowth,
};
use log::info;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("lotsched demo starting");

    let config = SchedConfig::default()
        .with_capacity(32)
        .with_balance_interval(Duration::from_millis(500))
        .with_ticket_growth(TicketGrowth::Static);

    let collector = Arc::new(Collector::with_capacity(4096));
    let scheduler = Scheduler::with_config(
        config,
        Arc::new(LoggingExecutor),
        Arc::new(StdRandom::new()),
    )?
    .with_collector(Arc::clone(&collector));

    // A system service with an externally assigned share, plus a small
    // process tree competing through the lottery.
    scheduler.request_start(StartRequest::explicit(1, 2, Duration::from_millis(400)))?;
    scheduler.request_start(StartRequest::explicit(10, 8, Duration::from_millis(200)))?;
    for child in 11..=14 {
        scheduler.request_start(StartRequest::inherit(child, 10, 15))?;
    }

    let task = BalancerTask::spawn(scheduler.clone());

    // Simulate a few seconds of quantum expirations: children 11 and 12
    // behave CPU-bound, the rest mostly block.
    for round in 0..8u32 {
        tokio::time::sleep(Duration::from_millis(400)).await;
        for pid in [11, 12] {
            if let Err(e) = scheduler.notify_quantum_expired(pid) {
                info!("expiration for {} not applied: {}", pid, e);
            }
        }
        if round % 3 == 0 {
            scheduler.notify_quantum_expired(1)?;
        }
    }

    scheduler.request_set_ceiling(13, 12)?;
    tokio::time::sleep(Duration::from_millis(600)).await;

    task.shutdown().await;

    info!("final state:");
    for stats in scheduler.all_process_stats() {
        info!("  {}", serde_json::to_string(&stats)?);
    }
    info!("counters: {}", serde_json::to_string_pretty(&scheduler.stats())?);
    info!("events captured: {}", collector.len());

    Ok(())
}
