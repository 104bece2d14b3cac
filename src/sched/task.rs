/*!
 * Periodic Driver
 * Background task firing the lottery draw and aging pass at a fixed interval
 */

use super::Scheduler;
use log::{info, warn};
use std::time::Duration;
use tokio::sync::mpsc;

/// Control messages for the balancer task
#[derive(Debug, Clone)]
pub enum BalancerCommand {
    /// Change the balancing interval
    UpdateInterval(Duration),
    /// Pause periodic passes
    Pause,
    /// Resume periodic passes
    Resume,
    /// Run one pass immediately
    Trigger,
    /// Shut the task down
    Shutdown,
}

/// Handle to the periodic balancer task
pub struct BalancerTask {
    command_tx: mpsc::UnboundedSender<BalancerCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl BalancerTask {
    /// Spawn the driver; it fires `on_periodic_tick()` at the scheduler's
    /// configured balance interval until shut down.
    pub fn spawn(scheduler: Scheduler) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let interval = scheduler.config().balance_interval;

        let handle = tokio::spawn(async move {
            run_balance_loop(scheduler, interval, command_rx).await;
        });

        info!("Balancer task spawned (interval={:?})", interval);

        Self {
            command_tx,
            handle: Some(handle),
        }
    }

    pub fn update_interval(&self, interval: Duration) {
        let _ = self
            .command_tx
            .send(BalancerCommand::UpdateInterval(interval));
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(BalancerCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.command_tx.send(BalancerCommand::Resume);
    }

    /// Force an immediate lottery/aging pass
    pub fn trigger(&self) {
        let _ = self.command_tx.send(BalancerCommand::Trigger);
    }

    /// Shut the task down gracefully
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(BalancerCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Balancer task shutdown error: {}", e);
            } else {
                info!("Balancer task shutdown complete");
            }
        }
    }
}

async fn run_balance_loop(
    scheduler: Scheduler,
    initial: Duration,
    mut command_rx: mpsc::UnboundedReceiver<BalancerCommand>,
) {
    let mut active = true;
    let mut interval = tokio::time::interval(initial);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // Consume the immediate first tick so the first real pass happens one
    // full interval after spawn.
    interval.tick().await;

    info!("Balancer loop started ({:?} interval)", initial);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if active && !scheduler.is_empty() {
                    scheduler.on_periodic_tick();
                }
            }

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    BalancerCommand::UpdateInterval(new_interval) => {
                        info!("Balancer interval updated: {:?}", new_interval);
                        interval = tokio::time::interval(new_interval);
                        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                        interval.tick().await;
                    }

                    BalancerCommand::Pause => {
                        info!("Balancer paused");
                        active = false;
                    }

                    BalancerCommand::Resume => {
                        info!("Balancer resumed");
                        active = true;
                    }

                    BalancerCommand::Trigger => {
                        if !scheduler.is_empty() {
                            scheduler.on_periodic_tick();
                        }
                    }

                    BalancerCommand::Shutdown => {
                        info!("Balancer shutting down");
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for BalancerTask {
    fn drop(&mut self) {
        // Attempt graceful shutdown if the handle still exists
        if self.handle.is_some() {
            let _ = self.command_tx.send(BalancerCommand::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SchedConfig;
    use crate::exec::LoggingExecutor;
    use crate::random::StdRandom;
    use crate::sched::StartRequest;
    use std::sync::Arc;

    fn scheduler(interval: Duration) -> Scheduler {
        Scheduler::with_config(
            SchedConfig::default()
                .with_capacity(8)
                .with_balance_interval(interval),
            Arc::new(LoggingExecutor),
            Arc::new(StdRandom::seeded(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_balancer_lifecycle() {
        let scheduler = scheduler(Duration::from_millis(10));
        let task = BalancerTask::spawn(scheduler.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;

        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_periodic_draws_fire() {
        let scheduler = scheduler(Duration::from_millis(5));
        scheduler
            .request_start(StartRequest::explicit(1, 8, Duration::from_millis(100)))
            .unwrap();
        scheduler
            .request_start(StartRequest::inherit(2, 1, 15))
            .unwrap();

        let task = BalancerTask::spawn(scheduler.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.shutdown().await;

        assert!(scheduler.stats().draws > 0);
        assert_eq!(scheduler.last_winner(), Some(2));
    }

    #[tokio::test]
    async fn test_trigger_runs_immediate_pass() {
        let scheduler = scheduler(Duration::from_secs(3600));
        scheduler
            .request_start(StartRequest::explicit(1, 8, Duration::from_millis(100)))
            .unwrap();
        scheduler
            .request_start(StartRequest::inherit(2, 1, 15))
            .unwrap();

        let task = BalancerTask::spawn(scheduler.clone());
        task.trigger();
        tokio::time::sleep(Duration::from_millis(20)).await;
        task.shutdown().await;

        assert_eq!(scheduler.stats().draws, 1);
    }

    #[tokio::test]
    async fn test_pause_stops_passes() {
        let scheduler = scheduler(Duration::from_millis(5));
        scheduler
            .request_start(StartRequest::explicit(1, 8, Duration::from_millis(100)))
            .unwrap();
        scheduler
            .request_start(StartRequest::inherit(2, 1, 15))
            .unwrap();

        let task = BalancerTask::spawn(scheduler.clone());
        task.pause();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let paused_draws = scheduler.stats().draws;

        task.resume();
        tokio::time::sleep(Duration::from_millis(30)).await;
        task.shutdown().await;

        assert!(scheduler.stats().draws > paused_draws);
    }
}
