//! Refresh scheduler.
//!
//! The first tick fires immediately (the startup cycle), then every
//! `refresh`. Each tick spawns its own cycle task, so a slow cycle can
//! overlap the next one. All results funnel through a channel into the one
//! task that owns the [`OverlayManager`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cycle::{AcquisitionCycle, CycleError, CycleResult};
use crate::overlay::{Applied, OverlayManager};

const RESULT_CHANNEL_CAPACITY: usize = 16;

pub struct Scheduler {
    cycle: AcquisitionCycle,
    refresh: Duration,
    next_sequence: AtomicU64,
}

impl Scheduler {
    pub fn new(cycle: AcquisitionCycle, refresh: Duration) -> Self {
        Self {
            cycle,
            refresh,
            next_sequence: AtomicU64::new(1),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Run a single cycle and apply it.
    pub async fn run_once(&self, manager: &mut OverlayManager, token: &CancellationToken) -> Applied {
        let sequence = self.next_sequence();
        let result = self.cycle.run(sequence, token).await;
        manager.on_cycle_result(result, token)
    }

    /// Run cycles until `token` is cancelled, then hand the manager back.
    pub async fn run_forever(
        &self,
        mut manager: OverlayManager,
        token: CancellationToken,
    ) -> Result<OverlayManager> {
        info!(refresh_secs = self.refresh.as_secs(), "Starting refresh scheduler");

        let (tx, mut rx) = mpsc::channel::<CycleResult>(RESULT_CHANNEL_CAPACITY);

        let manager_token = token.clone();
        let manager_task = tokio::spawn(async move {
            while let Some(result) = rx.recv().await {
                let applied = manager.on_cycle_result(result, &manager_token);
                debug!(?applied, "Applied cycle result");
            }
            manager
        });

        let mut interval = tokio::time::interval(self.refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Scheduler shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let sequence = self.next_sequence();
                    let cycle = self.cycle.clone();
                    let tx = tx.clone();
                    let token = token.clone();
                    debug!(sequence, "Spawning cycle");
                    tokio::spawn(async move {
                        let run = tokio::spawn(async move { cycle.run(sequence, &token).await });
                        let result = match run.await {
                            Ok(result) => result,
                            Err(e) => CycleResult::Failed(CycleError::Unknown(e.to_string())),
                        };
                        // Receiver only closes after shutdown
                        let _ = tx.send(result).await;
                    });
                }
            }
        }

        // In-flight cycles keep their own senders; the manager drains them
        drop(tx);
        manager_task.await.context("Overlay manager task failed")
    }
}
