use std::sync::Arc;

use chrono::Duration;
use harbor_core::{PairOutcome, VesselGroups, VesselProfile, evaluate_pair};
use snafu::ResultExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::error::{Result, error::JoinSnafu};

struct PairJob {
    primary: Arc<VesselProfile>,
    secondary: Arc<VesselProfile>,
}

/// Distributes vessel pairs over a fixed number of workers.
///
/// Workers run on the blocking pool so the runtime stays free to observe
/// cancellation. Pairs share the read-only profiles of the split, no pair
/// observes another pair's state. Cancellation is checked before each pair
/// is started.
#[derive(Debug, Clone)]
pub struct PairScheduler {
    num_workers: usize,
    tolerance: Duration,
    cancellation: CancellationToken,
}

impl PairScheduler {
    pub fn new(num_workers: usize, tolerance: Duration, cancellation: CancellationToken) -> Self {
        Self {
            num_workers: num_workers.max(1),
            tolerance,
            cancellation,
        }
    }

    /// Evaluates every pair and returns the outcomes ordered by (primary, secondary) mmsi.
    #[instrument(
        skip_all,
        fields(app.num_pairs = groups.num_pairs(), app.num_workers = self.num_workers)
    )]
    pub async fn run(&self, groups: &VesselGroups) -> Result<Vec<PairOutcome>> {
        let num_pairs = groups.num_pairs();
        let (tx, rx) = async_channel::bounded(num_pairs.max(1));

        let mut set = JoinSet::new();

        for _ in 0..self.num_workers {
            let rx = rx.clone();
            let tolerance = self.tolerance;
            let cancellation = self.cancellation.clone();
            set.spawn_blocking(move || {
                let mut outcomes = Vec::new();
                while let Ok(job) = rx.recv_blocking() {
                    let PairJob { primary, secondary } = job;
                    let outcome = if cancellation.is_cancelled() {
                        PairOutcome::cancelled(&primary, &secondary)
                    } else {
                        evaluate_pair(&primary, &secondary, tolerance)
                    };
                    outcomes.push(outcome);
                }
                outcomes
            });
        }

        drop(rx);

        for (primary, secondary) in groups.pairs() {
            let job = PairJob {
                primary: primary.clone(),
                secondary: secondary.clone(),
            };
            // Only fails if every worker has exited, which join_next reports below.
            if tx.send(job).await.is_err() {
                break;
            }
        }

        drop(tx);

        let mut outcomes = Vec::with_capacity(num_pairs);
        while let Some(worker) = set.join_next().await {
            outcomes.extend(worker.context(JoinSnafu)?);
        }

        outcomes.sort_by_key(PairOutcome::key);

        if self.cancellation.is_cancelled() {
            info!("pair evaluation was cancelled");
        }

        Ok(outcomes)
    }
}
