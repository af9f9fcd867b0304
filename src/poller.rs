//! Completion polling for asynchronous generation jobs.

use crate::error::{LumaError, Result};
use crate::luma::{AssetKind, Assets, LumaApi};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Bounds for a single polling run.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Upper bound of the randomized sleep between polls.
    pub max_sleep: Duration,
    /// Maximum number of status requests.
    pub max_attempts: u32,
    /// Wall-clock limit measured from the first poll.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_sleep: Duration::from_secs(1),
            max_attempts: 600,
            timeout: Duration::from_secs(900),
        }
    }
}

impl PollPolicy {
    /// Uniformly random sleep in `[0, max_sleep]`.
    fn jitter(&self) -> Duration {
        let max_ms = self.max_sleep.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// A generation whose required assets are available.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedGeneration {
    pub id: String,
    pub assets: Assets,
}

impl CompletedGeneration {
    /// URL of an asset the poller waited for.
    pub fn url(&self, kind: AssetKind) -> Result<&str> {
        self.assets.get(kind).ok_or_else(|| LumaError::MissingAsset {
            id: self.id.clone(),
            kind,
        })
    }
}

/// Polls a generation until its required assets exist or it resolves otherwise.
pub struct Poller<'a, A: LumaApi + ?Sized> {
    api: &'a A,
    policy: PollPolicy,
}

impl<'a, A: LumaApi + ?Sized> Poller<'a, A> {
    pub fn new(api: &'a A, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    /// Wait for `required` assets of generation `id`.
    ///
    /// Stops with an error the first time the job reports `failed`, when it
    /// reports `completed` without a required asset, or when the attempt or
    /// time budget runs out.
    #[instrument(skip(self), fields(max_attempts = self.policy.max_attempts))]
    pub async fn wait_for(&self, id: &str, required: &[AssetKind]) -> Result<CompletedGeneration> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let generation = self.api.get_generation(id).await?;
            debug!(attempt = attempts, status = %generation.status, "Polled generation");

            if generation.status.is_failed() {
                let reason = generation
                    .failure_reason
                    .unwrap_or_else(|| "no failure reason given".to_string());
                warn!("Generation failed: {}", reason);
                return Err(LumaError::GenerationFailed {
                    id: id.to_string(),
                    reason,
                });
            }

            let missing = required
                .iter()
                .copied()
                .find(|kind| generation.assets.get(*kind).is_none());

            match missing {
                None => {
                    info!(attempts, "Generation ready");
                    return Ok(CompletedGeneration {
                        id: id.to_string(),
                        assets: generation.assets,
                    });
                }
                Some(kind) if generation.status.is_completed() => {
                    return Err(LumaError::MissingAsset {
                        id: id.to_string(),
                        kind,
                    });
                }
                Some(_) => {}
            }

            let elapsed = started.elapsed();
            if attempts >= self.policy.max_attempts || elapsed >= self.policy.timeout {
                return Err(LumaError::PollTimeout {
                    id: id.to_string(),
                    attempts,
                    elapsed_secs: elapsed.as_secs_f64(),
                });
            }

            tokio::time::sleep(self.policy.jitter()).await;
        }
    }
}
