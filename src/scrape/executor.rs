//! Scrape fan-out.
//!
//! # Responsibilities
//! - Resolve every configured address concurrently, one task per address
//! - Bound in-flight resolutions with a semaphore
//! - Enforce an overall scrape deadline on top of per-call timeouts
//! - Join results back by index so outcomes follow configuration order
//!
//! # Design Decisions
//! - Partial failure never fails the scrape; every address yields an outcome
//! - Work still pending at the deadline is aborted and recorded as a timeout
//! - Dropping the scrape future aborts its tasks (JoinSet drop)

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::U256;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout_at;

use crate::blockchain::NetworkRegistry;
use crate::config::{Config, ScrapeSettings};
use crate::scrape::outcome::{BalanceOutcome, FailureKind};
use crate::scrape::resolver::BalanceResolver;

/// Concurrency and deadline bounds for one scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeLimits {
    pub max_concurrency: usize,
    pub deadline: Duration,
}

impl ScrapeLimits {
    /// Limits from settings; an unset cap means one slot per address.
    pub fn from_settings(settings: &ScrapeSettings, address_count: usize) -> Self {
        Self {
            max_concurrency: settings.max_concurrency.unwrap_or(address_count).max(1),
            deadline: Duration::from_secs(settings.deadline_secs),
        }
    }
}

/// Produces the complete outcome set for one scrape.
#[derive(Debug, Clone)]
pub struct ScrapeExecutor {
    config: Arc<Config>,
    resolver: BalanceResolver,
    limits: ScrapeLimits,
}

impl ScrapeExecutor {
    pub fn new(config: Arc<Config>, resolver: BalanceResolver, limits: ScrapeLimits) -> Self {
        Self {
            config,
            resolver,
            limits,
        }
    }

    /// Executor with the timeouts and cap taken from the configuration.
    pub fn from_config(config: Arc<Config>, registry: Arc<NetworkRegistry>) -> Self {
        let settings = *config.scrape();
        let rpc_timeout = Duration::from_secs(settings.rpc_timeout_secs);
        let resolver = BalanceResolver::new(registry, rpc_timeout);
        let limits = ScrapeLimits::from_settings(&settings, config.addresses().len());
        Self::new(config, resolver, limits)
    }

    pub fn limits(&self) -> ScrapeLimits {
        self.limits
    }

    /// Resolve every configured address.
    ///
    /// Returns exactly one outcome per address, in configuration order.
    pub async fn scrape(&self) -> Vec<BalanceOutcome> {
        let started = Instant::now();
        let addresses = self.config.addresses();
        let semaphore = Arc::new(Semaphore::new(self.limits.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, watched) in addresses.iter().enumerate() {
            let resolver = self.resolver.clone();
            let watched = watched.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                // Never closed, so acquisition only waits.
                let _permit = semaphore.acquire_owned().await;
                (index, resolver.resolve(&watched).await)
            });
        }

        let deadline = tokio::time::Instant::now().checked_add(self.limits.deadline);
        let mut results: Vec<Option<Result<U256, FailureKind>>> = vec![None; addresses.len()];
        let mut deadline_hit = false;

        loop {
            let joined = match deadline {
                Some(deadline) => timeout_at(deadline, tasks.join_next()).await,
                // Unrepresentable deadline; per-call timeouts still bound each task.
                None => Ok(tasks.join_next().await),
            };
            match joined {
                Ok(Some(Ok((index, result)))) => {
                    results[index] = Some(result.map_err(|f| f.kind()))
                }
                Ok(Some(Err(e))) => tracing::error!(error = %e, "Balance resolution task failed"),
                Ok(None) => break,
                Err(_) => {
                    deadline_hit = true;
                    break;
                }
            }
        }

        if deadline_hit {
            // Keep anything that finished while we were timing out.
            while let Some(joined) = tasks.try_join_next() {
                if let Ok((index, result)) = joined {
                    results[index] = Some(result.map_err(|f| f.kind()));
                }
            }
            tasks.abort_all();
            tracing::warn!(
                deadline_ms = self.limits.deadline.as_millis() as u64,
                pending = results.iter().filter(|r| r.is_none()).count(),
                "Scrape deadline reached, recording pending addresses as timeouts"
            );
        }

        // Missing without a deadline means the task died.
        let missing = if deadline_hit {
            FailureKind::Timeout
        } else {
            FailureKind::InternalFault
        };

        let outcomes: Vec<BalanceOutcome> = addresses
            .iter()
            .zip(results)
            .map(|(watched, result)| BalanceOutcome::new(watched, result.unwrap_or(Err(missing))))
            .collect();

        tracing::info!(
            addresses = outcomes.len(),
            failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scrape complete"
        );

        outcomes
    }
}
