use chrono::{DateTime, Utc};
use dormant_crm::{CrmApi, OrgEndpoint};
use dormant_domain::config::ScannerConfig;
use dormant_domain::constants::{DEFAULT_CONCURRENCY, DEFAULT_QUERY_TIMEOUT_SECS};
use dormant_domain::model::{ActivityOutcome, ActivityState, FailureReason, ResourceDescriptor};
use dormant_vault::Credential;
use fxhash::FxHashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::ScanError;

/// Fan-out limits for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Existence queries in flight at once.
    pub concurrency: NonZeroUsize,
    /// Bound for one query, not counting time spent waiting for a slot.
    pub query_timeout: Duration,
}

const DEFAULT_PERMITS: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CONCURRENCY) {
    Some(permits) => permits,
    None => NonZeroUsize::MIN,
};

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_PERMITS,
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

impl TryFrom<&ScannerConfig> for ScanOptions {
    type Error = ScanError;

    fn try_from(cfg: &ScannerConfig) -> Result<Self, Self::Error> {
        let concurrency = NonZeroUsize::new(cfg.concurrency).ok_or_else(|| ScanError::Internal {
            message: "concurrency must be at least 1".into(),
            context: Some("scanner.concurrency".into()),
        })?;
        Ok(Self { concurrency, query_timeout: cfg.query_timeout() })
    }
}

/// Classifies resources by issuing one bounded existence query each, concurrently.
#[derive(Debug, Clone)]
pub struct Scanner {
    crm: Arc<dyn CrmApi>,
    options: ScanOptions,
}

impl Scanner {
    #[must_use]
    pub fn new(crm: Arc<dyn CrmApi>, options: ScanOptions) -> Self {
        Self { crm, options }
    }

    /// Returns exactly one outcome per resource, in input order.
    ///
    /// A resource is active when it has a record modified at or after `since`.
    ///
    /// A failing, timed-out or panicking unit only affects its own resource.
    /// Dropping the returned future aborts every unit still in flight.
    #[instrument(
        name = "scan",
        skip_all,
        fields(
            org = %endpoint,
            resources = resources.len(),
            concurrency = self.options.concurrency.get(),
            since = %since,
        )
    )]
    pub async fn scan(
        &self,
        credential: &Arc<Credential>,
        endpoint: &OrgEndpoint,
        resources: &[ResourceDescriptor],
        since: DateTime<Utc>,
    ) -> Vec<ActivityOutcome> {
        let started = Instant::now();
        let permits = Arc::new(Semaphore::new(self.options.concurrency.get()));
        let endpoint = Arc::new(endpoint.clone());

        let mut units = JoinSet::new();
        let mut unit_index = FxHashMap::default();
        let mut slots: Vec<Option<ActivityOutcome>> = vec![None; resources.len()];

        for (index, resource) in resources.iter().enumerate() {
            let crm = Arc::clone(&self.crm);
            let credential = Arc::clone(credential);
            let endpoint = Arc::clone(&endpoint);
            let permits = Arc::clone(&permits);
            let name = resource.name.clone();
            let query_timeout = self.options.query_timeout;

            let unit = async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    let reason = FailureReason::Aborted("scan closed".to_owned());
                    return (index, ActivityOutcome::errored(name, reason));
                };

                let query = crm.has_recent_activity(&credential, &endpoint, &name, since);
                let state = match timeout(query_timeout, query).await {
                    Ok(Ok(true)) => ActivityState::Active,
                    Ok(Ok(false)) => ActivityState::Inactive,
                    Ok(Err(err)) => ActivityState::Errored(FailureReason::Query(err.to_string())),
                    Err(_) => ActivityState::Errored(FailureReason::Timeout),
                };
                (index, ActivityOutcome::new(name, state))
            };

            let handle = units.spawn(unit.in_current_span());
            unit_index.insert(handle.id(), index);
        }

        while let Some(joined) = units.join_next_with_id().await {
            let (index, outcome) = match joined {
                Ok((_, (index, outcome))) => (index, outcome),
                Err(err) => {
                    let Some(&index) = unit_index.get(&err.id()) else { continue };
                    let reason = if err.is_panic() { "unit panicked" } else { "unit cancelled" };
                    let outcome = ActivityOutcome::errored(
                        resources[index].name.clone(),
                        FailureReason::Aborted(reason.to_owned()),
                    );
                    (index, outcome)
                }
            };
            log_outcome(&outcome);
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<ActivityOutcome> = slots
            .into_iter()
            .zip(resources)
            .map(|(slot, resource)| {
                slot.unwrap_or_else(|| {
                    ActivityOutcome::errored(
                        resource.name.clone(),
                        FailureReason::Aborted("no outcome recorded".to_owned()),
                    )
                })
            })
            .collect();

        let active = outcomes.iter().filter(|o| o.is_active()).count();
        let inactive = outcomes.iter().filter(|o| o.is_inactive()).count();
        let errored = outcomes.iter().filter(|o| o.is_errored()).count();
        info!(
            active,
            inactive,
            errored,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Scan finished"
        );

        outcomes
    }
}

fn log_outcome(outcome: &ActivityOutcome) {
    match &outcome.state {
        ActivityState::Errored(reason) => {
            warn!(resource = %outcome.resource, %reason, "Activity query failed");
        }
        state => debug!(resource = %outcome.resource, ?state, "Activity classified"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_default_config() {
        let from_config = ScanOptions::try_from(&ScannerConfig::default()).unwrap();
        assert_eq!(ScanOptions::default(), from_config);
        assert_eq!(ScanOptions::default().concurrency.get(), 10);
    }
}
