use chrono::{DateTime, Utc};
use log::debug;

use crate::client::Cluster;
use crate::config::Config;
use crate::delete::delete_all;
use crate::error::CurationError;
use crate::report::{format_report, PlannedAction};

/// One full enumerate-filter-delete cycle. Listed names are sorted so the
/// report is deterministic even for the unordered alias mapping.
pub async fn run<C: Cluster>(
    client: &C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String, CurationError> {
    let eligible = candidates(client, config, now).await?;
    let deleted = delete_all(client, eligible, config.batch_size).await?;
    Ok(format_report(&deleted))
}

/// Evaluates every listed index without deleting anything.
pub async fn plan<C: Cluster>(
    client: &C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Vec<PlannedAction>, CurationError> {
    let mut names = config.source.list(client).await?;
    names.sort();

    let policy = config.policy();
    Ok(names
        .iter()
        .map(|name| PlannedAction::new(name, policy.evaluate(name, now)))
        .collect())
}

async fn candidates<C: Cluster>(
    client: &C,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Vec<String>, CurationError> {
    let mut names = config.source.list(client).await?;
    names.sort();

    let policy = config.policy();
    let eligible = names
        .into_iter()
        .filter(|name| policy.is_deletable(name, now))
        .collect::<Vec<_>>();

    debug!("{} indices fall outside the retention window", eligible.len());
    Ok(eligible)
}
