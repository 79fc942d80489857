//! Flattening and truncation of per-provider contributions

use super::types::Record;
use crate::search::ProviderOutcome;

/// Concatenate provider contributions in submission order.
///
/// Failed providers contribute nothing. Each contribution is normalized
/// against its provider profile and capped at `per_provider_cap` records.
/// Records are neither deduplicated nor re-sorted.
pub fn flatten(outcomes: Vec<ProviderOutcome>, per_provider_cap: usize) -> Vec<Record> {
    let mut records = Vec::new();

    for outcome in outcomes {
        let ProviderOutcome {
            profile, result, ..
        } = outcome;

        let Ok(contribution) = result else {
            continue;
        };

        records.extend(
            contribution
                .into_iter()
                .take(per_provider_cap)
                .map(|record| record.normalize(&profile)),
        );
    }

    records
}

/// Keep the first `limit` records; a zero limit yields an empty list
pub fn truncate(mut records: Vec<Record>, limit: usize) -> Vec<Record> {
    records.truncate(limit);
    records
}
