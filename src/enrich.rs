use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::directory::DirectoryClient;
use crate::models::{EnrichedMember, Proficiency, RosterEntry};
use crate::progress::Progress;

/// Fetches job levels for every roster entry, at most `concurrency` at a
/// time. Results come back in completion order; a failed lookup becomes
/// `Proficiency::Missing` and never stops the batch.
pub async fn enrich<C>(
    client: &C,
    roster: Vec<RosterEntry>,
    concurrency: usize,
    progress: &mut dyn Progress,
) -> Vec<EnrichedMember>
where
    C: DirectoryClient + ?Sized,
{
    let total = roster.len();
    let mut members = Vec::with_capacity(total);
    progress.begin(total);

    let mut lookups = stream::iter(roster)
        .map(|entry| async move {
            let outcome = client.job_proficiency(&entry.id).await;
            (entry, outcome)
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((entry, outcome)) = lookups.next().await {
        let proficiency = match outcome {
            Ok(Proficiency::Missing) => {
                progress.log(&format!("Failed to get jobs of {}.", entry.name));
                Proficiency::Missing
            }
            Ok(proficiency) => proficiency,
            Err(err) => {
                warn!(member = %entry.id, error = %err, "job lookup failed");
                progress.log(&format!("Failed to get jobs of {}.", entry.name));
                Proficiency::Missing
            }
        };

        members.push(EnrichedMember::new(entry, proficiency));
        progress.item_done(members.len(), total);
    }

    progress.finish();
    members
}
