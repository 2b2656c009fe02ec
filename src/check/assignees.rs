//! Assignee selection among assignable contributors.

use rand::{Rng, seq::SliceRandom};
use tracing::{info, instrument, warn};

use crate::service::tracker::{TrackerClient, TrackerError};

/// Pick at most `k` distinct logins from `candidates`, uniformly at random without replacement.
///
/// When there are no more than `k` candidates, all of them are returned in their original order.
pub fn sample_assignees<R>(candidates: Vec<String>, k: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    if candidates.len() <= k {
        return candidates;
    }

    candidates.choose_multiple(rng, k).cloned().collect()
}

/// Choose up to `k` contributors who can be assigned to issue `issue_number`.
///
/// Contributors are probed one by one; a failed probe skips that contributor. Failing to list
/// the contributors at all is returned to the caller.
#[instrument(skip(tracker, rng))]
pub async fn check_assignees<R>(issue_number: u64, k: usize, tracker: &TrackerClient, rng: &mut R) -> Result<Vec<String>, TrackerError>
where
    R: Rng + ?Sized,
{
    let contributors = tracker.list_contributors().await?;
    let mut assignable = Vec::with_capacity(contributors.len());

    for login in contributors {
        match tracker.is_assignable(issue_number, &login).await {
            Ok(true) => assignable.push(login),
            Ok(false) => {}
            Err(err) => warn!("Could not check whether `{}` is assignable: {}", login, err),
        }
    }

    info!("{} assignable contributor(s) found.", assignable.len());

    Ok(sample_assignees(assignable, k, rng))
}
