//! Gamified loyalty scoring over a Tapestry social feed. Resolves the
//! caller's identity from a wallet address, collects their visible feed and
//! every comment thread on it, classifies content and comments, and folds
//! the lot into a per-caller breakdown plus a global leaderboard. Fully
//! recomputed on every request; no score state is persisted anywhere.

pub mod classify;
pub mod collect;
pub mod error;
pub mod graph;
pub mod identity;
pub mod runner;
pub mod score;

pub use classify::{classify_content, is_completion_comment, ContentKind};
pub use error::{Result, RewardsError};
pub use graph::SocialGraph;
pub use identity::{
    fallback_username, profile_from_envelope, resolve_profile, validate_wallet, Profile,
};
pub use runner::run_bounded;
pub use score::{
    ComputedFrom, LeaderboardRow, ScoreBreakdown, ScoreReport, ScoreSchedule, LEADERBOARD_SIZE,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// The full `/rewards` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsResponse {
    pub profile: Profile,
    pub total_points: u64,
    pub breakdown: ScoreBreakdown,
    pub leaderboard: Vec<LeaderboardRow>,
    pub computed_from: ComputedFrom,
    pub computed_at: DateTime<Utc>,
}

/// End-to-end pipeline: validate the wallet, resolve the profile, collect
/// feed and comment threads, aggregate. Identity and feed failures abort
/// with the upstream status; comment-thread failures degrade per item.
pub async fn compute_for_wallet(
    graph: &dyn SocialGraph,
    wallet: &str,
    schedule: &ScoreSchedule,
) -> Result<RewardsResponse> {
    if !validate_wallet(wallet) {
        return Err(RewardsError::InvalidWallet);
    }

    let profile = resolve_profile(graph, wallet).await?;
    let (items, comment_lists) = collect::collect(graph, &profile.id).await?;
    let report = score::compute(&items, &comment_lists, &profile.username, schedule);

    info!(
        username = %profile.username,
        total_points = report.total_points,
        posts = report.computed_from.posts,
        comments = report.computed_from.comments,
        "Rewards computed"
    );

    Ok(RewardsResponse {
        profile,
        total_points: report.total_points,
        breakdown: report.breakdown,
        leaderboard: report.leaderboard,
        computed_from: report.computed_from,
        computed_at: Utc::now(),
    })
}
