//! Deterministic point aggregation and leaderboard ranking. Rebuilt from
//! scratch on every request; nothing here survives across calls.

use serde::Serialize;
use tapestry_client::{CommentItem, FeedItem};

use crate::classify::{classify_content, is_completion_comment, ContentKind};

/// Fixed scoring schedule. Passed into the aggregator rather than read from
/// a global so tests can substitute alternate schedules.
#[derive(Debug, Clone, Copy)]
pub struct ScoreSchedule {
    pub post: u64,
    pub quest: u64,
    pub completion: u64,
    pub like_received: u64,
    pub comment_received: u64,
}

impl Default for ScoreSchedule {
    fn default() -> Self {
        Self {
            post: 10,
            quest: 20,
            completion: 30,
            like_received: 1,
            comment_received: 1,
        }
    }
}

pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryScore {
    pub count: u32,
    pub points: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngagementScore {
    pub points: u64,
}

/// The caller's per-category view. `totalPoints` is always the sum of these
/// five point fields, never read back from the author map.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub posts: CategoryScore,
    pub quests: CategoryScore,
    pub completions: CategoryScore,
    pub likes_received: EngagementScore,
    pub comments_received: EngagementScore,
}

impl ScoreBreakdown {
    pub fn total_points(&self) -> u64 {
        self.posts.points
            + self.quests.points
            + self.completions.points
            + self.likes_received.points
            + self.comments_received.points
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: u32,
    pub username: String,
    pub points: u64,
    pub is_you: bool,
}

/// Input sizes the score was computed from, for display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComputedFrom {
    pub posts: usize,
    pub comments: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub total_points: u64,
    pub breakdown: ScoreBreakdown,
    pub leaderboard: Vec<LeaderboardRow>,
    pub computed_from: ComputedFrom,
}

/// username → cumulative points, preserving first-points-added order. That
/// order is the leaderboard tie-break, so a plain HashMap won't do; with a
/// 50-item page the linear lookup is irrelevant.
#[derive(Debug, Default)]
struct AuthorPoints {
    entries: Vec<(String, u64)>,
}

impl AuthorPoints {
    /// Unattributed authors are skipped; their content still counts toward
    /// `computedFrom` totals at the call site.
    fn add(&mut self, author: &str, points: u64) {
        if author.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(name, _)| name == author) {
            Some((_, total)) => *total += points,
            None => self.entries.push((author.to_string(), points)),
        }
    }

    fn into_leaderboard(self, caller: &str) -> Vec<LeaderboardRow> {
        let mut entries = self.entries;
        // Stable sort: equal points keep first-added order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .take(LEADERBOARD_SIZE)
            .enumerate()
            .map(|(i, (username, points))| LeaderboardRow {
                rank: i as u32 + 1,
                is_you: username == caller,
                username,
                points,
            })
            .collect()
    }
}

/// Fold classified feed items and their comment threads into the caller's
/// breakdown plus the global leaderboard. `comment_lists` is
/// position-aligned with `items` (see the collector).
///
/// Leaderboard totals include engagement points for every author; the
/// caller's displayed total is the explicit sum of the five breakdown
/// categories. The asymmetry is deliberate: the UI only explains "why" for
/// the requester, and the two views must never drift apart.
pub fn compute(
    items: &[FeedItem],
    comment_lists: &[Vec<CommentItem>],
    caller: &str,
    schedule: &ScoreSchedule,
) -> ScoreReport {
    let mut authors = AuthorPoints::default();
    let mut breakdown = ScoreBreakdown::default();
    let mut comments_seen = 0usize;

    static EMPTY: Vec<CommentItem> = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let author = item.author_username();
        let likes = item.like_count();
        let comments = item.comment_count();
        let kind = classify_content(item);

        let content_points = match kind {
            ContentKind::Quest => schedule.quest,
            ContentKind::Post => schedule.post,
        };
        let engagement_points =
            likes * schedule.like_received + comments * schedule.comment_received;
        authors.add(author, content_points + engagement_points);

        if author == caller {
            match kind {
                ContentKind::Quest => {
                    breakdown.quests.count += 1;
                    breakdown.quests.points += schedule.quest;
                }
                ContentKind::Post => {
                    breakdown.posts.count += 1;
                    breakdown.posts.points += schedule.post;
                }
            }
            breakdown.likes_received.points += likes * schedule.like_received;
            breakdown.comments_received.points += comments * schedule.comment_received;
        }

        let thread = comment_lists.get(i).unwrap_or(&EMPTY);
        comments_seen += thread.len();

        for comment in thread {
            if is_completion_comment(comment.text()) {
                let comment_author = comment.author_username();
                authors.add(comment_author, schedule.completion);
                if comment_author == caller {
                    breakdown.completions.count += 1;
                    breakdown.completions.points += schedule.completion;
                }
            }
        }
    }

    ScoreReport {
        total_points: breakdown.total_points(),
        leaderboard: authors.into_leaderboard(caller),
        breakdown,
        computed_from: ComputedFrom {
            posts: items.len(),
            comments: comments_seen,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> FeedItem {
        serde_json::from_value(value).unwrap()
    }

    fn comment(author: &str, text: &str) -> CommentItem {
        serde_json::from_value(json!({
            "author": {"username": author},
            "text": text,
        }))
        .unwrap()
    }

    fn post(author: &str, likes: u64, comments: u64) -> FeedItem {
        item(json!({
            "id": "x",
            "text": "a post",
            "authorProfile": {"username": author},
            "socialCounts": {"likeCount": likes, "commentCount": comments},
        }))
    }

    fn quest(author: &str) -> FeedItem {
        item(json!({
            "id": "q",
            "text": "[QUEST] dig",
            "authorProfile": {"username": author},
        }))
    }

    #[test]
    fn caller_breakdown_scenario() {
        // 2 posts (10 each), 1 quest (20), 3 likes + 2 comments received,
        // 1 completion (30) on someone else's quest: 75 total.
        let items = vec![
            post("me", 2, 1),
            post("me", 1, 1),
            quest("me"),
            quest("rival"),
        ];
        let comment_lists = vec![
            vec![],
            vec![],
            vec![],
            vec![comment("me", "✅ Completed: dug it\nTx: 5abc")],
        ];

        let report = compute(&items, &comment_lists, "me", &ScoreSchedule::default());

        assert_eq!(report.breakdown.posts.count, 2);
        assert_eq!(report.breakdown.posts.points, 20);
        assert_eq!(report.breakdown.quests.count, 1);
        assert_eq!(report.breakdown.quests.points, 20);
        assert_eq!(report.breakdown.completions.count, 1);
        assert_eq!(report.breakdown.completions.points, 30);
        assert_eq!(report.breakdown.likes_received.points, 3);
        assert_eq!(report.breakdown.comments_received.points, 2);
        assert_eq!(report.total_points, 75);
    }

    #[test]
    fn leaderboard_ties_keep_first_added_order() {
        // a: 50, b: 75, c: 75 with b's points landing before c's.
        let schedule = ScoreSchedule {
            post: 25,
            ..ScoreSchedule::default()
        };
        let items = vec![
            post("a", 0, 0),
            post("b", 0, 0),
            post("c", 0, 0),
            post("a", 0, 0),
            post("b", 0, 0),
            post("c", 0, 0),
            post("b", 0, 0),
            post("c", 0, 0),
        ];
        let comment_lists = vec![vec![]; items.len()];

        let report = compute(&items, &comment_lists, "nobody", &schedule);
        let rows: Vec<(&str, u64)> = report
            .leaderboard
            .iter()
            .map(|r| (r.username.as_str(), r.points))
            .collect();
        assert_eq!(rows, vec![("b", 75), ("c", 75), ("a", 50)]);
        assert_eq!(report.leaderboard[0].rank, 1);
        assert_eq!(report.leaderboard[2].rank, 3);
    }

    #[test]
    fn leaderboard_caps_at_five_and_marks_the_caller() {
        let items: Vec<_> = (0..7)
            .map(|i| {
                let author = format!("author{i}");
                item(json!({
                    "id": "x",
                    "text": "post",
                    "authorProfile": {"username": author},
                    "socialCounts": {"likeCount": 7 - i, "commentCount": 0},
                }))
            })
            .collect();
        let comment_lists = vec![vec![]; items.len()];

        let report = compute(&items, &comment_lists, "author2", &ScoreSchedule::default());
        assert_eq!(report.leaderboard.len(), 5);
        assert!(report.leaderboard.iter().any(|r| r.is_you));
        let you = report.leaderboard.iter().find(|r| r.is_you).unwrap();
        assert_eq!(you.username, "author2");
    }

    #[test]
    fn unattributed_authors_score_nothing_but_still_count() {
        let items = vec![item(json!({"id": "x", "text": "anon post"}))];
        let comment_lists = vec![vec![]];

        let report = compute(&items, &comment_lists, "me", &ScoreSchedule::default());
        assert!(report.leaderboard.is_empty());
        assert_eq!(report.computed_from.posts, 1);
    }

    #[test]
    fn repeated_completions_each_score() {
        let items = vec![quest("rival")];
        let comment_lists = vec![vec![
            comment("me", "✅ Completed: once\nTx: 1"),
            comment("me", "✅ Completed: twice\nGRAVEYARD_QUEST_COMPLETE"),
        ]];

        let report = compute(&items, &comment_lists, "me", &ScoreSchedule::default());
        assert_eq!(report.breakdown.completions.count, 2);
        assert_eq!(report.breakdown.completions.points, 60);
    }

    #[test]
    fn ordinary_comments_do_not_score() {
        let items = vec![quest("rival")];
        let comment_lists = vec![vec![comment("me", "nice quest")]];

        let report = compute(&items, &comment_lists, "me", &ScoreSchedule::default());
        assert_eq!(report.breakdown.completions.count, 0);
        assert_eq!(report.total_points, 0);
    }

    #[test]
    fn alternate_schedule_is_honored() {
        let schedule = ScoreSchedule {
            post: 1,
            quest: 2,
            completion: 3,
            like_received: 0,
            comment_received: 0,
        };
        let items = vec![post("me", 10, 10), quest("me")];
        let comment_lists = vec![vec![], vec![]];

        let report = compute(&items, &comment_lists, "me", &schedule);
        assert_eq!(report.total_points, 3);
    }

    #[test]
    fn missing_comment_list_is_treated_as_empty() {
        let items = vec![post("me", 0, 0), post("me", 0, 0)];
        // Shorter than items on purpose.
        let comment_lists = vec![vec![comment("me", "hello")]];

        let report = compute(&items, &comment_lists, "me", &ScoreSchedule::default());
        assert_eq!(report.computed_from.comments, 1);
        assert_eq!(report.breakdown.posts.count, 2);
    }
}
