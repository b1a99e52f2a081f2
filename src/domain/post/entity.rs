use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Core domain entity representing a user-authored text post.
///
/// Every post passes through the moderation pipeline at creation time and
/// carries a racism score in [0, 1] combining the automated classifier signal
/// with community report ratios. Visibility is controlled by two independent
/// flags rather than a single status enum.
///
/// # Lifecycle
/// 1. **Pending** - Inserted with `is_approved = false`, `is_hidden = false`
/// 2. **Scored** - The moderation engine writes `racism_score` and both flags
///    immediately after the insert
/// 3. **Reported** - Each new report re-blends the score and re-evaluates
///    `is_hidden` (never `is_approved`)
/// 4. **Curated** - Moderators approve, hide, unhide, edit, or delete
///
/// # Invariants
/// - `id` must be unique across all posts
/// - `racism_score` stays within [0, 1]
/// - `is_approved` and `is_hidden` are independent; all four combinations are
///   valid states (hidden-but-approved means "previously approved, later
///   hidden")
/// - `original_content` is written exactly once, on the first admin edit, and
///   preserves the pre-moderation text permanently
/// - `likes_count` and `views_count` are cached counters mutated only through
///   atomic relative updates
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, sqlx::FromRow)]
#[ts(export)]
pub struct Post {
    /// Unique identifier for this post
    pub id: Uuid,

    /// Author of the post
    pub user_id: Uuid,

    /// Post body, at most 280 code points
    pub content: String,

    /// Blended moderation score in [0, 1]
    pub racism_score: f64,

    /// Whether the post cleared the approval threshold at creation
    pub is_approved: bool,

    /// Whether the post is suppressed from general listings
    pub is_hidden: bool,

    /// Set on the first moderator edit and never cleared
    pub edited_by_admin: bool,

    /// The pre-edit text, captured once on the first moderator edit
    pub original_content: Option<String>,

    /// Moderator who most recently edited the post
    pub admin_editor_id: Option<Uuid>,

    /// Timestamp of the most recent moderator edit
    pub admin_edited_at: Option<DateTime<Utc>>,

    /// Number of likes (cached for performance)
    pub likes_count: i32,

    /// Number of recorded views on visible states (cached for performance)
    pub views_count: i32,

    /// Timestamp when this post was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent modification
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Builds a fresh pending post for the given author. Score and visibility
    /// flags are filled in by the moderation engine after the insert.
    pub fn pending(author_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: author_id,
            content,
            racism_score: 0.0,
            is_approved: false,
            is_hidden: false,
            edited_by_admin: false,
            original_content: None,
            admin_editor_id: None,
            admin_edited_at: None,
            likes_count: 0,
            views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the post appears in public listings.
    pub fn is_publicly_visible(&self) -> bool {
        self.is_approved && !self.is_hidden
    }
}

/// Post row joined with author identity, as served in feeds and profiles.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct FeedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub content: String,
    pub racism_score: f64,
    pub is_approved: bool,
    pub is_hidden: bool,
    pub edited_by_admin: bool,
    pub likes_count: i32,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
