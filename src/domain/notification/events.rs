use crate::domain::post::entity::Post;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Moderation outcome carried by a `PostModerated` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approved,
    Hidden,
    Unhidden,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approved => "approved",
            ModerationAction::Hidden => "hidden",
            ModerationAction::Unhidden => "unhidden",
        }
    }
}

/// State-changing events delivered to users after the triggering state is
/// committed. Delivery is fire-and-forget; a failed delivery never rolls the
/// state change back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationEvent {
    PostLiked {
        post_id: Uuid,
        post_preview: String,
        liked_by: String,
    },
    PostEdited {
        post_id: Uuid,
        post_preview: String,
    },
    PostMention {
        post_id: Uuid,
        post_preview: String,
        mentioned_by: String,
    },
    PostModerated {
        post_id: Uuid,
        post_preview: String,
        action: ModerationAction,
    },
}

/// First 50 characters of the content, with an ellipsis when truncated.
fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(50).collect();
    if content.chars().count() > 50 {
        out.push_str("...");
    }
    out
}

impl NotificationEvent {
    pub fn post_liked(post: &Post, liked_by: &str) -> Self {
        Self::PostLiked {
            post_id: post.id,
            post_preview: preview(&post.content),
            liked_by: liked_by.to_string(),
        }
    }

    pub fn post_edited(post: &Post) -> Self {
        Self::PostEdited {
            post_id: post.id,
            post_preview: preview(&post.content),
        }
    }

    pub fn post_mention(post: &Post, mentioned_by: &str) -> Self {
        Self::PostMention {
            post_id: post.id,
            post_preview: preview(&post.content),
            mentioned_by: mentioned_by.to_string(),
        }
    }

    pub fn post_moderated(post: &Post, action: ModerationAction) -> Self {
        Self::PostModerated {
            post_id: post.id,
            post_preview: preview(&post.content),
            action,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PostLiked { .. } => "post_liked",
            Self::PostEdited { .. } => "post_edited",
            Self::PostMention { .. } => "post_mention",
            Self::PostModerated { .. } => "post_moderated",
        }
    }

    /// JSON payload stored alongside the notification row.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::PostLiked {
                post_id,
                post_preview,
                liked_by,
            } => json!({
                "post_id": post_id,
                "post_preview": post_preview,
                "liked_by": liked_by,
                "url": format!("/posts/{}", post_id),
            }),
            Self::PostEdited {
                post_id,
                post_preview,
            } => json!({
                "post_id": post_id,
                "post_preview": post_preview,
                "url": format!("/posts/{}", post_id),
            }),
            Self::PostMention {
                post_id,
                post_preview,
                mentioned_by,
            } => json!({
                "post_id": post_id,
                "post_preview": post_preview,
                "mentioned_by": mentioned_by,
                "url": format!("/posts/{}", post_id),
            }),
            Self::PostModerated {
                post_id,
                post_preview,
                action,
            } => json!({
                "post_id": post_id,
                "post_preview": post_preview,
                "action": action.as_str(),
                "url": format!("/posts/{}", post_id),
            }),
        }
    }
}
