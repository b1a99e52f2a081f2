use crate::{
    application::publish_post::dto::PublishPostRequest,
    domain::{
        notification::events::NotificationEvent,
        post::{
            entity::Post, errors::DomainError, repository::PostRepository,
            value_objects::PostContent,
        },
        user::repository::UserRepository,
    },
    infrastructure::{moderation::engine::ModerationEngine, notifications::dispatcher::NotificationDispatcher},
};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

lazy_static! {
    static ref MENTION_REGEX: regex::Regex =
        regex::Regex::new(r"@([A-Za-z0-9_]{3,30})").unwrap();
}

/// Usernames mentioned as `@name` in the content, deduplicated, in order of
/// first appearance.
pub fn parse_mentions(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MENTION_REGEX
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Publishes a post: pending insert, moderation pass, mention notifications.
///
/// The insert and the moderation update are two separate writes; a post
/// briefly exists pending with its column defaults before the engine's
/// verdict lands.
pub struct PublishPostUseCase {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    engine: Arc<ModerationEngine>,
    notifier: Arc<NotificationDispatcher>,
}

impl PublishPostUseCase {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        engine: Arc<ModerationEngine>,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            posts,
            users,
            engine,
            notifier,
        }
    }

    #[instrument(skip(self, request), fields(author_id = %author_id))]
    pub async fn execute(
        &self,
        author_id: Uuid,
        author_username: &str,
        request: PublishPostRequest,
    ) -> Result<Post, DomainError> {
        let content = PostContent::new(request.content)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let pending = Post::pending(author_id, content.value);
        let created = self.posts.create(&pending).await?;

        let score = self.engine.analyze_content(&created.content).await;
        let moderated = self
            .posts
            .apply_moderation(
                created.id,
                score,
                self.engine.approves(score),
                self.engine.hides(score),
            )
            .await?;

        info!(
            post_id = %moderated.id,
            score = moderated.racism_score,
            approved = moderated.is_approved,
            hidden = moderated.is_hidden,
            "Post published and moderated"
        );

        self.notify_mentions(&moderated, author_username).await;

        Ok(moderated)
    }

    /// Dispatches a mention notification to every existing user named in the
    /// content, except the author themselves.
    async fn notify_mentions(&self, post: &Post, author_username: &str) {
        for name in parse_mentions(&post.content) {
            if name == author_username {
                continue;
            }
            match self.users.find_by_username(&name).await {
                Ok(Some(user)) if user.id != post.user_id => {
                    self.notifier
                        .notify(user.id, NotificationEvent::post_mention(post, author_username))
                        .await;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(mention = %name, error = %e, "Mention lookup failed");
                }
            }
        }
    }
}
