//! Blog feed view-model
//!
//! Posts and comments arrive in two independently-scheduled fetches. The
//! comment fetch is guarded by a monotonically increasing feed generation
//! counter so it fires exactly once per post-list change, and the merge is
//! idempotent: applying the same comment batch twice yields the same feed.

use crate::error::{AppError, Result};
use crate::forms::{CommentForm, PostForm};
use crate::gateway::records::{NewComment, NewPost};
use crate::gateway::Records;
use crate::models::{Comment, Post};
use crate::session::Session;
use crate::vm::LoadState;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const UNKNOWN_AUTHOR: &str = "unknown";

/// One comment as rendered under a post.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub text: String,
}

/// One post with its resolved author name and attached comments.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub author: String,
    pub comments: Vec<CommentView>,
}

pub struct BlogFeed {
    session: Arc<Session>,
    records: Records,
    state: LoadState<Vec<PostView>>,
    /// Bumped whenever the post list changes identity (load, new post).
    generation: u64,
    /// Generation the comment merge last completed against.
    merged_generation: u64,
    /// Author id -> username, captured at load time.
    authors: HashMap<Uuid, String>,
}

impl BlogFeed {
    pub fn new(session: Arc<Session>, records: Records) -> Self {
        Self {
            session,
            records,
            state: LoadState::Idle,
            generation: 0,
            merged_generation: 0,
            authors: HashMap::new(),
        }
    }

    pub fn state(&self) -> &LoadState<Vec<PostView>> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn author_name(&self, author_id: Uuid) -> String {
        self.authors
            .get(&author_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    /// Fetch posts newest-first and resolve author names. Comments start
    /// empty; `sync_comments` attaches them in a separate round trip.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        let posts = match self.records.posts().await {
            Ok(posts) => posts,
            Err(err) => {
                warn!("post fetch failed: {err}");
                self.state = LoadState::Failed("could not load the feed".to_string());
                return;
            }
        };

        match self.records.all_users().await {
            Ok(users) => {
                self.authors = users.into_iter().map(|u| (u.id, u.username)).collect();
            }
            Err(err) => {
                // Feed still renders; authors degrade to a placeholder.
                warn!("author lookup failed: {err}");
            }
        }

        let views = posts
            .into_iter()
            .map(|post| PostView {
                author: self.author_name(post.author_id),
                post,
                comments: Vec::new(),
            })
            .collect();

        self.state = LoadState::Ready(views);
        self.generation += 1;
    }

    /// Fetch all comments and attach them to their posts. Runs at most once
    /// per feed generation; returns `false` when the current generation is
    /// already merged or the feed is not loaded. On failure the feed keeps
    /// its prior comments and the generation stays unmerged.
    pub async fn sync_comments(&mut self) -> Result<bool> {
        if self.state.ready().is_none() || self.merged_generation == self.generation {
            return Ok(false);
        }

        let comments = self.records.comments().await?;
        let mut grouped: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
        for comment in &comments {
            grouped
                .entry(comment.post_id)
                .or_default()
                .push(CommentView {
                    id: comment.id,
                    author: self.author_name(comment.author_id),
                    text: comment.content.clone(),
                });
        }

        if let Some(posts) = self.state.ready_mut() {
            for view in posts.iter_mut() {
                view.comments = grouped.remove(&view.post.id).unwrap_or_default();
            }
        }

        self.merged_generation = self.generation;
        debug!(generation = self.generation, "comments merged");
        Ok(true)
    }

    /// Admin-only post creation. The role gate runs before any gateway call;
    /// the post appears in the feed only after the gateway acknowledges it,
    /// using the server-assigned id and timestamp.
    pub async fn submit_post(&mut self, form: &PostForm) -> Result<Post> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "only admins can publish posts".to_string(),
            ));
        }

        let validated = form.validate()?;
        let post = self
            .records
            .insert_post(NewPost {
                author_id: user.id,
                content: validated.content,
                image_url: validated.image_url,
                video_url: validated.video_url,
            })
            .await?;

        self.authors.insert(user.id, user.username.clone());
        if let Some(posts) = self.state.ready_mut() {
            posts.insert(
                0,
                PostView {
                    post: post.clone(),
                    author: user.username,
                    comments: Vec::new(),
                },
            );
            self.generation += 1;
        }
        Ok(post)
    }

    /// Append a confirmed comment to exactly the matching post, leaving
    /// sibling posts untouched.
    pub async fn submit_comment(&mut self, post_id: Uuid, form: &CommentForm) -> Result<Comment> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;
        let text = form.validate()?;

        let comment = self
            .records
            .insert_comment(NewComment {
                post_id,
                author_id: user.id,
                content: text,
            })
            .await?;

        if let Some(posts) = self.state.ready_mut() {
            if let Some(view) = posts.iter_mut().find(|v| v.post.id == post_id) {
                view.comments.push(CommentView {
                    id: comment.id,
                    author: user.username,
                    text: comment.content.clone(),
                });
            }
        }
        Ok(comment)
    }
}
