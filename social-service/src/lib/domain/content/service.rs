use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::content::errors::ContentError;
use crate::content::models::Comment;
use crate::content::models::CommentId;
use crate::content::models::CreateCommentCommand;
use crate::content::models::CreatePostCommand;
use crate::content::models::Page;
use crate::content::models::PageRequest;
use crate::content::models::Post;
use crate::content::models::PostId;
use crate::content::models::UpdatePostCommand;
use crate::content::ports::ContentRepository;
use crate::content::ports::ContentServicePort;
use crate::domain::ownership;
use crate::identity::models::IdentityId;

/// Domain service implementation for posts and comments.
///
/// Existence is checked before ownership, so a missing resource is always
/// reported as not found rather than forbidden.
pub struct ContentService<CR>
where
    CR: ContentRepository,
{
    repository: Arc<CR>,
}

impl<CR> ContentService<CR>
where
    CR: ContentRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }

    async fn existing_post(&self, id: PostId) -> Result<Post, ContentError> {
        self.repository
            .find_post(id)
            .await?
            .ok_or(ContentError::PostNotFound(id))
    }

    async fn owned_post(&self, id: PostId, caller: IdentityId) -> Result<Post, ContentError> {
        let post = self.existing_post(id).await?;

        if !ownership::can_mutate(post.author_id, caller) {
            tracing::warn!(
                post_id = %id,
                caller = %caller,
                "Rejected mutation of a post owned by another identity"
            );
            return Err(ContentError::Forbidden("post"));
        }

        Ok(post)
    }
}

#[async_trait]
impl<CR> ContentServicePort for ContentService<CR>
where
    CR: ContentRepository,
{
    async fn create_post(
        &self,
        author: IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, ContentError> {
        let post = self.repository.create_post(author, command).await?;
        tracing::info!(post_id = %post.id, author = %author, "Post created");
        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Post, ContentError> {
        self.existing_post(id).await
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Page<Post>, ContentError> {
        self.repository.list_posts(page).await
    }

    async fn update_post(
        &self,
        id: PostId,
        command: UpdatePostCommand,
        caller: IdentityId,
    ) -> Result<Post, ContentError> {
        let mut post = self.owned_post(id, caller).await?;

        post.content = command.content;
        post.image = command.image;
        post.updated_at = Utc::now();

        self.repository.update_post(post).await
    }

    async fn delete_post(&self, id: PostId, caller: IdentityId) -> Result<(), ContentError> {
        self.owned_post(id, caller).await?;
        self.repository.delete_post(id).await?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        author: IdentityId,
        command: CreateCommentCommand,
    ) -> Result<Comment, ContentError> {
        self.existing_post(post_id).await?;

        self.repository
            .create_comment(post_id, author, command.content)
            .await
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        self.existing_post(post_id).await?;
        self.repository.list_comments(post_id).await
    }

    async fn delete_comment(&self, id: CommentId, caller: IdentityId) -> Result<(), ContentError> {
        let comment = self
            .repository
            .find_comment(id)
            .await?
            .ok_or(ContentError::CommentNotFound(id))?;
        let hosting_post = self.existing_post(comment.post_id).await?;

        if !ownership::can_delete_comment(comment.author_id, hosting_post.author_id, caller) {
            tracing::warn!(
                comment_id = %id,
                caller = %caller,
                "Rejected deletion of a comment by a third party"
            );
            return Err(ContentError::Forbidden("comment"));
        }

        self.repository.delete_comment(id).await
    }
}
