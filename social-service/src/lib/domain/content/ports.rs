use async_trait::async_trait;

use crate::content::errors::ContentError;
use crate::content::models::Comment;
use crate::content::models::CommentContent;
use crate::content::models::CommentId;
use crate::content::models::CreateCommentCommand;
use crate::content::models::CreatePostCommand;
use crate::content::models::Page;
use crate::content::models::PageRequest;
use crate::content::models::Post;
use crate::content::models::PostId;
use crate::content::models::UpdatePostCommand;
use crate::identity::models::IdentityId;

/// Port for post and comment operations.
///
/// Every mutation takes the caller's identity and is checked against the
/// resource owner before anything is written.
#[async_trait]
pub trait ContentServicePort: Send + Sync + 'static {
    async fn create_post(
        &self,
        author: IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, ContentError>;

    /// # Errors
    /// * `PostNotFound` - Post does not exist
    async fn get_post(&self, id: PostId) -> Result<Post, ContentError>;

    /// Posts newest first.
    async fn list_posts(&self, page: PageRequest) -> Result<Page<Post>, ContentError>;

    /// Replace content and image of a post.
    ///
    /// # Errors
    /// * `PostNotFound` - Post does not exist
    /// * `Forbidden` - Caller is not the post's author
    async fn update_post(
        &self,
        id: PostId,
        command: UpdatePostCommand,
        caller: IdentityId,
    ) -> Result<Post, ContentError>;

    /// # Errors
    /// * `PostNotFound` - Post does not exist
    /// * `Forbidden` - Caller is not the post's author
    async fn delete_post(&self, id: PostId, caller: IdentityId) -> Result<(), ContentError>;

    /// # Errors
    /// * `PostNotFound` - Post does not exist
    async fn create_comment(
        &self,
        post_id: PostId,
        author: IdentityId,
        command: CreateCommentCommand,
    ) -> Result<Comment, ContentError>;

    /// Comments under a post, oldest first.
    ///
    /// # Errors
    /// * `PostNotFound` - Post does not exist
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError>;

    /// # Errors
    /// * `CommentNotFound` - Comment does not exist
    /// * `Forbidden` - Caller wrote neither the comment nor the hosting post
    async fn delete_comment(&self, id: CommentId, caller: IdentityId) -> Result<(), ContentError>;
}

/// Persistence operations for posts and comments.
#[async_trait]
pub trait ContentRepository: Send + Sync + 'static {
    async fn create_post(
        &self,
        author: IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, ContentError>;

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, ContentError>;

    async fn list_posts(&self, page: PageRequest) -> Result<Page<Post>, ContentError>;

    /// # Errors
    /// * `PostNotFound` - Post does not exist
    async fn update_post(&self, post: Post) -> Result<Post, ContentError>;

    /// Delete a post together with its comments.
    ///
    /// # Errors
    /// * `PostNotFound` - Post does not exist
    async fn delete_post(&self, id: PostId) -> Result<(), ContentError>;

    async fn create_comment(
        &self,
        post_id: PostId,
        author: IdentityId,
        content: CommentContent,
    ) -> Result<Comment, ContentError>;

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, ContentError>;

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError>;

    /// # Errors
    /// * `CommentNotFound` - Comment does not exist
    async fn delete_comment(&self, id: CommentId) -> Result<(), ContentError>;
}
