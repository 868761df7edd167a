use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::content::errors::ContentTextError;
use crate::identity::models::IdentityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A post. `author_id` is fixed at creation; the author's current username
/// and the comment count are read alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author_id: IdentityId,
    pub author_username: String,
    pub content: PostContent,
    pub image: Option<String>,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment under a post. `author_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: IdentityId,
    pub author_username: String,
    pub content: CommentContent,
    pub created_at: DateTime<Utc>,
}

fn bounded_text(text: String, max: usize) -> Result<String, ContentTextError> {
    if text.trim().is_empty() {
        return Err(ContentTextError::Blank);
    }

    let actual = text.chars().count();
    if actual > max {
        Err(ContentTextError::TooLong { max, actual })
    } else {
        Ok(text)
    }
}

/// Post body: non-blank, at most 5000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    const MAX_LENGTH: usize = 5000;

    pub fn new(content: String) -> Result<Self, ContentTextError> {
        bounded_text(content, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Comment body: non-blank, at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    const MAX_LENGTH: usize = 1000;

    pub fn new(content: String) -> Result<Self, ContentTextError> {
        bounded_text(content, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Zero-based page selection with a clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Build a page request; missing values fall back to page 0, size 10.
    /// Size is clamped to `1..=100`.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size
                .unwrap_or(Self::DEFAULT_SIZE)
                .clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total,
        }
    }

    pub fn total_pages(&self) -> i64 {
        let size = i64::from(self.size);
        (self.total + size - 1) / size
    }
}

/// Command to create a post
#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub content: PostContent,
    pub image: Option<String>,
}

/// Command to replace a post's content and image
#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub content: PostContent,
    pub image: Option<String>,
}

/// Command to comment on a post
#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    pub content: CommentContent,
}
