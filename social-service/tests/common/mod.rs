use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashParams;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenConfig;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use social_service::content::errors::ContentError;
use social_service::content::models::Comment;
use social_service::content::models::CommentContent;
use social_service::content::models::CommentId;
use social_service::content::models::CreatePostCommand;
use social_service::content::models::Page;
use social_service::content::models::PageRequest;
use social_service::content::models::Post;
use social_service::content::models::PostId;
use social_service::content::ports::ContentRepository;
use social_service::content::service::ContentService;
use social_service::identity::errors::IdentityError;
use social_service::identity::models::Identity;
use social_service::identity::models::IdentityId;
use social_service::identity::models::NewIdentity;
use social_service::identity::ports::AuthorActivity;
use social_service::identity::ports::IdentityRepository;
use social_service::identity::service::AuthenticationService;
use social_service::inbound::http::router::create_router;

pub const ACCESS_TTL_MS: i64 = 60_000;
pub const REFRESH_TTL_MS: i64 = 120_000;
pub const PASSWORD: &str = "secret123";

const SIGNING_KEY: &[u8] = b"integration-test-signing-key-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(Utc::now().timestamp_millis()));
        let codec = TokenCodec::with_clock(
            TokenConfig::new(SIGNING_KEY.to_vec(), ACCESS_TTL_MS, REFRESH_TTL_MS),
            clock.clone(),
        )
        .expect("Failed to create token codec");
        let hasher = PasswordHasher::with_params(HashParams::new(8, 1, 1, None).unwrap());
        let authenticator = Arc::new(Authenticator::from_parts(hasher, codec));

        let store = Arc::new(InMemoryStore::default());
        let auth_service = Arc::new(AuthenticationService::new(
            store.clone(),
            store.clone(),
            authenticator,
        ));
        let content_service = Arc::new(ContentService::new(store));

        let router = create_router(auth_service, content_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).bearer_auth(token)
    }

    /// Register `username` with the shared test password and return the
    /// response `data` object.
    pub async fn register(&self, username: &str) -> Value {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
                "confirm_password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register `username` and return its access token.
    pub async fn access_token(&self, username: &str) -> String {
        self.register(username).await["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    /// Create a post and return its id.
    pub async fn create_post(&self, token: &str, content: &str) -> i64 {
        let response = self
            .post_authenticated("/api/posts", token)
            .json(&json!({ "content": content }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("post id missing")
    }
}

#[derive(Default)]
struct StoreState {
    identities: Vec<Identity>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username_of(&self, id: IdentityId) -> String {
        self.identities
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.username.to_string())
            .unwrap_or_default()
    }

    // Author names and comment counts are read live, like the SQL joins.
    fn hydrate_post(&self, post: &Post) -> Post {
        Post {
            author_username: self.username_of(post.author_id),
            comment_count: self
                .comments
                .iter()
                .filter(|c| c.post_id == post.id)
                .count() as i64,
            ..post.clone()
        }
    }

    fn hydrate_comment(&self, comment: &Comment) -> Comment {
        Comment {
            author_username: self.username_of(comment.author_id),
            ..comment.clone()
        }
    }
}

/// Storage double backing every repository port with plain vectors.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock poisoned")
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        let mut state = self.state();
        if state
            .identities
            .iter()
            .any(|i| i.username == identity.username)
        {
            return Err(IdentityError::UsernameTaken(identity.username.to_string()));
        }
        if state.identities.iter().any(|i| i.email == identity.email) {
            return Err(IdentityError::EmailTaken(identity.email.to_string()));
        }

        let now = Utc::now();
        let created = Identity {
            id: IdentityId(state.next_id()),
            username: identity.username,
            email: identity.email,
            password_hash: identity.password_hash,
            biography: identity.biography,
            cover_image: None,
            created_at: now,
            updated_at: now,
        };
        state.identities.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self.state().identities.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .state()
            .identities
            .iter()
            .find(|i| i.username.as_str() == username)
            .cloned())
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .state()
            .identities
            .iter()
            .find(|i| i.username.as_str() == identifier || i.email.as_str() == identifier)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError> {
        Ok(self
            .state()
            .identities
            .iter()
            .any(|i| i.email.as_str() == email))
    }

    async fn exists_by_username_excluding(
        &self,
        username: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError> {
        Ok(self
            .state()
            .identities
            .iter()
            .any(|i| i.username.as_str() == username && i.id != excluded))
    }

    async fn exists_by_email_excluding(
        &self,
        email: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError> {
        Ok(self
            .state()
            .identities
            .iter()
            .any(|i| i.email.as_str() == email && i.id != excluded))
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut state = self.state();
        let slot = state
            .identities
            .iter_mut()
            .find(|i| i.id == identity.id)
            .ok_or(IdentityError::NotFound(identity.id.to_string()))?;
        *slot = identity.clone();
        Ok(identity)
    }
}

#[async_trait]
impl AuthorActivity for InMemoryStore {
    async fn count_posts_by_author(&self, author: IdentityId) -> Result<i64, IdentityError> {
        Ok(self
            .state()
            .posts
            .iter()
            .filter(|p| p.author_id == author)
            .count() as i64)
    }

    async fn count_comments_by_author(&self, author: IdentityId) -> Result<i64, IdentityError> {
        Ok(self
            .state()
            .comments
            .iter()
            .filter(|c| c.author_id == author)
            .count() as i64)
    }
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn create_post(
        &self,
        author: IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, ContentError> {
        let mut state = self.state();
        let now = Utc::now();
        let post = Post {
            id: PostId(state.next_id()),
            author_id: author,
            author_username: String::new(),
            content: command.content,
            image: command.image,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.posts.push(post.clone());
        Ok(state.hydrate_post(&post))
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, ContentError> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.hydrate_post(p)))
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Page<Post>, ContentError> {
        let state = self.state();
        // Ids grow monotonically, so reverse insertion order is newest first.
        let items = state
            .posts
            .iter()
            .rev()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .map(|p| state.hydrate_post(p))
            .collect();
        Ok(Page::new(items, page, state.posts.len() as i64))
    }

    async fn update_post(&self, post: Post) -> Result<Post, ContentError> {
        let mut state = self.state();
        let slot = state
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(ContentError::PostNotFound(post.id))?;
        *slot = post.clone();
        Ok(state.hydrate_post(&post))
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ContentError> {
        let mut state = self.state();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(ContentError::PostNotFound(id));
        }
        state.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        author: IdentityId,
        content: CommentContent,
    ) -> Result<Comment, ContentError> {
        let mut state = self.state();
        if !state.posts.iter().any(|p| p.id == post_id) {
            return Err(ContentError::PostNotFound(post_id));
        }
        let comment = Comment {
            id: CommentId(state.next_id()),
            post_id,
            author_id: author,
            author_username: String::new(),
            content,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(state.hydrate_comment(&comment))
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, ContentError> {
        let state = self.state();
        Ok(state
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| state.hydrate_comment(c)))
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        let state = self.state();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| state.hydrate_comment(c))
            .collect())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ContentError> {
        let mut state = self.state();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(ContentError::CommentNotFound(id));
        }
        Ok(())
    }
}
