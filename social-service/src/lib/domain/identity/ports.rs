use async_trait::async_trait;

use crate::identity::errors::IdentityError;
use crate::identity::models::AuthSession;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::IdentityProfile;
use crate::identity::models::LoginCommand;
use crate::identity::models::NewIdentity;
use crate::identity::models::RegisterCommand;
use crate::identity::models::UpdateProfileCommand;

/// Port for registration, login, token refresh and profile operations.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Register a new identity and open a session for it.
    ///
    /// # Arguments
    /// * `command` - Validated registration fields
    ///
    /// # Returns
    /// Token pair and profile with zeroed counters
    ///
    /// # Errors
    /// * `PasswordMismatch` - Password and confirmation differ
    /// * `UsernameTaken` - Username is already taken
    /// * `EmailTaken` - Email is already registered
    /// * `WeakPassword` - Password fails the strength policy
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, IdentityError>;

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Identity unknown or password wrong (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, IdentityError>;

    /// Exchange a live refresh token for a fresh token pair.
    ///
    /// The presented token is not revoked and stays usable until it expires.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is not live or is not a refresh token
    /// * `UnknownSubject` - Subject no longer resolves to an identity
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, IdentityError>;

    /// Resolve the identity an access token was issued to.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is not a live access token
    /// * `UnknownSubject` - Subject no longer resolves to an identity
    async fn resolve_from_token(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Whether no identity uses this username.
    async fn is_username_available(&self, username: &str) -> Result<bool, IdentityError>;

    /// Whether no identity uses this email.
    async fn is_email_available(&self, email: &str) -> Result<bool, IdentityError>;

    /// Retrieve an identity with its activity counters.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn get_profile(&self, id: IdentityId) -> Result<IdentityProfile, IdentityError>;

    /// Update profile fields of an existing identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `UsernameTaken` - New username belongs to another identity
    /// * `EmailTaken` - New email belongs to another identity
    async fn update_profile(
        &self,
        id: IdentityId,
        command: UpdateProfileCommand,
    ) -> Result<IdentityProfile, IdentityError>;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity to storage.
    ///
    /// # Arguments
    /// * `identity` - Identity fields without id or timestamps
    ///
    /// # Returns
    /// Stored identity with assigned id
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already taken
    /// * `EmailTaken` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;

    /// Retrieve identity by identifier.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity whose username or email equals `identifier`.
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, IdentityError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError>;

    /// Whether an identity other than `excluded` uses this username.
    async fn exists_by_username_excluding(
        &self,
        username: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError>;

    /// Whether an identity other than `excluded` uses this email.
    async fn exists_by_email_excluding(
        &self,
        email: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError>;

    /// Update existing identity in storage.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `UsernameTaken` - New username is already taken
    /// * `EmailTaken` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
}

/// Activity counters kept by the content side.
#[async_trait]
pub trait AuthorActivity: Send + Sync + 'static {
    async fn count_posts_by_author(&self, author: IdentityId) -> Result<i64, IdentityError>;

    async fn count_comments_by_author(&self, author: IdentityId) -> Result<i64, IdentityError>;
}
