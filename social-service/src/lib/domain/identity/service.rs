use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenKind;
use auth::TokenPair;
use chrono::Utc;

use crate::identity::errors::IdentityError;
use crate::identity::models::AuthSession;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::IdentityProfile;
use crate::identity::models::LoginCommand;
use crate::identity::models::NewIdentity;
use crate::identity::models::RegisterCommand;
use crate::identity::models::UpdateProfileCommand;
use crate::identity::ports::AuthenticationServicePort;
use crate::identity::ports::AuthorActivity;
use crate::identity::ports::IdentityRepository;

/// Domain service implementation for authentication and profile operations.
///
/// Holds no per-user state: sessions exist only as signed tokens, and every
/// call resolves identities through the repository.
pub struct AuthenticationService<IR, AA>
where
    IR: IdentityRepository,
    AA: AuthorActivity,
{
    identities: Arc<IR>,
    activity: Arc<AA>,
    authenticator: Arc<Authenticator>,
}

impl<IR, AA> AuthenticationService<IR, AA>
where
    IR: IdentityRepository,
    AA: AuthorActivity,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `identities` - Identity persistence implementation
    /// * `activity` - Post and comment counters
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(identities: Arc<IR>, activity: Arc<AA>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            identities,
            activity,
            authenticator,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, IdentityError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| IdentityError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| IdentityError::Unknown(format!("Password hashing failed: {}", e)))
    }

    async fn verify_and_issue(
        &self,
        password: String,
        stored_hash: Option<String>,
        subject: String,
    ) -> Result<TokenPair, IdentityError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, stored_hash.as_deref(), &subject)
        })
        .await
        .map_err(|e| IdentityError::Unknown(format!("Password verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
            other => IdentityError::Unknown(format!("Authentication failed: {}", other)),
        })
    }

    fn issue_tokens(&self, identity: &Identity) -> Result<TokenPair, IdentityError> {
        self.authenticator
            .issue_token_pair(identity.username.as_str())
            .map_err(|e| IdentityError::Unknown(format!("Token generation failed: {}", e)))
    }

    async fn profile_of(&self, identity: Identity) -> Result<IdentityProfile, IdentityError> {
        let post_count = self.activity.count_posts_by_author(identity.id).await?;
        let comment_count = self.activity.count_comments_by_author(identity.id).await?;

        Ok(IdentityProfile {
            identity,
            post_count,
            comment_count,
        })
    }

    async fn identity_for_subject(&self, token: &str) -> Result<Identity, IdentityError> {
        let subject = self
            .authenticator
            .token_codec()
            .subject_of(token)
            .map_err(|_| IdentityError::InvalidToken)?;

        self.identities
            .find_by_username(&subject)
            .await?
            .ok_or(IdentityError::UnknownSubject)
    }
}

#[async_trait]
impl<IR, AA> AuthenticationServicePort for AuthenticationService<IR, AA>
where
    IR: IdentityRepository,
    AA: AuthorActivity,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, IdentityError> {
        if command.password != command.confirm_password {
            return Err(IdentityError::PasswordMismatch);
        }

        if self
            .identities
            .exists_by_username(command.username.as_str())
            .await?
        {
            return Err(IdentityError::UsernameTaken(command.username.to_string()));
        }

        if self.identities.exists_by_email(command.email.as_str()).await? {
            return Err(IdentityError::EmailTaken(command.email.to_string()));
        }

        self.authenticator
            .check_password_strength(&command.password)?;

        let password_hash = self.hash_password(command.password).await?;

        let identity = self
            .identities
            .create(NewIdentity {
                username: command.username,
                email: command.email,
                password_hash,
                biography: command.biography,
            })
            .await?;

        let tokens = self.issue_tokens(&identity)?;

        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            "Identity registered"
        );

        Ok(AuthSession {
            tokens,
            profile: IdentityProfile {
                identity,
                post_count: 0,
                comment_count: 0,
            },
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, IdentityError> {
        let identity = self
            .identities
            .find_by_username_or_email(command.identifier.as_str())
            .await?;

        let (stored_hash, subject) = match &identity {
            Some(found) => (
                Some(found.password_hash.clone()),
                found.username.as_str().to_string(),
            ),
            None => (None, String::new()),
        };

        let tokens = match self
            .verify_and_issue(command.password, stored_hash, subject)
            .await
        {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!("Login rejected");
                return Err(e);
            }
        };
        let identity = identity.ok_or(IdentityError::InvalidCredentials)?;

        tracing::info!(identity_id = %identity.id, "Identity logged in");

        Ok(AuthSession {
            tokens,
            profile: self.profile_of(identity).await?,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        let codec = self.authenticator.token_codec();
        if !(codec.is_live(refresh_token) && codec.is_refresh(refresh_token)) {
            return Err(IdentityError::InvalidToken);
        }

        let identity = self.identity_for_subject(refresh_token).await?;
        let tokens = self.issue_tokens(&identity)?;

        tracing::debug!(identity_id = %identity.id, "Token pair refreshed");

        Ok(AuthSession {
            tokens,
            profile: self.profile_of(identity).await?,
        })
    }

    async fn resolve_from_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let codec = self.authenticator.token_codec();
        if !codec.is_live(token) {
            return Err(IdentityError::InvalidToken);
        }

        // Refresh tokens only mint new pairs; they never authorize requests.
        match codec.verify(token) {
            Ok(claims) if claims.kind() == TokenKind::Access => {}
            _ => return Err(IdentityError::InvalidToken),
        }

        self.identity_for_subject(token).await
    }

    async fn is_username_available(&self, username: &str) -> Result<bool, IdentityError> {
        Ok(!self.identities.exists_by_username(username).await?)
    }

    async fn is_email_available(&self, email: &str) -> Result<bool, IdentityError> {
        Ok(!self.identities.exists_by_email(email).await?)
    }

    async fn get_profile(&self, id: IdentityId) -> Result<IdentityProfile, IdentityError> {
        let identity = self
            .identities
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        self.profile_of(identity).await
    }

    async fn update_profile(
        &self,
        id: IdentityId,
        command: UpdateProfileCommand,
    ) -> Result<IdentityProfile, IdentityError> {
        let mut identity = self
            .identities
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            if new_username != identity.username {
                if self
                    .identities
                    .exists_by_username_excluding(new_username.as_str(), id)
                    .await?
                {
                    return Err(IdentityError::UsernameTaken(new_username.to_string()));
                }
                tracing::info!(
                    identity_id = %id,
                    "Username changed; tokens issued for the old username no longer resolve"
                );
                identity.username = new_username;
            }
        }

        if let Some(new_email) = command.email {
            if new_email != identity.email {
                if self
                    .identities
                    .exists_by_email_excluding(new_email.as_str(), id)
                    .await?
                {
                    return Err(IdentityError::EmailTaken(new_email.to_string()));
                }
                identity.email = new_email;
            }
        }

        if let Some(biography) = command.biography {
            identity.biography = Some(biography);
        }

        if let Some(cover_image) = command.cover_image {
            identity.cover_image = Some(cover_image);
        }

        identity.updated_at = Utc::now();

        let updated = self.identities.update(identity).await?;

        self.profile_of(updated).await
    }
}

#[cfg(test)]
mod tests {
    use auth::HashParams;
    use auth::ManualClock;
    use auth::PasswordHasher;
    use auth::TokenCodec;
    use auth::TokenConfig;
    use auth::WeakPassword;
    use mockall::mock;

    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::identity::models::EmailAddress;
    use crate::identity::models::LoginIdentifier;
    use crate::identity::models::Username;

    const ACCESS_TTL: i64 = 60_000;
    const REFRESH_TTL: i64 = 600_000;
    const START: i64 = 1_700_000_000_000;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;
            async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<Identity>, IdentityError>;
            async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError>;
            async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError>;
            async fn exists_by_username_excluding(&self, username: &str, excluded: IdentityId) -> Result<bool, IdentityError>;
            async fn exists_by_email_excluding(&self, email: &str, excluded: IdentityId) -> Result<bool, IdentityError>;
            async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
        }
    }

    mock! {
        pub TestAuthorActivity {}

        #[async_trait]
        impl AuthorActivity for TestAuthorActivity {
            async fn count_posts_by_author(&self, author: IdentityId) -> Result<i64, IdentityError>;
            async fn count_comments_by_author(&self, author: IdentityId) -> Result<i64, IdentityError>;
        }
    }

    fn authenticator(clock: Arc<ManualClock>) -> Arc<Authenticator> {
        let config = TokenConfig::new(
            b"test_secret_key_at_least_32_bytes!".to_vec(),
            ACCESS_TTL,
            REFRESH_TTL,
        );
        let codec = TokenCodec::with_clock(config, clock).unwrap();
        let hasher = PasswordHasher::with_params(HashParams::new(8, 1, 1, None).unwrap());

        Arc::new(Authenticator::from_parts(hasher, codec))
    }

    fn identity(id: i64, username: &str, password_hash: &str) -> Identity {
        Identity {
            id: IdentityId(id),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: password_hash.to_string(),
            biography: None,
            cover_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn register_command(username: &str, password: &str, confirm: &str) -> RegisterCommand {
        RegisterCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(format!("{}@x.com", username)).unwrap(),
            password.to_string(),
            confirm.to_string(),
            None,
        )
    }

    fn login_command(identifier: &str, password: &str) -> LoginCommand {
        LoginCommand {
            identifier: LoginIdentifier::new(identifier.to_string()).unwrap(),
            password: password.to_string(),
        }
    }

    fn counting_activity(posts: i64, comments: i64) -> MockTestAuthorActivity {
        let mut activity = MockTestAuthorActivity::new();
        activity
            .expect_count_posts_by_author()
            .returning(move |_| Ok(posts));
        activity
            .expect_count_comments_by_author()
            .returning(move |_| Ok(comments));
        activity
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestIdentityRepository::new();
        let mut activity = MockTestAuthorActivity::new();
        let clock = Arc::new(ManualClock::new(START));
        let authenticator = authenticator(clock);

        repository
            .expect_exists_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_exists_by_email()
            .withf(|email| email == "alice@x.com")
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|new_identity| {
                new_identity.username.as_str() == "alice"
                    && new_identity.password_hash.starts_with("$argon2id")
            })
            .times(1)
            .returning(|new_identity| {
                Ok(Identity {
                    id: IdentityId(1),
                    username: new_identity.username,
                    email: new_identity.email,
                    password_hash: new_identity.password_hash,
                    biography: new_identity.biography,
                    cover_image: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        // A new account has no activity to count
        activity.expect_count_posts_by_author().times(0);
        activity.expect_count_comments_by_author().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(activity),
            Arc::clone(&authenticator),
        );

        let session = service
            .register(register_command("alice", "Passw0rd", "Passw0rd"))
            .await
            .unwrap();

        assert_eq!(session.profile.identity.id, IdentityId(1));
        assert_eq!(session.profile.post_count, 0);
        assert_eq!(session.profile.comment_count, 0);
        assert_eq!(session.tokens.token_type, "Bearer");
        assert_eq!(session.tokens.expires_in, ACCESS_TTL / 1000);

        let codec = authenticator.token_codec();
        assert_eq!(codec.subject_of(&session.tokens.access_token).unwrap(), "alice");
        assert!(codec.is_refresh(&session.tokens.refresh_token));
    }

    #[tokio::test]
    async fn test_register_password_mismatch_checked_first() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_exists_by_username().times(0);
        repository.expect_create().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let result = service
            .register(register_command("alice", "Passw0rd", "Passw0rD"))
            .await;

        assert!(matches!(result, Err(IdentityError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_exists_by_email().times(0);
        repository.expect_create().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let err = service
            .register(register_command("alice", "Passw0rd", "Passw0rd"))
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::UsernameTaken(ref name) if name == "alice"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_create().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let result = service
            .register(register_command("alice", "Passw0rd", "Passw0rd"))
            .await;

        assert!(matches!(result, Err(IdentityError::EmailTaken(_))));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository.expect_exists_by_email().returning(|_| Ok(false));
        repository.expect_create().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let result = service
            .register(register_command("alice", "password", "password"))
            .await;

        assert!(matches!(
            result,
            Err(IdentityError::WeakPassword(WeakPassword::MissingDigit))
        ));
    }

    #[tokio::test]
    async fn test_login_success_attaches_counts() {
        let clock = Arc::new(ManualClock::new(START));
        let authenticator = authenticator(clock);
        let hash = authenticator.hash_password("Passw0rd").unwrap();
        let stored = identity(7, "alice", &hash);

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_username_or_email()
            .withf(|identifier| identifier == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(counting_activity(2, 5)),
            Arc::clone(&authenticator),
        );

        let session = service
            .login(login_command("alice@example.com", "Passw0rd"))
            .await
            .unwrap();

        assert_eq!(session.profile.identity.id, IdentityId(7));
        assert_eq!(session.profile.post_count, 2);
        assert_eq!(session.profile.comment_count, 5);
        assert_eq!(
            authenticator
                .token_codec()
                .subject_of(&session.tokens.access_token)
                .unwrap(),
            "alice"
        );
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_identity_are_indistinguishable() {
        let authenticator = authenticator(Arc::new(ManualClock::new(START)));
        let hash = authenticator.hash_password("Passw0rd").unwrap();
        let stored = identity(1, "alice", &hash);

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_username_or_email()
            .returning(move |identifier| {
                if identifier == "alice" {
                    Ok(Some(stored.clone()))
                } else {
                    Ok(None)
                }
            });

        let mut activity = MockTestAuthorActivity::new();
        activity.expect_count_posts_by_author().times(0);

        let service =
            AuthenticationService::new(Arc::new(repository), Arc::new(activity), authenticator);

        let wrong_password = service
            .login(login_command("alice", "WrongPass1"))
            .await
            .unwrap_err();
        let unknown = service
            .login(login_command("nobody", "whatever1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
        assert!(matches!(unknown, IdentityError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let clock = Arc::new(ManualClock::new(START));
        let authenticator = authenticator(clock.clone());
        let old = authenticator.issue_token_pair("alice").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Ok(Some(identity(1, "alice", "$argon2id$stored"))));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(counting_activity(1, 1)),
            Arc::clone(&authenticator),
        );

        clock.advance(5_000);
        let session = service.refresh(&old.refresh_token).await.unwrap();

        let codec = authenticator.token_codec();
        assert!(codec.is_live(&session.tokens.access_token));
        assert!(codec.is_refresh(&session.tokens.refresh_token));
        assert_ne!(session.tokens.refresh_token, old.refresh_token);
        // Rotation does not revoke: the old refresh token stays live
        assert!(codec.is_live(&old.refresh_token));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let authenticator = authenticator(Arc::new(ManualClock::new(START)));
        let pair = authenticator.issue_token_pair("alice").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_username().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator,
        );

        let result = service.refresh(&pair.access_token).await;
        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_expired_token() {
        let clock = Arc::new(ManualClock::new(START));
        let authenticator = authenticator(clock.clone());
        let pair = authenticator.issue_token_pair("alice").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_username().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator,
        );

        clock.advance(REFRESH_TTL + 1_000);
        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_unknown_subject() {
        let authenticator = authenticator(Arc::new(ManualClock::new(START)));
        let pair = authenticator.issue_token_pair("ghost").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator,
        );

        let err = service.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, IdentityError::UnknownSubject));
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn test_resolve_from_token() {
        let clock = Arc::new(ManualClock::new(START));
        let authenticator = authenticator(clock.clone());
        let pair = authenticator.issue_token_pair("alice").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(identity(3, "alice", "$argon2id$stored"))));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator,
        );

        let resolved = service.resolve_from_token(&pair.access_token).await.unwrap();
        assert_eq!(resolved.id, IdentityId(3));

        assert!(matches!(
            service.resolve_from_token(&pair.refresh_token).await,
            Err(IdentityError::InvalidToken)
        ));
        assert!(matches!(
            service.resolve_from_token("garbage").await,
            Err(IdentityError::InvalidToken)
        ));

        clock.advance(ACCESS_TTL + 1_000);
        assert!(matches!(
            service.resolve_from_token(&pair.access_token).await,
            Err(IdentityError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_availability_checks() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_exists_by_username()
            .returning(|username| Ok(username == "alice"));
        repository
            .expect_exists_by_email()
            .returning(|email| Ok(email == "a@x.com"));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        assert!(!service.is_username_available("alice").await.unwrap());
        assert!(service.is_username_available("bob").await.unwrap());
        assert!(!service.is_email_available("a@x.com").await.unwrap());
        assert!(service.is_email_available("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let err = service.get_profile(IdentityId(42)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_profile_success() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(identity(id.0, "alice", "$argon2id$stored"))));
        repository
            .expect_exists_by_username_excluding()
            .withf(|username, excluded| username == "alice2" && *excluded == IdentityId(1))
            .times(1)
            .returning(|_, _| Ok(false));
        // Unchanged email is not re-checked
        repository.expect_exists_by_email_excluding().times(0);
        repository
            .expect_update()
            .times(1)
            .returning(|identity| Ok(identity));

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(counting_activity(0, 0)),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let command = UpdateProfileCommand {
            username: Some(Username::new("alice2".to_string()).unwrap()),
            email: Some(EmailAddress::new("alice@example.com".to_string()).unwrap()),
            biography: Some(crate::identity::models::Biography::new("hi".to_string()).unwrap()),
            cover_image: None,
        };

        let profile = service
            .update_profile(IdentityId(1), command)
            .await
            .unwrap();

        assert_eq!(profile.identity.username.as_str(), "alice2");
        assert_eq!(
            profile.identity.biography.as_ref().map(|b| b.as_str()),
            Some("hi")
        );
    }

    #[tokio::test]
    async fn test_update_profile_username_conflict() {
        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(identity(id.0, "alice", "$argon2id$stored"))));
        repository
            .expect_exists_by_username_excluding()
            .returning(|_, _| Ok(true));
        repository.expect_update().times(0);

        let service = AuthenticationService::new(
            Arc::new(repository),
            Arc::new(MockTestAuthorActivity::new()),
            authenticator(Arc::new(ManualClock::new(START))),
        );

        let command = UpdateProfileCommand {
            username: Some(Username::new("bob".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_profile(IdentityId(1), command).await;
        assert!(matches!(result, Err(IdentityError::UsernameTaken(_))));
    }
}
