use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::identity::errors::IdentityError;
use crate::identity::models::Biography;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::NewIdentity;
use crate::identity::models::Username;
use crate::identity::ports::IdentityRepository;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

const SELECT_IDENTITY: &str = r#"
    SELECT id, username, email, password_hash, biography, cover_image, created_at, updated_at
    FROM users
"#;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("{} WHERE {}", SELECT_IDENTITY, condition))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn exists_where(
        &self,
        condition: &str,
        value: &str,
        excluded: Option<IdentityId>,
    ) -> Result<bool, IdentityError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {} AND ($2::BIGINT IS NULL OR id <> $2))",
            condition
        );

        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .bind(excluded.map(|id| id.0))
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    biography: Option<String>,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            biography: row.biography.map(Biography::new).transpose()?,
            cover_image: row.cover_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> IdentityError {
    IdentityError::DatabaseError(e.to_string())
}

/// Translate unique-constraint violations into domain conflicts.
fn write_error(e: sqlx::Error, username: &Username, email: &EmailAddress) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_CONSTRAINT) => {
                    return IdentityError::UsernameTaken(username.to_string())
                }
                Some(EMAIL_CONSTRAINT) => return IdentityError::EmailTaken(email.to_string()),
                _ => {}
            }
        }
    }
    database_error(e)
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO users (username, email, password_hash, biography)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, biography, cover_image, created_at, updated_at
            "#,
        )
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(identity.biography.as_ref().map(|b| b.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.username, &identity.email))?;

        Identity::try_from(row)
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("{} WHERE id = $1", SELECT_IDENTITY))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, IdentityError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Identity>, IdentityError> {
        self.fetch_one_where("username = $1 OR email = $1 ORDER BY id LIMIT 1", identifier)
            .await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError> {
        self.exists_where("username = $1", username, None).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError> {
        self.exists_where("email = $1", email, None).await
    }

    async fn exists_by_username_excluding(
        &self,
        username: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError> {
        self.exists_where("username = $1", username, Some(excluded))
            .await
    }

    async fn exists_by_email_excluding(
        &self,
        email: &str,
        excluded: IdentityId,
    ) -> Result<bool, IdentityError> {
        self.exists_where("email = $1", email, Some(excluded)).await
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            UPDATE users
            SET username = $2, email = $3, biography = $4, cover_image = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, username, email, password_hash, biography, cover_image, created_at, updated_at
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.biography.as_ref().map(|b| b.as_str()))
        .bind(identity.cover_image.as_deref())
        .bind(identity.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.username, &identity.email))?;

        row.map(Identity::try_from)
            .transpose()?
            .ok_or(IdentityError::NotFound(identity.id.to_string()))
    }
}
