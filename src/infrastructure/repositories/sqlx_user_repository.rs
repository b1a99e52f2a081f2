use crate::domain::{
    post::errors::DomainError,
    user::{
        entity::{Role, User},
        repository::UserRepository,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-constraint violations on username/email to a conflict the
/// HTTP layer can serve as 409.
fn map_create_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return DomainError::Conflict("Username or email already taken".into());
        }
    }
    DomainError::InfrastructureError(e.to_string())
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let created = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, username, email, password_hash, display_name, role)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, username, email, password_hash, display_name, role,
                         created_at, updated_at"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_create_error)?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, display_name, role,
                      created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, display_name, role,
                      created_at, updated_at
               FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password_hash, display_name, role,
                      created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(row)
    }

    async fn set_role(&self, username: &str, role: Role) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE users SET role = $2, updated_at = NOW()
               WHERE username = $1
               RETURNING id, username, email, password_hash, display_name, role,
                         created_at, updated_at"#,
        )
        .bind(username)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;

        row.ok_or_else(|| DomainError::NotFound("User not found".into()))
    }
}
