use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::identity::errors::SessionError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::PendingCode;
use crate::domain::identity::models::RefreshRecord;
use crate::domain::identity::models::ResetRequest;
use crate::domain::identity::models::RevocationEntry;
use crate::domain::identity::ports::CredentialStore;

fn database_error(e: sqlx::Error) -> SessionError {
    SessionError::DatabaseError(e.to_string())
}

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_identity(row: &PgRow) -> Result<Identity, SessionError> {
        let email: String = row.try_get("email").map_err(database_error)?;
        let role: String = row.try_get("role").map_err(database_error)?;
        let pending_code: Option<String> = row.try_get("pending_code").map_err(database_error)?;
        let code_issued_at: Option<DateTime<Utc>> =
            row.try_get("code_issued_at").map_err(database_error)?;

        Ok(Identity {
            email: EmailAddress::new(email)?,
            password_hash: row.try_get("password_hash").map_err(database_error)?,
            username: row.try_get("username").map_err(database_error)?,
            bio: row.try_get("bio").map_err(database_error)?,
            role: role.parse()?,
            verified: row.try_get("verified").map_err(database_error)?,
            pending_code: pending_code
                .zip(code_issued_at)
                .map(|(code, issued_at)| PendingCode { code, issued_at }),
            provider: row.try_get("provider").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create_identity(&self, identity: Identity) -> Result<Identity, SessionError> {
        let (code, issued_at) = match &identity.pending_code {
            Some(pending) => (Some(pending.code.as_str()), Some(pending.issued_at)),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO identities
                (email, password_hash, username, bio, role, verified,
                 pending_code, code_issued_at, provider, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.username)
        .bind(&identity.bio)
        .bind(identity.role.as_str())
        .bind(identity.verified)
        .bind(code)
        .bind(issued_at)
        .bind(identity.provider.as_deref())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return SessionError::AlreadyExists(identity.email.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(identity)
    }

    async fn find_identity(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, SessionError> {
        let row = sqlx::query(
            r#"
            SELECT email, password_hash, username, bio, role, verified,
                   pending_code, code_issued_at, provider, created_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn update_identity(&self, identity: Identity) -> Result<Identity, SessionError> {
        let (code, issued_at) = match &identity.pending_code {
            Some(pending) => (Some(pending.code.as_str()), Some(pending.issued_at)),
            None => (None, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE identities
            SET password_hash = $2, username = $3, bio = $4, role = $5, verified = $6,
                pending_code = $7, code_issued_at = $8, provider = $9
            WHERE email = $1
            "#,
        )
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.username)
        .bind(&identity.bio)
        .bind(identity.role.as_str())
        .bind(identity.verified)
        .bind(code)
        .bind(issued_at)
        .bind(identity.provider.as_deref())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(SessionError::NotFound(identity.email.to_string()));
        }

        Ok(identity)
    }

    async fn delete_identity(&self, email: &EmailAddress) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM identities WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_reset_request(&self, request: ResetRequest) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO reset_requests (email, token, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET token = EXCLUDED.token, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(request.email.as_str())
        .bind(&request.token)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn find_reset_request(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<ResetRequest>, SessionError> {
        let row = sqlx::query("SELECT token, created_at FROM reset_requests WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        match row {
            Some(r) => Ok(Some(ResetRequest {
                email: email.clone(),
                token: r.try_get("token").map_err(database_error)?,
                created_at: r.try_get("created_at").map_err(database_error)?,
            })),
            None => Ok(None),
        }
    }

    async fn delete_reset_request(&self, email: &EmailAddress) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM reset_requests WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }

    async fn save_refresh_record(&self, record: RefreshRecord) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_records (email, token, issued_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET token = EXCLUDED.token, issued_at = EXCLUDED.issued_at
            "#,
        )
        .bind(record.email.as_str())
        .bind(&record.token)
        .bind(record.issued_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn consume_refresh_record(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM refresh_records WHERE email = $1 AND token = $2")
            .bind(email.as_str())
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_refresh_record(&self, email: &EmailAddress) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM refresh_records WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }

    async fn revoke(&self, entry: RevocationEntry) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO revocations (email, token, revoked_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email, token) DO NOTHING
            "#,
        )
        .bind(entry.email.as_str())
        .bind(&entry.token)
        .bind(entry.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn is_revoked(&self, email: &EmailAddress, token: &str) -> Result<bool, SessionError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM revocations WHERE email = $1 AND token = $2)",
        )
        .bind(email.as_str())
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }
}
