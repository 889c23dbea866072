//! Session repository for refresh token tracking

use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewSession, Session};

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new session
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (account_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(new_session.account_id)
        .bind(&new_session.token_hash)
        .bind(new_session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Find a live session for `token_hash`
    ///
    /// Expired rows are treated as absent; they are reaped lazily on the
    /// next revocation touching the same account.
    pub async fn find_valid(&self, token_hash: &str) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, account_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Revoke the session holding `token_hash`
    pub async fn revoke(&self, token_hash: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Revoke every session of an account, plus any expired leftovers
    pub async fn revoke_for_account(&self, account_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE account_id = $1 OR expires_at <= $2")
            .bind(account_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        info!("Sessions revoked for account {}", account_id);
        Ok(())
    }
}
