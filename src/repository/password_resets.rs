//! Password reset tokens (stored as SHA-256 digests)

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct PasswordResetsRepository {
    pool: Pool<Postgres>,
}

impl PasswordResetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        token_hash: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO password_reset_tokens (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set a new password with an unused, unexpired token and return its user.
    /// In the same transaction every reset token and session of that user is
    /// deleted, so no other emailed link or open session survives the change.
    pub async fn reset_password(
        &self,
        token_hash: &str,
        password_hash: &str,
    ) -> AppResult<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE password_reset_tokens
            SET used = TRUE
            WHERE token_hash = $1 AND NOT used AND expires_at > NOW()
            RETURNING user_id
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(user_id))
    }

    /// Drop expired or used tokens of a user
    pub async fn purge_for_user(&self, user_id: i32) -> AppResult<()> {
        sqlx::query(
            "DELETE FROM password_reset_tokens WHERE user_id = $1 AND (used OR expires_at <= NOW())",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
