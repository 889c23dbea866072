//! Account repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Account, NewAccount};

const SELECT_ACCOUNT: &str = r#"
    SELECT a.id, a.username, a.email, a.password_hash, a.created_at, a.updated_at
    FROM accounts a
"#;

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        info!("Creating new account: {}", new_account.username);

        let password_hash = hash_password(&new_account.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_account.username)
        .bind(&new_account.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_account(row))
    }

    /// Find an account by login identifier
    ///
    /// Tries username and email first (the email case insensitively), then
    /// falls back to the employee number carried on the employee profile.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>> {
        let query = format!(
            "{SELECT_ACCOUNT} WHERE a.username = $1 OR lower(a.email) = lower($1)"
        );
        let row = sqlx::query(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Ok(Some(map_account(row)));
        }

        let query = format!(
            "{SELECT_ACCOUNT} JOIN employees e ON e.account_id = a.id \
             WHERE e.employee_number = $1"
        );
        let row = sqlx::query(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(map_account))
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let query = format!("{SELECT_ACCOUNT} WHERE a.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(map_account))
    }

    /// HR role code of the employee profile linked to `account_id`
    pub async fn role_of(&self, account_id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query("SELECT role FROM employees WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("role")))
    }

    /// Verify an account's password
    pub fn verify_password(&self, account: &Account, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Replace an account's password hash
    pub async fn update_password(&self, account_id: Uuid, new_password: &str) -> Result<()> {
        let password_hash = hash_password(new_password)?;

        sqlx::query(
            "UPDATE accounts SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(account_id)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        info!("Password updated for account {}", account_id);
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string())
}

fn map_account(row: sqlx::postgres::PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
