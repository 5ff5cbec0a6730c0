//! Postgres-backed [`UserRepository`], mirroring [`crate::ledger::postgres`]'s
//! `impl Trait for Arc<Client>` pattern.

use super::repository::UserRepository;
use crate::domain::User;
use crate::error::ErrorKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_postgres::Client;
use uuid::Uuid;

pub const USERS: &str = "users";

pub const DDL: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ", USERS, " (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        hashword TEXT NOT NULL,
        refresh_token_hash TEXT,
        refresh_token_expires_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );"
);

fn map_pg_err(err: tokio_postgres::Error) -> ErrorKind {
    ErrorKind::Internal(err.to_string())
}

fn row_to_user(row: tokio_postgres::Row) -> User {
    User {
        id: row.get(0),
        username: row.get(1),
        email: row.get(2),
        hashword: row.get(3),
        refresh_token_hash: row.get(4),
        refresh_token_expires_at: row.get(5),
        created_at: row.get(6),
    }
}

const SELECT_COLUMNS: &str =
    "id, username, email, hashword, refresh_token_hash, refresh_token_expires_at, created_at";

#[async_trait]
impl UserRepository for Arc<Client> {
    async fn exists(&self, username: &str, email: &str) -> Result<bool, ErrorKind> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE username = $1 OR email = $2"),
            &[&username, &email],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(map_pg_err)
    }

    async fn create(&self, username: &str, email: &str, hashword: &str) -> Result<User, ErrorKind> {
        let row = self
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ", USERS, " (id, username, email, hashword) VALUES ($1, $2, $3, $4)
                     RETURNING ", SELECT_COLUMNS
                ),
                &[&Uuid::now_v7(), &username, &email, &hashword],
            )
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    ErrorKind::UserAlreadyExists
                } else {
                    map_pg_err(e)
                }
            })?;
        Ok(row_to_user(row))
    }

    async fn by_username(&self, username: &str) -> Result<User, ErrorKind> {
        self.query_opt(
            const_format::concatcp!("SELECT ", SELECT_COLUMNS, " FROM ", USERS, " WHERE username = $1"),
            &[&username],
        )
        .await
        .map_err(map_pg_err)?
        .map(row_to_user)
        .ok_or_else(|| ErrorKind::NotFound("user".to_string()))
    }

    async fn by_id(&self, id: Uuid) -> Result<User, ErrorKind> {
        self.query_opt(
            const_format::concatcp!("SELECT ", SELECT_COLUMNS, " FROM ", USERS, " WHERE id = $1"),
            &[&id],
        )
        .await
        .map_err(map_pg_err)?
        .map(row_to_user)
        .ok_or_else(|| ErrorKind::NotFound("user".to_string()))
    }

    async fn set_refresh_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ErrorKind> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ", USERS, " SET refresh_token_hash = $2, refresh_token_expires_at = $3 WHERE id = $1"
            ),
            &[&user_id, &token_hash, &expires_at],
        )
        .await
        .map(|_| ())
        .map_err(map_pg_err)
    }

    async fn by_refresh_token_hash(&self, token_hash: &str) -> Result<User, ErrorKind> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ", SELECT_COLUMNS, " FROM ", USERS, " WHERE refresh_token_hash = $1"
            ),
            &[&token_hash],
        )
        .await
        .map_err(map_pg_err)?
        .map(row_to_user)
        .ok_or(ErrorKind::Unauthorized)
    }
}
