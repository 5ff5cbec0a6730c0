//! Storage for user credentials and refresh-token state. Mirrors the
//! ledger's split: an `async_trait` port, an in-memory adapter for tests,
//! and a Postgres adapter behind `Arc<Client>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::User;
use crate::error::ErrorKind;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists(&self, username: &str, email: &str) -> Result<bool, ErrorKind>;
    async fn create(&self, username: &str, email: &str, hashword: &str) -> Result<User, ErrorKind>;
    async fn by_username(&self, username: &str) -> Result<User, ErrorKind>;
    async fn by_id(&self, id: Uuid) -> Result<User, ErrorKind>;
    async fn set_refresh_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ErrorKind>;
    async fn by_refresh_token_hash(&self, token_hash: &str) -> Result<User, ErrorKind>;
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn exists(&self, username: &str, email: &str) -> Result<bool, ErrorKind> {
        Ok(self
            .users
            .read()
            .expect("user lock poisoned")
            .values()
            .any(|u| u.username == username || u.email == email))
    }

    async fn create(&self, username: &str, email: &str, hashword: &str) -> Result<User, ErrorKind> {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: email.to_string(),
            hashword: hashword.to_string(),
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: Utc::now(),
        };
        self.users
            .write()
            .expect("user lock poisoned")
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn by_username(&self, username: &str) -> Result<User, ErrorKind> {
        self.users
            .read()
            .expect("user lock poisoned")
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound("user".to_string()))
    }

    async fn by_id(&self, id: Uuid) -> Result<User, ErrorKind> {
        self.users
            .read()
            .expect("user lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound("user".to_string()))
    }

    async fn set_refresh_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ErrorKind> {
        let mut users = self.users.write().expect("user lock poisoned");
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| ErrorKind::NotFound("user".to_string()))?;
        user.refresh_token_hash = Some(token_hash.to_string());
        user.refresh_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn by_refresh_token_hash(&self, token_hash: &str) -> Result<User, ErrorKind> {
        self.users
            .read()
            .expect("user lock poisoned")
            .values()
            .find(|u| u.refresh_token_hash.as_deref() == Some(token_hash))
            .cloned()
            .ok_or(ErrorKind::Unauthorized)
    }
}
