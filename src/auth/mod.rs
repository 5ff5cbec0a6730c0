//! Registration, login, and token validation. JWT minting and the wider
//! session/admin surface are named out of scope; this module implements
//! just the three façade methods spec §6 requires of auth: `register`,
//! `login`, `validate_token`.

mod claims;
mod crypto;
pub mod password;
pub mod postgres;
mod repository;

pub use claims::Claims;
pub use crypto::{Crypto, TokenPair};
pub use repository::{InMemoryUserStore, UserRepository};

use std::sync::Arc;

use chrono::Utc;

use crate::domain::User;
use crate::error::ErrorKind;
use crate::ledger::Ledger;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    ledger: Arc<Ledger>,
    crypto: Crypto,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, ledger: Arc<Ledger>, jwt_secret: &str) -> Self {
        AuthService {
            users,
            ledger,
            crypto: Crypto::new(jwt_secret.as_bytes()),
        }
    }

    /// Create the user row and its wallet. These live in separate stores
    /// behind separate ports, so this is best-effort sequencing rather
    /// than a single cross-table transaction; a user row with no wallet
    /// is a recoverable inconsistency an operator can replay, not chips
    /// created or destroyed, so it doesn't need the ledger's own
    /// retry/compare-and-swap machinery.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ErrorKind> {
        if self.users.exists(username, email).await? {
            return Err(ErrorKind::UserAlreadyExists);
        }
        let hashword = password::hash(password).map_err(|e| ErrorKind::Internal(e.to_string()))?;
        let user = self.users.create(username, email, &hashword).await?;
        if let Err(err) = self.ledger.create_wallet(user.id).await {
            log::error!("wallet creation failed for newly registered user {}: {err}", user.id);
            return Err(err);
        }
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ErrorKind> {
        let user = self.users.by_username(username).await.map_err(|_| ErrorKind::Unauthorized)?;
        if !password::verify(password, &user.hashword) {
            return Err(ErrorKind::Unauthorized);
        }
        let (pair, refresh_token) = self
            .crypto
            .issue(user.id, user.username.clone())
            .map_err(|e| ErrorKind::Internal(e.to_string()))?;
        let expires_at = Utc::now() + Crypto::refresh_ttl();
        self.users
            .set_refresh_token(user.id, &Crypto::hash_refresh_token(&refresh_token), expires_at)
            .await?;
        Ok(pair)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, ErrorKind> {
        let claims = self.crypto.decode(token).map_err(|_| ErrorKind::Unauthorized)?;
        if claims.expired() {
            return Err(ErrorKind::Unauthorized);
        }
        Ok(claims)
    }

    /// Exchange a still-valid refresh token for a new token pair; rejects
    /// if the stored hash doesn't match or has expired.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ErrorKind> {
        let hash = Crypto::hash_refresh_token(refresh_token);
        let user = self.users.by_refresh_token_hash(&hash).await?;
        let expires_at = user.refresh_token_expires_at.ok_or(ErrorKind::Unauthorized)?;
        if expires_at < Utc::now() {
            return Err(ErrorKind::Unauthorized);
        }
        let (pair, new_refresh_token) = self
            .crypto
            .issue(user.id, user.username.clone())
            .map_err(|e| ErrorKind::Internal(e.to_string()))?;
        let new_expires_at = Utc::now() + Crypto::refresh_ttl();
        self.users
            .set_refresh_token(user.id, &Crypto::hash_refresh_token(&new_refresh_token), new_expires_at)
            .await?;
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryWalletStore;

    fn service() -> AuthService {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserStore::new());
        let ledger = Arc::new(Ledger::new(Arc::new(InMemoryWalletStore::new())));
        AuthService::new(users, ledger, "0123456789012345678901234567890123")
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let service = service();
        service.register("alice", "alice@example.com", "hunter22").await.unwrap();
        let pair = service.login("alice", "hunter22").await.unwrap();
        let claims = service.validate_token(&pair.access_token).await.unwrap();
        assert_eq!(claims.usr, "alice");
    }

    #[tokio::test]
    async fn duplicate_registration_rejected() {
        let service = service();
        service.register("alice", "alice@example.com", "hunter22").await.unwrap();
        let err = service.register("alice", "other@example.com", "hunter22").await.unwrap_err();
        assert_eq!(err, ErrorKind::UserAlreadyExists);
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let service = service();
        service.register("alice", "alice@example.com", "hunter22").await.unwrap();
        let err = service.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn refresh_token_issues_new_pair() {
        let service = service();
        service.register("alice", "alice@example.com", "hunter22").await.unwrap();
        let pair = service.login("alice", "hunter22").await.unwrap();
        let refreshed = service.refresh(&pair.refresh_token).await.unwrap();
        assert!(service.validate_token(&refreshed.access_token).await.is_ok());
    }
}
