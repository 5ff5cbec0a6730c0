use super::claims::Claims;
use uuid::Uuid;

const ACCESS_TOKEN_TTL: std::time::Duration = std::time::Duration::from_secs(15 * 60);
const REFRESH_TOKEN_TTL: std::time::Duration = std::time::Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Crypto {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }

    /// Mint an access token (signed JWT, short-lived) alongside an opaque
    /// refresh token. The refresh token is random, not a JWT: its only job
    /// is to be looked up against what [`super::UserRepository`] persisted,
    /// hashed, at issuance (spec §9's chosen `Login` contract).
    pub fn issue(&self, user_id: Uuid, username: String) -> Result<(TokenPair, String), jsonwebtoken::errors::Error> {
        let claims = Claims::new(user_id, username, ACCESS_TOKEN_TTL);
        let access_token = self.encode(&claims)?;
        let refresh_token = generate_refresh_token();
        let pair = TokenPair {
            access_token,
            refresh_token: refresh_token.clone(),
            expires_in: ACCESS_TOKEN_TTL.as_secs(),
        };
        Ok((pair, refresh_token))
    }

    pub fn refresh_ttl() -> std::time::Duration {
        REFRESH_TOKEN_TTL
    }

    pub fn hash_refresh_token(token: &str) -> String {
        use sha2::Digest;
        let digest = sha2::Sha256::digest(token.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn generate_refresh_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_round_trips() {
        let crypto = Crypto::new(b"0123456789012345678901234567890123");
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string(), ACCESS_TOKEN_TTL);
        let token = crypto.encode(&claims).unwrap();
        let decoded = crypto.decode(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.usr, "alice");
    }

    #[test]
    fn refresh_tokens_are_unique_and_hash_deterministically() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
        assert_eq!(Crypto::hash_refresh_token(&a), Crypto::hash_refresh_token(&a));
        assert_ne!(Crypto::hash_refresh_token(&a), Crypto::hash_refresh_token(&b));
    }
}
