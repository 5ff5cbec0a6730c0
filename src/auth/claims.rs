use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub usr: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: String, ttl: std::time::Duration) -> Self {
        let now = now_secs();
        Claims {
            sub: user_id,
            usr: username,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }

    pub fn expired(&self) -> bool {
        self.exp < now_secs()
    }
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the unix epoch")
        .as_secs() as i64
}
