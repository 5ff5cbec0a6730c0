//! Environment configuration, validated once at startup. Invalid or
//! missing required config exits the process rather than limping along
//! with a guessed default (spec: only infra faults at startup are fatal).

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_token_ttl_secs: u64,
    pub redis_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a valid port number: {e}"))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }

        let jwt_token_ttl_secs = std::env::var("JWT_TOKEN_TTL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(24 * 60 * 60);

        let redis_url = std::env::var("REDIS_URL").ok();

        Ok(Config {
            server_port,
            database_url,
            jwt_secret,
            jwt_token_ttl_secs,
            redis_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn rejects_short_jwt_secret() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DATABASE_URL", "postgres://localhost/test");
            std::env::set_var("JWT_SECRET", "too-short");
        }
        assert!(Config::from_env().is_err());
        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("JWT_SECRET");
        }
    }

    #[test]
    fn accepts_valid_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DATABASE_URL", "postgres://localhost/test");
            std::env::set_var("JWT_SECRET", "0123456789012345678901234567890123");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 8080);
        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("JWT_SECRET");
        }
    }
}
