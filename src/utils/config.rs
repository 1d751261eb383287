use std::env;

/// Immutable application configuration, built once at startup and passed
/// into component constructors. No ambient global lookup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub hash_cost: u32,
    pub max_login_attempts: u32,
    pub upgrade_token_ttl_hours: i64,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Loads configuration from the environment (and `.env` if present).
    /// `JWT_SECRET` is required; everything else has a default.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")?,
                access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()?,
                hash_cost: env::var("HASH_COST")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()?,
                max_login_attempts: env::var("MAX_LOGIN_ATTEMPTS")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()?,
                upgrade_token_ttl_hours: env::var("UPGRADE_TOKEN_TTL_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()?,
                admin_email: env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| "admin@example.com".to_string()),
                admin_password: env::var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| "secret".to_string()),
            },
        })
    }
}
