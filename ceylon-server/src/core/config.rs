use crate::auth::JwtConfig;
use crate::services::chat::ChatConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 5000 | HTTP port |
/// | DATABASE_URL | sqlite:ceylon.db | SQLite database URL |
/// | UPLOAD_DIR | uploads | Image storage directory |
/// | ENVIRONMENT | development | development, staging or production |
/// | JWT_SECRET | (required outside development) | HS256 signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
/// | CHAT_API_URL | OpenAI chat completions | Upstream chat endpoint |
/// | CHAT_API_KEY | (none) | Upstream bearer key |
/// | CHAT_MODEL | gpt-4o-mini | Upstream model |
/// | CHAT_TIMEOUT_SECS | 30 | Upstream request timeout |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | (none) | Seed an admin account at startup |
/// | LOG_LEVEL | info | Default log level |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (none) | Daily rolling log files |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_url: String,
    pub upload_dir: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub chat: ChatConfig,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                tracing::warn!("{name} not set, using a development placeholder");
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 5000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:ceylon.db".into()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            jwt: JwtConfig {
                secret: Self::require_secret("JWT_SECRET", &environment)?,
                expiration_minutes: env_parse("JWT_EXPIRATION_MINUTES", 1440),
                ..JwtConfig::default()
            },
            chat: ChatConfig {
                api_url: std::env::var("CHAT_API_URL")
                    .unwrap_or_else(|_| ChatConfig::default().api_url),
                api_key: std::env::var("CHAT_API_KEY").ok().filter(|s| !s.is_empty()),
                model: std::env::var("CHAT_MODEL").unwrap_or_else(|_| ChatConfig::default().model),
                timeout_secs: env_parse("CHAT_TIMEOUT_SECS", 30),
            },
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_outside_development() {
        let name = "CEYLON_TEST_SECRET_THAT_IS_NEVER_SET";
        assert!(Config::require_secret(name, "production").is_err());

        let dev = Config::require_secret(name, "development").unwrap();
        assert!(dev.starts_with("dev-"));
    }

    #[test]
    fn test_env_parse_falls_back() {
        assert_eq!(env_parse("CEYLON_TEST_PORT_THAT_IS_NEVER_SET", 5000u16), 5000);
    }
}
