/// Configuration management for the API server
///
/// Loaded once at startup from the environment (after reading `.env` if one
/// exists) and passed down as an immutable value.
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8000)
/// - `API_PRODUCTION`: enables HSTS (default: false)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: `*`)
/// - `PUBLIC_URL`: root used in emailed links (default: `http://localhost:<port>/`)
/// - `DATABASE_URL`: PostgreSQL connection string (optional, in-memory store if unset)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `SECRET_KEY`: token signing secret, at least 32 characters (required)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: session lifetime (default: 30)
/// - `MAIL`, `MAIL_PASSWORD`, `SMTP_SERVER`: SMTP sender, all or none
/// - `SMTP_PORT`: implicit-TLS SMTP port (default: 465)
///
/// # Example
///
/// ```no_run
/// use tasklist_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::env;
use tasklist_shared::mail::smtp::{SmtpSettings, DEFAULT_SMTP_PORT};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// SMTP relay; `None` records emails and logs them instead
    pub mail: Option<SmtpSettings>,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Enables HSTS
    pub production: bool,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,

    /// Public root of the service, always ending in `/`
    pub public_url: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session token lifetime
    pub access_token_expire_minutes: i64,
}

impl Config {
    /// Loads configuration from `.env` and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_KEY` is missing or short, a numeric
    /// variable does not parse, or the mail variables are only partly set.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(&env::vars().collect())
    }

    /// Builds configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        let host = get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("API_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let production = get("API_PRODUCTION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut public_url =
            get("PUBLIC_URL").unwrap_or_else(|| format!("http://localhost:{}/", port));
        if !public_url.ends_with('/') {
            public_url.push('/');
        }

        let max_connections = get("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is not a number: {}", e))?;

        let secret = get("SECRET_KEY")
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("SECRET_KEY must be at least 32 characters long");
        }

        let access_token_expire_minutes = get("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|| "30".to_string())
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES is not a number: {}", e))?;

        let mail = match (get("MAIL"), get("MAIL_PASSWORD"), get("SMTP_SERVER")) {
            (Some(from), Some(password), Some(host)) => {
                let port = get("SMTP_PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .map_err(|e| anyhow::anyhow!("SMTP_PORT is not a valid port: {}", e))?
                    .unwrap_or(DEFAULT_SMTP_PORT);
                Some(SmtpSettings {
                    host,
                    port,
                    from,
                    password,
                })
            }
            (None, None, None) => None,
            _ => anyhow::bail!("MAIL, MAIL_PASSWORD and SMTP_SERVER must be set together"),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                cors_origins,
                public_url,
            },
            database: DatabaseConfig {
                url: get("DATABASE_URL"),
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                access_token_expire_minutes,
            },
            mail,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&vars(&[("SECRET_KEY", SECRET)])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(!config.api.production);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.api.public_url, "http://localhost:8000/");
        assert!(config.database.url.is_none());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.access_token_expire_minutes, 30);
        assert!(config.mail.is_none());
    }

    #[test]
    fn test_secret_required_and_long_enough() {
        assert!(Config::from_vars(&vars(&[])).is_err());
        assert!(Config::from_vars(&vars(&[("SECRET_KEY", "short")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("SECRET_KEY", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("API_PRODUCTION", "true"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("PUBLIC_URL", "https://todo.example"),
            ("DATABASE_URL", "postgresql://localhost/tasklist"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert!(config.api.production);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.api.public_url, "https://todo.example/");
        assert_eq!(config.database.url.as_deref(), Some("postgresql://localhost/tasklist"));
        assert_eq!(config.jwt.access_token_expire_minutes, 5);
    }

    #[test]
    fn test_mail_settings() {
        let config = Config::from_vars(&vars(&[
            ("SECRET_KEY", SECRET),
            ("MAIL", "noreply@example.com"),
            ("MAIL_PASSWORD", "pw"),
            ("SMTP_SERVER", "smtp.example.com"),
        ]))
        .unwrap();

        let mail = config.mail.unwrap();
        assert_eq!(mail.port, 465);
        assert_eq!(mail.host, "smtp.example.com");
    }

    #[test]
    fn test_partial_mail_settings_rejected() {
        let result = Config::from_vars(&vars(&[
            ("SECRET_KEY", SECRET),
            ("MAIL", "noreply@example.com"),
        ]));
        assert!(result.is_err());
    }
}
