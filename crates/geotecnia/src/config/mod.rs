use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub contact: ContactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            contact: ContactConfig::from_env(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials and addresses for the contact intake pipeline.
///
/// Every field is injected into the owning client at construction; nothing in
/// the pipeline reads the process environment directly. Absent credentials
/// become that client's specific misconfiguration error at request time, never
/// a silent skip.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub recaptcha_secret: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_role: Option<String>,
    pub resend_api_key: Option<String>,
    pub to_email: String,
    pub from_email: String,
}

/// Notification recipient when `CONTACT_TO_EMAIL` is unset.
pub const DEFAULT_TO_EMAIL: &str = "geotecniayservicios@gmail.com";
/// Sender address when `CONTACT_FROM_EMAIL` is unset.
pub const DEFAULT_FROM_EMAIL: &str = "no-reply@geotecniayservicios.es";

impl ContactConfig {
    fn from_env() -> Self {
        Self {
            recaptcha_secret: non_empty_var("RECAPTCHA_SECRET"),
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_service_role: non_empty_var("SUPABASE_SERVICE_ROLE"),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            to_email: env::var("CONTACT_TO_EMAIL")
                .unwrap_or_else(|_| DEFAULT_TO_EMAIL.to_string()),
            from_email: env::var("CONTACT_FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("RECAPTCHA_SECRET");
        env::remove_var("SUPABASE_URL");
        env::remove_var("SUPABASE_SERVICE_ROLE");
        env::remove_var("RESEND_API_KEY");
        env::remove_var("CONTACT_TO_EMAIL");
        env::remove_var("CONTACT_FROM_EMAIL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.contact.recaptcha_secret.is_none());
        assert!(config.contact.supabase_url.is_none());
        assert_eq!(config.contact.to_email, DEFAULT_TO_EMAIL);
        assert_eq!(config.contact.from_email, DEFAULT_FROM_EMAIL);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn contact_credentials_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECAPTCHA_SECRET", "captcha-secret");
        env::set_var("SUPABASE_URL", "https://example.supabase.co");
        env::set_var("SUPABASE_SERVICE_ROLE", "service-role-key");
        env::set_var("RESEND_API_KEY", "resend-key");
        env::set_var("CONTACT_TO_EMAIL", "ops@example.com");
        env::set_var("CONTACT_FROM_EMAIL", "web@example.com");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.contact.recaptcha_secret.as_deref(),
            Some("captcha-secret")
        );
        assert_eq!(
            config.contact.supabase_url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(
            config.contact.supabase_service_role.as_deref(),
            Some("service-role-key")
        );
        assert_eq!(config.contact.resend_api_key.as_deref(), Some("resend-key"));
        assert_eq!(config.contact.to_email, "ops@example.com");
        assert_eq!(config.contact.from_email, "web@example.com");
        reset_env();
    }

    #[test]
    fn blank_credentials_count_as_absent() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECAPTCHA_SECRET", "   ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.contact.recaptcha_secret.is_none());
        reset_env();
    }
}
