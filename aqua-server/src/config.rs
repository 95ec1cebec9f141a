//! Server configuration

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

use crate::money::MAX_PRICE;
use crate::pricing::PricingPolicy;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimum JWT secret length outside development
const MIN_SECRET_LEN: usize = 32;

/// Server configuration, loaded from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiration_minutes: i64,
    /// `tracing` filter directives, overridden by `RUST_LOG`
    pub log_level: String,
    /// JSON log lines instead of the pretty console format
    pub log_json: bool,
    /// Directory for daily rolling log files; console only when unset
    pub log_dir: Option<String>,
    pub pricing: PricingPolicy,
    /// Credentials for the first admin account, created when no admin exists
    pub bootstrap_admin: Option<(String, String)>,
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
                format!("dev-{name}-not-for-production")
            }
        };
        if environment != "development" && val.len() < MIN_SECRET_LEN {
            return Err(format!(
                "{name} must be at least {MIN_SECRET_LEN} characters in {environment} environment"
            )
            .into());
        }
        Ok(val)
    }

    /// Unit price env var with a default
    fn price(name: &str, default: Decimal) -> Result<Decimal, BoxError> {
        match std::env::var(name) {
            Ok(raw) => Self::parse_price(name, &raw),
            Err(_) => Ok(default),
        }
    }

    /// Decimal within `0..=MAX_PRICE`
    fn parse_price(name: &str, raw: &str) -> Result<Decimal, BoxError> {
        let value = Decimal::from_str(raw.trim())
            .map_err(|e| format!("{name} is not a valid amount: {e}"))?;
        if value.is_sign_negative() || value > Decimal::from_f64(MAX_PRICE).unwrap_or(Decimal::MAX) {
            return Err(format!("{name} must be between 0 and {MAX_PRICE}").into());
        }
        Ok(value)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = PricingPolicy::default();

        let reuse_limit = std::env::var("BOTTLE_REUSE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.reuse_limit);

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "aqua.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "aqua_server=info,tower_http=info,security=info".into()),
            log_json: std::env::var("LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(environment != "development"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            pricing: PricingPolicy {
                default_unit_price: Self::price("DEFAULT_UNIT_PRICE", defaults.default_unit_price)?,
                delivery_fallback_price: Self::price(
                    "DELIVERY_FALLBACK_PRICE",
                    defaults.delivery_fallback_price,
                )?,
                reuse_limit,
            },
            bootstrap_admin,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
