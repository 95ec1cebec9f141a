//! Shared application state

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;
use crate::db::DbService;
use crate::pricing::PricingPolicy;
use crate::qr::{PngQrRenderer, QrRenderer};

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
    pub qr: Arc<dyn QrRenderer>,
    pub pricing: PricingPolicy,
}

impl AppState {
    /// Open the database and build the services from configuration
    pub async fn new(config: &Config) -> Result<Self, shared::error::AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(db, config))
    }

    pub fn with_db(db: DbService, config: &Config) -> Self {
        Self {
            pool: db.pool,
            jwt: Arc::new(JwtService::with_config(JwtConfig::new(
                config.jwt_secret.clone(),
                config.jwt_expiration_minutes,
            ))),
            qr: Arc::new(PngQrRenderer::default()),
            pricing: config.pricing,
        }
    }

    /// State over an existing pool with default pricing, used by tests
    pub fn for_pool(pool: SqlitePool, jwt_secret: &str) -> Self {
        Self {
            pool,
            jwt: Arc::new(JwtService::with_config(JwtConfig::new(jwt_secret, 60))),
            qr: Arc::new(PngQrRenderer::default()),
            pricing: PricingPolicy::default(),
        }
    }
}
