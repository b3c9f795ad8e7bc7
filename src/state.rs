//! Shared application state for all routes. The catalog is immutable after startup.

use crate::config::ResourceCatalog;
use crate::service::PgExecutor;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgExecutor,
    pub catalog: Arc<ResourceCatalog>,
}

impl AppState {
    pub fn new(pool: PgPool, catalog: ResourceCatalog) -> Self {
        AppState {
            db: PgExecutor::new(pool),
            catalog: Arc::new(catalog),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
