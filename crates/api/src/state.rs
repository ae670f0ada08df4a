use std::sync::Arc;

use dashboard_core::auth::{AllowAll, Authorizer, ReadOnly};
use dashboard_core::store::DashboardStore;
use dashboard_core::{ChartRegistry, DashboardValidator};
use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: DashboardStore,
    config: AppConfig,
    validator: DashboardValidator,
    authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, registry: ChartRegistry) -> Self {
        let authorizer: Arc<dyn Authorizer> = if config.allow_write {
            Arc::new(AllowAll)
        } else {
            Arc::new(ReadOnly)
        };
        Self {
            inner: Arc::new(InnerState {
                store: DashboardStore::new(pool),
                validator: DashboardValidator::new(registry),
                config,
                authorizer,
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.inner.store.pool()
    }

    pub fn store(&self) -> &DashboardStore {
        &self.inner.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn validator(&self) -> &DashboardValidator {
        &self.inner.validator
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.inner.authorizer.as_ref()
    }
}
