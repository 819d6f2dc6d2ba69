use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    services::stock_alerts::StockAlerts,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub stock_alerts: StockAlerts,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(&pool);
        let stock_alerts = StockAlerts::new(config.stock_alert_debounce);
        Self {
            pool,
            orm,
            config: Arc::new(config),
            stock_alerts,
        }
    }
}
