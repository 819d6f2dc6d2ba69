//! Low-stock alert snapshot, recomputed after stock changes settle.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tokio::sync::RwLock;

use crate::{
    db::OrmConn,
    domain::stock::{StockStatus, stock_status},
    dto::stock::{AlertSnapshot, StockAlert},
    entity::{
        products::{Column as ProdCol, Entity as Products},
        stock_levels::Entity as StockLevels,
    },
    error::AppResult,
    tasks::SupersedingTask,
};

#[derive(Clone)]
pub struct StockAlerts {
    task: SupersedingTask,
    snapshot: Arc<RwLock<AlertSnapshot>>,
}

impl StockAlerts {
    pub fn new(debounce: Duration) -> Self {
        Self {
            task: SupersedingTask::new("stock_alerts", debounce),
            snapshot: Arc::new(RwLock::new(AlertSnapshot::default())),
        }
    }

    /// Schedule a recomputation; a burst of calls yields a single one.
    pub fn schedule_refresh(&self, orm: &OrmConn) {
        let this = self.clone();
        let orm = orm.clone();
        self.task.trigger(move || async move {
            if let Err(err) = this.refresh(&orm).await {
                tracing::warn!(error = %err, "stock alert refresh failed");
            }
        });
    }

    pub async fn refresh(&self, orm: &OrmConn) -> AppResult<AlertSnapshot> {
        let items = compute_alerts(orm).await?;
        for alert in items.iter().filter(|a| a.status == StockStatus::EstoqueBaixo) {
            tracing::warn!(
                product_id = %alert.product_id,
                product = %alert.name,
                available = alert.available,
                min_stock = alert.min_stock,
                "product below minimum stock"
            );
        }
        let snapshot = AlertSnapshot {
            items,
            computed_at: Some(Utc::now()),
        };
        *self.snapshot.write().await = snapshot.clone();
        Ok(snapshot)
    }

    pub async fn snapshot(&self) -> AlertSnapshot {
        self.snapshot.read().await.clone()
    }
}

async fn compute_alerts(orm: &OrmConn) -> AppResult<Vec<StockAlert>> {
    let rows = Products::find()
        .find_also_related(StockLevels)
        .filter(ProdCol::Status.eq("Ativo"))
        .all(orm)
        .await?;

    let mut alerts: Vec<StockAlert> = rows
        .into_iter()
        .filter_map(|(product, level)| {
            let available = level.map(|l| l.available).unwrap_or(0);
            let status = stock_status(available, product.min_stock);
            (status != StockStatus::Normal).then(|| StockAlert {
                product_id: product.id,
                name: product.name,
                available,
                min_stock: product.min_stock,
                status,
            })
        })
        .collect();

    // lowest first
    alerts.sort_by(|a, b| {
        let ka = i64::from(a.available) * i64::from(b.min_stock.max(1));
        let kb = i64::from(b.available) * i64::from(a.min_stock.max(1));
        ka.cmp(&kb).then_with(|| a.name.cmp(&b.name))
    });
    Ok(alerts)
}
