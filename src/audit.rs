use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Append a row to `audit_logs`.
///
/// The trail is best effort: an insert failure is logged at warn level and the
/// business operation that triggered it still succeeds.
pub async fn record(pool: &DbPool, user_id: Uuid, action: &str, resource: &str, metadata: Value) {
    let inserted = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(&metadata)
    .execute(pool)
    .await;

    match inserted {
        Ok(_) => tracing::debug!(%user_id, action, resource, "audit recorded"),
        Err(err) => tracing::warn!(error = %err, %user_id, action, resource, "audit log failed"),
    }
}
