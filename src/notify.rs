use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Fire-and-forget notification sink. Callers log a warning on failure and
/// carry on; a lost notification must never fail the request that raised it.
pub async fn notify_user(
    pool: &DbPool,
    user_id: Uuid,
    kind: &str,
    message: &str,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, kind, message, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(kind)
    .bind(message)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
