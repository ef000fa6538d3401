//! Idempotent schema provisioning.
//!
//! Ensures the `items` table and its update-timestamp trigger exist. Invoked
//! before every repository operation; every statement is an if-absent or
//! replace form, so repeated and concurrent runs converge on the same state.
//! The `updated_at` refresh lives in the store as a trigger: the application
//! layer never computes it.

use crate::db::pool::DbPool;
use crate::error::{ApiError, ApiResult};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

const POSTGRES_SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE OR REPLACE FUNCTION items_set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
DROP TRIGGER IF EXISTS set_updated_at ON items;
CREATE TRIGGER set_updated_at
    BEFORE UPDATE ON items
    FOR EACH ROW
    EXECUTE PROCEDURE items_set_updated_at();
"#;

// AUTOINCREMENT keeps deleted ids from being reused. The trigger fires only
// on name/description changes so its own write cannot re-enter it.
const SQLITE_SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
CREATE TRIGGER IF NOT EXISTS set_updated_at
    AFTER UPDATE OF name, description ON items
    FOR EACH ROW
BEGIN
    UPDATE items SET updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = NEW.id;
END;
"#;

/// SQLSTATEs Postgres raises when concurrent `CREATE ... IF NOT EXISTS` /
/// `CREATE OR REPLACE` statements race and lose to an identical winner.
/// The end state is the one we wanted, so these count as success.
const PG_DUPLICATE_OBJECT_STATES: &[&str] = &["42P07", "42710", "23505"];

/// Ensure the `items` table and its update trigger exist.
///
/// Safe to call on every request: after the first successful run, subsequent
/// calls are observable only as redundant no-op DDL statements. Failures
/// surface as [`ApiError::Unavailable`] and are not retried here.
pub async fn ensure_schema(pool: &DbPool, ddl_timeout: Duration) -> ApiResult<()> {
    debug!(db_type = %pool.db_type(), "Ensuring items schema");

    let result = match pool {
        DbPool::Postgres(p) => {
            timeout(ddl_timeout, sqlx::raw_sql(POSTGRES_SCHEMA_DDL).execute(p))
                .await
                .map(|r| r.map(|_| ()))
        }
        DbPool::Sqlite(p) => timeout(ddl_timeout, sqlx::raw_sql(SQLITE_SCHEMA_DDL).execute(p))
            .await
            .map(|r| r.map(|_| ())),
    };

    match result {
        Err(_) => Err(ApiError::timeout(
            "schema provisioning",
            ddl_timeout.as_secs(),
        )),
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) if lost_creation_race(&e) => Ok(()),
        Ok(Err(e)) => Err(ApiError::unavailable(format!(
            "schema provisioning failed: {}",
            e
        ))),
    }
}

fn lost_creation_race(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| PG_DUPLICATE_OBJECT_STATES.contains(&code.as_ref())),
        _ => false,
    }
}
