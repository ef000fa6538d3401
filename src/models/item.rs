//! The persisted item entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted item row.
///
/// `id` is assigned by the store, monotonically increasing and never reused
/// after deletion. `created_at` is set once at insertion; `updated_at` is
/// refreshed by a store-side trigger on every update, so
/// `updated_at >= created_at` holds for every row. The application layer
/// never computes either timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
