//! Persistence access layer.
//!
//! This module provides database access functionality:
//! - Connection pool management
//! - Idempotent schema provisioning
//! - The item repository

pub mod pool;
pub mod repository;
pub mod schema;

pub use pool::{DatabaseType, DbPool, PoolManager, PoolSettings};
pub use repository::ItemRepository;
pub use schema::ensure_schema;
