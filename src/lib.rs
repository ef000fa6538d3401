//! Items Server Library
//!
//! HTTP CRUD service for a single "item" resource backed by a pooled
//! relational store (PostgreSQL or SQLite).

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod validate;

pub use config::Config;
pub use error::{ApiError, ApiResult};
