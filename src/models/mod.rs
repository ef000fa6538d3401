//! Data models for the items server.
//!
//! This module re-exports all model types used throughout the application.

pub mod item;

// Re-export commonly used types
pub use item::Item;
