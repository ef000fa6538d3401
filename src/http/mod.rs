//! HTTP surface: router, handlers, and server runner.

pub mod handlers;
pub mod server;

pub use handlers::{AppState, routes};
pub use server::serve;
