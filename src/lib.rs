pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod proxy;
pub mod server;
pub mod translate;

pub use config::{ProxyConfig, UpstreamSettings};
pub use error::{ProxyError, Result};
pub use models::ModelTable;
pub use server::{build_router, AppState};
