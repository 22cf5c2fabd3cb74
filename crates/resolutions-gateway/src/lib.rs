//! Resolutions Gateway - HTTP surface of the resolutions API
//!
//! Maps the REST routes onto [`resolutions_core::ResolutionHandler`].
//!
//! # Routes
//!
//! ```text
//! GET    /api/resolutions        list, ?isDone=&title=
//! GET    /api/resolutions/:id    get
//! POST   /api/resolutions        create      → 201 + Location
//! PUT    /api/resolutions/:id    update
//! DELETE /api/resolutions/:id    delete      → 204
//! GET    /health                 liveness
//! GET    /status                 version and record count
//! ```

pub mod config;
pub mod error;
pub mod gateway;

pub use config::GatewayConfig;
pub use error::{ApiError, GatewayError, Result};
pub use gateway::{Gateway, GatewayState};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";
