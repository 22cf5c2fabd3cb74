//! Resolutions Core - records, storage and request handling
//!
//! This crate holds everything the resolutions API does apart from HTTP:
//! the [`Resolution`] entity, the in-memory [`ResolutionStore`], and the
//! [`ResolutionHandler`] that validates requests and shapes responses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               ResolutionHandler              │
//! │   validate → lock store → mutate → respond   │
//! └──────────────────────┬───────────────────────┘
//!                        │ SharedStore (one mutex)
//!              ┌─────────▼─────────┐
//!              │  ResolutionStore  │
//!              │  records, next_id │
//!              └───────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use resolutions_core::{CreateResolution, ResolutionHandler};
//!
//! let handler = ResolutionHandler::default();
//! let created = handler
//!     .create(CreateResolution::new("  Learn Rust  "))
//!     .unwrap();
//!
//! assert_eq!(created.resolution.title, "Learn Rust");
//! assert_eq!(created.location, "/api/resolutions/1");
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod handler;
pub mod resolution;
pub mod store;

pub use error::{ErrorBody, ResolutionError, Result};
pub use handler::{Created, ResolutionHandler};
pub use resolution::{
    CreateResolution, ListFilter, Resolution, ResolutionId, ResolutionList, UpdateResolution,
};
pub use store::{ResolutionStore, SharedStore};

/// Base path of the resolutions collection
pub const RESOURCE_PATH: &str = "/api/resolutions";
