#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stable colors for neighborhoods.
//!
//! A region's color is derived from a hash of its name and memoized in a
//! cache that is hydrated from, and written back to, an injected
//! [`KeyValueStore`]. Lookups are synchronous and never wait on storage;
//! all storage traffic goes through a single background task.

pub mod assigner;
pub mod palette;
pub mod store;

use thiserror::Error;

pub use assigner::{COLOR_CACHE_KEY, ColorAssigner};
pub use palette::color_from_name;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store cannot serve requests right now.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },
}
