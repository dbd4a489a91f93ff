//! # tagsync
//!
//! Keeps a local copy of a crowd-sourced tag-translation database in sync
//! with its release feed, and serves the derived suggestion list and name
//! lookup table to other surfaces. Usable both as a standalone binary and as
//! a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagsync::config::SyncConfig;
//! use tagsync::context::SyncContext;
//! use tagsync::server::create_router;
//! use tagsync::store::{SqliteStore, Store};
//!
//! let config = SyncConfig::default();
//! let store = SqliteStore::new(config.db_path())?;
//! store.initialize()?;
//!
//! let ctx = Arc::new(SyncContext::new(config, Arc::new(store))?);
//! ctx.bootstrap().await?;
//! let router = create_router(ctx);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod server;
pub mod status;
pub mod store;
pub mod sync;
pub mod types;
