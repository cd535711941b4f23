//! # propconf - Server Property Configuration
//!
//! Turns a flat set of `key=value` properties into a fully typed, validated
//! configuration for a database server, and hands each subsystem a narrow
//! read-only view of it.
//!
//! ## Features
//!
//! - **Closed key table**: Every recognized key, its type and its default live in one table
//! - **Typed parsing**: Integers, byte sizes with `k`/`m`/`g` suffixes, doubles, booleans,
//!   IPv4 addresses and `host:port` bind specs
//! - **All-or-nothing**: The first bad value aborts resolution; no half-built configuration escapes
//! - **Capability views**: HTTP server, connection dispatcher, static content, text import,
//!   storage engine and UDP line receiver each see only their own settings
//! - **Sources**: `.properties` files, plain maps, and environment variable overlays
//! - **Reference docs**: Markdown generated from the same table the resolver walks
//!
//! ## Quick Start
//!
//! ```rust
//! use propconf::{Properties, ServerConfiguration};
//! use propconf::views::{CairoConfiguration, HttpServerConfiguration};
//!
//! let props = Properties::parse(
//!     "http.worker.count=4\n\
//!      http.receive.buffer.size=2m\n\
//!      cairo.index.value.block.size=200\n",
//! );
//!
//! let config = ServerConfiguration::from_properties("/var/lib/db", &props)?;
//!
//! assert_eq!(config.http_server().worker_count(), 4);
//! assert_eq!(config.http_server().recv_buffer_size(), 2 * 1024 * 1024);
//! assert_eq!(config.cairo().index_value_block_size(), 256);
//! # Ok::<(), propconf::Error>(())
//! ```
//!
//! ## Loading From a File
//!
//! ```rust,no_run
//! use propconf::{EnvOverlay, Properties, ServerConfiguration};
//!
//! # fn example() -> propconf::Result<()> {
//! let file = Properties::load("conf/server.conf".as_ref())?;
//!
//! // DB_HTTP_WORKER_COUNT=8 overrides http.worker.count
//! let source = EnvOverlay::new("DB", file);
//!
//! let config = ServerConfiguration::builder("/var/lib/db")
//!     .mime_types_file("conf/mime.types")
//!     .build(&source)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Handling Errors
//!
//! ```rust
//! use propconf::{ConfigError, Properties, ServerConfiguration};
//!
//! let props = Properties::parse("http.bind.to=0.0.0.0");
//! let err = ServerConfiguration::from_properties("/db", &props).unwrap_err();
//!
//! let cause = err.as_config_error().unwrap();
//! assert!(matches!(cause, ConfigError::MissingSeparator { .. }));
//! assert_eq!(cause.key(), "http.bind.to");
//! assert_eq!(cause.value(), "0.0.0.0");
//! ```

// Core modules
mod docs;
mod error;
mod source;

// Grouped modules
pub mod config;
pub mod facade;
pub mod mime;
pub mod views;

// Re-exports from core
pub use docs::{DocsConfig, generate_docs, generate_docs_from_metadata};
pub use error::{ConfigError, Error, Result};
pub use source::{DefaultEnvSource, EnvOverlay, EnvSource, Properties, PropertySource};

// Re-exports from config
pub use config::{
    ResolvedSettings, ServerConfiguration, ServerConfigurationBuilder, SettingKind,
    SettingMetadata, catalog,
};

pub use facade::Facades;
pub use mime::MimeTypesCache;
