//! # cachedash-core
//!
//! Display logic for the prerender cache dashboard.
//!
//! This library provides:
//! - Relative time formatting ("3h ago", "in 2d")
//! - Status resolution from raw values to label, color and icon
//! - View-model types for domains, queue, sitemaps, history, pages and parameters
//! - Render passes that turn records into table rows
//! - Form input validation
//! - Configuration management and logging infrastructure
//!
//! Nothing here performs I/O beyond loading config and snapshot files. The
//! presentation layer owns layout and rendering.
//!
//! ## Example
//!
//! ```rust
//! use cachedash_core::format::{parse_timestamp, RelativeTimeFormatter};
//! use cachedash_core::status::{StatusRecord, StatusResolver};
//!
//! let now = parse_timestamp("2024-03-15 12:00:00").unwrap();
//! let checked = parse_timestamp("2024-03-15 09:00:00").unwrap();
//! assert_eq!(RelativeTimeFormatter::default().format(checked, now), "3h ago");
//!
//! let display = StatusResolver::default()
//!     .resolve(&StatusRecord::Integration("pending"))
//!     .unwrap();
//! assert_eq!(display.label, "Integrating");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use format::{RelativeTimeFormatter, format_relative_time};
pub use status::{StatusDisplay, StatusRecord, StatusResolver, UnknownStatusPolicy};
pub use types::*;
pub use view::RenderPass;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod status;
pub mod types;
pub mod validate;
pub mod view;
