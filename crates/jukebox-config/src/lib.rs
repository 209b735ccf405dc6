#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File- and environment-backed configuration for the jukebox services.
//!
//! Layout: `model.rs` (typed settings profiles), `loader.rs` (TOML file and
//! environment merging), `validate.rs` (validation/normalisation helpers).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

mod defaults;

pub use error::{ConfigError, ConfigResult};
pub use model::{
    AcquireProfile, HttpProfile, LogProfile, Settings, TITLE_PLACEHOLDER,
};
pub use validate::normalize_extension;
