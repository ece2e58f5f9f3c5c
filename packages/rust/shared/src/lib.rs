//! Shared types, error model, and configuration for vitae.
//!
//! This crate is the foundation depended on by all other vitae crates.
//! It provides:
//! - [`VitaeError`] — the unified error type
//! - Content types ([`SiteConfig`], [`Project`], [`Projects`], [`Course`])
//! - Generator configuration ([`AppConfig`], [`SitePaths`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, PathsConfig, PublicationPolicy, SitePaths, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, VitaeError};
pub use types::{Course, Project, Projects, SiteConfig};
