//! CLI library for testing purposes

pub mod config;
pub mod formats;
pub mod path_glob;
pub mod validation;

pub use config::LocsmithConfig;
pub use locsmith::Catalog;
