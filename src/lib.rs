//! Exports a shop's products and variants as flat JSON, CSV and SQL files.
//!
//! A run fetches from the Admin API (REST or GraphQL), keeps the raw
//! response as a snapshot, flattens products into one record per variant
//! and writes the three renderings into an output directory.

pub mod archiver;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod graphql;
pub mod models;
pub mod normalize;
pub mod pipeline;

pub use error::{ExportError, Result};
