//! Catalog feed
//!
//! Source of product data. The shipped implementation reads a `data.json`
//! file fresh on every fetch; nothing is cached at this layer.

use std::{fmt, fs, io, path::PathBuf};

use thiserror::Error;

use super::Product;

/// Errors fetching or decoding the catalog feed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The feed resource could not be read.
    #[error("failed to read catalog feed")]
    Io(#[from] io::Error),

    /// The feed contents were not a valid product array.
    #[error("failed to parse catalog feed")]
    Parse(#[from] serde_json::Error),
}

/// A source the catalog can be loaded from.
pub trait CatalogFeed: fmt::Debug {
    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the feed cannot be read or decoded.
    fn fetch(&self) -> Result<Vec<Product>, LoadError>;
}

/// Feed backed by a `data.json` file on disk.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    /// Create a feed reading from the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogFeed for FileFeed {
    fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        let raw = fs::read_to_string(&self.path)?;

        Ok(serde_json::from_str(&raw)?)
    }
}
