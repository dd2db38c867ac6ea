//! Resource loading utilities
//!
//! This module is the file-handling layer around the model: it reads
//! bytes, enforces [`Limits`], builds the generic tree and probes it.

use crate::documents::Document;
use crate::elements::{probe_document_kind, PcGts};
use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A file on disk
    Path(PathBuf),
    /// Text already in memory
    String(String),
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

/// Resource loader for PAGE documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a resource as bytes
    pub fn load_bytes(&self, location: &Location) -> Result<Vec<u8>> {
        let content = match location {
            Location::Path(path) => fs::read(path).map_err(|e| {
                Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
            })?,
            Location::String(s) => s.as_bytes().to_vec(),
        };

        self.limits.check_input_size(content.len())?;
        Ok(content)
    }

    /// Load and parse a resource into the generic tree
    pub fn load_document(&self, location: &Location) -> Result<Document> {
        let bytes = self.load_bytes(location)?;
        Document::parse_with_limits(&bytes, &self.limits)
    }

    /// Load a resource and parse it as a PAGE document.
    ///
    /// Returns `Ok(None)` when the root is not `PcGts`.
    pub fn load(&self, location: &Location) -> Result<Option<PcGts>> {
        let document = self.load_document(location)?;
        let root = document
            .root()
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;
        probe_document_kind(root)
    }

    /// [`Loader::load`] for a file path
    pub fn load_pcgts(&self, path: &Path) -> Result<Option<PcGts>> {
        log::debug!("loading {}", path.display());
        self.load(&Location::from(path))
    }
}
