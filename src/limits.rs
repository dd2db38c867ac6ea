//! Input limits for the generic tree reader
//!
//! Every model parser recurses with the nesting of the XML it is given, so
//! the reader rejects pathologically deep or large inputs before the model
//! ever sees them. A realistic PAGE document nests about ten levels below
//! the root plus whatever region nesting the layout needs. The default
//! depth keeps the recursive region and group parsers within the 2 MB
//! stack of a spawned thread.

use crate::error::{Error, Result};

/// Bounds checked while reading XML text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest element nesting accepted, counting the root as 1
    pub max_depth: usize,

    /// Largest input accepted, in bytes
    pub max_input_size: usize,

    /// Most attributes (namespace declarations included) on one element
    pub max_attributes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_input_size: 100 * 1024 * 1024,
            max_attributes: 1000,
        }
    }
}

impl Limits {
    /// Default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits for untrusted input: depth 100, 10 MB, 100 attributes
    pub fn strict() -> Self {
        Self {
            max_depth: 100,
            max_input_size: 10 * 1024 * 1024,
            max_attributes: 100,
        }
    }

    /// Limits for very large trusted inputs. Deeply nested documents need
    /// a correspondingly larger thread stack to parse.
    pub fn permissive() -> Self {
        Self {
            max_depth: 10_000,
            max_input_size: 1024 * 1024 * 1024,
            max_attributes: 10_000,
        }
    }

    /// Fail if an element at `depth` would be too deeply nested
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        exceeds("nesting depth", depth, self.max_depth)
    }

    /// Fail if `size` bytes of input is too large
    pub fn check_input_size(&self, size: usize) -> Result<()> {
        exceeds("input size in bytes", size, self.max_input_size)
    }

    /// Fail if an element carries too many attributes
    pub fn check_attribute_count(&self, count: usize) -> Result<()> {
        exceeds("attribute count", count, self.max_attributes)
    }
}

fn exceeds(what: &str, value: usize, max: usize) -> Result<()> {
    if value > max {
        return Err(Error::LimitExceeded(format!(
            "{} {} exceeds maximum {}",
            what, value, max
        )));
    }
    Ok(())
}
