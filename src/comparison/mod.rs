//! Structural comparison of XML trees
//!
//! Serialization does not reproduce a document byte for byte: sibling
//! order may change (ordered groups are written by index) and text is
//! canonicalized. What must survive a parse/serialize round-trip is the
//! shape of the tree, which is what this module compares.

pub mod structure;

pub use structure::{descendant_tags, same_structure, Structure};
