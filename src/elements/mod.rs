//! The PAGE-XML document model
//!
//! Each submodule owns one level of the tree. Parsing goes from a generic
//! [`Element`] to the typed model and fails fast with the first
//! [`PageError`](crate::error::PageError); serialization goes the other
//! way and cannot fail.
//!
//! Containment, leaves first:
//!
//! - [`point`]: points, `Coords`, `Baseline`
//! - [`text`]: `TextEquiv` alternatives
//! - [`indexed`]: the indexed/unindexed invariant shared by text
//!   alternatives and ordered reading-order groups
//! - [`glyph`], [`word`], [`line`]: text content
//! - [`region`]: nested layout regions
//! - [`reading_order`]: ordered/unordered group tree of region references
//! - [`metadata`], [`page`], [`pcgts`]: the document root

use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::NamespaceMap;

pub(crate) mod helpers;

pub mod glyph;
pub mod indexed;
pub mod line;
pub mod metadata;
pub mod page;
pub mod pcgts;
pub mod point;
pub mod reading_order;
pub mod region;
pub mod text;
pub mod word;

pub use glyph::Glyph;
pub use indexed::{HasIndex, Indexed, IndexedCollection, TextHolder};
pub use line::Line;
pub use metadata::{Metadata, Timestamp};
pub use page::Page;
pub use pcgts::{parse_document, probe_document_kind, serialize_document, PcGts};
pub use point::{format_points, parse_points, Baseline, Coordinates, Point};
pub use reading_order::{
    Group, GroupChild, OrderedGroup, ReadingOrder, RegionRef, UnorderedGroup,
};
pub use region::{Region, TextRegion, TextRegionType};
pub use text::TextEquiv;
pub use word::Word;

/// A model node that maps onto exactly one XML element
pub trait PageElement: Sized {
    /// Parse the node from `element`, locating PAGE children in the
    /// default namespace of `ns`
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self>;

    /// Build the element for this node, stamped with `ns`'s default namespace
    fn to_element(&self, ns: &NamespaceMap) -> Element;
}
