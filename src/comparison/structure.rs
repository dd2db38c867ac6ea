//! Order-insensitive tree shapes

use crate::documents::Element;
use crate::namespaces::QName;
use serde::Serialize;
use std::collections::BTreeMap;

/// The shape of an element: its name, attributes and the multiset of its
/// children's shapes. Text and child order are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Structure {
    /// Element name
    pub tag: QName,
    /// Attributes, by name
    pub attributes: BTreeMap<QName, String>,
    /// Children, sorted
    pub children: Vec<Structure>,
}

impl Structure {
    /// Shape of `element` and everything below it
    pub fn of(element: &Element) -> Self {
        let mut children: Vec<Structure> = element.children.iter().map(Structure::of).collect();
        children.sort();

        Structure {
            tag: element.qname.clone(),
            attributes: element
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            children,
        }
    }
}

/// Whether two trees have the same tags, nesting and attributes,
/// disregarding child order and text
pub fn same_structure(a: &Element, b: &Element) -> bool {
    Structure::of(a) == Structure::of(b)
}

/// Multiset of tag names of `element` and all its descendants
pub fn descendant_tags(element: &Element) -> BTreeMap<QName, usize> {
    let mut counts = BTreeMap::new();
    let mut stack = vec![element];

    while let Some(current) = stack.pop() {
        *counts.entry(current.qname.clone()).or_insert(0) += 1;
        stack.extend(current.children.iter());
    }
    counts
}
