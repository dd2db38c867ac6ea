//! Attribute and child lookups shared by the element parsers

use crate::documents::Element;
use crate::error::{PageError, Result};
use crate::namespaces::NamespaceMap;

/// Value of a mandatory attribute
pub(crate) fn require_attribute<'a>(element: &'a Element, name: &str) -> Result<&'a str> {
    element
        .get_attribute(name)
        .ok_or_else(|| PageError::missing_attribute(element.local_name(), name).into())
}

/// Mandatory child element with PAGE tag `tag`
pub(crate) fn require_child<'a>(
    element: &'a Element,
    ns: &NamespaceMap,
    tag: &str,
) -> Result<&'a Element> {
    element
        .find_child(&ns.qname(tag))
        .ok_or_else(|| PageError::missing_element(element.local_name(), tag).into())
}

/// Optional child element with PAGE tag `tag`
pub(crate) fn optional_child<'a>(
    element: &'a Element,
    ns: &NamespaceMap,
    tag: &str,
) -> Option<&'a Element> {
    element.find_child(&ns.qname(tag))
}

/// Parse a non-negative integer attribute value
pub(crate) fn parse_index(element: &Element, name: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        PageError::malformed_attribute(element.local_name(), name, value, "a non-negative integer")
            .into()
    })
}

/// The optional `index` attribute
pub(crate) fn optional_index(element: &Element) -> Result<Option<usize>> {
    element
        .get_attribute("index")
        .map(|value| parse_index(element, "index", value))
        .transpose()
}

/// The mandatory `index` attribute
pub(crate) fn require_index(element: &Element) -> Result<usize> {
    let value = require_attribute(element, "index")?;
    parse_index(element, "index", value)
}

/// Text of an element, empty when the tag carries none
pub(crate) fn text_or_empty(element: &Element) -> String {
    element.text.clone().unwrap_or_default()
}

/// Child element `tag` holding `text`
pub(crate) fn text_element(ns: &NamespaceMap, tag: &str, text: &str) -> Element {
    let mut element = Element::new(ns.qname(tag));
    if !text.is_empty() {
        element.set_text(text.to_string());
    }
    element
}
