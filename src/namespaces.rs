//! XML namespace handling
//!
//! This module provides qualified names (QNames) and the namespace map
//! that every parse and serialize call is configured with.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// PAGE content namespace, 2019-07-15 revision
pub const PAGE_2019_NAMESPACE: &str =
    "http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Namespace map: prefix to URI, plus an optional default (unprefixed) entry.
///
/// Parsing looks PAGE elements up in the default namespace; serialization
/// stamps every element with it and declares the whole map on the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    /// Mapping from prefix to namespace URI
    prefixes: BTreeMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceMap {
    /// Create a new empty namespace map (un-namespaced documents)
    pub fn new() -> Self {
        Self::default()
    }

    /// Map whose default namespace is `namespace`
    pub fn with_default(namespace: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.set_default_namespace(namespace);
        map
    }

    /// Map for the 2019-07-15 PAGE content schema
    pub fn pagecontent() -> Self {
        Self::with_default(PAGE_2019_NAMESPACE)
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Find a prefix bound to `namespace`
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Iterate over the prefixed entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// True when the map has neither prefixes nor a default namespace
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Overlay `other` on top of this map (inner scope wins)
    pub fn merged(&self, other: &NamespaceMap) -> NamespaceMap {
        let mut merged = self.clone();
        for (prefix, uri) in &other.prefixes {
            merged.prefixes.insert(prefix.clone(), uri.clone());
        }
        if let Some(ref default) = other.default_namespace {
            merged.default_namespace = Some(default.clone());
        }
        merged
    }

    /// Copy of this map with the default namespace undeclared
    pub fn without_default(&self) -> NamespaceMap {
        NamespaceMap {
            prefixes: self.prefixes.clone(),
            default_namespace: None,
        }
    }

    /// Name of a PAGE element in this map's default namespace
    pub fn qname(&self, local_name: &str) -> QName {
        QName::new(self.default_namespace.clone(), local_name)
    }

    /// Resolve a prefixed element name to a QName
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            if prefix == "xml" {
                return Ok(QName::namespaced(XML_NAMESPACE, local));
            }
            let namespace = self
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName::new(self.default_namespace.clone(), prefixed_name))
        }
    }

    /// Resolve an attribute name; unprefixed attributes have no namespace
    pub fn resolve_attribute(&self, prefixed_name: &str) -> Result<QName> {
        if prefixed_name.contains(':') {
            self.resolve(prefixed_name)
        } else {
            Ok(QName::local(prefixed_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_display_uses_clark_notation() {
        let region = QName::namespaced(PAGE_2019_NAMESPACE, "TextRegion");
        assert_eq!(region.local_name, "TextRegion");
        assert_eq!(
            region.to_string(),
            format!("{{{}}}TextRegion", PAGE_2019_NAMESPACE)
        );
        assert_eq!(QName::local("TextRegion").to_string(), "TextRegion");
    }

    #[test]
    fn test_pagecontent_map() {
        let map = NamespaceMap::pagecontent();
        assert_eq!(map.get_default_namespace(), Some(PAGE_2019_NAMESPACE));
        assert_eq!(
            map.qname("TextRegion"),
            QName::namespaced(PAGE_2019_NAMESPACE, "TextRegion")
        );
        assert!(NamespaceMap::new().is_empty());
        assert_eq!(NamespaceMap::new().qname("Page"), QName::local("Page"));
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut map = NamespaceMap::new();
        map.add_prefix("pc", PAGE_2019_NAMESPACE);

        let qname = map.resolve("pc:Page").unwrap();
        assert_eq!(qname.namespace.as_deref(), Some(PAGE_2019_NAMESPACE));
        assert_eq!(qname.local_name, "Page");
        assert_eq!(map.prefix_for(PAGE_2019_NAMESPACE), Some("pc"));

        assert!(matches!(map.resolve("xs:element"), Err(Error::Namespace(_))));
    }

    #[test]
    fn test_attributes_are_unqualified_by_default() {
        let map = NamespaceMap::pagecontent();
        assert_eq!(map.resolve_attribute("id").unwrap(), QName::local("id"));
        assert_eq!(
            map.resolve_attribute("xml:lang").unwrap(),
            QName::namespaced(XML_NAMESPACE, "lang")
        );
    }

    #[test]
    fn test_merged_inner_scope_wins() {
        let outer = NamespaceMap::with_default("urn:outer");
        let mut inner = NamespaceMap::with_default("urn:inner");
        inner.add_prefix("x", "urn:x");

        let merged = outer.merged(&inner);
        assert_eq!(merged.get_default_namespace(), Some("urn:inner"));
        assert_eq!(merged.get_namespace("x"), Some("urn:x"));
    }
}
