//! Generic XML document tree
//!
//! A labeled tree with attributes and ordered children, read from and
//! written back to XML text with quick-xml. The PAGE model parsers only
//! ever see this tree, never raw text.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceMap, QName, XML_NAMESPACE};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes, in document order
    pub attributes: IndexMap<QName, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceMap,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceMap::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Check the element's qualified name
    pub fn is(&self, qname: &QName) -> bool {
        &self.qname == qname
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(name))
            .map(|s| s.as_str())
    }

    /// Set an unqualified attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(QName::local(name), value.into());
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder form of [`Element::add_child`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.add_child(child);
        self
    }

    /// Set text content
    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Append to the text content
    pub fn append_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Child elements with the given qualified name, in document order
    pub fn children_named<'a>(
        &'a self,
        qname: &'a QName,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |e| e.is(qname))
    }

    /// First child element with the given qualified name
    pub fn find_child(&self, qname: &QName) -> Option<&Element> {
        self.children.iter().find(|e| e.is(qname))
    }
}

/// XML Document representation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with the given root element
    pub fn with_root(root: Element) -> Self {
        Self { root: Some(root) }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_input_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(false);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        // in-scope namespace bindings, one entry per open element
        let mut scopes: Vec<NamespaceMap> = vec![NamespaceMap::new()];
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_depth(element_stack.len() + 1)?;
                    let (element, scope) = Self::parse_element(&e, current_scope(&scopes), limits)?;
                    scopes.push(scope);
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    scopes.pop();
                    if let Some(mut current) = element_stack.pop() {
                        drop_indentation(&mut current);
                        Self::attach(&mut doc, &mut element_stack, current)?;
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_depth(element_stack.len() + 1)?;
                    let (element, _) = Self::parse_element(&e, current_scope(&scopes), limits)?;
                    Self::attach(&mut doc, &mut element_stack, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        current.append_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let bytes = e.into_inner();
                        let text = std::str::from_utf8(&bytes)
                            .map_err(|e| Error::Xml(format!("Invalid CDATA content: {}", e)))?;
                        current.append_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(Error::Xml(format!(
                "Unexpected end of input inside <{}>",
                open.local_name()
            )));
        }

        Ok(doc)
    }

    fn attach(doc: &mut Document, stack: &mut [Element], element: Element) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.add_child(element);
        } else if doc.root.is_some() {
            return Err(Error::Xml(format!(
                "Second root element <{}>",
                element.local_name()
            )));
        } else {
            doc.root = Some(element);
        }
        Ok(())
    }

    /// Parse element from BytesStart event, returning it and its scope
    fn parse_element(
        start: &BytesStart,
        parent_scope: &NamespaceMap,
        limits: &Limits,
    ) -> Result<(Element, NamespaceMap)> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut declared = NamespaceMap::new();
        let mut raw_attributes: Vec<(String, String)> = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            // Handle namespace declarations
            if attr_name == "xmlns" {
                declared.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                declared.add_prefix(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        limits.check_attribute_count(raw_attributes.len())?;

        let scope = parent_scope.merged(&declared);
        let mut element = Element::new(scope.resolve(&name)?);
        element.namespaces = declared;

        for (attr_name, attr_value) in raw_attributes {
            element
                .attributes
                .insert(scope.resolve_attribute(&attr_name)?, attr_value);
        }

        Ok((element, scope))
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Serialize to an indented XML string with a declaration
    pub fn to_xml_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out, Some(2))?;
        String::from_utf8(out).map_err(|e| Error::Xml(format!("Invalid UTF-8 output: {}", e)))
    }

    /// Serialize into `sink`, indenting nested elements by `indent` spaces
    pub fn write_to<W: Write>(&self, sink: W, indent: Option<usize>) -> Result<()> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| {
                Error::Xml("Cannot serialize a document without a root element".to_string())
            })?;

        let mut writer = match indent {
            Some(width) => Writer::new_with_indent(sink, b' ', width),
            None => Writer::new(sink),
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
        write_element(&mut writer, root, &NamespaceMap::new())?;
        Ok(())
    }
}

fn current_scope(scopes: &[NamespaceMap]) -> &NamespaceMap {
    // the bottom scope is never popped
    &scopes[scopes.len() - 1]
}

/// Whitespace between child elements is layout, not content. Leaf
/// elements keep theirs.
fn drop_indentation(element: &mut Element) {
    let layout_only = element.text.as_deref().map_or(false, |t| t.trim().is_empty());
    if layout_only && !element.children.is_empty() {
        element.text = None;
    }
}

fn write_error(err: impl std::fmt::Display) -> Error {
    Error::Xml(format!("Failed to write XML: {}", err))
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    scope: &NamespaceMap,
) -> Result<()> {
    let mut declared = element.namespaces.clone();
    let mut inner = scope.merged(&declared);
    let mut undeclare_default = false;

    let local = element.local_name();
    let name = match element.namespace() {
        Some(ns) if inner.get_default_namespace() == Some(ns) => local.to_string(),
        Some(ns) => match inner.prefix_for(ns).map(str::to_string) {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => {
                declared.set_default_namespace(ns);
                inner = scope.merged(&declared);
                local.to_string()
            }
        },
        None if inner.get_default_namespace().is_some() => {
            undeclare_default = true;
            inner = inner.without_default();
            local.to_string()
        }
        None => local.to_string(),
    };

    let mut start = BytesStart::new(name.as_str());
    if undeclare_default {
        start.push_attribute(("xmlns", ""));
    } else if let Some(ns) = declared.get_default_namespace() {
        start.push_attribute(("xmlns", ns));
    }
    for (prefix, uri) in declared.iter() {
        start.push_attribute((format!("xmlns:{}", prefix).as_str(), uri));
    }

    for (qname, value) in &element.attributes {
        let attr_name = match qname.namespace.as_deref() {
            None => qname.local_name.clone(),
            Some(XML_NAMESPACE) => format!("xml:{}", qname.local_name),
            Some(ns) => match inner.prefix_for(ns) {
                Some(prefix) => format!("{}:{}", prefix, qname.local_name),
                None => {
                    return Err(Error::Namespace(format!(
                        "No prefix bound for attribute namespace {}",
                        ns
                    )))
                }
            },
        };
        start.push_attribute((attr_name.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if element.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start)).map_err(write_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in &element.children {
        write_element(writer, child, &inner)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(write_error)?;

    Ok(())
}
