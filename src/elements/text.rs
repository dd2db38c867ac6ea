//! Recognized-text alternatives (`TextEquiv`)

use crate::documents::Element;
use crate::elements::helpers::{
    optional_child, optional_index, require_child, text_element, text_or_empty,
};
use crate::elements::indexed::HasIndex;
use crate::elements::PageElement;
use crate::error::{PageError, Result};
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of a text alternative
pub const TEXT_EQUIV_TAG: &str = "TextEquiv";
const UNICODE_TAG: &str = "Unicode";
const PLAIN_TEXT_TAG: &str = "PlainText";

/// One candidate reading of a glyph, word or line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEquiv {
    /// Rank/key among sibling alternatives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// The recognized text
    pub unicode: String,
    /// Plain-text variant, e.g. with ligatures resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    /// Confidence, strictly between 0 and 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf: Option<f64>,
}

impl TextEquiv {
    /// Unindexed alternative without plain text or confidence
    pub fn new(unicode: impl Into<String>) -> Self {
        Self {
            index: None,
            unicode: unicode.into(),
            plain_text: None,
            conf: None,
        }
    }

    /// Set the index
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the plain-text variant
    pub fn with_plain_text(mut self, plain_text: impl Into<String>) -> Self {
        self.plain_text = Some(plain_text.into());
        self
    }

    /// Set the confidence
    pub fn with_conf(mut self, conf: f64) -> Self {
        self.conf = Some(conf);
        self
    }

    /// Parse every `TextEquiv` child of `element`, in document order
    pub(crate) fn parse_all(element: &Element, ns: &NamespaceMap) -> Result<Vec<TextEquiv>> {
        element
            .children_named(&ns.qname(TEXT_EQUIV_TAG))
            .map(|child| TextEquiv::from_element(child, ns))
            .collect()
    }
}

fn parse_conf(element: &Element, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(conf) if conf > 0.0 && conf < 1.0 => Ok(conf),
        _ => Err(PageError::malformed_attribute(
            element.local_name(),
            "conf",
            value,
            "a number strictly between 0 and 1",
        )
        .into()),
    }
}

impl HasIndex for TextEquiv {
    fn index(&self) -> Option<usize> {
        self.index
    }
}

impl PageElement for TextEquiv {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let index = optional_index(element)?;
        let conf = element
            .get_attribute("conf")
            .map(|value| parse_conf(element, value))
            .transpose()?;

        let unicode = text_or_empty(require_child(element, ns, UNICODE_TAG)?);
        let plain_text = optional_child(element, ns, PLAIN_TEXT_TAG).map(text_or_empty);

        Ok(TextEquiv {
            index,
            unicode,
            plain_text,
            conf,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(TEXT_EQUIV_TAG));

        if let Some(index) = self.index {
            element.set_attribute("index", index.to_string());
        }
        if let Some(conf) = self.conf {
            element.set_attribute("conf", conf.to_string());
        }

        element.add_child(text_element(ns, UNICODE_TAG, &self.unicode));
        if let Some(ref plain_text) = self.plain_text {
            element.add_child(text_element(ns, PLAIN_TEXT_TAG, plain_text));
        }

        element
    }
}
