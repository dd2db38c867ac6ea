//! Text lines

use crate::documents::Element;
use crate::elements::helpers::{optional_child, require_attribute, require_child};
use crate::elements::indexed::TextHolder;
use crate::elements::point::{Baseline, Coordinates, BASELINE_TAG, COORDS_TAG};
use crate::elements::text::TextEquiv;
use crate::elements::word::{Word, WORD_TAG};
use crate::elements::PageElement;
use crate::error::Result;
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of a text line
pub const TEXT_LINE_TAG: &str = "TextLine";

/// A line of text within a text region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Identifier
    pub id: String,
    /// Outline
    pub coords: Coordinates,
    /// Baseline, if annotated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
    /// Words, in document order
    pub words: Vec<Word>,
    /// Recognized text alternatives
    pub texts: TextHolder<TextEquiv>,
}

impl Line {
    /// Line without baseline, words or text
    pub fn new(id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            coords,
            baseline: None,
            words: Vec::new(),
            texts: TextHolder::default(),
        }
    }

    /// The current text (index 0 when indexed)
    pub fn text(&self) -> Option<&TextEquiv> {
        self.texts.current()
    }

    /// Text alternative with the given index
    pub fn text_at(&self, index: usize) -> Option<&TextEquiv> {
        self.texts.get(index)
    }

    /// Whether the line carries indexed alternatives
    pub fn is_indexed(&self) -> bool {
        self.texts.is_indexed()
    }
}

impl PageElement for Line {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let id = require_attribute(element, "id")?.to_string();
        let coords = Coordinates::from_element(require_child(element, ns, COORDS_TAG)?, ns)?;

        let baseline = optional_child(element, ns, BASELINE_TAG)
            .map(|child| Baseline::from_element(child, ns))
            .transpose()?;

        let words = element
            .children_named(&ns.qname(WORD_TAG))
            .map(|child| Word::from_element(child, ns))
            .collect::<Result<Vec<_>>>()?;

        let texts = TextHolder::from_items(TextEquiv::parse_all(element, ns)?, TEXT_LINE_TAG)?;

        Ok(Line {
            id,
            coords,
            baseline,
            words,
            texts,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element =
            Element::new(ns.qname(TEXT_LINE_TAG)).with_attribute("id", self.id.as_str());
        element.add_child(self.coords.to_element(ns));
        if let Some(ref baseline) = self.baseline {
            element.add_child(baseline.to_element(ns));
        }
        for word in &self.words {
            element.add_child(word.to_element(ns));
        }
        for text in self.texts.iter() {
            element.add_child(text.to_element(ns));
        }
        element
    }
}
