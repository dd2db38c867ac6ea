//! Words and their glyphs

use crate::documents::Element;
use crate::elements::glyph::{Glyph, GLYPH_TAG};
use crate::elements::helpers::{require_attribute, require_child};
use crate::elements::indexed::TextHolder;
use crate::elements::point::{Coordinates, COORDS_TAG};
use crate::elements::text::TextEquiv;
use crate::elements::PageElement;
use crate::error::Result;
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of a word
pub const WORD_TAG: &str = "Word";

/// A word within a text line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    /// Identifier
    pub id: String,
    /// Outline
    pub coords: Coordinates,
    /// Glyphs, in document order
    pub glyphs: Vec<Glyph>,
    /// Recognized text alternatives
    pub texts: TextHolder<TextEquiv>,
}

impl Word {
    /// Word without glyphs or text
    pub fn new(id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            coords,
            glyphs: Vec::new(),
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
}

impl PageElement for Word {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let id = require_attribute(element, "id")?.to_string();
        let coords = Coordinates::from_element(require_child(element, ns, COORDS_TAG)?, ns)?;

        let glyphs = element
            .children_named(&ns.qname(GLYPH_TAG))
            .map(|child| Glyph::from_element(child, ns))
            .collect::<Result<Vec<_>>>()?;

        let texts = TextHolder::from_items(TextEquiv::parse_all(element, ns)?, WORD_TAG)?;

        Ok(Word {
            id,
            coords,
            glyphs,
            texts,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(WORD_TAG)).with_attribute("id", self.id.as_str());
        element.add_child(self.coords.to_element(ns));
        for glyph in &self.glyphs {
            element.add_child(glyph.to_element(ns));
        }
        for text in self.texts.iter() {
            element.add_child(text.to_element(ns));
        }
        element
    }
}
