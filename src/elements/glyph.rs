//! Glyphs: the smallest text content unit

use crate::documents::Element;
use crate::elements::helpers::{require_attribute, require_child};
use crate::elements::indexed::TextHolder;
use crate::elements::point::{Coordinates, COORDS_TAG};
use crate::elements::text::TextEquiv;
use crate::elements::PageElement;
use crate::error::Result;
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of a glyph
pub const GLYPH_TAG: &str = "Glyph";

/// A single character-like shape within a word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Glyph {
    /// Identifier
    pub id: String,
    /// Outline
    pub coords: Coordinates,
    /// Recognized text alternatives
    pub texts: TextHolder<TextEquiv>,
}

impl Glyph {
    /// Glyph without text
    pub fn new(id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            coords,
            texts: TextHolder::default(),
        }
    }

    /// The current text (index 0 when indexed)
    pub fn text(&self) -> Option<&TextEquiv> {
        self.texts.current()
    }
}

impl PageElement for Glyph {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let id = require_attribute(element, "id")?.to_string();
        let coords = Coordinates::from_element(require_child(element, ns, COORDS_TAG)?, ns)?;
        let texts = TextHolder::from_items(TextEquiv::parse_all(element, ns)?, GLYPH_TAG)?;

        Ok(Glyph { id, coords, texts })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(GLYPH_TAG)).with_attribute("id", self.id.as_str());
        element.add_child(self.coords.to_element(ns));
        for text in self.texts.iter() {
            element.add_child(text.to_element(ns));
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::elements::point::Point;
    use crate::error::PageErrorKind;

    fn parse(xml: &str) -> Result<Glyph> {
        let doc = Document::from_string(xml).unwrap();
        Glyph::from_element(doc.root().unwrap(), &NamespaceMap::new())
    }

    #[test]
    fn test_simple_glyph() {
        let glyph = parse(r#"<Glyph id="w0g0"><Coords points="0,1 2,3 4,5"/></Glyph>"#).unwrap();
        assert_eq!(glyph.id, "w0g0");
        assert_eq!(
            glyph.coords.points,
            vec![Point::new(0, 1), Point::new(2, 3), Point::new(4, 5)]
        );
        assert!(glyph.text().is_none());
    }

    #[test]
    fn test_glyph_with_text() {
        let glyph = parse(
            r#"<Glyph id="w0g1"><Coords points="5,4 3,2"/><TextEquiv><Unicode>ü</Unicode></TextEquiv></Glyph>"#,
        )
        .unwrap();
        assert_eq!(glyph.text(), Some(&TextEquiv::new("ü")));
    }

    #[test]
    fn test_space_glyph_roundtrip() {
        let glyph = parse(
            r#"<Glyph id="g"><Coords points="0,0 1,1"/><TextEquiv><Unicode> </Unicode></TextEquiv></Glyph>"#,
        )
        .unwrap();
        assert_eq!(glyph.text().map(|t| t.unicode.as_str()), Some(" "));

        let ns = NamespaceMap::new();
        let text = Document::with_root(glyph.to_element(&ns)).to_xml_string().unwrap();
        let reread = Document::from_string(&text).unwrap();
        assert_eq!(Glyph::from_element(reread.root().unwrap(), &ns).unwrap(), glyph);
    }

    #[test]
    fn test_glyph_with_single_indexed_text() {
        let glyph = parse(
            r#"<Glyph id="w0g1"><Coords points="5,4 3,2"/><TextEquiv index="3"><Unicode>ü</Unicode></TextEquiv></Glyph>"#,
        )
        .unwrap();
        assert!(glyph.texts.is_indexed());
        assert_eq!(glyph.texts.get(3).map(|t| t.unicode.as_str()), Some("ü"));
        assert!(glyph.text().is_none());
    }

    #[test]
    fn test_glyph_without_id() {
        let err = parse(r#"<Glyph><Coords points="5,4 3,2 1,0"/></Glyph>"#).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingAttribute));
    }

    #[test]
    fn test_glyph_without_coords() {
        let err = parse(r#"<Glyph id="w0g2"></Glyph>"#).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));
    }

    #[test]
    fn test_glyph_to_element() {
        let glyph = parse(
            r#"<Glyph id="g"><Coords points="0,0 1,1"/><TextEquiv index="0"><Unicode>a</Unicode></TextEquiv><TextEquiv index="1"><Unicode>o</Unicode></TextEquiv></Glyph>"#,
        )
        .unwrap();
        let element = glyph.to_element(&NamespaceMap::new());
        let tags: Vec<_> = element.children.iter().map(|c| c.local_name()).collect();
        assert_eq!(tags, vec!["Coords", "TextEquiv", "TextEquiv"]);
        assert_eq!(element.get_attribute("id"), Some("g"));
    }
}
