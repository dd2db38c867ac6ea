//! Layout regions
//!
//! Regions nest: every direct child of a region that is itself a region
//! becomes a child region, whatever its type. Children that are not
//! regions are skipped rather than rejected, both here and on the page.

use crate::documents::Element;
use crate::elements::helpers::{require_attribute, require_child};
use crate::elements::line::{Line, TEXT_LINE_TAG};
use crate::elements::point::{Coordinates, COORDS_TAG};
use crate::elements::PageElement;
use crate::error::{PageError, PageErrorKind, Result};
use crate::namespaces::NamespaceMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tag of a text region
pub const TEXT_REGION_TAG: &str = "TextRegion";

/// Layout role of a text region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRegionType {
    Paragraph,
    Heading,
    Caption,
    Header,
    Footer,
    PageNumber,
    DropCapital,
    Credit,
    Floating,
    SignatureMark,
    CatchWord,
    Marginalia,
    Footnote,
    FootnoteContinued,
    Endnote,
    TocEntry,
    Other,
}

impl TextRegionType {
    /// Every role, in schema order
    pub const ALL: [TextRegionType; 17] = [
        TextRegionType::Paragraph,
        TextRegionType::Heading,
        TextRegionType::Caption,
        TextRegionType::Header,
        TextRegionType::Footer,
        TextRegionType::PageNumber,
        TextRegionType::DropCapital,
        TextRegionType::Credit,
        TextRegionType::Floating,
        TextRegionType::SignatureMark,
        TextRegionType::CatchWord,
        TextRegionType::Marginalia,
        TextRegionType::Footnote,
        TextRegionType::FootnoteContinued,
        TextRegionType::Endnote,
        TextRegionType::TocEntry,
        TextRegionType::Other,
    ];

    /// The `type` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            TextRegionType::Paragraph => "paragraph",
            TextRegionType::Heading => "heading",
            TextRegionType::Caption => "caption",
            TextRegionType::Header => "header",
            TextRegionType::Footer => "footer",
            TextRegionType::PageNumber => "page-number",
            TextRegionType::DropCapital => "drop-capital",
            TextRegionType::Credit => "credit",
            TextRegionType::Floating => "floating",
            TextRegionType::SignatureMark => "signature-mark",
            TextRegionType::CatchWord => "catch-word",
            TextRegionType::Marginalia => "marginalia",
            TextRegionType::Footnote => "footnote",
            TextRegionType::FootnoteContinued => "footnote-continued",
            TextRegionType::Endnote => "endnote",
            TextRegionType::TocEntry => "TOC-entry",
            TextRegionType::Other => "other",
        }
    }
}

impl fmt::Display for TextRegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextRegionType {
    type Err = PageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TextRegionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                PageError::new(
                    PageErrorKind::InvalidRegionType,
                    format!("'{}' is not a text region type", s),
                )
                .with_element(TEXT_REGION_TAG)
                .with_attribute("type")
                .with_value(s)
            })
    }
}

impl Serialize for TextRegionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A region holding text lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRegion {
    /// Identifier
    pub id: String,
    /// Outline
    pub coords: Coordinates,
    /// Nested regions, in document order
    pub children: Vec<Region>,
    /// Layout role
    #[serde(rename = "type")]
    pub region_type: TextRegionType,
    /// Lines, in document order
    pub lines: Vec<Line>,
}

impl TextRegion {
    /// Empty text region
    pub fn new(id: impl Into<String>, region_type: TextRegionType, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            coords,
            children: Vec::new(),
            region_type,
            lines: Vec::new(),
        }
    }
}

impl PageElement for TextRegion {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let region_type: TextRegionType = require_attribute(element, "type")?.parse()?;
        let id = require_attribute(element, "id")?.to_string();
        let coords = Coordinates::from_element(require_child(element, ns, COORDS_TAG)?, ns)?;
        let children = parse_regions(element, ns)?;

        let lines = element
            .children_named(&ns.qname(TEXT_LINE_TAG))
            .map(|child| Line::from_element(child, ns))
            .collect::<Result<Vec<_>>>()?;

        Ok(TextRegion {
            id,
            coords,
            children,
            region_type,
            lines,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(TEXT_REGION_TAG))
            .with_attribute("id", self.id.as_str())
            .with_attribute("type", self.region_type.as_str());
        element.add_child(self.coords.to_element(ns));
        for child in &self.children {
            element.add_child(child.to_element(ns));
        }
        for line in &self.lines {
            element.add_child(line.to_element(ns));
        }
        element
    }
}

/// Any layout region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    Text(TextRegion),
}

impl Region {
    /// Parse `element` if it carries a region tag.
    ///
    /// Returns `Ok(None)` for any other tag; errors inside a region tag
    /// propagate.
    pub fn try_from_element(element: &Element, ns: &NamespaceMap) -> Result<Option<Region>> {
        if element.is(&ns.qname(TEXT_REGION_TAG)) {
            return TextRegion::from_element(element, ns).map(|r| Some(Region::Text(r)));
        }

        log::trace!("skipping non-region child {}", element.qname);
        Ok(None)
    }

    /// Identifier
    pub fn id(&self) -> &str {
        match self {
            Region::Text(region) => &region.id,
        }
    }

    /// Outline
    pub fn coords(&self) -> &Coordinates {
        match self {
            Region::Text(region) => &region.coords,
        }
    }

    /// Direct child regions
    pub fn children(&self) -> &[Region] {
        match self {
            Region::Text(region) => &region.children,
        }
    }

    /// The text region, if this is one
    pub fn as_text(&self) -> Option<&TextRegion> {
        match self {
            Region::Text(region) => Some(region),
        }
    }

    /// All nested regions, depth-first, parents before children
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self.children())
    }

    /// Build the element for the region
    pub fn to_element(&self, ns: &NamespaceMap) -> Element {
        match self {
            Region::Text(region) => region.to_element(ns),
        }
    }
}

impl From<TextRegion> for Region {
    fn from(region: TextRegion) -> Self {
        Region::Text(region)
    }
}

/// Parse every direct child of `element` that is a region
pub(crate) fn parse_regions(element: &Element, ns: &NamespaceMap) -> Result<Vec<Region>> {
    let mut regions = Vec::new();
    for child in &element.children {
        if let Some(region) = Region::try_from_element(child, ns)? {
            regions.push(region);
        }
    }
    Ok(regions)
}

/// Depth-first walk over a region forest
pub struct Descendants<'a> {
    stack: Vec<&'a Region>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(roots: &'a [Region]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        let region = self.stack.pop()?;
        self.stack.extend(region.children().iter().rev());
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::elements::point::Point;
    use crate::error::Error;
    use crate::limits::Limits;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> Result<Option<Region>> {
        let doc = Document::from_string(xml).unwrap();
        Region::try_from_element(doc.root().unwrap(), &NamespaceMap::new())
    }

    fn parse_text(xml: &str) -> TextRegion {
        parse(xml).unwrap().unwrap().as_text().cloned().unwrap()
    }

    /// Regions nested so that the innermost `Coords` sits at `depth`
    fn nested_regions(depth: usize) -> String {
        let regions = depth - 1;
        let mut xml = String::new();
        for i in 0..regions {
            xml.push_str(&format!(
                r#"<TextRegion id="r{}" type="paragraph"><Coords points="0,0 1,1"/>"#,
                i
            ));
        }
        xml.push_str(&"</TextRegion>".repeat(regions));
        xml
    }

    #[test]
    fn test_simple_region() {
        let region = parse_text(
            r#"<TextRegion id="r0" type="paragraph"><Coords points="0,0 1,1 2,2"/></TextRegion>"#,
        );
        assert_eq!(region.id, "r0");
        assert_eq!(region.region_type, TextRegionType::Paragraph);
        assert_eq!(
            region.coords.points,
            vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)]
        );
        assert!(region.children.is_empty());
        assert!(region.lines.is_empty());
    }

    #[test]
    fn test_all_region_types() {
        for region_type in TextRegionType::ALL {
            let xml = format!(
                r#"<TextRegion id="r" type="{}"><Coords points="0,0 1,1"/></TextRegion>"#,
                region_type
            );
            assert_eq!(parse_text(&xml).region_type, region_type);
        }
        assert_eq!("TOC-entry".parse::<TextRegionType>().unwrap(), TextRegionType::TocEntry);
    }

    #[test]
    fn test_invalid_region_type() {
        let err = parse(
            r#"<TextRegion id="r" type="not-a-real-type"><Coords points="0,0 1,1"/></TextRegion>"#,
        )
        .unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::InvalidRegionType));
        assert!(err.to_string().contains("not-a-real-type"));

        let err =
            parse(r#"<TextRegion id="r"><Coords points="0,0 1,1"/></TextRegion>"#).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingAttribute));
    }

    #[test]
    fn test_missing_id_and_coords() {
        let err = parse(
            r#"<TextRegion type="other"><Coords points="0,0 1,1"/></TextRegion>"#,
        )
        .unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingAttribute));

        let err = parse(r#"<TextRegion id="r" type="other"/>"#).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));

        let err = parse(
            r#"<TextRegion id="r" type="other"><Coords points="0,0"/></TextRegion>"#,
        )
        .unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MalformedGeometry));
    }

    #[test]
    fn test_not_a_region() {
        assert_eq!(parse(r#"<TextLine id="l"/>"#).unwrap(), None);
        assert_eq!(parse(r#"<ImageRegion id="i"/>"#).unwrap(), None);
    }

    #[test]
    fn test_nested_regions_skip_unknown_tags() {
        let region = parse_text(
            r#"<TextRegion id="r0" type="paragraph">
                <Coords points="0,0 10,10"/>
                <TextRegion id="r1" type="heading">
                    <Coords points="0,0 5,5"/>
                    <TextRegion id="r2" type="caption"><Coords points="1,1 2,2"/></TextRegion>
                </TextRegion>
                <SeparatorRegion id="s0"><Coords points="0,0 1,1"/></SeparatorRegion>
                <TextEquiv><Unicode>ignored</Unicode></TextEquiv>
                <TextRegion id="r3" type="footer"><Coords points="3,3 4,4"/></TextRegion>
                <TextLine id="l0"><Coords points="0,0 1,1"/></TextLine>
            </TextRegion>"#,
        );

        let ids: Vec<_> = region.children.iter().map(Region::id).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        assert_eq!(region.lines.len(), 1);

        let wrapped = Region::Text(region.clone());
        let all: Vec<_> = wrapped.descendants().map(Region::id).collect();
        assert_eq!(all, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_nesting_at_the_default_depth_limit() {
        let depth = Limits::default().max_depth;

        let parsed = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let region = parse(&nested_regions(depth)).unwrap().unwrap();
                let written = region.to_element(&NamespaceMap::new());
                (region.descendants().count(), written.children.len())
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(parsed, (depth - 2, 2));

        let too_deep = Document::from_string(&nested_regions(depth + 1)).unwrap_err();
        assert!(matches!(too_deep, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_error_in_nested_region_propagates() {
        let err = parse(
            r#"<TextRegion id="r0" type="paragraph">
                <Coords points="0,0 10,10"/>
                <TextRegion id="r1" type="nope"><Coords points="0,0 5,5"/></TextRegion>
            </TextRegion>"#,
        )
        .unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::InvalidRegionType));
    }

    #[test]
    fn test_to_element_order() {
        let region = parse_text(
            r#"<TextRegion id="r0" type="marginalia">
                <TextLine id="l0"><Coords points="0,0 1,1"/></TextLine>
                <TextRegion id="r1" type="other"><Coords points="0,0 5,5"/></TextRegion>
                <Coords points="0,0 10,10"/>
            </TextRegion>"#,
        );
        let element = region.to_element(&NamespaceMap::new());
        let tags: Vec<_> = element.children.iter().map(|c| c.local_name()).collect();
        assert_eq!(tags, vec!["Coords", "TextRegion", "TextLine"]);
        assert_eq!(element.get_attribute("type"), Some("marginalia"));
        assert_eq!(element.get_attribute("id"), Some("r0"));
    }
}
