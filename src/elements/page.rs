//! The page: image attributes, regions and reading order

use crate::documents::Element;
use crate::elements::helpers::{optional_child, require_attribute};
use crate::elements::line::Line;
use crate::elements::reading_order::{ReadingOrder, RegionRef, READING_ORDER_TAG};
use crate::elements::region::{parse_regions, Descendants, Region, TextRegion};
use crate::elements::PageElement;
use crate::error::{PageError, Result};
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of a page
pub const PAGE_TAG: &str = "Page";

/// The annotated page of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub image_width: u32,
    pub image_height: u32,
    pub image_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<ReadingOrder>,
    /// Top-level regions, in document order
    pub regions: Vec<Region>,
}

fn image_dimension(element: &Element, name: &str) -> Result<u32> {
    let value = require_attribute(element, name)?;
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(PageError::malformed_attribute(
            element.local_name(),
            name,
            value,
            "a positive integer",
        )
        .into()),
    }
}

impl Page {
    /// Empty page for an image
    pub fn new(image_filename: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            image_filename: image_filename.into(),
            reading_order: None,
            regions: Vec::new(),
        }
    }

    /// `(width, height)` of the page image
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Top-level text regions
    pub fn text_regions(&self) -> impl Iterator<Item = &TextRegion> + '_ {
        self.regions.iter().filter_map(Region::as_text)
    }

    /// Lines of the top-level text regions, in document order
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.text_regions().flat_map(|region| region.lines.iter())
    }

    /// Every region on the page, nested ones included, depth-first
    pub fn all_regions(&self) -> Descendants<'_> {
        Descendants::new(&self.regions)
    }

    /// Region with the given identifier, at any depth
    pub fn find_region(&self, id: &str) -> Option<&Region> {
        self.all_regions().find(|region| region.id() == id)
    }

    /// The region a reading-order reference points at
    pub fn resolve(&self, region_ref: &RegionRef) -> Option<&Region> {
        self.find_region(&region_ref.region_ref)
    }

    /// Reading-order references without a matching region
    pub fn unresolved_region_refs(&self) -> Vec<&RegionRef> {
        match self.reading_order {
            Some(ref reading_order) => reading_order
                .region_refs()
                .into_iter()
                .filter(|region_ref| self.resolve(region_ref).is_none())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl PageElement for Page {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let image_width = image_dimension(element, "imageWidth")?;
        let image_height = image_dimension(element, "imageHeight")?;
        let image_filename = require_attribute(element, "imageFilename")?.to_string();

        let reading_order = optional_child(element, ns, READING_ORDER_TAG)
            .map(|child| ReadingOrder::from_element(child, ns))
            .transpose()?;
        let regions = parse_regions(element, ns)?;

        Ok(Page {
            image_width,
            image_height,
            image_filename,
            reading_order,
            regions,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(PAGE_TAG))
            .with_attribute("imageFilename", self.image_filename.as_str())
            .with_attribute("imageWidth", self.image_width.to_string())
            .with_attribute("imageHeight", self.image_height.to_string());

        if let Some(ref reading_order) = self.reading_order {
            element.add_child(reading_order.to_element(ns));
        }
        for region in &self.regions {
            element.add_child(region.to_element(ns));
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::same_structure;
    use crate::documents::Document;
    use crate::error::PageErrorKind;
    use pretty_assertions::assert_eq;

    const SIMPLE_PAGE: &str = r#"<Page imageFilename="test.jpg" imageWidth="100" imageHeight="400">
        <TextRegion id="r0" type="paragraph">
            <Coords points="0,0 1,1 2,2" />
        </TextRegion>
    </Page>"#;

    const COMPLEX_PAGE: &str = r#"<Page imageFilename="test.tga" imageWidth="392" imageHeight="400">
        <ReadingOrder>
            <OrderedGroup id="ro0">
                <RegionRefIndexed index="0" regionRef="r1"/>
                <RegionRefIndexed index="1" regionRef="r01"/>
                <RegionRefIndexed index="2" regionRef="gone"/>
            </OrderedGroup>
        </ReadingOrder>
        <TextRegion id="r0" type="paragraph">
            <Coords points="0,0 1,1 2,2" />
            <TextRegion id="r01" type="paragraph">
                <Coords points="0,0 4,4 0,0" />
                <TextLine id="l1"><Coords points="0,0 1,1"/></TextLine>
            </TextRegion>
            <TextLine id="l0"><Coords points="0,0 1,1"/></TextLine>
        </TextRegion>
        <PrintSpace><Coords points="0,0 392,400"/></PrintSpace>
        <TextRegion id="r1" type="heading">
            <Coords points="2,2 1,1 0,1" />
            <TextLine id="l2"><Coords points="0,0 1,1"/></TextLine>
        </TextRegion>
    </Page>"#;

    fn root(xml: &str) -> Element {
        Document::from_string(xml).unwrap().root().unwrap().clone()
    }

    fn parse(xml: &str) -> Result<Page> {
        Page::from_element(&root(xml), &NamespaceMap::new())
    }

    #[test]
    fn test_simple_page() {
        let page = parse(SIMPLE_PAGE).unwrap();
        assert_eq!(page.image_size(), (100, 400));
        assert_eq!(page.image_filename, "test.jpg");
        assert_eq!(page.regions.len(), 1);
        assert_eq!(page.regions[0].id(), "r0");
        assert!(page.regions[0].as_text().is_some());
        assert!(page.reading_order.is_none());
    }

    #[test]
    fn test_complex_page() {
        let page = parse(COMPLEX_PAGE).unwrap();

        let top: Vec<_> = page.regions.iter().map(Region::id).collect();
        assert_eq!(top, vec!["r0", "r1"]);
        let all: Vec<_> = page.all_regions().map(Region::id).collect();
        assert_eq!(all, vec!["r0", "r01", "r1"]);

        let lines: Vec<_> = page.lines().map(|l| l.id.as_str()).collect();
        assert_eq!(lines, vec!["l0", "l2"]);
        assert_eq!(page.text_regions().count(), 2);

        assert_eq!(page.find_region("r01").map(Region::id), Some("r01"));
        assert!(page.find_region("nope").is_none());
        assert_eq!(
            page.resolve(&RegionRef::new("r1")).and_then(Region::as_text).map(|r| r.lines.len()),
            Some(1)
        );
        assert_eq!(page.unresolved_region_refs(), vec![&RegionRef::new("gone")]);
    }

    #[test]
    fn test_page_attribute_errors() {
        let cases = [
            (
                r#"<Page imageFilename="a" imageWidth="abc" imageHeight="1"/>"#,
                PageErrorKind::MalformedAttribute,
            ),
            (
                r#"<Page imageFilename="a" imageWidth="0" imageHeight="1"/>"#,
                PageErrorKind::MalformedAttribute,
            ),
            (
                r#"<Page imageFilename="a" imageWidth="10" imageHeight="-4"/>"#,
                PageErrorKind::MalformedAttribute,
            ),
            (r#"<Page imageFilename="a" imageHeight="1"/>"#, PageErrorKind::MissingAttribute),
            (r#"<Page imageWidth="1" imageHeight="1"/>"#, PageErrorKind::MissingAttribute),
        ];
        for (xml, kind) in cases {
            assert_eq!(parse(xml).unwrap_err().page_kind(), Some(kind), "{}", xml);
        }
    }

    #[test]
    fn test_bad_reading_order_fails_page() {
        let err = parse(
            r#"<Page imageFilename="a" imageWidth="1" imageHeight="1"><ReadingOrder/></Page>"#,
        )
        .unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));
    }

    #[test]
    fn test_page_roundtrip() {
        let ns = NamespaceMap::new();
        let original = root(COMPLEX_PAGE);
        let page = Page::from_element(&original, &ns).unwrap();
        let written = page.to_element(&ns);

        // PrintSpace is not modelled
        let mut expected = original.clone();
        expected.children.retain(|c| c.local_name() != "PrintSpace");
        assert!(same_structure(&written, &expected));

        assert_eq!(Page::from_element(&written, &ns).unwrap(), page);
    }
}
