//! The document root and the document-level entry points

use crate::documents::{Document, Element};
use crate::elements::helpers::require_child;
use crate::elements::metadata::{Metadata, METADATA_TAG};
use crate::elements::page::{Page, PAGE_TAG};
use crate::elements::PageElement;
use crate::error::{Error, PageError, PageErrorKind, Result};
use crate::loaders::Loader;
use crate::namespaces::NamespaceMap;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// Tag of the document root
pub const PCGTS_TAG: &str = "PcGts";

/// A PAGE document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PcGts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_gts_id: Option<String>,
    pub metadata: Metadata,
    pub page: Page,
}

impl PcGts {
    /// Read a file; `Ok(None)` when it is not a PAGE document
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        Loader::new().load_pcgts(path.as_ref())
    }

    /// Serialize to indented PAGE-XML text
    pub fn to_xml_string(&self, ns: &NamespaceMap) -> Result<String> {
        Document::with_root(serialize_document(self, ns)).to_xml_string()
    }
}

/// Parses PAGE-XML text in the 2019-07-15 namespace
impl FromStr for PcGts {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        let document = Document::from_string(xml)?;
        let root = document
            .root()
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;
        parse_document(root, &NamespaceMap::pagecontent())
    }
}

impl PageElement for PcGts {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let pc_gts_id = element.get_attribute("pcGtsId").map(str::to_string);
        let metadata = Metadata::from_element(require_child(element, ns, METADATA_TAG)?, ns)?;
        let page = Page::from_element(require_child(element, ns, PAGE_TAG)?, ns)?;

        Ok(PcGts {
            pc_gts_id,
            metadata,
            page,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(PCGTS_TAG));
        if let Some(ref id) = self.pc_gts_id {
            element.set_attribute("pcGtsId", id.as_str());
        }
        element.add_child(self.metadata.to_element(ns));
        element.add_child(self.page.to_element(ns));
        element
    }
}

/// Parse a whole document whose root must be `PcGts`
pub fn parse_document(root: &Element, ns: &NamespaceMap) -> Result<PcGts> {
    if !root.is(&ns.qname(PCGTS_TAG)) {
        return Err(PageError::new(
            PageErrorKind::MissingElement,
            format!("expected a {} root, found {}", ns.qname(PCGTS_TAG), root.qname),
        )
        .with_element(root.local_name())
        .into());
    }

    let pcgts = PcGts::from_element(root, ns)?;
    log::debug!(
        "parsed PAGE document {} with {} top-level regions",
        pcgts.pc_gts_id.as_deref().unwrap_or("<unnamed>"),
        pcgts.page.regions.len()
    );
    Ok(pcgts)
}

/// Parse `root` if it is a `PcGts` element in any namespace.
///
/// Returns `Ok(None)` for any other root; the root's own namespace becomes
/// the default for locating the rest of the document.
pub fn probe_document_kind(root: &Element) -> Result<Option<PcGts>> {
    if root.local_name() != PCGTS_TAG {
        log::debug!("{} is not a PAGE document root", root.qname);
        return Ok(None);
    }

    let ns = match root.namespace() {
        Some(uri) => root.namespaces.merged(&NamespaceMap::with_default(uri)),
        None => root.namespaces.without_default(),
    };
    parse_document(root, &ns).map(Some)
}

/// Build the generic tree for a document, declaring `ns` on the root
pub fn serialize_document(pcgts: &PcGts, ns: &NamespaceMap) -> Element {
    let mut root = pcgts.to_element(ns);
    root.namespaces = ns.clone();
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::same_structure;
    use crate::namespaces::PAGE_2019_NAMESPACE;
    use pretty_assertions::assert_eq;

    const METADATA: &str = "<Metadata>
            <Creator>Test Creator</Creator>
            <Created>2021-10-21T18:37:36</Created>
            <LastChange>1970-01-01T00:00:00</LastChange>
        </Metadata>";

    fn document(body: &str) -> String {
        format!(
            r#"<PcGts xmlns="{}" pcGtsId="doc-1">{}{}</PcGts>"#,
            PAGE_2019_NAMESPACE, METADATA, body
        )
    }

    fn root(xml: &str) -> Element {
        Document::from_string(xml).unwrap().root().unwrap().clone()
    }

    #[test]
    fn test_parse_namespaced_document() {
        let pcgts = PcGts::from_str(&document(
            r#"<Page imageFilename="test.jpg" imageWidth="100" imageHeight="400">
                <TextRegion id="r0" type="paragraph"><Coords points="0,0 1,1 2,2"/></TextRegion>
            </Page>"#,
        ))
        .unwrap();

        assert_eq!(pcgts.pc_gts_id.as_deref(), Some("doc-1"));
        assert_eq!(pcgts.metadata.creator, "Test Creator");
        assert_eq!(pcgts.page.image_size(), (100, 400));
        assert_eq!(pcgts.page.regions[0].id(), "r0");
    }

    #[test]
    fn test_missing_children() {
        let ns = NamespaceMap::pagecontent();

        let no_page = root(&document(""));
        let err = parse_document(&no_page, &ns).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));

        let no_metadata = root(&format!(
            r#"<PcGts xmlns="{}"><Page imageFilename="a" imageWidth="1" imageHeight="1"/></PcGts>"#,
            PAGE_2019_NAMESPACE
        ));
        let err = parse_document(&no_metadata, &ns).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));
    }

    #[test]
    fn test_wrong_namespace_is_missing_root() {
        // Un-namespaced PcGts read with the 2019 map
        let xml = format!("<PcGts>{}</PcGts>", METADATA);
        let err = parse_document(&root(&xml), &NamespaceMap::pagecontent()).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MissingElement));
    }

    #[test]
    fn test_probe() {
        assert_eq!(probe_document_kind(&root("<alto><Layout/></alto>")).unwrap(), None);

        let page = r#"<Page imageFilename="a.png" imageWidth="5" imageHeight="6"/>"#;
        let probed = probe_document_kind(&root(&document(page))).unwrap().unwrap();
        assert_eq!(probed.page.image_filename, "a.png");

        // other namespace versions are accepted as their own default
        let older = format!(
            r#"<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15">{}{}</PcGts>"#,
            METADATA, page
        );
        assert!(probe_document_kind(&root(&older)).unwrap().is_some());

        let plain = format!("<PcGts>{}{}</PcGts>", METADATA, page);
        assert!(probe_document_kind(&root(&plain)).unwrap().is_some());

        let broken = document(r#"<Page imageFilename="a.png" imageWidth="x" imageHeight="6"/>"#);
        let err = probe_document_kind(&root(&broken)).unwrap_err();
        assert_eq!(err.page_kind(), Some(PageErrorKind::MalformedAttribute));
    }

    #[test]
    fn test_serialize_document() {
        let ns = NamespaceMap::pagecontent();
        let original = root(&document(
            r#"<Page imageFilename="test.jpg" imageWidth="100" imageHeight="400">
                <TextRegion id="r0" type="paragraph"><Coords points="0,0 1,1 2,2"/></TextRegion>
            </Page>"#,
        ));
        let pcgts = parse_document(&original, &ns).unwrap();
        let written = serialize_document(&pcgts, &ns);

        assert_eq!(written.namespace(), Some(PAGE_2019_NAMESPACE));
        assert_eq!(written.namespaces.get_default_namespace(), Some(PAGE_2019_NAMESPACE));
        assert!(same_structure(&written, &original));

        let text = pcgts.to_xml_string(&ns).unwrap();
        assert!(text.contains(&format!(r#"xmlns="{}""#, PAGE_2019_NAMESPACE)));
        assert_eq!(PcGts::from_str(&text).unwrap(), pcgts);
    }
}
