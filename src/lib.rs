//! # pagexml
//!
//! A strongly-typed model of PAGE-XML documents: page regions, text lines,
//! words and glyphs with their recognized text, and the reading order over
//! the regions.
//!
//! ## Features
//!
//! - Parsing with precise structural errors ([`error::PageErrorKind`])
//! - Serialization back to an equivalent XML tree
//! - Explicit namespace configuration ([`NamespaceMap`])
//! - Protection against pathological inputs ([`Limits`])
//! - JSON export through `serde`
//!
//! ## Example
//!
//! ```rust
//! use pagexml::{NamespaceMap, PcGts};
//!
//! let xml = r#"<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15">
//!   <Metadata>
//!     <Creator>scanner</Creator>
//!     <Created>2021-10-21T18:37:36</Created>
//!     <LastChange>2021-10-21T18:37:36</LastChange>
//!   </Metadata>
//!   <Page imageFilename="scan.png" imageWidth="100" imageHeight="400">
//!     <TextRegion id="r0" type="paragraph">
//!       <Coords points="0,0 100,0 100,400 0,400"/>
//!     </TextRegion>
//!   </Page>
//! </PcGts>"#;
//!
//! let document: PcGts = xml.parse()?;
//! assert_eq!(document.page.image_size(), (100, 400));
//! assert_eq!(document.page.regions[0].id(), "r0");
//!
//! let text = document.to_xml_string(&NamespaceMap::pagecontent())?;
//! assert!(text.contains("TextRegion"));
//! # Ok::<(), pagexml::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod namespaces;

// Generic tree and file handling
pub mod documents;
pub mod loaders;

// The PAGE model
#[allow(missing_docs)]
pub mod elements;

// Round-trip checks
pub mod comparison;

// Re-exports for convenience
pub use documents::{Document, Element};
pub use elements::{
    parse_document, probe_document_kind, serialize_document, PageElement, PcGts,
};
pub use error::{Error, PageError, PageErrorKind, Result};
pub use limits::Limits;
pub use loaders::Loader;
pub use namespaces::{NamespaceMap, QName, PAGE_2019_NAMESPACE};

/// Version of the pagexml library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
