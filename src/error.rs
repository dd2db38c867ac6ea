//! Error types for pagexml
//!
//! This module defines all error types used throughout the library.
//! Structural problems in a PAGE document are reported as [`PageError`]s
//! tagged with a [`PageErrorKind`]; everything else (tokenizer failures,
//! limits, I/O) has its own [`Error`] variant.

use std::fmt;
use thiserror::Error;

/// Result type alias using pagexml Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pagexml operations
#[derive(Error, Debug)]
pub enum Error {
    /// The document violates the PAGE-XML structure
    #[error("PAGE error: {0}")]
    Page(#[from] PageError),

    /// XML tokenizer/writer error
    #[error("XML error: {0}")]
    Xml(String),

    /// Namespace error (unknown prefix)
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The taxonomy kind, if this is a structural PAGE error
    pub fn page_kind(&self) -> Option<PageErrorKind> {
        match self {
            Error::Page(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// The kinds of structural failure a PAGE document can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageErrorKind {
    /// Required attribute absent
    MissingAttribute,
    /// Attribute present but not of its expected type
    MalformedAttribute,
    /// Required child element absent
    MissingElement,
    /// Points string violates the point-list grammar
    MalformedGeometry,
    /// Region `type` not in the closed set of layout roles
    InvalidRegionType,
    /// Mixed indexed/unindexed siblings or duplicate indices
    InconsistentIndexing,
    /// Created/LastChange is not a timestamp
    MalformedTimestamp,
}

impl fmt::Display for PageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageErrorKind::MissingAttribute => "missing attribute",
            PageErrorKind::MalformedAttribute => "malformed attribute",
            PageErrorKind::MissingElement => "missing element",
            PageErrorKind::MalformedGeometry => "malformed geometry",
            PageErrorKind::InvalidRegionType => "invalid region type",
            PageErrorKind::InconsistentIndexing => "inconsistent indexing",
            PageErrorKind::MalformedTimestamp => "malformed timestamp",
        };
        f.write_str(name)
    }
}

/// PAGE structural error with context
#[derive(Debug, Clone, PartialEq)]
pub struct PageError {
    /// Failure kind
    pub kind: PageErrorKind,
    /// Error message
    pub message: String,
    /// Tag of the element being parsed
    pub element: Option<String>,
    /// Attribute involved, if any
    pub attribute: Option<String>,
    /// Offending raw value
    pub value: Option<String>,
}

impl PageError {
    /// Create a new error of the given kind
    pub fn new(kind: PageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            element: None,
            attribute: None,
            value: None,
        }
    }

    /// Required attribute `attribute` is absent from `element`
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::new(
            PageErrorKind::MissingAttribute,
            format!("{} is missing the '{}' attribute", element, attribute),
        )
        .with_element(element)
        .with_attribute(attribute)
    }

    /// Attribute `attribute` of `element` does not parse as `expected`
    pub fn malformed_attribute(
        element: &str,
        attribute: &str,
        value: &str,
        expected: &str,
    ) -> Self {
        Self::new(
            PageErrorKind::MalformedAttribute,
            format!(
                "{} has an invalid '{}' attribute, expected {}",
                element, attribute, expected
            ),
        )
        .with_element(element)
        .with_attribute(attribute)
        .with_value(value)
    }

    /// Required child `child` is absent from `element`
    pub fn missing_element(element: &str, child: &str) -> Self {
        Self::new(
            PageErrorKind::MissingElement,
            format!("{} is missing a {} element", element, child),
        )
        .with_element(element)
    }

    /// Set the element tag
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Set the attribute name
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Set the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(ref element) = self.element {
            write!(f, "\n\nElement: {}", element)?;
        }

        if let Some(ref attribute) = self.attribute {
            write!(f, "\n\nAttribute: {}", attribute)?;
        }

        if let Some(ref value) = self.value {
            write!(f, "\n\nValue: {:?}", value)?;
        }

        Ok(())
    }
}

impl std::error::Error for PageError {}
