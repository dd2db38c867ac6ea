//! Document provenance: creator, timestamps and comments

use crate::documents::Element;
use crate::elements::helpers::{optional_child, require_child, text_element, text_or_empty};
use crate::elements::PageElement;
use crate::error::{PageError, PageErrorKind, Result};
use crate::namespaces::NamespaceMap;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tag of the metadata block
pub const METADATA_TAG: &str = "Metadata";
const CREATOR_TAG: &str = "Creator";
const CREATED_TAG: &str = "Created";
const LAST_CHANGE_TAG: &str = "LastChange";
const COMMENTS_TAG: &str = "Comments";

/// ISO-8601 style date with optional time and offset
static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>\d{4}-\d{2}-\d{2})(?:[T ](?P<time>\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?))?(?P<offset>Z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .unwrap()
});

/// A point in time as written in the document.
///
/// The offset is kept as found (or absent), so the value is written back
/// in equivalent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Timestamp without an offset
    pub fn naive(datetime: NaiveDateTime) -> Self {
        Self { datetime, offset: None }
    }

    /// Timestamp with an offset
    pub fn with_offset(datetime: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            datetime,
            offset: Some(offset),
        }
    }

    /// Parse `2019-07-15T10:37:00`, `2019-07-15 10:37`, `2019-07-15`,
    /// each optionally followed by `Z` or `±hh[:mm]`
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let malformed = || {
            PageError::new(
                PageErrorKind::MalformedTimestamp,
                format!("'{}' is not a valid timestamp", trimmed),
            )
            .with_value(trimmed)
        };

        let caps = TIMESTAMP.captures(trimmed).ok_or_else(malformed)?;

        let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").map_err(|_| malformed())?;
        let time = match caps.name("time").map(|m| m.as_str()) {
            None => NaiveTime::MIN,
            Some(time) if time.len() == 5 => {
                NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| malformed())?
            }
            Some(time) => NaiveTime::parse_from_str(time, "%H:%M:%S%.f").map_err(|_| malformed())?,
        };
        let offset = caps
            .name("offset")
            .map(|m| parse_offset(m.as_str()).ok_or_else(malformed))
            .transpose()?;

        Ok(Timestamp {
            datetime: date.and_time(time),
            offset,
        })
    }

    /// Local date and time, as written
    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// UTC offset, when the document gave one
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw == "Z" {
        return FixedOffset::east_opt(0);
    }

    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..) {
        Some(m) if !m.is_empty() => m.parse().ok()?,
        _ => 0,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl FromStr for Timestamp {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format("%Y-%m-%dT%H:%M:%S%.f"))?;
        if let Some(offset) = self.offset {
            write!(f, "{}", offset)?;
        }
        Ok(())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Who made the document, and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub creator: String,
    pub created: Timestamp,
    pub last_change: Timestamp,
    /// `None` when the tag is absent, `Some("")` when it is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

fn read_timestamp(metadata: &Element, ns: &NamespaceMap, tag: &str) -> Result<Timestamp> {
    let element = require_child(metadata, ns, tag)?;
    Timestamp::parse(&text_or_empty(element)).map_err(|err| match err {
        crate::error::Error::Page(page) => page.with_element(tag).into(),
        other => other,
    })
}

impl PageElement for Metadata {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let creator = text_or_empty(require_child(element, ns, CREATOR_TAG)?);
        let created = read_timestamp(element, ns, CREATED_TAG)?;
        let last_change = read_timestamp(element, ns, LAST_CHANGE_TAG)?;
        let comments = optional_child(element, ns, COMMENTS_TAG).map(text_or_empty);

        Ok(Metadata {
            creator,
            created,
            last_change,
            comments,
        })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        let mut element = Element::new(ns.qname(METADATA_TAG));
        element.add_child(text_element(ns, CREATOR_TAG, &self.creator));
        element.add_child(text_element(ns, CREATED_TAG, &self.created.to_string()));
        element.add_child(text_element(ns, LAST_CHANGE_TAG, &self.last_change.to_string()));
        if let Some(ref comments) = self.comments {
            element.add_child(text_element(ns, COMMENTS_TAG, comments));
        }
        element
    }
}
