//! Points and the `points` attribute micro-format
//!
//! Every geometric PAGE element stores its outline as a space separated
//! list of `x,y` integer pairs, e.g. `points="0,0 300,400 800,600"`.

use crate::documents::Element;
use crate::elements::helpers::require_attribute;
use crate::elements::PageElement;
use crate::error::{PageError, PageErrorKind, Result};
use crate::namespaces::NamespaceMap;
use serde::Serialize;
use std::fmt;

/// Tag of a region/line/word/glyph outline
pub const COORDS_TAG: &str = "Coords";

/// Tag of a text line's baseline
pub const BASELINE_TAG: &str = "Baseline";

/// Integer image position, ordered by `x` then `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Point {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
}

impl Point {
    /// Create a point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

fn malformed(points: &str, message: String) -> PageError {
    PageError::new(PageErrorKind::MalformedGeometry, message).with_value(points)
}

/// Parse a points string: at least two `x,y` tokens separated by single spaces
pub fn parse_points(points: &str) -> Result<Vec<Point>> {
    let mut parsed = Vec::new();

    for token in points.split(' ') {
        let coords: Vec<&str> = token.split(',').collect();
        if coords.len() != 2 {
            return Err(malformed(
                points,
                format!("point '{}' must contain exactly 2 coordinates", token),
            )
            .into());
        }

        let x = coords[0].parse::<i32>();
        let y = coords[1].parse::<i32>();
        match (x, y) {
            (Ok(x), Ok(y)) => parsed.push(Point { x, y }),
            _ => {
                return Err(malformed(
                    points,
                    format!("invalid coordinates in point '{}'", token),
                )
                .into())
            }
        }
    }

    if parsed.len() < 2 {
        return Err(malformed(
            points,
            format!("points string '{}' must contain at least 2 points", points),
        )
        .into());
    }

    Ok(parsed)
}

/// Canonical points string; `parse_points` inverts it
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Polygon outline of a region, line, word or glyph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Coordinates {
    /// Outline points, at least two
    pub points: Vec<Point>,
}

impl Coordinates {
    /// Wrap already validated points
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Parse a points string
    pub fn parse(points: &str) -> Result<Self> {
        parse_points(points).map(Self::new)
    }

    fn read(element: &Element) -> Result<Self> {
        let points = require_attribute(element, "points")?;
        Self::parse(points)
    }

    fn write(&self, tag: &str, ns: &NamespaceMap) -> Element {
        Element::new(ns.qname(tag)).with_attribute("points", format_points(&self.points))
    }
}

impl PageElement for Coordinates {
    fn from_element(element: &Element, _ns: &NamespaceMap) -> Result<Self> {
        Self::read(element)
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.write(COORDS_TAG, ns)
    }
}

/// Baseline of a text line; same geometry, serialized as `Baseline`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Baseline(pub Coordinates);

impl Baseline {
    /// Baseline points
    pub fn points(&self) -> &[Point] {
        &self.0.points
    }
}

impl PageElement for Baseline {
    fn from_element(element: &Element, _ns: &NamespaceMap) -> Result<Self> {
        Coordinates::read(element).map(Baseline)
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.0.write(BASELINE_TAG, ns)
    }
}
