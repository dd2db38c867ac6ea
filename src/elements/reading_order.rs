//! Reading order: a tree of ordered and unordered groups over region references
//!
//! An ordered group keys every child by a mandatory `index`, so its
//! children appear under the `*Indexed` tags (`OrderedGroupIndexed`,
//! `UnorderedGroupIndexed`, `RegionRefIndexed`). An unordered group uses
//! the plain tags and keeps its children as a list.
//!
//! References hold region identifiers only; see
//! [`Page::resolve`](crate::elements::Page::resolve) for the lookup.

use crate::documents::Element;
use crate::elements::helpers::{require_attribute, require_index};
use crate::elements::indexed::{Indexed, IndexedCollection};
use crate::elements::PageElement;
use crate::error::{PageError, PageErrorKind, Result};
use crate::namespaces::NamespaceMap;
use serde::Serialize;

/// Tag of the reading order wrapper
pub const READING_ORDER_TAG: &str = "ReadingOrder";

const ORDERED_GROUP_TAG: &str = "OrderedGroup";
const ORDERED_GROUP_INDEXED_TAG: &str = "OrderedGroupIndexed";
const UNORDERED_GROUP_TAG: &str = "UnorderedGroup";
const UNORDERED_GROUP_INDEXED_TAG: &str = "UnorderedGroupIndexed";
const REGION_REF_TAG: &str = "RegionRef";
const REGION_REF_INDEXED_TAG: &str = "RegionRefIndexed";

/// Child tags as they appear under an ordered (indexed) or unordered group
fn child_tags(indexed: bool) -> [(&'static str, ChildKind); 3] {
    if indexed {
        [
            (ORDERED_GROUP_INDEXED_TAG, ChildKind::Ordered),
            (UNORDERED_GROUP_INDEXED_TAG, ChildKind::Unordered),
            (REGION_REF_INDEXED_TAG, ChildKind::RegionRef),
        ]
    } else {
        [
            (ORDERED_GROUP_TAG, ChildKind::Ordered),
            (UNORDERED_GROUP_TAG, ChildKind::Unordered),
            (REGION_REF_TAG, ChildKind::RegionRef),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Ordered,
    Unordered,
    RegionRef,
}

fn child_kind(element: &Element, ns: &NamespaceMap, indexed: bool) -> Option<ChildKind> {
    child_tags(indexed)
        .iter()
        .find(|(tag, _)| element.is(&ns.qname(tag)))
        .map(|(_, kind)| *kind)
}

fn read_child(element: &Element, ns: &NamespaceMap, kind: ChildKind) -> Result<GroupChild> {
    Ok(match kind {
        ChildKind::Ordered => {
            GroupChild::Group(Group::Ordered(OrderedGroup::from_element(element, ns)?))
        }
        ChildKind::Unordered => {
            GroupChild::Group(Group::Unordered(UnorderedGroup::from_element(element, ns)?))
        }
        ChildKind::RegionRef => GroupChild::RegionRef(RegionRef::from_element(element, ns)?),
    })
}

/// `id` and optional `caption` shared by both group kinds
fn read_header(element: &Element) -> Result<(String, Option<String>)> {
    let id = require_attribute(element, "id")?.to_string();
    let caption = element.get_attribute("caption").map(str::to_string);
    Ok((id, caption))
}

fn group_element(
    ns: &NamespaceMap,
    tag: &str,
    id: &str,
    caption: Option<&str>,
    index: Option<usize>,
) -> Element {
    let mut element = Element::new(ns.qname(tag)).with_attribute("id", id);
    if let Some(index) = index {
        element.set_attribute("index", index.to_string());
    }
    if let Some(caption) = caption {
        element.set_attribute("caption", caption);
    }
    element
}

/// Reference to a region by identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegionRef {
    /// Identifier of the referenced region
    pub region_ref: String,
}

impl RegionRef {
    /// Reference to region `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self { region_ref: id.into() }
    }

    fn write(&self, ns: &NamespaceMap, index: Option<usize>) -> Element {
        let tag = if index.is_some() { REGION_REF_INDEXED_TAG } else { REGION_REF_TAG };
        let mut element =
            Element::new(ns.qname(tag)).with_attribute("regionRef", self.region_ref.as_str());
        if let Some(index) = index {
            element.set_attribute("index", index.to_string());
        }
        element
    }
}

impl PageElement for RegionRef {
    fn from_element(element: &Element, _ns: &NamespaceMap) -> Result<Self> {
        Ok(RegionRef::new(require_attribute(element, "regionRef")?))
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.write(ns, None)
    }
}

/// Member of a group: a nested group or a region reference
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupChild {
    Group(Group),
    RegionRef(RegionRef),
}

impl GroupChild {
    /// The nested group, if this is one
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            GroupChild::Group(group) => Some(group),
            GroupChild::RegionRef(_) => None,
        }
    }

    /// The region reference, if this is one
    pub fn as_region_ref(&self) -> Option<&RegionRef> {
        match self {
            GroupChild::Group(_) => None,
            GroupChild::RegionRef(region_ref) => Some(region_ref),
        }
    }

    fn write(&self, ns: &NamespaceMap, index: Option<usize>) -> Element {
        match self {
            GroupChild::Group(group) => group.write(ns, index),
            GroupChild::RegionRef(region_ref) => region_ref.write(ns, index),
        }
    }
}

impl From<Group> for GroupChild {
    fn from(group: Group) -> Self {
        GroupChild::Group(group)
    }
}

impl From<RegionRef> for GroupChild {
    fn from(region_ref: RegionRef) -> Self {
        GroupChild::RegionRef(region_ref)
    }
}

/// Group whose children are keyed by index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedGroup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub children: IndexedCollection<Indexed<GroupChild>>,
}

impl OrderedGroup {
    /// Child with the given index
    pub fn get(&self, index: usize) -> Option<&GroupChild> {
        self.children.get(index).map(|child| &child.node)
    }

    /// Children in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = &GroupChild> + '_ {
        self.children.iter_by_index().map(|child| &child.node)
    }

    fn write(&self, ns: &NamespaceMap, index: Option<usize>) -> Element {
        let tag = if index.is_some() { ORDERED_GROUP_INDEXED_TAG } else { ORDERED_GROUP_TAG };
        let mut element = group_element(ns, tag, &self.id, self.caption.as_deref(), index);
        for child in self.children.iter_by_index() {
            element.add_child(child.node.write(ns, Some(child.index)));
        }
        element
    }
}

impl PageElement for OrderedGroup {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let (id, caption) = read_header(element)?;

        let mut children = Vec::new();
        for child in &element.children {
            match child_kind(child, ns, true) {
                Some(kind) => {
                    let index = require_index(child)?;
                    children.push(Indexed::new(index, read_child(child, ns, kind)?));
                }
                None => log::trace!("skipping {} in ordered group {}", child.qname, id),
            }
        }

        let children = IndexedCollection::from_items(children, ORDERED_GROUP_TAG)?;
        Ok(OrderedGroup { id, caption, children })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.write(ns, None)
    }
}

/// Group whose children carry no particular order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnorderedGroup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub children: Vec<GroupChild>,
}

impl UnorderedGroup {
    fn write(&self, ns: &NamespaceMap, index: Option<usize>) -> Element {
        let tag = if index.is_some() { UNORDERED_GROUP_INDEXED_TAG } else { UNORDERED_GROUP_TAG };
        let mut element = group_element(ns, tag, &self.id, self.caption.as_deref(), index);
        for child in &self.children {
            element.add_child(child.write(ns, None));
        }
        element
    }
}

impl PageElement for UnorderedGroup {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let (id, caption) = read_header(element)?;

        let mut children = Vec::new();
        for child in &element.children {
            match child_kind(child, ns, false) {
                Some(kind) => children.push(read_child(child, ns, kind)?),
                None => log::trace!("skipping {} in unordered group {}", child.qname, id),
            }
        }

        Ok(UnorderedGroup { id, caption, children })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.write(ns, None)
    }
}

/// An ordered or unordered group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Group {
    Ordered(OrderedGroup),
    Unordered(UnorderedGroup),
}

impl Group {
    /// Identifier
    pub fn id(&self) -> &str {
        match self {
            Group::Ordered(group) => &group.id,
            Group::Unordered(group) => &group.id,
        }
    }

    /// Caption, if any
    pub fn caption(&self) -> Option<&str> {
        match self {
            Group::Ordered(group) => group.caption.as_deref(),
            Group::Unordered(group) => group.caption.as_deref(),
        }
    }

    /// Whether the children are keyed by index
    pub fn is_ordered(&self) -> bool {
        matches!(self, Group::Ordered(_))
    }

    /// Direct children; index order for ordered groups, document order otherwise
    pub fn children(&self) -> Vec<&GroupChild> {
        match self {
            Group::Ordered(group) => group.iter().collect(),
            Group::Unordered(group) => group.children.iter().collect(),
        }
    }

    /// Direct region references
    pub fn region_refs(&self) -> Vec<&RegionRef> {
        self.children()
            .into_iter()
            .filter_map(GroupChild::as_region_ref)
            .collect()
    }

    /// Direct subgroups
    pub fn subgroups(&self) -> Vec<&Group> {
        self.children()
            .into_iter()
            .filter_map(GroupChild::as_group)
            .collect()
    }

    /// Every region reference below this group, depth-first
    pub fn all_region_refs(&self) -> Vec<&RegionRef> {
        let mut refs = Vec::new();
        let mut stack: Vec<&GroupChild> = self.children().into_iter().rev().collect();

        while let Some(child) = stack.pop() {
            match child {
                GroupChild::RegionRef(region_ref) => refs.push(region_ref),
                GroupChild::Group(group) => stack.extend(group.children().into_iter().rev()),
            }
        }
        refs
    }

    fn write(&self, ns: &NamespaceMap, index: Option<usize>) -> Element {
        match self {
            Group::Ordered(group) => group.write(ns, index),
            Group::Unordered(group) => group.write(ns, index),
        }
    }
}

impl PageElement for Group {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        match child_kind(element, ns, false).or_else(|| child_kind(element, ns, true)) {
            Some(ChildKind::Ordered) => OrderedGroup::from_element(element, ns).map(Group::Ordered),
            Some(ChildKind::Unordered) => {
                UnorderedGroup::from_element(element, ns).map(Group::Unordered)
            }
            _ => Err(PageError::new(
                PageErrorKind::MissingElement,
                format!("{} is not a reading order group", element.qname),
            )
            .with_element(element.local_name())
            .into()),
        }
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        self.write(ns, None)
    }
}

/// The page's reading order: a single root group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingOrder {
    pub root: Group,
}

impl ReadingOrder {
    /// Every region reference in the tree, depth-first
    pub fn region_refs(&self) -> Vec<&RegionRef> {
        self.root.all_region_refs()
    }
}

impl PageElement for ReadingOrder {
    fn from_element(element: &Element, ns: &NamespaceMap) -> Result<Self> {
        let ordered = element.find_child(&ns.qname(ORDERED_GROUP_TAG));
        let unordered = element.find_child(&ns.qname(UNORDERED_GROUP_TAG));

        let root = match (ordered, unordered) {
            (Some(ordered), unordered) => {
                if unordered.is_some() {
                    log::warn!(
                        "{} has both {} and {}; using {}",
                        READING_ORDER_TAG,
                        ORDERED_GROUP_TAG,
                        UNORDERED_GROUP_TAG,
                        ORDERED_GROUP_TAG
                    );
                }
                Group::Ordered(OrderedGroup::from_element(ordered, ns)?)
            }
            (None, Some(unordered)) => {
                Group::Unordered(UnorderedGroup::from_element(unordered, ns)?)
            }
            (None, None) => {
                return Err(PageError::new(
                    PageErrorKind::MissingElement,
                    format!(
                        "{} needs an {} or an {} child",
                        READING_ORDER_TAG, ORDERED_GROUP_TAG, UNORDERED_GROUP_TAG
                    ),
                )
                .with_element(READING_ORDER_TAG)
                .into())
            }
        };

        Ok(ReadingOrder { root })
    }

    fn to_element(&self, ns: &NamespaceMap) -> Element {
        Element::new(ns.qname(READING_ORDER_TAG)).with_child(self.root.to_element(ns))
    }
}
