//! Indexed sibling collections
//!
//! Several PAGE elements may carry either a single unindexed child or a set
//! of children keyed by distinct `index` attributes, never a mix:
//!
//! - text alternatives of glyphs, words and lines ([`TextHolder`]),
//! - the children of an ordered reading-order group
//!   ([`IndexedCollection`] of [`Indexed`] nodes).
//!
//! Both sites build on [`IndexedCollection::from_items`].

use crate::error::{PageError, PageErrorKind, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Anything that may carry a sibling index
pub trait HasIndex {
    /// The index, if the item has one
    fn index(&self) -> Option<usize>;
}

/// A node appearing as an indexed child
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indexed<T> {
    /// Position key among its siblings
    pub index: usize,
    /// The wrapped node
    pub node: T,
}

impl<T> Indexed<T> {
    /// Wrap `node` with `index`
    pub fn new(index: usize, node: T) -> Self {
        Self { index, node }
    }
}

impl<T> HasIndex for Indexed<T> {
    fn index(&self) -> Option<usize> {
        Some(self.index)
    }
}

fn inconsistent(owner: &str, message: String) -> PageError {
    PageError::new(PageErrorKind::InconsistentIndexing, message).with_element(owner)
}

/// Items keyed by distinct indices; iteration follows insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexedCollection<T> {
    items: IndexMap<usize, T>,
}

impl<T> Default for IndexedCollection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: HasIndex> IndexedCollection<T> {
    /// Build from items that must all carry distinct indices.
    ///
    /// `owner` names the element the items belong to, for error context.
    pub fn from_items(items: Vec<T>, owner: &str) -> Result<Self> {
        let mut map = IndexMap::with_capacity(items.len());

        for (position, item) in items.into_iter().enumerate() {
            let index = item.index().ok_or_else(|| {
                inconsistent(
                    owner,
                    format!(
                        "{} mixes indexed and unindexed children (child {} has no index)",
                        owner, position
                    ),
                )
            })?;

            if map.insert(index, item).is_some() {
                return Err(inconsistent(
                    owner,
                    format!("{} has more than one child with index {}", owner, index),
                )
                .into());
            }
        }

        Ok(Self { items: map })
    }
}

impl<T> IndexedCollection<T> {
    /// Item with the given index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    /// Whether an item has the given index
    pub fn contains(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in the order they were supplied
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.values()
    }

    /// The indices in use, in the order they were supplied
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.keys().copied()
    }

    /// Items in ascending index order
    pub fn iter_by_index(&self) -> impl Iterator<Item = &T> + '_ {
        let mut entries: Vec<(&usize, &T)> = self.items.iter().collect();
        entries.sort_by_key(|(index, _)| **index);
        entries.into_iter().map(|(_, item)| item)
    }
}

/// Text alternatives of a glyph, word or line: either at most one
/// unindexed value, or a set of distinctly indexed ones
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHolder<T> {
    /// Zero or one alternative without an index
    Single(Option<T>),
    /// Alternatives keyed by index
    Indexed(IndexedCollection<T>),
}

impl<T> Default for TextHolder<T> {
    fn default() -> Self {
        TextHolder::Single(None)
    }
}

impl<T: HasIndex> TextHolder<T> {
    /// Pick the representation for the alternatives of `owner`
    pub fn from_items(mut items: Vec<T>, owner: &str) -> Result<Self> {
        match items.len() {
            0 => Ok(TextHolder::Single(None)),
            1 if items[0].index().is_none() => Ok(TextHolder::Single(items.pop())),
            _ => IndexedCollection::from_items(items, owner).map(TextHolder::Indexed),
        }
    }
}

impl<T> TextHolder<T> {
    /// The current text: the single value, or the alternative at index 0
    pub fn current(&self) -> Option<&T> {
        match self {
            TextHolder::Single(item) => item.as_ref(),
            TextHolder::Indexed(items) => items.get(0),
        }
    }

    /// Alternative with the given index; always `None` when unindexed
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            TextHolder::Single(_) => None,
            TextHolder::Indexed(items) => items.get(index),
        }
    }

    /// Whether the alternatives are keyed by index
    pub fn is_indexed(&self) -> bool {
        matches!(self, TextHolder::Indexed(_))
    }

    /// All alternatives, in the order they were supplied
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (single, indexed) = match self {
            TextHolder::Single(item) => (item.as_ref(), None),
            TextHolder::Indexed(items) => (None, Some(items.iter())),
        };
        single.into_iter().chain(indexed.into_iter().flatten())
    }

    /// Number of alternatives
    pub fn len(&self) -> usize {
        match self {
            TextHolder::Single(item) => usize::from(item.is_some()),
            TextHolder::Indexed(items) => items.len(),
        }
    }

    /// True when there is no alternative at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
