//! Line-item sequence.

use super::{ItemField, LineItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered, persistent sequence of invoice rows.
///
/// Order is display order and summation order. Edits return a new
/// sequence; the receiver and any snapshot sharing it stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItems {
    items: Arc<[LineItem]>,
}

impl LineItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence with `item` as the last row.
    pub fn append(&self, item: LineItem) -> Self {
        let items: Arc<[LineItem]> = self.items.iter().cloned().chain(Some(item)).collect();
        Self { items }
    }

    /// A sequence without the row at `index`, or `None` if there is no such row.
    pub fn remove(&self, index: usize) -> Option<Self> {
        if index >= self.items.len() {
            return None;
        }
        let items: Arc<[LineItem]> = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect();
        Some(Self { items })
    }

    /// A sequence with one field of row `index` edited.
    pub fn with_field(&self, index: usize, field: ItemField, value: &str) -> Option<Self> {
        let mut edited = self.items.get(index)?.clone();
        edited.set_field(field, value);
        let items: Arc<[LineItem]> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| if i == index { edited.clone() } else { item.clone() })
            .collect();
        Some(Self { items })
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LineItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<LineItem>> for LineItems {
    fn from(items: Vec<LineItem>) -> Self {
        Self { items: items.into() }
    }
}

impl From<LineItems> for Vec<LineItem> {
    fn from(items: LineItems) -> Self {
        items.items.to_vec()
    }
}

impl FromIterator<LineItem> for LineItems {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
