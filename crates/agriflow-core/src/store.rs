//! Committed shape sequence.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered, persistent sequence of committed shapes.
///
/// Insertion order is paint order: later shapes draw over earlier ones.
/// Every operation returns a new store and leaves the receiver untouched,
/// so older stores stay valid as history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Shape>", into = "Vec<Shape>")]
pub struct ShapeStore {
    shapes: Arc<[Shape]>,
}

impl ShapeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `shape` appended as the last element.
    pub fn append(&self, shape: Shape) -> Self {
        let shapes: Arc<[Shape]> = self.shapes.iter().cloned().chain(Some(shape)).collect();
        Self { shapes }
    }

    /// A store without its last element. Undo on an empty store is a no-op.
    pub fn undo(&self) -> Self {
        match self.shapes.split_last() {
            Some((_, rest)) => Self {
                shapes: rest.into(),
            },
            None => self.clone(),
        }
    }

    /// An empty store.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Shapes in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The most recently committed shape.
    pub fn last(&self) -> Option<&Shape> {
        self.shapes.last()
    }
}

impl From<Vec<Shape>> for ShapeStore {
    fn from(shapes: Vec<Shape>) -> Self {
        Self {
            shapes: shapes.into(),
        }
    }
}

impl From<ShapeStore> for Vec<Shape> {
    fn from(store: ShapeStore) -> Self {
        store.shapes.to_vec()
    }
}

impl<'a> IntoIterator for &'a ShapeStore {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
