//! Index-based storage for catalog records

use rustc_hash::FxHashMap;
use std::fmt;

/// Index of a set inside its owning [`CardStore`](crate::loader::CardStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetId(u32);

/// Index of a card inside its owning [`CardStore`](crate::loader::CardStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u32);

impl CardId {
    /// The "no card" sentinel. Never stored in the name index.
    pub const NO_CARD: CardId = CardId(u32::MAX);

    pub fn is_no_card(&self) -> bool {
        *self == Self::NO_CARD
    }
}

/// Conversion between a dense index and a typed id
pub trait RecordId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

impl RecordId for SetId {
    fn from_index(index: usize) -> Self {
        SetId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl RecordId for CardId {
    fn from_index(index: usize) -> Self {
        CardId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set#{}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_card() {
            write!(f, "card#none")
        } else {
            write!(f, "card#{}", self.0)
        }
    }
}

/// Records that are keyed by a unique name
pub trait Named {
    fn key(&self) -> &str;
}

/// Dense record arena with a name index
///
/// Records are kept in insertion order, which is also the iteration order.
/// Ids are stable until [`NamedStore::clear`]; records are never removed one by one.
#[derive(Debug, Clone)]
pub struct NamedStore<I, T> {
    records: Vec<T>,
    by_name: FxHashMap<String, I>,
}

impl<I: RecordId, T: Named> NamedStore<I, T> {
    pub fn new() -> Self {
        NamedStore {
            records: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Insert a record and index it under its own key
    pub fn insert(&mut self, record: T) -> I {
        let id = I::from_index(self.records.len());
        self.by_name.insert(record.key().to_string(), id);
        self.records.push(record);
        id
    }

    pub fn find(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.records.get(id.index())
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.records.get_mut(id.index())
    }

    /// Iterate over records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (I::from_index(i), r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.records.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.records.len()).map(I::from_index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_name.clear();
    }
}

impl<I: RecordId, T: Named> Default for NamedStore<I, T> {
    fn default() -> Self {
        Self::new()
    }
}
