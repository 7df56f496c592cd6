use serde::{Deserialize, Serialize};

use crate::item::SalvageItem;

/// A state transition for [`SalvageList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Append(Vec<SalvageItem>),
    Remove(usize),
    Clear,
}

/// Ordered salvage entries. Every transition returns a new list and leaves
/// the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalvageList {
    items: Vec<SalvageItem>,
}

impl SalvageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&self, action: ListAction) -> Self {
        match action {
            ListAction::Append(items) => {
                let mut next = Vec::with_capacity(self.items.len() + items.len());
                next.extend(self.items.iter().cloned());
                next.extend(items);
                Self { items: next }
            }
            ListAction::Remove(index) => Self {
                items: self
                    .items
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, item)| item.clone())
                    .collect(),
            },
            ListAction::Clear => Self::default(),
        }
    }

    pub fn with_item(&self, item: SalvageItem) -> Self {
        self.reduce(ListAction::Append(vec![item]))
    }

    pub fn with_items(&self, items: Vec<SalvageItem>) -> Self {
        self.reduce(ListAction::Append(items))
    }

    /// Drops the entry at `index`; an out-of-range index changes nothing.
    pub fn without(&self, index: usize) -> Self {
        self.reduce(ListAction::Remove(index))
    }

    pub fn cleared(&self) -> Self {
        self.reduce(ListAction::Clear)
    }

    pub fn items(&self) -> &[SalvageItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&SalvageItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl From<Vec<SalvageItem>> for SalvageList {
    fn from(items: Vec<SalvageItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<SalvageItem> for SalvageList {
    fn from_iter<I: IntoIterator<Item = SalvageItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
