//! Item list mutated by the `add_item` tool.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// `asctime`-style layout, e.g. `Sun Jun  9 12:00:00 2024`.
pub const ITEM_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// An item added at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_name: String,
    pub time: String,
}

impl Item {
    /// Create an item stamped with the current local time.
    pub fn now(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            time: Local::now().format(ITEM_TIME_FORMAT).to_string(),
        }
    }
}

/// Shared, ordered item list. Clones refer to the same list.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Arc<Mutex<Vec<Item>>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: Item) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }

    /// Snapshot of the items, oldest first.
    pub fn items(&self) -> Vec<Item> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
