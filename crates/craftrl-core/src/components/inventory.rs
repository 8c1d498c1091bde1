//! Inventory component - what an actor is carrying.

use serde::{Deserialize, Serialize};

use crate::definitions::Definitions;

/// One stack of a single item definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub qty: i32,
    /// `ItemDef` ident
    pub item: i32,
}

/// Ordered list of stacks, at most one row per item definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    rows: Vec<InventoryRow>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` of `item`, merging into an existing row when there is one.
    /// A non-positive `qty` is refused.
    pub fn add(&mut self, item: i32, qty: i32) -> bool {
        if qty <= 0 {
            return false;
        }
        if let Some(row) = self.rows.iter_mut().find(|r| r.item == item) {
            row.qty += qty;
        } else {
            self.rows.push(InventoryRow { qty, item });
        }
        true
    }

    /// Remove `qty` of `item`. Fails without changing anything when fewer
    /// than `qty` are carried or `qty` is not positive; a row that reaches
    /// zero is erased.
    pub fn remove(&mut self, item: i32, qty: i32) -> bool {
        if qty <= 0 {
            return false;
        }
        let Some(index) = self.rows.iter().position(|r| r.item == item) else {
            return false;
        };
        let row = &mut self.rows[index];
        if row.qty > qty {
            row.qty -= qty;
            true
        } else if row.qty == qty {
            self.rows.remove(index);
            true
        } else {
            false
        }
    }

    /// How many of `item` are carried
    pub fn qty(&self, item: i32) -> i32 {
        self.rows
            .iter()
            .find(|r| r.item == item)
            .map(|r| r.qty)
            .unwrap_or(0)
    }

    /// Drop rows whose quantity fell to zero or below
    pub fn cleanup(&mut self) {
        self.rows.retain(|r| r.qty > 0);
    }

    /// Sort rows by item name. Unknown items sort first.
    pub fn sort_by_name(&mut self, defs: &Definitions) {
        self.rows.sort_by(|a, b| {
            let name_a = defs.item(a.item).map(|d| d.name.as_str()).unwrap_or("");
            let name_b = defs.item(b.item).map(|d| d.name.as_str()).unwrap_or("");
            name_a.cmp(name_b)
        });
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&InventoryRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove and return every row
    pub fn take_all(&mut self) -> Vec<InventoryRow> {
        std::mem::take(&mut self.rows)
    }
}
