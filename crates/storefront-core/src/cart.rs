//! Cart store - ordered (item, quantity) lines
//!
//! Lines are unique by item id and kept in first-add order. A line's
//! quantity is always at least 1: a line that would drop to zero is removed.
//! The cart total is never stored; it is derived from the catalog on demand.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemId};
use crate::{Error, Result};

/// One distinct item in the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// A cart line joined with its catalog data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// What a cart mutation did, used to pick the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// Item added, either as a new line or onto an existing one
    Added { item_id: ItemId, quantity: u32 },
    Increased { item_id: ItemId, quantity: u32 },
    Decreased { item_id: ItemId, quantity: u32 },
    /// Line deleted, explicitly or by decreasing from 1
    Removed { item_id: ItemId },
    /// No line for the item; nothing changed
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `item_id`. Fails with `ItemNotFound` if the catalog has no
    /// such item, or `QuantityLimit` if its line is full; the cart is
    /// untouched in both cases.
    pub fn add_item(&mut self, catalog: &Catalog, item_id: ItemId) -> Result<CartEvent> {
        if !catalog.contains(item_id) {
            return Err(Error::ItemNotFound(item_id));
        }
        let quantity = match self.line_mut(item_id) {
            Some(line) => {
                line.quantity = bump(line.quantity, item_id)?;
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    item_id,
                    quantity: 1,
                });
                1
            }
        };
        Ok(CartEvent::Added { item_id, quantity })
    }

    pub fn remove_item(&mut self, item_id: ItemId) -> CartEvent {
        match self.position(item_id) {
            Some(index) => {
                self.lines.remove(index);
                CartEvent::Removed { item_id }
            }
            None => CartEvent::Unchanged,
        }
    }

    pub fn increase_quantity(&mut self, item_id: ItemId) -> Result<CartEvent> {
        match self.line_mut(item_id) {
            Some(line) => {
                line.quantity = bump(line.quantity, item_id)?;
                Ok(CartEvent::Increased {
                    item_id,
                    quantity: line.quantity,
                })
            }
            None => Ok(CartEvent::Unchanged),
        }
    }

    /// Decrease by one; a line at quantity 1 is removed instead
    pub fn decrease_quantity(&mut self, item_id: ItemId) -> CartEvent {
        let Some(index) = self.position(item_id) else {
            return CartEvent::Unchanged;
        };
        let line = &mut self.lines[index];
        if line.quantity > 1 {
            line.quantity -= 1;
            CartEvent::Decreased {
                item_id,
                quantity: line.quantity,
            }
        } else {
            self.lines.remove(index);
            CartEvent::Removed { item_id }
        }
    }

    /// Exact sum of `quantity * price` over all lines
    pub fn total(&self, catalog: &Catalog) -> Decimal {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .get(line.item_id)
                    .map(|item| item.price * Decimal::from(line.quantity))
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of `item_id`, 0 when absent
    pub fn quantity_of(&self, item_id: ItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item_id == item_id)
            .map_or(0, |line| line.quantity)
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines joined with names and prices, in cart order
    pub fn priced_lines(&self, catalog: &Catalog) -> Vec<PricedLine> {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog.get(line.item_id).map(|item| PricedLine {
                    item_id: line.item_id,
                    name: item.name.clone(),
                    unit_price: item.price,
                    quantity: line.quantity,
                    line_total: item.price * Decimal::from(line.quantity),
                })
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, item_id: ItemId) -> Option<usize> {
        self.lines.iter().position(|line| line.item_id == item_id)
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }
}

fn bump(quantity: u32, item_id: ItemId) -> Result<u32> {
    quantity
        .checked_add(1)
        .ok_or(Error::QuantityLimit(item_id))
}

// ── Tests ─────────────────────────────────────────────────
