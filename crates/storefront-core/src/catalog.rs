//! Menu catalog - static, read-only menu data
//!
//! The catalog is built once at startup, either from the compiled-in menu
//! table or from a JSON array of items, and is never mutated afterwards.
//! Presentation groups items by category: categories appear in the order of
//! their first item, items keep catalog order within a category.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ── Core Types ────────────────────────────────────────────

/// Unique identifier of a menu item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

/// A purchasable menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub price: Decimal,
    /// Image reference (path or URL), opaque to the core
    #[serde(default)]
    pub image: String,
}

/// Items of one category, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection<'a> {
    /// Category key as it appears in the catalog
    pub category: &'a str,
    /// Display heading, e.g. `"Burgers"` for `"burgers"`
    pub title: String,
    pub items: Vec<&'a MenuItem>,
}

// ── Catalog ───────────────────────────────────────────────

/// Read-only list of menu items
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

/// Highest accepted item price. With quantities capped at `u32::MAX`, line
/// totals and cart totals stay far below `Decimal::MAX`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Compiled-in menu: (id, name, category, ingredients, price in cents, image)
const MENU: &[(u32, &str, &str, &[&str], i64, &str)] = &[
    (
        0,
        "Margherita",
        "pizza",
        &["tomato", "mozzarella", "basil"],
        1400,
        "images/margherita.png",
    ),
    (
        1,
        "Pepperoni",
        "pizza",
        &["tomato", "mozzarella", "pepperoni"],
        1500,
        "images/pepperoni.png",
    ),
    (
        2,
        "Classic Burger",
        "burgers",
        &["beef", "cheese", "lettuce"],
        1200,
        "images/classic-burger.png",
    ),
    (
        3,
        "Veggie Burger",
        "burgers",
        &["bean patty", "tomato", "lettuce"],
        950,
        "images/veggie-burger.png",
    ),
    (4, "Fries", "sides", &["potato", "sea salt"], 450, "images/fries.png"),
    (
        5,
        "Onion Rings",
        "sides",
        &["onion", "batter"],
        500,
        "images/onion-rings.png",
    ),
    (
        6,
        "Lemonade",
        "drinks",
        &["lemon", "sugar", "water"],
        350,
        "images/lemonade.png",
    ),
    (
        7,
        "Beer",
        "drinks",
        &["grain", "hops", "yeast", "water"],
        1200,
        "images/beer.png",
    ),
];

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, prices outside
    /// `0..=MAX_PRICE` and blank names or categories
    pub fn new(items: Vec<MenuItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
            if item.name.trim().is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "item {} has an empty name",
                    item.id
                )));
            }
            if item.category.trim().is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "item {} has an empty category",
                    item.id
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(Error::InvalidCatalog(format!(
                    "item {} has a negative price ({})",
                    item.id, item.price
                )));
            }
            if item.price > MAX_PRICE {
                return Err(Error::InvalidCatalog(format!(
                    "item {} price {} exceeds the maximum of {}",
                    item.id, item.price, MAX_PRICE
                )));
            }
        }
        Ok(Catalog { items })
    }

    /// The compiled-in menu
    pub fn builtin() -> Self {
        let items = MENU
            .iter()
            .map(|&(id, name, category, ingredients, cents, image)| MenuItem {
                id: ItemId(id),
                name: name.to_string(),
                category: category.to_string(),
                ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                price: Decimal::new(cents, 2),
                image: image.to_string(),
            })
            .collect();
        Catalog { items }
    }

    /// Parse a catalog from a JSON array of menu items
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<MenuItem> = serde_json::from_str(json)
            .map_err(|e| Error::InvalidCatalog(format!("malformed JSON: {}", e)))?;
        let catalog = Self::new(items)?;
        tracing::debug!(items = catalog.len(), "catalog loaded from JSON");
        Ok(catalog)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for item in &self.items {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        categories
    }

    /// Items grouped by category for rendering
    pub fn sections(&self) -> Vec<CategorySection<'_>> {
        self.categories()
            .into_iter()
            .map(|category| CategorySection {
                category,
                title: category_title(category),
                items: self
                    .items
                    .iter()
                    .filter(|item| item.category == category)
                    .collect(),
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Heading for a category key: first character upper-cased, rest untouched
pub fn category_title(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────
