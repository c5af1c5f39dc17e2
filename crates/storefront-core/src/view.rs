//! View port - the rendering and notification interface the core calls
//!
//! The core never produces markup or terminal output itself. A UI layer
//! implements [`ViewPort`]; [`RecordingView`] is an in-memory implementation
//! that keeps every call as a [`ViewEvent`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::PricedLine;
use crate::catalog::{CategorySection, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Cart contents as handed to the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

/// Rendering capabilities implemented by the surrounding UI
pub trait ViewPort {
    /// Menu items grouped by category, in display order
    fn render_catalog(&mut self, sections: &[CategorySection<'_>]);

    /// Called after every cart change. `None` means the cart is empty and
    /// should be hidden.
    fn render_cart(&mut self, cart: Option<&CartView>);

    fn render_payment_prompt(&mut self, total: Decimal);

    fn render_confirmation(&mut self, customer_name: &str, lines: &[PricedLine], total: Decimal);

    /// Transient message; no acknowledgement expected
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

/// Format an amount for display, rounded to cents
pub fn format_price(amount: Decimal, currency_symbol: &str) -> String {
    format!("{}{:.2}", currency_symbol, amount.round_dp(2))
}

// ── Recording View ────────────────────────────────────────

/// One call made on a [`RecordingView`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    Catalog {
        categories: Vec<String>,
        items: Vec<ItemId>,
    },
    Cart {
        cart: Option<CartView>,
    },
    PaymentPrompt {
        total: Decimal,
    },
    Confirmation {
        customer_name: String,
        lines: Vec<PricedLine>,
        total: Decimal,
    },
    Notification {
        message: String,
        kind: NotificationKind,
    },
}

/// A view that records every call, for tests and JSON output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications in emission order
    pub fn notifications(&self) -> Vec<(&str, NotificationKind)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Notification { message, kind } => Some((message.as_str(), *kind)),
                _ => None,
            })
            .collect()
    }

    /// Most recent cart render, if any
    pub fn last_cart(&self) -> Option<Option<&CartView>> {
        self.events.iter().rev().find_map(|event| match event {
            ViewEvent::Cart { cart } => Some(cart.as_ref()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ViewPort for RecordingView {
    fn render_catalog(&mut self, sections: &[CategorySection<'_>]) {
        self.events.push(ViewEvent::Catalog {
            categories: sections.iter().map(|s| s.category.to_string()).collect(),
            items: sections
                .iter()
                .flat_map(|s| s.items.iter().map(|item| item.id))
                .collect(),
        });
    }

    fn render_cart(&mut self, cart: Option<&CartView>) {
        self.events.push(ViewEvent::Cart {
            cart: cart.cloned(),
        });
    }

    fn render_payment_prompt(&mut self, total: Decimal) {
        self.events.push(ViewEvent::PaymentPrompt { total });
    }

    fn render_confirmation(&mut self, customer_name: &str, lines: &[PricedLine], total: Decimal) {
        self.events.push(ViewEvent::Confirmation {
            customer_name: customer_name.to_string(),
            lines: lines.to_vec(),
            total,
        });
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.events.push(ViewEvent::Notification {
            message: message.to_string(),
            kind,
        });
    }
}
