//! Checkout state machine - browsing, cart, payment, confirmation
//!
//! # States
//!
//! ```text
//!             cart non-empty              request_checkout
//!  Browsing ─────────────────▶ CartOpen ───────────────────▶ PaymentOpen
//!     ▲       ◀─────────────────          ◀───────────────────     │
//!     │          cart empty                  cancel_payment        │ submit_payment
//!     │                                                            ▼
//!     └──────────────────────── start_new_order ─────────────── Confirmed
//! ```
//!
//! Browsing and CartOpen are never chosen by the caller: they follow from
//! whether the cart is empty. Every other transition is explicit, and any
//! operation attempted from the wrong state fails with `InvalidTransition`
//! before anything is mutated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::cart::{Cart, CartEvent, PricedLine};
use crate::catalog::{Catalog, ItemId};
use crate::payment::{self, PaymentForm};
use crate::{Error, Result};

// ── Core Types ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Browsing,
    CartOpen,
    PaymentOpen,
    Confirmed,
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutState::Browsing => write!(f, "browsing"),
            CheckoutState::CartOpen => write!(f, "cart open"),
            CheckoutState::PaymentOpen => write!(f, "payment open"),
            CheckoutState::Confirmed => write!(f, "order confirmed"),
        }
    }
}

/// Snapshot of a confirmed order, captured before the cart is cleared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub customer_name: String,
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
    /// Short hex digest of the receipt contents
    pub reference: String,
}

/// Number of hex digits kept from the receipt digest
const REFERENCE_LENGTH: usize = 10;

impl OrderReceipt {
    fn capture(customer_name: String, cart: &Cart, catalog: &Catalog) -> Self {
        let lines = cart.priced_lines(catalog);
        let total = cart.total(catalog);
        let reference = Self::compute_reference(&customer_name, &lines, total);
        OrderReceipt {
            customer_name,
            lines,
            total,
            reference,
        }
    }

    fn compute_reference(customer_name: &str, lines: &[PricedLine], total: Decimal) -> String {
        let mut hasher = Sha256::new();
        hasher.update(customer_name.as_bytes());
        for line in lines {
            hasher.update(
                format!("|{}x{}@{}", line.item_id, line.quantity, line.unit_price).as_bytes(),
            );
        }
        hasher.update(format!("|{}", total.normalize()).as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..REFERENCE_LENGTH].to_string()
    }
}

/// Serializable view of a session, returned after every dispatched action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: CheckoutState,
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
    pub customer_name: Option<String>,
    pub receipt: Option<OrderReceipt>,
}

// ── Checkout Session ──────────────────────────────────────

/// The single checkout session: state, live cart, and confirmed order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    state: CheckoutState,
    cart: Cart,
    customer_name: Option<String>,
    receipt: Option<OrderReceipt>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Set only while Confirmed
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    /// Set only while Confirmed
    pub fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    pub fn add_item(&mut self, catalog: &Catalog, item_id: ItemId) -> Result<CartEvent> {
        self.ensure_cart_editable("add an item")?;
        let event = self.cart.add_item(catalog, item_id)?;
        self.sync_cart_visibility();
        Ok(event)
    }

    pub fn remove_item(&mut self, item_id: ItemId) -> Result<CartEvent> {
        self.ensure_cart_editable("remove an item")?;
        let event = self.cart.remove_item(item_id);
        self.sync_cart_visibility();
        Ok(event)
    }

    pub fn increase_quantity(&mut self, item_id: ItemId) -> Result<CartEvent> {
        self.ensure_cart_editable("change a quantity")?;
        let event = self.cart.increase_quantity(item_id)?;
        self.sync_cart_visibility();
        Ok(event)
    }

    pub fn decrease_quantity(&mut self, item_id: ItemId) -> Result<CartEvent> {
        self.ensure_cart_editable("change a quantity")?;
        let event = self.cart.decrease_quantity(item_id);
        self.sync_cart_visibility();
        Ok(event)
    }

    /// CartOpen → PaymentOpen. Returns the amount due.
    pub fn request_checkout(&mut self, catalog: &Catalog) -> Result<Decimal> {
        match self.state {
            CheckoutState::Browsing => return Err(Error::EmptyCart),
            CheckoutState::CartOpen if self.cart.is_empty() => return Err(Error::EmptyCart),
            CheckoutState::CartOpen => {}
            state => {
                return Err(Error::InvalidTransition {
                    state,
                    action: "check out",
                })
            }
        }
        self.state = CheckoutState::PaymentOpen;
        Ok(self.cart.total(catalog))
    }

    /// PaymentOpen → CartOpen
    pub fn cancel_payment(&mut self) -> Result<()> {
        self.require(CheckoutState::PaymentOpen, "cancel payment")?;
        self.state = CheckoutState::CartOpen;
        Ok(())
    }

    /// PaymentOpen → Confirmed. Validation failures keep PaymentOpen.
    pub fn submit_payment(
        &mut self,
        catalog: &Catalog,
        form: &PaymentForm,
    ) -> Result<&OrderReceipt> {
        self.require(CheckoutState::PaymentOpen, "submit payment")?;
        let valid = payment::validate(form)?;

        let receipt = OrderReceipt::capture(valid.customer_name.clone(), &self.cart, catalog);
        self.cart.clear();
        self.customer_name = Some(valid.customer_name);
        self.state = CheckoutState::Confirmed;
        let receipt: &OrderReceipt = self.receipt.insert(receipt);
        Ok(receipt)
    }

    /// Confirmed → Browsing, with an empty cart
    pub fn start_new_order(&mut self) -> Result<()> {
        self.require(CheckoutState::Confirmed, "start a new order")?;
        *self = Self::new();
        Ok(())
    }

    pub fn snapshot(&self, catalog: &Catalog) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            lines: self.cart.priced_lines(catalog),
            total: self.cart.total(catalog),
            customer_name: self.customer_name.clone(),
            receipt: self.receipt.clone(),
        }
    }

    fn require(&self, expected: CheckoutState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn ensure_cart_editable(&self, action: &'static str) -> Result<()> {
        match self.state {
            CheckoutState::Browsing | CheckoutState::CartOpen => Ok(()),
            state => Err(Error::InvalidTransition { state, action }),
        }
    }

    fn sync_cart_visibility(&mut self) {
        self.state = match (self.state, self.cart.is_empty()) {
            (CheckoutState::Browsing, false) => CheckoutState::CartOpen,
            (CheckoutState::CartOpen, true) => CheckoutState::Browsing,
            (state, _) => state,
        };
    }
}

// ── Transition Log ────────────────────────────────────────

/// One accepted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    /// Sequential action number (0-indexed)
    pub sequence: u64,
    /// Dispatcher identifier of the action, e.g. `"add"`
    pub action: String,
    pub state_before: CheckoutState,
    pub state_after: CheckoutState,
    /// Cart total after the action
    pub total: Decimal,
}

/// Append-only log of accepted actions. Rejected actions are not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionLog {
    pub entries: Vec<TransitionEntry>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning the next sequence number
    pub fn record(
        &mut self,
        action: &str,
        state_before: CheckoutState,
        state_after: CheckoutState,
        total: Decimal,
    ) -> &TransitionEntry {
        let sequence = self.entries.len() as u64;
        self.entries.push(TransitionEntry {
            sequence,
            action: action.to_string(),
            state_before,
            state_after,
            total,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────
