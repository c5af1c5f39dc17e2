//! Storefront Core - cart and checkout state machine for a food-ordering menu
//!
//! Everything here is in-memory and single-session: a static catalog, a cart
//! of (item, quantity) lines, and the checkout flow from browsing to a
//! confirmed order. Rendering is delegated to a [`ViewPort`] implemented by
//! the UI layer.
//!
//! # Architecture
//!
//! ```text
//! UI event → Action → Storefront::dispatch → CheckoutSession → Cart
//!                            │                      │
//!                            │                      └─ payment::validate
//!                            ▼
//!                     ViewPort (render + notify) → SessionSnapshot
//! ```
//!
//! # Guarantees
//!
//! - **Derived totals**: the cart total is always `sum(quantity * price)`,
//!   computed with exact decimals and rounded only for display
//! - **Unique lines**: at most one cart line per item, in first-add order
//! - **Atomic actions**: a rejected action leaves the session untouched
//! - **Cart-driven visibility**: an empty cart is never in CartOpen or
//!   PaymentOpen

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dispatcher;
pub mod error;
pub mod payment;
pub mod view;

pub use cart::{Cart, CartEvent, CartLine, PricedLine};
pub use catalog::{Catalog, CategorySection, ItemId, MenuItem, MAX_PRICE};
pub use checkout::{
    CheckoutSession, CheckoutState, OrderReceipt, SessionSnapshot, TransitionEntry, TransitionLog,
};
pub use dispatcher::{Action, Storefront};
pub use error::{Error, Result, ValidationError};
pub use payment::{validate, PaymentField, PaymentForm, ValidPayment};
pub use view::{format_price, CartView, NotificationKind, RecordingView, ViewEvent, ViewPort};

/// Exact decimal type used for all prices and totals
pub use rust_decimal::Decimal;

/// Version of the storefront-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veggie_burger_scenario() {
        let mut store = Storefront::new(Catalog::builtin(), RecordingView::new());
        let burger = ItemId(3);

        let s = store.dispatch(Action::AddItem(burger)).unwrap();
        assert_eq!(s.lines.len(), 1);
        assert_eq!(s.lines[0].quantity, 1);
        assert_eq!(s.total, Decimal::new(950, 2));

        let s = store.dispatch(Action::AddItem(burger)).unwrap();
        assert_eq!(s.lines[0].quantity, 2);
        assert_eq!(format_price(s.total, "$"), "$19.00");

        let s = store.dispatch(Action::DecreaseQuantity(burger)).unwrap();
        assert_eq!(s.lines[0].quantity, 1);
        assert_eq!(s.total, Decimal::new(950, 2));

        let s = store.dispatch(Action::DecreaseQuantity(burger)).unwrap();
        assert!(s.lines.is_empty());
        assert_eq!(format_price(s.total, "$"), "$0.00");
        assert_eq!(s.state, CheckoutState::Browsing);
    }

    #[test]
    fn test_short_card_rejected_before_cvv() {
        let mut store = Storefront::new(Catalog::builtin(), RecordingView::new());
        store.dispatch(Action::AddItem(ItemId(0))).unwrap();
        store.dispatch(Action::RequestCheckout).unwrap();
        let result = store.dispatch(Action::SubmitPayment(PaymentForm::new("A", "123", "12")));
        assert_eq!(
            result,
            Err(Error::Validation(ValidationError::InvalidCardNumber {
                length: 3
            }))
        );
        assert_eq!(store.session().state(), CheckoutState::PaymentOpen);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut store = Storefront::new(Catalog::builtin(), RecordingView::new());
        let snapshot = store.dispatch(Action::AddItem(ItemId(3))).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"state\":\"cart_open\""));
        assert!(json.contains("\"total\":\"9.50\""));
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_catalog_prices_cannot_overflow_totals() {
        let oversized = r#"[{"id": 1, "name": "Gold Bar", "category": "x",
                             "price": "79228162514264337593543950335"}]"#;
        assert!(matches!(
            Catalog::from_json(oversized),
            Err(Error::InvalidCatalog(_))
        ));

        let at_limit = format!(
            r#"[{{"id": 1, "name": "Gold Bar", "category": "x", "price": "{}"}}]"#,
            MAX_PRICE
        );
        let catalog = Catalog::from_json(&at_limit).unwrap();
        let mut store = Storefront::new(catalog, RecordingView::new());
        for _ in 0..3 {
            store.dispatch(Action::AddItem(ItemId(1))).unwrap();
        }
        let s = store.dispatch(Action::IncreaseQuantity(ItemId(1))).unwrap();
        assert_eq!(s.lines[0].quantity, 4);
        assert_eq!(s.total, MAX_PRICE * Decimal::from(4u32));
    }

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }
}
