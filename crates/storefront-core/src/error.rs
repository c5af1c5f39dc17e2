//! Error types for the storefront core
//!
//! All fallible operations return `Result<T, Error>`.
//! Every error is recoverable: a rejected action leaves the session untouched.

use crate::catalog::ItemId;
use crate::checkout::CheckoutState;
use crate::payment::PaymentField;

/// Storefront error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Referenced item id is absent from the catalog
    #[error("Item {0} not found in catalog")]
    ItemNotFound(ItemId),

    /// Checkout requested with nothing in the cart
    #[error("Your cart is empty")]
    EmptyCart,

    /// Action not permitted in the current checkout state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: CheckoutState,
        action: &'static str,
    },

    /// Line quantity is already at its maximum
    #[error("Cannot order more of item {0}")]
    QuantityLimit(ItemId),

    /// Payment form rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Command identifier not known to the dispatcher
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// Command identifier known, but its argument could not be parsed
    #[error("Invalid argument for '{action}': {reason}")]
    InvalidArgument { action: String, reason: String },

    /// Catalog data is malformed or violates catalog invariants
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Payment form validation failures, in the order they are checked
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your {0}")]
    MissingField(PaymentField),

    #[error("Card number must be 16 digits (got {length})")]
    InvalidCardNumber { length: usize },

    #[error("CVV must be 3 digits (got {length})")]
    InvalidCvv { length: usize },
}

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, Error>;
