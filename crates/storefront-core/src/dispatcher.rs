//! Command dispatcher - maps user actions onto the checkout session
//!
//! A UI layer translates its own events (clicks, key presses, script lines)
//! into [`Action`]s, either directly or through [`Action::parse`], and hands
//! them to [`Storefront::dispatch`]. The storefront applies the action,
//! emits notifications, re-renders through the [`ViewPort`] and returns a
//! fresh [`SessionSnapshot`].
//!
//! # Command syntax
//!
//! ```text
//! add 3
//! decrease 3
//! checkout
//! pay name=Ada Lovelace; card=4242424242424242; cvv=123
//! new-order
//! ```

use crate::cart::CartEvent;
use crate::catalog::{Catalog, ItemId};
use crate::checkout::{CheckoutSession, SessionSnapshot, TransitionLog};
use crate::payment::PaymentForm;
use crate::view::{CartView, NotificationKind, ViewPort};
use crate::{Error, Result};

// ── Actions ───────────────────────────────────────────────

/// A user action the storefront can handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddItem(ItemId),
    RemoveItem(ItemId),
    IncreaseQuantity(ItemId),
    DecreaseQuantity(ItemId),
    RequestCheckout,
    CancelPayment,
    SubmitPayment(PaymentForm),
    StartNewOrder,
}

/// An action identifier and how to build the action from its argument
struct ActionSpec {
    id: &'static str,
    usage: &'static str,
    parse: fn(&str) -> Result<Action>,
}

const ACTIONS: &[ActionSpec] = &[
    ActionSpec {
        id: "add",
        usage: "add <item-id>",
        parse: parse_add,
    },
    ActionSpec {
        id: "remove",
        usage: "remove <item-id>",
        parse: parse_remove,
    },
    ActionSpec {
        id: "increase",
        usage: "increase <item-id>",
        parse: parse_increase,
    },
    ActionSpec {
        id: "decrease",
        usage: "decrease <item-id>",
        parse: parse_decrease,
    },
    ActionSpec {
        id: "checkout",
        usage: "checkout",
        parse: parse_checkout,
    },
    ActionSpec {
        id: "cancel",
        usage: "cancel",
        parse: parse_cancel,
    },
    ActionSpec {
        id: "pay",
        usage: "pay name=<name>; card=<card-number>; cvv=<cvv>",
        parse: parse_pay,
    },
    ActionSpec {
        id: "new-order",
        usage: "new-order",
        parse: parse_new_order,
    },
];

impl Action {
    /// Dispatcher identifier of this action
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddItem(_) => "add",
            Action::RemoveItem(_) => "remove",
            Action::IncreaseQuantity(_) => "increase",
            Action::DecreaseQuantity(_) => "decrease",
            Action::RequestCheckout => "checkout",
            Action::CancelPayment => "cancel",
            Action::SubmitPayment(_) => "pay",
            Action::StartNewOrder => "new-order",
        }
    }

    /// Parse a command line: an identifier, then an optional argument
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (id, argument) = match line.split_once(char::is_whitespace) {
            Some((id, rest)) => (id, rest.trim()),
            None => (line, ""),
        };
        let entry = ACTIONS
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| Error::UnknownAction(id.to_string()))?;
        (entry.parse)(argument)
    }

    /// `(identifier, usage)` for every known action
    pub fn usage() -> impl Iterator<Item = (&'static str, &'static str)> {
        ACTIONS.iter().map(|entry| (entry.id, entry.usage))
    }
}

fn invalid_argument(action: &str, reason: impl Into<String>) -> Error {
    Error::InvalidArgument {
        action: action.to_string(),
        reason: reason.into(),
    }
}

fn item_argument(action: &str, argument: &str) -> Result<ItemId> {
    if argument.is_empty() {
        return Err(invalid_argument(action, "expected an item id"));
    }
    argument
        .parse()
        .map_err(|_| invalid_argument(action, format!("'{}' is not an item id", argument)))
}

fn no_argument(action: &str, argument: &str, value: Action) -> Result<Action> {
    if argument.is_empty() {
        Ok(value)
    } else {
        Err(invalid_argument(action, "takes no argument"))
    }
}

fn parse_add(argument: &str) -> Result<Action> {
    item_argument("add", argument).map(Action::AddItem)
}

fn parse_remove(argument: &str) -> Result<Action> {
    item_argument("remove", argument).map(Action::RemoveItem)
}

fn parse_increase(argument: &str) -> Result<Action> {
    item_argument("increase", argument).map(Action::IncreaseQuantity)
}

fn parse_decrease(argument: &str) -> Result<Action> {
    item_argument("decrease", argument).map(Action::DecreaseQuantity)
}

fn parse_checkout(argument: &str) -> Result<Action> {
    no_argument("checkout", argument, Action::RequestCheckout)
}

fn parse_cancel(argument: &str) -> Result<Action> {
    no_argument("cancel", argument, Action::CancelPayment)
}

fn parse_new_order(argument: &str) -> Result<Action> {
    no_argument("new-order", argument, Action::StartNewOrder)
}

/// `name=..; card=..; cvv=..` in any order. Omitted fields stay empty so
/// the validator reports them as missing.
fn parse_pay(argument: &str) -> Result<Action> {
    let mut form = PaymentForm::default();
    for pair in argument.split(';').filter(|p| !p.trim().is_empty()) {
        // Values are never echoed back: they may hold card data.
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| invalid_argument("pay", "expected key=value pairs"))?;
        let value = value.to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => form.name = value,
            "card" | "card_number" => form.card_number = value,
            "cvv" => form.cvv = value,
            other => return Err(invalid_argument("pay", format!("unknown field '{}'", other))),
        }
    }
    Ok(Action::SubmitPayment(form))
}

// ── Storefront ────────────────────────────────────────────

/// Owns the catalog, the checkout session and the view, and applies actions
pub struct Storefront<V: ViewPort> {
    catalog: Catalog,
    session: CheckoutSession,
    view: V,
    transitions: TransitionLog,
}

impl<V: ViewPort> Storefront<V> {
    pub fn new(catalog: Catalog, view: V) -> Self {
        Storefront {
            catalog,
            session: CheckoutSession::new(),
            view,
            transitions: TransitionLog::new(),
        }
    }

    /// Initial render: the menu and the (empty) cart
    pub fn open(&mut self) {
        self.view.render_catalog(&self.catalog.sections());
        self.render_cart();
    }

    /// Apply one action. Rejected actions are reported through the view and
    /// leave the session unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<SessionSnapshot> {
        let name = action.name();
        let before = self.session.state();

        match self.apply(action) {
            Ok(()) => {
                let after = self.session.state();
                let total = self.session.cart().total(&self.catalog);
                self.transitions.record(name, before, after, total);
                tracing::debug!(action = name, from = %before, to = %after, "action applied");
                Ok(self.snapshot())
            }
            Err(e) => {
                tracing::warn!(action = name, state = %before, error = %e, "action rejected");
                self.view.notify(&e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    /// Parse and dispatch one command line
    pub fn dispatch_command(&mut self, line: &str) -> Result<SessionSnapshot> {
        match Action::parse(line) {
            Ok(action) => self.dispatch(action),
            Err(e) => {
                tracing::warn!(error = %e, "command rejected");
                self.view.notify(&e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::AddItem(id) => {
                let event = self.session.add_item(&self.catalog, id)?;
                self.announce(event);
                self.render_cart();
            }
            Action::RemoveItem(id) => {
                let event = self.session.remove_item(id)?;
                self.announce(event);
                self.render_cart();
            }
            Action::IncreaseQuantity(id) => {
                let event = self.session.increase_quantity(id)?;
                self.announce(event);
                self.render_cart();
            }
            Action::DecreaseQuantity(id) => {
                let event = self.session.decrease_quantity(id)?;
                self.announce(event);
                self.render_cart();
            }
            Action::RequestCheckout => {
                let total = self.session.request_checkout(&self.catalog)?;
                self.view.render_payment_prompt(total);
            }
            Action::CancelPayment => {
                self.session.cancel_payment()?;
                self.render_cart();
            }
            Action::SubmitPayment(form) => {
                let receipt = self.session.submit_payment(&self.catalog, &form)?;
                self.view
                    .render_confirmation(&receipt.customer_name, &receipt.lines, receipt.total);
                let message = format!(
                    "Thanks, {}! Your order is on its way!",
                    receipt.customer_name
                );
                self.view.notify(&message, NotificationKind::Success);
                self.render_cart();
            }
            Action::StartNewOrder => {
                self.session.start_new_order()?;
                self.render_cart();
            }
        }
        Ok(())
    }

    /// Notification for a cart event. Increases and no-ops stay silent.
    fn announce(&mut self, event: CartEvent) {
        let (item_id, verb, kind) = match event {
            CartEvent::Added { item_id, .. } => {
                (item_id, "added to your order", NotificationKind::Success)
            }
            CartEvent::Decreased { item_id, .. } => {
                (item_id, "quantity decreased", NotificationKind::Info)
            }
            CartEvent::Removed { item_id } => {
                (item_id, "removed from your order", NotificationKind::Info)
            }
            CartEvent::Increased { .. } | CartEvent::Unchanged => return,
        };
        let name = self
            .catalog
            .get(item_id)
            .map_or_else(|| format!("Item {}", item_id), |item| item.name.clone());
        self.view.notify(&format!("{} {}", name, verb), kind);
    }

    fn render_cart(&mut self) {
        let cart = self.session.cart();
        if cart.is_empty() {
            self.view.render_cart(None);
        } else {
            let cart_view = CartView {
                lines: cart.priced_lines(&self.catalog),
                total: cart.total(&self.catalog),
            };
            self.view.render_cart(Some(&cart_view));
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(&self.catalog)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn transitions(&self) -> &TransitionLog {
        &self.transitions
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

// ── Tests ─────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutState;
    use crate::view::{RecordingView, ViewEvent};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn storefront() -> Storefront<RecordingView> {
        Storefront::new(Catalog::builtin(), RecordingView::new())
    }

    #[rstest]
    #[case("add 3", Action::AddItem(ItemId(3)))]
    #[case("  remove   7 ", Action::RemoveItem(ItemId(7)))]
    #[case("increase 0", Action::IncreaseQuantity(ItemId(0)))]
    #[case("DECREASE 2", Action::DecreaseQuantity(ItemId(2)))]
    #[case("checkout", Action::RequestCheckout)]
    #[case("cancel", Action::CancelPayment)]
    #[case("new-order", Action::StartNewOrder)]
    #[case(
        "pay name=Ada Lovelace; card=4242424242424242; cvv=123",
        Action::SubmitPayment(PaymentForm::new("Ada Lovelace", "4242424242424242", "123"))
    )]
    #[case("pay cvv=1;name=B", Action::SubmitPayment(PaymentForm::new("B", "", "1")))]
    #[case("pay", Action::SubmitPayment(PaymentForm::default()))]
    fn test_parse(#[case] line: &str, #[case] expected: Action) {
        assert_eq!(Action::parse(line), Ok(expected));
    }

    #[rstest]
    #[case("add")]
    #[case("add three")]
    #[case("checkout now")]
    #[case("pay name")]
    #[case("pay pin=1234")]
    fn test_parse_invalid_argument(#[case] line: &str) {
        assert!(matches!(
            Action::parse(line),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(
            Action::parse("refund 3"),
            Err(Error::UnknownAction("refund".into()))
        );
        assert_eq!(Action::parse(""), Err(Error::UnknownAction("".into())));
    }

    #[test]
    fn test_every_identifier_round_trips_through_name() {
        for (id, usage) in Action::usage() {
            assert!(usage.starts_with(id));
            let sample = match id {
                "add" | "remove" | "increase" | "decrease" => format!("{} 1", id),
                _ => id.to_string(),
            };
            assert_eq!(Action::parse(&sample).unwrap().name(), id);
        }
    }

    #[test]
    fn test_open_renders_catalog_and_empty_cart() {
        let mut store = storefront();
        store.open();
        let events = &store.view().events;
        assert!(matches!(events[0], ViewEvent::Catalog { .. }));
        assert_eq!(events[1], ViewEvent::Cart { cart: None });
    }

    #[test]
    fn test_add_notifies_and_renders_cart() {
        let mut store = storefront();
        let snapshot = store.dispatch(Action::AddItem(ItemId(3))).unwrap();
        assert_eq!(snapshot.state, CheckoutState::CartOpen);
        assert_eq!(
            store.view().notifications(),
            vec![("Veggie Burger added to your order", NotificationKind::Success)]
        );
        let cart = store.view().last_cart().flatten().unwrap();
        assert_eq!(cart.total, Decimal::new(950, 2));
    }

    #[test]
    fn test_decrease_to_zero_emits_only_removed() {
        let mut store = storefront();
        store.dispatch(Action::AddItem(ItemId(3))).unwrap();
        store.view_mut().clear();
        store.dispatch(Action::DecreaseQuantity(ItemId(3))).unwrap();
        assert_eq!(
            store.view().notifications(),
            vec![("Veggie Burger removed from your order", NotificationKind::Info)]
        );
        assert_eq!(store.view().last_cart(), Some(None));
    }

    #[test]
    fn test_decrease_notifies_decreased() {
        let mut store = storefront();
        store.dispatch(Action::AddItem(ItemId(4))).unwrap();
        store.dispatch(Action::IncreaseQuantity(ItemId(4))).unwrap();
        store.view_mut().clear();
        store.dispatch(Action::DecreaseQuantity(ItemId(4))).unwrap();
        assert_eq!(
            store.view().notifications(),
            vec![("Fries quantity decreased", NotificationKind::Info)]
        );
    }

    #[test]
    fn test_rejected_action_notifies_error_and_keeps_state() {
        let mut store = storefront();
        let result = store.dispatch(Action::RequestCheckout);
        assert_eq!(result, Err(Error::EmptyCart));
        assert_eq!(store.session().state(), CheckoutState::Browsing);
        assert_eq!(
            store.view().notifications(),
            vec![("Your cart is empty", NotificationKind::Error)]
        );
        assert!(store.transitions().is_empty());
    }

    #[test]
    fn test_dispatch_command_reports_parse_errors() {
        let mut store = storefront();
        assert!(store.dispatch_command("fly 3").is_err());
        assert_eq!(
            store.view().notifications(),
            vec![("Unknown action 'fly'", NotificationKind::Error)]
        );
    }

    #[test]
    fn test_full_order_flow() {
        let mut store = storefront();
        store.open();
        for line in [
            "add 3",
            "add 4",
            "add 3",
            "checkout",
            "pay name=; card=4242424242424242; cvv=123",
        ] {
            let _ = store.dispatch_command(line);
        }
        assert_eq!(store.session().state(), CheckoutState::PaymentOpen);

        let snapshot = store
            .dispatch_command("pay name= Ada ; card=4242424242424242; cvv=123")
            .unwrap();
        assert_eq!(snapshot.state, CheckoutState::Confirmed);
        assert!(snapshot.lines.is_empty());
        assert_eq!(snapshot.customer_name.as_deref(), Some("Ada"));
        let receipt = snapshot.receipt.unwrap();
        assert_eq!(receipt.total, Decimal::new(2350, 2));

        assert!(store.view().events.iter().any(|e| matches!(
            e,
            ViewEvent::Confirmation { customer_name, total, .. }
                if customer_name == "Ada" && *total == Decimal::new(2350, 2)
        )));
        assert!(store
            .view()
            .notifications()
            .contains(&("Thanks, Ada! Your order is on its way!", NotificationKind::Success)));

        let snapshot = store.dispatch(Action::StartNewOrder).unwrap();
        assert_eq!(snapshot.state, CheckoutState::Browsing);
        assert!(snapshot.receipt.is_none());

        let actions: Vec<&str> = store
            .transitions()
            .entries
            .iter()
            .map(|e| e.action.as_str())
            .collect();
        assert_eq!(actions, vec!["add", "add", "add", "checkout", "pay", "new-order"]);
    }

    #[test]
    fn test_cancel_payment_rerenders_cart() {
        let mut store = storefront();
        store.dispatch(Action::AddItem(ItemId(6))).unwrap();
        let snapshot = store.dispatch(Action::RequestCheckout).unwrap();
        assert_eq!(snapshot.state, CheckoutState::PaymentOpen);
        assert!(matches!(
            store.view().events.last(),
            Some(ViewEvent::PaymentPrompt { .. })
        ));
        store.dispatch(Action::CancelPayment).unwrap();
        assert_eq!(store.session().state(), CheckoutState::CartOpen);
        assert!(store.view().last_cart().flatten().is_some());
    }
}
