//! Terminal rendering of the storefront view port

use std::io::{self, Write};

use colored::Colorize;
use storefront_core::{
    format_price, CartView, CategorySection, Decimal, NotificationKind, PricedLine, ViewPort,
};

/// Writes the storefront as plain text. The first write error is kept and
/// later writes are skipped; check it with [`TerminalView::finish`].
pub struct TerminalView<W: Write> {
    out: W,
    currency_symbol: String,
    error: Option<io::Error>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, currency_symbol: impl Into<String>) -> Self {
        TerminalView {
            out,
            currency_symbol: currency_symbol.into(),
            error: None,
        }
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn price(&self, amount: Decimal) -> String {
        format_price(amount, &self.currency_symbol)
    }

    fn write_block(&mut self, text: String) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            self.error = Some(e);
        }
    }

    fn format_lines(&self, lines: &[PricedLine], total: Decimal) -> String {
        let mut text = String::new();
        for line in lines {
            text.push_str(&format!(
                "  {} x {:<24} {:>10}\n",
                line.quantity,
                line.name,
                self.price(line.line_total)
            ));
        }
        text.push_str(&format!(
            "  {:<28} {:>10}\n",
            "Total price:".bold(),
            self.price(total).bold()
        ));
        text
    }
}

impl<W: Write> ViewPort for TerminalView<W> {
    fn render_catalog(&mut self, sections: &[CategorySection<'_>]) {
        let mut text = String::new();
        for section in sections {
            text.push_str(&format!("{}\n", section.title.bold().underline()));
            for item in &section.items {
                text.push_str(&format!(
                    "  [{}] {:<24} {:>10}\n",
                    item.id,
                    item.name,
                    self.price(item.price)
                ));
                if !item.ingredients.is_empty() {
                    text.push_str(&format!(
                        "      {}\n",
                        item.ingredients.join(", ").dimmed()
                    ));
                }
            }
            text.push('\n');
        }
        self.write_block(text);
    }

    fn render_cart(&mut self, cart: Option<&CartView>) {
        let text = match cart {
            None => format!("{}\n", "Your order is empty".dimmed()),
            Some(cart) => format!(
                "{}\n{}",
                "Your order".bold(),
                self.format_lines(&cart.lines, cart.total)
            ),
        };
        self.write_block(text);
    }

    fn render_payment_prompt(&mut self, total: Decimal) {
        let text = format!(
            "{} amount due {}\n",
            "Enter card details:".bold(),
            self.price(total)
        );
        self.write_block(text);
    }

    fn render_confirmation(&mut self, customer_name: &str, lines: &[PricedLine], total: Decimal) {
        let text = format!(
            "{}\n{}",
            format!("Order confirmed for {}", customer_name).green().bold(),
            self.format_lines(lines, total)
        );
        self.write_block(text);
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        let text = match kind {
            NotificationKind::Success => format!("{} {}\n", "✔".green(), message.green()),
            NotificationKind::Error => format!("{} {}\n", "✖".red(), message.red()),
            NotificationKind::Info => format!("{} {}\n", "•".cyan(), message),
        };
        self.write_block(text);
    }
}
