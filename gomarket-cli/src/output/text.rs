//! Text output formatting with optional colors.

use gomarket_core::{Cart, Product};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";

const RULE_WIDTH: usize = 48;
const TITLE_WIDTH: usize = 20;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the whole cart: header, one row per line item, total.
    pub fn format_cart(&self, cart: &Cart) -> String {
        if cart.is_empty() {
            return self.dim("Cart is empty");
        }

        let mut lines = Vec::with_capacity(cart.len() + 4);
        let units = cart.total_quantity();
        lines.push(format!(
            "{} ({} {}, {} {})",
            self.bold("Cart"),
            cart.len(),
            plural(cart.len() as u64, "item", "items"),
            units,
            plural(units, "unit", "units"),
        ));
        lines.push("─".repeat(RULE_WIDTH));
        lines.extend(cart.iter().map(|product| self.format_line(product)));
        lines.push("─".repeat(RULE_WIDTH));
        lines.push(format!(
            "{:<33}{:>10}",
            self.bold("Total"),
            self.green(&format_price(cart.total_price()))
        ));
        lines.join("\n")
    }

    /// Formats a single line item: quantity, title, unit price, line price, id.
    pub fn format_line(&self, product: &Product) -> String {
        format!(
            "{:>4} × {:<width$} {:>9} {:>10}  {}",
            product.quantity,
            truncate(&product.title, TITLE_WIDTH),
            format_price(product.price),
            format_price(product.line_total()),
            self.dim(&product.id),
            width = TITLE_WIDTH,
        )
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Formats an amount as dollars with two decimals.
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

fn plural<'a>(count: u64, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
