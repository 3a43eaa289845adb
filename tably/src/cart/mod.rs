//! Cart engine
//!
//! Client-local, in-memory construction of an order candidate. Nothing
//! here touches the store; the cart lives with the customer session and
//! dies with it (tab close, or clear after submission).
//!
//! Merge rules:
//! - plain adds of the same item merge into one line by quantity
//! - customized adds NEVER merge, even when the selections are identical

use chrono::Utc;
use shared::models::{Customization, MenuItem, Order, OrderLine};

/// One distinct orderable configuration with a quantity
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Distinguishes otherwise-identical lines carrying different
    /// customizations; derived from (item id, creation instant, counter)
    /// so rapid repeated adds stay unique.
    pub unique_id: String,
    /// Source menu item id
    pub item_id: String,
    pub name: String,
    /// Effective unit price: base price + customization deltas
    pub price: f64,
    pub quantity: u32,
    pub customizations: Vec<Customization>,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    fn is_plain(&self) -> bool {
        self.customizations.is_empty()
    }
}

/// Outcome of a quantity mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Updated,
    /// The line hit zero and was removed
    LineRemoved,
    /// The last line was removed; the cart-review view should close
    CartEmptied,
    /// No line with that id
    NotFound,
}

/// The customer's in-progress order
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_unique_id(&mut self, item_id: &str) -> String {
        let seq = self.next_line;
        self.next_line += 1;
        format!("{}-{}-{}", item_id, Utc::now().timestamp_millis(), seq)
    }

    /// Add one of an uncustomized item. An existing plain line for the
    /// same item absorbs the add; otherwise a new line is created.
    pub fn add_simple(&mut self, item: &MenuItem) -> &CartLine {
        if let Some(idx) = self
            .lines
            .iter()
            .position(|line| line.item_id == item.id && line.is_plain())
        {
            self.lines[idx].quantity += 1;
            return &self.lines[idx];
        }
        let unique_id = self.new_unique_id(&item.id);
        self.lines.push(CartLine {
            unique_id,
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            customizations: Vec::new(),
        });
        self.lines.last().expect("just pushed")
    }

    /// Add a customized configuration as its own line. Free-text notes
    /// fold in as a zero-delta pseudo-customization so they travel with
    /// the order snapshot.
    pub fn add_customized(
        &mut self,
        item: &MenuItem,
        mut customizations: Vec<Customization>,
        notes: Option<&str>,
    ) -> &CartLine {
        let delta: f64 = customizations.iter().map(|c| c.price_adjustment).sum();
        if let Some(text) = notes.filter(|t| !t.trim().is_empty()) {
            customizations.push(Customization::note(text.trim()));
        }
        let unique_id = self.new_unique_id(&item.id);
        self.lines.push(CartLine {
            unique_id,
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price + delta,
            quantity: 1,
            customizations,
        });
        self.lines.last().expect("just pushed")
    }

    /// Adjust a line's quantity by a signed delta; the line is removed
    /// when it reaches zero or below.
    pub fn update_quantity(&mut self, unique_id: &str, delta: i32) -> QuantityChange {
        let Some(idx) = self.lines.iter().position(|l| l.unique_id == unique_id) else {
            return QuantityChange::NotFound;
        };
        let line = &mut self.lines[idx];
        let next = line.quantity as i64 + delta as i64;
        if next <= 0 {
            self.lines.remove(idx);
            if self.lines.is_empty() {
                QuantityChange::CartEmptied
            } else {
                QuantityChange::LineRemoved
            }
        } else {
            line.quantity = next as u32;
            QuantityChange::Updated
        }
    }

    /// Unconditional line delete
    pub fn remove_line(&mut self, unique_id: &str) {
        self.lines.retain(|l| l.unique_id != unique_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Σ(unit price × quantity)
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Σ quantity, for the cart badge
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Freeze the cart into order lines for submission
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                id: line.item_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                price: line.price,
                customizations: line.customizations.clone(),
            })
            .collect()
    }

    /// Rebuild a cart from a previous order's frozen lines, at their
    /// historical prices (the "Reorder" action).
    pub fn from_order(order: &Order) -> Self {
        let mut cart = Self::new();
        for line in &order.items {
            let unique_id = cart.new_unique_id(&line.id);
            cart.lines.push(CartLine {
                unique_id,
                item_id: line.id.clone(),
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
                customizations: line.customizations.clone(),
            });
        }
        cart
    }
}
