use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use super::ingredients::IngredientType;

new_key_type! {
    /// Handle to an order pinned on the [`OrderBoard`].
    pub struct OrderId;
}

/// Extra attribute an order places on one layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Requirement {
    /// Basic ingredients and sauces.
    None,
    /// Target piece count for tomato, pickle and onion layers.
    Amount(u32),
    /// Acceptable mean roast time for a patty, inclusive on both ends.
    CookWindow { start: f32, end: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub ingredient: IngredientType,
    pub requirement: Requirement,
}

impl OrderEntry {
    pub fn basic(ingredient: IngredientType) -> Self {
        Self { ingredient, requirement: Requirement::None }
    }

    pub fn multi(ingredient: IngredientType, amount: u32) -> Self {
        Self { ingredient, requirement: Requirement::Amount(amount) }
    }

    pub fn sauce(ingredient: IngredientType) -> Self {
        Self { ingredient, requirement: Requirement::None }
    }

    pub fn patty(start: f32, end: f32) -> Self {
        Self {
            ingredient: IngredientType::Patty,
            requirement: Requirement::CookWindow { start, end },
        }
    }
}

/// Receipt header printed above the layer list. Display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub burger_name: String,
    pub burger_price: f32,
    pub taxes: f32,
    pub total_price: f32,
}

/// A recipe as authored: layers listed top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub entries: Vec<OrderEntry>,
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

impl Order {
    pub fn new(entries: Vec<OrderEntry>) -> Self {
        Self { entries, ticket: None }
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// The layers a delivered stack is compared against: bottom to top, with
    /// the bottom bun dropped because every stack already stands on one.
    pub fn scoring_view(&self) -> Vec<&OrderEntry> {
        let mut view: Vec<&OrderEntry> = self.entries.iter().rev().collect();
        if view.first().is_some_and(|e| e.ingredient == IngredientType::BottomBun) {
            view.remove(0);
        }
        view
    }

    /// Printed receipt: the burger line from the ticket, the layer list and
    /// the totals. Orders without a ticket print only their layers.
    pub fn receipt(&self) -> String {
        let Some(ticket) = &self.ticket else {
            return self.to_string();
        };
        format!(
            "1  {}  ${:.2}\n{}SUBTOTAL:   ${:.2}\nTAX:        ${:.2}\nTOTAL:      ${:.2}\n",
            ticket.burger_name, ticket.burger_price, self, ticket.burger_price, ticket.taxes, ticket.total_price
        )
    }
}

impl fmt::Display for Order {
    /// Ticket body: one ` - Name` line per layer, top to bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, " - {}", entry.ingredient.display_name())?;
            match entry.requirement {
                Requirement::Amount(amount) => write!(f, " ({amount})")?,
                Requirement::CookWindow { .. } => write!(f, " (Medium)")?,
                Requirement::None => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fixed set of slots orders are pinned to while they wait to be served.
pub struct OrderBoard {
    slots: Vec<Option<OrderId>>,
    orders: SlotMap<OrderId, Order>,
}

impl OrderBoard {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            orders: SlotMap::with_key(),
        }
    }

    /// First empty slot, if any.
    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Pin an order in the first free slot. Returns `None` when the board is full.
    pub fn post(&mut self, order: Order) -> Option<OrderId> {
        let slot = self.free_slot()?;
        let id = self.orders.insert(order);
        self.slots[slot] = Some(id);
        log::debug!("order posted in slot {slot}");
        Some(id)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Remove an order from the board, freeing its slot.
    pub fn take(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.remove(id)?;
        if let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(id)) {
            *slot = None;
        }
        Some(order)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderId, &Order)> {
        self.slots
            .iter()
            .flatten()
            .filter_map(|&id| self.orders.get(id).map(|o| (id, o)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use IngredientType::*;

    fn classic() -> Order {
        Order::new(vec![
            OrderEntry::basic(TopBun),
            OrderEntry::multi(Tomato, 3),
            OrderEntry::patty(4.0, 7.0),
            OrderEntry::sauce(SauceRed),
            OrderEntry::basic(BottomBun),
        ])
    }

    #[test]
    fn test_scoring_view_reverses_and_strips_bottom_bun() {
        let order = classic();
        let view: Vec<IngredientType> = order.scoring_view().iter().map(|e| e.ingredient).collect();
        assert_eq!(view, vec![SauceRed, Patty, Tomato, TopBun]);
        // The authored order is untouched.
        assert_eq!(order.entries[0].ingredient, TopBun);
    }

    #[test]
    fn test_scoring_view_without_bottom_bun() {
        let order = Order::new(vec![OrderEntry::basic(TopBun), OrderEntry::basic(Cheese)]);
        let view: Vec<IngredientType> = order.scoring_view().iter().map(|e| e.ingredient).collect();
        assert_eq!(view, vec![Cheese, TopBun]);
    }

    #[test]
    fn test_scoring_view_empty_order() {
        assert!(Order::default().scoring_view().is_empty());
        let only_base = Order::new(vec![OrderEntry::basic(BottomBun)]);
        assert!(only_base.scoring_view().is_empty());
    }

    #[test]
    fn test_ticket_formatting() {
        let text = classic().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            " - Top Bun",
            " - Tomato (3)",
            " - Patty (Medium)",
            " - Red Sauce",
            " - Bottom Bun",
        ]);
    }

    #[test]
    fn test_receipt_prints_ticket_totals() {
        let order = Order::new(vec![OrderEntry::basic(TopBun), OrderEntry::basic(Cheese)]).with_ticket(Ticket {
            burger_name: "Cheeseburger".into(),
            burger_price: 6.5,
            taxes: 0.65,
            total_price: 7.15,
        });
        let receipt = order.receipt();
        let lines: Vec<&str> = receipt.lines().collect();
        assert_eq!(lines, vec![
            "1  Cheeseburger  $6.50",
            " - Top Bun",
            " - Cheese",
            "SUBTOTAL:   $6.50",
            "TAX:        $0.65",
            "TOTAL:      $7.15",
        ]);
    }

    #[test]
    fn test_receipt_without_ticket_is_layer_list() {
        assert_eq!(classic().receipt(), classic().to_string());
    }

    #[test]
    fn test_board_fills_first_free_slot() {
        let mut board = OrderBoard::new(2);
        let a = board.post(classic()).unwrap();
        let b = board.post(classic()).unwrap();
        assert!(board.post(classic()).is_none(), "board should be full");
        assert_eq!(board.len(), 2);

        assert!(board.take(a).is_some());
        assert_eq!(board.free_slot(), Some(0));
        let c = board.post(classic()).unwrap();
        let ids: Vec<OrderId> = board.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![c, b]);
    }

    #[test]
    fn test_board_take_unknown() {
        let mut board = OrderBoard::new(1);
        let id = board.post(classic()).unwrap();
        assert!(board.take(id).is_some());
        assert!(board.take(id).is_none());
        assert!(board.is_empty());
    }
}
