use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Ticket, TicketType};

/// Price per ticket type, in lei. Types missing from the table cost 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    prices: BTreeMap<String, u64>,
}

impl Default for PriceTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_price(&TicketType::Bal, 60);
        table.set_price(&TicketType::After, 120);
        table.set_price(&TicketType::AfterVip, 120);
        table.set_price(&TicketType::BalAfter, 160);
        table.set_price(&TicketType::BalAfterVip, 160);
        table
    }
}

impl PriceTable {
    pub fn empty() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    pub fn set_price(&mut self, ticket_type: &TicketType, price: u64) {
        self.prices.insert(ticket_type.label().to_string(), price);
    }

    pub fn price_of(&self, ticket_type: &TicketType) -> u64 {
        self.prices.get(ticket_type.label()).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.prices.iter().map(|(label, price)| (label.as_str(), *price))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketSummary {
    pub count: usize,
    pub total_cost: u64,
}

pub fn summarize(all: &[Ticket], prices: &PriceTable) -> TicketSummary {
    TicketSummary {
        count: all.len(),
        total_cost: all
            .iter()
            .map(|ticket| prices.price_of(&ticket.tip_bilet))
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::{summarize, PriceTable, TicketSummary};
    use crate::domain::{Ticket, TicketId, TicketType};

    fn ticket(id: &str, tip: TicketType) -> Ticket {
        Ticket::new(TicketId::new(id).unwrap(), "Ana", "0712345678", tip)
    }

    #[test]
    fn empty_collection_costs_nothing() {
        assert_eq!(
            summarize(&[], &PriceTable::default()),
            TicketSummary {
                count: 0,
                total_cost: 0
            }
        );
    }

    #[test]
    fn sums_default_prices() {
        let tickets = vec![
            ticket("1", TicketType::Bal),
            ticket("2", TicketType::After),
            ticket("3", TicketType::After),
        ];
        let summary = summarize(&tickets, &PriceTable::default());
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_cost, 300);
    }

    #[test]
    fn unknown_types_are_unpriced() {
        let tickets = vec![
            ticket("1", TicketType::BalAfterVip),
            ticket("2", TicketType::Other("VIP ONLY".to_string())),
            ticket("3", TicketType::default()),
        ];
        let summary = summarize(&tickets, &PriceTable::default());
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_cost, 160);
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut prices = PriceTable::default();
        prices.set_price(&TicketType::AfterVip, 150);
        assert_eq!(prices.price_of(&TicketType::AfterVip), 150);
        assert_eq!(prices.price_of(&TicketType::After), 120);
    }
}
