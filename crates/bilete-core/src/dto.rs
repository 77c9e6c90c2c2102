use serde::{Deserialize, Serialize};

use crate::domain::Ticket;
use crate::filter::FilterCriteria;
use crate::pricing::TicketSummary;
use crate::view::{Page, ViewSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPageDto {
    pub criteria: FilterCriteria,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
    pub first_index: usize,
    pub items: Vec<Ticket>,
}

impl TicketPageDto {
    pub fn from_snapshot(snapshot: &ViewSnapshot<'_>, criteria: &FilterCriteria) -> Self {
        Self {
            criteria: criteria.clone(),
            current_page: snapshot.current_page,
            total_pages: snapshot.total_pages,
            total_filtered: snapshot.total_filtered,
            first_index: snapshot.first_index,
            items: snapshot.items.iter().map(|ticket| (*ticket).clone()).collect(),
        }
    }

    pub fn from_page(page: &Page<'_, &Ticket>, criteria: &FilterCriteria) -> Self {
        Self {
            criteria: criteria.clone(),
            current_page: page.page,
            total_pages: page.total_pages,
            total_filtered: page.total_items,
            first_index: page.first_index(),
            items: page.items.iter().map(|ticket| (*ticket).clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneCheckDto {
    pub input: String,
    pub normalized: String,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummaryDto {
    #[serde(flatten)]
    pub summary: TicketSummary,
    pub currency: String,
}
