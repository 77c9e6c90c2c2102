//! Client-side ticket table: filtering, pagination and the view state that
//! ties them together.

use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

use crate::domain::{Ticket, TicketId, TicketType};
use crate::error::CoreError;
use crate::filter::{apply_filters, FilterCriteria};
use crate::pricing::{summarize, PriceTable, TicketSummary};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 50;
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Zero-based position of the first item within the full list.
    pub fn first_index(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// One-based inclusive bounds of the shown items, for "showing a-b of n".
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = self.first_index() + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// Number of pages needed for `len` items; never less than one.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    len.div_ceil(per_page).max(1)
}

/// Slices out page `page` (one-based). Pages outside the list, including
/// page 0, come back empty; the page number itself is not clamped.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), per_page);
    let slice = if page == 0 || per_page == 0 {
        &items[..0]
    } else {
        let start = (page - 1).saturating_mul(per_page);
        if start >= items.len() {
            &items[..0]
        } else {
            let end = start.saturating_add(per_page).min(items.len());
            &items[start..end]
        }
    };

    Page {
        items: slice,
        page,
        per_page,
        total_pages,
        total_items: items.len(),
    }
}

/// Page numbers to offer around `current`, at most `max_visible` of them.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> RangeInclusive<usize> {
    let total = total.max(1);
    let max_visible = max_visible.max(1);
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end - start < max_visible - 1 {
        start = end.saturating_sub(max_visible - 1).max(1);
    }
    start..=end
}

/// What a renderer needs to draw the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot<'a> {
    pub items: Vec<&'a Ticket>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
    pub first_index: usize,
}

impl ViewSnapshot<'_> {
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = self.first_index + 1;
        Some((first, first + self.items.len() - 1))
    }

    pub fn page_window(&self) -> RangeInclusive<usize> {
        page_window(self.current_page, self.total_pages, MAX_VISIBLE_PAGES)
    }
}

/// Caller-owned state of a ticket table session.
///
/// Changing the criteria always returns to page 1. Page moves never touch the
/// criteria. Editing a ticket in place keeps both, and the next snapshot is
/// derived from the edited collection.
#[derive(Debug, Clone)]
pub struct TicketListView {
    tickets: Vec<Ticket>,
    criteria: FilterCriteria,
    current_page: usize,
    items_per_page: usize,
}

impl TicketListView {
    pub fn new(items_per_page: usize) -> Result<Self, CoreError> {
        if items_per_page == 0 {
            return Err(CoreError::InvalidItemsPerPage(items_per_page));
        }
        Ok(Self {
            tickets: Vec::new(),
            criteria: FilterCriteria::default(),
            current_page: 1,
            items_per_page,
        })
    }

    pub fn with_tickets(tickets: Vec<Ticket>, items_per_page: usize) -> Result<Self, CoreError> {
        let mut view = Self::new(items_per_page)?;
        view.tickets = tickets;
        Ok(view)
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Swaps in a freshly fetched collection and starts over from page 1.
    pub fn replace_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.current_page = 1;
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.current_page = 1;
    }

    pub fn clear_criteria(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn filtered(&self) -> Vec<&Ticket> {
        apply_filters(&self.tickets, &self.criteria)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.items_per_page)
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.current_page, self.items_per_page);
        ViewSnapshot {
            items: page.items.to_vec(),
            current_page: self.current_page,
            total_pages: page.total_pages,
            total_filtered: page.total_items,
            first_index: page.first_index(),
        }
    }

    pub fn summary(&self, prices: &PriceTable) -> TicketSummary {
        summarize(&self.tickets, prices)
    }

    pub fn next_page(&mut self) -> bool {
        let before = self.current_page;
        self.go_to_page(before.saturating_add(1));
        self.current_page != before
    }

    pub fn prev_page(&mut self) -> bool {
        let before = self.current_page;
        self.go_to_page(before.saturating_sub(1));
        self.current_page != before
    }

    /// Moves to `page`, clamped to the pages that currently exist.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    pub fn find(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| &ticket.id == id)
    }

    pub fn update_ticket<F>(&mut self, id: &TicketId, update: F) -> bool
    where
        F: FnOnce(&mut Ticket),
    {
        match self.tickets.iter_mut().find(|ticket| &ticket.id == id) {
            Some(ticket) => {
                update(ticket);
                true
            }
            None => false,
        }
    }

    pub fn mark_sent(&mut self, id: &TicketId, sent: bool, at: DateTime<Utc>) -> bool {
        self.update_ticket(id, |ticket| {
            ticket.sent = sent;
            ticket.sent_at = sent.then_some(at);
        })
    }

    pub fn record_verification(
        &mut self,
        id: &TicketId,
        verified: bool,
        verification_count: u32,
        flagged: bool,
    ) -> bool {
        self.update_ticket(id, |ticket| {
            ticket.verified = verified;
            ticket.verification_count = verification_count;
            ticket.flagged = flagged;
        })
    }

    pub fn set_ticket_type(&mut self, id: &TicketId, ticket_type: TicketType) -> bool {
        self.update_ticket(id, |ticket| ticket.tip_bilet = ticket_type)
    }

    /// Drops a ticket. The criteria stay, and the page is pulled back if the
    /// removal emptied the last one.
    pub fn remove_ticket(&mut self, id: &TicketId) -> Option<Ticket> {
        let pos = self.tickets.iter().position(|ticket| &ticket.id == id)?;
        let removed = self.tickets.remove(pos);
        let last = self.total_pages();
        if self.current_page > last {
            self.current_page = last;
        }
        Some(removed)
    }
}
