use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{Ticket, TicketType};
use crate::filter::parser::looks_like_selector;
use crate::filter::FilterParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Verified,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, verified: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Verified => verified,
            StatusFilter::Pending => !verified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Verified => "verified",
            StatusFilter::Pending => "pending",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "verified" => Ok(StatusFilter::Verified),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(FilterParseError::InvalidStatusSelector(s.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentFilter {
    #[default]
    All,
    Sent,
    NotSent,
}

impl SentFilter {
    pub fn matches(self, sent: bool) -> bool {
        match self {
            SentFilter::All => true,
            SentFilter::Sent => sent,
            SentFilter::NotSent => !sent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentFilter::All => "all",
            SentFilter::Sent => "sent",
            SentFilter::NotSent => "not-sent",
        }
    }
}

impl FromStr for SentFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SentFilter::All),
            "sent" => Ok(SentFilter::Sent),
            "not-sent" => Ok(SentFilter::NotSent),
            _ => Err(FilterParseError::InvalidSentSelector(s.to_string())),
        }
    }
}

impl fmt::Display for SentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeFilter {
    #[default]
    All,
    Only(TicketType),
}

impl TypeFilter {
    pub fn matches(&self, ticket_type: &TicketType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == ticket_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(FilterParseError::EmptyType),
            "all" => Ok(TypeFilter::All),
            label => Ok(TypeFilter::Only(TicketType::from_label(label))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub status: StatusFilter,
    pub sent: SentFilter,
    pub ticket_type: TypeFilter,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.status == StatusFilter::All
            && self.sent == SentFilter::All
            && self.ticket_type == TypeFilter::All
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        Matcher::new(self).matches(ticket)
    }

    /// Renders the criteria back into the query syntax accepted by
    /// [`crate::filter::parse_filter`].
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();
        parts.extend(self.search_term.split_whitespace().map(|word| {
            if looks_like_selector(word) {
                format!("\"{word}\"")
            } else {
                word.to_string()
            }
        }));
        if self.status != StatusFilter::All {
            parts.push(format!("status:{}", self.status));
        }
        if self.sent != SentFilter::All {
            parts.push(format!("sent:{}", self.sent));
        }
        if let TypeFilter::Only(ticket_type) = &self.ticket_type {
            let label = ticket_type.label();
            if label.contains(char::is_whitespace) {
                parts.push(format!("type:\"{label}\""));
            } else {
                parts.push(format!("type:{label}"));
            }
        }
        parts.join(" ")
    }
}

struct Matcher<'a> {
    needle: String,
    criteria: &'a FilterCriteria,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            needle: criteria.search_term.trim().to_lowercase(),
            criteria,
        }
    }

    fn matches(&self, ticket: &Ticket) -> bool {
        self.matches_search(ticket)
            && self.criteria.status.matches(ticket.verified)
            && self.criteria.sent.matches(ticket.sent)
            && self.criteria.ticket_type.matches(&ticket.tip_bilet)
    }

    fn matches_search(&self, ticket: &Ticket) -> bool {
        self.needle.is_empty()
            || ticket.nume.to_lowercase().contains(&self.needle)
            || ticket.telefon.to_lowercase().contains(&self.needle)
    }
}

/// Keeps the tickets matching every active criterion, in input order.
pub fn apply_filters<'a>(all: &'a [Ticket], criteria: &FilterCriteria) -> Vec<&'a Ticket> {
    let matcher = Matcher::new(criteria);
    all.iter().filter(|ticket| matcher.matches(ticket)).collect()
}
