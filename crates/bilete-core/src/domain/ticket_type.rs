use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Access tier printed on a ticket (`tip_bilet`).
///
/// Labels outside the known set are kept verbatim in [`TicketType::Other`]
/// so that records written by newer API versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketType {
    Bal,
    After,
    AfterVip,
    BalAfter,
    BalAfterVip,
    Other(String),
}

impl TicketType {
    pub const KNOWN: [TicketType; 5] = [
        TicketType::Bal,
        TicketType::After,
        TicketType::AfterVip,
        TicketType::BalAfter,
        TicketType::BalAfterVip,
    ];

    /// Exact, case-sensitive match against the known labels.
    pub fn from_label(label: &str) -> Self {
        match label {
            "BAL" => TicketType::Bal,
            "AFTER" => TicketType::After,
            "AFTER VIP" => TicketType::AfterVip,
            "BAL + AFTER" => TicketType::BalAfter,
            "BAL + AFTER VIP" => TicketType::BalAfterVip,
            other => TicketType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TicketType::Bal => "BAL",
            TicketType::After => "AFTER",
            TicketType::AfterVip => "AFTER VIP",
            TicketType::BalAfter => "BAL + AFTER",
            TicketType::BalAfterVip => "BAL + AFTER VIP",
            TicketType::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TicketType::Other(_))
    }
}

impl Default for TicketType {
    fn default() -> Self {
        TicketType::Other(String::new())
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TicketType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for TicketType {
    fn from(value: String) -> Self {
        match Self::from_label(&value) {
            TicketType::Other(_) => TicketType::Other(value),
            known => known,
        }
    }
}

impl From<TicketType> for String {
    fn from(value: TicketType) -> Self {
        match value {
            TicketType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TicketType;

    #[test]
    fn known_labels_round_trip() {
        for ticket_type in TicketType::KNOWN {
            assert_eq!(TicketType::from_label(ticket_type.label()), ticket_type);
            assert!(ticket_type.is_known());
        }
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(
            TicketType::from_label("bal"),
            TicketType::Other("bal".to_string())
        );
        assert_eq!(
            TicketType::from_label("BAL+AFTER"),
            TicketType::Other("BAL+AFTER".to_string())
        );
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&TicketType::BalAfterVip).unwrap();
        assert_eq!(json, "\"BAL + AFTER VIP\"");
        let parsed: TicketType = serde_json::from_str("\"VIP ONLY\"").unwrap();
        assert_eq!(parsed, TicketType::Other("VIP ONLY".to_string()));
    }
}
