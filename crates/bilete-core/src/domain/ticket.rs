use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::TicketId;
use crate::domain::ticket_type::TicketType;
use crate::error::CoreError;

/// A ticket as returned by the ticket API.
///
/// Only `id` is required when decoding; every other field falls back to its
/// default so partially loaded records still filter and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketWire")]
pub struct Ticket {
    pub id: TicketId,
    pub nume: String,
    pub telefon: String,
    pub tip_bilet: TicketType,
    pub group: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub verification_count: u32,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub flagged: bool,
}

impl Ticket {
    pub fn new(id: TicketId, nume: &str, telefon: &str, tip_bilet: TicketType) -> Self {
        Self {
            id,
            nume: nume.to_string(),
            telefon: telefon.to_string(),
            tip_bilet,
            group: None,
            created_at: None,
            verified: false,
            verification_count: 0,
            sent: false,
            sent_at: None,
            qr_code: None,
            flagged: false,
        }
    }
}

// The API is backed by a document store and may send `_id`, `id`, or both.
// Records written by older clients carry loosely typed fields; a value that
// does not fit is dropped rather than failing the whole list.
#[derive(Deserialize)]
struct TicketWire {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient::text")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    nume: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    telefon: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    tip_bilet: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    group: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::flag")]
    verified: Option<bool>,
    #[serde(default, deserialize_with = "lenient::count")]
    verification_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::flag")]
    sent: Option<bool>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    sent_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::text")]
    qr_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    flagged: Option<bool>,
}

mod lenient {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(value)) => Some(value),
            Some(Value::Number(value)) => Some(value.to_string()),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(value)) => Some(value),
            Some(Value::Number(value)) => value.as_i64().map(|n| n != 0),
            Some(Value::String(value)) => match value.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(value)) => value.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(value)) => value.trim().parse().ok(),
            _ => None,
        })
    }

    /// RFC 3339, a zone-less `YYYY-MM-DD HH:MM:SS` read as UTC, or epoch
    /// milliseconds.
    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(value)) => parse_timestamp(&value),
            Some(Value::Number(value)) => value.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        })
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}

impl TryFrom<TicketWire> for Ticket {
    type Error = CoreError;

    fn try_from(wire: TicketWire) -> Result<Self, Self::Error> {
        let raw_id = wire
            .object_id
            .or(wire.id)
            .ok_or(CoreError::MissingTicketId)?;
        Ok(Self {
            id: TicketId::new(&raw_id)?,
            nume: wire.nume.unwrap_or_default(),
            telefon: wire.telefon.unwrap_or_default(),
            tip_bilet: wire.tip_bilet.map(TicketType::from).unwrap_or_default(),
            group: wire.group,
            created_at: wire.created_at,
            verified: wire.verified.unwrap_or(false),
            verification_count: wire.verification_count.unwrap_or(0),
            sent: wire.sent.unwrap_or(false),
            sent_at: wire.sent_at,
            qr_code: wire.qr_code,
            flagged: wire.flagged.unwrap_or(false),
        })
    }
}
