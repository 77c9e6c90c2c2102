use bilete_core::Ticket;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiError, Result};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "referralCode")]
    pub referral_code: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, rename = "groupActive")]
    pub group_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct RegisterWire {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    error: Option<String>,
}

/// A ticket together with its QR payload, as shown to the holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketQr {
    pub ticket: Ticket,
    pub qr_code: String,
}

/// One row of the per-group ticket log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLog {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(default)]
    pub creator_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketLogs {
    pub group: String,
    pub count: usize,
    pub tickets: Vec<TicketLog>,
}

#[derive(Debug, Deserialize)]
struct TicketLogsWire {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    tickets: Vec<TicketLog>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketList {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedTicket {
    pub ticket: Ticket,
}

#[derive(Debug, Serialize)]
pub struct CreateTicketRequest<'a> {
    pub nume: &'a str,
    pub telefon: &'a str,
    pub tip_bilet: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SentUpdate {
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct TypeUpdate<'a> {
    pub tip_bilet: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyQrRequest<'a> {
    #[serde(rename = "qrData")]
    pub qr_data: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyPhoneRequest<'a> {
    #[serde(rename = "phoneNumber")]
    pub phone_number: &'a str,
}

/// A successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub ticket: Ticket,
    pub flagged: bool,
    pub warning: Option<String>,
    pub verification_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified(Verification),
    /// A phone lookup matched several tickets; verify one of them by id.
    Multiple { tickets: Vec<Ticket> },
}

#[derive(Debug, Deserialize)]
struct VerificationWire {
    #[serde(default)]
    ticket: Option<Ticket>,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    tickets: Vec<Ticket>,
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    warning: Option<String>,
    #[serde(default)]
    verification_count: Option<u32>,
}

impl TryFrom<VerificationWire> for VerificationOutcome {
    type Error = ApiError;

    fn try_from(wire: VerificationWire) -> Result<Self> {
        if wire.multiple && wire.tickets.len() > 1 {
            return Ok(VerificationOutcome::Multiple {
                tickets: wire.tickets,
            });
        }
        let ticket = wire
            .ticket
            .or_else(|| wire.tickets.into_iter().next())
            .ok_or_else(|| ApiError::Parse("verification response without ticket".to_string()))?;
        let verification_count = wire
            .verification_count
            .unwrap_or(ticket.verification_count);
        Ok(VerificationOutcome::Verified(Verification {
            ticket,
            flagged: wire.flagged,
            warning: wire.warning,
            verification_count,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes a JSON response body, turning error statuses into [`ApiError`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    ensure_success(status, body)?;
    serde_json::from_str(body).map_err(|err| ApiError::Parse(format!("invalid response: {err}")))
}

pub fn decode_verification(status: u16, body: &str) -> Result<VerificationOutcome> {
    let wire: VerificationWire = decode_response(status, body)?;
    wire.try_into()
}

/// Registration answers 2xx with `success: false` when the referral code is
/// refused, so the flag is checked as well as the status.
pub fn decode_registration(status: u16, body: &str) -> Result<LoginResponse> {
    let wire: RegisterWire = decode_response(status, body)?;
    match wire.token {
        Some(token) if wire.success => Ok(LoginResponse {
            token,
            user: wire.user,
        }),
        _ => Err(ApiError::Server {
            status,
            message: wire
                .error
                .unwrap_or_else(|| "registration failed".to_string()),
        }),
    }
}

pub fn decode_ticket_logs(group: &str, status: u16, body: &str) -> Result<TicketLogs> {
    let wire: TicketLogsWire = decode_response(status, body)?;
    Ok(TicketLogs {
        group: group.to_string(),
        count: wire.count.unwrap_or(wire.tickets.len()),
        tickets: wire.tickets,
    })
}

pub(crate) fn decode_ticket_list(status: u16, body: &str) -> Result<Vec<Ticket>> {
    let list: TicketList = decode_response(status, body)?;
    Ok(list.tickets)
}

/// For calls whose success body carries nothing the caller needs.
pub fn ensure_success(status: u16, body: &str) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.message))
        .unwrap_or_else(|| format!("server returned status {status}"));
    if status == 404 {
        return Err(ApiError::NotFound(message));
    }
    Err(ApiError::Server { status, message })
}
