use anyhow::{Context as _, Result};
use bilete_api::{Verification, VerificationOutcome};
use bilete_core::scan::{ScanDebouncer, ScanPayload};
use bilete_core::PhoneNumber;
use clap::{Args, Subcommand};
use std::io::{self, BufRead};
use std::time::Instant;
use tracing::{debug, warn};

use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{parse_ticket_id, status_label};

#[derive(Debug, Subcommand)]
pub enum VerifyCommand {
    /// Verify the text decoded from a ticket's QR code
    Qr(QrArgs),
    /// Verify the ticket registered to a phone number
    Phone(PhoneArgs),
    Id(IdArgs),
    /// Verify codes read line by line from stdin, e.g. from a handheld scanner
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
pub struct QrArgs {
    pub data: String,
}

#[derive(Debug, Args)]
pub struct PhoneArgs {
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Ignore a repeated code for this long; defaults to scan_debounce_ms
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

pub fn verify_qr(ctx: &Context<'_>, args: QrArgs) -> Result<()> {
    if args.data.trim().is_empty() {
        return Err(invalid_input("qr data cannot be empty"));
    }
    let payload = ScanPayload::from_decoded(&args.data);
    let outcome = ctx
        .api()?
        .verify_qr(payload.as_str())
        .with_context(|| "verify qr code")?;
    print_outcome(ctx, &outcome)
}

pub fn verify_phone(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let phone = PhoneNumber::parse(&args.phone)?;
    let outcome = ctx
        .api()?
        .verify_phone(phone.as_str())
        .with_context(|| format!("verify ticket for {phone}"))?;
    print_outcome(ctx, &outcome)
}

pub fn verify_id(ctx: &Context<'_>, args: IdArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let outcome = ctx
        .api()?
        .verify_id(&id)
        .with_context(|| format!("verify ticket {id}"))?;
    print_outcome(ctx, &outcome)
}

pub fn verify_scan(ctx: &Context<'_>, args: ScanArgs) -> Result<()> {
    let api = ctx.api()?;
    let mut scanner =
        ScanDebouncer::new(args.debounce_ms.unwrap_or(ctx.config.scan_debounce_ms));
    scanner.start();
    let started = Instant::now();

    for line in io::stdin().lock().lines() {
        let line = line.with_context(|| "read scanned code")?;
        let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let Some(payload) = scanner.accept(line.trim(), now_ms) else {
            debug!("repeated or empty scan skipped");
            continue;
        };
        match api.verify_qr(payload.as_str()) {
            Ok(outcome) => print_outcome(ctx, &outcome)?,
            Err(err) => warn!(error = %err, "scan rejected"),
        }
    }

    scanner.stop();
    Ok(())
}

fn print_outcome(ctx: &Context<'_>, outcome: &VerificationOutcome) -> Result<()> {
    if ctx.json {
        return print_json(outcome);
    }
    match outcome {
        VerificationOutcome::Verified(verification) => print_verification(verification),
        VerificationOutcome::Multiple { tickets } => {
            println!("{} tickets match this phone number:", tickets.len());
            for ticket in tickets {
                println!(
                    "  {}  {}  [{}]  {}",
                    ticket.id,
                    ticket.nume,
                    ticket.tip_bilet,
                    status_label(ticket)
                );
            }
            println!("verify one with `bilete verify id <ID>`");
        }
    }
    Ok(())
}

fn print_verification(verification: &Verification) {
    let ticket = &verification.ticket;
    println!(
        "verified {}  {}  [{}]  check-in #{}",
        ticket.id, ticket.nume, ticket.tip_bilet, verification.verification_count
    );
    if verification.flagged {
        let warning = verification
            .warning
            .as_deref()
            .unwrap_or("ticket was already verified");
        println!("FLAGGED: {warning}");
    }
}
