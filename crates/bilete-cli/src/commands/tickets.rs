use anyhow::{Context as _, Result};
use bilete_core::filter::{SentFilter, StatusFilter, TypeFilter};
use bilete_core::share::{ticket_message, ticket_public_link, ticket_whatsapp_link};
use bilete_core::{
    apply_filters, paginate, parse_filter, summarize, FilterCriteria, Ticket, TicketId,
    TicketPageDto, TicketSummaryDto,
};
use clap::{ArgAction, Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use crate::commands::{print_json, Context, CURRENCY};
use crate::error::{invalid_input, not_found};
use crate::util::{format_datetime, parse_known_type, parse_ticket_id, sent_label, status_label};

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// Filter tickets and print one page
    List(ListArgs),
    /// Count tickets and total their value
    Summary(SummaryArgs),
    Show(ShowArgs),
    Create(CreateArgs),
    #[command(name = "mark-sent")]
    MarkSent(MarkSentArgs),
    #[command(name = "set-type")]
    SetType(SetTypeArgs),
    Delete(DeleteArgs),
    /// Print the WhatsApp link that sends a ticket to its holder
    Share(ShareArgs),
    /// Show a ticket's QR code or save the rendered ticket image
    Qr(QrArgs),
    /// List the tickets sold by a group (administrators only)
    Logs(LogsArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Read an exported ticket list instead of calling the API
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub search: Option<String>,
    /// all, verified or pending
    #[arg(long)]
    pub status: Option<String>,
    /// all, sent or not-sent
    #[arg(long)]
    pub sent: Option<String>,
    #[arg(long = "type")]
    pub ticket_type: Option<String>,
    /// Filter query, e.g. `ana status:pending type:"BAL + AFTER"`
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub per_page: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long = "type")]
    pub ticket_type: String,
}

#[derive(Debug, Args)]
pub struct MarkSentArgs {
    pub id: String,
    /// Clear the sent flag instead of setting it
    #[arg(long, action = ArgAction::SetTrue)]
    pub unsent: bool,
}

#[derive(Debug, Args)]
pub struct SetTypeArgs {
    pub id: String,
    #[arg(value_name = "TYPE")]
    pub ticket_type: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    pub id: String,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QrArgs {
    pub id: String,
    /// Save the rendered ticket image here instead of printing the QR data
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    pub group: String,
}

#[derive(Debug, Serialize)]
struct ShareDto {
    id: TicketId,
    public_link: String,
    whatsapp_link: String,
    message: String,
}

fn criteria_from_args(args: &ListArgs) -> Result<FilterCriteria> {
    let mut criteria = match args.query.as_deref() {
        Some(query) => parse_filter(query)?,
        None => FilterCriteria::default(),
    };
    if let Some(search) = &args.search {
        criteria.search_term = search.clone();
    }
    if let Some(status) = &args.status {
        criteria.status = status.parse::<StatusFilter>()?;
    }
    if let Some(sent) = &args.sent {
        criteria.sent = sent.parse::<SentFilter>()?;
    }
    if let Some(ticket_type) = &args.ticket_type {
        criteria.ticket_type = ticket_type.parse::<TypeFilter>()?;
    }
    Ok(criteria)
}

pub fn list_tickets(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let criteria = criteria_from_args(&args)?;
    if args.page == 0 {
        return Err(invalid_input("page numbers start at 1"));
    }
    let per_page = args.per_page.unwrap_or(ctx.config.items_per_page);
    if per_page == 0 {
        return Err(invalid_input("per-page must be at least 1"));
    }

    let tickets = ctx.load_tickets(args.file.as_deref())?;
    let filtered = apply_filters(&tickets, &criteria);
    let page = paginate(&filtered, args.page, per_page);

    if ctx.json {
        return print_json(&TicketPageDto::from_page(&page, &criteria));
    }

    if page.total_items == 0 {
        println!("no tickets");
        return Ok(());
    }
    let Some((first, last)) = page.shown_range() else {
        println!(
            "no tickets on page {} (last page is {})",
            page.page, page.total_pages
        );
        return Ok(());
    };

    for ticket in page.items {
        println!(
            "{}  {}  {}  [{}]  {}  {}",
            ticket.id,
            ticket.nume,
            ticket.telefon,
            ticket.tip_bilet,
            status_label(ticket),
            sent_label(ticket.sent)
        );
    }
    println!(
        "page {}/{}  showing {}-{} of {}",
        page.page, page.total_pages, first, last, page.total_items
    );
    Ok(())
}

pub fn summary(ctx: &Context<'_>, args: SummaryArgs) -> Result<()> {
    let tickets = ctx.load_tickets(args.file.as_deref())?;
    let dto = TicketSummaryDto {
        summary: summarize(&tickets, &ctx.config.prices),
        currency: CURRENCY.to_string(),
    };
    if ctx.json {
        return print_json(&dto);
    }
    println!(
        "{} tickets, total {} {}",
        dto.summary.count, dto.summary.total_cost, dto.currency
    );
    Ok(())
}

fn find_ticket(ctx: &Context<'_>, id: &TicketId, file: Option<PathBuf>) -> Result<Ticket> {
    match file {
        Some(path) => ctx
            .load_tickets(Some(&path))?
            .into_iter()
            .find(|ticket| &ticket.id == id)
            .ok_or_else(|| not_found(format!("ticket {id}"))),
        None => ctx
            .api()?
            .get_ticket(id)
            .with_context(|| format!("fetch ticket {id}")),
    }
}

pub fn show_ticket(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let ticket = find_ticket(ctx, &id, args.file)?;
    if ctx.json {
        return print_json(&ticket);
    }

    println!("id: {}", ticket.id);
    println!("name: {}", ticket.nume);
    println!("phone: {}", ticket.telefon);
    println!("type: {}", ticket.tip_bilet);
    if let Some(group) = &ticket.group {
        println!("group: {group}");
    }
    println!("created: {}", format_datetime(ticket.created_at));
    println!("status: {}", status_label(&ticket));
    if ticket.flagged {
        println!("flagged: yes");
    }
    println!("{}: {}", sent_label(ticket.sent), format_datetime(ticket.sent_at));
    Ok(())
}

pub fn create_ticket(ctx: &Context<'_>, args: CreateArgs) -> Result<()> {
    let ticket_type = parse_known_type(&args.ticket_type)?;
    let ticket = ctx
        .api()?
        .create_ticket(&args.name, &args.phone, &ticket_type)
        .with_context(|| "create ticket")?;
    if ctx.json {
        return print_json(&ticket);
    }
    println!("created {}  {}  [{}]", ticket.id, ticket.nume, ticket.tip_bilet);
    Ok(())
}

pub fn mark_sent(ctx: &Context<'_>, args: MarkSentArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let sent = !args.unsent;
    ctx.api()?
        .set_sent(&id, sent)
        .with_context(|| format!("update ticket {id}"))?;
    if ctx.json {
        return print_json(&json!({ "id": id, "sent": sent }));
    }
    println!("{id} marked {}", sent_label(sent));
    Ok(())
}

pub fn set_type(ctx: &Context<'_>, args: SetTypeArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let ticket_type = parse_known_type(&args.ticket_type)?;
    ctx.api()?
        .set_ticket_type(&id, &ticket_type)
        .with_context(|| format!("update ticket {id}"))?;
    if ctx.json {
        return print_json(&json!({ "id": id, "tip_bilet": ticket_type }));
    }
    println!("{id} is now {ticket_type}");
    Ok(())
}

pub fn delete_ticket(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    ctx.api()?
        .delete_ticket(&id)
        .with_context(|| format!("delete ticket {id}"))?;
    if ctx.json {
        return print_json(&json!({ "id": id, "deleted": true }));
    }
    println!("deleted {id}");
    Ok(())
}

pub fn share_ticket(ctx: &Context<'_>, args: ShareArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let ticket = find_ticket(ctx, &id, args.file)?;
    let public_base_url = &ctx.config.api.public_base_url;
    let whatsapp_link = ticket_whatsapp_link(&ticket, public_base_url)?;
    if ctx.json {
        return print_json(&ShareDto {
            public_link: ticket_public_link(public_base_url, &ticket.id),
            message: ticket_message(&ticket, public_base_url),
            whatsapp_link,
            id: ticket.id,
        });
    }
    println!("{whatsapp_link}");
    Ok(())
}

pub fn ticket_qr(ctx: &Context<'_>, args: QrArgs) -> Result<()> {
    let id = parse_ticket_id(&args.id)?;
    let api = ctx.api()?;

    if let Some(path) = args.output {
        let image = api
            .download_ticket(&id)
            .with_context(|| format!("download ticket {id}"))?;
        fs::write(&path, &image).with_context(|| format!("write {}", path.display()))?;
        if ctx.json {
            return print_json(&json!({
                "id": id,
                "path": path.display().to_string(),
                "bytes": image.len(),
            }));
        }
        println!("saved ticket {id} to {}", path.display());
        return Ok(());
    }

    let qr = api
        .ticket_qr(&id)
        .with_context(|| format!("fetch qr for ticket {id}"))?;
    if ctx.json {
        return print_json(&qr);
    }
    println!("{}  {}  [{}]", qr.ticket.nume, qr.ticket.telefon, qr.ticket.tip_bilet);
    println!("{}", qr.qr_code);
    Ok(())
}

pub fn ticket_logs(ctx: &Context<'_>, args: LogsArgs) -> Result<()> {
    let group = args.group.trim();
    if group.is_empty() {
        return Err(invalid_input("group cannot be empty"));
    }
    let logs = ctx
        .api()?
        .ticket_logs(group)
        .with_context(|| format!("fetch ticket logs for {group}"))?;
    if ctx.json {
        return print_json(&logs);
    }

    println!("group {}: {} tickets", logs.group, logs.count);
    for entry in &logs.tickets {
        let ticket = &entry.ticket;
        println!(
            "{}  {}  [{}]  by {}  {}  {}",
            ticket.nume,
            ticket.telefon,
            ticket.tip_bilet,
            entry.creator_username.as_deref().unwrap_or("unknown"),
            format_datetime(ticket.created_at),
            status_label(ticket)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{criteria_from_args, ListArgs};
    use bilete_core::filter::{SentFilter, StatusFilter, TypeFilter};
    use bilete_core::TicketType;

    fn args() -> ListArgs {
        ListArgs {
            file: None,
            search: None,
            status: None,
            sent: None,
            ticket_type: None,
            query: None,
            page: 1,
            per_page: None,
        }
    }

    #[test]
    fn flags_override_query() {
        let mut list = args();
        list.query = Some("ana status:verified sent:sent".to_string());
        list.status = Some("pending".to_string());
        list.ticket_type = Some("AFTER VIP".to_string());
        let criteria = criteria_from_args(&list).unwrap();
        assert_eq!(criteria.search_term, "ana");
        assert_eq!(criteria.status, StatusFilter::Pending);
        assert_eq!(criteria.sent, SentFilter::Sent);
        assert_eq!(criteria.ticket_type, TypeFilter::Only(TicketType::AfterVip));
    }

    #[test]
    fn bad_selector_is_an_error() {
        let mut list = args();
        list.sent = Some("maybe".to_string());
        assert!(criteria_from_args(&list).is_err());
    }
}
