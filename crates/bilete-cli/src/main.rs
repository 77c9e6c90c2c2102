mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{auth, completions, phone, tickets, verify, Context};
use crate::error::{exit_code_for, report_error};
use bilete_config as config;

#[derive(Debug, Parser)]
#[command(name = "bilete", version, about = "bilete CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Normalize and validate Romanian phone numbers
    #[command(subcommand)]
    Phone(phone::PhoneCommand),
    #[command(subcommand)]
    Tickets(tickets::TicketsCommand),
    /// Check a ticket in at the door
    #[command(subcommand)]
    Verify(verify::VerifyCommand),
    Login(auth::LoginArgs),
    /// Create an account with a group referral code
    Register(auth::RegisterArgs),
    Health,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let ctx = Context {
                json,
                config: &app_config,
            };

            match command {
                Command::Phone(cmd) => match cmd {
                    phone::PhoneCommand::Normalize(args) => phone::normalize(&ctx, args),
                    phone::PhoneCommand::Check(args) => phone::check(&ctx, args),
                },
                Command::Tickets(cmd) => match cmd {
                    tickets::TicketsCommand::List(args) => tickets::list_tickets(&ctx, args),
                    tickets::TicketsCommand::Summary(args) => tickets::summary(&ctx, args),
                    tickets::TicketsCommand::Show(args) => tickets::show_ticket(&ctx, args),
                    tickets::TicketsCommand::Create(args) => tickets::create_ticket(&ctx, args),
                    tickets::TicketsCommand::MarkSent(args) => tickets::mark_sent(&ctx, args),
                    tickets::TicketsCommand::SetType(args) => tickets::set_type(&ctx, args),
                    tickets::TicketsCommand::Delete(args) => tickets::delete_ticket(&ctx, args),
                    tickets::TicketsCommand::Share(args) => tickets::share_ticket(&ctx, args),
                    tickets::TicketsCommand::Qr(args) => tickets::ticket_qr(&ctx, args),
                    tickets::TicketsCommand::Logs(args) => tickets::ticket_logs(&ctx, args),
                },
                Command::Verify(cmd) => match cmd {
                    verify::VerifyCommand::Qr(args) => verify::verify_qr(&ctx, args),
                    verify::VerifyCommand::Phone(args) => verify::verify_phone(&ctx, args),
                    verify::VerifyCommand::Id(args) => verify::verify_id(&ctx, args),
                    verify::VerifyCommand::Scan(args) => verify::verify_scan(&ctx, args),
                },
                Command::Login(args) => auth::login(&ctx, args),
                Command::Register(args) => auth::register(&ctx, args),
                Command::Health => auth::health(&ctx),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
