use anyhow::{Context as _, Result};
use bilete_api::LoginResponse;
use clap::Args;
use serde_json::json;

use crate::commands::{print_json, Context};
use crate::error::invalid_input;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "BILETE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "BILETE_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Code handed out by a group administrator
    #[arg(long)]
    pub referral_code: String,
}

/// Exchanges credentials for a token. The token is printed, not stored; put
/// it in the config file or `BILETE_TOKEN`.
pub fn login(ctx: &Context<'_>, args: LoginArgs) -> Result<()> {
    if args.username.trim().is_empty() {
        return Err(invalid_input("username cannot be empty"));
    }
    let response = ctx
        .api()?
        .login(args.username.trim(), &args.password)
        .with_context(|| "login")?;
    print_session(ctx, &response)
}

/// Creates an account inside the group the referral code belongs to.
pub fn register(ctx: &Context<'_>, args: RegisterArgs) -> Result<()> {
    if args.username.trim().is_empty() {
        return Err(invalid_input("username cannot be empty"));
    }
    if args.referral_code.trim().is_empty() {
        return Err(invalid_input("referral code cannot be empty"));
    }
    let response = ctx
        .api()?
        .register(&args.username, &args.password, &args.referral_code)
        .with_context(|| "register")?;
    print_session(ctx, &response)
}

fn print_session(ctx: &Context<'_>, response: &LoginResponse) -> Result<()> {
    if ctx.json {
        return print_json(response);
    }
    println!("{}", response.token);
    if let Some(group) = response.user.as_ref().and_then(|user| user.group.as_deref()) {
        eprintln!("group: {group}");
    }
    Ok(())
}

pub fn health(ctx: &Context<'_>) -> Result<()> {
    let api = ctx.api()?;
    api.health()
        .with_context(|| format!("health check against {}", api.endpoints().health()))?;
    if ctx.json {
        return print_json(&json!({ "status": "ok" }));
    }
    println!("ok");
    Ok(())
}
