use anyhow::Result;
use bilete_core::{is_valid_phone, normalize_phone, PhoneCheckDto};
use clap::{Args, Subcommand};

use crate::commands::{print_json, Context};
use crate::error::invalid_input;

#[derive(Debug, Subcommand)]
pub enum PhoneCommand {
    /// Print the canonical +40 form, or the input unchanged if it has none
    Normalize(PhoneArgs),
    /// Exit with status 3 unless the number is a valid Romanian number
    Check(PhoneArgs),
}

#[derive(Debug, Args)]
pub struct PhoneArgs {
    pub raw: String,
}

fn check_dto(raw: &str) -> PhoneCheckDto {
    PhoneCheckDto {
        input: raw.to_string(),
        normalized: normalize_phone(raw),
        valid: is_valid_phone(raw),
    }
}

pub fn normalize(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let dto = check_dto(&args.raw);
    if ctx.json {
        return print_json(&dto);
    }
    println!("{}", dto.normalized);
    Ok(())
}

pub fn check(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let dto = check_dto(&args.raw);
    if ctx.json {
        print_json(&dto)?;
    } else if dto.valid {
        println!("valid {}", dto.normalized);
    }
    if !dto.valid {
        return Err(invalid_input(format!(
            "not a Romanian phone number: {:?}",
            dto.input
        )));
    }
    Ok(())
}
