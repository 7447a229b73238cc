//! `plateq rates` command - Rate table management
//!
//! Shows and edits the hourly rate, process rates, material costs and lot
//! settings stored in `.plateq/rates.yaml`.

use clap::Subcommand;
use console::style;
use miette::Result;
use std::collections::BTreeMap;

use crate::cli::helpers::RateContext;
use crate::cli::output::{effective_format, print_structured, render_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::rates::RATE_KEYS;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum RatesCommands {
    /// Show the current rate table
    Show(ShowArgs),

    /// Set one rate by dotted key (e.g. processes.masking.minutes_per_hole)
    Set(SetArgs),

    /// Restore the built-in default rates
    Reset,

    /// List all editable rate keys
    Keys,

    /// Show where the rate table is stored
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Dotted rate key
    pub key: String,

    /// New value
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Run a rates subcommand
pub fn run(cmd: RatesCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    match cmd {
        RatesCommands::Show(args) => run_show(args, global, &config),
        RatesCommands::Set(args) => run_set(args, global, &config),
        RatesCommands::Reset => run_reset(global, &config),
        RatesCommands::Keys => run_keys(global, &config),
        RatesCommands::Path => run_path(&config),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ctx = RateContext::load(config)?;
    let rates = ctx.store.snapshot();

    if let Some(key) = &args.key {
        let value = rates.get_field(key).map_err(|e| miette::miette!("{}", e))?;
        println!("{}", value);
        return Ok(());
    }

    let format = effective_format(global, config);
    if print_structured(&*rates, format)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = rates
        .entries()
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value.to_string()])
        .collect();
    print!("{}", render_table(&["KEY", "VALUE"], &rows, format));

    if !global.quiet && format == OutputFormat::Auto {
        if let Some(path) = &ctx.path {
            let origin = if path.exists() { "" } else { " (not saved yet, showing defaults)" };
            println!("{}{}", style(path.display()).dim(), style(origin).dim());
        }
    }
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ctx = RateContext::load(config)?;
    let previous = ctx
        .store
        .snapshot()
        .get_field(&args.key)
        .map_err(|e| miette::miette!("{}", e))?;

    let updated = ctx
        .store
        .set_field(&args.key, &args.value)
        .map_err(|e| miette::miette!("{}", e))?;
    let path = ctx.save()?;

    if !global.quiet {
        let value = updated.get_field(&args.key).map_err(|e| miette::miette!("{}", e))?;
        println!(
            "{} Set {} = {} (was {})",
            style("✓").green(),
            style(&args.key).cyan(),
            style(value).yellow(),
            previous
        );
        println!("   {}", style(path.display()).dim());
    }
    Ok(())
}

fn run_reset(global: &GlobalOpts, config: &Config) -> Result<()> {
    let ctx = RateContext::load(config)?;
    ctx.store.reset();
    let path = ctx.save()?;

    if !global.quiet {
        println!("{} Rate table reset to defaults", style("✓").green());
        println!("   {}", style(path.display()).dim());
    }
    Ok(())
}

fn run_keys(global: &GlobalOpts, config: &Config) -> Result<()> {
    let format = effective_format(global, config);
    let described: BTreeMap<&str, &str> = RATE_KEYS.iter().copied().collect();
    if print_structured(&described, format)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = RATE_KEYS
        .iter()
        .map(|(key, description)| vec![key.to_string(), description.to_string()])
        .collect();
    print!("{}", render_table(&["KEY", "DESCRIPTION"], &rows, format));
    Ok(())
}

fn run_path(config: &Config) -> Result<()> {
    let ctx = RateContext::load(config)?;
    match &ctx.path {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(miette::miette!("No location available for the rate table")),
    }
}
