//! `plateq quote` command - Quote management
//!
//! Quotes live in `quotes/QUOT-<ulid>.yaml`. Every edit loads the file,
//! changes it and writes it back whole.

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::cli::commands::labor::labor_row;
use crate::cli::commands::rack::plan_rows;
use crate::cli::helpers::{
    find_quote, format_short_id, load_quotes, require_project, truncate_str, RateContext,
};
use crate::cli::output::{effective_format, minutes, money, print_structured, render_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::rates::{Material, ProcessKind};
use crate::core::{numeric, Config};
use crate::entities::part::PartSpec;
use crate::entities::quote::{Quote, QuoteSummary, RackSetup};
use crate::entities::rack::{PartFootprint, RackGeometry, SpacingPolicy, MIN_SPACING};

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// Create a new quote
    New(NewArgs),

    /// List quotes in the project
    List,

    /// Show a quote's inputs
    Show(IdArg),

    /// Calculate labor, plating, racking and lot totals for a quote
    Calc(IdArg),

    /// Change the part's quantity or surface area
    Part(PartArgs),

    /// Set, change or clear how the part hangs on the rack
    Rack(RackSetupArgs),

    /// Enable, disable or change a prep operation
    Prep(PrepArgs),

    /// Edit the plating sequence
    #[command(subcommand)]
    Plating(PlatingCommands),
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Quote ID (full ID or at least four characters of the ULID)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Quote title (part number or customer reference)
    #[arg(long, short = 't')]
    pub title: String,

    /// Order quantity
    #[arg(long, short = 'n', default_value_t = 1, allow_hyphen_values = true)]
    pub quantity: i64,

    /// Surface area of one part (in²)
    #[arg(long, short = 'a', default_value_t = 0.0)]
    pub area: f64,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Author (default: from config, git or $USER)
    #[arg(long)]
    pub author: Option<String>,

    /// Part width as hung on the rack (in)
    #[arg(long, requires = "part_height")]
    pub part_width: Option<f64>,

    /// Part height as hung on the rack (in)
    #[arg(long, requires = "part_width")]
    pub part_height: Option<f64>,

    /// Lay parts out on a free grid instead of centering them on wires
    #[arg(long)]
    pub free_grid: bool,

    /// Horizontal rack spacing for the free grid (in)
    #[arg(long, default_value_t = MIN_SPACING)]
    pub h_spacing: f64,

    /// Vertical rack spacing (in)
    #[arg(long, default_value_t = MIN_SPACING)]
    pub v_spacing: f64,
}

#[derive(clap::Args, Debug)]
pub struct PartArgs {
    /// Quote ID
    pub id: String,

    /// Order quantity
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub quantity: Option<i64>,

    /// Surface area of one part (in²)
    #[arg(long, short = 'a')]
    pub area: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RackSetupArgs {
    /// Quote ID
    pub id: String,

    /// Part width as hung on the rack (in)
    #[arg(long)]
    pub part_width: Option<f64>,

    /// Part height as hung on the rack (in)
    #[arg(long)]
    pub part_height: Option<f64>,

    /// Lay parts out on a free grid
    #[arg(long, conflicts_with = "wire_centered")]
    pub free_grid: bool,

    /// Center one part on each wire
    #[arg(long)]
    pub wire_centered: bool,

    /// Horizontal spacing for the free grid (in)
    #[arg(long)]
    pub h_spacing: Option<f64>,

    /// Vertical spacing between rows (in)
    #[arg(long)]
    pub v_spacing: Option<f64>,

    /// Remove the rack setup from the quote
    #[arg(
        long,
        conflicts_with_all = [
            "part_width",
            "part_height",
            "free_grid",
            "wire_centered",
            "h_spacing",
            "v_spacing",
        ]
    )]
    pub clear: bool,
}

#[derive(clap::Args, Debug)]
pub struct PrepArgs {
    /// Quote ID
    pub id: String,

    /// Operation (grit_blasting, masking, polishing)
    pub operation: ProcessKind,

    /// Treated area per part (in²)
    #[arg(long)]
    pub area: Option<f64>,

    /// Holes to plug per part (masking only)
    #[arg(long)]
    pub holes: Option<u32>,

    /// Turn the operation off, keeping its figures
    #[arg(long, conflicts_with = "toggle")]
    pub disable: bool,

    /// Flip the operation on or off
    #[arg(long)]
    pub toggle: bool,
}

#[derive(Subcommand, Debug)]
pub enum PlatingCommands {
    /// Append a plating step
    Add {
        /// Quote ID
        id: String,
        /// Material (gold, silver, nickel, enp)
        material: Material,
    },

    /// Remove a plating step
    Rm {
        /// Quote ID
        id: String,
        /// Step ID (full ID or at least four characters of the ULID)
        step: String,
    },

    /// Move a plating step to a new 1-based position
    Mv {
        /// Quote ID
        id: String,
        /// Step ID
        step: String,
        /// New position
        position: usize,
    },
}

/// Run a quote subcommand
pub fn run(cmd: QuoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        QuoteCommands::New(args) => run_new(args, global),
        QuoteCommands::List => run_list(global),
        QuoteCommands::Show(args) => run_show(args, global),
        QuoteCommands::Calc(args) => run_calc(args, global),
        QuoteCommands::Part(args) => run_part(args, global),
        QuoteCommands::Rack(args) => run_rack(args, global),
        QuoteCommands::Prep(args) => run_prep(args, global),
        QuoteCommands::Plating(cmd) => run_plating(cmd, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let config = Config::load();

    let part = PartSpec::new(
        numeric::quantity(args.quantity),
        numeric::non_negative(args.area),
    );
    let author = args.author.unwrap_or_else(|| config.author());

    let mut quote = Quote::new(args.title, part, author);
    quote.description = args.description;

    if let (Some(width), Some(height)) = (args.part_width, args.part_height) {
        quote.rack = Some(RackSetup {
            geometry: RackGeometry::default(),
            footprint: PartFootprint::new(width, height),
            spacing: spacing_policy(args.free_grid, args.h_spacing, args.v_spacing),
        });
    }

    let path = project.quotes_dir().join(quote.file_name());
    quote.save(&path).map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        println!("{}", quote.id);
        return Ok(());
    }

    println!(
        "{} Created quote {}",
        style("✓").green(),
        style(&quote.id).cyan()
    );
    println!("   {}", style(path.display()).dim());
    if !quote.part.is_complete() {
        println!(
            "   {} Part is incomplete; set quantity and surface area with `plateq quote part` before calculating",
            style("!").yellow()
        );
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let config = Config::load();
    let format = effective_format(global, &config);
    let quotes: Vec<Quote> = load_quotes(&project).into_iter().map(|(_, q)| q).collect();

    if print_structured(&quotes, format)? {
        return Ok(());
    }

    if quotes.is_empty() {
        if !global.quiet {
            println!("No quotes found.");
        }
        return Ok(());
    }

    let id_cell = |quote: &Quote| match format {
        OutputFormat::Tsv => quote.id.to_string(),
        _ => format_short_id(&quote.id),
    };

    let rows: Vec<Vec<String>> = quotes
        .iter()
        .map(|q| {
            vec![
                id_cell(q),
                truncate_str(&q.title, 30),
                q.part.quantity.to_string(),
                format!("{:.2}", q.part.surface_area),
                q.plating.len().to_string(),
                q.author.clone(),
                q.created.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    print!(
        "{}",
        render_table(
            &["ID", "TITLE", "QTY", "AREA", "STEPS", "AUTHOR", "CREATED"],
            &rows,
            format
        )
    );

    if !global.quiet && format == OutputFormat::Auto {
        println!("{} quote(s) found", style(quotes.len()).cyan());
    }
    Ok(())
}

fn run_show(args: IdArg, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let config = Config::load();
    let (_, quote) = find_quote(&project, &args.id)?;

    let format = effective_format(global, &config);
    if print_structured(&quote, format)? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&quote.id).cyan());
    println!("{}: {}", style("Title").bold(), style(&quote.title).yellow());
    println!(
        "{}: {} × {:.2} in²",
        style("Part").bold(),
        quote.part.quantity,
        quote.part.surface_area
    );
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{}", style("Prep:").bold());
    for kind in ProcessKind::all() {
        let op = quote.prep.get(*kind);
        let mark = if op.enabled {
            style("on ").green()
        } else {
            style("off").dim()
        };
        let holes = if kind.counts_holes() {
            format!(", {} holes", op.holes_count)
        } else {
            String::new()
        };
        println!(
            "  {} {:<14} {:.2} in²{}",
            mark,
            kind.label(),
            op.surface_area,
            holes
        );
    }

    if let Some(rack) = &quote.rack {
        println!();
        println!("{}", style("Rack:").bold());
        println!(
            "  Part {} × {} in on a {} × {} in rack ({})",
            rack.footprint.width,
            rack.footprint.height,
            rack.geometry.width,
            rack.geometry.height,
            if rack.spacing.is_wire_centered() {
                format!("{} wires", rack.geometry.wire_count)
            } else {
                "free grid".to_string()
            }
        );
    }

    if !quote.plating.is_empty() {
        println!();
        println!("{}", style("Plating:").bold());
        for step in quote.plating.steps() {
            println!(
                "  {}. {:<20} {}",
                step.order,
                step.material.label(),
                style(&step.id).dim()
            );
        }
    }

    if let Some(desc) = &quote.description {
        if !desc.is_empty() {
            println!();
            println!("{}", style("Description:").bold());
            println!("{}", desc);
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Author").dim(),
        quote.author,
        style("Created").dim(),
        quote.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_calc(args: IdArg, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let config = Config::load();
    let rates = RateContext::load(&config)?.store.snapshot();
    let (_, quote) = find_quote(&project, &args.id)?;

    let summary = quote.evaluate(&rates);
    let format = effective_format(global, &config);
    if print_structured(&summary, format)? {
        return Ok(());
    }

    if !summary.complete {
        println!(
            "{} {}: part is incomplete; figures not yet available",
            style("!").yellow(),
            style(&quote.title).yellow()
        );
        println!("  Quantity and surface area must both be positive.");
        return Ok(());
    }

    if !global.quiet && format == OutputFormat::Auto {
        println!(
            "{} ({} parts × {:.2} in²)",
            style(&quote.title).bold(),
            summary.part.quantity,
            summary.part.surface_area
        );
        println!();
    }

    print_calc_sections(&summary, rates.calculations.rack_efficiency_percent, format);
    Ok(())
}

fn print_calc_sections(summary: &QuoteSummary, efficiency: f64, format: OutputFormat) {
    if let Some(labor) = &summary.labor {
        let mut rows: Vec<Vec<String>> = labor
            .iter()
            .filter(|(_, result)| !result.is_zero())
            .map(|(kind, result)| labor_row(kind.label(), result))
            .collect();
        rows.push(labor_row("Total", &labor.totals()));
        print!(
            "{}",
            render_table(
                &["OPERATION", "MIN/PART", "MIN/QTY", "COST/PART", "COST/QTY"],
                &rows,
                format
            )
        );
    }

    if let Some(plating) = summary.plating.as_ref().filter(|p| !p.steps.is_empty()) {
        let mut rows: Vec<Vec<String>> = plating
            .steps
            .iter()
            .map(|step| {
                vec![
                    step.order.to_string(),
                    step.material.label().to_string(),
                    money(step.cost_per_part),
                    money(step.cost_per_qty),
                ]
            })
            .collect();
        rows.push(vec![
            String::new(),
            "Total".to_string(),
            money(plating.cost_per_part),
            money(plating.cost_per_qty),
        ]);
        println!();
        print!(
            "{}",
            render_table(&["#", "PLATING", "COST/PART", "COST/QTY"], &rows, format)
        );
    }

    if let Some(rack) = &summary.rack {
        println!();
        let rows = plan_rows(&rack.plan, rack.effective_racks, efficiency);
        print!("{}", render_table(&["RACK", "VALUE"], &rows, format));
    }

    if let Some(totals) = &summary.totals {
        let rows = vec![
            vec!["Cost per part".to_string(), money(totals.cost_per_part)],
            vec!["Cost per quantity".to_string(), money(totals.cost_per_qty)],
            vec!["Buffer (min)".to_string(), minutes(totals.buffer_minutes)],
            vec!["Lot minutes".to_string(), minutes(totals.lot_minutes)],
            vec!["Lot cost".to_string(), money(totals.lot_cost)],
        ];
        println!();
        print!("{}", render_table(&["TOTAL", "VALUE"], &rows, format));
    }
}

fn run_part(args: PartArgs, global: &GlobalOpts) -> Result<()> {
    if args.quantity.is_none() && args.area.is_none() {
        return Err(miette::miette!("Nothing to change; pass --quantity and/or --area"));
    }

    let project = require_project()?;
    let (path, mut quote) = find_quote(&project, &args.id)?;

    if let Some(quantity) = args.quantity {
        quote.part.quantity = numeric::quantity(quantity);
    }
    if let Some(area) = args.area {
        quote.part.surface_area = numeric::non_negative(area);
    }

    save_quote(&quote, &path)?;

    if !global.quiet {
        println!(
            "{} Part on {} is now {} × {:.2} in²",
            style("✓").green(),
            style(&quote.id).cyan(),
            quote.part.quantity,
            quote.part.surface_area
        );
        if !quote.part.is_complete() {
            println!(
                "   {} Part is incomplete; quantity and surface area must both be positive",
                style("!").yellow()
            );
        }
    }
    Ok(())
}

fn run_rack(args: RackSetupArgs, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let (path, mut quote) = find_quote(&project, &args.id)?;

    if args.clear {
        quote.rack = None;
        save_quote(&quote, &path)?;
        if !global.quiet {
            println!(
                "{} Cleared rack setup on {}",
                style("✓").green(),
                style(&quote.id).cyan()
            );
        }
        return Ok(());
    }

    let current = quote.rack;
    let footprint = match (current, args.part_width, args.part_height) {
        (Some(setup), width, height) => PartFootprint::new(
            width.unwrap_or(setup.footprint.width),
            height.unwrap_or(setup.footprint.height),
        ),
        (None, Some(width), Some(height)) => PartFootprint::new(width, height),
        (None, _, _) => {
            return Err(miette::miette!(
                "No rack setup yet; pass both --part-width and --part-height"
            ))
        }
    };
    if !footprint.is_valid() {
        return Err(miette::miette!("Part width and height must both be positive"));
    }

    let previous = current.map(|setup| setup.spacing).unwrap_or_default();
    let free_grid = if args.free_grid || args.wire_centered {
        args.free_grid
    } else {
        !previous.is_wire_centered()
    };
    let horizontal = args.h_spacing.unwrap_or(match previous {
        SpacingPolicy::FreeGrid {
            horizontal_spacing, ..
        } => horizontal_spacing,
        SpacingPolicy::WireCentered { .. } => MIN_SPACING,
    });
    let vertical = args.v_spacing.unwrap_or(previous.vertical_spacing());

    let setup = RackSetup {
        geometry: current.map(|setup| setup.geometry).unwrap_or_default(),
        footprint,
        spacing: spacing_policy(free_grid, horizontal, vertical),
    };
    quote.rack = Some(setup);

    save_quote(&quote, &path)?;

    if !global.quiet {
        println!(
            "{} Rack setup on {}: part {} × {} in, {}",
            style("✓").green(),
            style(&quote.id).cyan(),
            setup.footprint.width,
            setup.footprint.height,
            if setup.spacing.is_wire_centered() {
                "wire centered"
            } else {
                "free grid"
            }
        );
    }
    Ok(())
}

fn run_prep(args: PrepArgs, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;
    let (path, mut quote) = find_quote(&project, &args.id)?;

    if args.holes.is_some() && !args.operation.counts_holes() {
        return Err(miette::miette!(
            "{} has no hole count; only masking counts holes",
            args.operation.label()
        ));
    }

    let op = quote.prep.get_mut(args.operation);
    if let Some(area) = args.area {
        op.surface_area = numeric::non_negative(area);
    }
    if let Some(holes) = args.holes {
        op.holes_count = holes;
    }
    if args.toggle {
        *op = op.toggled();
    } else {
        op.enabled = !args.disable;
    }
    let enabled = op.enabled;

    save_quote(&quote, &path)?;

    if !global.quiet {
        println!(
            "{} {} {} on {}",
            style("✓").green(),
            args.operation.label(),
            if enabled { "enabled" } else { "disabled" },
            style(&quote.id).cyan()
        );
    }
    Ok(())
}

fn run_plating(cmd: PlatingCommands, global: &GlobalOpts) -> Result<()> {
    let project = require_project()?;

    let (id, message) = match &cmd {
        PlatingCommands::Add { id, .. } => (id, "Added plating step"),
        PlatingCommands::Rm { id, .. } => (id, "Removed plating step"),
        PlatingCommands::Mv { id, .. } => (id, "Moved plating step"),
    };
    let (path, mut quote) = find_quote(&project, id)?;

    let step_id = match &cmd {
        PlatingCommands::Add { material, .. } => quote.plating.push(*material).to_string(),
        PlatingCommands::Rm { step, .. } => quote
            .plating
            .remove(step)
            .map_err(|e| miette::miette!("{}", e))?
            .id
            .to_string(),
        PlatingCommands::Mv { step, position, .. } => quote
            .plating
            .move_to(step, *position)
            .map_err(|e| miette::miette!("{}", e))?
            .to_string(),
    };

    save_quote(&quote, &path)?;

    if global.quiet {
        if matches!(cmd, PlatingCommands::Add { .. }) {
            println!("{}", step_id);
        }
        return Ok(());
    }

    println!("{} {} {}", style("✓").green(), message, style(&step_id).cyan());
    for step in quote.plating.steps() {
        println!("  {}. {}", step.order, step.material.label());
    }
    Ok(())
}

/// Spacing policy from CLI flags, raised to the minimum spacing
fn spacing_policy(free_grid: bool, horizontal: f64, vertical: f64) -> SpacingPolicy {
    let policy = if free_grid {
        SpacingPolicy::FreeGrid {
            horizontal_spacing: horizontal,
            vertical_spacing: vertical,
        }
    } else {
        SpacingPolicy::WireCentered {
            vertical_spacing: vertical,
        }
    };
    policy.clamped()
}

fn save_quote(quote: &Quote, path: &Path) -> Result<()> {
    quote.save(path).map_err(|e| miette::miette!("{}", e))
}
