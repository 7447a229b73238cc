//! `plateq labor` command - ad-hoc prep labor estimate

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::RateContext;
use crate::cli::output::{effective_format, minutes, money, print_structured, render_table};
use crate::cli::GlobalOpts;
use crate::core::rates::ProcessKind;
use crate::core::{numeric, Config};
use crate::entities::labor::{self, LaborBreakdown, LaborResult, Totals};
use crate::entities::part::{PartSpec, PrepOperation, PrepOptions};

#[derive(clap::Args, Debug)]
pub struct LaborArgs {
    /// Order quantity
    #[arg(long, short = 'n', default_value_t = 1, allow_hyphen_values = true)]
    pub quantity: i64,

    /// Surface area of one part (in²)
    #[arg(long, short = 'a')]
    pub area: f64,

    /// Grit blast this area per part (in²)
    #[arg(long, value_name = "AREA")]
    pub grit: Option<f64>,

    /// Mask this area per part (in²)
    #[arg(long, value_name = "AREA")]
    pub mask_area: Option<f64>,

    /// Plug this many holes per part
    #[arg(long, value_name = "COUNT")]
    pub mask_holes: Option<u32>,

    /// Polish this area per part (in²)
    #[arg(long, value_name = "AREA")]
    pub polish: Option<f64>,
}

#[derive(Serialize)]
struct LaborReport {
    part: PartSpec,
    operations: LaborBreakdown,
    totals: Totals,
}

impl LaborArgs {
    fn prep(&self) -> PrepOptions {
        let mut prep = PrepOptions::default();
        if let Some(area) = self.grit {
            prep = prep.with(ProcessKind::GritBlasting, PrepOperation::area(area));
        }
        if self.mask_area.is_some() || self.mask_holes.is_some() {
            prep = prep.with(
                ProcessKind::Masking,
                PrepOperation::masking(
                    self.mask_area.unwrap_or(0.0),
                    self.mask_holes.unwrap_or(0),
                ),
            );
        }
        if let Some(area) = self.polish {
            prep = prep.with(ProcessKind::Polishing, PrepOperation::area(area));
        }
        prep.sanitized()
    }
}

pub fn run(args: LaborArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let rates = RateContext::load(&config)?.store.snapshot();

    let part = PartSpec::new(numeric::quantity(args.quantity), numeric::non_negative(args.area));
    if !part.is_complete() {
        return Err(miette::miette!(
            "Part is incomplete: quantity and surface area must both be positive"
        ));
    }

    let prep = args.prep();
    if !prep.any_enabled() && !global.quiet {
        eprintln!(
            "{} No prep operations selected (use --grit, --mask-area, --mask-holes or --polish)",
            style("!").yellow()
        );
    }

    let breakdown = labor::estimate(&part, &prep, &rates);
    let report = LaborReport {
        part,
        operations: breakdown,
        totals: breakdown.totals(),
    };

    let format = effective_format(global, &config);
    if print_structured(&report, format)? {
        return Ok(());
    }

    let mut rows: Vec<Vec<String>> = breakdown
        .iter()
        .filter(|(kind, _)| prep.get(*kind).enabled)
        .map(|(kind, result)| labor_row(kind.label(), result))
        .collect();
    rows.push(labor_row("Total", &report.totals));

    print!(
        "{}",
        render_table(
            &["OPERATION", "MIN/PART", "MIN/QTY", "COST/PART", "COST/QTY"],
            &rows,
            format
        )
    );
    Ok(())
}

/// One table row of labor figures
pub(crate) fn labor_row(label: &str, result: &LaborResult) -> Vec<String> {
    vec![
        label.to_string(),
        minutes(result.minutes_per_part),
        minutes(result.minutes_per_qty),
        money(result.cost_per_part),
        money(result.cost_per_qty),
    ]
}
