//! `plateq rack` command - ad-hoc rack loading plan

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::RateContext;
use crate::cli::output::{effective_format, print_structured, render_table};
use crate::cli::preview;
use crate::cli::GlobalOpts;
use crate::core::{numeric, Config};
use crate::entities::rack::{
    self, PartFootprint, Placement, RackGeometry, RackPlan, SpacingPolicy, MAX_WIRES,
    MIN_SPACING,
};

#[derive(clap::Args, Debug)]
pub struct RackArgs {
    /// Part width as hung (in)
    #[arg(long, short = 'W')]
    pub part_width: f64,

    /// Part height as hung (in)
    #[arg(long, short = 'H')]
    pub part_height: f64,

    /// Order quantity
    #[arg(long, short = 'n', default_value_t = 1, allow_hyphen_values = true)]
    pub quantity: i64,

    /// Lay parts out on a free grid instead of centering them on wires
    #[arg(long)]
    pub free_grid: bool,

    /// Horizontal spacing for the free grid (in)
    #[arg(long, default_value_t = MIN_SPACING)]
    pub h_spacing: f64,

    /// Vertical spacing between rows (in)
    #[arg(long, default_value_t = MIN_SPACING)]
    pub v_spacing: f64,

    /// Override the rack width (in)
    #[arg(long)]
    pub rack_width: Option<f64>,

    /// Override the rack height (in)
    #[arg(long)]
    pub rack_height: Option<f64>,

    /// Override the number of wires
    #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_WIRES)))]
    pub wires: Option<u32>,

    /// Draw an ASCII preview of the loaded rack
    #[arg(long)]
    pub preview: bool,
}

impl RackArgs {
    pub(crate) fn geometry(&self) -> RackGeometry {
        let standard = RackGeometry::default();
        RackGeometry {
            width: self.rack_width.unwrap_or(standard.width),
            height: self.rack_height.unwrap_or(standard.height),
            wire_count: self.wires.unwrap_or(standard.wire_count),
        }
    }

    pub(crate) fn spacing(&self) -> SpacingPolicy {
        if self.free_grid {
            SpacingPolicy::FreeGrid {
                horizontal_spacing: self.h_spacing,
                vertical_spacing: self.v_spacing,
            }
        } else {
            SpacingPolicy::WireCentered {
                vertical_spacing: self.v_spacing,
            }
        }
    }
}

#[derive(Serialize)]
struct RackReport {
    geometry: RackGeometry,
    footprint: PartFootprint,
    quantity: u32,
    #[serde(flatten)]
    plan: RackPlan,
    effective_racks: Option<u64>,
    rack_efficiency_percent: f64,
    placements: Vec<Placement>,
}

pub fn run(args: RackArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let rates = RateContext::load(&config)?.store.snapshot();

    let geometry = args.geometry();
    let footprint = PartFootprint::new(args.part_width, args.part_height);
    let quantity = numeric::quantity(args.quantity);

    let plan = rack::plan(&geometry, &footprint, &args.spacing(), quantity).ok_or_else(|| {
        miette::miette!("Part and rack dimensions must all be positive to plan a rack")
    })?;

    let efficiency = rates.calculations.rack_efficiency_percent;
    let report = RackReport {
        geometry,
        footprint,
        quantity,
        plan,
        effective_racks: plan.effective_racks(quantity, efficiency),
        rack_efficiency_percent: efficiency,
        placements: rack::placements(&geometry, &footprint, &plan),
    };

    let format = effective_format(global, &config);
    if print_structured(&report, format)? {
        return Ok(());
    }

    let rows = plan_rows(&report.plan, report.effective_racks, efficiency);
    print!("{}", render_table(&["FIGURE", "VALUE"], &rows, format));

    if args.preview {
        println!();
        print!(
            "{}",
            preview::render(&geometry, &report.placements, plan.spacing.is_wire_centered())
        );
        if !global.quiet && (report.placements.len() as u64) < u64::from(plan.capacity_per_rack) {
            println!(
                "{} {} of {} parts fit fully inside the rack outline",
                style("!").yellow(),
                report.placements.len(),
                plan.capacity_per_rack
            );
        }
    }
    Ok(())
}

/// Table rows describing a rack plan
pub(crate) fn plan_rows(
    plan: &RackPlan,
    effective_racks: Option<u64>,
    efficiency: f64,
) -> Vec<Vec<String>> {
    let not_computable = || "not computable".to_string();
    vec![
        vec!["Parts per row".to_string(), plan.parts_per_row.to_string()],
        vec!["Parts per column".to_string(), plan.parts_per_column.to_string()],
        vec!["Capacity per rack".to_string(), plan.capacity_per_rack.to_string()],
        vec![
            "Racks needed".to_string(),
            plan.racks_needed.map_or_else(not_computable, |n| n.to_string()),
        ],
        vec![
            format!("Racks at {}% efficiency", efficiency),
            effective_racks.map_or_else(not_computable, |n| n.to_string()),
        ],
    ]
}
