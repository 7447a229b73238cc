//! Rack layout planning
//!
//! Estimates how many identical parts fit on a plating rack and how many
//! racks an order needs. Parts are laid out on a uniform grid with a single
//! orientation; this is a quick, explainable estimate, not a packing
//! optimizer.

use serde::{Deserialize, Serialize};

use crate::core::numeric;

/// Smallest spacing between parts, in inches
pub const MIN_SPACING: f64 = 0.25;

/// Most suspension wires a rack can carry
pub const MAX_WIRES: u32 = 1_000;

/// Absorbs floating-point error when a row fills the rack exactly
const FIT_TOLERANCE: f64 = 1e-9;

/// Fixed rack dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RackGeometry {
    /// Rack width (in)
    pub width: f64,

    /// Rack height (in)
    pub height: f64,

    /// Suspension wires, evenly spaced across the width
    pub wire_count: u32,
}

impl Default for RackGeometry {
    /// The shop's standard rack: 21 × 13 in with 13 wires
    fn default() -> Self {
        Self {
            width: 21.0,
            height: 13.0,
            wire_count: 13,
        }
    }
}

impl RackGeometry {
    /// Distance between adjacent wires (and from each edge to the outer wires)
    pub fn wire_pitch(&self) -> f64 {
        self.width / (f64::from(self.wire_count) + 1.0)
    }

    /// Horizontal position of each wire, measured from the left edge
    pub fn wire_positions(&self) -> Vec<f64> {
        let pitch = self.wire_pitch();
        (1..=self.wire_count).map(|i| f64::from(i) * pitch).collect()
    }

    /// Positive dimensions and at most [`MAX_WIRES`] wires
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.wire_count <= MAX_WIRES
    }
}

/// Outline of one part as hung on the rack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartFootprint {
    pub width: f64,
    pub height: f64,
}

impl PartFootprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are positive (NaN counts as missing)
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// How parts are spaced across the rack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case", deny_unknown_fields)]
pub enum SpacingPolicy {
    /// One part centered on every wire; horizontal spacing is the wire pitch
    WireCentered { vertical_spacing: f64 },

    /// Free grid with explicit spacing in both directions
    FreeGrid {
        horizontal_spacing: f64,
        vertical_spacing: f64,
    },
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        SpacingPolicy::WireCentered {
            vertical_spacing: MIN_SPACING,
        }
    }
}

impl SpacingPolicy {
    pub fn vertical_spacing(&self) -> f64 {
        match *self {
            SpacingPolicy::WireCentered { vertical_spacing } => vertical_spacing,
            SpacingPolicy::FreeGrid {
                vertical_spacing, ..
            } => vertical_spacing,
        }
    }

    /// Effective horizontal spacing; the wire pitch under wire centering
    pub fn horizontal_spacing(&self, geometry: &RackGeometry) -> f64 {
        match *self {
            SpacingPolicy::WireCentered { .. } => geometry.wire_pitch(),
            SpacingPolicy::FreeGrid {
                horizontal_spacing, ..
            } => horizontal_spacing,
        }
    }

    pub fn is_wire_centered(&self) -> bool {
        matches!(self, SpacingPolicy::WireCentered { .. })
    }

    /// Copy with every spacing raised to at least [`MIN_SPACING`]
    pub fn clamped(&self) -> Self {
        let clamp = |value: f64| {
            let clamped = numeric::at_least(value, MIN_SPACING);
            if clamped != value {
                tracing::warn!(requested = value, used = clamped, "spacing raised to minimum");
            }
            clamped
        };

        match *self {
            SpacingPolicy::WireCentered { vertical_spacing } => SpacingPolicy::WireCentered {
                vertical_spacing: clamp(vertical_spacing),
            },
            SpacingPolicy::FreeGrid {
                horizontal_spacing,
                vertical_spacing,
            } => SpacingPolicy::FreeGrid {
                horizontal_spacing: clamp(horizontal_spacing),
                vertical_spacing: clamp(vertical_spacing),
            },
        }
    }
}

/// Result of a rack layout calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RackPlan {
    pub parts_per_row: u32,
    pub parts_per_column: u32,
    pub capacity_per_rack: u32,

    /// `None` when the rack holds no parts, so no rack count exists
    pub racks_needed: Option<u64>,

    /// Policy after clamping, as actually used
    pub spacing: SpacingPolicy,
}

impl RackPlan {
    pub fn is_computable(&self) -> bool {
        self.racks_needed.is_some()
    }

    /// Racks needed when only `efficiency_percent` of capacity is loaded
    ///
    /// `None` when the derated capacity rounds down to zero.
    pub fn effective_racks(&self, quantity: u32, efficiency_percent: f64) -> Option<u64> {
        let efficiency = numeric::non_negative(efficiency_percent).min(100.0);
        let capacity = (f64::from(self.capacity_per_rack) * efficiency / 100.0 + FIT_TOLERANCE)
            .floor() as u64;
        racks_for(quantity, capacity)
    }
}

/// `ceil(quantity / capacity)` in integers; no rack count exists for zero capacity
pub fn racks_for(quantity: u32, capacity: u64) -> Option<u64> {
    if capacity == 0 {
        return None;
    }
    Some(u64::from(quantity).div_ceil(capacity))
}

/// How many parts of `size` fit along `span` with `spacing` between them
fn fit_count(span: f64, size: f64, spacing: f64) -> u32 {
    let count = ((span + spacing) / (size + spacing) + FIT_TOLERANCE).floor();
    if count.is_finite() && count > 0.0 {
        count.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Plan the rack layout for an order
///
/// Returns `None` when the footprint or rack is not usable yet (missing or
/// non-positive dimensions, or more than [`MAX_WIRES`] wires). Spacing below
/// [`MIN_SPACING`] is raised to it.
pub fn plan(
    geometry: &RackGeometry,
    footprint: &PartFootprint,
    spacing: &SpacingPolicy,
    quantity: u32,
) -> Option<RackPlan> {
    if !footprint.is_valid() || !geometry.is_valid() {
        return None;
    }

    let spacing = spacing.clamped();
    let vertical = spacing.vertical_spacing();

    let parts_per_column = fit_count(geometry.height, footprint.height, vertical);
    let parts_per_row = match spacing {
        SpacingPolicy::WireCentered { .. } => geometry.wire_count,
        SpacingPolicy::FreeGrid {
            horizontal_spacing, ..
        } => fit_count(geometry.width, footprint.width, horizontal_spacing),
    };

    let capacity_per_rack = parts_per_row.saturating_mul(parts_per_column);
    let racks_needed = racks_for(quantity, u64::from(capacity_per_rack));

    tracing::debug!(
        parts_per_row,
        parts_per_column,
        capacity_per_rack,
        ?racks_needed,
        "planned rack layout"
    );

    Some(RackPlan {
        parts_per_row,
        parts_per_column,
        capacity_per_rack,
        racks_needed,
        spacing,
    })
}

/// Where one part sits on the rack, in inches from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub row: u32,
    pub column: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Concrete part positions for drawing a plan
///
/// Only parts lying fully inside the rack are returned, so a wire-centered
/// plan for wide parts draws fewer parts than its nominal capacity.
pub fn placements(
    geometry: &RackGeometry,
    footprint: &PartFootprint,
    plan: &RackPlan,
) -> Vec<Placement> {
    let vertical = plan.spacing.vertical_spacing();
    let wires = geometry.wire_positions();
    let mut placed = Vec::new();

    for row in 0..plan.parts_per_column {
        let y = vertical + f64::from(row) * (footprint.height + vertical);
        for column in 0..plan.parts_per_row {
            let x = match plan.spacing {
                SpacingPolicy::WireCentered { .. } => match wires.get(column as usize) {
                    Some(wire) => wire - footprint.width / 2.0,
                    None => continue,
                },
                SpacingPolicy::FreeGrid {
                    horizontal_spacing, ..
                } => horizontal_spacing + f64::from(column) * (footprint.width + horizontal_spacing),
            };

            let inside = x >= -FIT_TOLERANCE
                && y >= -FIT_TOLERANCE
                && x + footprint.width <= geometry.width + FIT_TOLERANCE
                && y + footprint.height <= geometry.height + FIT_TOLERANCE;
            if inside {
                placed.push(Placement {
                    row,
                    column,
                    x,
                    y,
                    width: footprint.width,
                    height: footprint.height,
                });
            }
        }
    }

    placed
}
