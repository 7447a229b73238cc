//! Property-based tests for the estimator and rack planner.
//!
//! Run with: cargo test --test properties

use plateq::core::rates::{Material, ProcessKind, RateConfig};
use plateq::entities::labor::{self, operation_minutes};
use plateq::entities::part::{PartSpec, PrepOperation, PrepOptions};
use plateq::entities::plating::PlatingSequence;
use plateq::entities::rack::{self, PartFootprint, RackGeometry, SpacingPolicy};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_area() -> impl Strategy<Value = f64> {
    0.0..500.0f64
}

fn arb_operation() -> impl Strategy<Value = PrepOperation> {
    (any::<bool>(), arb_area(), 0u32..200).prop_map(|(enabled, surface_area, holes_count)| {
        PrepOperation {
            enabled,
            surface_area,
            holes_count,
        }
    })
}

fn arb_prep() -> impl Strategy<Value = PrepOptions> {
    (arb_operation(), arb_operation(), arb_operation()).prop_map(|(g, m, p)| PrepOptions {
        grit_blasting: g,
        masking: m,
        polishing: p,
    })
}

fn arb_part() -> impl Strategy<Value = PartSpec> {
    (1u32..10_000, 0.01..500.0f64).prop_map(|(q, a)| PartSpec::new(q, a))
}

/// Rate tables with non-negative rates, including zeros
fn arb_rates() -> impl Strategy<Value = RateConfig> {
    (
        1.0..200.0f64,
        prop::array::uniform4(0.0..3.0f64),
    )
        .prop_map(|(hourly, [grit, mask_area, mask_hole, polish])| {
            let mut rates = RateConfig::default();
            rates.hourly_rate = hourly;
            rates.processes.grit_blasting.minutes_per_square_inch = grit;
            rates.processes.masking.minutes_per_square_inch = mask_area;
            rates.processes.masking.minutes_per_hole = mask_hole;
            rates.processes.polishing.minutes_per_square_inch = polish;
            rates
        })
}

fn arb_spacing() -> impl Strategy<Value = SpacingPolicy> {
    prop_oneof![
        (0.0..2.0f64).prop_map(|v| SpacingPolicy::WireCentered {
            vertical_spacing: v
        }),
        (0.0..2.0f64, 0.0..2.0f64).prop_map(|(h, v)| SpacingPolicy::FreeGrid {
            horizontal_spacing: h,
            vertical_spacing: v,
        }),
    ]
}

fn arb_footprint() -> impl Strategy<Value = PartFootprint> {
    (0.1..25.0f64, 0.1..15.0f64).prop_map(|(w, h)| PartFootprint::new(w, h))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// =============================================================================
// Labor estimator
// =============================================================================

proptest! {
    #[test]
    fn scaling_law_holds(part in arb_part(), prep in arb_prep(), rates in arb_rates()) {
        let breakdown = labor::estimate(&part, &prep, &rates);
        let quantity = f64::from(part.quantity);
        for (_, result) in breakdown.iter() {
            prop_assert_eq!(result.minutes_per_qty, result.minutes_per_part * quantity);
            prop_assert_eq!(result.cost_per_qty, result.cost_per_part * quantity);
        }
    }

    #[test]
    fn disabled_operation_is_all_zero(
        part in arb_part(),
        op in arb_operation(),
        rates in arb_rates(),
    ) {
        let disabled = PrepOperation { enabled: false, ..op };
        for kind in ProcessKind::all() {
            let prep = PrepOptions::default().with(*kind, disabled);
            let breakdown = labor::estimate(&part, &prep, &rates);
            prop_assert!(breakdown.get(*kind).is_zero());
        }
    }

    #[test]
    fn masking_is_additive(area in arb_area(), holes in 0u32..200, rates in arb_rates()) {
        let both = operation_minutes(ProcessKind::Masking, &PrepOperation::masking(area, holes), &rates);
        let area_only = operation_minutes(ProcessKind::Masking, &PrepOperation::masking(area, 0), &rates);
        let holes_only = operation_minutes(ProcessKind::Masking, &PrepOperation::masking(0.0, holes), &rates);
        prop_assert!(close(both, area_only + holes_only));
    }

    #[test]
    fn totals_are_fieldwise_sum(part in arb_part(), prep in arb_prep(), rates in arb_rates()) {
        let breakdown = labor::estimate(&part, &prep, &rates);
        let totals = breakdown.totals();
        let (g, m, p) = (breakdown.grit_blasting, breakdown.masking, breakdown.polishing);

        prop_assert!(close(totals.minutes_per_part, g.minutes_per_part + m.minutes_per_part + p.minutes_per_part));
        prop_assert!(close(totals.minutes_per_qty, g.minutes_per_qty + m.minutes_per_qty + p.minutes_per_qty));
        prop_assert!(close(totals.cost_per_part, g.cost_per_part + m.cost_per_part + p.cost_per_part));
        prop_assert!(close(totals.cost_per_qty, g.cost_per_qty + m.cost_per_qty + p.cost_per_qty));
    }

    #[test]
    fn estimate_never_negative(part in arb_part(), prep in arb_prep(), rates in arb_rates()) {
        let breakdown = labor::estimate(&part, &prep, &rates);
        for (_, result) in breakdown.iter() {
            prop_assert!(result.minutes_per_part >= 0.0);
            prop_assert!(result.cost_per_qty >= 0.0);
        }
    }

    #[test]
    fn estimate_is_deterministic(part in arb_part(), prep in arb_prep(), rates in arb_rates()) {
        prop_assert_eq!(
            labor::estimate(&part, &prep, &rates),
            labor::estimate(&part, &prep, &rates)
        );
    }
}

// =============================================================================
// Rack planner
// =============================================================================

proptest! {
    #[test]
    fn rack_capacity_law(
        footprint in arb_footprint(),
        spacing in arb_spacing(),
        quantity in 0u32..100_000,
    ) {
        let geometry = RackGeometry::default();
        let plan = rack::plan(&geometry, &footprint, &spacing, quantity).unwrap();

        prop_assert_eq!(plan.capacity_per_rack, plan.parts_per_row * plan.parts_per_column);

        match plan.racks_needed {
            Some(racks) => {
                let capacity = u64::from(plan.capacity_per_rack);
                prop_assert!(capacity > 0);
                prop_assert!(racks * capacity >= u64::from(quantity));
                prop_assert!(racks == 0 || (racks - 1) * capacity < u64::from(quantity));
            }
            None => prop_assert_eq!(plan.capacity_per_rack, 0),
        }
    }

    #[test]
    fn wire_centered_row_is_wire_count(
        footprint in arb_footprint(),
        vertical in 0.0..2.0f64,
        wires in 1u32..40,
    ) {
        let geometry = RackGeometry { wire_count: wires, ..RackGeometry::default() };
        let policy = SpacingPolicy::WireCentered { vertical_spacing: vertical };
        let plan = rack::plan(&geometry, &footprint, &policy, 1).unwrap();
        prop_assert_eq!(plan.parts_per_row, wires);
    }

    #[test]
    fn spacing_never_below_minimum(footprint in arb_footprint(), spacing in arb_spacing()) {
        let geometry = RackGeometry::default();
        let plan = rack::plan(&geometry, &footprint, &spacing, 1).unwrap();
        prop_assert!(plan.spacing.vertical_spacing() >= rack::MIN_SPACING);
        prop_assert!(plan.spacing.horizontal_spacing(&geometry) >= rack::MIN_SPACING);
    }

    #[test]
    fn placements_fit_inside_rack(footprint in arb_footprint(), spacing in arb_spacing()) {
        let geometry = RackGeometry::default();
        let plan = rack::plan(&geometry, &footprint, &spacing, 1).unwrap();
        let placed = rack::placements(&geometry, &footprint, &plan);

        prop_assert!(placed.len() as u64 <= u64::from(plan.capacity_per_rack));
        for p in &placed {
            prop_assert!(p.x >= -1e-9 && p.y >= -1e-9);
            prop_assert!(p.x + p.width <= geometry.width + 1e-9);
            prop_assert!(p.y + p.height <= geometry.height + 1e-9);
        }
    }
}

// =============================================================================
// Plating sequence
// =============================================================================

proptest! {
    #[test]
    fn plating_order_stays_contiguous(
        ops in prop::collection::vec((0usize..4, 0usize..8, 1usize..8), 1..30),
    ) {
        let mut sequence = PlatingSequence::new();
        for (kind, index, position) in ops {
            match kind {
                0 | 1 => {
                    sequence.push(Material::all()[index % Material::all().len()]);
                }
                2 if !sequence.is_empty() => {
                    let id = sequence.steps()[index % sequence.len()].id.to_string();
                    sequence.remove(&id).unwrap();
                }
                3 if !sequence.is_empty() => {
                    let id = sequence.steps()[index % sequence.len()].id.to_string();
                    let target = (position - 1) % sequence.len() + 1;
                    sequence.move_to(&id, target).unwrap();
                }
                _ => {}
            }

            let orders: Vec<u32> = sequence.steps().iter().map(|s| s.order).collect();
            let expected: Vec<u32> = (1..=sequence.len() as u32).collect();
            prop_assert_eq!(orders, expected);
        }
    }
}
