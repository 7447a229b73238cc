//! Prep labor estimation
//!
//! Turns a part, its prep operations and a rate table into minutes and cost
//! per operation, per part and per order quantity.
//!
//! The estimator is a pure function of its inputs. It never fails; callers
//! sanitize figures first (see [`crate::core::numeric`]).

use serde::{Deserialize, Serialize};

use crate::core::rates::{ProcessKind, RateConfig};
use crate::entities::part::{PartSpec, PrepOperation, PrepOptions};

/// Time and cost figures for one operation, or the sum of several
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborResult {
    pub minutes_per_part: f64,
    pub minutes_per_qty: f64,
    pub cost_per_part: f64,
    pub cost_per_qty: f64,
}

/// Aggregate over all operations
pub type Totals = LaborResult;

impl LaborResult {
    /// Derive the remaining figures from minutes per part
    pub fn from_minutes(minutes_per_part: f64, quantity: u32, hourly_rate: f64) -> Self {
        let quantity = f64::from(quantity);
        let cost_per_part = (minutes_per_part / 60.0) * hourly_rate;
        Self {
            minutes_per_part,
            minutes_per_qty: minutes_per_part * quantity,
            cost_per_part,
            cost_per_qty: cost_per_part * quantity,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl std::ops::Add for LaborResult {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            minutes_per_part: self.minutes_per_part + other.minutes_per_part,
            minutes_per_qty: self.minutes_per_qty + other.minutes_per_qty,
            cost_per_part: self.cost_per_part + other.cost_per_part,
            cost_per_qty: self.cost_per_qty + other.cost_per_qty,
        }
    }
}

impl std::iter::Sum for LaborResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, r| acc + r)
    }
}

/// Labor figures for every prep operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborBreakdown {
    pub grit_blasting: LaborResult,
    pub masking: LaborResult,
    pub polishing: LaborResult,
}

impl LaborBreakdown {
    pub fn get(&self, kind: ProcessKind) -> &LaborResult {
        match kind {
            ProcessKind::GritBlasting => &self.grit_blasting,
            ProcessKind::Masking => &self.masking,
            ProcessKind::Polishing => &self.polishing,
        }
    }

    /// Operations paired with their results, in display order
    pub fn iter(&self) -> impl Iterator<Item = (ProcessKind, &LaborResult)> + '_ {
        ProcessKind::all().iter().map(move |k| (*k, self.get(*k)))
    }

    /// Field-wise sum across all operations
    pub fn totals(&self) -> Totals {
        self.iter().map(|(_, r)| *r).sum()
    }
}

/// Minutes per part for one operation under the given rates
///
/// Area and hole contributions are independent: either, both or neither
/// may be zero. Disabled operations contribute nothing.
pub fn operation_minutes(kind: ProcessKind, operation: &PrepOperation, rates: &RateConfig) -> f64 {
    if !operation.enabled {
        return 0.0;
    }

    let rate = rates.processes.get(kind);
    let area_minutes = if operation.surface_area > 0.0 {
        operation.surface_area * rate.minutes_per_square_inch
    } else {
        0.0
    };

    let hole_minutes = if kind.counts_holes() && operation.holes_count > 0 {
        f64::from(operation.holes_count) * rate.minutes_per_hole
    } else {
        0.0
    };

    area_minutes + hole_minutes
}

/// Estimate labor for one operation
pub fn estimate_operation(
    kind: ProcessKind,
    part: &PartSpec,
    operation: &PrepOperation,
    rates: &RateConfig,
) -> LaborResult {
    if !operation.enabled {
        return LaborResult::default();
    }
    let minutes = operation_minutes(kind, operation, rates);
    LaborResult::from_minutes(minutes, part.quantity, rates.hourly_rate)
}

/// Estimate labor for every prep operation
pub fn estimate(part: &PartSpec, prep: &PrepOptions, rates: &RateConfig) -> LaborBreakdown {
    let breakdown = LaborBreakdown {
        grit_blasting: estimate_operation(
            ProcessKind::GritBlasting,
            part,
            &prep.grit_blasting,
            rates,
        ),
        masking: estimate_operation(ProcessKind::Masking, part, &prep.masking, rates),
        polishing: estimate_operation(ProcessKind::Polishing, part, &prep.polishing, rates),
    };

    tracing::debug!(
        quantity = part.quantity,
        minutes_per_part = breakdown.totals().minutes_per_part,
        "estimated prep labor"
    );

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_grit_blasting_scenario() {
        // 10 in² at 0.5 min/in², 100 parts, $45/hr
        let part = PartSpec::new(100, 10.0);
        let prep = PrepOptions::default()
            .with(ProcessKind::GritBlasting, PrepOperation::area(10.0));
        let result = estimate(&part, &prep, &RateConfig::default()).grit_blasting;

        assert!(close(result.minutes_per_part, 5.0));
        assert!(close(result.minutes_per_qty, 500.0));
        assert!(close(result.cost_per_part, 3.75));
        assert!(close(result.cost_per_qty, 375.0));
    }

    #[test]
    fn test_masking_holes_only() {
        let part = PartSpec::new(1, 6.0);
        let prep = PrepOptions::default().with(ProcessKind::Masking, PrepOperation::masking(0.0, 4));
        let result = estimate(&part, &prep, &RateConfig::default()).masking;

        assert!(close(result.minutes_per_part, 2.0));
    }

    #[test]
    fn test_masking_area_and_holes_add() {
        let part = PartSpec::new(3, 6.0);
        let prep = PrepOptions::default().with(ProcessKind::Masking, PrepOperation::masking(4.0, 2));
        let result = estimate(&part, &prep, &RateConfig::default()).masking;

        // 4 × 0.25 + 2 × 0.5
        assert!(close(result.minutes_per_part, 2.0));
        assert!(close(result.minutes_per_qty, 6.0));
    }

    #[test]
    fn test_enabled_with_zero_area_is_zero() {
        let part = PartSpec::new(5, 6.0);
        let prep = PrepOptions::default().with(ProcessKind::Polishing, PrepOperation::area(0.0));
        assert!(estimate(&part, &prep, &RateConfig::default()).polishing.is_zero());
    }

    #[test]
    fn test_disabled_operation_is_zero() {
        let part = PartSpec::new(50, 6.0);
        let prep = PrepOptions::default()
            .with(ProcessKind::Masking, PrepOperation::masking(8.0, 12).toggled());
        let breakdown = estimate(&part, &prep, &RateConfig::default());

        assert!(breakdown.masking.is_zero());
        assert!(breakdown.totals().is_zero());
    }

    #[test]
    fn test_holes_ignored_outside_masking() {
        let rates = RateConfig::default();
        let op = PrepOperation {
            enabled: true,
            surface_area: 2.0,
            holes_count: 10,
        };
        assert!(close(operation_minutes(ProcessKind::Polishing, &op, &rates), 1.5));
    }

    #[test]
    fn test_totals_sum_all_operations() {
        let part = PartSpec::new(20, 12.0);
        let prep = PrepOptions {
            grit_blasting: PrepOperation::area(12.0),
            masking: PrepOperation::masking(1.0, 3),
            polishing: PrepOperation::area(4.0),
        };
        let breakdown = estimate(&part, &prep, &RateConfig::default());
        let totals = breakdown.totals();

        // 6 + 1.75 + 3 minutes per part
        assert!(close(totals.minutes_per_part, 10.75));
        assert!(close(totals.minutes_per_qty, 215.0));
        assert!(close(
            totals.cost_per_qty,
            breakdown.grit_blasting.cost_per_qty
                + breakdown.masking.cost_per_qty
                + breakdown.polishing.cost_per_qty
        ));
    }

    #[test]
    fn test_zero_rates_tolerated() {
        let mut rates = RateConfig::default();
        rates.processes.grit_blasting.minutes_per_square_inch = 0.0;
        let part = PartSpec::new(10, 5.0);
        let prep = PrepOptions::default().with(ProcessKind::GritBlasting, PrepOperation::area(5.0));
        assert!(estimate(&part, &prep, &rates).grit_blasting.is_zero());
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let part = PartSpec::new(7, 3.3);
        let prep = PrepOptions {
            grit_blasting: PrepOperation::area(3.3),
            masking: PrepOperation::masking(0.7, 5),
            polishing: PrepOperation::area(1.1),
        };
        let rates = RateConfig::default();
        assert_eq!(estimate(&part, &prep, &rates), estimate(&part, &prep, &rates));
    }
}
