//! Quote entity - one part with its prep, racking and plating choices
//!
//! A quote is a plain YAML document. Evaluating it against a rate table
//! snapshot produces a [`QuoteSummary`]; nothing computed is written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::identity::{Id, IdPrefix};
use crate::core::rates::RateConfig;
use crate::entities::labor::{self, LaborBreakdown, Totals};
use crate::entities::part::{PartSpec, PrepOptions};
use crate::entities::plating::{self, PlatingBreakdown, PlatingSequence};
use crate::entities::rack::{self, PartFootprint, RackGeometry, RackPlan, SpacingPolicy};

/// Errors raised while reading or writing quote files
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Failed to parse quote {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to serialize quote: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the part hangs on the rack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RackSetup {
    /// Rack dimensions (defaults to the standard shop rack)
    #[serde(default)]
    pub geometry: RackGeometry,

    pub footprint: PartFootprint,

    #[serde(default)]
    pub spacing: SpacingPolicy,
}

/// Quote document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quote {
    /// Unique identifier (QUOT-...)
    pub id: Id,

    /// Short title, usually the part number or customer reference
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub part: PartSpec,

    #[serde(default)]
    pub prep: PrepOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<RackSetup>,

    #[serde(default)]
    pub plating: PlatingSequence,

    pub created: DateTime<Utc>,

    pub author: String,
}

impl Quote {
    pub fn new(title: impl Into<String>, part: PartSpec, author: impl Into<String>) -> Self {
        Self {
            id: Id::new(IdPrefix::Quot),
            title: title.into(),
            description: None,
            part,
            prep: PrepOptions::default(),
            rack: None,
            plating: PlatingSequence::new(),
            created: Utc::now(),
            author: author.into(),
        }
    }

    /// Read a quote file, renumbering plating steps if their order drifted
    pub fn load(path: &Path) -> Result<Self, QuoteError> {
        let contents = std::fs::read_to_string(path)?;
        let mut quote: Quote = serde_yml::from_str(&contents).map_err(|e| QuoteError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        quote.plating.renumber();
        Ok(quote)
    }

    pub fn save(&self, path: &Path) -> Result<(), QuoteError> {
        let yaml = serde_yml::to_string(self).map_err(|e| QuoteError::Serialize(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// File name used inside a project's quotes directory
    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.id)
    }

    /// Compute every figure for this quote against one rate snapshot
    pub fn evaluate(&self, rates: &RateConfig) -> QuoteSummary {
        let part = self.part.sanitized();
        let prep = self.prep.sanitized();

        if !self.part.is_complete() {
            tracing::debug!(id = %self.id, "quote part incomplete; skipping figures");
            return QuoteSummary {
                part,
                complete: false,
                labor: None,
                plating: None,
                rack: None,
                totals: None,
            };
        }

        let labor = labor::estimate(&part, &prep, rates);
        let plating = plating::estimate(&part, &self.plating, rates);
        let rack = self
            .rack
            .and_then(|setup| rack::plan(&setup.geometry, &setup.footprint, &setup.spacing, part.quantity))
            .map(|plan| RackSummary {
                effective_racks: plan
                    .effective_racks(part.quantity, rates.calculations.rack_efficiency_percent),
                plan,
            });

        let totals = QuoteTotals::combine(&labor.totals(), &plating, rates);

        QuoteSummary {
            part,
            complete: true,
            labor: Some(labor),
            plating: Some(plating),
            rack,
            totals: Some(totals),
        }
    }
}

/// Rack plan plus the count after derating for rack efficiency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RackSummary {
    #[serde(flatten)]
    pub plan: RackPlan,

    pub effective_racks: Option<u64>,
}

/// Labor and plating combined, plus lot-level handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    /// Prep labor totals (sum over operations)
    pub labor: Totals,

    pub cost_per_part: f64,
    pub cost_per_qty: f64,

    /// Handling time charged once per lot
    pub buffer_minutes: f64,

    /// Prep minutes for the whole order plus buffer
    pub lot_minutes: f64,

    /// Order cost including buffer time
    pub lot_cost: f64,
}

impl QuoteTotals {
    fn combine(labor: &Totals, plating: &PlatingBreakdown, rates: &RateConfig) -> Self {
        let buffer_minutes = crate::core::numeric::non_negative(rates.calculations.buffer_minutes);
        let cost_per_qty = labor.cost_per_qty + plating.cost_per_qty;
        Self {
            labor: *labor,
            cost_per_part: labor.cost_per_part + plating.cost_per_part,
            cost_per_qty,
            buffer_minutes,
            lot_minutes: labor.minutes_per_qty + buffer_minutes,
            lot_cost: cost_per_qty + (buffer_minutes / 60.0) * rates.hourly_rate,
        }
    }
}

/// Everything computed for a quote
///
/// Sections are `None` while the part is incomplete; `rack` is also `None`
/// when no rack setup is given or the footprint is not usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub part: PartSpec,
    pub complete: bool,
    pub labor: Option<LaborBreakdown>,
    pub plating: Option<PlatingBreakdown>,
    pub rack: Option<RackSummary>,
    pub totals: Option<QuoteTotals>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{Material, ProcessKind};
    use crate::entities::part::PrepOperation;
    use tempfile::TempDir;

    fn sample_quote() -> Quote {
        let mut quote = Quote::new("Bracket 1045-A", PartSpec::new(200, 10.0), "Estimator");
        quote.prep = PrepOptions::default()
            .with(ProcessKind::GritBlasting, PrepOperation::area(10.0))
            .with(ProcessKind::Masking, PrepOperation::masking(0.0, 4));
        quote.rack = Some(RackSetup {
            geometry: RackGeometry::default(),
            footprint: PartFootprint::new(1.0, 2.0),
            spacing: SpacingPolicy::default(),
        });
        quote.plating.push(Material::Nickel);
        quote.plating.push(Material::Gold);
        quote
    }

    #[test]
    fn test_evaluate_complete_quote() {
        let summary = sample_quote().evaluate(&RateConfig::default());
        assert!(summary.complete);

        let labor = summary.labor.unwrap();
        assert!((labor.grit_blasting.minutes_per_part - 5.0).abs() < 1e-9);
        assert!((labor.masking.minutes_per_part - 2.0).abs() < 1e-9);

        let totals = summary.totals.unwrap();
        // 7 min/part at $45/hr = 5.25, plating 10 × 0.17 = 1.70
        assert!((totals.cost_per_part - 6.95).abs() < 1e-9);
        assert!((totals.cost_per_qty - 1390.0).abs() < 1e-9);
        assert!((totals.lot_minutes - 1415.0).abs() < 1e-9);
        assert!((totals.lot_cost - (1390.0 + 11.25)).abs() < 1e-9);

        // floor(13.25 / 2.25) = 5 rows of 13
        let rack = summary.rack.unwrap();
        assert_eq!(rack.plan.capacity_per_rack, 65);
        assert_eq!(rack.plan.racks_needed, Some(4));
        // 80% of 65 = 52 per rack
        assert_eq!(rack.effective_racks, Some(4));
    }

    #[test]
    fn test_incomplete_part_withholds_figures() {
        let mut quote = sample_quote();
        quote.part.surface_area = 0.0;
        let summary = quote.evaluate(&RateConfig::default());

        assert!(!summary.complete);
        assert!(summary.labor.is_none());
        assert!(summary.plating.is_none());
        assert!(summary.rack.is_none());
        assert!(summary.totals.is_none());
    }

    #[test]
    fn test_missing_rack_setup() {
        let mut quote = sample_quote();
        quote.rack = None;
        let summary = quote.evaluate(&RateConfig::default());
        assert!(summary.complete);
        assert!(summary.rack.is_none());
    }

    #[test]
    fn test_labor_totals_exclude_buffer() {
        let summary = sample_quote().evaluate(&RateConfig::default());
        let labor = summary.labor.unwrap();
        let totals = summary.totals.unwrap();
        assert_eq!(totals.labor, labor.totals());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let quote = sample_quote();
        let path = tmp.path().join(quote.file_name());
        quote.save(&path).unwrap();

        let loaded = Quote::load(&path).unwrap();
        assert_eq!(loaded.id, quote.id);
        assert_eq!(loaded.title, "Bracket 1045-A");
        assert_eq!(loaded.plating, quote.plating);
        assert_eq!(loaded.rack, quote.rack);
        assert_eq!(loaded.prep, quote.prep);
    }

    #[test]
    fn test_load_minimal_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("q.yaml");
        let id = Id::new(IdPrefix::Quot);
        std::fs::write(
            &path,
            format!(
                "id: {}\ntitle: Minimal\npart:\n  quantity: 10\n  surface_area: 2.5\n\
                 rack:\n  footprint:\n    width: 4\n    height: 2\n  spacing:\n    policy: free_grid\n    horizontal_spacing: 0.25\n    vertical_spacing: 0.25\n\
                 created: 2026-01-05T10:00:00Z\nauthor: Test\n",
                id
            ),
        )
        .unwrap();

        let quote = Quote::load(&path).unwrap();
        assert!(!quote.prep.any_enabled());
        assert!(quote.plating.is_empty());
        let rack = quote.rack.unwrap();
        assert_eq!(rack.geometry, RackGeometry::default());

        let summary = quote.evaluate(&RateConfig::default());
        assert_eq!(summary.rack.unwrap().plan.parts_per_row, 5);
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("q.yaml");
        std::fs::write(&path, "title: [unclosed").unwrap();
        assert!(matches!(Quote::load(&path), Err(QuoteError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("q.yaml");
        let id = Id::new(IdPrefix::Quot);
        let header = format!(
            "id: {}\ntitle: Typo\npart:\n  quantity: 10\n  surface_area: 2.5\n\
             created: 2026-01-05T10:00:00Z\nauthor: Test\n",
            id
        );

        let documents = [
            "prep:\n  grit_blasting:\n    enabled: true\n    surface_aera: 10\n",
            "racks:\n  footprint:\n    width: 4\n    height: 2\n",
            "rack:\n  footprint:\n    width: 4\n    hieght: 2\n",
            "rack:\n  footprint:\n    width: 4\n    height: 2\n  geometry:\n    width: 21\n    height: 13\n    wires: 13\n",
            "rack:\n  footprint:\n    width: 4\n    height: 2\n  spacing:\n    policy: wire_centered\n    vertical_spacing: 0.5\n    horizontal_spacing: 1\n",
        ];
        for extra in documents {
            std::fs::write(&path, format!("{}{}", header, extra)).unwrap();
            assert!(
                matches!(Quote::load(&path), Err(QuoteError::Parse { .. })),
                "accepted unknown key in:\n{}",
                extra
            );
        }

        std::fs::write(
            &path,
            header.replace("  surface_area: 2.5\n", "  surface_area: 2.5\n  qty: 5\n"),
        )
        .unwrap();
        assert!(matches!(Quote::load(&path), Err(QuoteError::Parse { .. })));
    }
}
