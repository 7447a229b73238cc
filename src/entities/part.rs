//! Part and surface-preparation inputs

use serde::{Deserialize, Serialize};

use crate::core::numeric;
use crate::core::rates::ProcessKind;

/// One physical part being quoted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartSpec {
    /// Order quantity
    pub quantity: u32,

    /// Total surface area of one part (in²)
    pub surface_area: f64,
}

impl Default for PartSpec {
    fn default() -> Self {
        Self {
            quantity: 1,
            surface_area: 0.0,
        }
    }
}

impl PartSpec {
    pub fn new(quantity: u32, surface_area: f64) -> Self {
        Self {
            quantity,
            surface_area,
        }
    }

    /// Both quantity and area are positive; prep, racking and plating
    /// figures are only meaningful for a complete part
    pub fn is_complete(&self) -> bool {
        self.quantity > 0 && self.surface_area > 0.0
    }

    /// Copy with quantity floored at one and a finite, non-negative area
    pub fn sanitized(&self) -> Self {
        Self {
            quantity: self.quantity.max(1),
            surface_area: numeric::non_negative(self.surface_area),
        }
    }
}

/// A single surface-preparation step
///
/// Area and hole count are kept while the step is disabled so toggling it
/// back on restores the previous figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrepOperation {
    #[serde(default)]
    pub enabled: bool,

    /// Treated area per part (in²)
    #[serde(default)]
    pub surface_area: f64,

    /// Holes to plug per part (masking only)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub holes_count: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl PrepOperation {
    /// Enabled operation covering an area
    pub fn area(surface_area: f64) -> Self {
        Self {
            enabled: true,
            surface_area,
            holes_count: 0,
        }
    }

    /// Enabled masking operation with area and holes
    pub fn masking(surface_area: f64, holes_count: u32) -> Self {
        Self {
            enabled: true,
            surface_area,
            holes_count,
        }
    }

    pub fn toggled(self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            surface_area: numeric::non_negative(self.surface_area),
            ..*self
        }
    }
}

/// The three prep operations, one per [`ProcessKind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepOptions {
    pub grit_blasting: PrepOperation,
    pub masking: PrepOperation,
    pub polishing: PrepOperation,
}

impl PrepOptions {
    pub fn get(&self, kind: ProcessKind) -> &PrepOperation {
        match kind {
            ProcessKind::GritBlasting => &self.grit_blasting,
            ProcessKind::Masking => &self.masking,
            ProcessKind::Polishing => &self.polishing,
        }
    }

    pub fn get_mut(&mut self, kind: ProcessKind) -> &mut PrepOperation {
        match kind {
            ProcessKind::GritBlasting => &mut self.grit_blasting,
            ProcessKind::Masking => &mut self.masking,
            ProcessKind::Polishing => &mut self.polishing,
        }
    }

    /// Copy with one operation replaced
    pub fn with(mut self, kind: ProcessKind, operation: PrepOperation) -> Self {
        *self.get_mut(kind) = operation;
        self
    }

    /// Copy with every area made finite and non-negative
    pub fn sanitized(&self) -> Self {
        Self {
            grit_blasting: self.grit_blasting.sanitized(),
            masking: self.masking.sanitized(),
            polishing: self.polishing.sanitized(),
        }
    }

    pub fn any_enabled(&self) -> bool {
        ProcessKind::all().iter().any(|k| self.get(*k).enabled)
    }
}
