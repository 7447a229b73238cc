//! Ordered plating steps and their material cost
//!
//! Cost model: each step is costed on its own as
//! `part area × material $/in²`. Stacked steps over the same area are
//! simply added; no step discounts or modifies another.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::identity::{Id, IdPrefix};
use crate::core::rates::{Material, RateConfig};
use crate::entities::part::PartSpec;

/// Errors raised while editing a plating sequence
#[derive(Debug, Error)]
pub enum PlatingError {
    #[error("No plating step matches '{0}'")]
    StepNotFound(String),

    #[error("'{0}' matches more than one plating step; use more characters")]
    AmbiguousStep(String),

    #[error("Position {position} is out of range (1..={len})")]
    InvalidPosition { position: usize, len: usize },
}

/// One material application in the finishing sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatingStep {
    pub id: Id,

    #[serde(rename = "type")]
    pub material: Material,

    /// 1-based position in the sequence
    pub order: u32,
}

/// Ordered plating steps; `order` always runs 1..=n without gaps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatingSequence {
    steps: Vec<PlatingStep>,
}

impl PlatingSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PlatingStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step at the end, returning its ID
    pub fn push(&mut self, material: Material) -> Id {
        let id = Id::new(IdPrefix::Step);
        self.steps.push(PlatingStep {
            id,
            material,
            order: 0,
        });
        self.renumber();
        id
    }

    /// Remove the step matching `id`
    pub fn remove(&mut self, id: &str) -> Result<PlatingStep, PlatingError> {
        let index = self.position_of(id)?;
        let removed = self.steps.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move the step matching `id` to 1-based `position`, returning its full ID
    pub fn move_to(&mut self, id: &str, position: usize) -> Result<Id, PlatingError> {
        let len = self.steps.len();
        if position == 0 || position > len {
            return Err(PlatingError::InvalidPosition { position, len });
        }
        let index = self.position_of(id)?;
        let step = self.steps.remove(index);
        let moved = step.id;
        self.steps.insert(position - 1, step);
        self.renumber();
        Ok(moved)
    }

    fn position_of(&self, id: &str) -> Result<usize, PlatingError> {
        let matches: Vec<usize> = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.id.matches(id))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(PlatingError::StepNotFound(id.to_string())),
            _ => Err(PlatingError::AmbiguousStep(id.to_string())),
        }
    }

    /// Restore contiguous numbering after edits or after loading a file
    /// whose `order` fields disagree with the list order
    pub fn renumber(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.order = i as u32 + 1;
        }
    }
}

/// Material cost of one plating step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatingCost {
    pub order: u32,
    pub material: Material,
    pub cost_per_part: f64,
    pub cost_per_qty: f64,
}

/// Per-step costs and their sum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatingBreakdown {
    pub steps: Vec<PlatingCost>,
    pub cost_per_part: f64,
    pub cost_per_qty: f64,
}

/// Cost every step independently over the part's full surface area
pub fn estimate(part: &PartSpec, sequence: &PlatingSequence, rates: &RateConfig) -> PlatingBreakdown {
    let area = crate::core::numeric::non_negative(part.surface_area);
    let quantity = f64::from(part.quantity);

    let steps: Vec<PlatingCost> = sequence
        .steps()
        .iter()
        .map(|step| {
            let cost_per_part = area * rates.material_costs.get(step.material);
            PlatingCost {
                order: step.order,
                material: step.material,
                cost_per_part,
                cost_per_qty: cost_per_part * quantity,
            }
        })
        .collect();

    PlatingBreakdown {
        cost_per_part: steps.iter().map(|s| s.cost_per_part).sum(),
        cost_per_qty: steps.iter().map(|s| s.cost_per_qty).sum(),
        steps,
    }
}
