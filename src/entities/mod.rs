//! Quote inputs and the calculations run over them
//!
//! - [`PartSpec`] / [`PrepOptions`] - what is being quoted
//! - [`labor`] - prep minutes and cost per operation
//! - [`rack`] - rack capacity and layout
//! - [`plating`] - ordered plating steps and material cost
//! - [`Quote`] - a saved quote document tying the above together

pub mod labor;
pub mod part;
pub mod plating;
pub mod quote;
pub mod rack;

pub use labor::{LaborBreakdown, LaborResult, Totals};
pub use part::{PartSpec, PrepOperation, PrepOptions};
pub use plating::{PlatingBreakdown, PlatingError, PlatingSequence, PlatingStep};
pub use quote::{Quote, QuoteError, QuoteSummary, RackSetup};
pub use rack::{PartFootprint, Placement, RackGeometry, RackPlan, SpacingPolicy};
