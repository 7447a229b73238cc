//! Core module - configuration, rate table and external collaborators

pub mod config;
pub mod extract;
pub mod identity;
pub mod logging;
pub mod numeric;
pub mod project;
pub mod rates;
pub mod store;

pub use config::Config;
pub use extract::{CommandExtractor, ServiceError, TextExtractor};
pub use identity::{Id, IdParseError, IdPrefix};
pub use project::{Project, ProjectError};
pub use rates::{Material, ProcessKind, ProcessRate, RateConfig, RateError};
pub use store::RateStore;
