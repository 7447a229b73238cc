//! Labor and material rate table
//!
//! The rate table is keyed by closed enumerations ([`ProcessKind`] and
//! [`Material`]) rather than free-form names, so a misspelled process or
//! material fails when the table is built or edited instead of silently
//! reading as zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Surface-preparation processes that carry a labor rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    GritBlasting,
    Masking,
    Polishing,
}

impl ProcessKind {
    /// Key used in rate files and dotted field paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKind::GritBlasting => "grit_blasting",
            ProcessKind::Masking => "masking",
            ProcessKind::Polishing => "polishing",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ProcessKind::GritBlasting => "Grit Blasting",
            ProcessKind::Masking => "Masking",
            ProcessKind::Polishing => "Polishing",
        }
    }

    /// All processes in display order
    pub fn all() -> &'static [ProcessKind] {
        &[
            ProcessKind::GritBlasting,
            ProcessKind::Masking,
            ProcessKind::Polishing,
        ]
    }

    /// Whether the process has a per-hole rate
    pub fn counts_holes(&self) -> bool {
        matches!(self, ProcessKind::Masking)
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProcessKind {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "grit_blasting" | "gritblasting" | "grit" => Ok(ProcessKind::GritBlasting),
            "masking" | "mask" => Ok(ProcessKind::Masking),
            "polishing" | "polish" => Ok(ProcessKind::Polishing),
            _ => Err(RateError::UnknownProcess(s.to_string())),
        }
    }
}

/// Plating materials with a per-square-inch cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Gold,
    Silver,
    Nickel,
    /// Electroless nickel-phosphorus
    Enp,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Gold => "gold",
            Material::Silver => "silver",
            Material::Nickel => "nickel",
            Material::Enp => "enp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Material::Gold => "Gold",
            Material::Silver => "Silver",
            Material::Nickel => "Nickel",
            Material::Enp => "Electroless Nickel",
        }
    }

    pub fn all() -> &'static [Material] {
        &[Material::Gold, Material::Silver, Material::Nickel, Material::Enp]
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Material {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" | "au" => Ok(Material::Gold),
            "silver" | "ag" => Ok(Material::Silver),
            "nickel" | "ni" => Ok(Material::Nickel),
            "enp" | "electroless_nickel" | "electroless-nickel" => Ok(Material::Enp),
            _ => Err(RateError::UnknownMaterial(s.to_string())),
        }
    }
}

/// Errors raised while loading or editing the rate table
#[derive(Debug, Error)]
pub enum RateError {
    #[error("Unknown rate key: {0} (run `plateq rates keys` for the full list)")]
    UnknownKey(String),

    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Process '{0}' has no per-hole rate")]
    NoHoleRate(ProcessKind),

    #[error("Invalid value for {key}: '{value}' is not a number")]
    NotANumber { key: String, value: String },

    #[error("Invalid value for {key}: {value} ({reason})")]
    OutOfRange {
        key: String,
        value: f64,
        reason: &'static str,
    },

    #[error("Failed to parse rate file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minutes of labor per square inch of treated area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaRate {
    pub minutes_per_square_inch: f64,
}

/// Masking is charged both by area and by hole count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaskingRate {
    pub minutes_per_square_inch: f64,
    pub minutes_per_hole: f64,
}

/// Rate view shared by all processes; `minutes_per_hole` is zero where
/// the process does not count holes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessRate {
    pub minutes_per_square_inch: f64,
    pub minutes_per_hole: f64,
}

/// Per-process labor rates, one field per [`ProcessKind`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessRates {
    pub grit_blasting: AreaRate,
    pub masking: MaskingRate,
    pub polishing: AreaRate,
}

impl ProcessRates {
    /// Look up the rate for a process
    pub fn get(&self, kind: ProcessKind) -> ProcessRate {
        match kind {
            ProcessKind::GritBlasting => ProcessRate {
                minutes_per_square_inch: self.grit_blasting.minutes_per_square_inch,
                minutes_per_hole: 0.0,
            },
            ProcessKind::Masking => ProcessRate {
                minutes_per_square_inch: self.masking.minutes_per_square_inch,
                minutes_per_hole: self.masking.minutes_per_hole,
            },
            ProcessKind::Polishing => ProcessRate {
                minutes_per_square_inch: self.polishing.minutes_per_square_inch,
                minutes_per_hole: 0.0,
            },
        }
    }

    fn area_rate_mut(&mut self, kind: ProcessKind) -> &mut f64 {
        match kind {
            ProcessKind::GritBlasting => &mut self.grit_blasting.minutes_per_square_inch,
            ProcessKind::Masking => &mut self.masking.minutes_per_square_inch,
            ProcessKind::Polishing => &mut self.polishing.minutes_per_square_inch,
        }
    }
}

impl Default for ProcessRates {
    fn default() -> Self {
        Self {
            grit_blasting: AreaRate {
                minutes_per_square_inch: 0.5,
            },
            masking: MaskingRate {
                minutes_per_square_inch: 0.25,
                minutes_per_hole: 0.5,
            },
            polishing: AreaRate {
                minutes_per_square_inch: 0.75,
            },
        }
    }
}

/// Plating material cost in dollars per square inch, one field per [`Material`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialCosts {
    pub gold: f64,
    pub silver: f64,
    pub nickel: f64,
    pub enp: f64,
}

impl MaterialCosts {
    pub fn get(&self, material: Material) -> f64 {
        match material {
            Material::Gold => self.gold,
            Material::Silver => self.silver,
            Material::Nickel => self.nickel,
            Material::Enp => self.enp,
        }
    }

    fn get_mut(&mut self, material: Material) -> &mut f64 {
        match material {
            Material::Gold => &mut self.gold,
            Material::Silver => &mut self.silver,
            Material::Nickel => &mut self.nickel,
            Material::Enp => &mut self.enp,
        }
    }
}

impl Default for MaterialCosts {
    fn default() -> Self {
        Self {
            gold: 0.15,
            silver: 0.05,
            nickel: 0.02,
            enp: 0.03,
        }
    }
}

/// Lot-level settings applied on top of per-part figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationSettings {
    /// Share of nominal rack capacity that is loaded in practice
    pub rack_efficiency_percent: f64,
    /// Fixed handling time added once per lot
    pub buffer_minutes: f64,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            rack_efficiency_percent: 80.0,
            buffer_minutes: 15.0,
        }
    }
}

/// The complete rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateConfig {
    /// Shop labor rate in $/hr
    pub hourly_rate: f64,
    pub processes: ProcessRates,
    pub material_costs: MaterialCosts,
    pub calculations: CalculationSettings,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            hourly_rate: 45.0,
            processes: ProcessRates::default(),
            material_costs: MaterialCosts::default(),
            calculations: CalculationSettings::default(),
        }
    }
}

/// Editable rate keys with descriptions
pub const RATE_KEYS: &[(&str, &str)] = &[
    ("hourly_rate", "Shop labor rate ($/hr)"),
    (
        "processes.grit_blasting.minutes_per_square_inch",
        "Grit blasting time (min/in²)",
    ),
    (
        "processes.masking.minutes_per_square_inch",
        "Masking time by area (min/in²)",
    ),
    (
        "processes.masking.minutes_per_hole",
        "Masking time per hole (min/hole)",
    ),
    (
        "processes.polishing.minutes_per_square_inch",
        "Polishing time (min/in²)",
    ),
    ("material_costs.gold", "Gold plating cost ($/in²)"),
    ("material_costs.silver", "Silver plating cost ($/in²)"),
    ("material_costs.nickel", "Nickel plating cost ($/in²)"),
    ("material_costs.enp", "Electroless nickel cost ($/in²)"),
    (
        "calculations.rack_efficiency_percent",
        "Usable share of rack capacity (%)",
    ),
    (
        "calculations.buffer_minutes",
        "Handling time added once per lot (min)",
    ),
];

/// A parsed dotted rate key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateField {
    HourlyRate,
    AreaRate(ProcessKind),
    HoleRate,
    MaterialCost(Material),
    RackEfficiency,
    BufferMinutes,
}

impl FromStr for RateField {
    type Err = RateError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["hourly_rate"] => Ok(RateField::HourlyRate),
            ["processes", process, field] => {
                let kind: ProcessKind = process
                    .parse()
                    .map_err(|_| RateError::UnknownKey(key.to_string()))?;
                match *field {
                    "minutes_per_square_inch" => Ok(RateField::AreaRate(kind)),
                    "minutes_per_hole" if kind.counts_holes() => Ok(RateField::HoleRate),
                    "minutes_per_hole" => Err(RateError::NoHoleRate(kind)),
                    _ => Err(RateError::UnknownKey(key.to_string())),
                }
            }
            ["material_costs", material] => material
                .parse()
                .map(RateField::MaterialCost)
                .map_err(|_| RateError::UnknownKey(key.to_string())),
            ["calculations", "rack_efficiency_percent"] => Ok(RateField::RackEfficiency),
            ["calculations", "buffer_minutes"] => Ok(RateField::BufferMinutes),
            _ => Err(RateError::UnknownKey(key.to_string())),
        }
    }
}

impl RateField {
    /// Range rule for a value of this field
    fn check(self, key: &str, value: f64) -> Result<(), RateError> {
        let reason = match self {
            _ if !value.is_finite() => "must be a finite number",
            RateField::HourlyRate if value <= 0.0 => "must be greater than zero",
            RateField::RackEfficiency if !(0.0..=100.0).contains(&value) => {
                "must be between 0 and 100"
            }
            _ if value < 0.0 => "must not be negative",
            _ => return Ok(()),
        };
        Err(RateError::OutOfRange {
            key: key.to_string(),
            value,
            reason,
        })
    }
}

impl RateConfig {
    /// Load a rate table from YAML, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, RateError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "rate file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let rates: Self = serde_yml::from_str(&contents).map_err(|e| RateError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        rates.validate()?;
        Ok(rates)
    }

    /// Check every field against the same rules `with_field` applies
    pub fn validate(&self) -> Result<(), RateError> {
        for (key, value) in self.entries() {
            key.parse::<RateField>()?.check(key, value)?;
        }
        Ok(())
    }

    /// Write the rate table as YAML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), RateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yml::to_string(self).map_err(|e| RateError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Read a single field by dotted key
    pub fn get_field(&self, key: &str) -> Result<f64, RateError> {
        let value = match key.parse::<RateField>()? {
            RateField::HourlyRate => self.hourly_rate,
            RateField::AreaRate(kind) => self.processes.get(kind).minutes_per_square_inch,
            RateField::HoleRate => self.processes.masking.minutes_per_hole,
            RateField::MaterialCost(material) => self.material_costs.get(material),
            RateField::RackEfficiency => self.calculations.rack_efficiency_percent,
            RateField::BufferMinutes => self.calculations.buffer_minutes,
        };
        Ok(value)
    }

    /// Return a copy of this table with one field replaced
    ///
    /// `value` is coerced from text; the hourly rate must be positive, the
    /// rack efficiency must lie in 0..=100 and every other field must be
    /// non-negative.
    pub fn with_field(&self, key: &str, value: &str) -> Result<Self, RateError> {
        let field: RateField = key.parse()?;
        let number =
            crate::core::numeric::parse_number(value).ok_or_else(|| RateError::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
            })?;

        field.check(key, number)?;

        let mut next = self.clone();
        match field {
            RateField::HourlyRate => next.hourly_rate = number,
            RateField::AreaRate(kind) => *next.processes.area_rate_mut(kind) = number,
            RateField::HoleRate => next.processes.masking.minutes_per_hole = number,
            RateField::MaterialCost(material) => *next.material_costs.get_mut(material) = number,
            RateField::RackEfficiency => next.calculations.rack_efficiency_percent = number,
            RateField::BufferMinutes => next.calculations.buffer_minutes = number,
        }

        Ok(next)
    }

    /// All editable keys paired with their current values
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        RATE_KEYS
            .iter()
            .filter_map(|(key, _)| self.get_field(key).ok().map(|v| (*key, v)))
            .collect()
    }
}
