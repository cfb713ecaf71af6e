//! Reference configuration for savings calculations.
//!
//! This module provides the constants a savings calculation needs but does not
//! compute: regional climate and price data, CO₂ intensity of heating sources, and
//! the default insulation cost per square metre.
//!
//! # Overview
//!
//! - [`ReferenceConfig`]: Immutable lookup tables, built once and shared by reference
//! - [`RegionInfo`]: Default energy price and heating-degree-days of one region
//! - [`HeatingSourceInfo`]: CO₂ intensity factor of one heating source
//! - [`LookupError`]: Raised when a key is absent from a table
//! - [`ConfigError`]: Raised when a configuration document is unusable
//!
//! # Sources
//!
//! - **Built-in**: Belgian regional averages via [`ReferenceConfig::belgium`]
//! - **JSON files**: Replacement tables via [`ReferenceConfig::from_file`]

pub mod belgium;
pub mod file;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Climate and price data for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Region name, used as the lookup key (e.g. "Vlaams")
    pub name: String,

    /// Average household energy price (€/kWh)
    ///
    /// Offered to callers as a form default. The calculator itself always uses
    /// the price supplied with the input.
    pub default_energy_price: f64,

    /// Annual heating degree days (K·day/year)
    ///
    /// Sum over the year of the daily shortfall of the mean outdoor temperature
    /// below the heating base temperature.
    pub heating_degree_days: f64,
}

/// CO₂ intensity of a heating source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingSourceInfo {
    /// Lookup key (e.g. "heat_pump")
    pub value: String,

    /// Display label (e.g. "Heat Pump")
    pub label: String,

    /// Emissions per delivered kWh of heat (kg CO₂/kWh)
    pub co2_intensity: f64,
}

/// Table a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTable {
    Regions,
    HeatingSources,
    Materials,
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTable::Regions => write!(f, "regions"),
            ReferenceTable::HeatingSources => write!(f, "heating sources"),
            ReferenceTable::Materials => write!(f, "materials"),
        }
    }
}

/// A key was not present in a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no entry '{key}' in {table} table")]
    NotFound { table: ReferenceTable, key: String },
}

/// Error types for loading a reference configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input/output error reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or does not match the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A table has no entries.
    #[error("{0} table is empty")]
    EmptyTable(ReferenceTable),

    /// The same key appears twice in one table.
    #[error("duplicate key '{key}' in {table} table")]
    DuplicateKey { table: ReferenceTable, key: String },

    /// A numeric value is outside its physical range.
    #[error("invalid value for {field} of '{key}': {value}")]
    InvalidValue {
        key: String,
        field: &'static str,
        value: f64,
    },
}

/// Read-only reference data shared by every calculation.
///
/// Constructed once at process start and handed to the calculator by reference;
/// nothing mutates it afterwards, so it can be shared freely between threads.
///
/// # Example
///
/// ```
/// use roofsave::reference::ReferenceConfig;
///
/// let config = ReferenceConfig::belgium();
/// let region = config.region_info("Waals").unwrap();
/// assert_eq!(region.heating_degree_days, 3000.0);
/// assert_eq!(config.co2_intensity("gas").unwrap(), 0.201);
/// assert!(config.region_info("Atlantis").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    regions: Vec<RegionInfo>,
    heating_sources: Vec<HeatingSourceInfo>,
    /// Insulation upgrade cost used when the caller supplies none (€/m²)
    default_cost_per_area: f64,
}

/// The reference payload handed to form front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    pub regions: Vec<RegionInfo>,
    pub heating_sources: Vec<HeatingSourceInfo>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self::belgium()
    }
}

impl ReferenceConfig {
    /// Builds a configuration from explicit tables, checking it for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a table is empty, a key repeats, or a value is
    /// out of its physical range (see [`ReferenceConfig::validate`]).
    pub fn new(
        regions: Vec<RegionInfo>,
        heating_sources: Vec<HeatingSourceInfo>,
        default_cost_per_area: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            regions,
            heating_sources,
            default_cost_per_area,
        };
        config.validate()?;
        Ok(config)
    }

    /// Looks up the climate and price data of a region.
    pub fn region_info(&self, location: &str) -> Result<&RegionInfo, LookupError> {
        self.regions
            .iter()
            .find(|r| r.name == location)
            .ok_or_else(|| LookupError::NotFound {
                table: ReferenceTable::Regions,
                key: location.to_string(),
            })
    }

    /// Looks up a heating source entry.
    pub fn heating_source(&self, key: &str) -> Result<&HeatingSourceInfo, LookupError> {
        self.heating_sources
            .iter()
            .find(|h| h.value == key)
            .ok_or_else(|| LookupError::NotFound {
                table: ReferenceTable::HeatingSources,
                key: key.to_string(),
            })
    }

    /// Returns the CO₂ intensity (kg CO₂/kWh) of a heating source.
    pub fn co2_intensity(&self, heating_source: &str) -> Result<f64, LookupError> {
        self.heating_source(heating_source).map(|h| h.co2_intensity)
    }

    /// Returns the average energy price (€/kWh) of a region.
    pub fn default_energy_price(&self, location: &str) -> Result<f64, LookupError> {
        self.region_info(location).map(|r| r.default_energy_price)
    }

    /// Default insulation upgrade cost (€/m²).
    pub fn default_cost_per_area(&self) -> f64 {
        self.default_cost_per_area
    }

    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    pub fn heating_sources(&self) -> &[HeatingSourceInfo] {
        &self.heating_sources
    }

    /// Returns the region list and heating-source list in table order.
    pub fn catalog(&self) -> ReferenceCatalog {
        ReferenceCatalog {
            regions: self.regions.clone(),
            heating_sources: self.heating_sources.clone(),
        }
    }

    /// Checks the tables for internal consistency.
    ///
    /// Rules:
    /// - both tables are non-empty and keys are unique within a table
    /// - energy prices and heating degree days are finite and positive
    /// - CO₂ intensities are finite and non-negative
    /// - the default cost per area is finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::EmptyTable(ReferenceTable::Regions));
        }
        if self.heating_sources.is_empty() {
            return Err(ConfigError::EmptyTable(ReferenceTable::HeatingSources));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    table: ReferenceTable::Regions,
                    key: region.name.clone(),
                });
            }
            check_positive(&region.name, "default_energy_price", region.default_energy_price)?;
            check_positive(&region.name, "heating_degree_days", region.heating_degree_days)?;
        }

        seen.clear();
        for source in &self.heating_sources {
            if !seen.insert(source.value.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    table: ReferenceTable::HeatingSources,
                    key: source.value.clone(),
                });
            }
            if !(source.co2_intensity.is_finite() && source.co2_intensity >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: source.value.clone(),
                    field: "co2_intensity",
                    value: source.co2_intensity,
                });
            }
        }

        if !(self.default_cost_per_area.is_finite() && self.default_cost_per_area >= 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                field: "default_cost_per_area",
                value: self.default_cost_per_area,
            });
        }

        Ok(())
    }
}

fn check_positive(key: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            field,
            value,
        })
    }
}
