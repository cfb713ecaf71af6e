//! Built-in reference data for the three Belgian regions.
//!
//! Energy prices are 2024 household averages; heating degree days are annual
//! averages on an 18°C base. CO₂ factors are per kWh of delivered heat.

use super::{HeatingSourceInfo, ReferenceConfig, RegionInfo};

/// Insulation upgrade cost used when no quote is available (€/m²).
pub const DEFAULT_COST_PER_SQM: f64 = 45.0;

const REGIONS: [(&str, f64, f64); 3] = [
    // (name, €/kWh, HDD)
    ("Vlaams", 0.35, 2800.0),
    ("Waals", 0.33, 3000.0),
    ("Brussels-Hoofdstedelijk", 0.34, 2850.0),
];

const HEATING_SOURCES: [(&str, &str, f64); 4] = [
    // (key, label, kg CO₂/kWh)
    ("gas", "Natural Gas", 0.201),
    ("oil", "Heating Oil", 0.264),
    ("electric", "Electric Heating", 0.166),
    ("heat_pump", "Heat Pump", 0.055),
];

impl ReferenceConfig {
    /// Returns the built-in Belgian reference configuration.
    ///
    /// The tables are constants known to be consistent, so no validation
    /// pass is needed here.
    pub fn belgium() -> Self {
        let regions = REGIONS
            .iter()
            .map(|&(name, price, hdd)| RegionInfo {
                name: name.to_string(),
                default_energy_price: price,
                heating_degree_days: hdd,
            })
            .collect();

        let heating_sources = HEATING_SOURCES
            .iter()
            .map(|&(value, label, co2)| HeatingSourceInfo {
                value: value.to_string(),
                label: label.to_string(),
                co2_intensity: co2,
            })
            .collect();

        ReferenceConfig {
            regions,
            heating_sources,
            default_cost_per_area: DEFAULT_COST_PER_SQM,
        }
    }
}
