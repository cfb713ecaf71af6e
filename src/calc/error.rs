//! Validation failures of a calculation input.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of an input rule, independent of the offending value.
///
/// Callers branch on this instead of parsing messages. Variants are listed in
/// the order the rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    UnknownRegion,
    RoofAreaOutOfRange,
    CurrentRValueOutOfRange,
    ProposedRValueOutOfRange,
    ProposedNotGreaterThanCurrent,
    UnknownHeatingSource,
    EnergyPriceOutOfRange,
    NegativeInsulationCost,
}

impl ValidationRule {
    /// Every rule, in check order.
    pub const ALL: [ValidationRule; 8] = [
        ValidationRule::UnknownRegion,
        ValidationRule::RoofAreaOutOfRange,
        ValidationRule::CurrentRValueOutOfRange,
        ValidationRule::ProposedRValueOutOfRange,
        ValidationRule::ProposedNotGreaterThanCurrent,
        ValidationRule::UnknownHeatingSource,
        ValidationRule::EnergyPriceOutOfRange,
        ValidationRule::NegativeInsulationCost,
    ];

    /// Stable snake_case identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::UnknownRegion => "unknown_region",
            ValidationRule::RoofAreaOutOfRange => "roof_area_out_of_range",
            ValidationRule::CurrentRValueOutOfRange => "current_r_value_out_of_range",
            ValidationRule::ProposedRValueOutOfRange => "proposed_r_value_out_of_range",
            ValidationRule::ProposedNotGreaterThanCurrent => "proposed_not_greater_than_current",
            ValidationRule::UnknownHeatingSource => "unknown_heating_source",
            ValidationRule::EnergyPriceOutOfRange => "energy_price_out_of_range",
            ValidationRule::NegativeInsulationCost => "negative_insulation_cost",
        }
    }

    /// Name of the input field the rule is attached to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationRule::UnknownRegion => "location",
            ValidationRule::RoofAreaOutOfRange => "roof_area",
            ValidationRule::CurrentRValueOutOfRange => "current_r_value",
            ValidationRule::ProposedRValueOutOfRange
            | ValidationRule::ProposedNotGreaterThanCurrent => "proposed_r_value",
            ValidationRule::UnknownHeatingSource => "heating_source",
            ValidationRule::EnergyPriceOutOfRange => "energy_price_per_kwh",
            ValidationRule::NegativeInsulationCost => "insulation_upgrade_cost",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input rule that a calculation request violated.
///
/// These are always caller problems; the calculator has no other failure mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid location '{0}'")]
    UnknownRegion(String),

    #[error("Roof area must be between 0 and 10000 m² (got {0})")]
    RoofAreaOutOfRange(f64),

    #[error("Current R-value must be between 0 and 20 (0 for uninsulated roofs) (got {0})")]
    CurrentRValueOutOfRange(f64),

    #[error("Proposed R-value must be greater than 0 and up to 20 (got {0})")]
    ProposedRValueOutOfRange(f64),

    #[error("Proposed R-value must be greater than current R-value ({proposed} <= {current})")]
    ProposedNotGreaterThanCurrent { current: f64, proposed: f64 },

    #[error("Invalid heating source '{0}'")]
    UnknownHeatingSource(String),

    #[error("Energy price must be between 0 and 2 €/kWh (got {0})")]
    EnergyPriceOutOfRange(f64),

    #[error("Insulation upgrade cost cannot be negative (got {0})")]
    NegativeInsulationCost(f64),
}

impl ValidationError {
    /// The rule this error reports.
    pub fn rule(&self) -> ValidationRule {
        match self {
            ValidationError::UnknownRegion(_) => ValidationRule::UnknownRegion,
            ValidationError::RoofAreaOutOfRange(_) => ValidationRule::RoofAreaOutOfRange,
            ValidationError::CurrentRValueOutOfRange(_) => ValidationRule::CurrentRValueOutOfRange,
            ValidationError::ProposedRValueOutOfRange(_) => {
                ValidationRule::ProposedRValueOutOfRange
            }
            ValidationError::ProposedNotGreaterThanCurrent { .. } => {
                ValidationRule::ProposedNotGreaterThanCurrent
            }
            ValidationError::UnknownHeatingSource(_) => ValidationRule::UnknownHeatingSource,
            ValidationError::EnergyPriceOutOfRange(_) => ValidationRule::EnergyPriceOutOfRange,
            ValidationError::NegativeInsulationCost(_) => ValidationRule::NegativeInsulationCost,
        }
    }

    /// Transport-agnostic error body: rule identifier plus message.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            rule: self.rule(),
            field: self.rule().field().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable description of a validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub rule: ValidationRule,
    pub field: String,
    pub message: String,
}
