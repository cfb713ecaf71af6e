//! Calculation input record and its validation rules.

use crate::calc::error::{ValidationError, ValidationRule};
use crate::calc::result::Precision;
use crate::materials::MaterialQuote;
use crate::reference::ReferenceConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Largest accepted roof area (m²).
pub const MAX_ROOF_AREA: f64 = 10_000.0;

/// Largest accepted R-value (m²·K/W).
pub const MAX_R_VALUE: f64 = 20.0;

/// Largest accepted energy price (€/kWh).
pub const MAX_ENERGY_PRICE: f64 = 2.0;

/// Building and energy data for one savings calculation.
///
/// Field names match the JSON request body accepted by calculation front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Region key into the reference configuration
    pub location: String,
    /// Roof area (m²)
    pub roof_area: f64,
    /// Current thermal resistance (m²·K/W); 0 means no insulation
    pub current_r_value: f64,
    /// Thermal resistance after the upgrade (m²·K/W)
    pub proposed_r_value: f64,
    /// Heating source key into the reference configuration
    pub heating_source: String,
    /// Energy price (€/kWh)
    pub energy_price_per_kwh: f64,
    /// Total upgrade cost (€); estimated from roof area when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_upgrade_cost: Option<f64>,
}

impl CalculationInput {
    /// Returns a copy whose proposed R-value and upgrade cost come from a material quote.
    pub fn with_material_quote(&self, quote: &MaterialQuote) -> Self {
        Self {
            proposed_r_value: quote.target_r_value,
            insulation_upgrade_cost: Some(quote.total_cost),
            ..self.clone()
        }
    }

    /// Returns a copy with an explicit upgrade cost.
    pub fn with_upgrade_cost(&self, cost: f64) -> Self {
        Self {
            insulation_upgrade_cost: Some(cost),
            ..self.clone()
        }
    }

    /// Returns a copy rounded to the precision a result echoes its inputs at.
    ///
    /// Results compute from the raw values, so only a normalized input is
    /// reproduced exactly by recalculating from [`CalculationResult::to_input`].
    ///
    /// [`CalculationResult::to_input`]: crate::calc::CalculationResult::to_input
    pub fn normalized(&self) -> Self {
        Self {
            location: self.location.clone(),
            roof_area: Precision::Standard.apply(self.roof_area),
            current_r_value: Precision::Standard.apply(self.current_r_value),
            proposed_r_value: Precision::Standard.apply(self.proposed_r_value),
            heating_source: self.heating_source.clone(),
            energy_price_per_kwh: Precision::Price.apply(self.energy_price_per_kwh),
            insulation_upgrade_cost: self
                .insulation_upgrade_cost
                .map(|cost| Precision::Standard.apply(cost)),
        }
    }

    /// True when every numeric field is already at echo precision.
    pub fn is_normalized(&self) -> bool {
        *self == self.normalized()
    }

    /// Energy price to use when a caller may omit it: the supplied price, else
    /// the region's average.
    ///
    /// An unknown region yields NaN. Validation checks the region before the
    /// price, so such an input still fails with the unknown-region rule.
    pub fn price_or_region_default(
        price: Option<f64>,
        location: &str,
        config: &ReferenceConfig,
    ) -> f64 {
        price.unwrap_or_else(|| config.default_energy_price(location).unwrap_or(f64::NAN))
    }
}

/// Checks a single rule against an input.
///
/// Each rule is evaluated on the raw input values alone, so any rule can be
/// checked without the others having passed.
pub fn check_rule(
    rule: ValidationRule,
    input: &CalculationInput,
    config: &ReferenceConfig,
) -> Result<(), ValidationError> {
    match rule {
        ValidationRule::UnknownRegion => {
            config
                .region_info(&input.location)
                .map_err(|_| ValidationError::UnknownRegion(input.location.clone()))?;
        }
        ValidationRule::RoofAreaOutOfRange => {
            let area = input.roof_area;
            if !(area > 0.0 && area <= MAX_ROOF_AREA) {
                return Err(ValidationError::RoofAreaOutOfRange(area));
            }
        }
        ValidationRule::CurrentRValueOutOfRange => {
            let r = input.current_r_value;
            if !(0.0..=MAX_R_VALUE).contains(&r) {
                return Err(ValidationError::CurrentRValueOutOfRange(r));
            }
        }
        ValidationRule::ProposedRValueOutOfRange => {
            let r = input.proposed_r_value;
            if !(r > 0.0 && r <= MAX_R_VALUE) {
                return Err(ValidationError::ProposedRValueOutOfRange(r));
            }
        }
        ValidationRule::ProposedNotGreaterThanCurrent => {
            let ordering = input.proposed_r_value.partial_cmp(&input.current_r_value);
            if ordering != Some(Ordering::Greater) {
                return Err(ValidationError::ProposedNotGreaterThanCurrent {
                    current: input.current_r_value,
                    proposed: input.proposed_r_value,
                });
            }
        }
        ValidationRule::UnknownHeatingSource => {
            config
                .heating_source(&input.heating_source)
                .map_err(|_| ValidationError::UnknownHeatingSource(input.heating_source.clone()))?;
        }
        ValidationRule::EnergyPriceOutOfRange => {
            let price = input.energy_price_per_kwh;
            if !(price > 0.0 && price <= MAX_ENERGY_PRICE) {
                return Err(ValidationError::EnergyPriceOutOfRange(price));
            }
        }
        ValidationRule::NegativeInsulationCost => {
            if let Some(cost) = input.insulation_upgrade_cost {
                if !(cost >= 0.0 && cost.is_finite()) {
                    return Err(ValidationError::NegativeInsulationCost(cost));
                }
            }
        }
    }
    Ok(())
}

/// Validates an input, failing on the first violated rule in check order.
pub fn validate(input: &CalculationInput, config: &ReferenceConfig) -> Result<(), ValidationError> {
    ValidationRule::ALL
        .iter()
        .try_for_each(|&rule| check_rule(rule, input, config))
}

/// Evaluates every rule and returns all violations in check order.
pub fn violations(input: &CalculationInput, config: &ReferenceConfig) -> Vec<ValidationError> {
    ValidationRule::ALL
        .iter()
        .filter_map(|&rule| check_rule(rule, input, config).err())
        .collect()
}
