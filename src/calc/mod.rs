//! Roof insulation savings calculator.
//!
//! Transforms a validated [`CalculationInput`] into a [`CalculationResult`]:
//!
//! 1. U-values from the current and proposed R-values
//! 2. Annual heat loss for each U-value (degree-day method)
//! 3. Annual energy savings, floored at zero
//! 4. Annual cost savings at the supplied energy price
//! 5. Upgrade cost, supplied or estimated from roof area
//! 6. Simple payback period (999 years when nothing is saved)
//! 7. Ten-year net savings
//! 8. Annual and ten-year CO₂ reduction
//!
//! The calculation is pure: it reads the shared [`ReferenceConfig`] and its own
//! input, and performs no I/O.

pub mod error;
pub mod finance;
pub mod input;
pub mod physics;
pub mod result;

pub use error::{ErrorBody, ValidationError, ValidationRule};
pub use input::{validate, violations, CalculationInput};
pub use result::{CalculationResult, Precision};

use crate::reference::ReferenceConfig;
use finance::{HORIZON_YEARS, NO_PAYBACK_YEARS};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings calculator bound to a reference configuration.
///
/// # Example
///
/// ```
/// use roofsave::calc::{CalculationInput, SavingsCalculator};
/// use roofsave::reference::ReferenceConfig;
///
/// let config = ReferenceConfig::belgium();
/// let calculator = SavingsCalculator::new(&config);
///
/// let result = calculator.calculate(&CalculationInput {
///     location: "Vlaams".to_string(),
///     roof_area: 100.0,
///     current_r_value: 0.0,
///     proposed_r_value: 6.0,
///     heating_source: "gas".to_string(),
///     energy_price_per_kwh: 0.35,
///     insulation_upgrade_cost: None,
/// })?;
///
/// assert_eq!(result.current_u_value, 5.0);
/// assert_eq!(result.insulation_upgrade_cost, 4500.0);
/// # Ok::<(), roofsave::calc::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SavingsCalculator<'a> {
    config: &'a ReferenceConfig,
}

impl<'a> SavingsCalculator<'a> {
    pub fn new(config: &'a ReferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a ReferenceConfig {
        self.config
    }

    /// Validates the input and runs the derivation pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first violated input rule, in check order. No partial result
    /// is produced.
    pub fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, ValidationError> {
        validate(input, self.config)?;

        let region = self
            .config
            .region_info(&input.location)
            .map_err(|_| ValidationError::UnknownRegion(input.location.clone()))?;
        let co2_intensity = self
            .config
            .co2_intensity(&input.heating_source)
            .map_err(|_| ValidationError::UnknownHeatingSource(input.heating_source.clone()))?;
        let hdd = region.heating_degree_days;
        debug!("{}: {} heating degree days", region.name, hdd);

        let current_u = physics::u_value_from_r(input.current_r_value);
        let proposed_u = physics::u_value_from_r(input.proposed_r_value);

        let heat_loss_current = physics::annual_heat_loss(current_u, input.roof_area, hdd);
        let heat_loss_proposed = physics::annual_heat_loss(proposed_u, input.roof_area, hdd);
        let energy_savings = physics::energy_savings(heat_loss_current, heat_loss_proposed);
        let cost_savings = finance::cost_savings(energy_savings, input.energy_price_per_kwh);

        let insulation_cost = match input.insulation_upgrade_cost {
            Some(cost) => cost,
            None => {
                let estimate = finance::estimate_insulation_cost(
                    input.roof_area,
                    self.config.default_cost_per_area(),
                );
                debug!("no upgrade cost supplied, estimated {:.2}", estimate);
                estimate
            }
        };

        let payback = finance::payback_period(insulation_cost, cost_savings);
        if payback == NO_PAYBACK_YEARS {
            warn!("upgrade yields no cost savings, payback reported as {NO_PAYBACK_YEARS} years");
        }

        let annual_co2 = finance::co2_reduction(energy_savings, co2_intensity);

        let raw = CalculationResult {
            location: input.location.clone(),
            roof_area: input.roof_area,
            current_r_value: input.current_r_value,
            proposed_r_value: input.proposed_r_value,
            heating_source: input.heating_source.clone(),
            energy_price_per_kwh: input.energy_price_per_kwh,
            current_u_value: current_u,
            proposed_u_value: proposed_u,
            annual_heat_loss_current: heat_loss_current,
            annual_heat_loss_proposed: heat_loss_proposed,
            annual_energy_savings: energy_savings,
            annual_cost_savings: cost_savings,
            insulation_upgrade_cost: insulation_cost,
            payback_period: payback,
            ten_year_total_savings: finance::ten_year_net_savings(cost_savings, insulation_cost),
            annual_co2_reduction: annual_co2,
            ten_year_co2_reduction: annual_co2 * HORIZON_YEARS,
            heating_degree_days: hdd,
            co2_intensity_factor: co2_intensity,
        };

        Ok(raw.rounded())
    }

    /// Runs independent calculations in parallel, preserving input order.
    pub fn calculate_batch(
        &self,
        inputs: &[CalculationInput],
    ) -> Vec<Result<CalculationResult, ValidationError>> {
        inputs.par_iter().map(|input| self.calculate(input)).collect()
    }
}

/// Serializable outcome of one calculation in a batch.
///
/// Serializes as `{"ok": {...result}}` or `{"error": {"rule", "field", "message"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(CalculationResult),
    Error(ErrorBody),
}

impl From<Result<CalculationResult, ValidationError>> for Outcome {
    fn from(result: Result<CalculationResult, ValidationError>) -> Self {
        match result {
            Ok(result) => Outcome::Ok(result),
            Err(err) => Outcome::Error(err.to_body()),
        }
    }
}

/// Convenience wrapper around [`SavingsCalculator::calculate`].
pub fn calculate(
    config: &ReferenceConfig,
    input: &CalculationInput,
) -> Result<CalculationResult, ValidationError> {
    SavingsCalculator::new(config).calculate(input)
}
