//! Calculation result record and output rounding.
//!
//! Derivations run at full `f64` precision; each field is rounded once, here,
//! when the result record is assembled.

use crate::calc::finance::NO_PAYBACK_YEARS;
use crate::calc::input::CalculationInput;
use serde::{Deserialize, Serialize};

/// Decimal places of each output quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Areas, R-values, money, heat loss, energy and CO₂ (2 places)
    Standard,
    /// Energy price (3 places)
    Price,
    /// U-values (4 places)
    Transmittance,
}

impl Precision {
    pub fn places(self) -> i32 {
        match self {
            Precision::Standard => 2,
            Precision::Price => 3,
            Precision::Transmittance => 4,
        }
    }

    /// Rounds a value to this precision.
    pub fn apply(self, value: f64) -> f64 {
        round_to(value, self.places())
    }
}

/// Rounds to `places` decimals, halves away from zero.
///
/// The scaled binary value is rounded with [`f64::round`], so a value such as
/// `2.675` (stored as `2.67499999…`) rounds down. Negative zero is returned as
/// `0.0`. Re-rounding a rounded value returns it unchanged.
///
/// # Example
///
/// ```
/// use roofsave::calc::result::round_to;
///
/// assert_eq!(round_to(0.166_666_7, 4), 0.1667);
/// assert_eq!(round_to(-0.125, 2), -0.13);
/// assert_eq!(round_to(-0.001, 2), 0.0);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Physical, financial and environmental outcome of an insulation upgrade.
///
/// Echoes the normalized inputs alongside every derived quantity. Numeric
/// fields are already rounded to their [`Precision`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    // Input summary
    pub location: String,
    pub roof_area: f64,
    pub current_r_value: f64,
    pub proposed_r_value: f64,
    pub heating_source: String,
    pub energy_price_per_kwh: f64,

    // U-values (W/m²·K)
    pub current_u_value: f64,
    pub proposed_u_value: f64,

    // Energy (kWh/year) and money (€/year)
    pub annual_heat_loss_current: f64,
    pub annual_heat_loss_proposed: f64,
    pub annual_energy_savings: f64,
    pub annual_cost_savings: f64,

    // Financial analysis
    /// Upgrade cost actually used, supplied or estimated (€)
    pub insulation_upgrade_cost: f64,
    /// Years; 999.0 when the upgrade never pays back
    pub payback_period: f64,
    /// Net of upgrade cost (€), negative if payback exceeds ten years
    pub ten_year_total_savings: f64,

    // Environmental impact (kg CO₂)
    pub annual_co2_reduction: f64,
    pub ten_year_co2_reduction: f64,

    // Methodology constants, echoed unrounded
    pub heating_degree_days: f64,
    pub co2_intensity_factor: f64,
}

impl CalculationResult {
    /// True when the payback period is the "never pays back" sentinel.
    pub fn never_pays_back(&self) -> bool {
        self.payback_period == NO_PAYBACK_YEARS
    }

    /// Relative U-value reduction of the upgrade, in percent.
    pub fn u_value_reduction_percent(&self) -> f64 {
        if self.current_u_value > 0.0 {
            (self.current_u_value - self.proposed_u_value) / self.current_u_value * 100.0
        } else {
            0.0
        }
    }

    /// Rebuilds the input from the echoed fields, with the upgrade cost explicit.
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            location: self.location.clone(),
            roof_area: self.roof_area,
            current_r_value: self.current_r_value,
            proposed_r_value: self.proposed_r_value,
            heating_source: self.heating_source.clone(),
            energy_price_per_kwh: self.energy_price_per_kwh,
            insulation_upgrade_cost: Some(self.insulation_upgrade_cost),
        }
    }

    /// Applies output rounding to every field.
    ///
    /// Rounding is idempotent, so calling this on an already rounded result
    /// changes nothing.
    pub fn rounded(&self) -> Self {
        use Precision::{Price, Standard, Transmittance};

        Self {
            location: self.location.clone(),
            roof_area: Standard.apply(self.roof_area),
            current_r_value: Standard.apply(self.current_r_value),
            proposed_r_value: Standard.apply(self.proposed_r_value),
            heating_source: self.heating_source.clone(),
            energy_price_per_kwh: Price.apply(self.energy_price_per_kwh),
            current_u_value: Transmittance.apply(self.current_u_value),
            proposed_u_value: Transmittance.apply(self.proposed_u_value),
            annual_heat_loss_current: Standard.apply(self.annual_heat_loss_current),
            annual_heat_loss_proposed: Standard.apply(self.annual_heat_loss_proposed),
            annual_energy_savings: Standard.apply(self.annual_energy_savings),
            annual_cost_savings: Standard.apply(self.annual_cost_savings),
            insulation_upgrade_cost: Standard.apply(self.insulation_upgrade_cost),
            payback_period: Standard.apply(self.payback_period),
            ten_year_total_savings: Standard.apply(self.ten_year_total_savings),
            annual_co2_reduction: Standard.apply(self.annual_co2_reduction),
            ten_year_co2_reduction: Standard.apply(self.ten_year_co2_reduction),
            heating_degree_days: self.heating_degree_days,
            co2_intensity_factor: self.co2_intensity_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to(1120.004_999, 2), 1120.0);
        assert_eq!(round_to(0.35, 3), 0.35);
        assert_eq!(round_to(6528.484, 2), 6528.48);
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(-0.5, 0), -1.0);
    }

    #[test]
    fn test_round_to_is_idempotent() {
        for &value in &[0.1667, 1.005, 2.675, 33600.0, 1119.999_999_999_999_8, -1500.125] {
            for places in [2, 3, 4] {
                let once = round_to(value, places);
                assert_eq!(round_to(once, places), once, "{value} at {places}");
            }
        }
    }

    #[test]
    fn test_round_to_passes_through_non_finite() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn test_sentinel_survives_rounding() {
        assert_eq!(Precision::Standard.apply(NO_PAYBACK_YEARS), NO_PAYBACK_YEARS);
    }
}
