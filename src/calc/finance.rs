//! Financial and emissions figures derived from annual energy savings.

/// Payback reported when the upgrade never pays back (years).
pub const NO_PAYBACK_YEARS: f64 = 999.0;

/// Horizon of the long-range savings and CO₂ figures (years).
pub const HORIZON_YEARS: f64 = 10.0;

/// Annual cost savings (€/year).
pub fn cost_savings(energy_savings: f64, energy_price_per_kwh: f64) -> f64 {
    energy_savings * energy_price_per_kwh
}

/// Upgrade cost estimated from roof area (€).
pub fn estimate_insulation_cost(roof_area: f64, cost_per_area: f64) -> f64 {
    roof_area * cost_per_area
}

/// Simple payback period in years.
///
/// Returns [`NO_PAYBACK_YEARS`] when `annual_savings ≤ 0`. Any strictly positive
/// saving, however small, yields `cost / savings`.
pub fn payback_period(insulation_cost: f64, annual_savings: f64) -> f64 {
    if annual_savings <= 0.0 {
        return NO_PAYBACK_YEARS;
    }
    insulation_cost / annual_savings
}

/// Net savings over [`HORIZON_YEARS`] after paying for the upgrade (€).
///
/// Negative when payback takes longer than the horizon.
pub fn ten_year_net_savings(annual_savings: f64, insulation_cost: f64) -> f64 {
    annual_savings * HORIZON_YEARS - insulation_cost
}

/// Annual CO₂ avoided (kg CO₂/year).
pub fn co2_reduction(energy_savings: f64, co2_intensity: f64) -> f64 {
    energy_savings * co2_intensity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_savings() {
        assert_eq!(cost_savings(2000.0, 0.35), 700.0);
        assert!(cost_savings(1000.0, 0.40) > cost_savings(1000.0, 0.30));
    }

    #[test]
    fn test_estimate_insulation_cost() {
        assert_eq!(estimate_insulation_cost(100.0, 45.0), 4500.0);
        assert_eq!(estimate_insulation_cost(50.0, 45.0), 2250.0);
        assert_eq!(estimate_insulation_cost(200.0, 45.0), 9000.0);
    }

    #[test]
    fn test_payback() {
        assert_eq!(payback_period(1000.0, 500.0), 2.0);
        assert!((payback_period(4500.0, 700.0) - 6.428_571).abs() < 1e-5);
    }

    #[test]
    fn test_payback_sentinel() {
        assert_eq!(payback_period(1000.0, 0.0), NO_PAYBACK_YEARS);
        assert_eq!(payback_period(1000.0, -100.0), NO_PAYBACK_YEARS);
    }

    #[test]
    fn test_payback_tiny_positive_savings() {
        let payback = payback_period(4500.0, 1e-6);
        assert_ne!(payback, NO_PAYBACK_YEARS);
        assert!(payback > 1e9);
    }

    #[test]
    fn test_ten_year_savings_can_be_negative() {
        assert_eq!(ten_year_net_savings(700.0, 4500.0), 2500.0);
        assert_eq!(ten_year_net_savings(300.0, 4500.0), -1500.0);
    }

    #[test]
    fn test_co2_reduction() {
        assert_eq!(co2_reduction(2000.0, 0.201), 402.0);
        assert_eq!(co2_reduction(2000.0, 0.055), 110.0);
        assert_eq!(co2_reduction(0.0, 0.201), 0.0);
    }
}
