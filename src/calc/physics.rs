//! Steady-state roof heat-loss physics.
//!
//! Degree-day method: the annual heat lost through an element of area `A` and
//! thermal transmittance `U` is the product of its conductance `U·A` and the
//! region's heating degree days, converted from K·day to kWh.

/// U-value assumed for an uninsulated roof (W/m²·K).
///
/// Policy constant for `R = 0`; it is not derived from `1/R`.
pub const UNINSULATED_U_VALUE: f64 = 5.0;

/// Hours per degree-day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Wh per kWh.
pub const WH_PER_KWH: f64 = 1000.0;

/// Thermal transmittance (W/m²·K) for a thermal resistance (m²·K/W).
///
/// # Formula
///
/// ```text
/// U = 1 / R          for R > 0
/// U = 5.0            for R = 0 (uninsulated)
/// ```
///
/// Callers validate `R ≥ 0` before calling; a negative or NaN resistance is
/// treated like `R = 0`.
///
/// # Example
///
/// ```
/// use roofsave::calc::physics::u_value_from_r;
///
/// assert_eq!(u_value_from_r(2.0), 0.5);
/// assert_eq!(u_value_from_r(0.0), 5.0);
/// ```
pub fn u_value_from_r(r_value: f64) -> f64 {
    if r_value > 0.0 {
        1.0 / r_value
    } else {
        UNINSULATED_U_VALUE
    }
}

/// Annual heat loss through the roof (kWh/year).
///
/// # Formula
///
/// ```text
/// Q = U × A × HDD × 24 / 1000
/// ```
///
/// # Arguments
///
/// * `u_value` - Thermal transmittance in W/m²·K
/// * `roof_area` - Roof area in m²
/// * `heating_degree_days` - Annual heating degree days in K·day
pub fn annual_heat_loss(u_value: f64, roof_area: f64, heating_degree_days: f64) -> f64 {
    u_value * roof_area * heating_degree_days * HOURS_PER_DAY / WH_PER_KWH
}

/// Annual energy saved by reducing heat loss, floored at zero (kWh/year).
pub fn energy_savings(current_heat_loss: f64, proposed_heat_loss: f64) -> f64 {
    (current_heat_loss - proposed_heat_loss).max(0.0)
}
