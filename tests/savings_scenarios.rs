//! End-to-end savings calculations against the built-in Belgian reference data.
//!
//! Covers the worked scenarios, the payback sentinel, rounding idempotence,
//! round-tripping a result back into an input, and the physical monotonicity
//! of the heat-loss model.

use approx::assert_relative_eq;
use roofsave::calc::finance::{payback_period, NO_PAYBACK_YEARS};
use roofsave::calc::{CalculationInput, SavingsCalculator, ValidationRule};
use roofsave::reference::ReferenceConfig;

fn scenario_a() -> CalculationInput {
    CalculationInput {
        location: "Vlaams".to_string(),
        roof_area: 100.0,
        current_r_value: 0.0,
        proposed_r_value: 6.0,
        heating_source: "gas".to_string(),
        energy_price_per_kwh: 0.35,
        insulation_upgrade_cost: None,
    }
}

#[test]
fn test_scenario_a_uninsulated_vlaams_roof() {
    let config = ReferenceConfig::belgium();
    let result = SavingsCalculator::new(&config).calculate(&scenario_a()).unwrap();

    assert_eq!(result.current_u_value, 5.0);
    assert_eq!(result.proposed_u_value, 0.1667);
    assert_eq!(result.heating_degree_days, 2800.0);
    assert_relative_eq!(result.annual_heat_loss_current, 33600.0, epsilon = 1e-9);
    // From the unrounded U = 1/6: (1/6) × 100 × 2800 × 24 / 1000
    assert_eq!(result.annual_heat_loss_proposed, 1120.0);
    assert_eq!(result.insulation_upgrade_cost, 4500.0);

    assert_relative_eq!(result.annual_energy_savings, 32480.0, epsilon = 1e-9);
    assert_relative_eq!(result.annual_cost_savings, 11368.0, epsilon = 1e-9);
    assert_relative_eq!(result.payback_period, 0.4, epsilon = 1e-9);
    assert_relative_eq!(result.ten_year_total_savings, 109180.0, epsilon = 1e-9);
    assert_relative_eq!(result.annual_co2_reduction, 6528.48, epsilon = 1e-9);
    assert_relative_eq!(result.ten_year_co2_reduction, 65284.8, epsilon = 1e-9);
    assert_eq!(result.co2_intensity_factor, 0.201);
}

#[test]
fn test_scenario_a_echoes_inputs() {
    let config = ReferenceConfig::belgium();
    let input = scenario_a();
    let result = SavingsCalculator::new(&config).calculate(&input).unwrap();

    assert_eq!(result.location, input.location);
    assert_eq!(result.roof_area, input.roof_area);
    assert_eq!(result.current_r_value, input.current_r_value);
    assert_eq!(result.proposed_r_value, input.proposed_r_value);
    assert_eq!(result.heating_source, input.heating_source);
    assert_eq!(result.energy_price_per_kwh, input.energy_price_per_kwh);
}

#[test]
fn test_scenario_b_proposed_below_current() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        current_r_value: 6.0,
        proposed_r_value: 4.0,
        ..scenario_a()
    };
    let err = SavingsCalculator::new(&config).calculate(&input).unwrap_err();
    assert_eq!(err.rule(), ValidationRule::ProposedNotGreaterThanCurrent);
}

#[test]
fn test_scenario_c_roof_area_too_large() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        roof_area: 15000.0,
        ..scenario_a()
    };
    let err = SavingsCalculator::new(&config).calculate(&input).unwrap_err();
    assert_eq!(err.rule(), ValidationRule::RoofAreaOutOfRange);
    assert!(err.to_string().contains("15000"));
}

#[test]
fn test_scenario_d_tiny_price_still_pays_back() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        energy_price_per_kwh: 0.0001,
        ..scenario_a()
    };
    let result = SavingsCalculator::new(&config).calculate(&input).unwrap();

    assert!(result.annual_cost_savings > 0.0);
    assert!(!result.never_pays_back());
    // 4500 / 3.248
    assert_relative_eq!(result.payback_period, 1385.47, epsilon = 1e-9);
}

#[test]
fn test_scenario_d_rounded_savings_of_zero_keep_real_payback() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        roof_area: 1.0,
        current_r_value: 5.0,
        proposed_r_value: 5.1,
        energy_price_per_kwh: 0.0001,
        insulation_upgrade_cost: Some(1.0),
        ..scenario_a()
    };
    let result = SavingsCalculator::new(&config).calculate(&input).unwrap();

    // Savings round to zero cents but were positive before rounding
    assert_eq!(result.annual_cost_savings, 0.0);
    assert_ne!(result.payback_period, NO_PAYBACK_YEARS);
    assert!(result.payback_period > NO_PAYBACK_YEARS);
}

#[test]
fn test_scenario_e_unknown_region_wins_over_everything() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        location: "Atlantis".to_string(),
        roof_area: -5.0,
        current_r_value: 30.0,
        proposed_r_value: 0.0,
        heating_source: "coal".to_string(),
        energy_price_per_kwh: 10.0,
        insulation_upgrade_cost: Some(-1.0),
    };
    let err = SavingsCalculator::new(&config).calculate(&input).unwrap_err();
    assert_eq!(err.rule(), ValidationRule::UnknownRegion);
}

#[test]
fn test_payback_sentinel_when_nothing_is_saved() {
    assert_eq!(payback_period(4500.0, 0.0), NO_PAYBACK_YEARS);
    assert_eq!(payback_period(4500.0, -10.0), NO_PAYBACK_YEARS);
    assert_eq!(payback_period(4500.0, 450.0), 10.0);
}

#[test]
fn test_supplied_cost_overrides_estimate() {
    let config = ReferenceConfig::belgium();
    let result = SavingsCalculator::new(&config)
        .calculate(&scenario_a().with_upgrade_cost(2000.0))
        .unwrap();
    assert_eq!(result.insulation_upgrade_cost, 2000.0);
    assert_relative_eq!(result.ten_year_total_savings, 111680.0, epsilon = 1e-9);
}

#[test]
fn test_zero_upgrade_cost_pays_back_immediately() {
    let config = ReferenceConfig::belgium();
    let result = SavingsCalculator::new(&config)
        .calculate(&scenario_a().with_upgrade_cost(0.0))
        .unwrap();
    assert_eq!(result.payback_period, 0.0);
}

#[test]
fn test_rounding_is_idempotent() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    for source in ["gas", "oil", "electric", "heat_pump"] {
        let input = CalculationInput {
            location: "Brussels-Hoofdstedelijk".to_string(),
            roof_area: 87.3,
            current_r_value: 1.3,
            proposed_r_value: 7.7,
            heating_source: source.to_string(),
            energy_price_per_kwh: 0.341,
            insulation_upgrade_cost: None,
        };
        let result = calculator.calculate(&input).unwrap();
        assert_eq!(result.rounded(), result);
    }
}

#[test]
fn test_result_round_trips_to_same_result() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    let first = calculator.calculate(&scenario_a()).unwrap();
    let second = calculator.calculate(&first.to_input()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_normalized_inputs_round_trip() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    let inputs = [
        CalculationInput {
            roof_area: 100.004,
            energy_price_per_kwh: 0.3456,
            ..scenario_a()
        },
        CalculationInput {
            location: "Waals".to_string(),
            roof_area: 73.456,
            current_r_value: 1.234,
            proposed_r_value: 7.891,
            heating_source: "heat_pump".to_string(),
            energy_price_per_kwh: 0.2987,
            insulation_upgrade_cost: Some(3210.987),
        },
    ];

    for input in inputs {
        let normalized = input.normalized();
        assert!(normalized.is_normalized());
        let first = calculator.calculate(&normalized).unwrap();
        let second = calculator.calculate(&first.to_input()).unwrap();
        assert_eq!(first, second, "{normalized:?}");
    }
}

#[test]
fn test_echoed_input_is_the_normalized_input() {
    let config = ReferenceConfig::belgium();
    let input = CalculationInput {
        roof_area: 100.004,
        current_r_value: 0.004,
        energy_price_per_kwh: 0.3456,
        ..scenario_a()
    };
    assert!(!input.is_normalized());

    let result = SavingsCalculator::new(&config).calculate(&input).unwrap();
    assert_eq!(
        result.to_input(),
        input
            .normalized()
            .with_upgrade_cost(result.insulation_upgrade_cost)
    );
}

#[test]
fn test_result_json_uses_field_names() {
    let config = ReferenceConfig::belgium();
    let result = SavingsCalculator::new(&config).calculate(&scenario_a()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["current_u_value"], 5.0);
    assert_eq!(json["insulation_upgrade_cost"], 4500.0);
    assert_eq!(json["location"], "Vlaams");
    assert_eq!(json.as_object().unwrap().len(), 19);
}

#[test]
fn test_savings_grow_with_proposed_r_value() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    let mut previous = 0.0;
    for proposed in [3.0, 4.0, 6.0, 8.0, 12.0, 20.0] {
        let input = CalculationInput {
            current_r_value: 2.0,
            proposed_r_value: proposed,
            ..scenario_a()
        };
        let savings = calculator.calculate(&input).unwrap().annual_energy_savings;
        assert!(savings > previous, "R {proposed}: {savings} <= {previous}");
        previous = savings;
    }
}

#[test]
fn test_heat_loss_scales_with_area_and_climate() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);

    let small = calculator.calculate(&scenario_a()).unwrap();
    let large = calculator
        .calculate(&CalculationInput {
            roof_area: 200.0,
            ..scenario_a()
        })
        .unwrap();
    assert_relative_eq!(
        large.annual_heat_loss_current,
        2.0 * small.annual_heat_loss_current,
        epsilon = 1e-9
    );

    // Waals has more heating degree days than Vlaams
    let colder = calculator
        .calculate(&CalculationInput {
            location: "Waals".to_string(),
            ..scenario_a()
        })
        .unwrap();
    assert!(colder.annual_energy_savings > small.annual_energy_savings);
    assert_relative_eq!(colder.annual_heat_loss_current, 36000.0, epsilon = 1e-9);
}

#[test]
fn test_calculation_is_deterministic() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    let first = calculator.calculate(&scenario_a()).unwrap();
    for _ in 0..10 {
        assert_eq!(calculator.calculate(&scenario_a()).unwrap(), first);
    }
}

#[test]
fn test_batch_of_mixed_inputs() {
    let config = ReferenceConfig::belgium();
    let calculator = SavingsCalculator::new(&config);
    let inputs: Vec<_> = (0..1000)
        .map(|i| CalculationInput {
            roof_area: if i % 7 == 0 { 20000.0 } else { 50.0 + i as f64 },
            ..scenario_a()
        })
        .collect();

    let results = calculator.calculate_batch(&inputs);
    for (i, (input, result)) in inputs.iter().zip(&results).enumerate() {
        if i % 7 == 0 {
            assert_eq!(
                result.as_ref().unwrap_err().rule(),
                ValidationRule::RoofAreaOutOfRange
            );
        } else {
            assert_eq!(result.as_ref().unwrap().roof_area, input.roof_area);
        }
    }
}
