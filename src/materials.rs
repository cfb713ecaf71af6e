//! Insulation material catalog and installation quotes.
//!
//! Each material is characterised by its thermal conductivity, from which the
//! thickness needed for a target R-value follows from `R = δ / λ`. Quotes scale
//! the roof's floor area by a pitch multiplier to get the surface to cover.

use crate::calc::{CalculationInput, CalculationResult, SavingsCalculator, ValidationError};
use crate::reference::{LookupError, ReferenceTable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target R-value for a renovated roof (m²·K/W).
///
/// Matches the EPB requirement for new roof insulation in Belgium.
pub const TARGET_R_VALUE: f64 = 6.0;

/// Surface multiplier of a pitched roof relative to its floor area.
pub const PITCHED_SURFACE_MULTIPLIER: f64 = 1.25;

/// Roof geometry, which decides the surface to insulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofType {
    Flat,
    Pitched,
}

impl RoofType {
    /// Ratio of insulated surface to the roof's floor area.
    pub fn surface_multiplier(&self) -> f64 {
        match self {
            RoofType::Flat => 1.0,
            RoofType::Pitched => PITCHED_SURFACE_MULTIPLIER,
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoofType::Flat => write!(f, "flat"),
            RoofType::Pitched => write!(f, "pitched"),
        }
    }
}

impl FromStr for RoofType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(RoofType::Flat),
            "pitched" => Ok(RoofType::Pitched),
            other => Err(format!("unknown roof type '{}' (expected flat or pitched)", other)),
        }
    }
}

/// An insulation product available on the market.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InsulationMaterial {
    /// Catalog identifier (e.g. "glass_wool")
    pub id: String,

    /// Display name
    pub name: String,

    /// Price segment (e.g. "Budget", "Premium Eco")
    pub category: String,

    /// Installed price per square metre of insulated surface (€/m²)
    pub cost_per_m2: f64,

    /// Thermal conductivity λ (W/m·K)
    ///
    /// Lower values reach a given R-value with a thinner layer.
    pub conductivity: f64,

    pub description: String,
}

impl InsulationMaterial {
    /// Thermal resistance (m²·K/W) of a layer of the given thickness (m).
    pub fn r_value(&self, thickness: f64) -> f64 {
        thickness / self.conductivity
    }

    /// Thickness (m) needed to reach an R-value (m²·K/W).
    ///
    /// # Example
    /// ```
    /// use roofsave::materials::MaterialCatalog;
    ///
    /// let catalog = MaterialCatalog::belgian_market();
    /// let pir = catalog.get("pir_pur_foam").unwrap();
    /// assert!((pir.thickness_for(6.0) - 0.168).abs() < 1e-9);
    /// ```
    pub fn thickness_for(&self, r_value: f64) -> f64 {
        r_value * self.conductivity
    }

    /// Prices the insulation of a roof to a target R-value.
    pub fn quote(&self, roof_area: f64, roof_type: RoofType, target_r_value: f64) -> MaterialQuote {
        let surface_area = roof_area * roof_type.surface_multiplier();
        MaterialQuote {
            material_id: self.id.clone(),
            surface_area,
            thickness_m: self.thickness_for(target_r_value),
            total_cost: surface_area * self.cost_per_m2,
            target_r_value,
        }
    }
}

/// Price and layer thickness of insulating a roof with one material.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MaterialQuote {
    pub material_id: String,
    /// Surface to insulate after the pitch multiplier (m²)
    pub surface_area: f64,
    /// Layer thickness reaching the target (m)
    pub thickness_m: f64,
    /// Total installed cost (€)
    pub total_cost: f64,
    /// R-value the quote is sized for (m²·K/W)
    pub target_r_value: f64,
}

/// Ordered collection of insulation materials.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MaterialCatalog {
    materials: Vec<InsulationMaterial>,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::belgian_market()
    }
}

impl MaterialCatalog {
    pub fn new(materials: Vec<InsulationMaterial>) -> Self {
        Self { materials }
    }

    /// Common roof insulation products with typical Belgian installed prices.
    pub fn belgian_market() -> Self {
        let material = |id: &str, name: &str, category: &str, cost: f64, lambda: f64, desc: &str| {
            InsulationMaterial {
                id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                cost_per_m2: cost,
                conductivity: lambda,
                description: desc.to_string(),
            }
        };

        Self::new(vec![
            material(
                "glass_wool",
                "Glass Wool / Mineral Wool",
                "Budget",
                17.5,
                0.035,
                "Cost-effective traditional insulation, fire resistant.",
            ),
            material(
                "pir_pur_foam",
                "PIR/PUR Foam Boards",
                "Mid-Range",
                35.0,
                0.028,
                "High performance with a thin profile, moisture resistant.",
            ),
            material(
                "wood_fiber",
                "Wood Fiber Boards",
                "Premium Eco",
                55.0,
                0.038,
                "Ecological and breathable, good summer heat protection.",
            ),
            material(
                "eps_graphite",
                "EPS Graphite",
                "Mid-Range Plus",
                28.0,
                0.032,
                "Graphite-enhanced EPS, lightweight and water resistant.",
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Result<&InsulationMaterial, LookupError> {
        self.materials
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| LookupError::NotFound {
                table: ReferenceTable::Materials,
                key: id.to_string(),
            })
    }

    pub fn materials(&self) -> &[InsulationMaterial] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Quotes every material for one roof, in catalog order.
    pub fn quotes(&self, roof_area: f64, roof_type: RoofType, target_r_value: f64) -> Vec<MaterialQuote> {
        self.materials
            .iter()
            .map(|m| m.quote(roof_area, roof_type, target_r_value))
            .collect()
    }
}

/// Savings outcome of insulating with one material.
#[derive(Clone, Debug)]
pub struct MaterialComparison {
    pub quote: MaterialQuote,
    pub outcome: Result<CalculationResult, ValidationError>,
}

/// Runs the savings calculation once per catalog material.
///
/// Each material's quote replaces the proposed R-value and upgrade cost of
/// `base`. Calculations run in parallel; results are returned in catalog order.
pub fn compare_materials(
    calculator: &SavingsCalculator<'_>,
    catalog: &MaterialCatalog,
    base: &CalculationInput,
    roof_type: RoofType,
) -> Vec<MaterialComparison> {
    catalog
        .materials()
        .par_iter()
        .map(|material| {
            let quote = material.quote(base.roof_area, roof_type, TARGET_R_VALUE);
            let outcome = calculator.calculate(&base.with_material_quote(&quote));
            MaterialComparison { quote, outcome }
        })
        .collect()
}

/// Sorts comparisons by payback period, fastest first; failures go last.
pub fn rank_by_payback(comparisons: &mut [MaterialComparison]) {
    comparisons.sort_by(|a, b| match (&a.outcome, &b.outcome) {
        (Ok(x), Ok(y)) => x.payback_period.total_cmp(&y.payback_period),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceConfig;

    fn base_input() -> CalculationInput {
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
    fn test_thickness_and_r_value_are_inverse() {
        let catalog = MaterialCatalog::belgian_market();
        for material in catalog.materials() {
            let thickness = material.thickness_for(TARGET_R_VALUE);
            assert!((material.r_value(thickness) - TARGET_R_VALUE).abs() < 1e-9);
        }
    }

    #[test]
    fn test_glass_wool_quote_pitched() {
        let catalog = MaterialCatalog::belgian_market();
        let quote = catalog
            .get("glass_wool")
            .unwrap()
            .quote(100.0, RoofType::Pitched, TARGET_R_VALUE);
        assert_eq!(quote.surface_area, 125.0);
        assert_eq!(quote.total_cost, 2187.5);
        assert!((quote.thickness_m - 0.21).abs() < 1e-9);
    }

    #[test]
    fn test_flat_roof_uses_floor_area() {
        let catalog = MaterialCatalog::belgian_market();
        let quote = catalog
            .get("wood_fiber")
            .unwrap()
            .quote(80.0, RoofType::Flat, TARGET_R_VALUE);
        assert_eq!(quote.surface_area, 80.0);
        assert_eq!(quote.total_cost, 4400.0);
    }

    #[test]
    fn test_unknown_material() {
        let catalog = MaterialCatalog::belgian_market();
        assert!(matches!(
            catalog.get("asbestos"),
            Err(LookupError::NotFound {
                table: ReferenceTable::Materials,
                ..
            })
        ));
    }

    #[test]
    fn test_roof_type_parsing() {
        assert_eq!("flat".parse::<RoofType>(), Ok(RoofType::Flat));
        assert_eq!("Pitched".parse::<RoofType>(), Ok(RoofType::Pitched));
        assert!("dome".parse::<RoofType>().is_err());
    }

    #[test]
    fn test_compare_materials_keeps_catalog_order() {
        let config = ReferenceConfig::belgium();
        let calculator = SavingsCalculator::new(&config);
        let catalog = MaterialCatalog::belgian_market();

        let comparisons = compare_materials(&calculator, &catalog, &base_input(), RoofType::Flat);
        assert_eq!(comparisons.len(), catalog.len());
        for (comparison, material) in comparisons.iter().zip(catalog.materials()) {
            assert_eq!(comparison.quote.material_id, material.id);
            let result = comparison.outcome.as_ref().unwrap();
            assert_eq!(result.insulation_upgrade_cost, comparison.quote.total_cost);
        }
    }

    #[test]
    fn test_rank_by_payback_puts_cheapest_first() {
        let config = ReferenceConfig::belgium();
        let calculator = SavingsCalculator::new(&config);
        let catalog = MaterialCatalog::belgian_market();

        let mut comparisons =
            compare_materials(&calculator, &catalog, &base_input(), RoofType::Pitched);
        rank_by_payback(&mut comparisons);
        // Same R-value target, so the cheapest product pays back first.
        assert_eq!(comparisons[0].quote.material_id, "glass_wool");
        assert_eq!(comparisons[3].quote.material_id, "wood_fiber");
    }

    #[test]
    fn test_comparison_failure_is_kept_per_material() {
        let config = ReferenceConfig::belgium();
        let calculator = SavingsCalculator::new(&config);
        let catalog = MaterialCatalog::belgian_market();
        let base = CalculationInput {
            // Already past the target, every quote fails validation.
            current_r_value: 8.0,
            ..base_input()
        };

        let comparisons = compare_materials(&calculator, &catalog, &base, RoofType::Flat);
        assert!(comparisons.iter().all(|c| c.outcome.is_err()));
    }
}
