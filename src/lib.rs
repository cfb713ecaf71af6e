//! Roof insulation savings estimation.
//!
//! Computes the energy, cost and CO₂ savings of upgrading a roof's thermal
//! resistance from regional climate data and heating source emissions.

pub mod calc;
pub mod materials;
pub mod reference;
pub mod report;

#[cfg(feature = "python")]
mod python;

pub use calc::{
    calculate, CalculationInput, CalculationResult, SavingsCalculator, ValidationError,
    ValidationRule,
};
pub use materials::{compare_materials, MaterialCatalog, RoofType};
pub use reference::ReferenceConfig;
pub use report::{ReportFormat, SavingsReport};
