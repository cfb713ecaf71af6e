use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::calc::{CalculationInput, Outcome, SavingsCalculator};
use crate::reference::ReferenceConfig;

#[pyclass]
pub struct Calculator {
    config: ReferenceConfig,
}

#[pymethods]
impl Calculator {
    /// Uses the built-in Belgian tables, or a JSON configuration file when given.
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => {
                ReferenceConfig::from_file(&path).map_err(|e| PyIOError::new_err(e.to_string()))?
            }
            None => ReferenceConfig::belgium(),
        };
        Ok(Calculator { config })
    }

    fn calculate(&self, input_json: &str) -> PyResult<String> {
        let input: CalculationInput =
            serde_json::from_str(input_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let result = SavingsCalculator::new(&self.config)
            .calculate(&input)
            .map_err(|e| PyValueError::new_err(format!("{}: {}", e.rule(), e)))?;
        serde_json::to_string(&result).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Returns one `{"ok": ...}` or `{"error": ...}` JSON document per input.
    fn calculate_batch(&self, inputs_json: &str) -> PyResult<Vec<String>> {
        let inputs: Vec<CalculationInput> =
            serde_json::from_str(inputs_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        SavingsCalculator::new(&self.config)
            .calculate_batch(&inputs)
            .into_iter()
            .map(|r| {
                serde_json::to_string(&Outcome::from(r))
                    .map_err(|e| PyValueError::new_err(e.to_string()))
            })
            .collect()
    }

    fn reference_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.config.catalog())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pymodule]
fn roofsave(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Calculator>()?;
    Ok(())
}
