//! JSON loader for reference configurations.
//!
//! A configuration document has the same shape the built-in tables serialize to:
//!
//! ```text
//! {
//!   "regions": [
//!     { "name": "Vlaams", "default_energy_price": 0.35, "heating_degree_days": 2800 }
//!   ],
//!   "heating_sources": [
//!     { "value": "gas", "label": "Natural Gas", "co2_intensity": 0.201 }
//!   ],
//!   "default_cost_per_area": 45.0
//! }
//! ```

use crate::reference::{ConfigError, ReferenceConfig};
use log::info;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

impl ReferenceConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The file does not exist or cannot be opened
    /// - The document is not valid JSON or misses a required field
    /// - The tables fail [`ReferenceConfig::validate`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use roofsave::reference::ReferenceConfig;
    ///
    /// let config = ReferenceConfig::from_file("reference.json")?;
    /// println!("{} regions", config.regions().len());
    /// # Ok::<(), roofsave::reference::ConfigError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config = Self::from_reader(BufReader::new(file))?;
        info!(
            "loaded reference configuration from {} ({} regions, {} heating sources)",
            path.display(),
            config.regions().len(),
            config.heating_sources().len()
        );
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ReferenceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: ReferenceConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
