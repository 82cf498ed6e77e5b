//! Rate table loading functionality.
//!
//! This module provides the [`RateTableLoader`] type for loading locality
//! rate tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{DefaultsConfig, LocalitiesConfig, RateTable};

/// Loads a locality rate table from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config/sample/
/// ├── defaults.yaml    # Rates used when a locality lacks one
/// └── localities.yaml  # Localities and their dated rate records
/// ```
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::RateTableLoader;
///
/// let loader = RateTableLoader::load("./config/sample").unwrap();
/// let stockholm = loader.table().locality_by_code("0180").unwrap();
/// println!("Loaded locality: {}", stockholm.name);
/// ```
#[derive(Debug, Clone)]
pub struct RateTableLoader {
    table: RateTable,
}

impl RateTableLoader {
    /// Loads the rate table from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `RateTableLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or a missing field (`ConfigParseError`)
    /// - A rate is outside `[0, 1]` or a locality id or code is duplicated
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let defaults_path = path.join("defaults.yaml");
        let defaults = Self::load_yaml::<DefaultsConfig>(&defaults_path)?;

        let localities_path = path.join("localities.yaml");
        let localities = Self::load_yaml::<LocalitiesConfig>(&localities_path)?;

        let table = RateTable::new(defaults.defaults, localities.localities).map_err(|e| {
            EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        info!(
            path = %path.display(),
            localities = table.localities().len(),
            "Rate table loaded"
        );

        Ok(Self { table })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate table.
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Consumes the loader, returning the rate table.
    pub fn into_table(self) -> RateTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/sample"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tax-engine-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const VALID_DEFAULTS: &str = r#"
defaults:
  local_tax_rate: "0.2000"
  regional_tax_rate: "0.1100"
  burial_fee_rate: "0.0025"
  church_fee_rate: "0.0100"
"#;

    #[test]
    fn test_load_sample_configuration() {
        let result = RateTableLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.table().defaults().local_tax_rate, dec("0.2000"));
        assert!(loader.table().localities().len() >= 3);
    }

    #[test]
    fn test_sample_stockholm_rates() {
        let loader = RateTableLoader::load(config_path()).unwrap();
        let stockholm = loader.table().locality_by_code("0180").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        assert_eq!(stockholm.id.as_str(), "stockholm");
        assert_eq!(
            stockholm.resolve_rate(date, |r| r.local_tax_rate),
            Some(dec("0.1782"))
        );
        assert_eq!(
            stockholm.resolve_rate(date, |r| r.regional_tax_rate),
            Some(dec("0.1208"))
        );
    }

    #[test]
    fn test_load_missing_directory() {
        match RateTableLoader::load("./config/does-not-exist") {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.ends_with("defaults.yaml")),
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = scratch_dir("invalid-yaml");
        fs::write(dir.join("defaults.yaml"), VALID_DEFAULTS).unwrap();
        fs::write(dir.join("localities.yaml"), "localities: [ {id: ").unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.ends_with("localities.yaml"))
            }
            _ => panic!("Expected ConfigParseError error"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_duplicate_locality() {
        let dir = scratch_dir("duplicate");
        fs::write(dir.join("defaults.yaml"), VALID_DEFAULTS).unwrap();
        fs::write(
            dir.join("localities.yaml"),
            r#"
localities:
  - id: "a"
    code: "0001"
    name: "A"
  - id: "a"
    code: "0002"
    name: "A again"
"#,
        )
        .unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate locality id"))
            }
            _ => panic!("Expected ConfigParseError error"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_out_of_range_default() {
        let dir = scratch_dir("bad-default");
        fs::write(
            dir.join("defaults.yaml"),
            VALID_DEFAULTS.replace("\"0.2000\"", "\"20.00\""),
        )
        .unwrap();
        fs::write(dir.join("localities.yaml"), "localities: []\n").unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("local_tax_rate"))
            }
            _ => panic!("Expected ConfigParseError error"),
        }
        fs::remove_dir_all(&dir).ok();
    }
}
