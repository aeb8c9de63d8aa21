use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::log::LogLevel;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Package whose settings page is opened when a permission can only be granted there.
    pub package_name: String,
    pub rationale_message: String,
}

impl Config {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            package_name: "com.example.app".to_string(),
            rationale_message: "Please accept the permissions from the app settings".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn test_cbor_blob() {
        let config = Config {
            log_level: LogLevel::ERROR,
            package_name: "com.example.cats".to_string(),
            ..Config::default()
        };

        let decoded = Config::from_cbor(&config.to_cbor().expect("Can't encode")).expect("Can't decode");
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut partial = BTreeMap::new();
        partial.insert("package_name", "com.example.cats");
        let bytes = serde_cbor::to_vec(&partial).expect("Can't encode");

        let config = Config::from_cbor(&bytes).expect("Can't decode");
        assert_eq!(config.package_name, "com.example.cats");
        assert_eq!(config.log_level, LogLevel::INFO);
        assert_eq!(config.rationale_message, Config::default().rationale_message);
    }

    #[test]
    fn test_garbage() {
        assert!(Config::from_cbor(b"not cbor at all").is_err());
    }
}
