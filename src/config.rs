//! Storage configuration loader.
//!
//! A versioned JSON document naming where the database keeps its metadata,
//! which directories hold data (each with an optional size limit), and the
//! engine-specific configuration file:
//!
//! ```json
//! {
//!     "version": "1.0",
//!     "directory": "./tmp/store/",
//!     "data_directories": [
//!         { "path": "/mnt/disk0/", "max_size": "512 GB" },
//!         { "path": "/mnt/disk1/", "max_size": 1099511627776 }
//!     ],
//!     "engine_config_path": "./engine.json"
//! }
//! ```
//!
//! Size limits are byte counts or strings with a `B`, `KB`, `MB`, `GB` or
//! `TB` suffix, all 1024-based. An absent limit means unlimited.
//!
//! The Louvain core does not read this configuration; it is consumed by
//! whatever opens the store.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Only document version this loader accepts.
pub const SUPPORTED_VERSION: (u8, u8) = (1, 0);

/// Metadata directory used when the document names none.
pub const DEFAULT_DIRECTORY: &str = "./tmp/store/";

const UNITS: [(&str, u64); 5] = [
    ("B", 1),
    ("KB", 1 << 10),
    ("MB", 1 << 20),
    ("GB", 1 << 30),
    ("TB", 1 << 40),
];

/// Size limit in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub u64);

impl ByteSize {
    /// No software-imposed limit.
    pub const UNLIMITED: ByteSize = ByteSize(u64::MAX);

    /// Number of bytes.
    pub fn bytes(self) -> u64 {
        self.0
    }

    /// True for [`ByteSize::UNLIMITED`].
    pub fn is_unlimited(self) -> bool {
        self == Self::UNLIMITED
    }
}

impl Default for ByteSize {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl FromStr for ByteSize {
    type Err = Error;

    /// Parse `"<number>[ ]<unit>"`. Fractions need a unit of `KB` or larger.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("invalid size '{text}'"));

        let trimmed = text.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);
        if number.is_empty() || number.starts_with('.') {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit = unit.trim_start();
        let multiplier = if unit.is_empty() {
            1
        } else {
            UNITS
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|&(_, multiplier)| multiplier)
                .ok_or_else(invalid)?
        };
        if multiplier == 1 && number.contains('.') {
            return Err(invalid());
        }

        let bytes = value * multiplier as f64;
        if !bytes.is_finite() || bytes >= u64::MAX as f64 {
            return Err(invalid());
        }
        Ok(ByteSize(bytes as u64))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            return write!(f, "unlimited");
        }
        let (name, multiplier) = UNITS
            .iter()
            .rev()
            .find(|(_, multiplier)| self.0 != 0 && self.0 % multiplier == 0)
            .copied()
            .unwrap_or(("B", 1));
        write!(f, "{} {name}", self.0 / multiplier)
    }
}

impl Serialize for ByteSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bytes(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bytes(bytes) => Ok(ByteSize(bytes)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One data directory and the space the database may use in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Directory path.
    pub path: String,
    /// Space limit.
    #[serde(default)]
    pub max_size: ByteSize,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Where the database keeps metadata (schema, logs, ...).
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Where the database keeps data.
    #[serde(default)]
    pub data_directories: Vec<DiskConfig>,
    /// Engine-specific configuration file.
    #[serde(default)]
    pub engine_config_path: String,
}

fn default_directory() -> String {
    DEFAULT_DIRECTORY.to_owned()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            data_directories: Vec::new(),
            engine_config_path: String::new(),
        }
    }
}

fn parse_version(text: &str) -> Option<(u8, u8)> {
    let (major, minor) = text.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn version_string() -> String {
    format!("{}.{}", SUPPORTED_VERSION.0, SUPPORTED_VERSION.1)
}

impl DatabaseConfig {
    /// Load from a parsed JSON document.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let version = value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let parsed = parse_version(version)
            .ok_or_else(|| Error::Config(format!("invalid version format '{version}'")))?;
        if parsed != SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion {
                found: version.to_owned(),
            });
        }

        let config: DatabaseConfig = serde_json::from_value(value)?;
        if config.data_directories.iter().any(|disk| disk.path.is_empty()) {
            return Err(Error::Config("empty data directory path".to_owned()));
        }
        Ok(config)
    }

    /// Load from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// JSON document, including the `version` field, that loads back into `self`.
    pub fn to_json_value(&self) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            let _ = map.insert("version".to_owned(), Value::String(version_string()));
        }
        Ok(value)
    }

    /// [`DatabaseConfig::to_json_value`] as text.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value()?)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sizes() {
        assert_eq!("512".parse::<ByteSize>().unwrap(), ByteSize(512));
        assert_eq!("512 B".parse::<ByteSize>().unwrap(), ByteSize(512));
        assert_eq!("4KB".parse::<ByteSize>().unwrap(), ByteSize(4096));
        assert_eq!("3 MB".parse::<ByteSize>().unwrap(), ByteSize(3 << 20));
        assert_eq!("1.5 GB".parse::<ByteSize>().unwrap(), ByteSize(3 << 29));
        assert_eq!("2 TB".parse::<ByteSize>().unwrap(), ByteSize(2 << 40));
    }

    #[test]
    fn test_reject_bad_sizes() {
        for text in [
            "", "KB", ".5 GB", "1.5", "1.5 B", "-3 KB", "10 PB", "10 kb", "10 KB extra",
            "99999999999 TB",
        ] {
            assert!(text.parse::<ByteSize>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_display_sizes() {
        assert_eq!(ByteSize(3 << 20).to_string(), "3 MB");
        assert_eq!(ByteSize(1000).to_string(), "1000 B");
        assert_eq!(ByteSize(0).to_string(), "0 B");
        assert_eq!(ByteSize::UNLIMITED.to_string(), "unlimited");
    }

    #[test]
    fn test_load_full_document() {
        let config = DatabaseConfig::from_json_value(json!({
            "version": "1.0",
            "directory": "/var/lib/store/",
            "data_directories": [
                { "path": "/mnt/a/", "max_size": "2 GB" },
                { "path": "/mnt/b/", "max_size": 1024 },
                { "path": "/mnt/c/" }
            ],
            "engine_config_path": "/etc/engine.json"
        }))
        .unwrap();

        assert_eq!(config.directory, "/var/lib/store/");
        assert_eq!(config.engine_config_path, "/etc/engine.json");
        assert_eq!(config.data_directories.len(), 3);
        assert_eq!(config.data_directories[0].max_size, ByteSize(2 << 30));
        assert_eq!(config.data_directories[1].max_size, ByteSize(1024));
        assert!(config.data_directories[2].max_size.is_unlimited());
    }

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::from_json_str(r#"{"version": "1.0"}"#).unwrap();
        assert_eq!(config, DatabaseConfig::default());
        assert_eq!(config.directory, DEFAULT_DIRECTORY);
    }

    #[test]
    fn test_version_checks() {
        assert!(matches!(
            DatabaseConfig::from_json_value(json!({})),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DatabaseConfig::from_json_value(json!({ "version": "one" })),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DatabaseConfig::from_json_value(json!({ "version": "1" })),
            Err(Error::Config(_))
        ));
        assert_eq!(
            DatabaseConfig::from_json_value(json!({ "version": "2.0" })).unwrap_err(),
            Error::UnsupportedVersion {
                found: "2.0".to_owned()
            }
        );
    }

    #[test]
    fn test_invalid_directories() {
        assert!(DatabaseConfig::from_json_value(json!({
            "version": "1.0",
            "data_directories": { "path": "/mnt/a/" }
        }))
        .is_err());
        assert_eq!(
            DatabaseConfig::from_json_value(json!({
                "version": "1.0",
                "data_directories": [{ "path": "" }]
            }))
            .unwrap_err(),
            Error::Config("empty data directory path".to_owned())
        );
        assert!(DatabaseConfig::from_json_value(json!({
            "version": "1.0",
            "data_directories": [{ "path": "/mnt/a/", "max_size": -5 }]
        }))
        .is_err());
        assert!(DatabaseConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let config = DatabaseConfig {
            directory: "/srv/meta/".to_owned(),
            data_directories: vec![
                DiskConfig {
                    path: "/srv/d0/".to_owned(),
                    max_size: "10 GB".parse().unwrap(),
                },
                DiskConfig {
                    path: "/srv/d1/".to_owned(),
                    max_size: ByteSize::UNLIMITED,
                },
            ],
            engine_config_path: "engine.json".to_owned(),
        };

        let text = config.to_json_string().unwrap();
        assert!(text.contains("\"version\":\"1.0\""));
        assert_eq!(DatabaseConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"version": "1.0", "engine_config_path": "e.json"}"#).unwrap();

        let config = DatabaseConfig::from_file(&path).unwrap();
        assert_eq!(config.engine_config_path, "e.json");
        assert!(DatabaseConfig::from_file(dir.path().join("missing.json")).is_err());
    }
}
