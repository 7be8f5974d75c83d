//! Configuration loading and management
//!
//! [`AppConfig`] is built once at process start, either from the
//! environment (the Lambda deployment) or from a YAML document.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the cinema table name
pub const ENV_TABLE_NAME: &str = "TABLE_NAME_CINES";
/// Environment variable holding the token validator identifier
pub const ENV_TOKEN_VALIDATOR: &str = "LAMBDA_VALIDAR_TOKEN";
/// Environment variable holding the HTTP bind address
pub const ENV_BIND_ADDRESS: &str = "CINES_BIND_ADDRESS";
/// Environment variable enabling the tenant-less scan fallback
pub const ENV_ALLOW_SCAN: &str = "CINES_ALLOW_SCAN";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Prefix selecting the in-process static validator
pub const STATIC_VALIDATOR_PREFIX: &str = "static:";

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_allow_scan() -> bool {
    true
}

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the cinema table
    #[serde(default)]
    pub table_name: String,

    /// Lambda function name, HTTP(S) URL, or `static:` token list
    #[serde(default)]
    pub token_validator: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Whether a search without tenant scans the whole table
    #[serde(default = "default_allow_scan")]
    pub allow_scan: bool,
}

/// Where token checks are delegated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorTarget {
    /// A Lambda function, by name or ARN
    Lambda(String),
    /// An HTTP endpoint receiving the check as a JSON POST
    Http(String),
    /// In-process token list, `token` or `token@tenant` separated by commas
    Static(String),
}

impl ValidatorTarget {
    /// Classify a validator identifier
    pub fn parse(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if let Some(tokens) = identifier.strip_prefix(STATIC_VALIDATOR_PREFIX) {
            ValidatorTarget::Static(tokens.to_string())
        } else if identifier.starts_with("http://") || identifier.starts_with("https://") {
            ValidatorTarget::Http(identifier.to_string())
        } else {
            ValidatorTarget::Lambda(identifier.to_string())
        }
    }
}

impl AppConfig {
    pub fn new(table_name: impl Into<String>, token_validator: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            token_validator: token_validator.into(),
            bind_address: default_bind_address(),
            allow_scan: default_allow_scan(),
        }
    }

    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    pub fn with_scan(mut self, allow_scan: bool) -> Self {
        self.allow_scan = allow_scan;
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allow_scan = match lookup(ENV_ALLOW_SCAN) {
            Some(raw) => parse_flag(ENV_ALLOW_SCAN, &raw)?,
            None => default_allow_scan(),
        };

        let config = Self {
            table_name: lookup(ENV_TABLE_NAME).unwrap_or_default(),
            token_validator: lookup(ENV_TOKEN_VALIDATOR).unwrap_or_default(),
            bind_address: lookup(ENV_BIND_ADDRESS)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_bind_address),
            allow_scan,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every required setting is present
    ///
    /// Reports the first missing setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "table_name".to_string(),
                source_hint: ENV_TABLE_NAME.to_string(),
            });
        }
        if self.token_validator.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "token_validator".to_string(),
                source_hint: ENV_TOKEN_VALIDATOR.to_string(),
            });
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "bind_address".to_string(),
                source_hint: ENV_BIND_ADDRESS.to_string(),
            });
        }
        Ok(())
    }

    pub fn validator_target(&self) -> ValidatorTarget {
        ValidatorTarget::parse(&self.token_validator)
    }
}

fn parse_flag(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_with_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TABLE_NAME_CINES", "cines"),
            ("LAMBDA_VALIDAR_TOKEN", "validar-token"),
        ]))
        .unwrap();

        assert_eq!(config.table_name, "cines");
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert!(config.allow_scan);
        assert_eq!(
            config.validator_target(),
            ValidatorTarget::Lambda("validar-token".into())
        );
    }

    #[test]
    fn test_missing_table_name_is_reported_first() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField {
                field: "table_name".into(),
                source_hint: "TABLE_NAME_CINES".into(),
            }
        );

        let err = AppConfig::from_lookup(lookup(&[("TABLE_NAME_CINES", "cines")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field, .. } if field == "token_validator"));
    }

    #[test]
    fn test_allow_scan_flag() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TABLE_NAME_CINES", "cines"),
            ("LAMBDA_VALIDAR_TOKEN", "v"),
            ("CINES_ALLOW_SCAN", "false"),
        ]))
        .unwrap();
        assert!(!config.allow_scan);

        let err = AppConfig::from_lookup(lookup(&[
            ("TABLE_NAME_CINES", "cines"),
            ("LAMBDA_VALIDAR_TOKEN", "v"),
            ("CINES_ALLOW_SCAN", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validator_target() {
        assert_eq!(
            ValidatorTarget::parse("https://auth.local/check"),
            ValidatorTarget::Http("https://auth.local/check".into())
        );
        assert_eq!(
            ValidatorTarget::parse("http://localhost:9000"),
            ValidatorTarget::Http("http://localhost:9000".into())
        );
        assert_eq!(
            ValidatorTarget::parse("arn:aws:lambda:us-east-1:1:function:validar"),
            ValidatorTarget::Lambda("arn:aws:lambda:us-east-1:1:function:validar".into())
        );
        assert_eq!(
            ValidatorTarget::parse("static:a,b@t1"),
            ValidatorTarget::Static("a,b@t1".into())
        );
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
table_name: cines
token_validator: "static:dev-token"
allow_scan: false
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(!config.allow_scan);
        assert_eq!(
            config.validator_target(),
            ValidatorTarget::Static("dev-token".into())
        );
    }

    #[test]
    fn test_from_yaml_str_missing_validator() {
        let err = AppConfig::from_yaml_str("table_name: cines\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field, .. } if field == "token_validator"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table_name: cines").unwrap();
        writeln!(file, "token_validator: validar").unwrap();
        writeln!(file, "bind_address: 0.0.0.0:8080").unwrap();

        let config = AppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_from_yaml_file_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table_name: [unclosed").unwrap();

        let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
        match err {
            ConfigError::ParseError { file: Some(name), .. } => {
                assert!(name.ends_with(&*file.path().file_name().unwrap().to_string_lossy()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = AppConfig::from_yaml_file("/nonexistent/cines.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
