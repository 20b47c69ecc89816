//! Settings and annotation source loading from disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::schema::{AnnotationSource, ControllerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate controller settings from a TOML file.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ControllerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the `[data]` table of an annotation source file.
pub fn load_annotations(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let source: AnnotationSource = toml::from_str(&content).map_err(ConfigError::Parse)?;
    Ok(source.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[controller]
sync_period_secs = 10

[defaults]
maxconn = "4000"

[observability]
log_level = "debug"
log_format = "json"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.controller.sync_period_secs, 10);
        assert_eq!(config.defaults.get("maxconn").map(String::as_str), Some("4000"));
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.controller.write_config);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controller]\nsync_period_secs = 0").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_annotations_multiline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[data]
maxconn = "1000"
syslog-server = """
address:stdout, format:raw, facility:daemon
address:10.0.0.1, port:514, facility:local0
"""
"#
        )
        .unwrap();

        let data = load_annotations(file.path()).unwrap();
        assert_eq!(data["maxconn"], "1000");
        assert_eq!(data["syslog-server"].lines().count(), 2);
    }
}
