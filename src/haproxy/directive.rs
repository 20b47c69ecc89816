//! Directive values stored in configuration sections.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Global,
    Defaults,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Global => f.write_str("global"),
            Section::Defaults => f.write_str("defaults"),
        }
    }
}

/// A structured log target (`log` directive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogTarget {
    /// Destination; `host:port` for network targets, `stdout` for standard output.
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl LogTarget {
    pub fn is_stdout(&self) -> bool {
        self.address == "stdout"
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        if let Some(length) = self.length {
            write!(f, " len {}", length)?;
        }
        if let Some(format) = &self.format {
            write!(f, " format {}", format)?;
        }
        if let Some(facility) = &self.facility {
            write!(f, " {}", facility)?;
        }
        if let Some(level) = &self.level {
            write!(f, " {}", level)?;
        }
        Ok(())
    }
}

/// Value of a single directive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Directive {
    /// Flag without arguments (e.g. `daemon`).
    Enabled,
    Int(i64),
    Timeout(String),
    Text(String),
    Log(LogTarget),
}

impl Directive {
    /// Render the directive as a configuration line for the given key.
    pub fn render(&self, key: &str) -> String {
        match self {
            Directive::Enabled => key.to_string(),
            Directive::Int(v) => format!("{} {}", key, v),
            Directive::Timeout(v) => format!("{} {}", key, v),
            Directive::Text(v) => format!("{} {}", key, v),
            Directive::Log(target) => format!("{} {}", key, target),
        }
    }
}
