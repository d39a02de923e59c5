use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub headers: HeadersConfig,
    pub lists: ListsConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeadersConfig {
    /// Deepest heading level rendered as a header block.
    pub max_level: u8,
    pub emoji: bool,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            max_level: 2,
            emoji: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListsConfig {
    /// Indentation added per nesting level.
    pub indent: String,
    /// Marker for unordered items, without the trailing space.
    pub bullet: String,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            bullet: "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub strip_frontmatter: bool,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log the parsed document tree at trace level before rendering.
    pub dump_tree: bool,
}

impl HeadersConfig {
    /// Whether a heading of this level becomes a header block rather than
    /// bold section text.
    pub fn is_header(&self, level: u8) -> bool {
        level <= self.max_level
    }
}

impl Config {
    /// The configuration bundled with the crate.
    ///
    /// `build.rs` rejects a malformed `default_config.toml`, so parsing only
    /// falls back to the `Default` impls if the two drift apart.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    ///
    /// A file that exists but does not parse is reported and ignored.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }

    /// Load config from a TOML file, failing if it is missing or invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigSyntax {
            path: path.to_path_buf(),
            source,
        })
    }
}
