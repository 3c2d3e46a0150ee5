use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResolver};
use crate::synthesize::LineEndings;
use crate::translate::ColumnShift;

/// Host-side settings for the formatting provider
///
/// Passed explicitly to everything that needs them; nothing reads editor
/// state behind the caller's back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enabled: bool,
    /// Provider priority reported at registration
    pub priority: i32,
    /// Config file used when the upward search finds nothing
    pub default_config: Option<PathBuf>,
    /// Workspace root: search fallback start and search stop directory
    pub project_path: Option<PathBuf>,
    pub column_shift: ColumnShift,
    pub line_endings: LineEndings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 1,
            default_config: None,
            project_path: None,
            column_shift: ColumnShift::default(),
            line_endings: LineEndings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Config resolver that never searches above the project path
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::default().stop_dir(self.project_path.clone())
    }
}
