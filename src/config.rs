//! Beautifier configuration discovery.
//!
//! Walks up from a starting path looking for the module's configuration
//! (`package.json` property or an rc file), with an optional fallback file
//! when nothing is found.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error};

/// Options mapping handed to the beautifier, keyed by language name
pub type Options = Map<String, Value>;

/// Module name used to derive config file names
pub const MODULE_NAME: &str = "unibeautify";

/// Error types for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("config {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// Sink for messages that must reach the user, not just the log
pub trait Notifier: Send + Sync {
    fn show_error_message(&self, message: &str);
}

/// [`Notifier`] that reports through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_error_message(&self, message: &str) {
        error!("{}", message);
    }
}

/// Configuration found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigResult {
    pub config: Options,
    pub filepath: PathBuf,
    /// The file existed but held no configuration
    pub is_empty: bool,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    PackageJson,
    Json,
    Yaml,
}

/// Upward configuration search for one module name
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    module_name: String,
    stop_dir: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            stop_dir: None,
        }
    }

    /// Last directory searched; the walk never goes above it
    pub fn stop_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.stop_dir = dir;
        self
    }

    /// File names checked in each directory, in priority order
    fn candidates(&self) -> Vec<(String, Format)> {
        let name = &self.module_name;
        vec![
            ("package.json".to_string(), Format::PackageJson),
            (format!(".{}rc", name), Format::Yaml),
            (format!(".{}rc.json", name), Format::Json),
            (format!(".{}rc.yaml", name), Format::Yaml),
            (format!(".{}rc.yml", name), Format::Yaml),
        ]
    }

    /// Search `start` (its directory, when `start` is a file) and its
    /// ancestors up to the stop directory
    pub async fn search(&self, start: &Path) -> Result<Option<ConfigResult>, ConfigError> {
        let is_file = tokio::fs::metadata(start)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        let mut dir = if is_file { start.parent() } else { Some(start) };

        while let Some(current) = dir {
            debug!(dir = %current.display(), "searching for {} config", self.module_name);
            for (file_name, format) in self.candidates() {
                let path = current.join(&file_name);
                let Some(content) = read_optional(&path).await? else {
                    continue;
                };
                if let Some(result) = self.parse(&path, &content, format)? {
                    return Ok(Some(result));
                }
            }

            if self.stop_dir.as_deref() == Some(current) {
                break;
            }
            dir = current.parent();
        }

        Ok(None)
    }

    /// Load one explicit config file
    ///
    /// `Ok(None)` when the file is a `package.json` without the module's
    /// property.
    pub async fn load(&self, path: &Path) -> Result<Option<ConfigResult>, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.parse(path, &content, format_for(path))
    }

    /// Options from the nearest config, else from `fallback`, else empty
    ///
    /// A fallback that cannot be loaded is reported through `notifier`
    /// before the error is returned.
    pub async fn resolve_options(
        &self,
        search_start: Option<&Path>,
        fallback: Option<&Path>,
        notifier: &dyn Notifier,
    ) -> Result<Options, ConfigError> {
        if let Some(start) = search_start {
            if let Some(found) = self.search(start).await? {
                debug!(path = %found.filepath.display(), "using config");
                return Ok(found.config);
            }
        }

        let Some(fallback) = fallback else {
            return Ok(Options::new());
        };

        match self.load(fallback).await {
            Ok(result) => Ok(result.map(|found| found.config).unwrap_or_default()),
            Err(err) => {
                notifier.show_error_message(&format!(
                    "We could not find your default config file: {}. Please correct the path, \
                     create a config in your workspace or unset the default config, otherwise \
                     formatting will not work!",
                    fallback.display()
                ));
                Err(err)
            }
        }
    }

    fn parse(&self, path: &Path, content: &str, format: Format) -> Result<Option<ConfigResult>, ConfigError> {
        let value = match format {
            Format::PackageJson => {
                let package: Value = parse_json(path, content)?;
                match package.get(&self.module_name) {
                    Some(value) => value.clone(),
                    None => return Ok(None),
                }
            }
            _ if content.trim().is_empty() => {
                return Ok(Some(ConfigResult {
                    config: Options::new(),
                    filepath: path.to_path_buf(),
                    is_empty: true,
                }));
            }
            Format::Json => parse_json(path, content)?,
            Format::Yaml => serde_yaml::from_str(content).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?,
        };

        match value {
            Value::Object(config) => Ok(Some(ConfigResult {
                config,
                filepath: path.to_path_buf(),
                is_empty: false,
            })),
            Value::Null => Ok(Some(ConfigResult {
                config: Options::new(),
                filepath: path.to_path_buf(),
                is_empty: true,
            })),
            _ => Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(MODULE_NAME)
    }
}

fn format_for(path: &Path) -> Format {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    match (file_name, extension) {
        ("package.json", _) => Format::PackageJson,
        (_, "json") => Format::Json,
        _ => Format::Yaml,
    }
}

fn parse_json(path: &Path, content: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Read a file, treating "not found" and directories as absent
async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}

async fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(_) if is_dir(path).await => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
