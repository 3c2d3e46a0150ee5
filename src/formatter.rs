//! Beautifier boundary.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::Options;

/// Everything the beautifier gets for one request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeautifyData {
    pub text: String,
    pub language_name: Option<String>,
    /// Extension including the leading dot
    pub file_extension: Option<String>,
    pub file_path: Option<PathBuf>,
    pub project_path: Option<PathBuf>,
    pub options: Options,
}

/// Error types for the beautifier boundary
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to start formatter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("formatter I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("formatter `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("formatter `{program}` produced invalid UTF-8")]
    InvalidUtf8 { program: String },
    #[error("failed to encode formatter options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("formatter rejected the request: {0}")]
    Rejected(String),
}

/// External code beautifier
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn beautify(&self, data: &BeautifyData) -> Result<String, FormatError>;
}

/// Formatter that already knows the answer
///
/// Lets callers diff two texts through the normal provider pipeline.
#[derive(Debug, Clone)]
pub struct PrecomputedFormatter {
    formatted: String,
}

impl PrecomputedFormatter {
    pub fn new(formatted: impl Into<String>) -> Self {
        Self {
            formatted: formatted.into(),
        }
    }
}

#[async_trait]
impl Formatter for PrecomputedFormatter {
    async fn beautify(&self, _data: &BeautifyData) -> Result<String, FormatError> {
        Ok(self.formatted.clone())
    }
}

/// Formatter backed by an external process
///
/// The text goes to the process's stdin and the formatted text is read from
/// its stdout. Arguments may contain `{file}`, `{language}` and
/// `{extension}` placeholders. Request metadata is also exported as
/// `UNIBEAUTIFY_LANGUAGE`, `UNIBEAUTIFY_FILE_PATH`,
/// `UNIBEAUTIFY_FILE_EXTENSION`, `UNIBEAUTIFY_PROJECT_PATH` and
/// `UNIBEAUTIFY_OPTIONS` (JSON).
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn expand_arg(arg: &str, data: &BeautifyData) -> String {
        let file = data
            .file_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        arg.replace("{file}", &file)
            .replace("{language}", data.language_name.as_deref().unwrap_or(""))
            .replace("{extension}", data.file_extension.as_deref().unwrap_or(""))
    }

    fn command(&self, data: &BeautifyData) -> Result<Command, FormatError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args.iter().map(|arg| Self::expand_arg(arg, data)))
            .env("UNIBEAUTIFY_OPTIONS", serde_json::to_string(&data.options)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let optional_env = [
            ("UNIBEAUTIFY_LANGUAGE", data.language_name.clone()),
            ("UNIBEAUTIFY_FILE_EXTENSION", data.file_extension.clone()),
            (
                "UNIBEAUTIFY_FILE_PATH",
                data.file_path.as_ref().map(|p| p.display().to_string()),
            ),
            (
                "UNIBEAUTIFY_PROJECT_PATH",
                data.project_path.as_ref().map(|p| p.display().to_string()),
            ),
        ];
        for (key, value) in optional_env {
            if let Some(value) = value {
                command.env(key, value);
            }
        }
        Ok(command)
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    async fn beautify(&self, data: &BeautifyData) -> Result<String, FormatError> {
        debug!(program = %self.program, "running formatter");
        let mut child = self.command(data)?.spawn().map_err(|source| FormatError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FormatError::Rejected("formatter stdin unavailable".to_string()))?;
        let write = async move {
            let result = stdin.write_all(data.text.as_bytes()).await;
            drop(stdin);
            match result {
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        written?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidUtf8 {
            program: self.program.clone(),
        })
    }
}
