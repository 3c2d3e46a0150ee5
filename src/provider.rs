//! Formatting orchestration.
//!
//! Glues the boundaries together: extract the range text, resolve options,
//! run the formatter, then synthesize and translate the edits.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::cancel::CancellationToken;
use crate::config::{ConfigError, LogNotifier, Notifier, Options};
use crate::document::Document;
use crate::edit::TextEdit;
use crate::formatter::{BeautifyData, FormatError, Formatter};
use crate::position::{Range, end_position};
use crate::settings::Settings;
use crate::synthesize::synthesize_with;
use crate::translate::{clamp_edits, translate_with};

/// Editor formatting options sent along with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingOptions {
    pub tab_size: u32,
    pub insert_spaces: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

/// Error types for a formatting request
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Formatter(#[from] FormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("formatting request was cancelled")]
    Cancelled,
}

/// Document and range formatting provider
pub struct EditProvider {
    formatter: Box<dyn Formatter>,
    settings: Settings,
    notifier: Box<dyn Notifier>,
}

impl EditProvider {
    pub fn new(formatter: impl Formatter + 'static, settings: Settings) -> Self {
        Self {
            formatter: Box::new(formatter),
            settings,
            notifier: Box::new(LogNotifier),
        }
    }

    /// Replace the sink for user-facing messages
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edits that format the whole document
    pub async fn provide_document_formatting_edits(
        &self,
        document: &Document,
        options: &FormattingOptions,
        token: &CancellationToken,
    ) -> Result<Vec<TextEdit>, ProviderError> {
        self.provide_range_formatting_edits(document, document.full_range(), options, token)
            .await
    }

    /// Edits that format `range`, in document coordinates
    ///
    /// Either the full edit list or an error; nothing partial.
    pub async fn provide_range_formatting_edits(
        &self,
        document: &Document,
        range: Range,
        options: &FormattingOptions,
        token: &CancellationToken,
    ) -> Result<Vec<TextEdit>, ProviderError> {
        let original = document.text_in_range(range);

        let formatted = self
            .beautify_range(document, range, options, token)
            .await
            .inspect_err(|err| error!(error = %err, "formatting failed"))?;

        let edits = synthesize_with(original, &formatted, self.settings.line_endings);
        let edits = clamp_edits(&edits, end_position(original));
        let edits = translate_with(&edits, range, self.settings.column_shift);
        debug!(count = edits.len(), "formatting edits");
        Ok(edits)
    }

    async fn beautify_range(
        &self,
        document: &Document,
        range: Range,
        options: &FormattingOptions,
        token: &CancellationToken,
    ) -> Result<String, ProviderError> {
        debug!(?options, "formatting options");
        if token.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let file_path = document.path.clone();
        let project_path = self.settings.project_path.clone();
        let search_start = file_path.as_deref().or(project_path.as_deref());
        let beautify_options = self.beautify_options(search_start).await?;

        let data = BeautifyData {
            text: document.text_in_range(range).to_string(),
            language_name: document.language_name().map(str::to_string),
            file_extension: document.file_extension(),
            file_path,
            project_path,
            options: beautify_options,
        };
        debug!(
            language = ?data.language_name,
            extension = ?data.file_extension,
            path = ?data.file_path,
            "beautify data"
        );

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ProviderError::Cancelled),
            result = self.formatter.beautify(&data) => result.map_err(Into::into),
        }
    }

    /// Options for a request starting its config search at `search_start`
    pub async fn beautify_options(&self, search_start: Option<&Path>) -> Result<Options, ConfigError> {
        self.settings
            .resolver()
            .resolve_options(
                search_start,
                self.settings.default_config.as_deref(),
                self.notifier.as_ref(),
            )
            .await
    }
}
