// Positions, ranges and offset conversion
pub mod position;

// Text edits and their application
pub mod edit;

// Line-diff primitive
pub mod diff;

// Diff-to-edit synthesis
pub mod synthesize;

// Range offset translation
pub mod translate;

// Documents and file reading
pub mod document;

// Language table
pub mod language;

// Config discovery
pub mod config;

// Beautifier boundary
pub mod formatter;

// Cancellation
pub mod cancel;

// Host settings
pub mod settings;

// Provider registration
pub mod registration;

// Formatting orchestration
pub mod provider;

// JSON output module
pub mod json;

// Re-exports
pub use position::{Position, Range, end_position, offset_at, position_at};
pub use edit::{EditError, EditKind, TextEdit, apply_edits, checksum, validate_edits, verify_checksum};
pub use diff::{Hunk, HunkLine, LineTag, Patch, structured_patch};
pub use synthesize::{LineEndings, synthesize, synthesize_with};
pub use translate::{ColumnShift, clamp_edits, translate, translate_with};
pub use document::{Document, DocumentError, read_document};
pub use language::{Language, detect_language, find_languages};
pub use config::{ConfigError, ConfigResolver, ConfigResult, LogNotifier, Notifier, Options};
pub use formatter::{BeautifyData, CommandFormatter, FormatError, Formatter, PrecomputedFormatter};
pub use cancel::CancellationToken;
pub use settings::Settings;
pub use registration::{DocumentFilter, Registration, activate, document_selector, enabled_languages};
pub use provider::{EditProvider, FormattingOptions, ProviderError};
pub use json::{EditResponse, TextEditJson, generate_execution_id};
