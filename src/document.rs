use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::edit::checksum;
use crate::language::{Language, find_languages};
use crate::position::{Range, end_position, range_to_offsets};

/// Open text document as seen by the formatting provider
#[derive(Debug, Clone)]
pub struct Document {
    /// File system path, if the document is backed by a file
    pub path: Option<PathBuf>,
    /// Editor language id (e.g. `typescript`)
    pub language_id: String,
    pub text: String,
}

impl Document {
    pub fn new(path: Option<PathBuf>, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path,
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// Range spanning the whole document
    pub fn full_range(&self) -> Range {
        Range::new(Default::default(), end_position(&self.text))
    }

    /// Text covered by `range`, with positions clamped to the document
    pub fn text_in_range(&self, range: Range) -> &str {
        let (start, end) = range_to_offsets(&self.text, range);
        &self.text[start..end]
    }

    /// Beautifier languages matching this document's language id
    pub fn languages(&self) -> Vec<Language> {
        find_languages(&self.language_id)
    }

    /// Beautifier name of the first matching language
    pub fn language_name(&self) -> Option<&'static str> {
        self.languages().first().map(Language::name)
    }

    /// File extension including the leading dot, e.g. `.ts`
    pub fn file_extension(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        Some(format!(".{}", extension))
    }

    /// BLAKE3 checksum of the document text (hex-encoded)
    pub fn checksum(&self) -> String {
        checksum(&self.text)
    }
}

/// Error types for reading documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// Read a file from disk into a [`Document`]
///
/// The language id defaults to the first editor id of the language detected
/// from the file extension, or `plaintext`.
pub fn read_document<P: AsRef<Path>>(path: P, language_id: Option<&str>) -> Result<Document, DocumentError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(DocumentError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| DocumentError::InvalidUtf8(path_ref.display().to_string()))?;

    let language_id = match language_id {
        Some(id) => id.to_string(),
        None => crate::language::detect_language(path_ref)
            .and_then(|language| language.editor_ids().first().copied())
            .unwrap_or("plaintext")
            .to_string(),
    };

    Ok(Document::new(Some(path_ref.to_path_buf()), language_id, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_read_document_valid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("sample.ts");
        let content = "const a = 1;\nconst b = 2;\n";
        fs::write(&file_path, content).unwrap();

        let document = read_document(&file_path, None).unwrap();

        assert_eq!(document.text, content);
        assert_eq!(document.language_id, "typescript");
        assert_eq!(document.language_name(), Some("TypeScript"));
        assert_eq!(document.file_extension().as_deref(), Some(".ts"));
        assert!(document.checksum().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_read_document_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("invalid.txt");
        fs::write(&file_path, [0xFF, 0xFE, 0xFD]).unwrap();

        match read_document(&file_path, None) {
            Err(DocumentError::InvalidUtf8(p)) => assert_eq!(p, file_path.display().to_string()),
            _ => panic!("Expected DocumentError::InvalidUtf8"),
        }
    }

    #[test]
    fn test_read_document_not_found() {
        match read_document("/nonexistent/path/that/does/not/exist.txt", None) {
            Err(DocumentError::NotFound(p)) => assert!(p.contains("nonexistent")),
            _ => panic!("Expected DocumentError::NotFound"),
        }
    }

    #[test]
    fn test_explicit_language_id_wins() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("component.js");
        fs::write(&file_path, "").unwrap();

        let document = read_document(&file_path, Some("javascriptreact")).unwrap();
        assert_eq!(document.language_name(), Some("JSX"));
    }

    #[test]
    fn test_text_in_range_and_full_range() {
        let document = Document::new(None, "plaintext", "one\ntwo\nthree");

        assert_eq!(document.full_range().end, Position::new(2, 5));
        assert_eq!(document.text_in_range(document.full_range()), "one\ntwo\nthree");

        let range = Range::new(Position::new(0, 2), Position::new(1, 2));
        assert_eq!(document.text_in_range(range), "e\ntw");
        assert_eq!(document.file_extension(), None);
    }
}
