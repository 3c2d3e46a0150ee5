use serde::{Deserialize, Serialize};

use crate::edit::{EditKind, TextEdit};
use crate::position::Range;

/// One edit in a JSON response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEditJson {
    pub kind: EditKind,
    pub range: Range,
    pub new_text: String,
}

impl From<&TextEdit> for TextEditJson {
    fn from(edit: &TextEdit) -> Self {
        Self {
            kind: edit.kind(),
            range: edit.range,
            new_text: edit.new_text.clone(),
        }
    }
}

/// Response of a formatting run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub execution_id: String,
    pub success: bool,
    /// BLAKE3 checksum of the document the edits apply to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub edits: Vec<TextEditJson>,
    /// Document text after applying the edits, in apply mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResponse {
    pub fn success(execution_id: String, checksum: String, edits: &[TextEdit]) -> Self {
        Self {
            execution_id,
            success: true,
            checksum: Some(checksum),
            edits: edits.iter().map(TextEditJson::from).collect(),
            formatted: None,
            error: None,
        }
    }

    pub fn failure(execution_id: String, error: String) -> Self {
        Self {
            execution_id,
            success: false,
            checksum: None,
            edits: Vec::new(),
            formatted: None,
            error: Some(error),
        }
    }
}

/// Fresh execution id (UUID v4)
pub fn generate_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
