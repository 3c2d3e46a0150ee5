//! Provider registration: which documents the formatter is offered for.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::{ConfigError, Notifier, Options};
use crate::language::Language;
use crate::settings::Settings;

/// Document selector entry, by editor language id or by path glob
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub scheme: String,
}

impl DocumentFilter {
    fn language(id: &str) -> Self {
        Self {
            language: Some(id.to_string()),
            pattern: None,
            scheme: "file".to_string(),
        }
    }

    fn pattern(pattern: String) -> Self {
        Self {
            language: None,
            pattern: Some(pattern),
            scheme: "file".to_string(),
        }
    }
}

/// What the host registers the document and range providers with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub priority: i32,
    #[serde(serialize_with = "serialize_names")]
    pub languages: Vec<Language>,
    pub selector: Vec<DocumentFilter>,
}

fn serialize_names<S: serde::Serializer>(languages: &[Language], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(languages.iter().map(Language::name))
}

/// Languages not switched off in `options`
///
/// A language is disabled only by an options entry that is literally
/// `false`; a missing entry keeps it enabled.
pub fn enabled_languages(options: &Options, supported: &[Language]) -> Vec<Language> {
    supported
        .iter()
        .copied()
        .filter(|language| options.get(language.name()) != Some(&Value::Bool(false)))
        .collect()
}

/// Language-id filters for every language, then extension patterns
pub fn document_selector(languages: &[Language]) -> Vec<DocumentFilter> {
    let by_language = languages
        .iter()
        .flat_map(|language| language.editor_ids().iter().map(|id| DocumentFilter::language(id)));
    let by_pattern = languages
        .iter()
        .filter_map(|language| language.extension_pattern())
        .map(DocumentFilter::pattern);

    by_language.chain(by_pattern).collect()
}

/// Registration for the given settings and resolved options
pub fn registration_for(settings: &Settings, options: &Options) -> Registration {
    let languages = enabled_languages(options, Language::all());
    let selector = document_selector(&languages);
    Registration {
        priority: settings.priority,
        languages,
        selector,
    }
}

/// Resolve project options and build the registration
///
/// `Ok(None)` when the provider is disabled in `settings`.
pub async fn activate(settings: &Settings, notifier: &dyn Notifier) -> Result<Option<Registration>, ConfigError> {
    if !settings.enabled {
        info!("unibeautify is disabled");
        return Ok(None);
    }

    let options = settings
        .resolver()
        .resolve_options(
            settings.project_path.as_deref(),
            settings.default_config.as_deref(),
            notifier,
        )
        .await?;

    let registration = registration_for(settings, &options);
    info!(
        languages = registration.languages.len(),
        priority = registration.priority,
        "registering formatting providers"
    );
    Ok(Some(registration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogNotifier;
    use serde_json::json;

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("options must be an object"),
        }
    }

    #[test]
    fn test_false_disables_language() {
        let opts = options(json!({"JSON": false, "Python": {"indent_size": 4}, "Go": null}));
        let enabled = enabled_languages(&opts, &[Language::Json, Language::Python, Language::Go]);
        assert_eq!(enabled, vec![Language::Python, Language::Go]);
    }

    #[test]
    fn test_selector_lists_ids_then_patterns() {
        let selector = document_selector(&[Language::Json, Language::Rust]);
        let rendered: Vec<String> = selector
            .iter()
            .map(|filter| {
                filter
                    .language
                    .clone()
                    .or_else(|| filter.pattern.clone())
                    .unwrap_or_default()
            })
            .collect();

        assert_eq!(rendered, vec!["json", "jsonc", "rust", "**/*{.json}", "**/*{.rs}"]);
        assert!(selector.iter().all(|filter| filter.scheme == "file"));
    }

    #[test]
    fn test_registration_serializes_language_names() {
        let settings = Settings {
            priority: 3,
            ..Settings::default()
        };
        let registration = registration_for(&settings, &Options::new());
        let value = serde_json::to_value(&registration).unwrap();

        assert_eq!(value["priority"], json!(3));
        assert!(value["languages"].as_array().unwrap().contains(&json!("C++")));
        assert_eq!(value["selector"][0], json!({"language": "c", "scheme": "file"}));
    }

    #[tokio::test]
    async fn test_disabled_settings_skip_registration() {
        let settings = Settings {
            enabled: false,
            ..Settings::default()
        };
        assert!(activate(&settings, &LogNotifier).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_reads_project_config() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(".unibeautifyrc.json"), r#"{"Rust": false}"#).unwrap();
        let settings = Settings {
            project_path: Some(root.path().to_path_buf()),
            ..Settings::default()
        };

        let registration = activate(&settings, &LogNotifier).await.unwrap().unwrap();
        assert!(!registration.languages.contains(&Language::Rust));
        assert!(registration.languages.contains(&Language::Go));
    }
}
