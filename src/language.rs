use serde::{Deserialize, Serialize};
use std::path::Path;

/// Languages known to the beautifier
///
/// Each variant carries the beautifier-facing language name, the file
/// extensions it claims and the editor language ids that map onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    C,
    Cpp,
    CSharp,
    Css,
    Go,
    Html,
    Java,
    JavaScript,
    Json,
    Jsx,
    Less,
    Markdown,
    Php,
    Python,
    Ruby,
    Rust,
    Scss,
    Sql,
    Tsx,
    TypeScript,
    Vue,
    Xml,
    Yaml,
}

const ALL: &[Language] = &[
    Language::C,
    Language::Cpp,
    Language::CSharp,
    Language::Css,
    Language::Go,
    Language::Html,
    Language::Java,
    Language::JavaScript,
    Language::Json,
    Language::Jsx,
    Language::Less,
    Language::Markdown,
    Language::Php,
    Language::Python,
    Language::Ruby,
    Language::Rust,
    Language::Scss,
    Language::Sql,
    Language::Tsx,
    Language::TypeScript,
    Language::Vue,
    Language::Xml,
    Language::Yaml,
];

impl Language {
    /// Every supported language, in table order
    pub fn all() -> &'static [Language] {
        ALL
    }

    /// File extensions associated with this language (without the dot)
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hxx", "hh"],
            Language::CSharp => &["cs"],
            Language::Css => &["css"],
            Language::Go => &["go"],
            Language::Html => &["html", "htm"],
            Language::Java => &["java"],
            Language::JavaScript => &["js", "mjs", "cjs"],
            Language::Json => &["json"],
            Language::Jsx => &["jsx"],
            Language::Less => &["less"],
            Language::Markdown => &["md", "markdown"],
            Language::Php => &["php"],
            Language::Python => &["py", "pyi"],
            Language::Ruby => &["rb"],
            Language::Rust => &["rs"],
            Language::Scss => &["scss"],
            Language::Sql => &["sql"],
            Language::Tsx => &["tsx"],
            Language::TypeScript => &["ts"],
            Language::Vue => &["vue"],
            Language::Xml => &["xml"],
            Language::Yaml => &["yaml", "yml"],
        }
    }

    /// Editor language ids handled by this language
    pub fn editor_ids(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["c"],
            Language::Cpp => &["cpp"],
            Language::CSharp => &["csharp"],
            Language::Css => &["css"],
            Language::Go => &["go"],
            Language::Html => &["html"],
            Language::Java => &["java"],
            Language::JavaScript => &["javascript"],
            Language::Json => &["json", "jsonc"],
            Language::Jsx => &["javascriptreact"],
            Language::Less => &["less"],
            Language::Markdown => &["markdown"],
            Language::Php => &["php"],
            Language::Python => &["python"],
            Language::Ruby => &["ruby"],
            Language::Rust => &["rust"],
            Language::Scss => &["scss"],
            Language::Sql => &["sql"],
            Language::Tsx => &["typescriptreact"],
            Language::TypeScript => &["typescript"],
            Language::Vue => &["vue"],
            Language::Xml => &["xml"],
            Language::Yaml => &["yaml"],
        }
    }

    /// Name the beautifier knows this language by; also the key of its
    /// entry in the options mapping
    pub fn name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Css => "CSS",
            Language::Go => "Go",
            Language::Html => "HTML",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Json => "JSON",
            Language::Jsx => "JSX",
            Language::Less => "LESS",
            Language::Markdown => "Markdown",
            Language::Php => "PHP",
            Language::Python => "Python",
            Language::Ruby => "Ruby",
            Language::Rust => "Rust",
            Language::Scss => "SCSS",
            Language::Sql => "SQL",
            Language::Tsx => "TSX",
            Language::TypeScript => "TypeScript",
            Language::Vue => "Vue",
            Language::Xml => "XML",
            Language::Yaml => "YAML",
        }
    }

    /// Brace-list glob matching this language's files, e.g. `**/*{.ts}`
    ///
    /// `None` for languages without extensions.
    pub fn extension_pattern(&self) -> Option<String> {
        let extensions = self.extensions();
        if extensions.is_empty() {
            return None;
        }
        let dotted: Vec<String> = extensions.iter().map(|ext| format!(".{}", ext)).collect();
        Some(format!("**/*{{{}}}", dotted.join(",")))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Languages whose editor ids include `editor_id`, in table order
pub fn find_languages(editor_id: &str) -> Vec<Language> {
    ALL.iter()
        .copied()
        .filter(|language| language.editor_ids().contains(&editor_id))
        .collect()
}

/// Detect the language from a file path's extension
///
/// # Examples
/// ```
/// use unibeautify_edits::{Language, detect_language};
/// assert_eq!(detect_language("main.rs"), Some(Language::Rust));
/// assert_eq!(detect_language("header.hpp"), Some(Language::Cpp));
/// assert_eq!(detect_language("unknown.xyz"), None);
/// ```
pub fn detect_language<P: AsRef<Path>>(path: P) -> Option<Language> {
    let extension = path.as_ref().extension()?.to_str()?;
    ALL.iter()
        .copied()
        .find(|language| language.extensions().contains(&extension))
}
