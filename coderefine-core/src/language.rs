//! Languages the backend understands, and the file-extension table used to
//! guess one from an uploaded file name.

use std::fmt;
use std::path::Path;

/// A source language as named on the wire (`"python"`, `"cpp"`, ...).
///
/// `Other` keeps names the backend returns that this client has no entry for,
/// so a stored review in an unknown language still round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    Java,
    Cpp,
    C,
    Html,
    Css,
    Go,
    Rust,
    TypeScript,
    Other(String),
}

/// Languages offered by the review workspace selector.
pub const REVIEW_LANGUAGES: &[Language] = &[
    Language::Python,
    Language::JavaScript,
    Language::Java,
    Language::Cpp,
    Language::C,
    Language::Html,
    Language::Css,
];

/// Targets offered by the converter workspace selector.
pub const CONVERT_TARGETS: &[Language] = &[
    Language::Python,
    Language::JavaScript,
    Language::Java,
    Language::Cpp,
    Language::C,
    Language::Go,
    Language::Rust,
    Language::TypeScript,
];

/// Extension table for uploads. Anything not listed is a "no match".
const EXTENSION_TABLE: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::JavaScript),
    ("tsx", Language::JavaScript),
    ("java", Language::Java),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("hpp", Language::Cpp),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("css", Language::Css),
];

impl Language {
    /// Parses a wire name. Never fails: unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "python" => Language::Python,
            "javascript" => Language::JavaScript,
            "java" => Language::Java,
            "cpp" | "c++" => Language::Cpp,
            "c" => Language::C,
            "html" => Language::Html,
            "css" => Language::Css,
            "go" => Language::Go,
            "rust" => Language::Rust,
            "typescript" => Language::TypeScript,
            other => Language::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Html => "html",
            Language::Css => "css",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::Other(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::TypeScript => "TypeScript",
            Language::Other(name) => name,
        }
    }

    /// Conventional file extension, `txt` when there is none.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Html => "html",
            Language::Css => "css",
            Language::Go => "go",
            Language::Rust => "rs",
            Language::TypeScript => "ts",
            Language::Other(_) => "txt",
        }
    }

    /// Next entry of `list` after `self`, wrapping. Starts at the head when
    /// `self` is not in the list.
    pub fn next_in(&self, list: &[Language]) -> Language {
        match list.iter().position(|l| l == self) {
            Some(i) => list[(i + 1) % list.len()].clone(),
            None => list.first().cloned().unwrap_or_else(|| self.clone()),
        }
    }

    /// Previous entry of `list` before `self`, wrapping.
    pub fn prev_in(&self, list: &[Language]) -> Language {
        match list.iter().position(|l| l == self) {
            Some(i) => list[(i + list.len() - 1) % list.len()].clone(),
            None => list.last().cloned().unwrap_or_else(|| self.clone()),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Python
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up `ext` (without the dot, any case) in the upload extension table.
pub fn language_for_extension(ext: &str) -> Option<Language> {
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| lang.clone())
}

/// Guesses a language from a file name or path.
pub fn language_for_path(path: impl AsRef<Path>) -> Option<Language> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table_matches_upload_rules() {
        assert_eq!(language_for_path("module.ts"), Some(Language::JavaScript));
        assert_eq!(language_for_path("App.TSX"), Some(Language::JavaScript));
        assert_eq!(language_for_path("x.py"), Some(Language::Python));
        assert_eq!(language_for_path("Main.java"), Some(Language::Java));
        assert_eq!(language_for_path("a/b/util.h"), Some(Language::C));
        assert_eq!(language_for_path("vec.hpp"), Some(Language::Cpp));
        assert_eq!(language_for_path("lib.cc"), Some(Language::Cpp));
        assert_eq!(language_for_path("index.htm"), Some(Language::Html));
        assert_eq!(language_for_path("site.css"), Some(Language::Css));
    }

    #[test]
    fn unknown_extensions_have_no_match() {
        assert_eq!(language_for_path("main.rs"), None);
        assert_eq!(language_for_path("Makefile"), None);
        assert_eq!(language_for_extension("go"), None);
    }

    #[test]
    fn wire_names_round_trip() {
        for lang in REVIEW_LANGUAGES.iter().chain(CONVERT_TARGETS) {
            assert_eq!(&Language::from_name(lang.as_str()), lang);
        }
        let other = Language::from_name("kotlin");
        assert_eq!(other, Language::Other("kotlin".into()));
        assert_eq!(other.file_extension(), "txt");
    }

    #[test]
    fn selector_cycling_wraps() {
        assert_eq!(Language::Css.next_in(REVIEW_LANGUAGES), Language::Python);
        assert_eq!(Language::Python.prev_in(REVIEW_LANGUAGES), Language::Css);
        assert_eq!(Language::Go.next_in(REVIEW_LANGUAGES), Language::Python);
    }
}
