//! Document model and workspace document storage.
//!
//! An `LspDocument` owns the text of one fish file plus the derived line
//! index. The autoload classification is computed from the uri path and
//! drives the default scope rules in the binder: files under `conf.d/` and
//! `config.fish` are loaded on shell startup, files under `functions/` are
//! loaded on demand by name, and anything else is an ordinary script.

use crate::position::{LineMap, Position, Range};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How (or whether) the shell loads this file automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoloadType {
    /// `conf.d/*.fish`, sourced on startup.
    Conf,
    /// `config.fish`, sourced on startup.
    Config,
    /// `functions/<name>.fish`, loaded on demand by function name.
    Functions,
    /// `completions/<name>.fish`.
    Completions,
    /// Any other fish script.
    Script,
}

impl AutoloadType {
    pub fn from_uri(uri: &str) -> Self {
        let mut parts = uri.rsplit('/');
        let file = parts.next().unwrap_or_default();
        let dir = parts.next().unwrap_or_default();
        if file == "config.fish" {
            AutoloadType::Config
        } else if dir == "conf.d" {
            AutoloadType::Conf
        } else if dir == "functions" {
            AutoloadType::Functions
        } else if dir == "completions" {
            AutoloadType::Completions
        } else {
            AutoloadType::Script
        }
    }
}

/// One open (or indexed) fish document.
#[derive(Debug, Clone)]
pub struct LspDocument {
    uri: String,
    text: String,
    version: i32,
    line_map: LineMap,
    autoload: AutoloadType,
}

impl LspDocument {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_version(uri, text, 0)
    }

    pub fn with_version(uri: impl Into<String>, text: impl Into<String>, version: i32) -> Self {
        let uri = uri.into();
        let text = text.into();
        let line_map = LineMap::new(&text);
        let autoload = AutoloadType::from_uri(&uri);
        LspDocument {
            uri,
            text,
            version,
            line_map,
            autoload,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn line_count(&self) -> u32 {
        self.line_map.line_count()
    }

    /// Text inside `range`, or the whole document when `range` is `None`.
    pub fn get_text(&self, range: Option<Range>) -> &str {
        match range {
            None => &self.text,
            Some(range) => {
                let start = self.offset_at(range.start).unwrap_or(0) as usize;
                let end = self
                    .offset_at(range.end)
                    .map(|o| o as usize)
                    .unwrap_or(self.text.len())
                    .min(self.text.len());
                &self.text[start.min(end)..end]
            }
        }
    }

    pub fn position_at(&self, offset: u32) -> Position {
        self.line_map.position_at(offset)
    }

    pub fn offset_at(&self, position: Position) -> Option<u32> {
        self.line_map.offset_at(position)
    }

    /// Replace the full document text, bumping the version. Edits always
    /// rebuild the line index; symbol indexes are rebuilt by the caller.
    pub fn update(&mut self, text: impl Into<String>, version: i32) {
        self.text = text.into();
        self.version = version;
        self.line_map = LineMap::new(&self.text);
    }

    pub fn autoload_type(&self) -> AutoloadType {
        self.autoload
    }

    /// True for files the shell loads without an explicit `source`.
    pub fn is_autoloaded(&self) -> bool {
        !matches!(self.autoload, AutoloadType::Script)
    }

    pub fn is_config_file(&self) -> bool {
        matches!(self.autoload, AutoloadType::Config | AutoloadType::Conf)
    }

    pub fn is_autoloaded_function_file(&self) -> bool {
        matches!(self.autoload, AutoloadType::Functions)
    }

    pub fn is_plain_script(&self) -> bool {
        matches!(self.autoload, AutoloadType::Script)
    }

    /// The `<name>` from `functions/<name>.fish`, or the file stem for
    /// other paths. Used to decide whether a function definition matches
    /// its autoload file name.
    pub fn autoload_name(&self) -> &str {
        let file = self.uri.rsplit('/').next().unwrap_or_default();
        file.strip_suffix(".fish").unwrap_or(file)
    }
}

/// All documents known to the workspace, keyed by uri. Lookup refreshes a
/// most-recently-used ordering so callers can iterate hot documents first.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: FxHashMap<String, LspDocument>,
    recent: Vec<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore::default()
    }

    pub fn open(&mut self, document: LspDocument) -> bool {
        let uri = document.uri().to_string();
        if self.documents.contains_key(&uri) {
            return false;
        }
        self.documents.insert(uri.clone(), document);
        self.recent.insert(0, uri);
        true
    }

    pub fn get(&mut self, uri: &str) -> Option<&LspDocument> {
        if !self.documents.contains_key(uri) {
            return None;
        }
        if self.recent.first().map(|u| u.as_str()) != Some(uri) {
            self.recent.retain(|u| u != uri);
            self.recent.insert(0, uri.to_string());
        }
        self.documents.get(uri)
    }

    /// Read-only lookup that leaves the recency order alone.
    pub fn peek(&self, uri: &str) -> Option<&LspDocument> {
        self.documents.get(uri)
    }

    pub fn get_mut(&mut self, uri: &str) -> Option<&mut LspDocument> {
        self.documents.get_mut(uri)
    }

    pub fn close(&mut self, uri: &str) -> Option<LspDocument> {
        self.recent.retain(|u| u != uri);
        self.documents.remove(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    /// Uris ordered by most recent access.
    pub fn files(&self) -> &[String] {
        &self.recent
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LspDocument)> {
        self.documents.iter().map(|(uri, doc)| (uri.as_str(), doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoload_classification_from_uri() {
        let cases = [
            ("file:///home/u/.config/fish/config.fish", AutoloadType::Config),
            ("file:///home/u/.config/fish/conf.d/venv.fish", AutoloadType::Conf),
            (
                "file:///home/u/.config/fish/functions/fish_prompt.fish",
                AutoloadType::Functions,
            ),
            (
                "file:///home/u/.config/fish/completions/git.fish",
                AutoloadType::Completions,
            ),
            ("file:///tmp/deploy.fish", AutoloadType::Script),
        ];
        for (uri, expected) in cases {
            assert_eq!(AutoloadType::from_uri(uri), expected, "{uri}");
        }
    }

    #[test]
    fn autoload_name_is_the_file_stem() {
        let doc = LspDocument::new("file:///f/functions/fish_greeting.fish", "");
        assert_eq!(doc.autoload_name(), "fish_greeting");
        assert!(doc.is_autoloaded_function_file());
    }

    #[test]
    fn store_tracks_recency() {
        let mut store = DocumentStore::new();
        store.open(LspDocument::new("file:///a.fish", "set -l a 1"));
        store.open(LspDocument::new("file:///b.fish", "set -l b 2"));
        assert_eq!(store.files(), ["file:///b.fish", "file:///a.fish"]);
        store.get("file:///a.fish");
        assert_eq!(store.files(), ["file:///a.fish", "file:///b.fish"]);
        store.close("file:///b.fish");
        assert_eq!(store.files(), ["file:///a.fish"]);
    }
}
