//! The analysis context.
//!
//! One `Analyzer` owns everything the resolvers read: the document store,
//! the parsed tree and the symbol index per uri. It is constructed once per
//! session and passed by reference into every provider; there is no ambient
//! global state.
//!
//! Per uri the lifecycle is absent → indexed, re-entering indexed on every
//! re-analysis (the tree and index are replaced wholesale) and dropping
//! back to absent on `remove`.

use fishls_binder::DocumentSymbolIndex;
use fishls_common::{DocumentStore, LspDocument};
use fishls_parser::{SyntaxTree, parse};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Default)]
pub struct Analyzer {
    documents: DocumentStore,
    trees: FxHashMap<String, SyntaxTree>,
    indexes: FxHashMap<String, DocumentSymbolIndex>,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer::default()
    }

    /// Parse and index `document`, replacing any previous analysis of the
    /// same uri.
    pub fn analyze(&mut self, document: LspDocument) {
        let uri = document.uri().to_string();
        let tree = parse(document.text());
        let index = DocumentSymbolIndex::build(&document, &tree);
        debug!(uri, symbols = index.len(), "analyzed document");
        if let Some(existing) = self.documents.get_mut(&uri) {
            *existing = document;
        } else {
            self.documents.open(document);
        }
        self.trees.insert(uri.clone(), tree);
        self.indexes.insert(uri, index);
    }

    /// Re-analyze an open document with new text.
    pub fn update(&mut self, uri: &str, text: impl Into<String>, version: i32) -> bool {
        let Some(document) = self.documents.get_mut(uri) else {
            return false;
        };
        document.update(text, version);
        let document = document.clone();
        self.analyze(document);
        true
    }

    /// Forget a document entirely.
    pub fn remove(&mut self, uri: &str) {
        self.documents.close(uri);
        self.trees.remove(uri);
        self.indexes.remove(uri);
    }

    pub fn document(&self, uri: &str) -> Option<&LspDocument> {
        self.documents.peek(uri)
    }

    pub fn tree(&self, uri: &str) -> Option<&SyntaxTree> {
        self.trees.get(uri)
    }

    pub fn index(&self, uri: &str) -> Option<&DocumentSymbolIndex> {
        self.indexes.get(uri)
    }

    /// Analyzed uris in lexicographic order. Workspace-wide scans iterate
    /// this so multi-file results are deterministic.
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.indexes.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
