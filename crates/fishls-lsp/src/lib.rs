//! Workspace services for the fishls engine.
//!
//! This crate provides the editor-facing query layer:
//! - the `Analyzer` context owning documents, trees, and symbol indexes
//! - reference resolution (go to definition)
//! - find references and rename
//! - cross-file resolution over `source` edges
//! - workspace symbol search, document outline, folding ranges

pub mod analyzer;
pub use analyzer::Analyzer;

pub mod cancellation;
pub use cancellation::CancellationToken;

pub mod resolver;
pub use resolver::{Resolver, SymbolRef};

pub mod source;
pub use source::{
    SourceResource, collect_source_resources, reachable_sources, sources_visible_at,
    sourcing_documents, symbols_from_resource,
};

pub mod references;
pub use references::FindReferences;

pub mod rename;
pub use rename::RenameProvider;

pub mod workspace_symbols;
pub use workspace_symbols::{WorkspaceSymbol, WorkspaceSymbolsProvider};

pub mod document_symbols;
pub use document_symbols::{DocumentSymbol, DocumentSymbolsProvider, FoldingRange};
