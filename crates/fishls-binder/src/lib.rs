//! Symbol extraction for fish documents.
//!
//! This crate turns a parsed tree into the nested symbol forest the
//! resolvers and the editor features consume:
//! - the symbol model (`FishSymbol`, `FishKind`, `DefinitionScope`)
//! - scope-tag determination from flags and autoload classification
//! - the symbol tree builder walking one document
//! - `DocumentSymbolIndex`, the per-document query surface

pub mod symbol;
pub use symbol::{
    DefinitionScope, FishKind, FishSymbol, ScopeTag, SymbolArena, SymbolId, SymbolKind,
};

pub mod scope;

pub mod builder;
pub use builder::{SymbolForest, build_symbols};

pub mod index;
pub use index::DocumentSymbolIndex;
