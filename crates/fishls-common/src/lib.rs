//! Common types and utilities for the fishls language engine.
//!
//! This crate provides foundational types used across all fishls crates:
//! - Source spans (`Span`) in byte offsets
//! - Position/Range/Location types for line/column source locations
//! - Line indexing (`LineMap`) for offset/position conversion
//! - The `LspDocument` model and fish autoload classification
//! - The `DocumentStore` keyed by uri

pub mod position;
pub use position::{LineMap, Location, Position, Range};

pub mod span;
pub use span::Span;

pub mod document;
pub use document::{AutoloadType, DocumentStore, LspDocument};
