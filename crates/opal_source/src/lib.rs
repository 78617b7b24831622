//! Source file management, span tracking, and the inclusion graph.
//!
//! This crate provides the [`SourceDb`] for loading and managing source files,
//! [`FileId`] and [`Span`] types for tracking source locations, and
//! [`ResolvedSpan`] for converting byte offsets to human-readable line/column
//! coordinates. The database also records which file included which
//! (`add_include`/`include_site`) and `#line`-style directives so diagnostics
//! can be reported against presumed paths.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::{LineDirective, SourceFile};
pub use span::Span;
