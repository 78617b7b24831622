//! Diagnostics for the Opal compiler front-end.
//!
//! Compiler phases report problems through a [`DiagnosticsEngine`]. Each
//! diagnostic is registered once in a [`Catalog`] with a message template, a
//! class, a default severity, and an optional user-controllable group. At
//! report time the engine resolves the effective severity from the catalog
//! default, project configuration, and any source pragmas active at the
//! report location, then hands surviving diagnostics to a pluggable
//! [`DiagnosticConsumer`].
//!
//! ```
//! use opal_diagnostics::{
//!     Catalog, Descriptor, DiagnosticsEngine, DiagnosticSink, Severity,
//! };
//! use opal_common::Interner;
//! use opal_source::{SourceDb, Span};
//! use std::sync::Arc;
//!
//! let mut catalog = Catalog::new();
//! let unused = catalog.register(Descriptor::warning("unused variable %0", "unused"));
//!
//! let sink = Arc::new(DiagnosticSink::new());
//! let mut engine = DiagnosticsEngine::new(
//!     Arc::new(catalog),
//!     Arc::new(Interner::new()),
//!     Box::new(Arc::clone(&sink)),
//! );
//!
//! let mut db = SourceDb::new();
//! let file = db.add_source("main.op", "let x = 1;\n".to_string());
//! engine.report(&db, unused, Span::new(file, 4, 5)).arg("x").emit();
//!
//! let diags = sink.diagnostics();
//! assert_eq!(diags[0].level, Severity::Warning);
//! assert_eq!(diags[0].message, "unused variable x");
//! ```

#![warn(missing_docs)]

pub mod arg;
pub mod builder;
pub mod catalog;
pub mod consumer;
pub mod diagnostic;
pub mod engine;
pub mod fixit;
pub mod format;
pub mod mapping;
pub mod severity;
pub mod sink;
pub mod state;
pub mod storage;
pub mod stored;
pub mod suppression;

pub use arg::{ArgRenderer, DiagArg, DummyArgRenderer, OpaqueArg, TokenKind};
pub use builder::DiagnosticBuilder;
pub use catalog::{builtin, Catalog, Descriptor, DiagClass, DiagnosticId, Flavor};
pub use consumer::{DiagnosticConsumer, ForwardingConsumer, IgnoringConsumer};
pub use diagnostic::Diagnostic;
pub use engine::{DiagnosticsEngine, ErrorTrap};
pub use fixit::FixItHint;
pub use format::{escape_bytes, escape_string, FormatContext};
pub use mapping::DiagnosticMapping;
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use stored::StoredDiagnostic;
pub use suppression::{parse_suppressions, SuppressionMapping, SuppressionParseError};
