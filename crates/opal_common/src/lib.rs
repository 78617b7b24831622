//! Shared foundational types used across the Opal compiler front-end.
//!
//! This crate provides core types including interned identifiers and the
//! common result types distinguishing internal compiler errors from
//! user-facing diagnostics.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, OpalResult};
