//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one `blockfall::{core,adapter,types}`
//! namespace; the implementation lives in dedicated crates under `crates/`.

pub use blockfall_adapter as adapter;
pub use blockfall_core as core;
pub use blockfall_types as types;
