//! ember-util - Foundation types shared by the interpreter crates.
//!
//! This crate provides the typed index vector used for the evaluator's
//! environment arena, plus re-exports of the hash map types used
//! throughout the workspace.

pub mod index_vec;

pub use index_vec::{Idx, IndexVec};

// Re-export commonly used types
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
