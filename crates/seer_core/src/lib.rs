//! Provide the canonical Python vocabulary used across the seer workspace.
//!
//! This crate is intentionally small and dependency-free. The tokenizer, the grammar loader and the
//! completion engine all agree on keyword and operator spellings by going through the registries here
//! instead of comparing raw strings.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no syntax-tree types.

pub mod lang;
