//! Python language vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `OperatorId`) and look up spellings and metadata
//! via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no tree types, no IO, no side effects.
//! - The tokenizer and parser enforce syntax; registries only provide spellings and metadata.
//!
//! ## Examples
//! ```rust
//! use seer_core::lang::keywords::{self, KeywordId};
//! use seer_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(keywords::from_str("lambda"), Some(KeywordId::Lambda));
//! assert_eq!(operators::as_str(OperatorId::DoubleStarEqual), "**=");
//! ```

pub mod keywords;
pub mod operators;
pub mod registry;
