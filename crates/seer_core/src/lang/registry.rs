//! Shareable metadata for `seer_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.

use std::fmt;

/// Python version that introduced a vocabulary item, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use seer_core::lang::registry::Since;
///
/// assert!(Since(3, 0) > Since(2, 7));
/// assert_eq!(Since(3, 5).to_string(), "3.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u8, pub u8);

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}
