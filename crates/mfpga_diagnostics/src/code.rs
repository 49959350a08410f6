//! Diagnostic codes with category prefixes.
//!
//! Placement codes live in the 300 range: `E301` unplaceable group, `E302`
//! unsupported architecture, `W301` cross-FPGA connection without a direct
//! link, `N301` placed group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Informational diagnostics, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `E301`, `W301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A group fits on no candidate FPGA.
    pub const UNPLACEABLE_GROUP: Self = Self::new(Category::Error, 301);
    /// No FPGA family is supported by every member of a group.
    pub const UNSUPPORTED_ARCHITECTURE: Self = Self::new(Category::Error, 302);
    /// A connection crosses FPGAs that share no direct link.
    pub const NO_DIRECT_LINK: Self = Self::new(Category::Warning, 301);
    /// A group was placed.
    pub const GROUP_PLACED: Self = Self::new(Category::Note, 301);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
