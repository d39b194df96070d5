// ✍️ Author Entity - One row per distinct name
//
// "Author name is the logical key, the store id is the physical identity"
//
// Problem solved:
// - "Frank Herbert" referenced by five books → one author row, five references
// - Case variants ("frank herbert", "FRANK HERBERT") → same logical author
// - Books with no usable author data → the single "Unknown" sentinel row

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel author name used when a catalog record carries no usable author.
/// Subject to the same uniqueness rule as any other name: at most one row.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// ============================================================================
// AUTHOR ENTITY
// ============================================================================

/// A persisted author row.
///
/// Physical identity: `id`, assigned by the store on creation and used for
/// every book→author reference. Logical identity: `name`, unique across the
/// store case-insensitively. Rows are never updated or deleted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Surrogate id assigned by the store
    pub id: i64,

    /// Author name (non-empty, unique case-insensitively)
    pub name: String,

    /// Year of birth, if the catalog knew it
    pub birth_year: Option<i32>,

    /// Year of death; None means still alive (or unknown)
    pub death_year: Option<i32>,
}

impl Author {
    /// Logical equality is name-based, case-insensitive.
    ///
    /// Only for comparisons against candidate data; the book→author edge
    /// always uses the stored `id`, never a freshly constructed value.
    pub fn same_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this row is the "Unknown" sentinel.
    pub fn is_unknown(&self) -> bool {
        self.same_name(UNKNOWN_AUTHOR)
    }

    /// Alive in `year` means born on or before it and not yet dead:
    /// `birth_year <= year && (death_year >= year || death_year absent)`.
    /// Boundary years count as alive. No birth year → never reported alive.
    pub fn alive_in(&self, year: i32) -> bool {
        match self.birth_year {
            Some(birth) if birth <= year => match self.death_year {
                Some(death) => death >= year,
                None => true,
            },
            _ => false,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = match (self.birth_year, self.death_year) {
            (Some(b), Some(d)) => format!(" ({}-{})", b, d),
            (Some(b), None) => format!(" ({}-)", b),
            _ => String::new(),
        };
        write!(f, "{}{}", self.name, years)
    }
}

// ============================================================================
// TESTS
// ============================================================================
