// 🗄️ Catalog Store Contract - persistence seam for books and authors
//
// The ingestion core is storage-backend-agnostic: it talks to this trait
// only. Two implementations ship with the crate (SQLite in db.rs, in-memory
// in memory.rs). Correctness under concurrent ingestion depends on the
// backend enforcing the two case-insensitive uniqueness constraints
// (author name, book title) and reporting violations as `Conflict`.

use crate::entities::{Author, Book};
use thiserror::Error;

// ============================================================================
// STORE ERRORS
// ============================================================================

/// Failures a store implementation may report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A create hit the case-insensitive uniqueness constraint: another
    /// writer owns (or just created) the same logical entity. Expected
    /// during concurrent ingestion; callers recover, they do not retry.
    #[error("uniqueness conflict: {0}")]
    Conflict(String),

    /// Any other backend failure (connectivity, corruption, unrelated
    /// constraint). Propagated unchanged to the caller.
    #[error("store failure: {0}")]
    Failure(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

// ============================================================================
// INSERT SHAPES
// ============================================================================

/// Data for a book insert. The author must already be persisted; the store
/// records the reference by `author_id`.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub catalog_id: Option<i64>,
    pub title: String,
    pub author_id: i64,
    pub languages: Vec<String>,
    pub download_count: Option<i64>,
}

// ============================================================================
// CATALOG STORE TRAIT
// ============================================================================

/// Persistence operations the ingestion core relies on.
///
/// All name/title lookups are exact case-insensitive matches. The create
/// calls return the persisted row (with its store-assigned id) on success
/// and `StoreError::Conflict` exactly when the uniqueness constraint fires.
pub trait CatalogStore {
    /// Find an author by case-insensitive exact name match.
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>, StoreError>;

    /// Create an author row. `Conflict` if the name already exists.
    fn create_author(
        &self,
        name: &str,
        birth_year: Option<i32>,
        death_year: Option<i32>,
    ) -> Result<Author, StoreError>;

    /// Find a book by case-insensitive exact title match.
    fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StoreError>;

    /// Create a book row referencing a persisted author.
    /// `Conflict` if the title already exists.
    fn create_book(&self, book: &NewBook) -> Result<Book, StoreError>;

    /// All books, with resolved authors attached (reporting only).
    fn list_books(&self) -> Result<Vec<Book>, StoreError>;

    /// All authors, ordered by name.
    fn list_authors(&self) -> Result<Vec<Author>, StoreError>;

    /// Authors alive in `year`: born on or before it, died on or after it
    /// (or not at all). Authors without a birth year are excluded.
    fn list_authors_alive_in(&self, year: i32) -> Result<Vec<Author>, StoreError>;

    /// Books listing the given 2-letter language code.
    fn list_books_by_language(&self, code: &str) -> Result<Vec<Book>, StoreError>;
}
