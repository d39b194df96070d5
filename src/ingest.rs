// Book Ingestor - one logical unit of work per user-selected candidate
//
// Flow: duplicate-title check → primary-author resolution → book persist.
// The check-then-write sequence is best-effort, not transactional: a title
// that passes the up-front check can still collide at write time when a
// concurrent ingest wins the race, so that outcome (`ConflictDuplicate`)
// stays distinguishable from a duplicate caught up front (`AlreadyExists`).

use crate::catalog::CandidateBook;
use crate::entities::Book;
use crate::resolver::{AuthorResolver, ResolveError};
use crate::store::{CatalogStore, NewBook, StoreError};
use thiserror::Error;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Terminal outcome of one ingest call. All three variants are normal
/// results reported to the user, not errors.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Book persisted; carries the stored row with its resolved author.
    Created(Book),

    /// The title was already registered when the call started.
    AlreadyExists(String),

    /// The title was free at check time but taken by a concurrent ingest
    /// before our write landed.
    ConflictDuplicate(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Blank or malformed candidate, rejected before any store interaction.
    #[error("invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Author resolution hit the fatal conflict-then-missing inconsistency.
    #[error("author conflict unresolved for '{0}'")]
    AuthorConflictUnresolved(String),

    /// Store failure outside the expected duplicate cases, propagated as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ResolveError> for IngestError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::ConflictUnresolved(name) => IngestError::AuthorConflictUnresolved(name),
            ResolveError::Store(e) => IngestError::Store(e),
        }
    }
}

// ============================================================================
// BOOK INGESTOR
// ============================================================================

/// Orchestrates duplicate checking, author resolution, and book persistence.
pub struct BookIngestor<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> BookIngestor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        BookIngestor { store }
    }

    /// Ingest one user-selected candidate record.
    ///
    /// A book is never persisted without a resolved author, and nothing is
    /// ever partially committed: every exit path leaves the store either
    /// untouched or holding the complete book–author association (the
    /// author row alone is a valid final state, shared with future books).
    pub fn ingest(&self, candidate: &CandidateBook) -> Result<IngestOutcome, IngestError> {
        let title = candidate.title.trim();
        if title.is_empty() {
            return Err(IngestError::InvalidCandidate(
                "candidate has an empty title".to_string(),
            ));
        }

        // 1. Duplicate check
        if let Some(existing) = self.store.find_book_by_title(title)? {
            return Ok(IngestOutcome::AlreadyExists(existing.title));
        }

        // 2. Author resolution
        let primary = candidate.primary_author();
        let author = AuthorResolver::new(self.store).resolve(&primary)?;

        // 3. Persist the book referencing the stored author row
        let new_book = NewBook {
            catalog_id: candidate.catalog_id,
            title: title.to_string(),
            author_id: author.id,
            languages: candidate.languages.clone(),
            download_count: candidate.download_count,
        };

        match self.store.create_book(&new_book) {
            Ok(book) => Ok(IngestOutcome::Created(book)),
            // Raced with another ingest of the same title between the
            // check and the write
            Err(StoreError::Conflict(_)) => {
                Ok(IngestOutcome::ConflictDuplicate(title.to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
