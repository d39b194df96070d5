// Author Resolver - find-or-create with concurrent-create recovery
//
// Two resolution attempts for the same new name may interleave between the
// lookup and the create. The store's uniqueness constraint picks the winner;
// the loser sees `Conflict`, re-queries once, and returns the winner's row.
// Both callers end up holding the same persisted author.

use crate::catalog::PrimaryAuthor;
use crate::entities::Author;
use crate::store::{CatalogStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The create reported a name conflict but the follow-up query found
    /// no row. The store is inconsistent; fatal for this call, not retried.
    #[error("author '{0}' conflicted on create but cannot be found")]
    ConflictUnresolved(String),

    /// Any store failure other than the expected create conflict.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves candidate authors to persisted rows, creating them on first use.
pub struct AuthorResolver<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> AuthorResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        AuthorResolver { store }
    }

    /// Map a primary author to the single persisted row for its name.
    ///
    /// If the name already exists, the stored row wins and the candidate's
    /// years are discarded: the store is the source of truth once an author
    /// exists. Exactly one retry path exists (re-query after a create
    /// conflict); everything else propagates.
    pub fn resolve(&self, candidate: &PrimaryAuthor) -> Result<Author, ResolveError> {
        if let Some(existing) = self.store.find_author_by_name(&candidate.name)? {
            return Ok(existing);
        }

        match self.store.create_author(
            &candidate.name,
            candidate.birth_year,
            candidate.death_year,
        ) {
            Ok(created) => Ok(created),
            Err(StoreError::Conflict(_)) => {
                // Lost the create race; the winner's row must be there now
                self.store
                    .find_author_by_name(&candidate.name)?
                    .ok_or_else(|| ResolveError::ConflictUnresolved(candidate.name.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
