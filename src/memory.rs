// In-memory catalog store
//
// Same contract and case-insensitive uniqueness semantics as the SQLite
// backend, held in lock-guarded vectors. Used by tests and by embedders
// that want the ingestion workflow without a database file.

use crate::entities::{Author, Book};
use crate::store::{CatalogStore, NewBook, StoreError};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    authors: Vec<Author>,
    books: Vec<Book>,
    next_author_id: i64,
    next_book_id: i64,
}

/// Catalog store keeping everything in process memory.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                authors: Vec::new(),
                books: Vec::new(),
                next_author_id: 1,
                next_book_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Failure("store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for MemoryStore {
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.authors.iter().find(|a| a.same_name(name)).cloned())
    }

    fn create_author(
        &self,
        name: &str,
        birth_year: Option<i32>,
        death_year: Option<i32>,
    ) -> Result<Author, StoreError> {
        let mut inner = self.lock()?;

        if inner.authors.iter().any(|a| a.same_name(name)) {
            return Err(StoreError::Conflict(name.to_string()));
        }

        let author = Author {
            id: inner.next_author_id,
            name: name.to_string(),
            birth_year,
            death_year,
        };
        inner.next_author_id += 1;
        inner.authors.push(author.clone());

        Ok(author)
    }

    fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.books.iter().find(|b| b.same_title(title)).cloned())
    }

    fn create_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let mut inner = self.lock()?;

        if inner.books.iter().any(|b| b.same_title(&book.title)) {
            return Err(StoreError::Conflict(book.title.clone()));
        }

        // The reference must point at a persisted author row
        let author = inner
            .authors
            .iter()
            .find(|a| a.id == book.author_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Failure(format!("no author with id {}", book.author_id))
            })?;

        let stored = Book {
            id: inner.next_book_id,
            catalog_id: book.catalog_id,
            title: book.title.clone(),
            author,
            languages: book.languages.clone(),
            download_count: book.download_count,
        };
        inner.next_book_id += 1;
        inner.books.push(stored.clone());

        Ok(stored)
    }

    fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let inner = self.lock()?;
        let mut books = inner.books.clone();
        books.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        Ok(books)
    }

    fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        let inner = self.lock()?;
        let mut authors = inner.authors.clone();
        authors.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(authors)
    }

    fn list_authors_alive_in(&self, year: i32) -> Result<Vec<Author>, StoreError> {
        Ok(self
            .list_authors()?
            .into_iter()
            .filter(|a| a.alive_in(year))
            .collect())
    }

    fn list_books_by_language(&self, code: &str) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .list_books()?
            .into_iter()
            .filter(|b| b.in_language(code))
            .collect())
    }
}
