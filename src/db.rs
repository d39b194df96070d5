// SQLite implementation of the catalog store
//
// Uniqueness is the backbone of the ingestion workflow: both natural keys
// (author name, book title) carry UNIQUE COLLATE NOCASE constraints, so
// concurrent writers racing on the same logical entity are serialized by
// the database, and the loser sees a constraint violation we surface as
// `StoreError::Conflict`.

use crate::entities::{Author, Book};
use crate::store::{CatalogStore, NewBook, StoreError};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Authors Table - one row per case-insensitive name (including "Unknown")
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE COLLATE NOCASE NOT NULL,
            birth_year INTEGER,
            death_year INTEGER
        )",
        [],
    )?;

    // ==========================================================================
    // Books Table - title is the duplicate guard; languages stored as JSON
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            catalog_id INTEGER,
            title TEXT UNIQUE COLLATE NOCASE NOT NULL,
            author_id INTEGER NOT NULL REFERENCES authors(id),
            languages TEXT NOT NULL DEFAULT '[]',
            download_count INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Catalog store backed by a rusqlite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// In-memory database, mainly for tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    fn author_from_row(row: &Row) -> rusqlite::Result<Author> {
        Ok(Author {
            id: row.get(0)?,
            name: row.get(1)?,
            birth_year: row.get(2)?,
            death_year: row.get(3)?,
        })
    }

    // Column order: b.id, b.catalog_id, b.title, b.languages,
    // b.download_count, a.id, a.name, a.birth_year, a.death_year
    fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
        let languages_json: String = row.get(3)?;
        let languages: Vec<String> = serde_json::from_str(&languages_json).unwrap_or_default();

        Ok(Book {
            id: row.get(0)?,
            catalog_id: row.get(1)?,
            title: row.get(2)?,
            languages,
            download_count: row.get(4)?,
            author: Author {
                id: row.get(5)?,
                name: row.get(6)?,
                birth_year: row.get(7)?,
                death_year: row.get(8)?,
            },
        })
    }
}

const BOOK_SELECT: &str = "SELECT b.id, b.catalog_id, b.title, b.languages, b.download_count,
            a.id, a.name, a.birth_year, a.death_year
     FROM books b JOIN authors a ON a.id = b.author_id";

/// Map an insert error: a violated UNIQUE constraint is the expected
/// concurrent-duplicate signal; anything else (including an unrelated
/// constraint) is a plain store failure.
fn map_insert_error(err: rusqlite::Error, what: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::Conflict(what.to_string())
        }
        other => StoreError::Failure(other.to_string()),
    }
}

fn map_query_error(err: rusqlite::Error) -> StoreError {
    StoreError::Failure(err.to_string())
}

impl CatalogStore for SqliteStore {
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, birth_year, death_year FROM authors
                 WHERE name = ?1 COLLATE NOCASE",
                params![name],
                Self::author_from_row,
            )
            .optional()
            .map_err(map_query_error)
    }

    fn create_author(
        &self,
        name: &str,
        birth_year: Option<i32>,
        death_year: Option<i32>,
    ) -> Result<Author, StoreError> {
        self.conn
            .execute(
                "INSERT INTO authors (name, birth_year, death_year) VALUES (?1, ?2, ?3)",
                params![name, birth_year, death_year],
            )
            .map_err(|e| map_insert_error(e, name))?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            birth_year,
            death_year,
        })
    }

    fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StoreError> {
        self.conn
            .query_row(
                &format!("{} WHERE b.title = ?1 COLLATE NOCASE", BOOK_SELECT),
                params![title],
                Self::book_from_row,
            )
            .optional()
            .map_err(map_query_error)
    }

    fn create_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        let languages_json = serde_json::to_string(&book.languages)
            .map_err(|e| StoreError::Failure(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO books (catalog_id, title, author_id, languages, download_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    book.catalog_id,
                    book.title,
                    book.author_id,
                    languages_json,
                    book.download_count,
                ],
            )
            .map_err(|e| map_insert_error(e, &book.title))?;

        let id = self.conn.last_insert_rowid();

        // Re-read through the join so the caller gets the stored author row
        self.find_book_by_title(&book.title)?
            .filter(|b| b.id == id)
            .ok_or_else(|| StoreError::Failure(format!("book {} vanished after insert", id)))
    }

    fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY b.title", BOOK_SELECT))
            .map_err(map_query_error)?;

        let books = stmt
            .query_map([], Self::book_from_row)
            .map_err(map_query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_query_error)?;

        Ok(books)
    }

    fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, birth_year, death_year FROM authors
                 ORDER BY name",
            )
            .map_err(map_query_error)?;

        let authors = stmt
            .query_map([], Self::author_from_row)
            .map_err(map_query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_query_error)?;

        Ok(authors)
    }

    fn list_authors_alive_in(&self, year: i32) -> Result<Vec<Author>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, birth_year, death_year FROM authors
                 WHERE birth_year IS NOT NULL
                   AND birth_year <= ?1
                   AND (death_year IS NULL OR death_year >= ?1)
                 ORDER BY name",
            )
            .map_err(map_query_error)?;

        let authors = stmt
            .query_map(params![year], Self::author_from_row)
            .map_err(map_query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_query_error)?;

        Ok(authors)
    }

    fn list_books_by_language(&self, code: &str) -> Result<Vec<Book>, StoreError> {
        // Languages live in a JSON array column; compare against each
        // element exactly so pattern characters in the input stay literal.
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE EXISTS (
                    SELECT 1 FROM json_each(b.languages)
                    WHERE json_each.value = ?1 COLLATE NOCASE
                 ) ORDER BY b.title",
                BOOK_SELECT
            ))
            .map_err(map_query_error)?;

        let books = stmt
            .query_map(params![code], Self::book_from_row)
            .map_err(map_query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_query_error)?;

        Ok(books)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn new_book(title: &str, author_id: i64, languages: &[&str]) -> NewBook {
        NewBook {
            catalog_id: Some(1),
            title: title.to_string(),
            author_id,
            languages: languages.iter().map(|s| s.to_string()).collect(),
            download_count: Some(100),
        }
    }

    #[test]
    fn test_create_and_find_author_case_insensitive() {
        let store = store();

        let created = store
            .create_author("Frank Herbert", Some(1920), Some(1986))
            .unwrap();
        assert!(created.id > 0);

        let found = store.find_author_by_name("FRANK HERBERT").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Frank Herbert");
        assert_eq!(found.birth_year, Some(1920));

        assert!(store.find_author_by_name("Brian Herbert").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_author_name_is_conflict() {
        let store = store();

        store.create_author("Jane Austen", Some(1775), Some(1817)).unwrap();
        let err = store.create_author("jane austen", None, None).unwrap_err();

        assert!(err.is_conflict(), "expected Conflict, got {:?}", err);
    }

    #[test]
    fn test_create_and_find_book() {
        let store = store();
        let author = store
            .create_author("Frank Herbert", Some(1920), Some(1986))
            .unwrap();

        let book = store
            .create_book(&new_book("Dune", author.id, &["en"]))
            .unwrap();
        assert!(book.id > 0);
        assert_eq!(book.author.id, author.id);
        assert_eq!(book.languages, vec!["en"]);

        let found = store.find_book_by_title("DUNE").unwrap().unwrap();
        assert_eq!(found.id, book.id);
        assert_eq!(found.author.name, "Frank Herbert");
    }

    #[test]
    fn test_duplicate_book_title_is_conflict() {
        let store = store();
        let author = store.create_author("Frank Herbert", None, None).unwrap();

        store
            .create_book(&new_book("Dune", author.id, &["en"]))
            .unwrap();
        let err = store
            .create_book(&new_book("dune", author.id, &["fr"]))
            .unwrap_err();

        assert!(err.is_conflict(), "expected Conflict, got {:?}", err);
    }

    #[test]
    fn test_missing_author_reference_is_failure_not_conflict() {
        let store = store();

        // author_id 99 does not exist: foreign key violation, not a
        // duplicate, so it must surface as Failure
        let err = store.create_book(&new_book("Orphan", 99, &[])).unwrap_err();
        assert!(!err.is_conflict(), "expected Failure, got {:?}", err);
    }

    #[test]
    fn test_list_authors_ordered_by_name() {
        let store = store();
        store
            .create_author("Verne, Jules", Some(1828), Some(1905))
            .unwrap();
        store
            .create_author("Austen, Jane", Some(1775), Some(1817))
            .unwrap();

        let names: Vec<String> = store
            .list_authors()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Austen, Jane", "Verne, Jules"]);
    }

    #[test]
    fn test_list_authors_alive_in_boundaries() {
        let store = store();
        store.create_author("Bounded", Some(1800), Some(1850)).unwrap();
        store.create_author("Open Ended", Some(1940), None).unwrap();
        store.create_author("No Birth Year", None, Some(1900)).unwrap();

        let alive_1800: Vec<String> = store
            .list_authors_alive_in(1800)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(alive_1800, vec!["Bounded"]);

        let alive_1850: Vec<String> = store
            .list_authors_alive_in(1850)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(alive_1850, vec!["Bounded"]);

        assert!(store.list_authors_alive_in(1799).unwrap().is_empty());

        let alive_2000: Vec<String> = store
            .list_authors_alive_in(2000)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(alive_2000, vec!["Open Ended"]);
    }

    #[test]
    fn test_list_books_by_language() {
        let store = store();
        let author = store.create_author("Frank Herbert", None, None).unwrap();
        store
            .create_book(&new_book("Dune", author.id, &["en"]))
            .unwrap();
        store
            .create_book(&new_book("Duna", author.id, &["es", "pt"]))
            .unwrap();

        let english: Vec<String> = store
            .list_books_by_language("en")
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(english, vec!["Dune"]);

        let portuguese: Vec<String> = store
            .list_books_by_language("PT")
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(portuguese, vec!["Duna"]);

        assert!(store.list_books_by_language("de").unwrap().is_empty());
    }

    #[test]
    fn test_language_pattern_characters_are_literal() {
        let store = store();
        let author = store.create_author("Frank Herbert", None, None).unwrap();
        store
            .create_book(&new_book("Dune", author.id, &["en"]))
            .unwrap();

        // SQL pattern characters in the code must not act as wildcards
        assert!(store.list_books_by_language("e%").unwrap().is_empty());
        assert!(store.list_books_by_language("_n").unwrap().is_empty());
        assert!(store.list_books_by_language("%").unwrap().is_empty());

        // Exact match still works, case-insensitively
        assert_eq!(store.list_books_by_language("EN").unwrap().len(), 1);
    }
}
