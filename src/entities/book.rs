// 📚 Book Entity - Title-unique catalog entries
//
// A book is created once, at ingestion time, from the user-selected
// catalog record and never modified afterwards. The title is the duplicate
// guard (case-insensitive): the catalog id alone does not prevent
// re-registering the same title found under a different query.

use crate::entities::Author;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted book row with its resolved author attached.
///
/// Many books may reference one author; the reference always points at a
/// persisted author row (a book is never written before its author resolves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Surrogate id assigned by the store
    pub id: i64,

    /// The external catalog's own identifier, kept for provenance
    pub catalog_id: Option<i64>,

    /// Book title (non-empty, unique case-insensitively)
    pub title: String,

    /// The resolved author this book references
    pub author: Author,

    /// ISO-like 2-letter language codes, in catalog order; may be empty
    pub languages: Vec<String>,

    /// Catalog download count, if reported
    pub download_count: Option<i64>,
}

impl Book {
    /// Case-insensitive title comparison (the duplicate guard).
    pub fn same_title(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title)
    }

    /// Whether this book lists the given 2-letter language code.
    pub fn in_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let languages = if self.languages.is_empty() {
            "-".to_string()
        } else {
            self.languages.join(", ")
        };
        let downloads = self
            .download_count
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        write!(
            f,
            "{} | Author: {} | Languages: {} | Downloads: {}",
            self.title, self.author, languages, downloads
        )
    }
}
