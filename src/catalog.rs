// 📖 Candidate Records - decoded catalog search results
//
// These are the shapes the external catalog (Gutendex) hands back, already
// decoded from JSON. The ingestion core consumes them as-is; the only
// derivation it performs is picking the primary author.

use serde::{Deserialize, Serialize};

use crate::entities::UNKNOWN_AUTHOR;

/// Language filters the catalog search and the console listings accept.
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["es", "en", "fr", "pt", "de"];

/// Whether a user-entered language code is one the catalog supports.
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// One author descriptor as reported by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAuthor {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

/// One catalog search result, normalized for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateBook {
    /// The catalog's own identifier for this record
    #[serde(rename = "id")]
    pub catalog_id: Option<i64>,

    pub title: String,

    /// Zero or more author descriptors; only the first is ever consulted
    #[serde(default)]
    pub authors: Vec<CandidateAuthor>,

    /// ISO-like 2-letter codes, catalog order, may be empty
    #[serde(default)]
    pub languages: Vec<String>,

    pub download_count: Option<i64>,
}

/// Response envelope for a catalog search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub results: Vec<CandidateBook>,
}

// ============================================================================
// PRIMARY AUTHOR DERIVATION
// ============================================================================

/// The single author attributed to a book for persistence purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryAuthor {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

impl PrimaryAuthor {
    pub fn unknown() -> Self {
        PrimaryAuthor {
            name: UNKNOWN_AUTHOR.to_string(),
            birth_year: None,
            death_year: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name.eq_ignore_ascii_case(UNKNOWN_AUTHOR)
    }
}

impl CandidateBook {
    /// Derive the primary author: the first descriptor in the list, if it
    /// exists and its trimmed name is non-empty; otherwise the "Unknown"
    /// sentinel. Descriptors past the first are never consulted.
    pub fn primary_author(&self) -> PrimaryAuthor {
        match self.authors.first() {
            Some(first) if !first.name.trim().is_empty() => PrimaryAuthor {
                name: first.name.trim().to_string(),
                birth_year: first.birth_year,
                death_year: first.death_year,
            },
            _ => PrimaryAuthor::unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(authors: Vec<CandidateAuthor>) -> CandidateBook {
        CandidateBook {
            catalog_id: Some(1),
            title: "Dune".to_string(),
            authors,
            languages: vec!["en".to_string()],
            download_count: Some(5000),
        }
    }

    #[test]
    fn test_primary_author_is_first_descriptor() {
        let c = candidate(vec![
            CandidateAuthor {
                name: "Frank Herbert".to_string(),
                birth_year: Some(1920),
                death_year: Some(1986),
            },
            CandidateAuthor {
                name: "Brian Herbert".to_string(),
                birth_year: Some(1947),
                death_year: None,
            },
        ]);

        let primary = c.primary_author();
        assert_eq!(primary.name, "Frank Herbert");
        assert_eq!(primary.birth_year, Some(1920));
        assert_eq!(primary.death_year, Some(1986));
    }

    #[test]
    fn test_empty_author_list_falls_back_to_unknown() {
        let primary = candidate(vec![]).primary_author();

        assert_eq!(primary.name, "Unknown");
        assert_eq!(primary.birth_year, None);
        assert_eq!(primary.death_year, None);
        assert!(primary.is_unknown());
    }

    #[test]
    fn test_blank_first_name_falls_back_to_unknown() {
        let primary = candidate(vec![CandidateAuthor {
            name: "   ".to_string(),
            birth_year: Some(1900),
            death_year: None,
        }])
        .primary_author();

        // The blank descriptor's years are discarded along with the name
        assert!(primary.is_unknown());
        assert_eq!(primary.birth_year, None);
    }

    #[test]
    fn test_primary_author_name_is_trimmed() {
        let primary = candidate(vec![CandidateAuthor {
            name: "  Frank Herbert  ".to_string(),
            birth_year: None,
            death_year: None,
        }])
        .primary_author();

        assert_eq!(primary.name, "Frank Herbert");
    }

    #[test]
    fn test_decode_search_page() {
        let json = r#"{
            "count": 1,
            "results": [{
                "id": 146,
                "title": "Dune",
                "authors": [{"name": "Herbert, Frank", "birth_year": 1920, "death_year": 1986}],
                "languages": ["en"],
                "download_count": 5000
            }]
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);

        let book = &page.results[0];
        assert_eq!(book.catalog_id, Some(146));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.languages, vec!["en"]);
        assert_eq!(book.primary_author().name, "Herbert, Frank");
    }

    #[test]
    fn test_supported_language_whitelist() {
        assert!(is_supported_language("en"));
        assert!(is_supported_language("pt"));
        assert!(!is_supported_language("xx"));
        assert!(!is_supported_language(""));
        // Pattern characters are not codes
        assert!(!is_supported_language("e%"));
        assert!(!is_supported_language("_n"));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let json = r#"{"results": [{"id": 9, "title": "Untitled Fragment"}]}"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        let book = &page.results[0];

        assert!(book.authors.is_empty());
        assert!(book.languages.is_empty());
        assert_eq!(book.download_count, None);
        assert!(book.primary_author().is_unknown());
    }
}
