// Librarium - Book Catalog Ingestion & Entity Resolution
// Exposes all modules for use in the CLI, API server, and tests

pub mod catalog;
pub mod db;
pub mod entities;
pub mod ingest;
pub mod memory;
pub mod resolver;
pub mod store;

#[cfg(feature = "client")]
pub mod client;

// Re-export commonly used types
pub use catalog::{
    is_supported_language, CandidateAuthor, CandidateBook, PrimaryAuthor, SearchPage,
    SUPPORTED_LANGUAGES,
};
pub use db::{setup_database, SqliteStore};
pub use entities::{Author, Book, UNKNOWN_AUTHOR};
pub use ingest::{BookIngestor, IngestError, IngestOutcome};
pub use memory::MemoryStore;
pub use resolver::{AuthorResolver, ResolveError};
pub use store::{CatalogStore, NewBook, StoreError};

#[cfg(feature = "client")]
pub use client::{CatalogClient, SearchError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
