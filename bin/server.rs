// Librarium - Web Server
// Read-only REST API over the registered books and authors

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use librarium::{Author, Book, CatalogStore, SqliteStore};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<SqliteStore>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Author response (flattened for API consumers)
#[derive(Serialize)]
struct AuthorResponse {
    id: i64,
    name: String,
    birth_year: Option<i32>,
    death_year: Option<i32>,
}

/// Book response with its resolved author inline
#[derive(Serialize)]
struct BookResponse {
    id: i64,
    catalog_id: Option<i64>,
    title: String,
    author: AuthorResponse,
    languages: Vec<String>,
    download_count: Option<i64>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            birth_year: author.birth_year,
            death_year: author.death_year,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            catalog_id: book.catalog_id,
            title: book.title,
            author: book.author.into(),
            languages: book.languages,
            download_count: book.download_count,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/books - All registered books
async fn get_books(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();

    match store.list_books() {
        Ok(books) => {
            let response: Vec<BookResponse> = books.into_iter().map(|b| b.into()).collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error listing books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<BookResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/authors - All registered authors, ordered by name
async fn get_authors(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();

    match store.list_authors() {
        Ok(authors) => {
            let response: Vec<AuthorResponse> = authors
                .into_iter()
                .filter(|a| !a.is_unknown())
                .map(|a| a.into())
                .collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error listing authors: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<AuthorResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/authors/alive/:year - Authors alive in a given year
async fn get_authors_alive(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let store = state.store.lock().unwrap();

    match store.list_authors_alive_in(year) {
        Ok(authors) => {
            let response: Vec<AuthorResponse> = authors
                .into_iter()
                .filter(|a| !a.is_unknown())
                .map(|a| a.into())
                .collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error listing authors alive in {}: {}", year, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<AuthorResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/books/language/:code - Books listing a language code
async fn get_books_by_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let store = state.store.lock().unwrap();

    match store.list_books_by_language(&code) {
        Ok(books) => {
            let response: Vec<BookResponse> = books.into_iter().map(|b| b.into()).collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error listing books in '{}': {}", code, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<BookResponse>::new())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Librarium - Web Server");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "librarium.db".to_string());

    let store = SqliteStore::open(std::path::Path::new(&db_path)).expect("Failed to open database");
    println!("✓ Database opened: {}", db_path);

    // Create shared state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/books", get(get_books))
        .route("/books/language/:code", get(get_books_by_language))
        .route("/authors", get(get_authors))
        .route("/authors/alive/:year", get(get_authors_alive))
        .with_state(state.clone());

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/books");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
