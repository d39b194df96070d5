// Librarium console - search the catalog, register books, browse the store

use anyhow::Result;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use librarium::{is_supported_language, CatalogStore, SqliteStore, UNKNOWN_AUTHOR};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let db_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("librarium.db"));

    let store = SqliteStore::open(&db_path)?;
    println!("📚 Librarium - your book catalog");
    println!("   Database: {}", db_path.display());

    loop {
        println!("\n--- MENU ---");
        println!("1. Search catalog and register a book");
        println!("2. List registered books");
        println!("3. List registered authors");
        println!("4. List authors alive in a given year");
        println!("5. List books by language");
        println!("0. Exit");
        print!("Choose an option: ");
        io::stdout().flush()?;

        match read_line()?.trim() {
            "1" => {
                if let Err(e) = search_and_register(&store) {
                    eprintln!("Search failed: {}", e);
                }
            }
            "2" => list_books(&store)?,
            "3" => list_authors(&store)?,
            "4" => list_authors_alive(&store)?,
            "5" => list_books_by_language(&store)?,
            "0" => {
                println!("Goodbye!");
                break;
            }
            other => println!("Invalid option '{}'. Please try again.", other),
        }
    }

    Ok(())
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// ============================================================================
// Search & register (needs the catalog client)
// ============================================================================

#[cfg(feature = "client")]
fn search_and_register(store: &SqliteStore) -> Result<()> {
    use librarium::{BookIngestor, CatalogClient, IngestOutcome};

    print!("Enter the title to search for: ");
    io::stdout().flush()?;
    let title = read_line()?.trim().to_string();
    if title.is_empty() {
        println!("Nothing to search for.");
        return Ok(());
    }

    print!("Filter by language? (es, en, fr, pt, de - leave blank for all): ");
    io::stdout().flush()?;
    let filter_input = read_line()?.trim().to_lowercase();
    let language_filter = if filter_input.is_empty() {
        None
    } else if is_supported_language(&filter_input) {
        Some(filter_input)
    } else {
        println!(
            "Warning: language '{}' not recognized. Searching without a filter.",
            filter_input
        );
        None
    };

    println!("\nSearching the catalog for '{}'...", title);
    let client = CatalogClient::new();
    let results = client.search(&title, language_filter.as_deref())?;

    if results.is_empty() {
        println!("\nNo catalog entries found for '{}'.", title);
        return Ok(());
    }

    println!("\n--- RESULTS ---");
    let shown = results.len().min(10);
    for (i, candidate) in results.iter().take(shown).enumerate() {
        let author = candidate.primary_author();
        let language = candidate
            .languages
            .first()
            .map(String::as_str)
            .unwrap_or("-");
        println!(
            "{}. {} | Author: {} | Language: {}",
            i + 1,
            candidate.title,
            author.name,
            language
        );
    }

    print!("Enter the number of the book to register (0 to cancel): ");
    io::stdout().flush()?;
    let selection: usize = match read_line()?.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            println!("Invalid input. Please enter a number.");
            return Ok(());
        }
    };

    if selection == 0 {
        println!("Search cancelled.");
        return Ok(());
    }
    if selection > shown {
        println!("Invalid selection. Please pick a number from the list.");
        return Ok(());
    }

    let chosen = &results[selection - 1];
    let ingestor = BookIngestor::new(store);

    match ingestor.ingest(chosen)? {
        IngestOutcome::Created(book) => {
            println!("\n✓ Book registered:");
            println!("  {}", book);
        }
        IngestOutcome::AlreadyExists(title) | IngestOutcome::ConflictDuplicate(title) => {
            println!("\n'{}' is already registered.", title);
        }
    }

    Ok(())
}

#[cfg(not(feature = "client"))]
fn search_and_register(_store: &SqliteStore) -> Result<()> {
    eprintln!("Catalog search not available!");
    eprintln!("Rebuild with: cargo build --features client");
    Ok(())
}

// ============================================================================
// Store listings
// ============================================================================

fn list_books(store: &SqliteStore) -> Result<()> {
    let books = store.list_books()?;
    if books.is_empty() {
        println!("\nNo books registered yet.");
    } else {
        println!("\n--- REGISTERED BOOKS ---");
        for book in &books {
            println!("{}", book);
        }
    }
    Ok(())
}

fn list_authors(store: &SqliteStore) -> Result<()> {
    // The "Unknown" sentinel is a storage artifact, not an author to show
    let authors: Vec<_> = store
        .list_authors()?
        .into_iter()
        .filter(|a| !a.is_unknown())
        .collect();

    if authors.is_empty() {
        println!("\nNo authors registered (or all are '{}').", UNKNOWN_AUTHOR);
    } else {
        println!("\n--- REGISTERED AUTHORS ---");
        for author in &authors {
            println!("{}", author);
        }
    }
    Ok(())
}

fn list_authors_alive(store: &SqliteStore) -> Result<()> {
    print!("Enter the year: ");
    io::stdout().flush()?;
    let year: i32 = match read_line()?.trim().parse() {
        Ok(y) => y,
        Err(_) => {
            println!("Invalid input. Please enter a number for the year.");
            return Ok(());
        }
    };

    let authors: Vec<_> = store
        .list_authors_alive_in(year)?
        .into_iter()
        .filter(|a| !a.is_unknown())
        .collect();

    if authors.is_empty() {
        println!("\nNo authors were alive in {}.", year);
    } else {
        println!("\n--- AUTHORS ALIVE IN {} ---", year);
        for author in &authors {
            println!("{}", author);
        }
    }
    Ok(())
}

fn list_books_by_language(store: &SqliteStore) -> Result<()> {
    print!("Enter a 2-letter language code (e.g. es, en, fr, pt, de): ");
    io::stdout().flush()?;
    let code = read_line()?.trim().to_lowercase();
    if !is_supported_language(&code) {
        println!("Invalid language. Please enter es, en, fr, pt or de.");
        return Ok(());
    }

    let books = store.list_books_by_language(&code)?;
    if books.is_empty() {
        println!("\nNo books registered in '{}'.", code);
    } else {
        println!("\n--- BOOKS IN '{}' ---", code.to_uppercase());
        for book in &books {
            println!("{}", book);
        }
    }
    Ok(())
}
