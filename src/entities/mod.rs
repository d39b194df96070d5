// Entity Models - Author and Book
//
// Both entities are created once and never mutated:
// - Physical identity is the store-assigned id (used for references)
// - Logical identity is the natural key (author name / book title),
//   unique case-insensitively and enforced by the store

pub mod author;
pub mod book;

pub use author::{Author, UNKNOWN_AUTHOR};
pub use book::Book;
