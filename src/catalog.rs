use std::collections::HashMap;

use crate::{book::Book, ids::Isbn};

/// All books known to the library, keyed by ISBN
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Books by ISBN
    books: HashMap<Isbn, Book>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a book, replacing any existing book with the same ISBN
    ///
    /// Returns the replaced book so callers can tell an insert from an
    /// overwrite.
    pub fn add_book(&mut self, book: Book) -> Option<Book> {
        self.books.insert(book.isbn().clone(), book)
    }

    /// Look up a book by exact ISBN
    #[must_use]
    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Mutable lookup for the circulation engine
    pub(crate) fn find_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    /// Every book matching `query`, in unspecified order
    ///
    /// See [`Book::matches`] for the matching rules.
    pub fn search<'c>(&'c self, query: &'c str) -> impl Iterator<Item = &'c Book> {
        self.books.values().filter(move |book| book.matches(query))
    }

    /// All books, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Number of catalogued books
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no books are catalogued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
