// 🗃️ Library - the application's record collections
//
// One owned state object, passed by reference to whoever needs it:
// - Readers (reports, dashboard) borrow it immutably
// - Manual edits go through add/update/delete, one record at a time
// - Imports REPLACE a whole collection in a single swap, never merge
//
// Referential integrity is not enforced: deleting a category leaves its
// books pointing at an id that no longer resolves.

use crate::dashboard::DashboardStats;
use crate::entities::sample::{sample_books, sample_categories};
use crate::entities::{Book, Category, NewBook, NewCategory};
use crate::importer::{self, ImportError, ImportedRecords};
use crate::reports::{Aggregator, ExpenseReport, ReportFilter};
use crate::schema::RecordKind;
use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    books: Vec<Book>,
    categories: Vec<Category>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Library::default()
    }

    /// Library pre-loaded with the built-in sample data
    pub fn with_sample_data() -> Self {
        Library {
            books: sample_books(),
            categories: sample_categories(),
        }
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Category a book is filed under, `None` for a dangling reference
    pub fn category_of(&self, book: &Book) -> Option<&Category> {
        self.category(&book.category_id)
    }

    /// Find category by name (case-insensitive)
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        let lower_name = name.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.name.to_lowercase() == lower_name)
    }

    // ========================================================================
    // BOOK EDITS
    // ========================================================================

    /// Add a book, assigning it a fresh id
    pub fn add_book(&mut self, values: NewBook) -> &Book {
        let index = self.books.len();
        self.books.push(Book::new(values));
        &self.books[index]
    }

    /// Replace a book's values; its id is kept
    pub fn update_book(&mut self, id: &str, values: NewBook) -> Result<&Book, StoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| StoreError::BookNotFound(id.to_string()))?;

        *book = Book::with_id(id.to_string(), values);
        Ok(&*book)
    }

    pub fn delete_book(&mut self, id: &str) -> Result<Book, StoreError> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| StoreError::BookNotFound(id.to_string()))?;

        Ok(self.books.remove(index))
    }

    // ========================================================================
    // CATEGORY EDITS
    // ========================================================================

    /// Add a category, assigning it a fresh id
    pub fn add_category(&mut self, values: NewCategory) -> &Category {
        let index = self.categories.len();
        self.categories.push(Category::new(values));
        &self.categories[index]
    }

    /// Replace a category's values; its id is kept
    pub fn update_category(&mut self, id: &str, values: NewCategory) -> Result<&Category, StoreError> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;

        *category = Category::with_id(id.to_string(), values);
        Ok(&*category)
    }

    /// Remove a category; books referencing it are left dangling
    pub fn delete_category(&mut self, id: &str) -> Result<Category, StoreError> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;

        Ok(self.categories.remove(index))
    }

    // ========================================================================
    // WHOLESALE REPLACEMENT
    // ========================================================================

    /// Swap in a new book collection, returning the previous one
    pub fn replace_books(&mut self, books: Vec<Book>) -> Vec<Book> {
        info!(count = books.len(), "replacing book collection");
        std::mem::replace(&mut self.books, books)
    }

    /// Swap in a new category collection, returning the previous one
    pub fn replace_categories(&mut self, categories: Vec<Category>) -> Vec<Category> {
        info!(count = categories.len(), "replacing category collection");
        std::mem::replace(&mut self.categories, categories)
    }

    /// Swap in whichever collection `records` holds
    pub fn replace(&mut self, records: ImportedRecords) {
        match records {
            ImportedRecords::Books(books) => {
                self.replace_books(books);
            }
            ImportedRecords::Categories(categories) => {
                self.replace_categories(categories);
            }
        }
    }

    /// Parse `raw` and, only if the whole file is accepted, replace the
    /// matching collection. Returns the number of imported records.
    pub fn import(&mut self, raw: &str, kind: RecordKind) -> Result<usize, ImportError> {
        let records = importer::parse(raw, kind)?;
        let count = records.len();
        self.replace(records);
        Ok(count)
    }

    pub fn import_books(&mut self, raw: &str) -> Result<usize, ImportError> {
        self.import(raw, RecordKind::Books)
    }

    pub fn import_categories(&mut self, raw: &str) -> Result<usize, ImportError> {
        self.import(raw, RecordKind::Categories)
    }

    pub fn import_file(&mut self, path: &Path, kind: RecordKind) -> Result<usize, ImportError> {
        let records = importer::parse_file(path, kind)?;
        let count = records.len();
        self.replace(records);
        Ok(count)
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn report(&self, filter: ReportFilter, today: NaiveDate) -> ExpenseReport {
        Aggregator::new(filter).aggregate(&self.books, &self.categories, today)
    }

    pub fn dashboard(&self, recent_limit: usize) -> DashboardStats {
        DashboardStats::compute(&self.books, &self.categories, recent_limit)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, category_id: &str, expense: f64) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Test Author".to_string(),
            publishing_date: "2024-01-15".to_string(),
            category_id: category_id.to_string(),
            distribution_expense: expense,
            isbn: None,
            description: None,
        }
    }

    #[test]
    fn test_library_with_sample_data() {
        let library = Library::with_sample_data();

        assert_eq!(library.categories().len(), 3);
        assert_eq!(library.books().len(), 6);
        assert!(library.find_category_by_name("data science").is_some());
    }

    #[test]
    fn test_add_book_assigns_unique_id() {
        let mut library = Library::new();

        let first = library.add_book(new_book("One", "cat1", 1.0)).id.clone();
        let second = library.add_book(new_book("Two", "cat1", 2.0)).id.clone();

        assert_ne!(first, second);
        assert_eq!(library.books().len(), 2);
        assert_eq!(library.book(&second).map(|b| b.title.as_str()), Some("Two"));
    }

    #[test]
    fn test_update_book_keeps_id() {
        let mut library = Library::new();
        let id = library.add_book(new_book("Draft", "cat1", 1.0)).id.clone();

        let updated = library.update_book(&id, new_book("Final", "cat2", 9.5)).unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.distribution_expense, 9.5);
        assert_eq!(library.books().len(), 1);
    }

    #[test]
    fn test_invalid_expenses_never_reach_reports() {
        let mut library = Library::new();
        library.add_category(NewCategory::named("Fiction"));
        let category_id = library.categories()[0].id.clone();

        library.add_book(new_book("Refund", &category_id, -40.0));
        let id = library.add_book(new_book("Typo", &category_id, 5.0)).id.clone();
        library.update_book(&id, new_book("Typo", &category_id, f64::NAN)).unwrap();

        let stored: Vec<f64> = library.books().iter().map(|b| b.distribution_expense).collect();
        assert_eq!(stored, vec![0.0, 0.0]);

        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let report = library.report(ReportFilter::all(), today);
        assert_eq!(report.summary.total_expense, 0.0);
        assert_eq!(report.summary.min_expense, 0.0);
        assert!(report.categories.is_empty());
        assert_eq!(report.monthly_trend.len(), 1);
        assert_eq!(report.monthly_trend[0].total_expense, 0.0);
        assert_eq!(report.monthly_trend[0].book_count, 2);
    }

    #[test]
    fn test_update_missing_book_fails() {
        let mut library = Library::new();

        let result = library.update_book("nope", new_book("X", "cat1", 1.0));

        assert_eq!(result.unwrap_err(), StoreError::BookNotFound("nope".to_string()));
    }

    #[test]
    fn test_delete_book() {
        let mut library = Library::new();
        let id = library.add_book(new_book("Gone", "cat1", 1.0)).id.clone();

        let removed = library.delete_book(&id).unwrap();

        assert_eq!(removed.title, "Gone");
        assert!(library.books().is_empty());
        assert!(library.delete_book(&id).is_err());
    }

    #[test]
    fn test_category_crud() {
        let mut library = Library::new();
        let id = library.add_category(NewCategory::named("Poetry")).id.clone();

        library
            .update_category(&id, NewCategory::named("Verse").with_color("#000000"))
            .unwrap();
        assert_eq!(library.category(&id).map(|c| c.name.as_str()), Some("Verse"));

        library.delete_category(&id).unwrap();
        assert!(library.category(&id).is_none());
        assert_eq!(
            library.delete_category(&id).unwrap_err(),
            StoreError::CategoryNotFound(id)
        );
    }

    #[test]
    fn test_deleting_category_leaves_books_dangling() {
        let mut library = Library::with_sample_data();
        let book = library.books()[0].clone();

        library.delete_category(&book.category_id).unwrap();

        assert!(library.book(&book.id).is_some());
        assert!(library.category_of(&book).is_none());
    }

    #[test]
    fn test_import_replaces_wholesale() {
        let mut library = Library::with_sample_data();
        let raw = "\
title,author,publishingdate,categoryid,distributionexpense
Dune,Frank Herbert,1965-08-01,cat1,10";

        let count = library.import_books(raw).unwrap();

        assert_eq!(count, 1);
        assert_eq!(library.books().len(), 1);
        assert_eq!(library.books()[0].title, "Dune");
        // categories untouched
        assert_eq!(library.categories().len(), 3);
    }

    #[test]
    fn test_failed_import_keeps_existing_records() {
        let mut library = Library::with_sample_data();
        let before = library.books().to_vec();

        let result = library.import_books("title,author\nDune,Frank Herbert");

        assert!(matches!(result, Err(ImportError::MissingColumns(_))));
        assert_eq!(library.books(), before.as_slice());

        let result = library.import_categories("name,color");
        assert!(matches!(result, Err(ImportError::TooFewRows)));
        assert_eq!(library.categories().len(), 3);
    }

    #[test]
    fn test_replace_returns_previous_collection() {
        let mut library = Library::with_sample_data();

        let previous = library.replace_categories(Vec::new());

        assert_eq!(previous.len(), 3);
        assert!(library.categories().is_empty());
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = importer::write_template(RecordKind::Categories, dir.path()).unwrap();
        let mut library = Library::new();

        let count = library.import_file(&path, RecordKind::Categories).unwrap();

        assert_eq!(count, 2);
        assert!(library.find_category_by_name("Business Analytics").is_some());
    }

    #[test]
    fn test_report_over_library() {
        let library = Library::with_sample_data();
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let report = library.report(ReportFilter::all(), today);

        assert_eq!(report.summary.book_count, 6);
        assert_eq!(report.categories.len(), 3);
        let percent: f64 = report.categories.iter().map(|c| c.percent_of_grand_total).sum();
        assert!((percent - 100.0).abs() < 1e-9);
    }
}
