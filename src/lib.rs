// Book Ledger - Core Library
// Distribution-expense tracking for books: CSV import, in-memory state, reports

pub mod entities;
pub mod schema;     // Column vocabularies + header validation
pub mod importer;   // CSV → records, templates
pub mod store;      // Owned application state
pub mod reports;    // Aggregator + report export
pub mod dashboard;  // Unfiltered overview
pub mod config;

// Re-export commonly used types
pub use entities::{
    Book, NewBook, Category, NewCategory, DEFAULT_CATEGORY_COLOR,
};
pub use schema::{
    RecordKind, Column, BookColumn, CategoryColumn, ColumnMap,
};
pub use importer::{
    ImportError, ImportedRecords,
    parse, parse_books, parse_categories, parse_file,
    template, template_file_name, write_template,
};
pub use store::{Library, StoreError};
pub use reports::{
    Aggregator, DateRange, ReportFilter, ExpenseReport,
    CategoryExpense, CategoryReport, MonthlyBucket, MonthlyTrend, SummaryStats,
    export_csv, write_export,
};
pub use dashboard::{DashboardStats, CategorySlice, RecentBook};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
