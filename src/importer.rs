// 📥 Importer - delimited text → Book / Category records
//
// Strict per header, lenient per field:
// - A file with no data rows, or missing required headers, is rejected whole
// - A malformed cell never rejects its row; it degrades to a default
//   (unparseable expense → 0, missing text → "", missing color → baseline)
//
// Embedded commas are NOT supported: quoting is disabled, so every comma splits.

use crate::entities::{Book, Category, NewBook, NewCategory, DEFAULT_CATEGORY_COLOR};
use crate::schema::{BookColumn, CategoryColumn, Column, ColumnMap, RecordKind};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// ERRORS
// ============================================================================

/// Why an import attempt was rejected
///
/// The existing in-memory records are never affected by a rejected import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File must contain at least a header row and one data row")]
    TooFewRows,

    #[error("Missing required headers: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Error surfaced by the csv line reader. With quoting off and input
    /// already decoded to `&str` it does not occur in practice; it exists so
    /// `reader.records()` can be propagated with `?`.
    #[error("Failed to read import data: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Failed to open file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// IMPORT RESULT
// ============================================================================

/// Decoded records of one file, in input row order
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedRecords {
    Books(Vec<Book>),
    Categories(Vec<Category>),
}

impl ImportedRecords {
    pub fn kind(&self) -> RecordKind {
        match self {
            ImportedRecords::Books(_) => RecordKind::Books,
            ImportedRecords::Categories(_) => RecordKind::Categories,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportedRecords::Books(books) => books.len(),
            ImportedRecords::Categories(categories) => categories.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse raw file content with the schema of `kind`
///
/// # Returns
/// * `Ok(ImportedRecords)` - one record per non-blank data line
/// * `Err(ImportError::TooFewRows)` - fewer than header + one data line
/// * `Err(ImportError::MissingColumns)` - every absent required header
pub fn parse(raw: &str, kind: RecordKind) -> Result<ImportedRecords, ImportError> {
    match kind {
        RecordKind::Books => parse_books(raw).map(ImportedRecords::Books),
        RecordKind::Categories => parse_categories(raw).map(ImportedRecords::Categories),
    }
}

/// Read `path` and parse it with the schema of `kind`
pub fn parse_file(path: &Path, kind: RecordKind) -> Result<ImportedRecords, ImportError> {
    let raw = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&raw, kind)
}

pub fn parse_books(raw: &str) -> Result<Vec<Book>, ImportError> {
    let (columns, rows) = split_header::<BookColumn>(raw)?;

    let books: Vec<Book> = rows
        .iter()
        .map(|record| {
            let row: Vec<&str> = record.iter().collect();
            Book::new(decode_book(&columns, &row, line_of(record)))
        })
        .collect();

    debug!(kind = "books", rows = books.len(), "decoded import file");
    Ok(books)
}

pub fn parse_categories(raw: &str) -> Result<Vec<Category>, ImportError> {
    let (columns, rows) = split_header::<CategoryColumn>(raw)?;

    let categories: Vec<Category> = rows
        .iter()
        .map(|record| {
            let row: Vec<&str> = record.iter().collect();
            Category::new(decode_category(&columns, &row))
        })
        .collect();

    debug!(kind = "categories", rows = categories.len(), "decoded import file");
    Ok(categories)
}

/// Non-blank lines, split on commas and trimmed
fn read_lines(raw: &str) -> Result<Vec<StringRecord>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        lines.push(record);
    }

    Ok(lines)
}

/// Whitespace-only lines come through as one empty field
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.get(0).map_or(true, str::is_empty)
}

/// Validate the first line as header, returning the column map and data lines
fn split_header<C: Column>(raw: &str) -> Result<(ColumnMap<C>, Vec<StringRecord>), ImportError> {
    let mut lines = read_lines(raw)?;
    if lines.len() < 2 {
        return Err(ImportError::TooFewRows);
    }

    let rows = lines.split_off(1);
    let columns = ColumnMap::from_header(lines[0].iter()).map_err(ImportError::MissingColumns)?;

    Ok((columns, rows))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}

// ============================================================================
// ROW DECODING
// ============================================================================

fn decode_book(columns: &ColumnMap<BookColumn>, row: &[&str], line: u64) -> NewBook {
    let raw_expense = columns.cell(row, BookColumn::DistributionExpense);
    let distribution_expense = parse_expense(raw_expense).unwrap_or_else(|| {
        if !raw_expense.is_empty() {
            warn!(line, value = raw_expense, "unparseable distribution expense, using 0");
        }
        0.0
    });

    NewBook {
        title: columns.cell(row, BookColumn::Title).to_string(),
        author: columns.cell(row, BookColumn::Author).to_string(),
        publishing_date: columns.cell(row, BookColumn::PublishingDate).to_string(),
        category_id: columns.cell(row, BookColumn::CategoryId).to_string(),
        distribution_expense,
        isbn: non_empty(columns.cell(row, BookColumn::Isbn)),
        description: non_empty(columns.cell(row, BookColumn::Description)),
    }
}

fn decode_category(columns: &ColumnMap<CategoryColumn>, row: &[&str]) -> NewCategory {
    let color = match columns.cell(row, CategoryColumn::Color) {
        "" => DEFAULT_CATEGORY_COLOR.to_string(),
        color => color.to_string(),
    };

    NewCategory {
        name: columns.cell(row, CategoryColumn::Name).to_string(),
        description: non_empty(columns.cell(row, CategoryColumn::Description)),
        color,
    }
}

/// Finite, non-negative decimal amount read from the start of the cell
///
/// Trailing text is ignored ("125.50 USD" → 125.5); a cell that does not
/// start with a number yields `None`.
pub fn parse_expense(raw: &str) -> Option<f64> {
    numeric_prefix(raw.trim())
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Longest leading run shaped like `[+-]digits[.digits][e[+-]digits]`
fn numeric_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).map_or(false, u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &raw[..end]
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ============================================================================
// TEMPLATES
// ============================================================================

const BOOKS_TEMPLATE: &str = "\
title,author,publishingdate,categoryid,distributionexpense,isbn,description
Sample Book Title,John Doe,2024-01-15,cat1,125.50,978-3-16-148410-0,A sample book description
Another Book,Jane Smith,2024-02-20,cat2,89.75,978-0-123456-78-9,Another sample description";

const CATEGORIES_TEMPLATE: &str = "\
name,description,color
Business Analytics,Books about business and analytics,#2563eb
Python Programming,Python development and programming,#059669";

/// Canonical example document for `kind`: header plus two illustrative rows
pub fn template(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Books => BOOKS_TEMPLATE,
        RecordKind::Categories => CATEGORIES_TEMPLATE,
    }
}

/// Download name of the template ("books-template.csv")
pub fn template_file_name(kind: RecordKind) -> String {
    format!("{}-template.csv", kind.code())
}

/// Write the template for `kind` into `dir`, returning the file path
pub fn write_template(kind: RecordKind, dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join(template_file_name(kind));
    fs::write(&path, template(kind))?;
    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================
