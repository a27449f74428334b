// 📐 Shape Layer - Column vocabularies and header validation
//
// Each record kind has a fixed column vocabulary. A header line is validated
// against it ONCE, producing a ColumnMap (column → position in the file) that
// every data row is then decoded through. Column order in the file is free.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

// ============================================================================
// RECORD KIND
// ============================================================================

/// RecordKind - which schema an import file is decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Books,
    Categories,
}

impl RecordKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Books => "Books",
            RecordKind::Categories => "Categories",
        }
    }

    /// Short code, as used on the command line and in file names
    pub fn code(&self) -> &'static str {
        match self {
            RecordKind::Books => "books",
            RecordKind::Categories => "categories",
        }
    }

    /// Required header names, in canonical order
    pub fn required_columns(&self) -> Vec<&'static str> {
        match self {
            RecordKind::Books => required_headers::<BookColumn>(),
            RecordKind::Categories => required_headers::<CategoryColumn>(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "books" | "book" => Ok(RecordKind::Books),
            "categories" | "category" => Ok(RecordKind::Categories),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}

// ============================================================================
// COLUMN VOCABULARIES
// ============================================================================

/// Column - one entry of a record kind's vocabulary
pub trait Column: Copy + Eq + Hash + 'static {
    /// Every column, in canonical order
    const ALL: &'static [Self];

    /// Lower-case header name
    fn header(self) -> &'static str;

    fn is_required(self) -> bool;

    fn from_header(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|column| column.header() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookColumn {
    Title,
    Author,
    PublishingDate,
    CategoryId,
    DistributionExpense,
    Isbn,
    Description,
}

impl Column for BookColumn {
    const ALL: &'static [Self] = &[
        BookColumn::Title,
        BookColumn::Author,
        BookColumn::PublishingDate,
        BookColumn::CategoryId,
        BookColumn::DistributionExpense,
        BookColumn::Isbn,
        BookColumn::Description,
    ];

    fn header(self) -> &'static str {
        match self {
            BookColumn::Title => "title",
            BookColumn::Author => "author",
            BookColumn::PublishingDate => "publishingdate",
            BookColumn::CategoryId => "categoryid",
            BookColumn::DistributionExpense => "distributionexpense",
            BookColumn::Isbn => "isbn",
            BookColumn::Description => "description",
        }
    }

    fn is_required(self) -> bool {
        !matches!(self, BookColumn::Isbn | BookColumn::Description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Name,
    Description,
    Color,
}

impl Column for CategoryColumn {
    const ALL: &'static [Self] = &[
        CategoryColumn::Name,
        CategoryColumn::Description,
        CategoryColumn::Color,
    ];

    fn header(self) -> &'static str {
        match self {
            CategoryColumn::Name => "name",
            CategoryColumn::Description => "description",
            CategoryColumn::Color => "color",
        }
    }

    fn is_required(self) -> bool {
        !matches!(self, CategoryColumn::Description)
    }
}

fn required_headers<C: Column>() -> Vec<&'static str> {
    C::ALL
        .iter()
        .filter(|column| column.is_required())
        .map(|column| column.header())
        .collect()
}

// ============================================================================
// COLUMN MAP
// ============================================================================

/// Positions of known columns within one file's header
///
/// Unknown header names are ignored. When a name repeats, the last
/// occurrence wins.
#[derive(Debug, Clone)]
pub struct ColumnMap<C: Column> {
    positions: HashMap<C, usize>,
}

impl<C: Column> ColumnMap<C> {
    /// Build the map from raw header fields (trimmed and lower-cased here)
    ///
    /// # Returns
    /// * `Ok(ColumnMap)` - every required column is present
    /// * `Err(missing)` - ALL missing required headers, in canonical order
    pub fn from_header<'a, I>(fields: I) -> Result<Self, Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions = HashMap::new();

        for (index, field) in fields.into_iter().enumerate() {
            let name = field.trim().to_lowercase();
            if let Some(column) = C::from_header(&name) {
                positions.insert(column, index);
            }
        }

        let missing: Vec<String> = C::ALL
            .iter()
            .filter(|column| column.is_required() && !positions.contains_key(column))
            .map(|column| column.header().to_string())
            .collect();

        if missing.is_empty() {
            Ok(ColumnMap { positions })
        } else {
            Err(missing)
        }
    }

    pub fn contains(&self, column: C) -> bool {
        self.positions.contains_key(&column)
    }

    /// Trimmed cell for `column`; empty when the column is absent from the
    /// header or the row is shorter than the header
    pub fn cell<'r>(&self, row: &'r [&'r str], column: C) -> &'r str {
        self.positions
            .get(&column)
            .and_then(|&index| row.get(index))
            .map(|value| value.trim())
            .unwrap_or("")
    }
}

// ============================================================================
// TESTS
// ============================================================================
