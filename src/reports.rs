// 📊 Report Engine - Derived expense aggregates for charts and export
//
// Pure function of (books, categories, filter, today):
//   filtered books → per-category totals, monthly buckets, summary stats
//
// Nothing is cached and the inputs are only ever borrowed immutably, so
// calling it twice with the same inputs yields the same report.
// Every division is guarded: an empty set or zero total yields 0, never NaN.

use crate::entities::{Book, Category};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// FILTERS
// ============================================================================

/// Publishing-date window, relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Last30Days,
    Last90Days,
    Last1Year,
}

impl DateRange {
    pub fn code(&self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Last30Days => "last30days",
            DateRange::Last90Days => "last90days",
            DateRange::Last1Year => "last1year",
        }
    }

    /// Window length in days, `None` for [`DateRange::All`]
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::All => None,
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::Last1Year => Some(365),
        }
    }

    /// Earliest publishing date still inside the window
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|days| today - Duration::days(days))
    }

    /// Whether a (possibly unparseable) publishing date falls in the window
    ///
    /// Undated books only match [`DateRange::All`].
    pub fn contains(&self, published_on: Option<NaiveDate>, today: NaiveDate) -> bool {
        match self.cutoff(today) {
            None => true,
            Some(cutoff) => published_on.map_or(false, |date| date >= cutoff),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "last30days" | "30days" => Ok(DateRange::Last30Days),
            "last90days" | "90days" => Ok(DateRange::Last90Days),
            "last1year" | "1year" => Ok(DateRange::Last1Year),
            other => Err(format!("Unknown date range: {}", other)),
        }
    }
}

/// Which books a report covers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub date_range: DateRange,
    /// Restrict to a single category id
    pub category_id: Option<String>,
}

impl ReportFilter {
    pub fn all() -> Self {
        ReportFilter::default()
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }

    pub fn matches(&self, book: &Book, today: NaiveDate) -> bool {
        let category_match = self
            .category_id
            .as_deref()
            .map_or(true, |id| book.category_id == id);

        category_match && self.date_range.contains(book.published_on(), today)
    }
}

// ============================================================================
// REPORT TYPES
// ============================================================================

/// One slice of the expense distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpense {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub total_expense: f64,
    pub book_count: usize,
    pub average_expense: f64,
    pub percent_of_grand_total: f64,
}

/// Categories with a non-zero total, in category collection order
pub type CategoryReport = Vec<CategoryExpense>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// "YYYY-MM"
    pub month: String,
    pub total_expense: f64,
    pub book_count: usize,
}

/// Buckets sorted ascending by month, one per month
pub type MonthlyTrend = Vec<MonthlyBucket>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_expense: f64,
    pub average_expense: f64,
    pub max_expense: f64,
    pub min_expense: f64,
    pub book_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReport {
    pub filter: ReportFilter,
    /// Day the date window was computed from
    pub as_of: NaiveDate,
    pub summary: SummaryStats,
    pub categories: CategoryReport,
    pub monthly_trend: MonthlyTrend,
}

impl ExpenseReport {
    pub fn summary(&self) -> String {
        format!(
            "Expense report ({}): {} books, total ${:.2}, average ${:.2}, {} categories, {} months",
            self.filter.date_range,
            self.summary.book_count,
            self.summary.total_expense,
            self.summary.average_expense,
            self.categories.len(),
            self.monthly_trend.len()
        )
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

pub struct Aggregator {
    filter: ReportFilter,
}

impl Aggregator {
    pub fn new(filter: ReportFilter) -> Self {
        Aggregator { filter }
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    /// Build the full report with the date window anchored at `today`
    pub fn aggregate(&self, books: &[Book], categories: &[Category], today: NaiveDate) -> ExpenseReport {
        let filtered = self.filter_books(books, today);
        let summary = summary_stats(&filtered);
        let category_report = category_report(&filtered, categories, summary.total_expense);
        let trend = monthly_trend(&filtered);

        debug!(
            range = %self.filter.date_range,
            matched = filtered.len(),
            of = books.len(),
            "aggregated expense report"
        );

        ExpenseReport {
            filter: self.filter.clone(),
            as_of: today,
            summary,
            categories: category_report,
            monthly_trend: trend,
        }
    }

    /// Same as [`Aggregator::aggregate`], anchored at the current UTC date
    pub fn aggregate_now(&self, books: &[Book], categories: &[Category]) -> ExpenseReport {
        self.aggregate(books, categories, Utc::now().date_naive())
    }

    pub fn filter_books<'a>(&self, books: &'a [Book], today: NaiveDate) -> Vec<&'a Book> {
        books
            .iter()
            .filter(|book| self.filter.matches(book, today))
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(ReportFilter::all())
    }
}

/// Per-category totals; categories whose total is zero are left out
///
/// Books pointing at a category that does not exist contribute to no slice.
pub fn category_report(books: &[&Book], categories: &[Category], grand_total: f64) -> CategoryReport {
    categories
        .iter()
        .filter_map(|category| {
            let (total_expense, book_count) = books
                .iter()
                .filter(|book| book.category_id == category.id)
                .fold((0.0, 0usize), |(total, count), book| {
                    (total + book.distribution_expense, count + 1)
                });

            if !(total_expense > 0.0) {
                return None;
            }

            Some(CategoryExpense {
                category_id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                total_expense,
                book_count,
                average_expense: ratio(total_expense, book_count as f64),
                percent_of_grand_total: ratio(total_expense, grand_total) * 100.0,
            })
        })
        .collect()
}

/// Bucket books by publishing month; undated books are skipped
pub fn monthly_trend(books: &[&Book]) -> MonthlyTrend {
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for book in books {
        let Some(month) = book.publishing_month() else {
            continue;
        };
        let bucket = buckets.entry(month).or_insert((0.0, 0));
        bucket.0 += book.distribution_expense;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (total_expense, book_count))| MonthlyBucket {
            month,
            total_expense,
            book_count,
        })
        .collect()
}

pub fn summary_stats(books: &[&Book]) -> SummaryStats {
    if books.is_empty() {
        return SummaryStats::default();
    }

    let expenses = books.iter().map(|book| book.distribution_expense);
    let total_expense: f64 = expenses.clone().sum();
    let max_expense = expenses.clone().fold(0.0, f64::max);
    let min_expense = expenses.fold(f64::INFINITY, f64::min);

    SummaryStats {
        total_expense,
        average_expense: ratio(total_expense, books.len() as f64),
        max_expense,
        min_expense,
        book_count: books.len(),
    }
}

/// `numerator / denominator`, or 0 when the result would not be finite
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// ============================================================================
// EXPORT
// ============================================================================

/// Render the category report as CSV
///
/// Format: `Category,Total Expense,Book Count,Average Expense`, amounts to 2 decimals
pub fn export_csv(report: &[CategoryExpense]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["Category", "Total Expense", "Book Count", "Average Expense"])?;
    for row in report {
        writer.write_record([
            row.name.clone(),
            format!("{:.2}", row.total_expense),
            row.book_count.to_string(),
            format!("{:.2}", row.average_expense),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush report CSV: {}", e))?;
    String::from_utf8(bytes).context("Report CSV is not valid UTF-8")
}

/// Write [`export_csv`] output to `path`
pub fn write_export(report: &[CategoryExpense], path: &Path) -> Result<()> {
    let content = export_csv(report)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================
