// 📚 Book Entity - A title whose distribution cost is being tracked
//
// "Book id is IDENTITY (assigned once), everything else is a VALUE (editable)"
//
// - id is generated by the system on import or manual add, never read from input
// - category_id is a plain foreign key: a missing Category is tolerated
// - publishing_date stays the raw ISO 8601 text; parsing happens on read

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// BOOK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Stable identity (UUID) - NEVER changes
    pub id: String,

    pub title: String,
    pub author: String,

    /// ISO 8601 calendar date (e.g., "2024-01-15")
    pub publishing_date: String,

    /// Foreign key into the Category collection (not enforced)
    pub category_id: String,

    /// Non-negative currency amount
    pub distribution_expense: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// Create a book from user-supplied values, assigning a fresh id
    pub fn new(values: NewBook) -> Self {
        Self::with_id(super::new_id(), values)
    }

    pub(crate) fn with_id(id: String, values: NewBook) -> Self {
        Book {
            id,
            title: values.title,
            author: values.author,
            publishing_date: values.publishing_date,
            category_id: values.category_id,
            distribution_expense: normalize_expense(values.distribution_expense),
            isbn: values.isbn,
            description: values.description,
        }
    }

    /// Parsed publishing date, `None` when the stored text is not a date
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publishing_date(&self.publishing_date)
    }

    /// Calendar month bucket ("YYYY-MM") of the publishing date
    pub fn publishing_month(&self) -> Option<String> {
        self.published_on().map(|date| date.format("%Y-%m").to_string())
    }

    /// The editable values of this book
    pub fn values(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publishing_date: self.publishing_date.clone(),
            category_id: self.category_id.clone(),
            distribution_expense: self.distribution_expense,
            isbn: self.isbn.clone(),
            description: self.description.clone(),
        }
    }
}

/// Book values without identity - what a form or an import row supplies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publishing_date: String,
    pub category_id: String,
    pub distribution_expense: f64,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Clamp an amount to the stored invariant: negative or non-finite becomes 0
pub fn normalize_expense(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse an ISO 8601 date or date-time into a UTC calendar date
///
/// Accepts:
/// - "2024-01-15"
/// - "2024-01-15T10:30:00" (no offset, taken as UTC)
/// - "2024-01-15T10:30:00+02:00" (RFC 3339, normalized to UTC)
pub fn parse_publishing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|datetime| datetime.date())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_values() -> NewBook {
        NewBook {
            title: "Sample Book Title".to_string(),
            author: "John Doe".to_string(),
            publishing_date: "2024-01-15".to_string(),
            category_id: "cat1".to_string(),
            distribution_expense: 125.5,
            isbn: Some("978-3-16-148410-0".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_book_creation_assigns_id() {
        let book = Book::new(sample_values());

        assert!(!book.id.is_empty());
        assert_eq!(book.title, "Sample Book Title");
        assert_eq!(book.distribution_expense, 125.5);
        assert_eq!(book.values(), sample_values());
    }

    #[test]
    fn test_book_ids_are_unique() {
        let a = Book::new(sample_values());
        let b = Book::new(sample_values());

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_invalid_expense_is_stored_as_zero() {
        for amount in [-40.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let book = Book::new(NewBook {
                distribution_expense: amount,
                ..sample_values()
            });
            assert_eq!(book.distribution_expense, 0.0, "{}", amount);
        }
        assert_eq!(normalize_expense(12.25), 12.25);
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_publishing_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_publishing_date("  2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_datetime_normalizes_to_utc() {
        assert_eq!(
            parse_publishing_date("2024-03-01T01:00:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            parse_publishing_date("2024-03-01T10:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(parse_publishing_date(""), None);
        assert_eq!(parse_publishing_date("not a date"), None);
        assert_eq!(parse_publishing_date("2024-13-01"), None);
    }

    #[test]
    fn test_publishing_month() {
        let book = Book::new(sample_values());
        assert_eq!(book.publishing_month(), Some("2024-01".to_string()));

        let mut undated = Book::new(sample_values());
        undated.publishing_date = "someday".to_string();
        assert_eq!(undated.publishing_month(), None);
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book::new(sample_values());
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["publishingDate"], "2024-01-15");
        assert_eq!(json["categoryId"], "cat1");
        assert_eq!(json["distributionExpense"], 125.5);
        assert!(json.get("description").is_none());
    }
}
