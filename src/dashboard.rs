// 🏠 Dashboard - unfiltered overview of the whole library

use crate::entities::{Book, Category};
use crate::reports::{category_report, monthly_trend, ratio, MonthlyTrend};
use serde::{Deserialize, Serialize};

/// One non-zero slice of the expense-by-category chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub name: String,
    pub color: String,
    pub total: f64,
    pub book_count: usize,
}

/// A book row with its category resolved (or not)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub distribution_expense: f64,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

impl RecentBook {
    /// Category label for display; dangling references show as "Unknown"
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_expense: f64,
    pub book_count: usize,
    pub category_count: usize,
    pub average_expense: f64,
    pub expenses_by_category: Vec<CategorySlice>,
    /// Expense per publishing month, oldest first
    pub monthly_expenses: MonthlyTrend,
    pub recent_books: Vec<RecentBook>,
}

impl DashboardStats {
    /// `recent_limit` caps how many books (in collection order) are listed
    pub fn compute(books: &[Book], categories: &[Category], recent_limit: usize) -> Self {
        let all: Vec<&Book> = books.iter().collect();
        let total_expense: f64 = books.iter().map(|book| book.distribution_expense).sum();

        let expenses_by_category = category_report(&all, categories, total_expense)
            .into_iter()
            .map(|row| CategorySlice {
                name: row.name,
                color: row.color,
                total: row.total_expense,
                book_count: row.book_count,
            })
            .collect();

        let monthly_expenses = monthly_trend(&all);

        let recent_books = books
            .iter()
            .take(recent_limit)
            .map(|book| {
                let category = categories.iter().find(|c| c.id == book.category_id);
                RecentBook {
                    id: book.id.clone(),
                    title: book.title.clone(),
                    author: book.author.clone(),
                    distribution_expense: book.distribution_expense,
                    category_name: category.map(|c| c.name.clone()),
                    category_color: category.map(|c| c.color.clone()),
                }
            })
            .collect();

        DashboardStats {
            total_expense,
            book_count: books.len(),
            category_count: categories.len(),
            average_expense: ratio(total_expense, books.len() as f64),
            expenses_by_category,
            monthly_expenses,
            recent_books,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total expenses: ${:.2} | Books: {} | Categories: {} | Average: ${:.2}",
            self.total_expense, self.book_count, self.category_count, self.average_expense
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sample::{sample_books, sample_categories};
    use crate::entities::{NewBook, NewCategory};

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::compute(&[], &[], 5);

        assert_eq!(stats.total_expense, 0.0);
        assert_eq!(stats.average_expense, 0.0);
        assert_eq!(stats.book_count, 0);
        assert!(stats.expenses_by_category.is_empty());
        assert!(stats.monthly_expenses.is_empty());
        assert!(stats.recent_books.is_empty());
    }

    #[test]
    fn test_sample_dashboard() {
        let books = sample_books();
        let categories = sample_categories();

        let stats = DashboardStats::compute(&books, &categories, 5);

        assert_eq!(stats.book_count, 6);
        assert_eq!(stats.category_count, 3);
        assert_eq!(stats.recent_books.len(), 5);
        assert_eq!(stats.recent_books[0].title, books[0].title);
        assert_eq!(stats.recent_books[0].category_label(), "Business Analytics");
        assert_eq!(stats.expenses_by_category.len(), 3);
        assert!((stats.total_expense - 729.6).abs() < 1e-9);
    }

    #[test]
    fn test_dashboard_monthly_expenses() {
        let categories = vec![Category::new(NewCategory::named("Fiction"))];
        let book = |date: &str, expense: f64| {
            Book::new(NewBook {
                publishing_date: date.to_string(),
                category_id: categories[0].id.clone(),
                distribution_expense: expense,
                ..NewBook::default()
            })
        };
        let books = vec![
            book("2024-03-02", 10.0),
            book("2023-11-20", 4.0),
            book("2024-03-28", 6.5),
            book("undated", 100.0),
        ];

        let stats = DashboardStats::compute(&books, &categories, 5);

        let months: Vec<(&str, f64, usize)> = stats
            .monthly_expenses
            .iter()
            .map(|b| (b.month.as_str(), b.total_expense, b.book_count))
            .collect();
        assert_eq!(months, vec![("2023-11", 4.0, 1), ("2024-03", 16.5, 2)]);
        assert_eq!(stats.total_expense, 120.5);
    }

    #[test]
    fn test_dashboard_unknown_category() {
        let categories = vec![Category::new(NewCategory::named("Empty"))];
        let books = vec![Book::new(NewBook {
            title: "Orphan".to_string(),
            category_id: "missing".to_string(),
            distribution_expense: 12.0,
            ..NewBook::default()
        })];

        let stats = DashboardStats::compute(&books, &categories, 5);

        assert_eq!(stats.recent_books[0].category_label(), "Unknown");
        assert_eq!(stats.recent_books[0].category_color, None);
        assert!(stats.expenses_by_category.is_empty());
        assert_eq!(stats.total_expense, 12.0);
        assert!(stats.summary().contains("Books: 1"));
    }
}
