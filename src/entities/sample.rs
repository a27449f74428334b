// Built-in sample data - what the application starts with before any import

use super::{Book, Category, NewBook, NewCategory};

/// Sample categories, in display order
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::with_id(
            "cat1".to_string(),
            NewCategory::named("Business Analytics")
                .with_color("#2563eb")
                .with_description("Books about business and analytics"),
        ),
        Category::with_id(
            "cat2".to_string(),
            NewCategory::named("Python Programming")
                .with_color("#059669")
                .with_description("Python development and programming"),
        ),
        Category::with_id(
            "cat3".to_string(),
            NewCategory::named("Data Science")
                .with_color("#dc2626")
                .with_description("Data analysis and machine learning"),
        ),
    ]
}

/// Sample books referencing [`sample_categories`] by id
pub fn sample_books() -> Vec<Book> {
    let rows: [(&str, &str, &str, &str, &str, f64, &str); 6] = [
        ("1", "Data-Driven Decisions", "Maria Lopez", "2024-01-15", "cat1", 125.50, "978-1-4028-9462-6"),
        ("2", "Practical Python", "Alan Reed", "2024-02-20", "cat2", 89.75, "978-0-596-52068-7"),
        ("3", "Machine Learning Basics", "Priya Shah", "2024-02-28", "cat3", 210.00, "978-1-4919-6229-9"),
        ("4", "Dashboards That Work", "Tom Becker", "2024-04-02", "cat1", 64.20, "978-1-118-92947-2"),
        ("5", "Async Python in Practice", "Alan Reed", "2024-05-11", "cat2", 142.35, "978-1-0981-1565-1"),
        ("6", "Statistics for Analysts", "Priya Shah", "2024-06-30", "cat3", 97.80, "978-1-4493-6176-9"),
    ];

    rows.iter()
        .map(|&(id, title, author, date, category_id, expense, isbn)| {
            Book::with_id(
                id.to_string(),
                NewBook {
                    title: title.to_string(),
                    author: author.to_string(),
                    publishing_date: date.to_string(),
                    category_id: category_id.to_string(),
                    distribution_expense: expense,
                    isbn: Some(isbn.to_string()),
                    description: None,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_books_reference_sample_categories() {
        let category_ids: HashSet<String> =
            sample_categories().into_iter().map(|c| c.id).collect();

        for book in sample_books() {
            assert!(category_ids.contains(&book.category_id), "{}", book.title);
            assert!(book.published_on().is_some());
        }
    }

    #[test]
    fn test_sample_ids_are_unique() {
        let books = sample_books();
        let ids: HashSet<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), books.len());
    }
}
