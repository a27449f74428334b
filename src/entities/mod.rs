// Entity Models - Books and the categories they are filed under
//
// Each entity has:
// - System-assigned identity (UUID) that NEVER changes
// - User-editable values, supplied through New* payloads
// - No enforced referential integrity (Book.category_id may dangle)

pub mod book;
pub mod category;
pub mod sample;

pub use book::{normalize_expense, parse_publishing_date, Book, NewBook};
pub use category::{Category, NewCategory, DEFAULT_CATEGORY_COLOR};

/// Fresh opaque identifier for a record
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
