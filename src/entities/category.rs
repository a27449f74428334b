// 🏷️ Category Entity - Groups books for expense reporting
//
// "Category name is a VALUE (can change), Category UUID is IDENTITY (never changes)"
//
// - Renaming a category never breaks the books that reference it
// - color is a display hint ("#2563eb"), stored verbatim and never validated

use serde::{Deserialize, Serialize};

/// Baseline color given to categories imported without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#2563eb";

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identity (UUID) - NEVER changes
    pub id: String,

    /// Category name (e.g., "Data Science")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Color for charts (e.g., "#dc2626")
    pub color: String,
}

impl Category {
    /// Create new category entity with UUID
    pub fn new(values: NewCategory) -> Self {
        Self::with_id(super::new_id(), values)
    }

    pub(crate) fn with_id(id: String, values: NewCategory) -> Self {
        Category {
            id,
            name: values.name,
            description: values.description,
            color: values.color,
        }
    }

    /// The editable values of this category
    pub fn values(&self) -> NewCategory {
        NewCategory {
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
        }
    }
}

/// Category values without identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
}

impl NewCategory {
    pub fn named(name: &str) -> Self {
        NewCategory {
            name: name.to_string(),
            description: None,
            color: DEFAULT_CATEGORY_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation() {
        let category = Category::new(NewCategory::named("Data Science"));

        assert!(!category.id.is_empty());
        assert_eq!(category.name, "Data Science");
        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(category.description, None);
    }

    #[test]
    fn test_category_with_display() {
        let category = Category::new(
            NewCategory::named("Python Programming")
                .with_color("#059669")
                .with_description("Python development and programming"),
        );

        assert_eq!(category.color, "#059669");
        assert_eq!(
            category.description,
            Some("Python development and programming".to_string())
        );
    }

    #[test]
    fn test_category_color_is_not_validated() {
        let category = Category::new(NewCategory::named("Odd").with_color("purple-ish"));
        assert_eq!(category.color, "purple-ish");
    }

    #[test]
    fn test_category_values_roundtrip_keeps_identity_out() {
        let category = Category::new(NewCategory::named("Business Analytics"));
        let rebuilt = Category::with_id(category.id.clone(), category.values());

        assert_eq!(rebuilt, category);
    }
}
