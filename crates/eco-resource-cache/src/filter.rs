//! Read-side projections over a cached collection.

use eco_types::{EcologicalBlog, Recipe};

pub trait RecordFilter<T: Clone> {
    fn matches(&self, record: &T) -> bool;

    /// Matching records in collection order.
    fn apply(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

fn title_contains(title: &str, search: &str) -> bool {
    search.is_empty() || title.to_lowercase().contains(&search.to_lowercase())
}

/// Case-insensitive title search plus optional category and difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub search: String,
    pub category_id: Option<i64>,
    pub difficulty_id: Option<i64>,
}

impl RecordFilter<Recipe> for RecipeFilter {
    fn matches(&self, recipe: &Recipe) -> bool {
        title_contains(&recipe.title, &self.search)
            && self.category_id.map_or(true, |id| recipe.category_id == id)
            && self.difficulty_id.map_or(true, |id| recipe.difficulty_id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    pub search: String,
}

impl RecordFilter<EcologicalBlog> for BlogFilter {
    fn matches(&self, blog: &EcologicalBlog) -> bool {
        title_contains(&blog.title, &self.search)
    }
}
