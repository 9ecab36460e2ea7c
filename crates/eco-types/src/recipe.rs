//! Recipes collection.

use crate::resource::{iso_timestamp, Resource, ResourceId};
use crate::validation::{require, ValidationIssue, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipes_id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub creation_date: String,
    pub difficulty_id: i64,
    pub category_id: i64,
    #[serde(default)]
    pub user_id: i64,
}

/// Create payload: a recipe without its server-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub image: String,
    pub description: String,
    pub time: String,
    pub ingredients: String,
    pub steps: String,
    pub tips: String,
    pub creation_date: String,
    pub difficulty_id: i64,
    pub category_id: i64,
    /// Author. Left out of the payload when the session has no user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// The fields a user edits on the recipe form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeForm {
    pub title: String,
    pub image: String,
    pub description: String,
    pub time: String,
    pub ingredients: String,
    pub steps: String,
    pub tips: String,
    pub difficulty_id: i64,
    pub category_id: i64,
}

impl RecipeForm {
    pub fn validate(&self) -> ValidationResult {
        let mut issues = Vec::new();
        require(&mut issues, "title", &self.title, "Please enter a title");
        ValidationIssue::into_result(issues)
    }
}

impl NewRecipe {
    /// Build the create payload, stamping the creation date and owner.
    pub fn stamped(form: RecipeForm, owner: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            title: form.title.trim().to_string(),
            image: form.image,
            description: form.description,
            time: form.time,
            ingredients: form.ingredients,
            steps: form.steps,
            tips: form.tips,
            creation_date: iso_timestamp(now),
            difficulty_id: form.difficulty_id,
            category_id: form.category_id,
            user_id: owner,
        }
    }
}

impl Recipe {
    /// The full record to send on update: edited fields win over the cached
    /// ones; identity, owner and creation date are kept.
    pub fn merged_with(&self, form: RecipeForm) -> Recipe {
        Recipe {
            recipes_id: self.recipes_id,
            title: form.title.trim().to_string(),
            image: form.image,
            description: form.description,
            time: form.time,
            ingredients: form.ingredients,
            steps: form.steps,
            tips: form.tips,
            creation_date: self.creation_date.clone(),
            difficulty_id: form.difficulty_id,
            category_id: form.category_id,
            user_id: self.user_id,
        }
    }

    /// The editable part of this record, e.g. to pre-fill an edit form.
    pub fn to_form(&self) -> RecipeForm {
        RecipeForm {
            title: self.title.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            time: self.time.clone(),
            ingredients: self.ingredients.clone(),
            steps: self.steps.clone(),
            tips: self.tips.clone(),
            difficulty_id: self.difficulty_id,
            category_id: self.category_id,
        }
    }
}

impl Resource for Recipe {
    type Draft = NewRecipe;

    const COLLECTION: &'static str = "Recipes";
    const LABEL: &'static str = "recipes";

    fn id(&self) -> ResourceId {
        self.recipes_id
    }

    fn title(&self) -> &str {
        &self.title
    }
}
