//! Recipe commands.

use super::{invalid, lookup_table, Context};
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args;
use eco_resource_cache::{RecipeCache, RecipeFilter};
use eco_session::Session;
use eco_types::{Category, Difficulty, NewRecipe, RecipeForm};

/// Editable recipe fields. On edit, omitted fields keep their current value.
#[derive(Args)]
pub struct RecipeFields {
    #[arg(long)]
    title: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Preparation time, e.g. "30 min"
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    ingredients: Option<String>,
    #[arg(long)]
    steps: Option<String>,
    #[arg(long)]
    tips: Option<String>,
    /// Category ID
    #[arg(long)]
    category: Option<i64>,
    /// Difficulty ID
    #[arg(long)]
    difficulty: Option<i64>,
}

impl RecipeFields {
    fn apply_to(self, form: RecipeForm) -> RecipeForm {
        RecipeForm {
            title: self.title.unwrap_or(form.title),
            image: self.image.unwrap_or(form.image),
            description: self.description.unwrap_or(form.description),
            time: self.time.unwrap_or(form.time),
            ingredients: self.ingredients.unwrap_or(form.ingredients),
            steps: self.steps.unwrap_or(form.steps),
            tips: self.tips.unwrap_or(form.tips),
            category_id: self.category.unwrap_or(form.category_id),
            difficulty_id: self.difficulty.unwrap_or(form.difficulty_id),
        }
    }
}

async fn mounted_cache(ctx: &Context) -> Result<RecipeCache> {
    let cache = RecipeCache::new(ctx.api.resource());
    cache.mount().await?;
    Ok(cache)
}

fn require_chef(ctx: &Context) -> Result<Session> {
    ctx.require(Session::can_manage_recipes, "manage recipes")
}

/// List recipes matching `filter`.
pub async fn recipes_list(ctx: &Context, filter: RecipeFilter, format: &OutputFormat) -> Result<()> {
    let (cache, categories, difficulties) = tokio::join!(
        mounted_cache(ctx),
        lookup_table::<Category>(&ctx.api),
        lookup_table::<Difficulty>(&ctx.api)
    );
    let recipes = cache?.filtered(&filter);

    match format {
        OutputFormat::Text => {
            if recipes.is_empty() {
                println!("No recipes found");
                return Ok(());
            }
            println!(
                "{:<6} {:<32} {:<16} {:<12} {}",
                "ID", "Title", "Category", "Difficulty", "Time"
            );
            output::print_divider();
            for recipe in &recipes {
                println!(
                    "{:<6} {:<32} {:<16} {:<12} {}",
                    recipe.recipes_id,
                    output::truncate(&recipe.title, 32),
                    output::truncate(categories.label_or_placeholder(recipe.category_id), 16),
                    output::truncate(difficulties.label_or_placeholder(recipe.difficulty_id), 12),
                    recipe.time
                );
            }
        }
        OutputFormat::Json => output::print_json(&recipes)?,
    }
    Ok(())
}

/// Add a recipe owned by the logged-in user.
pub async fn recipes_add(ctx: &Context, fields: RecipeFields, format: &OutputFormat) -> Result<()> {
    let session = require_chef(ctx)?;
    let category = fields
        .category
        .ok_or_else(|| anyhow!("--category is required"))?;
    let difficulty = fields
        .difficulty
        .ok_or_else(|| anyhow!("--difficulty is required"))?;

    let form = fields.apply_to(RecipeForm {
        category_id: category,
        difficulty_id: difficulty,
        ..RecipeForm::default()
    });
    form.validate().map_err(invalid)?;

    let cache = mounted_cache(ctx).await?;
    let created = cache
        .create(NewRecipe::stamped(form, session.id, Utc::now()))
        .await?;

    match format {
        OutputFormat::Text => println!("Recipe created: {} ({})", created.title, created.recipes_id),
        OutputFormat::Json => output::print_json(&created)?,
    }
    Ok(())
}

/// Edit a recipe; the full merged record is sent.
pub async fn recipes_edit(
    ctx: &Context,
    id: i64,
    fields: RecipeFields,
    format: &OutputFormat,
) -> Result<()> {
    require_chef(ctx)?;
    let cache = mounted_cache(ctx).await?;
    let current = cache
        .get(id)
        .ok_or_else(|| anyhow!("Recipe {} not found", id))?;

    let form = fields.apply_to(current.to_form());
    form.validate().map_err(invalid)?;
    let updated = current.merged_with(form);
    cache.update(updated.clone()).await?;

    match format {
        OutputFormat::Text => println!("Recipe updated: {} ({})", updated.title, id),
        OutputFormat::Json => output::print_json(&updated)?,
    }
    Ok(())
}

/// Delete a recipe.
pub async fn recipes_delete(ctx: &Context, id: i64, format: &OutputFormat) -> Result<()> {
    require_chef(ctx)?;
    let cache = mounted_cache(ctx).await?;
    if cache.get(id).is_none() {
        return Err(anyhow!("Recipe {} not found", id));
    }

    cache.delete(id).await?;
    output::print_success(&format!("Recipe {} deleted", id), format);
    Ok(())
}
