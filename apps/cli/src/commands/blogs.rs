//! Ecological blog commands.

use super::{invalid, Context};
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args;
use eco_resource_cache::{BlogCache, BlogFilter};
use eco_session::Session;
use eco_types::{BlogForm, NewEcologicalBlog};

/// Editable blog fields. On edit, omitted fields keep their current value.
#[derive(Args)]
pub struct BlogFields {
    #[arg(long)]
    title: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    /// Short "did you know" teaser
    #[arg(long)]
    discover: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl BlogFields {
    fn apply_to(self, form: BlogForm) -> BlogForm {
        BlogForm {
            title: self.title.unwrap_or(form.title),
            image: self.image.unwrap_or(form.image),
            discover: self.discover.unwrap_or(form.discover),
            description: self.description.unwrap_or(form.description),
        }
    }
}

async fn mounted_cache(ctx: &Context) -> Result<BlogCache> {
    let cache = BlogCache::new(ctx.api.resource());
    cache.mount().await?;
    Ok(cache)
}

fn require_admin(ctx: &Context) -> Result<Session> {
    ctx.require(Session::can_manage_blogs, "manage blog posts")
}

pub async fn blogs_list(ctx: &Context, filter: BlogFilter, format: &OutputFormat) -> Result<()> {
    let blogs = mounted_cache(ctx).await?.filtered(&filter);

    match format {
        OutputFormat::Text => {
            if blogs.is_empty() {
                println!("No blog posts found");
                return Ok(());
            }
            println!("{:<6} {:<40} {}", "ID", "Title", "Posted");
            output::print_divider();
            for blog in &blogs {
                println!(
                    "{:<6} {:<40} {}",
                    blog.ecological_blog_id,
                    output::truncate(&blog.title, 40),
                    blog.post_date
                );
            }
        }
        OutputFormat::Json => output::print_json(&blogs)?,
    }
    Ok(())
}

pub async fn blogs_add(ctx: &Context, fields: BlogFields, format: &OutputFormat) -> Result<()> {
    let session = require_admin(ctx)?;
    let form = fields.apply_to(BlogForm::default());
    form.validate().map_err(invalid)?;

    let cache = mounted_cache(ctx).await?;
    let created = cache
        .create(NewEcologicalBlog::stamped(form, session.id, Utc::now()))
        .await?;

    match format {
        OutputFormat::Text => println!(
            "Blog post created: {} ({})",
            created.title, created.ecological_blog_id
        ),
        OutputFormat::Json => output::print_json(&created)?,
    }
    Ok(())
}

pub async fn blogs_edit(
    ctx: &Context,
    id: i64,
    fields: BlogFields,
    format: &OutputFormat,
) -> Result<()> {
    require_admin(ctx)?;
    let cache = mounted_cache(ctx).await?;
    let current = cache
        .get(id)
        .ok_or_else(|| anyhow!("Blog post {} not found", id))?;

    let form = fields.apply_to(current.to_form());
    form.validate().map_err(invalid)?;
    let updated = current.merged_with(form);
    cache.update(updated.clone()).await?;

    match format {
        OutputFormat::Text => println!("Blog post updated: {} ({})", updated.title, id),
        OutputFormat::Json => output::print_json(&updated)?,
    }
    Ok(())
}

pub async fn blogs_delete(ctx: &Context, id: i64, format: &OutputFormat) -> Result<()> {
    require_admin(ctx)?;
    let cache = mounted_cache(ctx).await?;
    if cache.get(id).is_none() {
        return Err(anyhow!("Blog post {} not found", id));
    }

    cache.delete(id).await?;
    output::print_success(&format!("Blog post {} deleted", id), format);
    Ok(())
}
