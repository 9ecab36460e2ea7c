//! Admin dashboard.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use eco_resource_cache::{ReportRow, ReportsCache};
use eco_session::Session;

fn print_rows(heading: &str, rows: &[ReportRow]) {
    output::print_heading(heading);
    if rows.is_empty() {
        println!("  (no data)");
    }
    for row in rows {
        output::print_row(&row.label, &row.count.to_string());
    }
}

pub async fn reports(ctx: &Context, format: &OutputFormat) -> Result<()> {
    ctx.require(Session::can_view_reports, "view reports")?;

    let cache = ReportsCache::new(ctx.api.clone());
    if let Err(e) = cache.mount().await {
        let message = cache.last_error().unwrap_or_else(|| e.to_string());
        return Err(anyhow!(message));
    }
    let report = cache
        .report()
        .ok_or_else(|| anyhow!("Reports are not available"))?;

    match format {
        OutputFormat::Text => {
            output::print_heading("Totals");
            output::print_row("Users", &report.total_users().to_string());
            output::print_row("Recipes", &report.total_recipes().to_string());
            output::print_row("Categories", &report.total_categories().to_string());
            output::print_row("Countries", &report.total_countries().to_string());
            output::print_row("Difficulties", &report.total_difficulties().to_string());

            print_rows("Recipes by country", &report.recipes_by_country());
            print_rows("Recipes by difficulty", &report.recipes_by_difficulty());
            print_rows("Recipes by category", &report.recipes_by_category());
        }
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "total_users": report.total_users(),
                "total_recipes": report.total_recipes(),
                "total_categories": report.total_categories(),
                "total_countries": report.total_countries(),
                "total_difficulties": report.total_difficulties(),
                "recipes_by_country": report.recipes_by_country(),
                "recipes_by_difficulty": report.recipes_by_difficulty(),
                "recipes_by_category": report.recipes_by_category(),
            }))?;
        }
    }
    Ok(())
}
