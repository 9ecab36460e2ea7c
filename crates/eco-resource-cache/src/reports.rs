//! Admin dashboard data: five collections loaded together.

use crate::cache::{race, CacheCore, CacheEvent, LoadGuard};
use crate::cache_fsm::CacheState;
use crate::{CacheError, CacheResult};
use async_trait::async_trait;
use eco_api_client::{ApiClient, ClientResult, LookupApi, ResourceApi};
use eco_types::{Category, Country, Difficulty, Lookup, Recipe, User};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Displayable message when any of the report collections fails to load.
pub const REPORTS_ERROR: &str = "Could not load reports";

const USER_COLLECTION: &str = "User";

/// Where report data comes from.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn users(&self) -> ClientResult<Vec<User>>;
    async fn categories(&self) -> ClientResult<Vec<Category>>;
    async fn countries(&self) -> ClientResult<Vec<Country>>;
    async fn difficulties(&self) -> ClientResult<Vec<Difficulty>>;
    async fn recipes(&self) -> ClientResult<Vec<Recipe>>;
}

#[async_trait]
impl ReportSource for ApiClient {
    async fn users(&self) -> ClientResult<Vec<User>> {
        self.list_collection(USER_COLLECTION, "users").await
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.lookup::<Category>().list().await
    }

    async fn countries(&self) -> ClientResult<Vec<Country>> {
        self.lookup::<Country>().list().await
    }

    async fn difficulties(&self) -> ClientResult<Vec<Difficulty>> {
        self.lookup::<Difficulty>().list().await
    }

    async fn recipes(&self) -> ClientResult<Vec<Recipe>> {
        self.resource::<Recipe>().list().await
    }
}

#[async_trait]
impl<S: ReportSource + ?Sized> ReportSource for std::sync::Arc<S> {
    async fn users(&self) -> ClientResult<Vec<User>> {
        (**self).users().await
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        (**self).categories().await
    }

    async fn countries(&self) -> ClientResult<Vec<Country>> {
        (**self).countries().await
    }

    async fn difficulties(&self) -> ClientResult<Vec<Difficulty>> {
        (**self).difficulties().await
    }

    async fn recipes(&self) -> ClientResult<Vec<Recipe>> {
        (**self).recipes().await
    }
}

/// One bar or pie slice of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub count: usize,
}

impl ReportRow {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminReport {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub countries: Vec<Country>,
    pub difficulties: Vec<Difficulty>,
    pub recipes: Vec<Recipe>,
}

impl AdminReport {
    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    pub fn total_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn total_countries(&self) -> usize {
        self.countries.len()
    }

    pub fn total_difficulties(&self) -> usize {
        self.difficulties.len()
    }

    pub fn total_recipes(&self) -> usize {
        self.recipes.len()
    }

    /// Recipe counts per difficulty, in difficulty order; zero counts omitted.
    pub fn recipes_by_difficulty(&self) -> Vec<ReportRow> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for recipe in &self.recipes {
            *counts.entry(recipe.difficulty_id).or_default() += 1;
        }

        self.difficulties
            .iter()
            .filter_map(|d| {
                let count = counts.get(&d.id()).copied().unwrap_or(0);
                (count > 0).then(|| ReportRow::new(d.label(), count))
            })
            .collect()
    }

    /// Recipe counts per author country, ordered by country id.
    ///
    /// Recipes whose author is not among the users are skipped; a country id
    /// with no lookup entry is labelled `Country {id}`.
    pub fn recipes_by_country(&self) -> Vec<ReportRow> {
        let user_country: HashMap<i64, i64> = self
            .users
            .iter()
            .map(|u| (u.user_id, u.country_id))
            .collect();

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for recipe in &self.recipes {
            if let Some(&country_id) = user_country.get(&recipe.user_id) {
                *counts.entry(country_id).or_default() += 1;
            }
        }

        counts
            .into_iter()
            .map(|(country_id, count)| {
                let label = self
                    .countries
                    .iter()
                    .find(|c| c.id() == country_id)
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|| format!("Country {}", country_id));
                ReportRow::new(label, count)
            })
            .collect()
    }

    /// Recipe counts for every category, zero counts included.
    pub fn recipes_by_category(&self) -> Vec<ReportRow> {
        self.categories
            .iter()
            .map(|c| {
                let count = self
                    .recipes
                    .iter()
                    .filter(|r| r.category_id == c.id())
                    .count();
                ReportRow::new(c.label(), count)
            })
            .collect()
    }
}

/// Cache for the admin dashboard.
///
/// Follows the same load states as [`ResourceCache`](crate::ResourceCache);
/// a failed refresh keeps the previous report.
pub struct ReportsCache<S: ReportSource> {
    source: S,
    core: CacheCore<Option<AdminReport>>,
}

impl<S: ReportSource> ReportsCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            core: CacheCore::new("reports"),
        }
    }

    pub async fn mount(&self) -> CacheResult<()> {
        let Some(load) = self.core.begin_mount()? else {
            return Ok(());
        };
        self.load(load).await
    }

    pub async fn refresh(&self) -> CacheResult<()> {
        let load = self.core.begin_refresh()?;
        self.load(load).await
    }

    async fn load(&self, load: LoadGuard<'_, Option<AdminReport>>) -> CacheResult<()> {
        let source = &self.source;
        let fetch = async {
            tokio::try_join!(
                source.users(),
                source.categories(),
                source.countries(),
                source.difficulties(),
                source.recipes()
            )
        };

        let Some(result) = race(load.token(), fetch).await else {
            debug!("Reports load cancelled");
            return Err(CacheError::Cancelled);
        };

        let result = result.map(|(users, categories, countries, difficulties, recipes)| {
            let report = AdminReport {
                users,
                categories,
                countries,
                difficulties,
                recipes,
            };
            info!(
                users = report.total_users(),
                recipes = report.total_recipes(),
                "Reports loaded"
            );
            Some(report)
        });

        load.finish(result, |_| REPORTS_ERROR.to_string())
    }

    /// The last successfully loaded report.
    pub fn report(&self) -> Option<AdminReport> {
        (*self.core.snapshot()).clone()
    }

    pub fn detach(&self) {
        self.core.detach();
    }

    pub fn state(&self) -> CacheState {
        self.core.state()
    }

    pub fn last_error(&self) -> Option<String> {
        self.core.last_error()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.core.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, user_id: i64, category_id: i64, difficulty_id: i64) -> Recipe {
        Recipe {
            recipes_id: id,
            title: format!("Recipe {id}"),
            image: String::new(),
            description: String::new(),
            time: String::new(),
            ingredients: String::new(),
            steps: String::new(),
            tips: String::new(),
            creation_date: String::new(),
            difficulty_id,
            category_id,
            user_id,
        }
    }

    fn sample_report() -> AdminReport {
        AdminReport {
            users: vec![
                User {
                    user_id: 1,
                    country_id: 2,
                },
                User {
                    user_id: 2,
                    country_id: 1,
                },
                User {
                    user_id: 3,
                    country_id: 9,
                },
            ],
            categories: vec![
                Category {
                    category_id: 1,
                    category: "Postres".to_string(),
                },
                Category {
                    category_id: 2,
                    category: "Sopas".to_string(),
                },
                Category {
                    category_id: 3,
                    category: "Bebidas".to_string(),
                },
            ],
            countries: vec![
                Country {
                    country_id: 1,
                    country: "Colombia".to_string(),
                },
                Country {
                    country_id: 2,
                    country: "México".to_string(),
                },
            ],
            difficulties: vec![
                Difficulty {
                    difficulty_id: 1,
                    difficulty: "Fácil".to_string(),
                },
                Difficulty {
                    difficulty_id: 2,
                    difficulty: "Media".to_string(),
                },
                Difficulty {
                    difficulty_id: 3,
                    difficulty: "Difícil".to_string(),
                },
            ],
            recipes: vec![
                recipe(10, 1, 1, 1),
                recipe(11, 1, 1, 3),
                recipe(12, 2, 2, 1),
                recipe(13, 3, 1, 1),
                recipe(14, 99, 2, 1),
            ],
        }
    }

    #[test]
    fn totals() {
        let report = sample_report();
        assert_eq!(report.total_users(), 3);
        assert_eq!(report.total_categories(), 3);
        assert_eq!(report.total_countries(), 2);
        assert_eq!(report.total_difficulties(), 3);
        assert_eq!(report.total_recipes(), 5);
    }

    #[test]
    fn by_difficulty_omits_empty_difficulties() {
        assert_eq!(
            sample_report().recipes_by_difficulty(),
            vec![ReportRow::new("Fácil", 4), ReportRow::new("Difícil", 1)]
        );
    }

    #[test]
    fn by_country_joins_authors_and_labels_unknown_countries() {
        assert_eq!(
            sample_report().recipes_by_country(),
            vec![
                ReportRow::new("Colombia", 1),
                ReportRow::new("México", 2),
                ReportRow::new("Country 9", 1),
            ]
        );
    }

    #[test]
    fn by_category_includes_zero_counts() {
        assert_eq!(
            sample_report().recipes_by_category(),
            vec![
                ReportRow::new("Postres", 3),
                ReportRow::new("Sopas", 2),
                ReportRow::new("Bebidas", 0),
            ]
        );
    }

    #[test]
    fn empty_report_has_no_rows() {
        let report = AdminReport::default();
        assert!(report.recipes_by_difficulty().is_empty());
        assert!(report.recipes_by_country().is_empty());
        assert!(report.recipes_by_category().is_empty());
    }
}
