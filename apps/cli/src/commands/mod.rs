//! CLI command implementations.

mod auth;
mod blogs;
mod recipes;
mod reports;

pub use auth::{login, logout, register, status, RegisterArgs};
pub use blogs::{blogs_add, blogs_delete, blogs_edit, blogs_list, BlogFields};
pub use recipes::{recipes_add, recipes_delete, recipes_edit, recipes_list, RecipeFields};
pub use reports::reports;

use anyhow::{anyhow, bail, Result};
use eco_api_client::{ApiClient, LookupApi, LookupTable};
use eco_config_and_utils::{Config, Paths};
use eco_session::{Session, SessionStore};
use eco_types::{Lookup, ValidationIssue};
use tracing::warn;

/// Everything a command needs: the API client and the local session.
pub struct Context {
    pub api: ApiClient,
    pub session: SessionStore,
}

impl Context {
    pub fn open(paths: Paths, config: Config) -> Result<Self> {
        paths.ensure_dirs()?;
        let api = ApiClient::from_config(&config)?;
        let storage = eco_storage::create_storage(&paths)?;
        Ok(Self {
            api,
            session: SessionStore::open(storage),
        })
    }

    /// The current session, if its role passes `allowed`.
    ///
    /// This only decides what the CLI offers; the API receives no
    /// credential with the following requests.
    pub fn require(&self, allowed: fn(&Session) -> bool, action: &str) -> Result<Session> {
        let session = self
            .session
            .current_session()
            .ok_or_else(|| anyhow!("Not logged in. Run 'ecodelicias login' first"))?;
        if !allowed(&session) {
            bail!("Your account is not allowed to {}", action);
        }
        Ok(session)
    }
}

/// Fold validation issues into one error message.
fn invalid(issues: Vec<ValidationIssue>) -> anyhow::Error {
    let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
    anyhow!("{}", messages.join("; "))
}

/// Fetch a lookup table; failures degrade to an empty table so labels
/// show the placeholder.
async fn lookup_table<L: Lookup>(api: &ApiClient) -> LookupTable<L> {
    match api.lookup::<L>().list().await {
        Ok(entries) => LookupTable::new(entries),
        Err(e) => {
            warn!(collection = L::COLLECTION, error = %e, "Lookup unavailable");
            LookupTable::default()
        }
    }
}
