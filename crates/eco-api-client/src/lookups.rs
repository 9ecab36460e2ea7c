//! Read-only reference collections (categories, difficulties, ...).

use crate::{ApiClient, ClientResult};
use async_trait::async_trait;
use eco_types::Lookup;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Label shown when a foreign key has no matching lookup entry.
pub const MISSING_LABEL: &str = "—";

#[async_trait]
pub trait LookupApi<L: Lookup>: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<L>>;
}

pub struct LookupClient<L> {
    api: ApiClient,
    _marker: PhantomData<fn() -> L>,
}

impl<L> Clone for LookupClient<L> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _marker: PhantomData,
        }
    }
}

impl<L: Lookup> LookupClient<L> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }

    /// Fetch the collection and index it.
    pub async fn table(&self) -> ClientResult<LookupTable<L>> {
        Ok(LookupTable::new(self.list().await?))
    }
}

#[async_trait]
impl<L: Lookup> LookupApi<L> for LookupClient<L> {
    async fn list(&self) -> ClientResult<Vec<L>> {
        self.api.list_collection(L::COLLECTION, L::COLLECTION).await
    }
}

/// Lookup entries indexed by id, in fetch order.
#[derive(Debug, Clone)]
pub struct LookupTable<L> {
    entries: Vec<L>,
    index: HashMap<i64, usize>,
}

impl<L> Default for LookupTable<L> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<L: Lookup> LookupTable<L> {
    pub fn new(entries: Vec<L>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id(), pos))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, id: i64) -> Option<&L> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn label(&self, id: i64) -> Option<&str> {
        self.get(id).map(Lookup::label)
    }

    pub fn label_or_placeholder(&self, id: i64) -> &str {
        self.label(id).unwrap_or(MISSING_LABEL)
    }

    pub fn entries(&self) -> &[L] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
