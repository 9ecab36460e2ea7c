//! In-memory remote collections for cache tests.
//!
//! Every call can be held at a gate until the test releases it, which makes
//! response arrival order controllable.

use async_trait::async_trait;
use eco_api_client::{ClientError, ClientResult, ResourceApi, WriteOperation};
use eco_types::{NewRecipe, Recipe, ResourceId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

pub fn recipe(id: i64, title: &str) -> Recipe {
    Recipe {
        recipes_id: id,
        title: title.to_string(),
        image: String::new(),
        description: String::new(),
        time: "30 min".to_string(),
        ingredients: String::new(),
        steps: String::new(),
        tips: String::new(),
        creation_date: "2025-01-01T00:00:00.000Z".to_string(),
        difficulty_id: 1,
        category_id: 1,
        user_id: 7,
    }
}

pub fn draft(title: &str) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        image: String::new(),
        description: String::new(),
        time: "30 min".to_string(),
        ingredients: String::new(),
        steps: String::new(),
        tips: String::new(),
        creation_date: "2025-01-01T00:00:00.000Z".to_string(),
        difficulty_id: 1,
        category_id: 1,
        user_id: Some(7),
    }
}

/// Fake Recipes collection.
#[derive(Default)]
pub struct FakeRecipes {
    remote: Mutex<Vec<Recipe>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    failures: Mutex<VecDeque<ClientError>>,
}

impl FakeRecipes {
    pub fn with_records(records: Vec<Recipe>) -> Arc<Self> {
        let next_id = records.iter().map(|r| r.recipes_id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            remote: Mutex::new(records),
            next_id: AtomicI64::new(next_id),
            ..Default::default()
        })
    }

    /// Hold the next call until the returned sender fires (or is dropped).
    pub fn gate_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }

    /// Fail the next call with a fetch error.
    pub fn fail_next_fetch(&self) {
        self.failures.lock().push_back(ClientError::FetchFailed {
            collection: "recipes",
            reason: "HTTP 503 Service Unavailable".to_string(),
        });
    }

    /// Fail the next call with a write error.
    pub fn fail_next_write(&self, operation: WriteOperation) {
        self.failures.lock().push_back(ClientError::WriteFailed {
            collection: "recipes",
            operation,
            reason: "HTTP 500 Internal Server Error".to_string(),
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` calls have started.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("calls were not issued in time");
    }

    pub fn set_remote(&self, records: Vec<Recipe>) {
        *self.remote.lock() = records;
    }

    async fn enter(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let failure = self.failures.lock().pop_front();
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceApi<Recipe> for FakeRecipes {
    async fn list(&self) -> ClientResult<Vec<Recipe>> {
        self.enter().await?;
        Ok(self.remote.lock().clone())
    }

    async fn create(&self, draft: &NewRecipe) -> ClientResult<Recipe> {
        self.enter().await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Recipe {
            recipes_id: id,
            title: draft.title.clone(),
            image: draft.image.clone(),
            description: draft.description.clone(),
            time: draft.time.clone(),
            ingredients: draft.ingredients.clone(),
            steps: draft.steps.clone(),
            tips: draft.tips.clone(),
            creation_date: draft.creation_date.clone(),
            difficulty_id: draft.difficulty_id,
            category_id: draft.category_id,
            user_id: draft.user_id.unwrap_or_default(),
        };
        self.remote.lock().push(created.clone());
        Ok(created)
    }

    async fn update(&self, record: &Recipe) -> ClientResult<()> {
        self.enter().await?;
        let mut remote = self.remote.lock();
        if let Some(slot) = remote.iter_mut().find(|r| r.recipes_id == record.recipes_id) {
            *slot = record.clone();
        }
        Ok(())
    }

    async fn remove(&self, id: ResourceId) -> ClientResult<()> {
        self.enter().await?;
        self.remote.lock().retain(|r| r.recipes_id != id);
        Ok(())
    }
}
