//! Generic collection cache with confirm-then-apply mutations.

use crate::cache_fsm::{CacheMachine, CacheMachineInput, CacheState};
use crate::filter::RecordFilter;
use crate::{CacheError, CacheResult};
use eco_api_client::{ClientError, ResourceApi, ResourceClient};
use eco_types::{EcologicalBlog, Recipe, Resource, ResourceId};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// What an applied change did to the cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheChange {
    Loaded,
    LoadFailed,
    Appended(ResourceId),
    Replaced(ResourceId),
    Removed(ResourceId),
    /// The cache was detached and emptied.
    Reset,
}

/// Published after every applied change. `version` increases by one per
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEvent {
    pub version: u64,
    pub state: CacheState,
    pub change: CacheChange,
}

struct Inner<D> {
    fsm: CacheMachine,
    data: Arc<D>,
    last_error: Option<String>,
    version: u64,
    lifetime: CancellationToken,
}

/// State, snapshot and lifetime bookkeeping shared by every cache kind.
pub(crate) struct CacheCore<D> {
    name: &'static str,
    inner: Mutex<Inner<D>>,
    events: broadcast::Sender<CacheEvent>,
}

/// Await `call` unless `token` is cancelled first. `None` means cancelled.
pub(crate) async fn race<F: Future>(token: &CancellationToken, call: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = call => Some(output),
    }
}

impl<D: Clone + Default> CacheCore<D> {
    pub(crate) fn new(name: &'static str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            name,
            inner: Mutex::new(Inner {
                fsm: CacheMachine::new(),
                data: Arc::new(D::default()),
                last_error: None,
                version: 0,
                lifetime: CancellationToken::new(),
            }),
            events,
        }
    }

    fn transition(
        &self,
        inner: &mut Inner<D>,
        input: &CacheMachineInput,
    ) -> CacheResult<CacheState> {
        let old_state = CacheState::from(inner.fsm.state());
        inner.fsm.consume(input).map_err(|_| {
            CacheError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                inner.fsm.state()
            ))
        })?;
        let new_state = CacheState::from(inner.fsm.state());
        debug!(
            cache = self.name,
            old_state = ?old_state,
            new_state = ?new_state,
            "Cache state transition"
        );
        Ok(new_state)
    }

    fn publish(&self, inner: &mut Inner<D>, change: CacheChange) -> CacheEvent {
        inner.version += 1;
        CacheEvent {
            version: inner.version,
            state: CacheState::from(inner.fsm.state()),
            change,
        }
    }

    fn send(&self, event: CacheEvent) {
        let _ = self.events.send(event);
    }

    /// Enter `Loading` for the first load. `None` when already mounted.
    pub(crate) fn begin_mount(&self) -> CacheResult<Option<LoadGuard<'_, D>>> {
        let mut inner = self.inner.lock();
        if CacheState::from(inner.fsm.state()) != CacheState::Uninitialized {
            debug!(cache = self.name, "Already mounted");
            return Ok(None);
        }
        self.transition(&mut inner, &CacheMachineInput::Mount)?;
        Ok(Some(LoadGuard::new(self, inner.lifetime.child_token(), true)))
    }

    pub(crate) fn begin_refresh(&self) -> CacheResult<LoadGuard<'_, D>> {
        let mut inner = self.inner.lock();
        self.transition(&mut inner, &CacheMachineInput::Refresh)?;
        Ok(LoadGuard::new(self, inner.lifetime.child_token(), false))
    }

    /// Leave `Loading` after a load was dropped before it finished. An
    /// abandoned first load returns to `Uninitialized`; an abandoned refresh
    /// ends in `Failed` with the previous data kept.
    fn abandon_load(&self, token: &CancellationToken, mounting: bool) {
        let event = {
            let mut inner = self.inner.lock();
            if token.is_cancelled()
                || CacheState::from(inner.fsm.state()) != CacheState::Loading
            {
                return;
            }
            let (input, change) = if mounting {
                (CacheMachineInput::Detach, CacheChange::Reset)
            } else {
                (CacheMachineInput::LoadFailed, CacheChange::LoadFailed)
            };
            if self.transition(&mut inner, &input).is_err() {
                return;
            }
            if !mounting {
                inner.last_error = Some(format!("Could not load {}", self.name));
            }
            self.publish(&mut inner, change)
        };
        token.cancel();
        warn!(cache = self.name, "Load dropped before completion");
        self.send(event);
    }

    /// Apply a load outcome. On failure the previous data stays visible and
    /// `message` becomes the displayable error.
    fn finish_load(
        &self,
        token: &CancellationToken,
        result: Result<D, ClientError>,
        message: impl FnOnce(&ClientError) -> String,
    ) -> CacheResult<()> {
        let (event, outcome) = {
            let mut inner = self.inner.lock();
            if token.is_cancelled() {
                debug!(cache = self.name, "Discarding load that finished after cancellation");
                return Err(CacheError::Cancelled);
            }
            match result {
                Ok(data) => {
                    self.transition(&mut inner, &CacheMachineInput::Loaded)?;
                    inner.data = Arc::new(data);
                    inner.last_error = None;
                    (self.publish(&mut inner, CacheChange::Loaded), Ok(()))
                }
                Err(e) => {
                    self.transition(&mut inner, &CacheMachineInput::LoadFailed)?;
                    warn!(cache = self.name, error = %e, "Load failed");
                    inner.last_error = Some(message(&e));
                    (
                        self.publish(&mut inner, CacheChange::LoadFailed),
                        Err(CacheError::from(e)),
                    )
                }
            }
        };
        self.send(event);
        outcome
    }

    /// Record a failed mutation for display. Ignored once `token` is cancelled.
    pub(crate) fn record_failure(&self, token: &CancellationToken, error: &ClientError) {
        if token.is_cancelled() {
            return;
        }
        warn!(cache = self.name, error = %error, "Mutation failed");
        self.inner.lock().last_error = Some(error.summary());
    }

    /// Mutate the data in place (copy-on-write when snapshots are held).
    /// `mutate` returns `None` when nothing changed.
    pub(crate) fn apply(
        &self,
        token: &CancellationToken,
        mutate: impl FnOnce(&mut D) -> Option<CacheChange>,
    ) -> CacheResult<Option<CacheChange>> {
        let event = {
            let mut inner = self.inner.lock();
            if token.is_cancelled() {
                debug!(cache = self.name, "Discarding response that arrived after cancellation");
                return Err(CacheError::Cancelled);
            }
            let Some(change) = mutate(Arc::make_mut(&mut inner.data)) else {
                return Ok(None);
            };
            self.publish(&mut inner, change)
        };
        self.send(event);
        Ok(Some(event.change))
    }

    pub(crate) fn ensure_ready(&self) -> CacheResult<()> {
        match self.state() {
            CacheState::Ready => Ok(()),
            other => Err(CacheError::NotReady(other)),
        }
    }

    /// Cancel everything in flight and return to `Uninitialized` with empty data.
    pub(crate) fn detach(&self) {
        let event = {
            let mut inner = self.inner.lock();
            inner.lifetime.cancel();
            inner.lifetime = CancellationToken::new();
            if CacheState::from(inner.fsm.state()) == CacheState::Uninitialized {
                return;
            }
            // Detach is accepted from every mounted state.
            let _ = self.transition(&mut inner, &CacheMachineInput::Detach);
            inner.data = Arc::new(D::default());
            inner.last_error = None;
            self.publish(&mut inner, CacheChange::Reset)
        };
        info!(cache = self.name, "Cache detached");
        self.send(event);
    }

    pub(crate) fn call_token(&self) -> CancellationToken {
        self.inner.lock().lifetime.child_token()
    }

    pub(crate) fn snapshot(&self) -> Arc<D> {
        self.inner.lock().data.clone()
    }

    pub(crate) fn state(&self) -> CacheState {
        CacheState::from(self.inner.lock().fsm.state())
    }

    pub(crate) fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    pub(crate) fn version(&self) -> u64 {
        self.inner.lock().version
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }
}

/// An issued load. Dropping it before [`finish`](Self::finish) takes the
/// cache back out of `Loading`.
pub(crate) struct LoadGuard<'a, D: Clone + Default> {
    core: &'a CacheCore<D>,
    token: CancellationToken,
    mounting: bool,
    armed: bool,
}

impl<'a, D: Clone + Default> LoadGuard<'a, D> {
    fn new(core: &'a CacheCore<D>, token: CancellationToken, mounting: bool) -> Self {
        Self {
            core,
            token,
            mounting,
            armed: true,
        }
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn finish(
        mut self,
        result: Result<D, ClientError>,
        message: impl FnOnce(&ClientError) -> String,
    ) -> CacheResult<()> {
        self.armed = false;
        self.core.finish_load(&self.token, result, message)
    }
}

impl<D: Clone + Default> Drop for LoadGuard<'_, D> {
    fn drop(&mut self) {
        if self.armed {
            self.core.abandon_load(&self.token, self.mounting);
        }
    }
}

/// Local mirror of one remote collection.
///
/// Records arrive in the order of the last full fetch; creates append,
/// updates replace by identity, deletes remove by identity. Local changes are
/// applied only after the server confirms them, and when two calls race the
/// response that arrives last wins.
pub struct ResourceCache<T: Resource, C: ResourceApi<T>> {
    api: C,
    core: CacheCore<Vec<T>>,
}

pub type RecipeCache = ResourceCache<Recipe, ResourceClient<Recipe>>;
pub type BlogCache = ResourceCache<EcologicalBlog, ResourceClient<EcologicalBlog>>;

impl<T: Resource, C: ResourceApi<T>> ResourceCache<T, C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            core: CacheCore::new(T::LABEL),
        }
    }

    /// First load. A no-op when the cache is already mounted.
    pub async fn mount(&self) -> CacheResult<()> {
        let Some(load) = self.core.begin_mount()? else {
            return Ok(());
        };
        self.load(load).await
    }

    /// Reload from `Ready` or `Failed`.
    pub async fn refresh(&self) -> CacheResult<()> {
        let load = self.core.begin_refresh()?;
        self.load(load).await
    }

    async fn load(&self, load: LoadGuard<'_, Vec<T>>) -> CacheResult<()> {
        let Some(result) = race(load.token(), self.api.list()).await else {
            debug!(cache = T::LABEL, "Load cancelled");
            return Err(CacheError::Cancelled);
        };
        if let Ok(items) = &result {
            info!(cache = T::LABEL, count = items.len(), "Collection loaded");
        }
        load.finish(result, ClientError::summary)
    }

    /// A fresh token for one call; cancelled by [`detach`](Self::detach).
    pub fn call_token(&self) -> CancellationToken {
        self.core.call_token()
    }

    pub async fn create(&self, draft: T::Draft) -> CacheResult<T> {
        self.create_with(draft, self.call_token()).await
    }

    /// Create remotely, then append the server echo.
    ///
    /// An echo whose identity is already cached replaces that record, so an
    /// identity never appears twice.
    pub async fn create_with(&self, draft: T::Draft, token: CancellationToken) -> CacheResult<T> {
        self.core.ensure_ready()?;

        let created = self.confirm(&token, self.api.create(&draft)).await?;
        let id = created.id();
        let record = created.clone();
        self.core.apply(&token, move |items| {
            match items.iter_mut().find(|r| r.id() == id) {
                Some(slot) => {
                    *slot = record;
                    Some(CacheChange::Replaced(id))
                }
                None => {
                    items.push(record);
                    Some(CacheChange::Appended(id))
                }
            }
        })?;
        Ok(created)
    }

    pub async fn update(&self, record: T) -> CacheResult<()> {
        self.update_with(record, self.call_token()).await
    }

    /// Send the full record, then replace the cached one with the same
    /// identity. An identity that is no longer cached is left alone.
    pub async fn update_with(&self, record: T, token: CancellationToken) -> CacheResult<()> {
        self.core.ensure_ready()?;

        self.confirm(&token, self.api.update(&record)).await?;
        let id = record.id();
        let applied = self.core.apply(&token, move |items| {
            let slot = items.iter_mut().find(|r| r.id() == id)?;
            *slot = record;
            Some(CacheChange::Replaced(id))
        })?;
        if applied.is_none() {
            debug!(cache = T::LABEL, id, "Updated record is not cached");
        }
        Ok(())
    }

    pub async fn delete(&self, id: ResourceId) -> CacheResult<()> {
        self.delete_with(id, self.call_token()).await
    }

    pub async fn delete_with(&self, id: ResourceId, token: CancellationToken) -> CacheResult<()> {
        self.core.ensure_ready()?;

        self.confirm(&token, self.api.remove(id)).await?;
        self.core.apply(&token, move |items| {
            let before = items.len();
            items.retain(|r| r.id() != id);
            (items.len() != before).then_some(CacheChange::Removed(id))
        })?;
        Ok(())
    }

    async fn confirm<R>(
        &self,
        token: &CancellationToken,
        call: impl Future<Output = Result<R, ClientError>>,
    ) -> CacheResult<R> {
        match race(token, call).await {
            None => Err(CacheError::Cancelled),
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => {
                self.core.record_failure(token, &e);
                Err(e.into())
            }
        }
    }

    /// Cancel in-flight calls and reset to `Uninitialized`.
    pub fn detach(&self) {
        self.core.detach();
    }

    /// The current immutable collection.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.core.snapshot()
    }

    pub fn get(&self, id: ResourceId) -> Option<T> {
        self.snapshot().iter().find(|r| r.id() == id).cloned()
    }

    /// Records matching `filter`, in collection order.
    pub fn filtered<F: RecordFilter<T>>(&self, filter: &F) -> Vec<T> {
        filter.apply(&self.snapshot())
    }

    pub fn state(&self) -> CacheState {
        self.core.state()
    }

    /// Displayable message of the last failed load or mutation.
    pub fn last_error(&self) -> Option<String> {
        self.core.last_error()
    }

    pub fn version(&self) -> u64 {
        self.core.version()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.core.subscribe()
    }
}
