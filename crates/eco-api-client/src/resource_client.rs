//! Typed CRUD access to one remote collection.

use crate::client::ensure_success;
use crate::{ApiClient, ClientError, ClientResult, WriteOperation};
use async_trait::async_trait;
use eco_types::{Resource, ResourceId};
use std::marker::PhantomData;
use std::sync::Arc;

/// The four operations a cache needs from a remote collection.
///
/// Every failure is an outcome value; implementations must not panic on
/// transport or decoding errors.
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    /// Full snapshot of the collection.
    async fn list(&self) -> ClientResult<Vec<T>>;

    /// Create a record; returns the server echo including its identity.
    async fn create(&self, draft: &T::Draft) -> ClientResult<T>;

    /// Replace a record with the full `record`. No body is returned.
    async fn update(&self, record: &T) -> ClientResult<()>;

    async fn remove(&self, id: ResourceId) -> ClientResult<()>;
}

#[async_trait]
impl<T: Resource, A: ResourceApi<T> + ?Sized> ResourceApi<T> for Arc<A> {
    async fn list(&self) -> ClientResult<Vec<T>> {
        (**self).list().await
    }

    async fn create(&self, draft: &T::Draft) -> ClientResult<T> {
        (**self).create(draft).await
    }

    async fn update(&self, record: &T) -> ClientResult<()> {
        (**self).update(record).await
    }

    async fn remove(&self, id: ResourceId) -> ClientResult<()> {
        (**self).remove(id).await
    }
}

/// HTTP implementation of [`ResourceApi`].
///
/// `GET` and `POST` go to the collection URL, `PUT` sends the full record to
/// the collection URL, `DELETE` targets `{collection}/{id}`.
pub struct ResourceClient<T> {
    api: ApiClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }

    pub fn endpoint(&self) -> String {
        self.api.collection_url(T::COLLECTION)
    }

    fn write_error(operation: WriteOperation, reason: impl ToString) -> ClientError {
        ClientError::write(T::LABEL, operation, reason)
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for ResourceClient<T> {
    async fn list(&self) -> ClientResult<Vec<T>> {
        self.api.list_collection(T::COLLECTION, T::LABEL).await
    }

    async fn create(&self, draft: &T::Draft) -> ClientResult<T> {
        let url = self.endpoint();
        tracing::debug!("Creating {} at {}", T::LABEL, url);

        let response = self
            .api
            .http()
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| Self::write_error(WriteOperation::Create, e))?;

        let response = ensure_success(response, "Failed to create record")
            .await
            .map_err(|reason| Self::write_error(WriteOperation::Create, reason))?;

        let created: T = response
            .json()
            .await
            .map_err(|e| Self::write_error(WriteOperation::Create, e))?;
        tracing::info!(collection = T::LABEL, id = created.id(), "Record created");
        Ok(created)
    }

    async fn update(&self, record: &T) -> ClientResult<()> {
        let url = self.endpoint();
        tracing::debug!("Updating {} {} at {}", T::LABEL, record.id(), url);

        let response = self
            .api
            .http()
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| Self::write_error(WriteOperation::Update, e))?;

        ensure_success(response, "Failed to update record")
            .await
            .map_err(|reason| Self::write_error(WriteOperation::Update, reason))?;

        tracing::info!(collection = T::LABEL, id = record.id(), "Record updated");
        Ok(())
    }

    async fn remove(&self, id: ResourceId) -> ClientResult<()> {
        let url = format!("{}/{}", self.endpoint(), id);
        tracing::debug!("Deleting {} at {}", T::LABEL, url);

        let response = self
            .api
            .http()
            .delete(&url)
            .send()
            .await
            .map_err(|e| Self::write_error(WriteOperation::Delete, e))?;

        ensure_success(response, "Failed to delete record")
            .await
            .map_err(|reason| Self::write_error(WriteOperation::Delete, reason))?;

        tracing::info!(collection = T::LABEL, id, "Record deleted");
        Ok(())
    }
}
