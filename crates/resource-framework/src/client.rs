//! # Generic Client
//!
//! This module defines the session helpers every resource proxy delegates to.

use crate::error::SessionError;
use crate::message::ResourceRequest;
use crate::resource::{ListQuery, Resource};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API over a `ResourceActor<T>`. It
/// forwards create / get / update / delete / list / find requests over a Tokio mpsc channel
/// and returns results via oneshot channels. The client is cheap to clone and can be shared
/// across tasks.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – all methods resolve to `Result<…, SessionError>`.
/// * **Generic** – works with any kind that implements `Resource`.
pub struct ResourceClient<T: Resource> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Resource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Resource> std::fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &T::KIND)
            .finish()
    }
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, SessionError>>) -> ResourceRequest<T>,
    ) -> Result<R, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SessionError::BackendClosed)?;
        response.await.map_err(|_| SessionError::BackendDropped)?
    }

    #[instrument(skip(self, attrs), fields(resource = T::KIND))]
    pub async fn create(&self, attrs: T::Create) -> Result<T, SessionError> {
        debug!("Sending create");
        self.request(|respond_to| ResourceRequest::Create { attrs, respond_to })
            .await
    }

    #[instrument(skip(self), fields(resource = T::KIND))]
    pub async fn get(&self, id: T::Id) -> Result<T, SessionError> {
        debug!("Sending get");
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    #[instrument(skip(self, attrs), fields(resource = T::KIND))]
    pub async fn update(&self, id: T::Id, attrs: T::Update) -> Result<T, SessionError> {
        debug!("Sending update");
        self.request(|respond_to| ResourceRequest::Update {
            id,
            attrs,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self), fields(resource = T::KIND))]
    pub async fn delete(&self, id: T::Id, ignore_missing: bool) -> Result<(), SessionError> {
        debug!("Sending delete");
        self.request(|respond_to| ResourceRequest::Delete {
            id,
            ignore_missing,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self), fields(resource = T::KIND))]
    pub async fn list(&self, query: ListQuery) -> Result<Vec<T>, SessionError> {
        debug!("Sending list");
        self.request(|respond_to| ResourceRequest::List { query, respond_to })
            .await
    }

    #[instrument(skip(self), fields(resource = T::KIND))]
    pub async fn find(&self, name_or_id: String) -> Result<Option<T>, SessionError> {
        debug!("Sending find");
        self.request(|respond_to| ResourceRequest::Find {
            name_or_id,
            respond_to,
        })
        .await
    }
}
