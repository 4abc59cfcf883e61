//! # Generic Resource Server
//!
//! This module defines the `ResourceActor`, the server half of a session. It owns the
//! backend for one resource kind, processes requests sequentially and applies the rules
//! that are the same for every kind: not-found mapping, `ignore_missing` on delete and
//! the find-by-name-or-id lookup.

use crate::backend::Backend;
use crate::client::ResourceClient;
use crate::error::SessionError;
use crate::message::ResourceRequest;
use crate::resource::{ListQuery, Resource};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that serves one resource kind.
///
/// # Architecture Note
/// This struct is the "Server" half of the session. It owns the backend and the receiver
/// end of the channel. Each actor handles its own messages *sequentially*, so a backend
/// never sees two requests at once and needs no locking.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` with a backend to get the `actor` and `client`.
/// 2.  **Run**: Spawn `actor.run()` in a background task.
/// 3.  **Use**: Hand the client to a proxy; clone it freely.
///
/// ```rust
/// use resource_framework::memory::MemoryBackend;
/// use resource_framework::{Resource, ResourceActor};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Widget {
///     widget_ref: Option<String>,
///     name: Option<String>,
/// }
/// #[derive(Debug, Serialize)]
/// struct WidgetCreate {
///     name: String,
/// }
///
/// impl Resource for Widget {
///     type Id = String;
///     type Create = WidgetCreate;
///     type Update = WidgetCreate;
///     const KIND: &'static str = "widget";
///     const BASE_PATH: &'static str = "widgets";
///     const RESOURCES_KEY: &'static str = "widgets";
///     const REF_KEY: &'static str = "widget_ref";
///     fn href(&self) -> Option<&str> { self.widget_ref.as_deref() }
///     fn name(&self) -> Option<&str> { self.name.as_deref() }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::new(10, MemoryBackend::<Widget>::default());
///     tokio::spawn(actor.run());
///
///     let widget = client.create(WidgetCreate { name: "w".into() }).await.unwrap();
///     let found = client.find("w".into()).await.unwrap();
///     assert_eq!(found.unwrap().id(), widget.id());
/// }
/// ```
///
/// # Operations
///
/// * **Get / Update**: a `None` from the backend becomes [`SessionError::NotFound`].
/// * **Delete**: a missing entity is only an error when `ignore_missing` is false.
/// * **Find**: try `name_or_id` as an id first, then list by name. Exactly one match is
///   returned, zero gives `None`, more than one gives [`SessionError::DuplicateResource`].
pub struct ResourceActor<T: Resource, B: Backend<T>> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    backend: B,
}

impl<T: Resource, B: Backend<T>> ResourceActor<T, B> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client wait until there is space.
    /// * `backend` - The storage the actor serves requests from.
    pub fn new(buffer_size: usize, backend: B) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, backend };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        let resource = T::KIND;
        info!(resource, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { attrs, respond_to } => {
                    debug!(resource, "Create");
                    let result = self.backend.create(attrs).await;
                    match &result {
                        Ok(item) => info!(resource, id = ?item.id(), "Created"),
                        Err(e) => warn!(resource, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let result = self.get(&id).await;
                    debug!(resource, %id, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Update {
                    id,
                    attrs,
                    respond_to,
                } => {
                    debug!(resource, %id, "Update");
                    let result = match self.backend.update(&id, attrs).await {
                        Ok(Some(item)) => {
                            info!(resource, %id, "Updated");
                            Ok(item)
                        }
                        Ok(None) => {
                            warn!(resource, %id, "Not found");
                            Err(not_found::<T>(&id))
                        }
                        Err(e) => {
                            warn!(resource, %id, error = %e, "Update failed");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete {
                    id,
                    ignore_missing,
                    respond_to,
                } => {
                    debug!(resource, %id, ignore_missing, "Delete");
                    let result = match self.backend.delete(&id).await {
                        Ok(true) => {
                            info!(resource, %id, "Deleted");
                            Ok(())
                        }
                        Ok(false) if ignore_missing => {
                            debug!(resource, %id, "Nothing to delete");
                            Ok(())
                        }
                        Ok(false) => {
                            warn!(resource, %id, "Not found");
                            Err(not_found::<T>(&id))
                        }
                        Err(e) => {
                            warn!(resource, %id, error = %e, "Delete failed");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { query, respond_to } => {
                    let result = self.backend.list(&query).await;
                    match &result {
                        Ok(items) => debug!(resource, ?query, count = items.len(), "List"),
                        Err(e) => warn!(resource, error = %e, "List failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Find {
                    name_or_id,
                    respond_to,
                } => {
                    let result = self.find(&name_or_id).await;
                    match &result {
                        Ok(found) => debug!(resource, %name_or_id, found = found.is_some(), "Find"),
                        Err(e) => warn!(resource, %name_or_id, error = %e, "Find failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(resource, "Shutdown");
    }

    async fn get(&mut self, id: &T::Id) -> Result<T, SessionError> {
        self.backend
            .get(id)
            .await?
            .ok_or_else(|| not_found::<T>(id))
    }

    async fn find(&mut self, name_or_id: &str) -> Result<Option<T>, SessionError> {
        let id = T::Id::from(name_or_id.to_owned());
        match self.backend.get(&id).await {
            Ok(Some(item)) => return Ok(Some(item)),
            Ok(None) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let mut matches: Vec<T> = self
            .backend
            .list(&ListQuery::by_name(name_or_id))
            .await?
            .into_iter()
            .filter(|item| item.name() == Some(name_or_id))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(SessionError::DuplicateResource {
                resource: T::KIND,
                name: name_or_id.to_owned(),
            }),
        }
    }
}

fn not_found<T: Resource>(id: &T::Id) -> SessionError {
    SessionError::NotFound {
        resource: T::KIND,
        id: id.to_string(),
    }
}
