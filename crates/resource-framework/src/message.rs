//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::error::SessionError;
use crate::resource::{ListQuery, Resource};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, SessionError>>;

/// Message sent to the actor to request an operation on a resource kind.
///
/// The variants map one-to-one onto the session helpers the key manager proxy delegates
/// to: create, get, update, delete, list and find. Each variant carries the caller's
/// arguments untouched, which is what lets tests assert that a proxy forwarded them
/// unchanged.
///
/// The enum is generic over `T: Resource` and uses its associated payload types, so a
/// `Secret` create payload can never be sent to the container actor.
#[derive(Debug)]
pub enum ResourceRequest<T: Resource> {
    Create {
        attrs: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        attrs: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        ignore_missing: bool,
        respond_to: Response<()>,
    },
    List {
        query: ListQuery,
        respond_to: Response<Vec<T>>,
    },
    Find {
        name_or_id: String,
        respond_to: Response<Option<T>>,
    },
}
