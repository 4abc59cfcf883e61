//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `ResourceClient<T>` whose requests are answered
//! from a queue of expectations instead of a backend. It lets you script return values and
//! failures for unit tests without a key manager or a running `ResourceActor`.
//!
//! ## When to use Mocks vs Real Backends
//!
//! | Feature | MockClient | MemoryBackend | HttpBackend + wiremock |
//! |---------|------------|---------------|------------------------|
//! | **Speed** | Instant | Instant | Fast (local socket) |
//! | **State** | None (scripted) | Real in-memory state | Whatever the stub returns |
//! | **Use Case** | Logic *around* the client | Session semantics (find, ignore_missing) | Wire format |
//! | **Error Injection** | Easy (`return_err`) | Hard | Easy (status codes) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Forwarding Test (Raw Requests)</b></summary>
//!
//! **When to use**: Checking that a proxy method sends exactly one request of the right kind
//! with its arguments unchanged. [`create_mock_client`] returns the receiving end of the
//! channel; the `expect_*` helpers pop the next request and hand back its arguments and
//! responder.
//!
//! ```rust
//! use resource_framework::mock::{create_mock_client, expect_delete};
//! use resource_framework::Resource;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Key { key_ref: Option<String>, name: Option<String> }
//! #[derive(Debug, Serialize)] struct KeyCreate;
//!
//! impl Resource for Key {
//!     type Id = String; type Create = KeyCreate; type Update = KeyCreate;
//!     const KIND: &'static str = "key"; const BASE_PATH: &'static str = "keys";
//!     const RESOURCES_KEY: &'static str = "keys"; const REF_KEY: &'static str = "key_ref";
//!     fn href(&self) -> Option<&str> { self.key_ref.as_deref() }
//!     fn name(&self) -> Option<&str> { self.name.as_deref() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut receiver) = create_mock_client::<Key>(10);
//!     let task = tokio::spawn(async move { client.delete("k-1".to_string(), false).await });
//!
//!     let (id, ignore_missing, responder) = expect_delete(&mut receiver).await.unwrap();
//!     assert_eq!(id, "k-1");
//!     assert!(!ignore_missing);
//!     responder.send(Ok(())).unwrap();
//!
//!     assert!(task.await.unwrap().is_ok());
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Scripted Responses (Fluent Mock)</b></summary>
//!
//! **When to use**: Code that consumes a client and must react to its results, including
//! failures that a real service rarely produces on demand.
//!
//! ```rust
//! use resource_framework::mock::MockClient;
//! use resource_framework::{Resource, SessionError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Key { key_ref: Option<String>, name: Option<String> }
//! #[derive(Debug, Serialize)] struct KeyCreate;
//!
//! impl Resource for Key {
//!     type Id = String; type Create = KeyCreate; type Update = KeyCreate;
//!     const KIND: &'static str = "key"; const BASE_PATH: &'static str = "keys";
//!     const RESOURCES_KEY: &'static str = "keys"; const REF_KEY: &'static str = "key_ref";
//!     fn href(&self) -> Option<&str> { self.key_ref.as_deref() }
//!     fn name(&self) -> Option<&str> { self.name.as_deref() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Key>::new();
//!     let client = mock.client();
//!
//!     // Simulate a service outage
//!     mock.expect_get("k-1".to_string())
//!         .return_err(SessionError::Unauthorized(401));
//!
//!     let result = client.get("k-1".to_string()).await;
//!     assert!(matches!(result, Err(SessionError::Unauthorized(401))));
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full Session (MemoryBackend)</b></summary>
//!
//! **When to use**: Exercising the shared semantics of the actor (not-found mapping,
//! `ignore_missing`, find by name). See `tests/integration_test.rs`.
//! </details>

use crate::client::ResourceClient;
use crate::error::SessionError;
use crate::message::{ResourceRequest, Response};
use crate::resource::{ListQuery, Resource};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
///
/// Ids recorded here are compared with the incoming request; a mismatch drops the
/// responder, which the caller sees as [`SessionError::BackendDropped`].
enum Expectation<T: Resource> {
    Create {
        response: Result<T, SessionError>,
    },
    Get {
        id: T::Id,
        response: Result<T, SessionError>,
    },
    Update {
        id: T::Id,
        response: Result<T, SessionError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), SessionError>,
    },
    List {
        response: Result<Vec<T>, SessionError>,
    },
    Find {
        name_or_id: String,
        response: Result<Option<T>, SessionError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Secret>::new();
/// mock.expect_find("db-password".to_string()).return_ok(Some(secret));
/// mock.expect_delete(secret_id.clone()).return_ok(());
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: Resource> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Resource> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn answer<R>(respond_to: Response<R>, response: Result<R, SessionError>) {
    let _ = respond_to.send(response);
}

impl<T: Resource> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&expectations);

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = match queue.lock() {
                    Ok(mut exps) => exps.pop_front(),
                    Err(_) => return,
                };

                match (request, expectation) {
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => answer(respond_to, response),
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => answer(respond_to, response),
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => answer(respond_to, response),
                    (
                        ResourceRequest::Delete { id, respond_to, .. },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) if id == expected => answer(respond_to, response),
                    (
                        ResourceRequest::List { respond_to, .. },
                        Some(Expectation::List { response }),
                    ) => answer(respond_to, response),
                    (
                        ResourceRequest::Find {
                            name_or_id,
                            respond_to,
                        },
                        Some(Expectation::Find {
                            name_or_id: expected,
                            response,
                        }),
                    ) if name_or_id == expected => answer(respond_to, response),
                    // Unexpected request: dropping the responder fails the call.
                    _ => {}
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    /// Expects a `get` operation for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    /// Expects an `update` operation for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    /// Expects a `delete` operation for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    /// Expects a `find` operation for `name_or_id`.
    pub fn expect_find(&mut self, name_or_id: impl Into<String>) -> ExpectationBuilder<T, Option<T>> {
        let name_or_id = name_or_id.into();
        self.builder(move |response| Expectation::Find {
            name_or_id,
            response,
        })
    }

    fn builder<R>(
        &self,
        build: impl FnOnce(Result<R, SessionError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            build: Box::new(build),
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .map(|exps| exps.len())
            .unwrap_or_default();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

type Build<T, R> = Box<dyn FnOnce(Result<R, SessionError>) -> Expectation<T> + Send>;

/// Builder that fixes the response of one expectation.
///
/// `R` is the success type of the expected operation.
pub struct ExpectationBuilder<T: Resource, R> {
    build: Build<T, R>,
    expectations: Expectations<T>,
}

impl<T: Resource, R> ExpectationBuilder<T, R> {
    fn push(self, response: Result<R, SessionError>) {
        let expectation = (self.build)(response);
        if let Ok(mut exps) = self.expectations.lock() {
            exps.push_back(expectation);
        }
    }

    /// Sets the expectation to return a successful value.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SessionError) {
        self.push(Err(error));
    }
}

// =============================================================================
// RAW REQUEST HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// When testing a proxy we don't want any backend at all, only proof that the call was
/// forwarded. The client sends messages to a channel we control (`receiver`); the helpers
/// below inspect the next message and return its arguments together with the responder,
/// so the test can also choose what the caller gets back.
pub fn create_mock_client<T: Resource>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { attrs, respond_to }) => Some((attrs, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            attrs,
            respond_to,
        }) => Some((id, attrs, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, bool, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete {
            id,
            ignore_missing,
            respond_to,
        }) => Some((id, ignore_missing, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(ListQuery, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Find request
pub async fn expect_find<T: Resource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(String, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Find {
            name_or_id,
            respond_to,
        }) => Some((name_or_id, respond_to)),
        _ => None,
    }
}
