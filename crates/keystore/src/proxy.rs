//! # Key Manager Proxy
//!
//! [`Proxy`] is the entry point for callers. It offers create / delete / find / get /
//! list / update for containers, orders and secrets, and every method hands its arguments
//! unchanged to the session helper of the same name on that kind's [`ResourceClient`].
//!
//! Methods that take a `value` accept anything implementing `IntoResourceId` for the
//! kind: an id newtype, a `&str` / `String`, or the resource itself.

use crate::error::KeystoreError;
use crate::model::{
    Container, ContainerCreate, ContainerUpdate, Order, OrderCreate, OrderUpdate, Secret,
    SecretCreate, SecretUpdate,
};
use resource_framework::{IntoResourceId, ListQuery, ResourceClient};
use tracing::{debug, instrument};

/// Forwards key manager calls to the per-kind session clients.
#[derive(Clone, Debug)]
pub struct Proxy {
    containers: ResourceClient<Container>,
    orders: ResourceClient<Order>,
    secrets: ResourceClient<Secret>,
}

impl Proxy {
    /// The conventional `ignore_missing` for deletes: deleting something already gone is
    /// not an error.
    pub const DEFAULT_IGNORE_MISSING: bool = true;

    pub fn new(
        containers: ResourceClient<Container>,
        orders: ResourceClient<Order>,
        secrets: ResourceClient<Secret>,
    ) -> Self {
        Self {
            containers,
            orders,
            secrets,
        }
    }

    // =========================================================================
    // Containers
    // =========================================================================

    #[instrument(skip(self, attrs))]
    pub async fn create_container(&self, attrs: ContainerCreate) -> Result<Container, KeystoreError> {
        debug!(?attrs, "Sending request");
        Ok(self.containers.create(attrs).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn delete_container(
        &self,
        value: impl IntoResourceId<Container>,
        ignore_missing: bool,
    ) -> Result<(), KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.containers.delete(id, ignore_missing).await?)
    }

    #[instrument(skip(self, name_or_id))]
    pub async fn find_container(
        &self,
        name_or_id: impl Into<String>,
    ) -> Result<Option<Container>, KeystoreError> {
        let name_or_id = name_or_id.into();
        debug!(%name_or_id, "Sending request");
        Ok(self.containers.find(name_or_id).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn get_container(
        &self,
        value: impl IntoResourceId<Container>,
    ) -> Result<Container, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.containers.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn containers(&self) -> Result<Vec<Container>, KeystoreError> {
        debug!("Sending request");
        Ok(self.containers.list(ListQuery::default()).await?)
    }

    #[instrument(skip(self, value, attrs))]
    pub async fn update_container(
        &self,
        value: impl IntoResourceId<Container>,
        attrs: ContainerUpdate,
    ) -> Result<Container, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, ?attrs, "Sending request");
        Ok(self.containers.update(id, attrs).await?)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[instrument(skip(self, attrs))]
    pub async fn create_order(&self, attrs: OrderCreate) -> Result<Order, KeystoreError> {
        debug!(?attrs, "Sending request");
        Ok(self.orders.create(attrs).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn delete_order(
        &self,
        value: impl IntoResourceId<Order>,
        ignore_missing: bool,
    ) -> Result<(), KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.orders.delete(id, ignore_missing).await?)
    }

    #[instrument(skip(self, name_or_id))]
    pub async fn find_order(
        &self,
        name_or_id: impl Into<String>,
    ) -> Result<Option<Order>, KeystoreError> {
        let name_or_id = name_or_id.into();
        debug!(%name_or_id, "Sending request");
        Ok(self.orders.find(name_or_id).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn get_order(&self, value: impl IntoResourceId<Order>) -> Result<Order, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.orders.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, KeystoreError> {
        debug!("Sending request");
        Ok(self.orders.list(ListQuery::default()).await?)
    }

    #[instrument(skip(self, value, attrs))]
    pub async fn update_order(
        &self,
        value: impl IntoResourceId<Order>,
        attrs: OrderUpdate,
    ) -> Result<Order, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, ?attrs, "Sending request");
        Ok(self.orders.update(id, attrs).await?)
    }

    // =========================================================================
    // Secrets
    // =========================================================================

    #[instrument(skip(self, attrs))]
    pub async fn create_secret(&self, attrs: SecretCreate) -> Result<Secret, KeystoreError> {
        // Payloads are secret material; log only the name.
        debug!(name = ?attrs.name, "Sending request");
        Ok(self.secrets.create(attrs).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn delete_secret(
        &self,
        value: impl IntoResourceId<Secret>,
        ignore_missing: bool,
    ) -> Result<(), KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.secrets.delete(id, ignore_missing).await?)
    }

    #[instrument(skip(self, name_or_id))]
    pub async fn find_secret(
        &self,
        name_or_id: impl Into<String>,
    ) -> Result<Option<Secret>, KeystoreError> {
        let name_or_id = name_or_id.into();
        debug!(%name_or_id, "Sending request");
        Ok(self.secrets.find(name_or_id).await?)
    }

    #[instrument(skip(self, value))]
    pub async fn get_secret(&self, value: impl IntoResourceId<Secret>) -> Result<Secret, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, "Sending request");
        Ok(self.secrets.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn secrets(&self) -> Result<Vec<Secret>, KeystoreError> {
        debug!("Sending request");
        Ok(self.secrets.list(ListQuery::default()).await?)
    }

    #[instrument(skip(self, value, attrs))]
    pub async fn update_secret(
        &self,
        value: impl IntoResourceId<Secret>,
        attrs: SecretUpdate,
    ) -> Result<Secret, KeystoreError> {
        let id = value.into_resource_id()?;
        debug!(%id, name = ?attrs.name, "Sending request");
        Ok(self.secrets.update(id, attrs).await?)
    }
}
