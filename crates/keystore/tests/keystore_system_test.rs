use keystore::model::{
    ContainerCreate, ContainerType, ContainerUpdate, OrderCreate, OrderMeta, OrderUpdate,
    SecretCreate, SecretId, SecretUpdate,
};
use keystore::{KeystoreError, KeystoreSystem, Proxy};
use resource_framework::Resource;

#[tokio::test]
async fn test_secret_lifecycle() {
    let system = KeystoreSystem::in_memory(8);
    let proxy = &system.proxy;

    // 1. Create
    let secret = proxy
        .create_secret(SecretCreate::named("db-password").with_payload("hunter2"))
        .await
        .unwrap();
    assert_eq!(secret.status.as_deref(), Some("ACTIVE"));
    assert!(secret.created.is_some());

    // 2. Get by id and by instance
    let id: SecretId = secret.id().unwrap();
    let by_id = proxy.get_secret(&id).await.unwrap();
    let by_instance = proxy.get_secret(&secret).await.unwrap();
    assert_eq!(by_id, by_instance);
    assert_eq!(by_id.payload.as_deref(), Some("hunter2"));

    // 3. Update
    let updated = proxy
        .update_secret(
            id.clone(),
            SecretUpdate {
                expiration: Some("2030-01-01T00:00:00".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("db-password"));
    assert_eq!(updated.expiration.as_deref(), Some("2030-01-01T00:00:00"));

    // 4. Delete
    proxy.delete_secret(&id, false).await.unwrap();
    let gone = proxy.get_secret(&id).await;
    assert!(matches!(gone, Err(KeystoreError::NotFound { kind: "secret", .. })));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_honours_ignore_missing() {
    let system = KeystoreSystem::in_memory(8);

    system
        .proxy
        .delete_order("no-such-order", Proxy::DEFAULT_IGNORE_MISSING)
        .await
        .unwrap();

    let strict = system.proxy.delete_order("no-such-order", false).await;
    match strict {
        Err(KeystoreError::NotFound { kind, id }) => {
            assert_eq!(kind, "order");
            assert_eq!(id, "no-such-order");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_find_orders_by_meta_name() {
    let system = KeystoreSystem::in_memory(8);
    let proxy = &system.proxy;

    let order = proxy
        .create_order(OrderCreate::key("disk-key", "aes", 256))
        .await
        .unwrap();

    let found = proxy.find_order("disk-key").await.unwrap();
    assert_eq!(found.as_ref(), Some(&order));

    let id = order.id().unwrap();
    let by_id = proxy.find_order(id.to_string()).await.unwrap();
    assert_eq!(by_id, Some(order.clone()));

    assert!(proxy.find_order("other").await.unwrap().is_none());

    let renamed = proxy
        .update_order(
            &order,
            OrderUpdate {
                meta: Some(OrderMeta {
                    name: Some("disk-key-2".into()),
                    ..Default::default()
                }),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.meta.name.as_deref(), Some("disk-key-2"));
    assert!(proxy.find_order("disk-key").await.unwrap().is_none());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_container_names_are_ambiguous() {
    let system = KeystoreSystem::in_memory(8);
    let proxy = &system.proxy;

    for _ in 0..2 {
        proxy
            .create_container(ContainerCreate::new("tls", ContainerType::Certificate))
            .await
            .unwrap();
    }

    let result = proxy.find_container("tls").await;
    assert!(matches!(
        result,
        Err(KeystoreError::AmbiguousName { kind: "container", ref name }) if name == "tls"
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_kinds_are_isolated_and_listed_in_order() {
    let system = KeystoreSystem::in_memory(8);
    let proxy = &system.proxy;

    let secret = proxy.create_secret(SecretCreate::named("a")).await.unwrap();
    proxy.create_secret(SecretCreate::named("b")).await.unwrap();
    let container = proxy
        .create_container(
            ContainerCreate::new("bundle", ContainerType::Generic)
                .with_secret("a", secret.secret_ref.clone().unwrap()),
        )
        .await
        .unwrap();

    let names: Vec<_> = proxy
        .secrets()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(proxy.containers().await.unwrap(), vec![container.clone()]);
    assert!(proxy.orders().await.unwrap().is_empty());

    // A secret id is not a container id.
    let secret_id = secret.id().unwrap();
    assert!(proxy.find_container(secret_id.to_string()).await.unwrap().is_none());

    let renamed = proxy
        .update_container(
            &container,
            ContainerUpdate {
                name: Some("bundle-2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.secret_refs, container.secret_refs);
    assert_eq!(renamed.container_type, Some(ContainerType::Generic));

    system.shutdown().await.unwrap();
}
