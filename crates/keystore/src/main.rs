//! # keystore
//!
//! Command-line access to the key manager proxy. The backend comes from the environment
//! (see [`keystore::config`]): with `OS_KEY_MANAGER_ENDPOINT` unset every command runs
//! against a fresh in-memory store, which is mostly useful for `demo`.

use clap::{Parser, Subcommand, ValueEnum};
use keystore::model::{ContainerCreate, ContainerType, ContainerUpdate, OrderCreate, SecretCreate};
use keystore::{KeystoreConfig, KeystoreSystem, Proxy};
use serde::Serialize;
use std::error::Error;
use tracing::{info, Instrument};

#[derive(Parser)]
#[command(name = "keystore", version, about = "Key manager proxy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every entity of a kind
    List { kind: Kind },
    /// Show one entity by id
    Get { kind: Kind, id: String },
    /// Look an entity up by id, then by exact name
    Find { kind: Kind, name_or_id: String },
    /// Delete an entity
    Delete {
        kind: Kind,
        id: String,
        /// Fail when the entity does not exist
        #[arg(long)]
        strict: bool,
    },
    /// Store a new secret
    CreateSecret {
        #[arg(long)]
        name: String,
        #[arg(long)]
        payload: Option<String>,
    },
    /// Walk through every operation for all three kinds
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Containers,
    Orders,
    Secrets,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    keystore::lifecycle::setup_tracing();

    let cli = Cli::parse();
    let config = KeystoreConfig::from_env();
    let system = KeystoreSystem::from_config(&config)?;

    let result = run(&system.proxy, cli.command).await;
    system.shutdown().await?;
    result
}

async fn run(proxy: &Proxy, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List { kind } => match kind {
            Kind::Containers => print_json(&proxy.containers().await?),
            Kind::Orders => print_json(&proxy.orders().await?),
            Kind::Secrets => print_json(&proxy.secrets().await?),
        },
        Command::Get { kind, id } => match kind {
            Kind::Containers => print_json(&proxy.get_container(id).await?),
            Kind::Orders => print_json(&proxy.get_order(id).await?),
            Kind::Secrets => print_json(&proxy.get_secret(id).await?),
        },
        Command::Find { kind, name_or_id } => match kind {
            Kind::Containers => print_json(&proxy.find_container(name_or_id).await?),
            Kind::Orders => print_json(&proxy.find_order(name_or_id).await?),
            Kind::Secrets => print_json(&proxy.find_secret(name_or_id).await?),
        },
        Command::Delete { kind, id, strict } => {
            let ignore_missing = !strict;
            match kind {
                Kind::Containers => proxy.delete_container(id, ignore_missing).await?,
                Kind::Orders => proxy.delete_order(id, ignore_missing).await?,
                Kind::Secrets => proxy.delete_secret(id, ignore_missing).await?,
            }
            Ok(())
        }
        Command::CreateSecret { name, payload } => {
            let mut attrs = SecretCreate::named(name);
            if let Some(payload) = payload {
                attrs = attrs.with_payload(payload);
            }
            print_json(&proxy.create_secret(attrs).await?)
        }
        Command::Demo => demo(proxy).await,
    }
}

async fn demo(proxy: &Proxy) -> Result<(), Box<dyn Error>> {
    let span = tracing::info_span!("secret_storage");
    let secret = async {
        info!("Storing demo secret");
        proxy
            .create_secret(SecretCreate::named("demo-password").with_payload("s3cr3t"))
            .await
    }
    .instrument(span)
    .await?;
    print_json(&secret)?;

    let span = tracing::info_span!("key_order");
    let order = async {
        info!("Ordering a symmetric key");
        proxy.create_order(OrderCreate::key("demo-key", "aes", 256)).await
    }
    .instrument(span)
    .await?;
    print_json(&order)?;

    let span = tracing::info_span!("container_setup");
    let container = async {
        info!("Grouping the secret in a container");
        let secret_ref = secret.secret_ref.clone().unwrap_or_default();
        proxy
            .create_container(
                ContainerCreate::new("demo-bundle", ContainerType::Generic)
                    .with_secret("password", secret_ref),
            )
            .await
    }
    .instrument(span)
    .await?;
    let container = proxy
        .update_container(
            &container,
            ContainerUpdate {
                name: Some("demo-bundle-v2".into()),
                ..Default::default()
            },
        )
        .await?;
    print_json(&container)?;

    let found = proxy.find_container("demo-bundle-v2").await?;
    info!(found = found.is_some(), "Looked up container by name");
    let fetched = proxy.get_order(&order).await?;
    info!(status = ?fetched.status, "Fetched order");

    let containers = proxy.containers().await?;
    let orders = proxy.orders().await?;
    let secrets = proxy.secrets().await?;
    info!(
        containers = containers.len(),
        orders = orders.len(),
        secrets = secrets.len(),
        "Listed resources"
    );

    proxy.delete_container(&container, Proxy::DEFAULT_IGNORE_MISSING).await?;
    proxy.delete_order(&order, Proxy::DEFAULT_IGNORE_MISSING).await?;
    proxy.delete_secret(&secret, Proxy::DEFAULT_IGNORE_MISSING).await?;
    // Already gone; only an error when ignore_missing is false.
    proxy.delete_secret(&secret, Proxy::DEFAULT_IGNORE_MISSING).await?;

    info!("Demo completed successfully");
    Ok(())
}
