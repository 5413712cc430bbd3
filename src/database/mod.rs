use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use log::{info, warn};
use neo4rs::Graph;
use tokio::sync::OnceCell;

use crate::config::{Config, DatabaseConfig};

pub mod get;
pub mod link;
pub mod promise;
pub mod put;

/// Name of the query parameter holding a node identifier
pub const IDENT_PARAM: &str = "ident";

static GRAPH: OnceCell<Graph> = OnceCell::const_new();

static SETTINGS: OnceLock<DatabaseConfig> = OnceLock::new();

/// Sets the connection settings used by [`DbHandle::connect`]
/// Only the first call takes effect; returns whether this one did
pub fn configure(settings: DatabaseConfig) -> bool {
    let uri = settings.uri();
    match SETTINGS.set(settings) {
        Ok(()) => {
            info!("Record store at {}", uri);
            true
        }
        Err(_) => {
            warn!("Record store already configured, ignoring {}", uri);
            false
        }
    }
}

/// The configured connection settings, or the `[database]` section of `config.toml`
pub fn settings() -> Result<DatabaseConfig> {
    match SETTINGS.get() {
        Some(settings) => Ok(settings.clone()),
        None => Config::load()?
            .database
            .ok_or_else(|| anyhow!("No [database] section configured")),
    }
}

/// Represents a handle to the database connection
pub struct DbHandle {
    /// The neo4j graph database connection
    pub inner: Graph,
}

impl DbHandle {
    /// Connects to the database using the [`settings`]
    /// The connection pool is built on first use and shared afterwards
    pub async fn connect() -> Result<Self> {
        let graph = GRAPH
            .get_or_try_init(|| async {
                let config = settings()?;
                let graph = Graph::new(config.uri(), config.username, config.password).await?;
                Ok::<_, anyhow::Error>(graph)
            })
            .await?;

        Ok(Self {
            inner: graph.clone(),
        })
    }
}

/// Represents a string that can be used in a database query
pub trait AsDbString {
    /// Get the string representation of this type for use in a database query
    fn as_db_string(&self) -> &'static str;
}

/// Represents a database-representable type that has a specific node kind in the Neo4j graph
pub trait DbRepr {
    /// The kind of node in the Neo4j graph that represents this type
    const DB_NODE_KIND: &'static str;

    /// The name of the identifier field
    const DB_IDENTIFIER_FIELD: &'static str = "id";

    /// Get the identifier of the database node
    fn get_identifier(&self) -> String;
}
