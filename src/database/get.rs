use std::future::Future;

use anyhow::{Result, anyhow};
use futures::future::BoxFuture;
use neo4rs::{Node, query};

use super::{DbHandle, DbRepr, IDENT_PARAM};

/// Matches one node of a kind by identifier, bound as `n`
pub fn match_statement(kind: &str, id_field: &str) -> String {
    format!("MATCH (n:{} {{{}: ${}}}) RETURN n LIMIT 1", kind, id_field, IDENT_PARAM)
}

/// Denotes that a type can be retrieved from the database
pub trait DbGet: DbRepr {
    /// Builds an instance of the type from a neo4j node
    fn from_db_node(node: Node) -> BoxFuture<'static, Result<Self>>
    where
        Self: Sized;

    /// Gets the node of this type with the given identifier
    fn get_first(database_identifier: &str) -> impl Future<Output = Result<Self>> + Send
    where
        Self: Sized,
    {
        let q = query(&match_statement(Self::DB_NODE_KIND, Self::DB_IDENTIFIER_FIELD))
            .param(IDENT_PARAM, database_identifier.to_string());
        let wanted = database_identifier.to_string();

        async move {
            let db = DbHandle::connect().await?;
            let mut rows = db.inner.execute(q).await?;

            let row = rows
                .next()
                .await?
                .ok_or_else(|| anyhow!("No {} found with {}", Self::DB_NODE_KIND, wanted))?;

            let node = row.get::<Node>("n")?;
            Self::from_db_node(node).await
        }
    }
}
