use std::future::Future;

use anyhow::Result;
use log::debug;
use neo4rs::{Node, query};

use super::{
    AsDbString, DbHandle, DbRepr, IDENT_PARAM,
    promise::{Promise, Promised},
};

/// Name of the query parameter holding the linked node's identifier
const OTHER_PARAM: &str = "other";

/// `MERGE` a relationship between two existing nodes
pub fn link_statement(from: (&str, &str), to: (&str, &str), relationship: &str) -> String {
    format!(
        "MATCH (a:{} {{{}: ${}}}), (b:{} {{{}: ${}}}) MERGE (a)-[:{}]->(b)",
        from.0, from.1, IDENT_PARAM, to.0, to.1, OTHER_PARAM, relationship
    )
}

/// Every node reached from one node over a relationship, bound as `b`
pub fn linked_statement(from: (&str, &str), to_kind: &str, relationship: &str) -> String {
    format!(
        "MATCH (a:{} {{{}: ${}}})-[:{}]->(b:{}) RETURN b",
        from.0, from.1, IDENT_PARAM, relationship, to_kind
    )
}

/// Denotes the ability to link this type to another using database relationships
pub trait DbLink<T>: DbRepr
where
    T: Promised,
{
    /// The type of relationship between the two nodes,
    /// ideally should be an enum of possible relationships
    type RelationshipType: AsDbString + Sync;

    /// Called after a link is stored, to keep local fields in line with the database
    fn link_side_effect(
        &mut self,
        other: &Promise<T>,
        relationship_type: &Self::RelationshipType,
    ) -> Result<()>;

    /// Adds a new link (does nothing if the link already exists) from 'self' to 'other'
    fn link_to(
        &mut self,
        other: &Promise<T>,
        relationship_type: &Self::RelationshipType,
    ) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized + Send,
    {
        let statement = link_statement(
            (Self::DB_NODE_KIND, Self::DB_IDENTIFIER_FIELD),
            (T::DB_NODE_KIND, T::DB_IDENTIFIER_FIELD),
            relationship_type.as_db_string(),
        );
        debug!("Linking query: {}", statement);

        let q = query(&statement)
            .param(IDENT_PARAM, self.get_identifier())
            .param(OTHER_PARAM, other.ident().to_string());

        async move {
            let db = DbHandle::connect().await?;
            db.inner.run(q).await?;

            self.link_side_effect(other, relationship_type)?;
            Ok(())
        }
    }

    /// Returns promises of the nodes linked from the node with the given identifier
    fn get_linked_by_id(
        relationship_type: &Self::RelationshipType,
        database_identifier: String,
    ) -> impl Future<Output = Result<Vec<Promise<T>>>> + Send {
        let statement = linked_statement(
            (Self::DB_NODE_KIND, Self::DB_IDENTIFIER_FIELD),
            T::DB_NODE_KIND,
            relationship_type.as_db_string(),
        );
        let q = query(&statement).param(IDENT_PARAM, database_identifier);

        async move {
            let db = DbHandle::connect().await?;
            let mut rows = db.inner.execute(q).await?;

            let mut promises = vec![];
            while let Some(row) = rows.next().await? {
                let node = row.get::<Node>("b")?;
                promises.push(T::promise_from_node(&node)?);
            }

            Ok(promises)
        }
    }
}
