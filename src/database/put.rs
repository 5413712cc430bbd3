use std::future::Future;

use anyhow::Result;
use log::debug;
use neo4rs::{BoltType, query};

use super::{DbHandle, DbRepr, IDENT_PARAM};

/// `MERGE` on the identifier, then `SET` every other property
pub fn merge_statement(kind: &str, id_field: &str, properties: &[&str]) -> String {
    let mut statement = format!("MERGE (n:{} {{{}: ${}}})", kind, id_field, IDENT_PARAM);

    if !properties.is_empty() {
        let assignments: Vec<String> = properties
            .iter()
            .map(|p| format!("n.{} = ${}", p, p))
            .collect();
        statement.push_str(" SET ");
        statement.push_str(&assignments.join(", "));
    }

    statement
}

/// Denotes that a type can be inserted into the database
pub trait DbPut: DbRepr {
    /// Properties stored on the node besides its identifier
    fn put_properties(&self) -> Vec<(&'static str, BoltType)>;

    /// Inserts or refreshes the node holding the contents of 'self'
    /// Does not duplicate nodes
    fn put_self(&self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized,
    {
        let properties = self.put_properties();
        let names: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
        let statement = merge_statement(Self::DB_NODE_KIND, Self::DB_IDENTIFIER_FIELD, &names);
        debug!("Put query: {}", statement);

        let q = properties.into_iter().fold(
            query(&statement).param(IDENT_PARAM, self.get_identifier()),
            |q, (name, value)| q.param(name, value),
        );

        async move {
            let db = DbHandle::connect().await?;
            db.inner.run(q).await?;
            Ok(())
        }
    }
}
