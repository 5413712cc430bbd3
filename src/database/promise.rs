use std::{fmt, future::Future, marker::PhantomData};

use anyhow::Result;
use neo4rs::Node;
use serde::{Deserialize, Serialize};

use super::get::DbGet;

/// A reference to a stored node, resolved on demand
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Promise<T> {
    ident: String,
    #[serde(skip)]
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Promise<T> {
    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn from_ident(ident: String) -> Self {
        Self {
            ident,
            _phantom: PhantomData,
        }
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self::from_ident(self.ident.clone())
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Promise").field(&self.ident).finish()
    }
}

impl<T: Promised> Promise<T> {
    /// Loads the node this promise points at
    pub fn resolve(&self) -> impl Future<Output = Result<T>> + Send + '_ {
        T::get_first(&self.ident)
    }
}

/// Denotes a type that can be pointed at by a [`Promise`]
pub trait Promised: DbGet + Sized {
    /// Reads the identifier of a node of this type
    fn promise_from_node(node: &Node) -> Result<Promise<Self>> {
        Ok(Promise::from_ident(node.get::<String>(Self::DB_IDENTIFIER_FIELD)?))
    }

    fn as_promise(&self) -> Promise<Self> {
        Promise::from_ident(self.get_identifier())
    }
}
