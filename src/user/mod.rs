/// User HTTP endpoints module
pub mod endpoints;
pub mod sheet_record;

use anyhow::Result;
use log::info;
use neo4rs::BoltType;
use serde::{Deserialize, Serialize};

use crate::{
    database::{
        AsDbString, DbRepr,
        get::DbGet,
        link::DbLink,
        promise::{Promise, Promised},
        put::DbPut,
    },
    workflow::FinishedSheet,
};

use sheet_record::SheetRecord;

/// Role given to every chat user the bot stores
pub const DEFAULT_ROLE: &str = "player";

/// A chat user who has finished at least one sheet
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    /// The chat platform's id of the user
    pub external_id: String,
    pub display_name: String,
    pub role: String,
    /// Sheets the user has built
    pub sheets: Vec<Promise<SheetRecord>>,
}

impl User {
    pub fn new(external_id: String, display_name: String) -> Self {
        Self {
            external_id,
            display_name,
            role: DEFAULT_ROLE.to_string(),
            sheets: vec![],
        }
    }
}

impl DbRepr for User {
    const DB_IDENTIFIER_FIELD: &'static str = "external_id";
    const DB_NODE_KIND: &'static str = "User";

    fn get_identifier(&self) -> String {
        self.external_id.clone()
    }
}

impl DbPut for User {
    fn put_properties(&self) -> Vec<(&'static str, BoltType)> {
        vec![
            ("display_name", self.display_name.clone().into()),
            ("role", self.role.clone().into()),
        ]
    }
}

/// Represents a relationship between a user and a sheet
pub enum Relationship {
    /// The user built the sheet
    Owns,
}

impl AsDbString for Relationship {
    fn as_db_string(&self) -> &'static str {
        match self {
            Relationship::Owns => "Owns",
        }
    }
}

impl DbLink<SheetRecord> for User {
    type RelationshipType = Relationship;

    fn link_side_effect(
        &mut self,
        sheet: &Promise<SheetRecord>,
        relationship: &Self::RelationshipType,
    ) -> Result<()> {
        match relationship {
            Relationship::Owns => {
                if !self.sheets.iter().any(|s| s.ident() == sheet.ident()) {
                    self.sheets.push(sheet.clone());
                }
                Ok(())
            }
        }
    }
}

impl DbGet for User {
    fn from_db_node(node: neo4rs::Node) -> futures::future::BoxFuture<'static, Result<Self>> {
        Box::pin(async move {
            let external_id = node.get::<String>("external_id")?;
            let display_name = node.get::<String>("display_name")?;
            let role = node
                .get::<String>("role")
                .unwrap_or_else(|_| DEFAULT_ROLE.to_string());

            let sheets = User::get_linked_by_id(&Relationship::Owns, external_id.clone()).await?;

            Ok(User {
                external_id,
                display_name,
                role,
                sheets,
            })
        })
    }
}

/// Stores a finished sheet under the user who built it
pub async fn save_sheet(
    external_id: String,
    display_name: String,
    sheet: &FinishedSheet,
) -> Result<SheetRecord> {
    let mut user = User::new(external_id, display_name);
    user.put_self().await?;

    let record = SheetRecord::from_sheet(sheet);
    record.put_self().await?;

    user.link_to(&record.as_promise(), &Relationship::Owns).await?;
    info!("Stored sheet {} for {}", record.id, user.external_id);

    Ok(record)
}
