use anyhow::Result;
use futures::future::BoxFuture;
use neo4rs::{BoltType, Node};
use serde::{Deserialize, Serialize};

use crate::{
    database::{DbRepr, get::DbGet, promise::Promised, put::DbPut},
    workflow::FinishedSheet,
};

/// What is kept of a finished sheet
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SheetRecord {
    pub id: String,
    /// The creature on the sheet, after the form choice
    pub name: String,
    /// The species the command asked for
    pub species: String,
    pub level: u32,
    pub nature: String,
    pub ability: String,
    pub shiny: bool,
    /// Chosen move names as a JSON list
    pub moves: String,
}

impl SheetRecord {
    pub fn from_sheet(sheet: &FinishedSheet) -> Self {
        let moves: Vec<String> = sheet.moves.iter().map(|m| m.display_name()).collect();

        Self {
            id: format!("{:016x}", rand::random::<u64>()),
            name: sheet.creature.name.clone(),
            species: sheet.request.name.clone(),
            level: sheet.request.level,
            nature: sheet.request.nature.clone(),
            ability: sheet.ability.name.clone(),
            shiny: sheet.shiny,
            moves: serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string()),
        }
    }
}

impl DbRepr for SheetRecord {
    const DB_NODE_KIND: &'static str = "Sheet";

    fn get_identifier(&self) -> String {
        self.id.clone()
    }
}

impl DbPut for SheetRecord {
    fn put_properties(&self) -> Vec<(&'static str, BoltType)> {
        vec![
            ("name", self.name.clone().into()),
            ("species", self.species.clone().into()),
            ("level", i64::from(self.level).into()),
            ("nature", self.nature.clone().into()),
            ("ability", self.ability.clone().into()),
            ("shiny", self.shiny.into()),
            ("moves", self.moves.clone().into()),
        ]
    }
}

impl DbGet for SheetRecord {
    fn from_db_node(node: Node) -> BoxFuture<'static, Result<Self>> {
        Box::pin(async move {
            Ok(SheetRecord {
                id: node.get::<String>("id")?,
                name: node.get::<String>("name")?,
                species: node.get::<String>("species")?,
                level: u32::try_from(node.get::<i64>("level")?)?,
                nature: node.get::<String>("nature")?,
                ability: node.get::<String>("ability")?,
                shiny: node.get::<bool>("shiny")?,
                moves: node
                    .get::<String>("moves")
                    .unwrap_or_else(|_| "[]".to_string()),
            })
        })
    }
}

impl Promised for SheetRecord {}
