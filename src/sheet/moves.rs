use log::warn;
use serde::Serialize;

use super::title_case;
use crate::pokeapi::{
    ResourceSource, fetch_batch,
    model::{MoveLearnEntry, MoveResource, decode},
};

/// The only learn method that puts a move on a sheet
pub const LEVEL_UP: &str = "level-up";

/// A move the creature can know at the sheet's level
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MoveCandidate {
    pub level_learned: u32,
    pub name: String,
    pub type_name: String,
    pub category: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
}

impl MoveCandidate {
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }
}

/// Moves learnable by level-up at or below `level`
///
/// A move listed more than once keeps its lowest qualifying level and its
/// first position. The result is ordered by that level, then source order.
pub fn learnable_by_level(entries: &[MoveLearnEntry], level: u32) -> Vec<(u32, &MoveLearnEntry)> {
    let mut learnable: Vec<(u32, &MoveLearnEntry)> = vec![];

    for entry in entries {
        let Some(lowest) = entry
            .learned
            .iter()
            .filter(|d| d.method == LEVEL_UP && d.level <= level)
            .map(|d| d.level)
            .min()
        else {
            continue;
        };

        match learnable.iter_mut().find(|(_, seen)| seen.name == entry.name) {
            Some(known) if lowest < known.0 => known.0 = lowest,
            Some(_) => {}
            None => learnable.push((lowest, entry)),
        }
    }

    learnable.sort_by_key(|(lowest, _)| *lowest);
    learnable
}

/// Resolves the learnable moves concurrently, keeping their order
/// Moves that fail to resolve are left out
pub async fn fetch_move_candidates<S: ResourceSource>(
    source: &S,
    entries: &[MoveLearnEntry],
    level: u32,
) -> Vec<MoveCandidate> {
    let learnable = learnable_by_level(entries, level);
    let targets: Vec<&str> = learnable.iter().map(|(_, e)| e.url.as_str()).collect();
    let fetched = fetch_batch(source, &targets).await;

    learnable
        .into_iter()
        .zip(fetched)
        .filter_map(|((level_learned, entry), value)| {
            let resource: MoveResource = decode(&entry.url, value?)
                .inspect_err(|e| warn!("Ignoring move {}: {}", entry.name, e))
                .ok()?;

            Some(MoveCandidate {
                level_learned,
                name: entry.name.clone(),
                type_name: resource.kind.map(|t| t.name).unwrap_or_default(),
                category: resource.damage_class.map(|c| c.name).unwrap_or_default(),
                power: resource.power,
                accuracy: resource.accuracy,
            })
        })
        .collect()
}
