use log::warn;
use serde::Serialize;

use crate::pokeapi::{
    ResourceSource, fetch_batch,
    model::{TypeResource, decode},
};

/// An attacking type and how many of the creature's types it hits for double
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WeaknessEntry {
    pub type_name: String,
    pub multiplicity: u32,
}

impl WeaknessEntry {
    /// Damage multiplier, 2 to the power of the multiplicity
    pub fn multiplier(&self) -> u64 {
        1u64 << self.multiplicity.min(63)
    }
}

/// Tallies double damage sources over every resolved type
/// Sorted by multiplicity, highest first; ties keep first-seen order
pub fn tally_weaknesses<'a>(relations: impl IntoIterator<Item = &'a TypeResource>) -> Vec<WeaknessEntry> {
    let mut tally: Vec<WeaknessEntry> = vec![];

    for relation in relations {
        for attacker in &relation.damage_relations.double_damage_from {
            match tally.iter_mut().find(|w| w.type_name == attacker.name) {
                Some(entry) => entry.multiplicity += 1,
                None => tally.push(WeaknessEntry {
                    type_name: attacker.name.clone(),
                    multiplicity: 1,
                }),
            }
        }
    }

    tally.sort_by(|a, b| b.multiplicity.cmp(&a.multiplicity));
    tally
}

/// Resolves every type of a creature and tallies its weaknesses
/// Types that fail to resolve are left out of the tally
pub async fn fetch_weaknesses<S: ResourceSource>(source: &S, types: &[String]) -> Vec<WeaknessEntry> {
    let targets: Vec<String> = types.iter().map(|t| format!("type/{}", t)).collect();

    let resolved: Vec<TypeResource> = fetch_batch(source, &targets)
        .await
        .into_iter()
        .zip(&targets)
        .filter_map(|(value, target)| {
            let value = value?;
            decode(target, value)
                .inspect_err(|e| warn!("Ignoring type data: {}", e))
                .ok()
        })
        .collect();

    tally_weaknesses(&resolved)
}
