use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{SheetError, SheetResult},
    sheet::stats::StatKey,
};

/// Reads a fetched resource into one of the shapes below
pub fn decode<T: DeserializeOwned>(target: &str, value: Value) -> SheetResult<T> {
    serde_json::from_value(value).map_err(|source| SheetError::Decode {
        url: target.to_string(),
        source,
    })
}

/// A `{name, url}` pointer to another resource
#[derive(Deserialize, Clone, Debug, Default)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One fetched creature, the base of a sheet
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureRecord {
    pub name: String,
    /// Base stats in the order the API lists them
    pub base_stats: Vec<(StatKey, u32)>,
    pub types: Vec<String>,
    pub abilities: Vec<AbilityRef>,
    pub moves: Vec<MoveLearnEntry>,
    pub artwork: Artwork,
}

/// An ability a creature can have
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityRef {
    pub name: String,
    pub url: String,
    pub hidden: bool,
}

/// A move and every way the creature can learn it
#[derive(Clone, Debug, PartialEq)]
pub struct MoveLearnEntry {
    pub name: String,
    pub url: String,
    pub learned: Vec<LearnDetail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LearnDetail {
    pub method: String,
    pub level: u32,
}

/// Official artwork URLs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Artwork {
    pub normal: Option<String>,
    pub shiny: Option<String>,
}

impl CreatureRecord {
    /// Builds a record from a `pokemon/{name}` resource
    /// Stats the sheet doesn't know are dropped here
    pub fn from_value(target: &str, value: Value) -> SheetResult<Self> {
        let raw: RawCreature = decode(target, value)?;

        let base_stats = raw
            .stats
            .into_iter()
            .filter_map(|s| StatKey::from_api_name(&s.stat.name).map(|key| (key, s.base_stat)))
            .collect();

        let artwork = raw
            .sprites
            .and_then(|s| s.other)
            .and_then(|o| o.official_artwork)
            .map(|a| Artwork {
                normal: a.front_default,
                shiny: a.front_shiny,
            })
            .unwrap_or_default();

        Ok(Self {
            name: raw.name,
            base_stats,
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: raw
                .abilities
                .into_iter()
                .map(|a| AbilityRef {
                    name: a.ability.name,
                    url: a.ability.url,
                    hidden: a.is_hidden,
                })
                .collect(),
            moves: raw
                .moves
                .into_iter()
                .map(|m| MoveLearnEntry {
                    name: m.entry.name,
                    url: m.entry.url,
                    learned: m
                        .version_group_details
                        .into_iter()
                        .map(|d| LearnDetail {
                            method: d.move_learn_method.name,
                            level: d.level_learned_at,
                        })
                        .collect(),
                })
                .collect(),
            artwork,
        })
    }
}

#[derive(Deserialize)]
struct RawCreature {
    name: String,
    #[serde(default)]
    stats: Vec<RawStat>,
    #[serde(default)]
    types: Vec<RawTypeSlot>,
    #[serde(default)]
    abilities: Vec<RawAbilitySlot>,
    #[serde(default)]
    moves: Vec<RawMoveSlot>,
    #[serde(default)]
    sprites: Option<RawSprites>,
}

#[derive(Deserialize)]
struct RawStat {
    stat: NamedResource,
    base_stat: u32,
}

#[derive(Deserialize)]
struct RawTypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct RawAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Deserialize)]
struct RawMoveSlot {
    #[serde(rename = "move")]
    entry: NamedResource,
    #[serde(default)]
    version_group_details: Vec<RawLearnDetail>,
}

#[derive(Deserialize)]
struct RawLearnDetail {
    move_learn_method: NamedResource,
    #[serde(default)]
    level_learned_at: u32,
}

#[derive(Deserialize)]
struct RawSprites {
    #[serde(default)]
    other: Option<RawOtherSprites>,
}

#[derive(Deserialize)]
struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<RawArtwork>,
}

#[derive(Deserialize)]
struct RawArtwork {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    front_shiny: Option<String>,
}

/// `pokemon-species/{name}`, only the variety list is used
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SpeciesResource {
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Variety {
    pub pokemon: NamedResource,
}

impl SpeciesResource {
    /// Names of every variety except `default_name`
    pub fn alternatives_to(&self, default_name: &str) -> Vec<String> {
        let default_name = default_name.to_lowercase();
        self.varieties
            .iter()
            .map(|v| v.pokemon.name.clone())
            .filter(|name| *name != default_name)
            .collect()
    }
}

/// An ability reference, resolved
#[derive(Deserialize, Clone, Debug, Default)]
pub struct AbilityResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EffectEntry {
    #[serde(default)]
    pub short_effect: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    pub language: NamedResource,
}

impl EffectEntry {
    /// The short effect, or the long one when the short one is empty
    pub fn text(&self) -> Option<&str> {
        [self.short_effect.as_deref(), self.effect.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
    }
}

/// A move reference, resolved
#[derive(Deserialize, Clone, Debug)]
pub struct MoveResource {
    #[serde(rename = "type", default)]
    pub kind: Option<NamedResource>,
    #[serde(default)]
    pub damage_class: Option<NamedResource>,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
}

/// `type/{name}`, only the incoming double damage list is used
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TypeResource {
    #[serde(default)]
    pub damage_relations: DamageRelations,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DamageRelations {
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
}
