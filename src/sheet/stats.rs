use serde::{Deserialize, Serialize};

use super::nature::NatureModifier;

/// The six stats a sheet tracks
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StatKey {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKey {
    /// Every stat, in sheet order
    pub const ALL: [StatKey; 6] = [
        StatKey::Hp,
        StatKey::Attack,
        StatKey::Defense,
        StatKey::SpecialAttack,
        StatKey::SpecialDefense,
        StatKey::Speed,
    ];

    /// Maps the reference API stat name, unknown names give `None`
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "hp" => Some(StatKey::Hp),
            "attack" => Some(StatKey::Attack),
            "defense" => Some(StatKey::Defense),
            "special-attack" => Some(StatKey::SpecialAttack),
            "special-defense" => Some(StatKey::SpecialDefense),
            "speed" => Some(StatKey::Speed),
            _ => None,
        }
    }

    /// Short label shown on the sheet
    pub fn label(self) -> &'static str {
        match self {
            StatKey::Hp => "HP",
            StatKey::Attack => "ATK",
            StatKey::Defense => "DEF",
            StatKey::SpecialAttack => "SP.ATK",
            StatKey::SpecialDefense => "SP.DEF",
            StatKey::Speed => "SPD",
        }
    }

    fn index(self) -> usize {
        match self {
            StatKey::Hp => 0,
            StatKey::Attack => 1,
            StatKey::Defense => 2,
            StatKey::SpecialAttack => 3,
            StatKey::SpecialDefense => 4,
            StatKey::Speed => 5,
        }
    }
}

/// Derived stat values, never negative
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatBlock {
    values: [u32; 6],
}

impl StatBlock {
    pub fn get(&self, key: StatKey) -> u32 {
        self.values[key.index()]
    }

    /// Stats in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, u32)> + '_ {
        StatKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    fn set(&mut self, key: StatKey, value: u32) {
        self.values[key.index()] = value;
    }
}

/// Result of projecting base stats to a level
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub stats: StatBlock,
    /// The three highest non-hp base stats, highest first
    pub top_three: Vec<StatKey>,
}

/// How much a nature moves a stat at the given level
pub fn nature_magnitude(level: u32) -> i64 {
    match level {
        0..=4 => 1,
        5..=9 => 2,
        10..=14 => 3,
        _ => 4,
    }
}

/// Projects base stats to a level
///
/// hp grows by 5 per level on its own. Every other stat starts at a tenth of
/// its base (rounded up), then the nature shifts, then the top three base
/// stats grow by one per level. Clamping to zero happens last, so a stat
/// pushed down by its nature can end at 0.
pub fn project(base: &[(StatKey, u32)], level: u32, nature: NatureModifier) -> Projection {
    let growth = i64::from(level.saturating_sub(1));

    let base_of = |key: StatKey| base.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

    let mut derived: Vec<(StatKey, i64)> = base
        .iter()
        .filter(|(key, _)| *key != StatKey::Hp)
        .map(|(key, value)| (*key, i64::from(value.div_ceil(10))))
        .collect();

    let magnitude = nature_magnitude(level);
    let mut shift = |key: Option<StatKey>, delta: i64| {
        if let Some(key) = key {
            if let Some((_, value)) = derived.iter_mut().find(|(k, _)| *k == key) {
                *value += delta;
            }
        }
    };
    if !nature.is_neutral() {
        shift(nature.increased, magnitude);
        shift(nature.decreased, -magnitude);
    }

    let top_three = top_three(base);
    for key in &top_three {
        if let Some((_, value)) = derived.iter_mut().find(|(k, _)| k == key) {
            *value += growth;
        }
    }

    let mut stats = StatBlock::default();
    let hp = i64::from(base_of(StatKey::Hp).unwrap_or(0)) + growth * 5;
    stats.set(StatKey::Hp, clamp(hp));
    for (key, value) in derived {
        stats.set(key, clamp(value));
    }

    Projection { stats, top_three }
}

/// The three highest non-hp base stats, ties keep their original order
pub fn top_three(base: &[(StatKey, u32)]) -> Vec<StatKey> {
    let mut ranked: Vec<&(StatKey, u32)> = base.iter().filter(|(k, _)| *k != StatKey::Hp).collect();
    // stable, so equal values stay in API order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(3).map(|(k, _)| *k).collect()
}

fn clamp(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
