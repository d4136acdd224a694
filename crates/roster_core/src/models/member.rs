//! Catalog member and its base-stat block.
//!
//! Field names on the wire follow the source dataset columns
//! (`hp`, `attack`, `defense`, `special-attack`, `special-defense`, `speed`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::role::{classify, Role};

/// One of the six base attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    /// Column order of the dataset. When two stats tie for the maximum,
    /// the one listed first wins.
    pub const ALL: [StatKind; 6] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpecialAttack,
        StatKind::SpecialDefense,
        StatKind::Speed,
    ];

    /// CSV column name
    pub fn column(self) -> &'static str {
        match self {
            StatKind::Hp => "hp",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::SpecialAttack => "special-attack",
            StatKind::SpecialDefense => "special-defense",
            StatKind::Speed => "speed",
        }
    }
}

/// Six base attributes of a member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    #[serde(rename = "special-attack")]
    pub special_attack: u16,
    #[serde(rename = "special-defense")]
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn new(
        hp: u16,
        attack: u16,
        defense: u16,
        special_attack: u16,
        special_defense: u16,
        speed: u16,
    ) -> Self {
        Self { hp, attack, defense, special_attack, special_defense, speed }
    }

    pub fn get(&self, kind: StatKind) -> u16 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpecialAttack => self.special_attack,
            StatKind::SpecialDefense => self.special_defense,
            StatKind::Speed => self.speed,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: u16) {
        match kind {
            StatKind::Hp => self.hp = value,
            StatKind::Attack => self.attack = value,
            StatKind::Defense => self.defense = value,
            StatKind::SpecialAttack => self.special_attack = value,
            StatKind::SpecialDefense => self.special_defense = value,
            StatKind::Speed => self.speed = value,
        }
    }

    /// Sum of all six stats
    pub fn total(&self) -> u32 {
        StatKind::ALL.iter().map(|&kind| u32::from(self.get(kind))).sum()
    }

    /// Stat with the highest value; ties resolve to the earliest in [`StatKind::ALL`].
    pub fn highest(&self) -> StatKind {
        let mut best = StatKind::Hp;
        for kind in StatKind::ALL {
            if self.get(kind) > self.get(best) {
                best = kind;
            }
        }
        best
    }
}

/// A catalog entry.
///
/// `role` is always derived from `stats` through [`classify`]; the only
/// constructors compute it, and cached catalogs are reclassified on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub stats: BaseStats,
    pub total_stat: u32,
    /// Type tags, passed through untouched from the source
    #[serde(default)]
    pub types: String,
    pub weaknesses: BTreeSet<String>,
    pub role: Role,
}

impl Member {
    pub fn new<I, S>(name: impl Into<String>, stats: BaseStats, weaknesses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let weaknesses = weaknesses
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            name: name.into(),
            total_stat: stats.total(),
            role: classify(&stats),
            stats,
            types: String::new(),
            weaknesses,
        }
    }

    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = types.into();
        self
    }

    /// Keep a total score supplied by the source instead of the computed sum.
    pub fn with_total_stat(mut self, total_stat: u32) -> Self {
        self.total_stat = total_stat;
        self
    }

    /// Recompute the derived role from the current stats.
    pub fn reclassified(mut self) -> Self {
        self.role = classify(&self.stats);
        self
    }

    pub fn weakness_count(&self) -> usize {
        self.weaknesses.len()
    }

    /// Case-insensitive name comparison against an already normalized key.
    pub fn matches_name(&self, normalized: &str) -> bool {
        normalize_name(&self.name) == normalized
    }
}

/// Lookup key for member names: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a serialized weakness field into a set of labels.
///
/// Accepts the plain delimited form (`"Ground, Rock"`) as well as
/// list/set literals (`"['Ground', 'Rock']"`, `"{'Ground'}"`).
pub fn parse_weaknesses(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|part| {
            part.trim_matches(|c: char| c.is_whitespace() || "[]{}'\"".contains(c))
                .to_string()
        })
        .filter(|part| !part.is_empty())
        .collect()
}
