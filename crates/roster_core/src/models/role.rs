//! Role classification from a base-stat block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::member::{BaseStats, StatKind};

/// Minimum speed for either sweeper role.
pub const SWEEPER_MIN_SPEED: u16 = 75;

/// Functional role of a member.
///
/// Variant order is also the order in which missing roles are filled
/// during team assembly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Role {
    #[serde(rename = "Physical Sweeper")]
    PhysicalSweeper,
    #[serde(rename = "Special Sweeper")]
    SpecialSweeper,
    #[serde(rename = "Tank")]
    Tank,
    #[serde(rename = "Support")]
    Support,
}

impl Role {
    pub const ALL: [Role; 4] =
        [Role::PhysicalSweeper, Role::SpecialSweeper, Role::Tank, Role::Support];

    pub fn label(self) -> &'static str {
        match self {
            Role::PhysicalSweeper => "Physical Sweeper",
            Role::SpecialSweeper => "Special Sweeper",
            Role::Tank => "Tank",
            Role::Support => "Support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts the display label in any case, with space, dash or underscore separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "physicalsweeper" => Ok(Role::PhysicalSweeper),
            "specialsweeper" => Ok(Role::SpecialSweeper),
            "tank" => Ok(Role::Tank),
            "support" => Ok(Role::Support),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Map a stat block to exactly one role.
///
/// 1. Physical Sweeper: attack is the highest stat and speed >= 75
/// 2. Special Sweeper: special-attack is the highest stat and speed >= 75
/// 3. Tank: hp, defense or special-defense is the highest stat
/// 4. Support: everything else
pub fn classify(stats: &BaseStats) -> Role {
    let fast = stats.speed >= SWEEPER_MIN_SPEED;
    match stats.highest() {
        StatKind::Attack if fast => Role::PhysicalSweeper,
        StatKind::SpecialAttack if fast => Role::SpecialSweeper,
        StatKind::Hp | StatKind::Defense | StatKind::SpecialDefense => Role::Tank,
        _ => Role::Support,
    }
}
