//! Team request: wire form, validation, and the resolved plan.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::error::{Result, RosterError};
use crate::models::{normalize_name, BaseStats, Role, StatKind};

pub const DEFAULT_TEAM_SIZE: usize = 6;
pub const MAX_STARTERS: usize = 3;

/// Team-building request.
///
/// Field names match the JSON payload accepted by `build_team_json`:
/// ```json
/// { "starters": ["Pikachu"], "hp_floor": 80, "atk_floor": 100, "team_size": 6 }
/// ```
/// Floors apply to non-starters only. Omitted fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct TeamRequest {
    /// Pre-selected member names, matched case-insensitively. At most
    /// [`MAX_STARTERS`] distinct names; repeats count once.
    #[serde(default)]
    pub starters: Vec<String>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub hp_floor: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub atk_floor: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub def_floor: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub spatk_floor: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub spdef_floor: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub spd_floor: i32,

    /// Target team size, 6 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub team_size: Option<i32>,

    /// Roles the assembler tries to cover, all four when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<BTreeSet<Role>>,
}

impl TeamRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starters<I, S>(mut self, starters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.starters = starters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_floor(mut self, kind: StatKind, value: i32) -> Self {
        *self.floor_mut(kind) = value;
        self
    }

    pub fn with_team_size(mut self, team_size: i32) -> Self {
        self.team_size = Some(team_size);
        self
    }

    pub fn with_required_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn floor(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Hp => self.hp_floor,
            StatKind::Attack => self.atk_floor,
            StatKind::Defense => self.def_floor,
            StatKind::SpecialAttack => self.spatk_floor,
            StatKind::SpecialDefense => self.spdef_floor,
            StatKind::Speed => self.spd_floor,
        }
    }

    fn floor_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Hp => &mut self.hp_floor,
            StatKind::Attack => &mut self.atk_floor,
            StatKind::Defense => &mut self.def_floor,
            StatKind::SpecialAttack => &mut self.spatk_floor,
            StatKind::SpecialDefense => &mut self.spdef_floor,
            StatKind::Speed => &mut self.spd_floor,
        }
    }

    /// Validate and resolve defaults.
    pub fn plan(&self) -> Result<TeamPlan> {
        self.validate()?;

        let mut starters: Vec<String> = Vec::with_capacity(self.starters.len());
        for name in &self.starters {
            let key = normalize_name(name);
            if !key.is_empty() && !starters.contains(&key) {
                starters.push(key);
            }
        }

        if starters.len() > MAX_STARTERS {
            return Err(RosterError::invalid_request(format!(
                "{} distinct starters given, at most {} allowed",
                starters.len(),
                MAX_STARTERS
            )));
        }

        let team_size = match self.team_size {
            Some(size) => size as usize,
            None => DEFAULT_TEAM_SIZE,
        };

        let mut floors = StatFloors::default();
        for kind in StatKind::ALL {
            // validated non-negative above
            floors.set(kind, self.floor(kind).max(0) as u32);
        }

        let required_roles =
            self.required_roles.clone().unwrap_or_else(|| Role::ALL.into_iter().collect());

        Ok(TeamPlan { starters, floors, team_size, required_roles })
    }
}

/// Minimum stat values a non-starter must meet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatFloors {
    values: [u32; 6],
}

impl StatFloors {
    pub fn get(&self, kind: StatKind) -> u32 {
        self.values[kind as usize]
    }

    pub fn set(&mut self, kind: StatKind, value: u32) {
        self.values[kind as usize] = value;
    }

    pub fn admits(&self, stats: &BaseStats) -> bool {
        StatKind::ALL.iter().all(|&kind| u32::from(stats.get(kind)) >= self.get(kind))
    }
}

/// A validated request with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPlan {
    /// Normalized, de-duplicated starter names in request order
    pub starters: Vec<String>,
    pub floors: StatFloors,
    pub team_size: usize,
    pub required_roles: BTreeSet<Role>,
}
