//! Output records and team summary text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::assembler::{SelectionPass, TeamResult};
use crate::models::{BaseStats, Member, Role};

/// Render a weakness set as a sorted, comma-joined string.
///
/// A single label renders bare (`"Ground"`), an empty set as `""`.
pub fn render_weaknesses(weaknesses: &BTreeSet<String>) -> String {
    weaknesses.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// One team member as handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub role: Role,
    #[serde(flatten)]
    pub stats: BaseStats,
    pub total_stat: u32,
    pub types: String,
    pub weaknesses: String,
}

impl From<&Member> for MemberRecord {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role,
            stats: member.stats,
            total_stat: member.total_stat,
            types: member.types.clone(),
            weaknesses: render_weaknesses(&member.weaknesses),
        }
    }
}

pub fn member_records(team: &TeamResult<'_>) -> Vec<MemberRecord> {
    team.members().map(MemberRecord::from).collect()
}

/// "Why this team?" figures for an assembled team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_size: usize,
    pub target_size: usize,
    /// Catalog names of the starters that made the team
    pub starters_found: Vec<String>,
    /// Requested starters with no catalog entry
    pub missing_starters: Vec<String>,
    /// Roles present on the team, in fill order
    pub role_counts: BTreeMap<Role, usize>,
    pub distinct_weaknesses: usize,
    /// Sum of per-member weakness counts
    pub total_weaknesses: usize,
    /// total - distinct
    pub overlap: usize,
    pub uncovered_roles: Vec<Role>,
}

impl TeamSummary {
    pub fn from_team(team: &TeamResult<'_>) -> Self {
        let mut role_counts = BTreeMap::new();
        for member in team.members() {
            *role_counts.entry(member.role).or_insert(0) += 1;
        }

        let total_weaknesses: usize = team.members().map(Member::weakness_count).sum();
        let distinct_weaknesses = team.coverage.len();

        Self {
            team_size: team.len(),
            target_size: team.target_size,
            starters_found: team
                .picks_from(SelectionPass::Starter)
                .map(|pick| pick.member.name.clone())
                .collect(),
            missing_starters: team.missing_starters.clone(),
            role_counts,
            distinct_weaknesses,
            total_weaknesses,
            overlap: total_weaknesses - distinct_weaknesses,
            uncovered_roles: team.uncovered_roles.iter().copied().collect(),
        }
    }

    /// Plain-text explanation of the team.
    pub fn explain(&self) -> String {
        if self.team_size == 0 {
            return "No team could be assembled.".to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        match self.starters_found.as_slice() {
            [] => {}
            [only] => parts.push(format!("Your starter was {only}.")),
            many => parts.push(format!("Your starters were {}.", many.join(", "))),
        }

        let roles = self
            .role_counts
            .iter()
            .map(|(role, count)| format!("{role} × {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        if self.uncovered_roles.is_empty() {
            parts.push(format!("Every required role is covered ({roles})."));
        } else {
            let uncovered = self
                .uncovered_roles
                .iter()
                .map(|role| role.label())
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Roles on the team: {roles}. Still uncovered: {uncovered}."));
        }

        parts.push(format!(
            "The team has {} distinct weaknesses across {} total matchups, so {} overlap.",
            self.distinct_weaknesses, self.total_weaknesses, self.overlap
        ));

        if !self.missing_starters.is_empty() {
            parts.push(format!("Not in catalog: {}.", self.missing_starters.join(", ")));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, TeamRequest};
    use crate::test_fixtures::sample_catalog;
    use insta::{assert_json_snapshot, assert_snapshot};

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_sorts_and_joins() {
        assert_eq!(render_weaknesses(&set(&["Rock", "Grass", "Ice"])), "Grass, Ice, Rock");
    }

    #[test]
    fn render_single_and_empty() {
        assert_eq!(render_weaknesses(&set(&["Ground"])), "Ground");
        assert_eq!(render_weaknesses(&BTreeSet::new()), "");
    }

    #[test]
    fn member_record_shape() {
        let catalog = sample_catalog();
        let record = MemberRecord::from(catalog.get("starmie").unwrap());
        assert_json_snapshot!(record, @r###"
        {
          "name": "Starmie",
          "role": "Special Sweeper",
          "hp": 60,
          "attack": 50,
          "defense": 60,
          "special-attack": 120,
          "special-defense": 50,
          "speed": 90,
          "total_stat": 430,
          "types": "Water,Psychic",
          "weaknesses": "Electric, Grass"
        }
        "###);
    }

    #[test]
    fn summary_counts_overlap() {
        let catalog = sample_catalog();
        let team = assemble(&catalog, &TeamRequest::new().with_starters(["pikachu"])).unwrap();
        let summary = TeamSummary::from_team(&team);

        assert_eq!(summary.team_size, 6);
        assert_eq!(summary.starters_found, vec!["Pikachu".to_string()]);
        assert_eq!(summary.total_weaknesses, 10);
        assert_eq!(summary.distinct_weaknesses, 9);
        assert_eq!(summary.overlap, 1);
        assert!(summary.uncovered_roles.is_empty());

        assert_snapshot!(summary.explain(), @"Your starter was Pikachu. Every required role is covered (Physical Sweeper × 1, Special Sweeper × 2, Tank × 1, Support × 2). The team has 9 distinct weaknesses across 10 total matchups, so 1 overlap.");
    }

    #[test]
    fn summary_reports_gaps() {
        let catalog = sample_catalog();
        let request =
            TeamRequest::new().with_starters(["Snorlax", "MissingNo"]).with_team_size(2);
        let team = assemble(&catalog, &request).unwrap();
        let summary = TeamSummary::from_team(&team);

        assert_eq!(summary.uncovered_roles, vec![Role::SpecialSweeper, Role::Support]);
        assert_snapshot!(summary.explain(), @"Your starter was Snorlax. Roles on the team: Physical Sweeper × 1, Tank × 1. Still uncovered: Special Sweeper, Support. The team has 3 distinct weaknesses across 3 total matchups, so 0 overlap. Not in catalog: missingno.");
    }

    #[test]
    fn summary_lists_every_starter() {
        let catalog = sample_catalog();
        let request = TeamRequest::new().with_starters(["chansey", "onix", "machamp"]);
        let team = assemble(&catalog, &request).unwrap();
        let text = TeamSummary::from_team(&team).explain();
        assert!(text.starts_with("Your starters were Chansey, Machamp. "));
        assert!(text.ends_with("Not in catalog: onix."));
    }

    #[test]
    fn empty_team_explains_itself() {
        let catalog = sample_catalog();
        let request = TeamRequest::new().with_floor(crate::models::StatKind::Speed, 200);
        let team = assemble(&catalog, &request).unwrap();
        assert_eq!(TeamSummary::from_team(&team).explain(), "No team could be assembled.");
    }
}
