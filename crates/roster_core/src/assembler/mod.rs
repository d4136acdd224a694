//! Greedy team assembly.
//!
//! Passes run in a fixed order and never revisit an earlier pick:
//! 1. starters (exempt from floors)
//! 2. role coverage: first overlap-free candidate for each missing role
//! 3. zero-overlap fill
//! 4. backfill from the front of the pool, overlap allowed
//!
//! The candidate pool is every non-starter meeting all floors, sorted by
//! (weakness count, total stat, name) ascending.

pub mod request;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::data::Catalog;
use crate::error::{Result, RosterError};
use crate::models::{Member, Role};

pub use request::{StatFloors, TeamPlan, TeamRequest, DEFAULT_TEAM_SIZE, MAX_STARTERS};

/// Which pass selected a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPass {
    Starter,
    RoleCoverage,
    ZeroOverlap,
    Backfill,
}

#[derive(Debug, Clone, Copy)]
pub struct Pick<'a> {
    pub member: &'a Member,
    pub pass: SelectionPass,
}

/// Union of the weaknesses of every selected member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaknessCoverage {
    labels: BTreeSet<String>,
}

impl WeaknessCoverage {
    pub fn is_disjoint(&self, member: &Member) -> bool {
        self.labels.is_disjoint(&member.weaknesses)
    }

    pub fn merge(&mut self, member: &Member) {
        self.labels.extend(member.weaknesses.iter().cloned());
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Outcome of one assembly call.
#[derive(Debug, Clone)]
pub struct TeamResult<'a> {
    /// Selected members: starters first, then in selection order
    pub picks: Vec<Pick<'a>>,
    pub coverage: WeaknessCoverage,
    /// Coverage size after each pick
    pub coverage_history: Vec<usize>,
    /// Required roles absent from the final team
    pub uncovered_roles: BTreeSet<Role>,
    /// Starter names (as requested) not found in the catalog
    pub missing_starters: Vec<String>,
    pub target_size: usize,
}

impl<'a> TeamResult<'a> {
    pub fn members(&self) -> impl Iterator<Item = &'a Member> + '_ {
        self.picks.iter().map(|pick| pick.member)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.picks.iter().map(|pick| pick.member.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn picks_from(&self, pass: SelectionPass) -> impl Iterator<Item = &Pick<'a>> + '_ {
        self.picks.iter().filter(move |pick| pick.pass == pass)
    }
}

/// Validate `request` and assemble a team from `catalog`.
///
/// Starters missing from the catalog are skipped; the ones found must fit
/// in the team.
pub fn assemble<'a>(catalog: &'a Catalog, request: &TeamRequest) -> Result<TeamResult<'a>> {
    let plan = request.plan()?;

    let seated = plan.starters.iter().filter(|name| catalog.contains(name)).count();
    if seated > plan.team_size {
        return Err(RosterError::invalid_request(format!(
            "{} starters do not fit in a team of {}",
            seated, plan.team_size
        )));
    }

    Ok(TeamAssembler::new(catalog, &plan).run())
}

/// Working state for a single assembly.
struct TeamAssembler<'a, 'p> {
    catalog: &'a Catalog,
    plan: &'p TeamPlan,
    picks: Vec<Pick<'a>>,
    coverage: WeaknessCoverage,
    coverage_history: Vec<usize>,
    covered_roles: BTreeSet<Role>,
    missing_starters: Vec<String>,
}

impl<'a, 'p> TeamAssembler<'a, 'p> {
    fn new(catalog: &'a Catalog, plan: &'p TeamPlan) -> Self {
        // The team can never outgrow the catalog
        let capacity = plan.team_size.min(catalog.len());
        Self {
            catalog,
            plan,
            picks: Vec::with_capacity(capacity),
            coverage: WeaknessCoverage::default(),
            coverage_history: Vec::with_capacity(capacity),
            covered_roles: BTreeSet::new(),
            missing_starters: Vec::new(),
        }
    }

    fn run(mut self) -> TeamResult<'a> {
        self.seed_starters();

        let pool = self.candidate_pool();
        debug!("Candidate pool: {} members", pool.len());

        let pool = self.cover_roles(pool);
        let pool = self.fill_zero_overlap(pool);
        self.backfill(pool);

        let uncovered_roles: BTreeSet<Role> =
            self.plan.required_roles.difference(&self.covered_roles).copied().collect();

        info!(
            "Assembled team of {} (target {}), {} distinct weaknesses, uncovered roles: {:?}",
            self.picks.len(),
            self.plan.team_size,
            self.coverage.len(),
            uncovered_roles
        );

        TeamResult {
            picks: self.picks,
            coverage: self.coverage,
            coverage_history: self.coverage_history,
            uncovered_roles,
            missing_starters: self.missing_starters,
            target_size: self.plan.team_size,
        }
    }

    fn is_full(&self) -> bool {
        self.picks.len() >= self.plan.team_size
    }

    fn is_picked(&self, member: &Member) -> bool {
        self.picks.iter().any(|pick| std::ptr::eq(pick.member, member))
    }

    fn push(&mut self, member: &'a Member, pass: SelectionPass) {
        debug!("{:?} pick: {} ({})", pass, member.name, member.role);
        self.coverage.merge(member);
        self.coverage_history.push(self.coverage.len());
        self.covered_roles.insert(member.role);
        self.picks.push(Pick { member, pass });
    }

    fn seed_starters(&mut self) {
        let plan = self.plan;
        for name in &plan.starters {
            match self.catalog.get(name) {
                Some(member) if !self.is_picked(member) => {
                    self.push(member, SelectionPass::Starter)
                }
                Some(_) => {}
                None => {
                    warn!("Starter '{}' not found in catalog", name);
                    self.missing_starters.push(name.clone());
                }
            }
        }
    }

    fn candidate_pool(&self) -> Vec<&'a Member> {
        let mut pool: Vec<&'a Member> = self
            .catalog
            .iter()
            .filter(|member| !self.is_picked(member))
            .filter(|member| self.plan.floors.admits(&member.stats))
            .collect();

        pool.sort_by(|a, b| {
            a.weakness_count()
                .cmp(&b.weakness_count())
                .then(a.total_stat.cmp(&b.total_stat))
                .then_with(|| a.name.cmp(&b.name))
        });
        pool
    }

    /// One overlap-free pick per missing role, in [`Role`] order.
    fn cover_roles(&mut self, mut pool: Vec<&'a Member>) -> Vec<&'a Member> {
        let missing: Vec<Role> =
            self.plan.required_roles.difference(&self.covered_roles).copied().collect();

        for role in missing {
            if self.is_full() {
                break;
            }

            let found =
                pool.iter().copied().find(|m| m.role == role && self.coverage.is_disjoint(m));
            match found {
                Some(member) => {
                    self.push(member, SelectionPass::RoleCoverage);
                    pool = pool.into_iter().filter(|m| !std::ptr::eq(*m, member)).collect();
                }
                None => debug!("No overlap-free candidate for role {}", role),
            }
        }
        pool
    }

    fn fill_zero_overlap(&mut self, pool: Vec<&'a Member>) -> Vec<&'a Member> {
        let mut remaining = Vec::with_capacity(pool.len());
        for member in pool {
            if !self.is_full() && self.coverage.is_disjoint(member) {
                self.push(member, SelectionPass::ZeroOverlap);
            } else {
                remaining.push(member);
            }
        }
        remaining
    }

    fn backfill(&mut self, pool: Vec<&'a Member>) {
        let open = self.plan.team_size.saturating_sub(self.picks.len());
        for member in pool.into_iter().take(open) {
            self.push(member, SelectionPass::Backfill);
        }
    }
}
