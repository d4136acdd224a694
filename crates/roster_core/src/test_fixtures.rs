//! Shared catalog fixtures for unit tests.

use crate::data::Catalog;
use crate::models::{BaseStats, Member, Role};

/// Stat block that classifies as `role`.
pub fn stats_for(role: Role) -> BaseStats {
    match role {
        Role::Tank => BaseStats::new(120, 50, 60, 50, 60, 40),
        Role::PhysicalSweeper => BaseStats::new(60, 120, 60, 50, 50, 90),
        Role::SpecialSweeper => BaseStats::new(60, 50, 60, 120, 50, 90),
        Role::Support => BaseStats::new(50, 50, 50, 50, 50, 100),
    }
}

pub fn member(name: &str, role: Role, weaknesses: &[&str]) -> Member {
    let member = Member::new(name, stats_for(role), weaknesses.iter().copied());
    debug_assert_eq!(member.role, role);
    member
}

pub fn catalog(members: Vec<Member>) -> Catalog {
    Catalog::from_members("test", members)
}

/// Small mixed catalog used by API and summary tests.
pub fn sample_catalog() -> Catalog {
    catalog(vec![
        Member::new("Pikachu", BaseStats::new(35, 55, 40, 50, 50, 90), ["Ground"])
            .with_types("Electric"),
        member("Snorlax", Role::Tank, &["Fighting"]).with_types("Normal"),
        member("Machamp", Role::PhysicalSweeper, &["Flying", "Psychic"]).with_types("Fighting"),
        member("Alakazam", Role::SpecialSweeper, &["Bug", "Dark", "Ghost"]).with_types("Psychic"),
        member("Chansey", Role::Support, &["Fighting"]).with_types("Normal"),
        member("Starmie", Role::SpecialSweeper, &["Electric", "Grass"]).with_types("Water,Psychic"),
    ])
}
