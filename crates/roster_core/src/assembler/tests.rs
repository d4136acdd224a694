use super::*;
use crate::models::{BaseStats, StatKind};
use crate::test_fixtures::{catalog, member};
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn nothing_qualifies_gives_empty_team() {
    let catalog = catalog(vec![
        member("Onix", Role::Tank, &["Water"]),
        member("Jolteon", Role::SpecialSweeper, &["Ground"]),
    ]);
    let request = TeamRequest::new().with_floor(StatKind::Hp, 250);

    let team = assemble(&catalog, &request).unwrap();
    assert!(team.is_empty());
    assert!(team.coverage.is_empty());
    assert_eq!(team.uncovered_roles.len(), 4);
}

#[test]
fn empty_catalog_gives_empty_team() {
    let catalog = catalog(Vec::new());
    let team = assemble(&catalog, &TeamRequest::new().with_starters(["Pikachu"])).unwrap();
    assert!(team.is_empty());
    assert_eq!(team.missing_starters, vec!["pikachu".to_string()]);
}

#[test]
fn starter_match_ignores_case_and_comes_first() {
    let catalog = catalog(vec![
        member("Eevee", Role::Support, &[]),
        Member::new("Pikachu", BaseStats::new(35, 55, 40, 50, 50, 90), ["Ground"]),
        member("Onix", Role::Tank, &["Water"]),
    ]);
    let request = TeamRequest::new().with_starters(["pikachu"]);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names()[0], "Pikachu");
    assert_eq!(team.picks[0].pass, SelectionPass::Starter);
    assert!(team.missing_starters.is_empty());
}

#[test]
fn lone_tank_is_taken_by_role_coverage() {
    // Onix overlaps every other candidate but not the starter
    let catalog = catalog(vec![
        Member::new("Pikachu", BaseStats::new(35, 55, 40, 50, 50, 90), ["Ground"]),
        member("Onix", Role::Tank, &["Water", "Grass"]),
        member("A", Role::PhysicalSweeper, &["Water"]),
        member("B", Role::SpecialSweeper, &["Grass"]),
        member("C", Role::Support, &["Water", "Grass"]),
    ]);
    let request =
        TeamRequest::new().with_starters(["pikachu"]).with_required_roles([Role::Tank]);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.picks[1].member.name, "Onix");
    assert_eq!(team.picks[1].pass, SelectionPass::RoleCoverage);
    assert!(team.uncovered_roles.is_empty());

    // Nothing else is disjoint, so the rest come from backfill in pool order
    assert_eq!(team.names(), vec!["Pikachu", "Onix", "A", "B", "C"]);
    assert_eq!(team.picks_from(SelectionPass::Backfill).count(), 3);
}

#[test]
fn short_pool_is_not_padded() {
    let catalog = catalog(vec![
        member("Machamp", Role::PhysicalSweeper, &["Psychic"]),
        member("Alakazam", Role::SpecialSweeper, &["Bug"]),
        member("Snorlax", Role::Tank, &["Fighting"]),
        member("Chansey", Role::Support, &["Fighting"]),
        member("Blissey", Role::Support, &[]),
    ]);
    // Supports have 50 hp
    let request = TeamRequest::new().with_floor(StatKind::Hp, 60);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.len(), 3);
    assert_eq!(team.target_size, 6);
    assert!(team.picks_from(SelectionPass::Backfill).next().is_none());
    assert_eq!(team.uncovered_roles, [Role::Support].into_iter().collect());
}

#[test]
fn pool_orders_by_weakness_count_then_total_then_name() {
    let catalog = catalog(vec![
        member("Xav", Role::PhysicalSweeper, &["Fire", "Ice"]),
        member("Abe", Role::PhysicalSweeper, &["Fire", "Ice"]),
        member("Yan", Role::Tank, &["Fire"]),
        member("Zed", Role::Support, &["Fire"]),
    ]);
    let request = TeamRequest::new().with_required_roles([]).with_team_size(4);

    let team = assemble(&catalog, &request).unwrap();
    // Zed (1 weakness, 350) < Yan (1, 380) < Abe (2, 430) < Xav (2, 430, name)
    assert_eq!(team.names(), vec!["Zed", "Yan", "Abe", "Xav"]);
    assert_eq!(team.picks[0].pass, SelectionPass::ZeroOverlap);
    assert!(team.picks[1..].iter().all(|p| p.pass == SelectionPass::Backfill));
}

#[test]
fn zero_overlap_fill_skips_overlapping_candidates() {
    let catalog = catalog(vec![
        member("Eevee", Role::Support, &["Fighting"]),
        member("Snorlax", Role::Tank, &["Fighting"]),
        member("Gengar", Role::SpecialSweeper, &["Dark", "Ghost"]),
    ]);
    let request = TeamRequest::new().with_required_roles([]).with_team_size(2);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Eevee", "Gengar"]);
    assert!(team.picks.iter().all(|p| p.pass == SelectionPass::ZeroOverlap));
}

#[test]
fn roles_are_covered_in_fixed_order_and_stop_when_full() {
    let catalog = catalog(vec![
        member("Chansey", Role::Support, &[]),
        member("Snorlax", Role::Tank, &["Rock"]),
        member("Alakazam", Role::SpecialSweeper, &["Ice"]),
        member("Machamp", Role::PhysicalSweeper, &["Fire"]),
    ]);
    let request = TeamRequest::new().with_team_size(2);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Machamp", "Alakazam"]);
    assert!(team.picks.iter().all(|p| p.pass == SelectionPass::RoleCoverage));
    assert_eq!(team.uncovered_roles, [Role::Tank, Role::Support].into_iter().collect());
}

#[test]
fn role_left_uncovered_when_every_candidate_overlaps() {
    let catalog = catalog(vec![
        member("Golem", Role::Tank, &["Water"]),
        member("Starmie", Role::SpecialSweeper, &["Electric"]),
        member("Lapras", Role::Support, &["Water"]),
    ]);
    let request = TeamRequest::new()
        .with_starters(["Lapras"])
        .with_required_roles([Role::Tank])
        .with_team_size(2);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Lapras", "Starmie"]);
    assert_eq!(team.picks[1].pass, SelectionPass::ZeroOverlap);
    assert_eq!(team.uncovered_roles, [Role::Tank].into_iter().collect());
}

#[test]
fn starters_bypass_floors() {
    let catalog = catalog(vec![
        Member::new("Pikachu", BaseStats::new(35, 55, 40, 50, 50, 90), ["Ground"]),
        Member::new("Rattata", BaseStats::new(30, 56, 35, 25, 35, 72), ["Fighting"]),
        member("Snorlax", Role::Tank, &["Fighting"]),
    ]);
    let request = TeamRequest::new().with_starters(["Pikachu"]).with_floor(StatKind::Hp, 100);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Pikachu", "Snorlax"]);
}

#[test]
fn unknown_starters_are_reported_not_fatal() {
    let catalog = catalog(vec![member("Onix", Role::Tank, &["Water"])]);
    let request = TeamRequest::new().with_starters(["MissingNo", "onix"]);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Onix"]);
    assert_eq!(team.missing_starters, vec!["missingno".to_string()]);
}

#[test]
fn starters_keep_request_order() {
    let catalog = catalog(vec![
        member("Onix", Role::Tank, &["Water"]),
        member("Jolteon", Role::SpecialSweeper, &["Ground"]),
        member("Eevee", Role::Support, &["Fighting"]),
    ]);
    let request = TeamRequest::new().with_starters(["eevee", "ONIX", "jolteon"]).with_team_size(3);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Eevee", "Onix", "Jolteon"]);
}

#[test]
fn invalid_request_fails_before_assembly() {
    let catalog = catalog(vec![member("Onix", Role::Tank, &["Water"])]);
    let err = assemble(&catalog, &TeamRequest::new().with_team_size(0)).unwrap_err();
    assert_eq!(err.code(), "INVALID_REQUEST");
}

#[test]
fn maximal_team_size_takes_whole_catalog() {
    let catalog = catalog(vec![
        member("Onix", Role::Tank, &["Water"]),
        member("Jolteon", Role::SpecialSweeper, &["Ground"]),
        member("Eevee", Role::Support, &["Fighting"]),
    ]);
    let request = TeamRequest::new().with_team_size(i32::MAX);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.len(), catalog.len());
    assert_eq!(team.target_size, i32::MAX as usize);
}

#[test]
fn found_starters_must_fit_team_size() {
    let catalog = catalog(vec![
        member("Onix", Role::Tank, &["Water"]),
        member("Jolteon", Role::SpecialSweeper, &["Ground"]),
    ]);

    let request = TeamRequest::new().with_starters(["onix", "jolteon"]).with_team_size(1);
    let err = assemble(&catalog, &request).unwrap_err();
    assert!(matches!(err, RosterError::InvalidRequest(ref msg) if msg.contains("do not fit")));
}

#[test]
fn unknown_starters_do_not_take_seats() {
    let catalog = catalog(vec![
        member("Onix", Role::Tank, &["Water"]),
        member("Jolteon", Role::SpecialSweeper, &["Ground"]),
    ]);
    let request = TeamRequest::new().with_starters(["onix", "missingno"]).with_team_size(1);

    let team = assemble(&catalog, &request).unwrap();
    assert_eq!(team.names(), vec!["Onix"]);
    assert_eq!(team.missing_starters, vec!["missingno".to_string()]);
}

#[test]
fn coverage_history_tracks_each_pick() {
    let catalog = catalog(vec![
        member("Machamp", Role::PhysicalSweeper, &["Flying", "Psychic"]),
        member("Snorlax", Role::Tank, &["Fighting"]),
        member("Chansey", Role::Support, &["Fighting"]),
    ]);
    let team = assemble(&catalog, &TeamRequest::new()).unwrap();

    assert_eq!(team.coverage_history.len(), team.len());
    assert_eq!(team.coverage_history.last().copied(), Some(team.coverage.len()));
    assert_eq!(
        team.coverage.labels().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Fighting", "Flying", "Psychic"]
    );
}

const LABELS: [&str; 6] = ["Fire", "Water", "Grass", "Rock", "Ice", "Ghost"];

fn arb_member(index: usize) -> impl Strategy<Value = Member> {
    (
        (0u16..=160, 0u16..=160, 0u16..=160, 0u16..=160, 0u16..=160, 0u16..=160),
        prop::collection::btree_set(0usize..LABELS.len(), 0..4),
    )
        .prop_map(move |((hp, atk, def, spa, spd, spe), weak)| {
            Member::new(
                format!("M{index}"),
                BaseStats::new(hp, atk, def, spa, spd, spe),
                weak.into_iter().map(|i| LABELS[i]),
            )
        })
}

fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (0usize..16)
        .prop_flat_map(|n| (0..n).map(arb_member).collect::<Vec<_>>())
        .prop_map(catalog)
}

fn arb_request() -> impl Strategy<Value = TeamRequest> {
    (
        prop::collection::vec(0usize..20, 0..=3),
        prop::array::uniform6(0i32..=120),
        1i32..=8,
    )
        .prop_map(|(starters, floors, size)| {
            let mut request = TeamRequest::new()
                .with_starters(starters.into_iter().map(|i| format!("m{i}")))
                .with_team_size(size);
            for (kind, floor) in StatKind::ALL.into_iter().zip(floors) {
                request = request.with_floor(kind, floor);
            }
            request
        })
}

proptest! {
    #[test]
    fn team_invariants_hold(catalog in arb_catalog(), request in arb_request()) {
        let plan = match request.plan() {
            Ok(plan) => plan,
            Err(_) => return Ok(()),
        };
        let team = match assemble(&catalog, &request) {
            Ok(team) => team,
            // more catalog starters than seats
            Err(err) => {
                prop_assert_eq!(err.code(), "INVALID_REQUEST");
                let seated = plan.starters.iter().filter(|s| catalog.contains(s)).count();
                prop_assert!(seated > plan.team_size);
                return Ok(());
            }
        };

        // no duplicates
        let names: HashSet<&str> = team.names().into_iter().collect();
        prop_assert_eq!(names.len(), team.len());

        // length bound
        prop_assert!(team.len() <= plan.team_size);

        // starters retained, in front
        let found: Vec<&str> = plan
            .starters
            .iter()
            .filter_map(|s| catalog.get(s).map(|m| m.name.as_str()))
            .collect();
        let picked = team.names();
        prop_assert_eq!(&picked[..found.len()], &found[..]);

        // coverage only grows
        prop_assert!(team.coverage_history.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(team.coverage_history.last().copied().unwrap_or(0), team.coverage.len());

        // non-starters meet every floor
        for pick in team.picks.iter().filter(|p| p.pass != SelectionPass::Starter) {
            prop_assert!(plan.floors.admits(&pick.member.stats));
        }
    }

    #[test]
    fn assembly_is_idempotent(catalog in arb_catalog(), request in arb_request()) {
        let first = match assemble(&catalog, &request) {
            Ok(team) => team,
            Err(_) => return Ok(()),
        };
        let second = assemble(&catalog, &request).unwrap();
        prop_assert_eq!(first.names(), second.names());
        prop_assert_eq!(
            first.picks.iter().map(|p| p.pass).collect::<Vec<_>>(),
            second.picks.iter().map(|p| p.pass).collect::<Vec<_>>()
        );
    }
}
