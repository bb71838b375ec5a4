//! Scenario tests for the match state machine, driven through the public
//! operations with a recording notifier standing in for the room layer.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::catalog::{Catalog, TerrainKind};
use crate::game::error::RuleError;
use crate::game::events::{ClientRequest, Notifier, ServerEvent};
use crate::game::skills::{SkillContext, SkillEffect, SkillRegistry};
use crate::game::state::Match;
use crate::game::types::{Coords, Facing, Phase, Side};

/// Captures every outbound event with its target seat (`None` = broadcast).
#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<(Option<Side>, ServerEvent)>>>,
}

impl Recorder {
    fn events(&self) -> Vec<(Option<Side>, ServerEvent)> {
        self.events.borrow().clone()
    }

    fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Notifier for Recorder {
    fn notify(&mut self, side: Side, event: &ServerEvent) {
        self.events.borrow_mut().push((Some(side), event.clone()));
    }

    fn broadcast(&mut self, event: &ServerEvent) {
        self.events.borrow_mut().push((None, event.clone()));
    }
}

fn new_match_with(skills: SkillRegistry) -> (Match, Recorder) {
    let recorder = Recorder::default();
    let m = Match::new(
        Arc::new(Catalog::builtin()),
        Arc::new(skills),
        Box::new(recorder.clone()),
    );
    (m, recorder)
}

fn new_match() -> (Match, Recorder) {
    new_match_with(SkillRegistry::builtin())
}

fn roster(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Commit both rosters (P1 first) and place every unit, leaving the match
/// in the playing phase with P1 to act.
fn playing_match_with(
    skills: SkillRegistry,
    p1: &[(&str, Coords)],
    p2: &[(&str, Coords)],
) -> (Match, Recorder) {
    let (mut m, recorder) = new_match_with(skills);
    let ids = |units: &[(&str, Coords)]| roster(&units.iter().map(|(id, _)| *id).collect::<Vec<_>>());
    m.set_team(Side::P1, &ids(p1)).unwrap();
    m.set_team(Side::P2, &ids(p2)).unwrap();
    for (id, at) in p1 {
        m.place(Side::P1, *at, id).unwrap();
    }
    for (id, at) in p2 {
        m.place(Side::P2, *at, id).unwrap();
    }
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.turn(), Side::P1);
    recorder.clear();
    (m, recorder)
}

fn playing_match(p1: &[(&str, Coords)], p2: &[(&str, Coords)]) -> (Match, Recorder) {
    playing_match_with(SkillRegistry::builtin(), p1, p2)
}

fn at(x: usize, y: usize) -> Coords {
    Coords::new(x, y)
}

// --- selecting ---

#[test]
fn roster_over_budget_is_rejected_and_resubmittable() {
    let (mut m, _) = new_match();
    // 4 + 4 + 3 = 11 points.
    let over = roster(&["bulwark", "bulwark", "longhorn"]);
    assert_eq!(m.set_team(Side::P1, &over), Err(RuleError::BudgetExceeded));
    assert_eq!(m.phase(), Phase::Selecting);
    // The bank is untouched: a full-budget resubmission still fits.
    let exact = roster(&["bulwark", "bulwark", "scuttler", "scuttler"]);
    assert!(m.set_team(Side::P1, &exact).is_ok());
}

#[test]
fn roster_duplicate_cap_is_enforced() {
    let (mut m, _) = new_match();
    let five = roster(&["scuttler"; 5]);
    assert_eq!(
        m.set_team(Side::P1, &five),
        Err(RuleError::TooManyCopies("Scuttler".to_string()))
    );
    // Four copies are fine.
    assert!(m.set_team(Side::P1, &roster(&["scuttler"; 4])).is_ok());
}

#[test]
fn roster_with_unknown_unit_is_rejected() {
    let (mut m, _) = new_match();
    let bad = roster(&["scuttler", "gundam"]);
    assert_eq!(
        m.set_team(Side::P1, &bad),
        Err(RuleError::UnknownUnit("gundam".to_string()))
    );
}

#[test]
fn committed_roster_cannot_be_replaced() {
    let (mut m, _) = new_match();
    m.set_team(Side::P1, &roster(&["scuttler"])).unwrap();
    assert_eq!(
        m.set_team(Side::P1, &roster(&["springtail"])),
        Err(RuleError::AlreadyCommitted)
    );
}

#[test]
fn second_roster_starts_placement() {
    let (mut m, recorder) = new_match();
    m.set_team(Side::P1, &roster(&["scuttler"])).unwrap();
    assert_eq!(m.phase(), Phase::Selecting);
    m.set_team(Side::P2, &roster(&["springtail"])).unwrap();
    assert_eq!(m.phase(), Phase::Placing);

    let events = recorder.events();
    assert!(events.contains(&(
        Some(Side::P1),
        ServerEvent::Team { members: roster(&["scuttler"]) }
    )));
    assert!(events.contains(&(Some(Side::P1), ServerEvent::GameStart)));
    assert!(events.contains(&(Some(Side::P2), ServerEvent::GameStart)));
}

// --- placing ---

fn placing_match() -> (Match, Recorder) {
    let (mut m, recorder) = new_match();
    m.set_team(Side::P1, &roster(&["scuttler", "springtail"])).unwrap();
    m.set_team(Side::P2, &roster(&["scuttler", "springtail"])).unwrap();
    recorder.clear();
    (m, recorder)
}

#[test]
fn deployment_is_limited_to_the_two_nearest_rows() {
    let (mut m, _) = placing_match();
    assert_eq!(
        m.place(Side::P1, at(0, 2), "scuttler"),
        Err(RuleError::OutsideDeploymentRows)
    );
    assert!(m.place(Side::P1, at(0, 1), "scuttler").is_ok());
    assert_eq!(
        m.place(Side::P2, at(0, 5), "scuttler"),
        Err(RuleError::OutsideDeploymentRows)
    );
    assert!(m.place(Side::P2, at(0, 6), "scuttler").is_ok());
}

#[test]
fn placement_requires_the_unit_in_the_roster() {
    let (mut m, _) = placing_match();
    assert_eq!(
        m.place(Side::P1, at(0, 0), "colossus"),
        Err(RuleError::NotInRoster("Colossus".to_string()))
    );
    assert_eq!(
        m.place(Side::P1, at(0, 0), "mystery"),
        Err(RuleError::UnknownUnit("mystery".to_string()))
    );
}

#[test]
fn placement_stops_at_the_roster_copy_count() {
    let (mut m, _) = placing_match();
    m.place(Side::P1, at(0, 0), "scuttler").unwrap();
    assert_eq!(
        m.place(Side::P1, at(1, 0), "scuttler"),
        Err(RuleError::AllCopiesPlaced("Scuttler".to_string()))
    );
}

#[test]
fn placement_rejects_occupied_cells() {
    let (mut m, _) = placing_match();
    m.place(Side::P1, at(0, 0), "scuttler").unwrap();
    assert_eq!(
        m.place(Side::P1, at(0, 0), "springtail"),
        Err(RuleError::Occupied(at(0, 0)))
    );
}

#[test]
fn first_committer_takes_the_first_turn() {
    let (mut m, recorder) = new_match();
    // P2 commits first this time.
    m.set_team(Side::P2, &roster(&["scuttler"])).unwrap();
    m.set_team(Side::P1, &roster(&["scuttler"])).unwrap();
    m.place(Side::P2, at(4, 7), "scuttler").unwrap();
    recorder.clear();
    m.place(Side::P1, at(4, 0), "scuttler").unwrap();

    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.turn(), Side::P2);
    let events = recorder.events();
    assert!(events.contains(&(Some(Side::P2), ServerEvent::StartTurn)));
    assert!(matches!(events[0], (None, ServerEvent::BoardUpdate { .. })));
}

// --- playing: movement ---

#[test]
fn move_respects_the_square_range() {
    // Scuttler: move range 2.
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    assert_eq!(
        m.try_move(Side::P1, at(0, 0), at(3, 0)),
        Err(RuleError::OutOfRange(at(3, 0)))
    );
    m.try_move(Side::P1, at(0, 0), at(2, 2)).unwrap();
    assert_eq!(m.unit_at(at(2, 2)).map(|u| u.template.name.as_str()), Some("Scuttler"));
    assert!(m.unit_at(at(0, 0)).is_none());
}

#[test]
fn only_one_move_per_turn_without_overcharge() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_move(Side::P1, at(0, 0), at(1, 1)).unwrap();
    assert_eq!(
        m.try_move(Side::P1, at(1, 1), at(2, 2)),
        Err(RuleError::AlreadyMoved)
    );
}

#[test]
fn move_onto_an_occupied_cell_is_rejected() {
    let (mut m, _) = playing_match(
        &[("scuttler", at(0, 0)), ("springtail", at(1, 0))],
        &[("scuttler", at(7, 7)), ("springtail", at(6, 7))],
    );
    assert_eq!(
        m.try_move(Side::P1, at(0, 0), at(1, 0)),
        Err(RuleError::Occupied(at(1, 0)))
    );
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    assert_eq!(
        m.try_move(Side::P2, at(7, 7), at(6, 6)),
        Err(RuleError::NotYourTurn)
    );
}

#[test]
fn actions_require_the_playing_phase() {
    let (mut m, _) = new_match();
    assert_eq!(
        m.try_move(Side::P1, at(0, 0), at(1, 1)),
        Err(RuleError::WrongPhase(Phase::Playing))
    );
}

// --- playing: turn cadence ---

#[test]
fn turn_passes_after_two_actions() {
    let (mut m, recorder) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_move(Side::P1, at(0, 0), at(1, 1)).unwrap();
    assert_eq!(m.turn(), Side::P1);
    // The same side is reminded it still has an action.
    assert!(recorder.events().contains(&(Some(Side::P1), ServerEvent::StartTurn)));

    m.set_facing(Side::P1, at(1, 1), Facing::Left).unwrap();
    assert_eq!(m.turn(), Side::P2);
    assert!(recorder.events().contains(&(Some(Side::P2), ServerEvent::StartTurn)));

    // And P2 can now act.
    m.try_move(Side::P2, at(7, 7), at(6, 6)).unwrap();
}

#[test]
fn rotation_counts_as_an_action() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.set_facing(Side::P1, at(0, 0), Facing::Back).unwrap();
    m.set_facing(Side::P1, at(0, 0), Facing::Right).unwrap();
    assert_eq!(m.turn(), Side::P2);
    assert_eq!(m.unit_at(at(0, 0)).map(|u| u.facing), Some(Facing::Right));
}

// --- playing: sprint ---

#[test]
fn sprint_reaches_one_cell_further_and_restores_range() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_sprint(Side::P1, at(0, 0), at(3, 3)).unwrap();
    let unit = m.unit_at(at(3, 3)).expect("sprinted unit");
    assert_eq!(unit.move_range, 2);
}

#[test]
fn failed_sprint_still_restores_move_range() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    assert_eq!(
        m.try_sprint(Side::P1, at(0, 0), at(4, 0)),
        Err(RuleError::OutOfRange(at(4, 0)))
    );
    assert_eq!(m.unit_at(at(0, 0)).map(|u| u.move_range), Some(2));
}

#[test]
fn sprinting_forfeits_the_attack() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_sprint(Side::P1, at(0, 0), at(1, 1)).unwrap();
    assert_eq!(
        m.try_attack(Side::P1, at(1, 1), at(7, 7)),
        Err(RuleError::SprintedThisTurn)
    );
}

// --- playing: combat ---

#[test]
fn attack_applies_power_minus_defender_attack() {
    // Ravager (attack 3) hits a scuttler (attack 2, weak from the back)
    // from below: power 3 + 1 = 4, damage 4 - 2 = 2.
    let (mut m, _) = playing_match(&[("ravager", at(0, 1))], &[("scuttler", at(0, 6))]);
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    assert_eq!(m.unit_at(at(0, 6)).map(|u| u.health), Some(2));
    // Power exceeded the defender's attack: no defense-break cost.
    assert_eq!(m.unit_at(at(0, 1)).map(|u| u.health), Some(5));
}

#[test]
fn weak_attack_costs_the_attacker_a_point() {
    // Springtail (attack 1) vs scuttler (attack 2, weak back): power 2,
    // damage 0, and power <= attack so the attacker pays 1 health.
    let (mut m, _) = playing_match(&[("springtail", at(0, 1))], &[("scuttler", at(0, 6))]);
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    assert_eq!(m.unit_at(at(0, 6)).map(|u| u.health), Some(4));
    assert_eq!(m.unit_at(at(0, 1)).map(|u| u.health), Some(2));
}

#[test]
fn terrain_modifier_reads_the_defenders_tile() {
    let (mut m, _) = playing_match(&[("ravager", at(0, 1))], &[("scuttler", at(0, 6))]);
    // Sink the defender's tile: power 3 - 1 + 1 = 3, damage 1.
    m.transform_terrain(at(0, 6), TerrainKind::Marsh).unwrap();
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    assert_eq!(m.unit_at(at(0, 6)).map(|u| u.health), Some(3));
}

#[test]
fn attack_against_an_empty_cell_is_rejected() {
    let (mut m, _) = playing_match(&[("ravager", at(0, 1))], &[("scuttler", at(0, 6))]);
    assert_eq!(
        m.try_attack(Side::P1, at(0, 1), at(5, 5)),
        Err(RuleError::NoTarget(at(5, 5)))
    );
}

#[test]
fn second_attack_requires_overcharge() {
    let (mut m, _) = playing_match(&[("ravager", at(0, 1))], &[("colossus", at(0, 6))]);
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    assert_eq!(
        m.try_attack(Side::P1, at(0, 1), at(0, 6)),
        Err(RuleError::AlreadyAttacked)
    );
}

#[test]
fn lethal_damage_faints_the_target_and_empties_the_cell() {
    // Ravager vs springtail (health 3, weak back): power 4, damage 3.
    let (mut m, recorder) = playing_match(&[("ravager", at(0, 1))], &[("springtail", at(0, 6))]);
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();

    assert!(m.unit_at(at(0, 6)).is_none());
    assert_eq!(m.board().occupant(at(0, 6)).unwrap(), None);
    // The faint broadcast a fresh snapshot with the cell empty.
    let events = recorder.events();
    let last_board = events
        .iter()
        .rev()
        .find_map(|(_, e)| match e {
            ServerEvent::BoardUpdate { grid } => Some(grid),
            _ => None,
        })
        .expect("board broadcast after faint");
    assert!(last_board[6][0].unit.is_none());
}

#[test]
fn faint_hook_reports_the_fallen_unit() {
    let (mut m, _) = playing_match(&[("ravager", at(0, 1))], &[("springtail", at(0, 6))]);
    let fallen: Rc<RefCell<Vec<(Side, String)>>> = Rc::default();
    let sink = fallen.clone();
    m.set_faint_hook(Box::new(move |side, _coords, name| {
        sink.borrow_mut().push((side, name.to_string()));
    }));
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    assert_eq!(fallen.borrow().as_slice(), &[(Side::P2, "Springtail".to_string())]);
}

// --- playing: overcharge ---

#[test]
fn overcharge_grants_a_second_move_and_costs_two_health() {
    let (mut m, recorder) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_move(Side::P1, at(0, 0), at(1, 1)).unwrap();
    m.try_overcharge(Side::P1, at(1, 1)).unwrap();
    assert!(recorder
        .events()
        .contains(&(None, ServerEvent::Overcharged { coords: at(1, 1) })));
    // The declaration itself does not end the turn.
    assert_eq!(m.turn(), Side::P1);

    m.try_move(Side::P1, at(1, 1), at(2, 2)).unwrap();
    assert_eq!(m.turn(), Side::P2);
    // The deferred cost landed at the turn switch.
    assert_eq!(m.unit_at(at(2, 2)).map(|u| u.health), Some(2));
}

#[test]
fn overcharge_is_once_per_turn() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_overcharge(Side::P1, at(0, 0)).unwrap();
    assert_eq!(
        m.try_overcharge(Side::P1, at(0, 0)),
        Err(RuleError::AlreadyOvercharged)
    );
}

#[test]
fn overcharge_cost_can_faint_the_unit() {
    // Wear the springtail down to 2 health, then overcharge it.
    let (mut m, recorder) = playing_match(
        &[("springtail", at(0, 0))],
        &[("scuttler", at(2, 6))],
    );
    // P1 burns a turn rotating twice.
    m.set_facing(Side::P1, at(0, 0), Facing::Front).unwrap();
    m.set_facing(Side::P1, at(0, 0), Facing::Front).unwrap();
    // P2 hits the springtail from the side (neither weak nor strong):
    // power 2, damage 1 -> health 2.
    m.try_attack(Side::P2, at(2, 6), at(0, 0)).unwrap();
    m.set_facing(Side::P2, at(2, 6), Facing::Front).unwrap();
    assert_eq!(m.unit_at(at(0, 0)).map(|u| u.health), Some(2));

    // P1 overcharges the weakened unit and spends both moves.
    m.try_move(Side::P1, at(0, 0), at(1, 1)).unwrap();
    m.try_overcharge(Side::P1, at(1, 1)).unwrap();
    m.try_move(Side::P1, at(1, 1), at(2, 2)).unwrap();

    assert!(m.unit_at(at(2, 2)).is_none());
    assert!(recorder.events().contains(&(
        None,
        ServerEvent::PieceLost { coords: at(2, 2), unit_name: "Springtail".to_string() }
    )));
    // Next turn starts normally for P2.
    assert_eq!(m.turn(), Side::P2);
}

#[test]
fn overcharge_mark_does_not_leak_into_later_turns() {
    let (mut m, _) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    m.try_move(Side::P1, at(0, 0), at(1, 1)).unwrap();
    m.try_overcharge(Side::P1, at(1, 1)).unwrap();
    m.try_move(Side::P1, at(1, 1), at(2, 2)).unwrap();
    assert_eq!(m.unit_at(at(2, 2)).map(|u| u.health), Some(2));

    // P2 passes its turn; P1 plays a plain turn. No further deduction.
    m.set_facing(Side::P2, at(7, 7), Facing::Front).unwrap();
    m.set_facing(Side::P2, at(7, 7), Facing::Front).unwrap();
    m.set_facing(Side::P1, at(2, 2), Facing::Front).unwrap();
    m.set_facing(Side::P1, at(2, 2), Facing::Front).unwrap();
    assert_eq!(m.unit_at(at(2, 2)).map(|u| u.health), Some(2));
}

// --- dispatch & skills ---

#[test]
fn dispatch_reports_rejections_to_the_offending_side() {
    let (mut m, recorder) = playing_match(&[("scuttler", at(0, 0))], &[("scuttler", at(7, 7))]);
    let result = m.dispatch(
        Side::P2,
        ClientRequest::Move { from: at(7, 7), to: at(6, 6) },
    );
    assert_eq!(result, Err(RuleError::NotYourTurn));
    assert!(recorder.events().contains(&(
        Some(Side::P2),
        ServerEvent::Error { message: "it's not your turn".to_string() }
    )));
}

struct Sharpen;

impl SkillEffect for Sharpen {
    fn on_turn_start(&self, cx: &mut SkillContext<'_>) {
        cx.units[cx.actor].attack += 1;
    }
}

#[test]
fn registered_skill_fires_at_turn_start() {
    let mut skills = SkillRegistry::builtin();
    skills.register("scuttler", Box::new(Sharpen));
    let (m, _) = playing_match_with(
        skills,
        &[("scuttler", at(0, 0))],
        &[("springtail", at(0, 7))],
    );
    // P1's scuttler sharpened when its first turn began; P2's springtail
    // has no effect registered.
    assert_eq!(m.unit_at(at(0, 0)).map(|u| u.attack), Some(3));
    assert_eq!(m.unit_at(at(0, 7)).map(|u| u.attack), Some(1));
}

struct Venom;

impl SkillEffect for Venom {
    fn on_attack(&self, cx: &mut SkillContext<'_>) {
        cx.units[cx.actor].attack += 1;
    }
}

#[test]
fn registered_skill_fires_at_attack_declaration() {
    let mut skills = SkillRegistry::builtin();
    skills.register("ravager", Box::new(Venom));
    let (mut m, _) = playing_match_with(
        skills,
        &[("ravager", at(0, 1))],
        &[("scuttler", at(0, 6))],
    );
    m.try_attack(Side::P1, at(0, 1), at(0, 6)).unwrap();
    // The effect raised the attacker's attack to 4 before resolution:
    // power 4 + 1 (weak back) = 5, damage 5 - 2 = 3.
    assert_eq!(m.unit_at(at(0, 6)).map(|u| u.health), Some(1));
    assert_eq!(m.unit_at(at(0, 1)).map(|u| u.attack), Some(4));
}

struct Rattled;

impl SkillEffect for Rattled {
    fn on_terrain_change(&self, cx: &mut SkillContext<'_>) {
        cx.units[cx.actor].health -= 1;
    }
}

#[test]
fn terrain_transformation_fires_the_occupants_trigger() {
    let mut skills = SkillRegistry::builtin();
    skills.register("scuttler", Box::new(Rattled));
    let (mut m, _) = playing_match_with(
        skills,
        &[("scuttler", at(0, 0))],
        &[("springtail", at(0, 7))],
    );
    let before = m.unit_at(at(0, 0)).map(|u| u.health);
    m.transform_terrain(at(0, 0), TerrainKind::Chasm).unwrap();
    assert_eq!(m.board().cell(at(0, 0)).unwrap().terrain, TerrainKind::Chasm);
    assert_eq!(m.unit_at(at(0, 0)).map(|u| u.health), before.map(|h| h - 1));
}
