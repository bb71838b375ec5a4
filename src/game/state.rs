//! The match state machine.
//!
//! One `Match` owns the board, both sides' units and rosters, and all rule
//! validation. Operations validate first and mutate second, so every action
//! is atomic: a rejection leaves the match exactly as it was. Inbound
//! requests are assumed to be seat-checked by the transport; outbound
//! notifications leave through the `Notifier`.

use std::sync::Arc;

use log::{debug, info};

use crate::catalog::{Catalog, TerrainKind};
use crate::config::game::{
    ACTIONS_PER_TURN, BOARD_SIZE, DEPLOY_ROWS, MAX_COPIES, OVERCHARGE_COST, POINT_BUDGET,
    SPRINT_BONUS,
};
use crate::game::board::Board;
use crate::game::error::RuleError;
use crate::game::events::{BoardSnapshot, CellView, ClientRequest, Notifier, ServerEvent, UnitView};
use crate::game::skills::{SkillRegistry, SkillTrigger};
use crate::game::types::{ActionKind, Coords, Facing, PerSide, Phase, Side, UnitHandle};
use crate::game::unit::Unit;

/// Called after a unit faints, with its side, last position, and display
/// name. Win/loss policy deliberately lives outside the engine; install a
/// hook to implement one.
pub type FaintHook = Box<dyn FnMut(Side, Coords, &str)>;

pub struct Match {
    catalog: Arc<Catalog>,
    skills: Arc<SkillRegistry>,
    board: Board,
    /// Arena of every unit ever placed. Cells reference entries by index;
    /// fainted units stay here, deactivated.
    units: Vec<Unit>,
    phase: Phase,
    rosters: PerSide<Option<Vec<String>>>,
    placed: PerSide<usize>,
    /// Seat that committed its roster first; it takes the first turn.
    first_committed: Option<Side>,
    turn: Side,
    /// Ordered log of actions taken this turn.
    turn_actions: Vec<ActionKind>,
    /// Unit a side has overcharged this turn; cost settles at turn end.
    overcharged: PerSide<Option<UnitHandle>>,
    notifier: Box<dyn Notifier>,
    on_faint: Option<FaintHook>,
}

impl Match {
    pub fn new(catalog: Arc<Catalog>, skills: Arc<SkillRegistry>, notifier: Box<dyn Notifier>) -> Self {
        Match {
            catalog,
            skills,
            board: Board::new(),
            units: Vec::new(),
            phase: Phase::Selecting,
            rosters: PerSide::default(),
            placed: PerSide::default(),
            first_committed: None,
            turn: Side::P1,
            turn_actions: Vec::new(),
            overcharged: PerSide::default(),
            notifier,
            on_faint: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The active unit standing at `at`, if any.
    pub fn unit_at(&self, at: Coords) -> Option<&Unit> {
        let handle = self.board.occupant(at).ok()??;
        self.units.get(handle)
    }

    /// Install the post-faint hook (e.g. a win-condition check).
    pub fn set_faint_hook(&mut self, hook: FaintHook) {
        self.on_faint = Some(hook);
    }

    /// Route one seat-checked request to its handler. Rejections are
    /// reported to the offending side and returned.
    pub fn dispatch(&mut self, side: Side, request: ClientRequest) -> Result<(), RuleError> {
        let result = match request {
            ClientRequest::SetTeam { members } => self.set_team(side, &members),
            ClientRequest::Place { coords, unit_id } => self.place(side, coords, &unit_id),
            ClientRequest::Move { from, to } => self.try_move(side, from, to),
            ClientRequest::Sprint { from, to } => self.try_sprint(side, from, to),
            ClientRequest::Attack { from, to } => self.try_attack(side, from, to),
            ClientRequest::Overcharge { coords } => self.try_overcharge(side, coords),
            ClientRequest::SetDirection { coords, direction } => {
                self.set_facing(side, coords, direction)
            }
        };
        if let Err(ref err) = result {
            debug!("[Match] rejected action from {:?}: {}", side, err);
            self.notifier.notify(side, &ServerEvent::Error { message: err.to_string() });
        }
        result
    }

    // --- selecting ---

    /// Commit a side's roster: every id must exist, no id more than
    /// `MAX_COPIES` times, total cost within `POINT_BUDGET`.
    pub fn set_team(&mut self, side: Side, members: &[String]) -> Result<(), RuleError> {
        if self.phase != Phase::Selecting {
            return Err(RuleError::WrongPhase(Phase::Selecting));
        }
        if self.rosters[side].is_some() {
            return Err(RuleError::AlreadyCommitted);
        }

        let mut bank = POINT_BUDGET;
        let mut accepted = Vec::with_capacity(members.len());
        for id in members {
            let template = self
                .catalog
                .unit(id)
                .ok_or_else(|| RuleError::UnknownUnit(id.clone()))?;
            let copies = accepted.iter().filter(|m| *m == id).count() + 1;
            if copies > MAX_COPIES {
                return Err(RuleError::TooManyCopies(template.name.clone()));
            }
            bank -= template.points;
            if bank < 0 {
                return Err(RuleError::BudgetExceeded);
            }
            accepted.push(id.clone());
        }

        self.rosters[side] = Some(accepted.clone());
        self.first_committed.get_or_insert(side);
        self.notifier.notify(side, &ServerEvent::Team { members: accepted });

        if self.rosters.p1.is_some() && self.rosters.p2.is_some() {
            self.start_placement();
        }
        Ok(())
    }

    fn start_placement(&mut self) {
        self.phase = Phase::Placing;
        info!("[Match] both rosters committed, placement begins");
        for side in [Side::P1, Side::P2] {
            self.notifier.notify(side, &ServerEvent::GameStart);
        }
    }

    // --- placing ---

    /// Deploy one roster unit onto the side's two nearest rows.
    pub fn place(&mut self, side: Side, at: Coords, unit_id: &str) -> Result<(), RuleError> {
        if self.phase != Phase::Placing {
            return Err(RuleError::WrongPhase(Phase::Placing));
        }
        let template = self
            .catalog
            .unit(unit_id)
            .ok_or_else(|| RuleError::UnknownUnit(unit_id.to_string()))?
            .clone();
        let roster = self.rosters[side].as_deref().unwrap_or_default();
        let in_roster = roster.iter().filter(|m| *m == unit_id).count();
        if in_roster == 0 {
            return Err(RuleError::NotInRoster(template.name.clone()));
        }
        let deployable = match side {
            Side::P1 => at.y < DEPLOY_ROWS,
            Side::P2 => at.y >= BOARD_SIZE - DEPLOY_ROWS,
        };
        if !deployable {
            return Err(RuleError::OutsideDeploymentRows);
        }
        let already_placed = self
            .units
            .iter()
            .filter(|u| u.side == side && u.template.id == unit_id)
            .count();
        if already_placed >= in_roster {
            return Err(RuleError::AllCopiesPlaced(template.name.clone()));
        }

        let handle = self.units.len();
        let mut unit = Unit::new(handle, template, side);
        self.board.place(&mut unit, at)?;
        self.units.push(unit);
        self.placed[side] += 1;
        debug!("[Match] {:?} placed {} at {}", side, unit_id, at);

        let roster_total = self.rosters.p1.as_ref().map_or(0, |r| r.len())
            + self.rosters.p2.as_ref().map_or(0, |r| r.len());
        if self.placed.p1 + self.placed.p2 >= roster_total {
            self.start_play();
        }
        Ok(())
    }

    fn start_play(&mut self) {
        self.phase = Phase::Playing;
        self.turn = self.first_committed.unwrap_or(Side::P1);
        info!("[Match] all units placed, {:?} plays first", self.turn);
        self.broadcast_board();
        self.fire_turn_start(self.turn);
        self.notifier.notify(self.turn, &ServerEvent::StartTurn);
    }

    // --- playing ---

    /// Relocate a unit within its move range onto an empty cell.
    pub fn try_move(&mut self, side: Side, from: Coords, to: Coords) -> Result<(), RuleError> {
        self.require_turn(side)?;
        if !self.took(ActionKind::Overcharge) && self.took(ActionKind::Move) {
            return Err(RuleError::AlreadyMoved);
        }
        let handle = self.active_own_unit(side, from)?;
        if !self.units[handle].can_reach(to, false) {
            return Err(RuleError::OutOfRange(to));
        }
        if self.board.occupant(to)?.is_some() {
            return Err(RuleError::Occupied(to));
        }
        self.board.relocate(from, to)?;
        self.units[handle].pos = to;
        self.turn_actions.push(ActionKind::Move);
        self.broadcast_board();
        self.after_action()
    }

    /// Like a move, but with move range raised by `SPRINT_BONUS` for the
    /// check. Sprinting forfeits attacking for the rest of the turn.
    pub fn try_sprint(&mut self, side: Side, from: Coords, to: Coords) -> Result<(), RuleError> {
        self.require_turn(side)?;
        if self.took(ActionKind::Sprint) {
            return Err(RuleError::AlreadySprinted);
        }
        if self.board.occupant(to)?.is_some() {
            return Err(RuleError::Occupied(to));
        }
        let handle = self.active_own_unit(side, from)?;
        // The bump is transient; restore it on both outcomes.
        self.units[handle].move_range += SPRINT_BONUS;
        let reachable = self.units[handle].can_reach(to, false);
        self.units[handle].move_range -= SPRINT_BONUS;
        if !reachable {
            return Err(RuleError::OutOfRange(to));
        }
        self.board.relocate(from, to)?;
        self.units[handle].pos = to;
        self.turn_actions.push(ActionKind::Sprint);
        self.broadcast_board();
        self.after_action()
    }

    /// Resolve an attack. Damage is attacking power minus the target's
    /// attack; if power does not exceed it, the attacker pays 1 health.
    pub fn try_attack(&mut self, side: Side, from: Coords, to: Coords) -> Result<(), RuleError> {
        self.require_turn(side)?;
        if !self.took(ActionKind::Overcharge) && self.took(ActionKind::Attack) {
            return Err(RuleError::AlreadyAttacked);
        }
        if self.took(ActionKind::Sprint) {
            return Err(RuleError::SprintedThisTurn);
        }
        let attacker = self.active_own_unit(side, from)?;
        let target = self.board.occupant(to)?.ok_or(RuleError::NoTarget(to))?;

        let attacker_skill = self.units[attacker].template.id.clone();
        let skills = self.skills.clone();
        skills.fire(SkillTrigger::Attack, &attacker_skill, &mut self.board, &mut self.units, attacker);

        let terrain_mod = self.catalog.terrain_modifier(self.board.cell(to)?.terrain);
        let target_attack = self.units[target].attack;
        let power = self.units[attacker].attack_power(&self.units[target], terrain_mod);
        let damage = power - target_attack;
        self.units[target].health -= damage;
        if power <= target_attack {
            // Defense break: both combatants pay. Knockback is not part of
            // the rules yet.
            self.units[attacker].health -= 1;
        }
        debug!(
            "[Match] {:?} attacks {}: power {} vs {}, damage {}",
            side, to, power, target_attack, damage
        );
        if self.units[target].health <= 0 {
            self.faint(target)?;
        }
        if self.units[attacker].health <= 0 {
            self.faint(attacker)?;
        }
        self.turn_actions.push(ActionKind::Attack);
        self.after_action()
    }

    /// Mark a unit as overcharged: one extra move-or-attack this turn, paid
    /// for with 2 health when the turn ends.
    pub fn try_overcharge(&mut self, side: Side, coords: Coords) -> Result<(), RuleError> {
        self.require_turn(side)?;
        if self.took(ActionKind::Overcharge) {
            return Err(RuleError::AlreadyOvercharged);
        }
        let handle = self.active_own_unit(side, coords)?;
        self.overcharged[side] = Some(handle);
        self.turn_actions.push(ActionKind::Overcharge);
        self.notifier.broadcast(&ServerEvent::Overcharged { coords });
        // No turn-end check here: the declaration must leave the granted
        // extra action usable even when the log is already at the cap.
        Ok(())
    }

    /// Turn a unit to face one of the four sides.
    pub fn set_facing(&mut self, side: Side, coords: Coords, facing: Facing) -> Result<(), RuleError> {
        self.require_turn(side)?;
        let handle = self.active_own_unit(side, coords)?;
        self.units[handle].facing = facing;
        self.turn_actions.push(ActionKind::Rotate);
        self.after_action()
    }

    /// Change a cell's terrain and fire the occupant's terrain-change
    /// trigger. Reachable from skills, not from the wire.
    pub fn transform_terrain(&mut self, at: Coords, kind: TerrainKind) -> Result<(), RuleError> {
        self.board.set_terrain(at, kind)?;
        if let Some(handle) = self.board.occupant(at)? {
            let template_id = self.units[handle].template.id.clone();
            let skills = self.skills.clone();
            skills.fire(SkillTrigger::TerrainChange, &template_id, &mut self.board, &mut self.units, handle);
        }
        Ok(())
    }

    // --- resolution ---

    /// Turn-end check, run after every successful action except the
    /// overcharge declaration. At two logged actions: settle the overcharge
    /// debt, pass the turn; otherwise remind the side it still has one.
    fn after_action(&mut self) -> Result<(), RuleError> {
        if self.turn_actions.len() >= ACTIONS_PER_TURN {
            if let Some(handle) = self.overcharged[self.turn].take() {
                let unit = &mut self.units[handle];
                if unit.active {
                    unit.health -= OVERCHARGE_COST;
                    if unit.health <= 0 {
                        let coords = unit.pos;
                        let unit_name = unit.template.name.clone();
                        self.faint(handle)?;
                        self.notifier.broadcast(&ServerEvent::PieceLost { coords, unit_name });
                    }
                }
            }
            self.turn = self.turn.opponent();
            self.turn_actions.clear();
            debug!("[Match] turn passes to {:?}", self.turn);
            self.fire_turn_start(self.turn);
        }
        self.notifier.notify(self.turn, &ServerEvent::StartTurn);
        Ok(())
    }

    /// Deactivate a unit and empty its cell. Runs the post-faint hook; the
    /// engine itself draws no win/loss conclusion.
    fn faint(&mut self, handle: UnitHandle) -> Result<(), RuleError> {
        let unit = &mut self.units[handle];
        if !unit.active {
            return Ok(());
        }
        unit.active = false;
        let pos = unit.pos;
        let side = unit.side;
        let name = unit.template.name.clone();
        info!("[Match] {} ({:?}) faints at {}", name, side, pos);
        self.board.set(pos, None)?;
        self.broadcast_board();
        if let Some(hook) = self.on_faint.as_mut() {
            hook(side, pos, &name);
        }
        Ok(())
    }

    fn fire_turn_start(&mut self, side: Side) {
        let firing: Vec<(UnitHandle, String)> = self
            .units
            .iter()
            .filter(|u| u.active && u.side == side)
            .map(|u| (u.handle, u.template.id.clone()))
            .collect();
        let skills = self.skills.clone();
        for (handle, template_id) in firing {
            skills.fire(SkillTrigger::TurnStart, &template_id, &mut self.board, &mut self.units, handle);
        }
    }

    // --- helpers ---

    fn require_turn(&self, side: Side) -> Result<(), RuleError> {
        if self.phase != Phase::Playing {
            return Err(RuleError::WrongPhase(Phase::Playing));
        }
        if self.turn != side {
            return Err(RuleError::NotYourTurn);
        }
        Ok(())
    }

    fn took(&self, kind: ActionKind) -> bool {
        self.turn_actions.contains(&kind)
    }

    /// The acting side's own active unit at `at`.
    fn active_own_unit(&self, side: Side, at: Coords) -> Result<UnitHandle, RuleError> {
        match self.board.occupant(at)? {
            Some(handle) if self.units[handle].side == side && self.units[handle].active => {
                Ok(handle)
            }
            _ => Err(RuleError::NoUnitAt(at)),
        }
    }

    /// Full grid snapshot: terrain plus occupant summaries.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board
            .cells()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CellView {
                        terrain: cell.terrain,
                        unit: cell.occupant.map(|h| UnitView::of(&self.units[h])),
                    })
                    .collect()
            })
            .collect()
    }

    fn broadcast_board(&mut self) {
        let grid = self.snapshot();
        self.notifier.broadcast(&ServerEvent::BoardUpdate { grid });
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Match")
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("units", &self.units.len())
            .field("turn_actions", &self.turn_actions)
            .finish()
    }
}
