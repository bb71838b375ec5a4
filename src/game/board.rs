//! The 8x8 board.
//!
//! Cells reference units by arena handle; the `Match` owns the units
//! themselves. Every primitive bounds-checks its coordinates and reports
//! occupancy conflicts instead of trusting the caller.

use crate::catalog::TerrainKind;
use crate::config::game::BOARD_SIZE;
use crate::game::error::RuleError;
use crate::game::types::{Coords, UnitHandle};
use crate::game::unit::Unit;

#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub terrain: TerrainKind,
    pub occupant: Option<UnitHandle>,
}

/// Square grid of cells, indexed `[y][x]`.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// A fresh board, all grassland.
    pub fn new() -> Self {
        let blank = Cell { terrain: TerrainKind::Grassland, occupant: None };
        Board { cells: vec![vec![blank; BOARD_SIZE]; BOARD_SIZE] }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Row-major cell storage, for snapshotting.
    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn cell(&self, at: Coords) -> Result<&Cell, RuleError> {
        self.cells
            .get(at.y)
            .and_then(|row| row.get(at.x))
            .ok_or(RuleError::OutOfBounds(at))
    }

    fn cell_mut(&mut self, at: Coords) -> Result<&mut Cell, RuleError> {
        self.cells
            .get_mut(at.y)
            .and_then(|row| row.get_mut(at.x))
            .ok_or(RuleError::OutOfBounds(at))
    }

    /// Handle of the unit standing at `at`, if any.
    pub fn occupant(&self, at: Coords) -> Result<Option<UnitHandle>, RuleError> {
        Ok(self.cell(at)?.occupant)
    }

    /// Overwrite a cell's occupant reference.
    pub fn set(&mut self, at: Coords, occupant: Option<UnitHandle>) -> Result<(), RuleError> {
        self.cell_mut(at)?.occupant = occupant;
        Ok(())
    }

    /// Attach a unit to an empty cell and stamp its coordinates.
    pub fn place(&mut self, unit: &mut Unit, at: Coords) -> Result<(), RuleError> {
        let cell = self.cell_mut(at)?;
        if cell.occupant.is_some() {
            return Err(RuleError::Occupied(at));
        }
        cell.occupant = Some(unit.handle);
        unit.pos = at;
        Ok(())
    }

    /// Relocate whatever stands at `from` to `to`. A no-op when `from` is
    /// empty; rejects an occupied destination.
    pub fn relocate(&mut self, from: Coords, to: Coords) -> Result<(), RuleError> {
        let Some(handle) = self.occupant(from)? else {
            return Ok(());
        };
        let target = self.cell_mut(to)?;
        if target.occupant.is_some() {
            return Err(RuleError::Occupied(to));
        }
        target.occupant = Some(handle);
        self.cell_mut(from)?.occupant = None;
        Ok(())
    }

    /// Change a cell's terrain kind.
    pub fn set_terrain(&mut self, at: Coords, kind: TerrainKind) -> Result<(), RuleError> {
        self.cell_mut(at)?.terrain = kind;
        Ok(())
    }
}
