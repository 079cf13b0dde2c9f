//! Per-cell vehicle occupancy
//!
//! A derived cache over vehicle positions. The world rebuilds it at the start
//! of every tick and vehicles update it as they move, so it always matches the
//! positions of vehicles still on the grid.

use std::collections::HashMap;

use super::types::Cell;

#[derive(Debug, Clone, Default)]
pub struct CellOccupancy {
    counts: HashMap<Cell, u32>,
}

impl CellOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recount from scratch
    pub fn rebuild(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.counts.clear();
        for cell in cells {
            self.claim(cell);
        }
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.counts.contains_key(&cell)
    }

    pub fn count(&self, cell: Cell) -> u32 {
        self.counts.get(&cell).copied().unwrap_or(0)
    }

    pub fn claim(&mut self, cell: Cell) {
        *self.counts.entry(cell).or_insert(0) += 1;
    }

    pub fn vacate(&mut self, cell: Cell) {
        if let Some(count) = self.counts.get_mut(&cell) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&cell);
            }
        }
    }

    pub fn move_vehicle(&mut self, from: Cell, to: Cell) {
        self.vacate(from);
        self.claim(to);
    }
}
