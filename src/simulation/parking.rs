//! Parking lots and their occupancy bookkeeping
//!
//! The registry is the only place lot occupancy changes: vehicles claim a
//! space with [`ParkingRegistry::admit`] and give it back with
//! [`ParkingRegistry::release`].

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::types::{Cell, LotId};

/// A parking lot in the simulation
#[derive(Debug, Clone)]
pub struct SimParkingLot {
    pub id: LotId,
    pub position: Cell,
    capacity: u32,
    occupancy: u32,
}

impl SimParkingLot {
    fn new(id: LotId, position: Cell, capacity: u32) -> Self {
        Self {
            id,
            position,
            capacity,
            occupancy: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn has_space(&self) -> bool {
        self.occupancy < self.capacity
    }

    pub fn free_spaces(&self) -> u32 {
        self.capacity - self.occupancy
    }
}

/// Occupancy snapshot of a single lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LotStatus {
    pub occupancy: u32,
    pub capacity: u32,
}

/// Tracks every lot's capacity and occupancy
#[derive(Debug, Clone, Default)]
pub struct ParkingRegistry {
    lots: Vec<SimParkingLot>,
    by_position: HashMap<Cell, LotId>,
}

impl ParkingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new, empty lot
    pub fn add_lot(&mut self, position: Cell, capacity: u32) -> LotId {
        let id = LotId(self.lots.len());
        self.lots.push(SimParkingLot::new(id, position, capacity));
        self.by_position.insert(position, id);
        id
    }

    /// Claims a space in the lot. Fails without side effects when it is full.
    pub fn admit(&mut self, lot_id: LotId) -> bool {
        match self.lots.get_mut(lot_id.0) {
            Some(lot) if lot.has_space() => {
                lot.occupancy += 1;
                true
            }
            _ => false,
        }
    }

    /// Frees a space in the lot. Releasing an empty lot is a no-op.
    ///
    /// Returns whether a space was actually freed.
    pub fn release(&mut self, lot_id: LotId) -> bool {
        match self.lots.get_mut(lot_id.0) {
            Some(lot) if lot.occupancy > 0 => {
                lot.occupancy -= 1;
                true
            }
            _ => false,
        }
    }

    /// The lot with free capacity closest to `from` by Manhattan distance
    ///
    /// Ties go to the lowest lot id.
    pub fn nearest_available(&self, from: Cell) -> Option<&SimParkingLot> {
        self.lots
            .iter()
            .filter(|lot| lot.has_space())
            .min_by_key(|lot| (lot.position.manhattan(&from), lot.id))
    }

    pub fn lot(&self, lot_id: LotId) -> Option<&SimParkingLot> {
        self.lots.get(lot_id.0)
    }

    /// The lot located at `cell`, if any
    pub fn lot_at(&self, cell: Cell) -> Option<LotId> {
        self.by_position.get(&cell).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimParkingLot> {
        self.lots.iter()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn status(&self) -> BTreeMap<LotId, LotStatus> {
        self.lots
            .iter()
            .map(|lot| {
                (
                    lot.id,
                    LotStatus {
                        occupancy: lot.occupancy,
                        capacity: lot.capacity,
                    },
                )
            })
            .collect()
    }

    /// Total free spaces across all lots
    pub fn free_spaces(&self) -> u32 {
        self.lots.iter().map(SimParkingLot::free_spaces).sum()
    }
}

/// Splits a capacity pool across `lots` lots
///
/// Every lot gets `pool / lots` spaces and the first `pool % lots` lots get
/// one more.
pub fn distribute_capacity(pool: u32, lots: usize) -> Vec<u32> {
    if lots == 0 {
        return Vec::new();
    }
    let count = lots as u32;
    let base = pool / count;
    let extra = (pool % count) as usize;
    (0..lots)
        .map(|index| base + u32::from(index < extra))
        .collect()
}
