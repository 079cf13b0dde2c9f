//! Vehicle movement logic for the parking simulation
//!
//! Each tick a vehicle tries to advance one cell along its planned path,
//! respecting red lights, other vehicles and parking capacity.

use anyhow::{Context, Result};

use super::direction_graph::DirectionGraph;
use super::occupancy::CellOccupancy;
use super::parking::ParkingRegistry;
use super::planner::find_path;
use super::traffic_light::SimTrafficLight;
use super::types::{Cell, LightId, LotId, VehicleId};

/// Result of a vehicle update indicating what happened this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Nothing to do (no plan, already arrived, or sitting at its destination)
    Idle,
    /// Moved one cell. `departed` is set on the vehicle's first move.
    Moved {
        from: Cell,
        to: Cell,
        departed: Option<LotId>,
    },
    /// The next cell holds a red light
    HeldAtRedLight(LightId),
    /// Another vehicle is on the next cell
    Blocked(Cell),
    /// Parked in the destination lot
    Arrived { lot: LotId, departed: Option<LotId> },
    /// Destination full, now heading for another lot
    Rerouted { denied: LotId, to: LotId },
    /// Destination full and the nearest free lot cannot be reached
    RerouteUnreachable { denied: LotId, to: LotId },
    /// Destination full and no lot anywhere has a free space
    NoParkingAvailable { denied: LotId },
}

/// Observable lifecycle state of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    /// Still in its origin lot
    Parked,
    /// Left its origin and is driving
    EnRoute,
    /// Parked at its (possibly rerouted) destination
    Arrived,
    /// No route exists to the destination; the vehicle never moves
    Unreachable,
}

/// A vehicle in the parking simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    /// Position of the lot the vehicle started in
    pub origin: Cell,
    /// Position of the lot the vehicle is heading to
    pub destination: Cell,
    pub position: Cell,
    /// Cells from the current position to the destination, inclusive
    path: Option<Vec<Cell>>,
    has_departed: bool,
    arrived: bool,
    /// Whether the vehicle still holds the origin space it was admitted to
    holds_origin_space: bool,
}

impl SimVehicle {
    /// Creates a vehicle parked at `origin` and plans its route
    pub fn new(
        id: VehicleId,
        origin: Cell,
        destination: Cell,
        graph: &DirectionGraph,
        holds_origin_space: bool,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            position: origin,
            path: find_path(origin, destination, graph),
            has_departed: false,
            arrived: false,
            holds_origin_space,
        }
    }

    /// Remaining planned path; empty when there is no plan
    pub fn path(&self) -> &[Cell] {
        self.path.as_deref().unwrap_or(&[])
    }

    pub fn has_plan(&self) -> bool {
        self.path.is_some()
    }

    pub fn has_departed(&self) -> bool {
        self.has_departed
    }

    pub fn arrived(&self) -> bool {
        self.arrived
    }

    pub fn holds_origin_space(&self) -> bool {
        self.holds_origin_space
    }

    /// Whether the vehicle still takes up a cell on the grid
    pub fn is_on_grid(&self) -> bool {
        !self.arrived
    }

    pub fn at_destination(&self) -> bool {
        self.position == self.destination
    }

    pub fn status(&self) -> VehicleStatus {
        if self.arrived {
            VehicleStatus::Arrived
        } else if self.path.is_none() {
            VehicleStatus::Unreachable
        } else if self.has_departed {
            VehicleStatus::EnRoute
        } else {
            VehicleStatus::Parked
        }
    }

    /// Update vehicle movement for one tick
    /// Returns VehicleUpdateResult describing what the vehicle did
    pub fn advance(
        &mut self,
        graph: &DirectionGraph,
        parking: &mut ParkingRegistry,
        lights: &[SimTrafficLight],
        occupancy: &mut CellOccupancy,
    ) -> Result<VehicleUpdateResult> {
        if self.arrived {
            return Ok(VehicleUpdateResult::Idle);
        }

        let next = match self.path.as_deref() {
            Some([_, next, ..]) => *next,
            _ => return Ok(VehicleUpdateResult::Idle),
        };

        if next == self.destination {
            return self.try_park(graph, parking, occupancy);
        }

        if let Some(light) = lights.iter().find(|l| l.position == next && l.is_red()) {
            return Ok(VehicleUpdateResult::HeldAtRedLight(light.id));
        }

        if occupancy.is_occupied(next) {
            return Ok(VehicleUpdateResult::Blocked(next));
        }

        let departed = self.depart(parking)?;
        let from = self.position;
        self.step_to(next);
        occupancy.move_vehicle(from, next);

        Ok(VehicleUpdateResult::Moved {
            from,
            to: next,
            departed,
        })
    }

    fn try_park(
        &mut self,
        graph: &DirectionGraph,
        parking: &mut ParkingRegistry,
        occupancy: &mut CellOccupancy,
    ) -> Result<VehicleUpdateResult> {
        let lot = parking
            .lot_at(self.destination)
            .with_context(|| format!("No parking lot at destination {}", self.destination))?;

        if parking.admit(lot) {
            let departed = self.depart(parking)?;
            occupancy.vacate(self.position);
            self.position = self.destination;
            self.arrived = true;
            self.path = None;
            return Ok(VehicleUpdateResult::Arrived { lot, departed });
        }

        let Some(alternative) = parking.nearest_available(self.position) else {
            return Ok(VehicleUpdateResult::NoParkingAvailable { denied: lot });
        };
        let (to, target) = (alternative.id, alternative.position);

        self.destination = target;
        self.path = find_path(self.position, target, graph);
        if self.path.is_some() {
            Ok(VehicleUpdateResult::Rerouted { denied: lot, to })
        } else {
            Ok(VehicleUpdateResult::RerouteUnreachable { denied: lot, to })
        }
    }

    /// Releases the origin space on the vehicle's first move
    fn depart(&mut self, parking: &mut ParkingRegistry) -> Result<Option<LotId>> {
        if self.has_departed {
            return Ok(None);
        }
        let lot = parking
            .lot_at(self.origin)
            .with_context(|| format!("No parking lot at origin {}", self.origin))?;
        if self.holds_origin_space {
            let freed = parking.release(lot);
            debug_assert!(freed, "{} released an empty origin", self.id);
            self.holds_origin_space = false;
        }
        self.has_departed = true;
        Ok(Some(lot))
    }

    fn step_to(&mut self, next: Cell) {
        self.position = next;
        if let Some(path) = self.path.as_mut() {
            path.remove(0);
        }
    }
}
