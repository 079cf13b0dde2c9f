//! Entities that occupy grid cells
//!
//! Vehicles, lights, lots and obstacles share one capability: they sit on a
//! cell. [`Occupant`] is the closed set of those entities, used wherever the
//! world needs to answer "what is on this cell".

use serde::Serialize;

use super::parking::SimParkingLot;
use super::traffic_light::SimTrafficLight;
use super::types::{Cell, LightId, LotId, ObstacleId, VehicleId};
use super::vehicle::SimVehicle;

/// Anything with a grid position
pub trait OccupiesCell {
    fn cell(&self) -> Cell;
}

/// A static obstacle (building, roundabout island)
#[derive(Debug, Clone)]
pub struct SimObstacle {
    pub id: ObstacleId,
    pub position: Cell,
}

impl OccupiesCell for SimObstacle {
    fn cell(&self) -> Cell {
        self.position
    }
}

impl OccupiesCell for SimParkingLot {
    fn cell(&self) -> Cell {
        self.position
    }
}

impl OccupiesCell for SimTrafficLight {
    fn cell(&self) -> Cell {
        self.position
    }
}

impl OccupiesCell for SimVehicle {
    fn cell(&self) -> Cell {
        self.position
    }
}

/// One entity found on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Occupant {
    Vehicle(VehicleId),
    TrafficLight(LightId),
    ParkingLot(LotId),
    Obstacle(ObstacleId),
}
