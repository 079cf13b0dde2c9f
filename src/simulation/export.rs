//! Path payloads for external consumers
//!
//! The 3D front end reads vehicle routes as `{"x", "z"}` points, so the grid's
//! `y` axis is published as `z`.

use serde::Serialize;

use super::types::{Cell, VehicleId};
use super::world::SimWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathPoint {
    pub x: i32,
    pub z: i32,
}

impl From<Cell> for PathPoint {
    fn from(cell: Cell) -> Self {
        Self {
            x: cell.x,
            z: cell.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehiclePathPayload {
    pub id: usize,
    pub path: Vec<PathPoint>,
}

impl VehiclePathPayload {
    pub fn for_vehicle(world: &SimWorld, id: VehicleId) -> Option<Self> {
        let path = world.vehicle_path(id)?;
        Some(Self {
            id: id.0,
            path: path.iter().copied().map(PathPoint::from).collect(),
        })
    }
}

/// Routes of every vehicle, ordered by vehicle id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsPayload {
    pub car_paths: Vec<VehiclePathPayload>,
}

impl PathsPayload {
    pub fn from_world(world: &SimWorld) -> Self {
        let car_paths = world
            .all_vehicle_paths()
            .into_iter()
            .map(|(id, path)| VehiclePathPayload {
                id: id.0,
                path: path.into_iter().map(PathPoint::from).collect(),
            })
            .collect();
        Self { car_paths }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
