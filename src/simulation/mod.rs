//! Standalone parking simulation module
//!
//! Vehicles drive a directed road grid from one parking lot to another,
//! waiting at red lights and behind other vehicles, and fall back to the
//! nearest free lot when their destination is full.

mod builder;
mod direction_graph;
mod events;
mod export;
mod occupancy;
mod occupant;
mod parking;
mod planner;
mod scenario;
mod stats;
mod traffic_light;
mod types;
mod vehicle;
mod world;

pub use builder::{build_world, SkipReason, SkippedVehicle};
pub use direction_graph::{DirectionGraph, DirectionGraphBuilder};
pub use events::{EventRecorder, NoopObserver, SimEvent, SimObserver, TimedEvent};
pub use export::{PathPoint, PathsPayload, VehiclePathPayload};
pub use occupancy::CellOccupancy;
pub use occupant::{Occupant, OccupiesCell, SimObstacle};
pub use parking::{distribute_capacity, LotStatus, ParkingRegistry, SimParkingLot};
pub use planner::{find_path, path_cost};
pub use scenario::{ConfigError, EntrySpec, LightSpec, LotSpec, ParsedLayout, Scenario};
pub use stats::SimulationStats;
pub use traffic_light::SimTrafficLight;
pub use types::{
    Cell, Direction, DirectionSet, LightId, LightPhase, LotId, ObstacleId, VehicleId,
    GREEN_TICKS, RED_TICKS, YELLOW_TICKS,
};
pub use vehicle::{SimVehicle, VehicleStatus, VehicleUpdateResult};
pub use world::{RunOutcome, SimWorld};
