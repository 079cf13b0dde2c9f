//! Builds a [`SimWorld`] from a [`Scenario`]
//!
//! Structural problems in the scenario are hard errors. Vehicles whose lot
//! assignment is missing or out of range are skipped and reported through
//! [`SimWorld::skipped_vehicles`].

use log::{info, warn};
use std::collections::HashSet;
use thiserror::Error;

use super::direction_graph::DirectionGraph;
use super::occupant::SimObstacle;
use super::parking::{distribute_capacity, ParkingRegistry};
use super::scenario::{ConfigError, Scenario};
use super::traffic_light::SimTrafficLight;
use super::types::{Cell, DirectionSet, LightId, LotId, ObstacleId, VehicleId};
use super::world::SimWorld;

/// Why a configured vehicle was not created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no origin/destination assignment")]
    MissingAssignment,
    #[error("origin lot index {0} is out of range")]
    OriginOutOfRange(usize),
    #[error("destination lot index {0} is out of range")]
    DestinationOutOfRange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedVehicle {
    /// Position of the vehicle in the scenario's vehicle list
    pub index: usize,
    pub reason: SkipReason,
}

pub fn build_world(scenario: &Scenario) -> Result<SimWorld, ConfigError> {
    let layout = scenario.parse_layout()?;
    let obstacles: HashSet<Cell> = layout.obstacles.iter().copied().collect();

    let check_cell = |what: &'static str, cell: Cell| -> Result<(), ConfigError> {
        if !scenario.in_bounds(cell) {
            return Err(ConfigError::OutOfBounds { what, cell });
        }
        if obstacles.contains(&cell) {
            return Err(ConfigError::OnObstacle { what, cell });
        }
        Ok(())
    };

    let mut graph = DirectionGraph::builder(scenario.width, scenario.height);
    for (cell, directions) in &layout.roads {
        graph.set_road(*cell, *directions);
    }
    for cell in &layout.obstacles {
        graph.add_obstacle(*cell);
    }

    // Parking lots and their entry/exit overrides
    let capacities = distribute_capacity(scenario.capacity_pool(), scenario.lots.len());
    let mut parking = ParkingRegistry::new();
    for (lot, capacity) in scenario.lots.iter().zip(capacities) {
        let cell = lot.cell();
        check_cell("parking lot", cell)?;
        if parking.lot_at(cell).is_some() {
            return Err(ConfigError::DuplicateLot(cell));
        }
        graph.add_exit(cell, lot.exit.iter().collect::<DirectionSet>());
        if let Some(entry) = &lot.entry {
            check_cell("parking entry", entry.cell())?;
            graph.add_entry(entry.cell(), entry.directions.iter().collect::<DirectionSet>());
        }
        parking.add_lot(cell, capacity);
    }

    let mut lights = Vec::with_capacity(scenario.lights.len());
    for (index, light) in scenario.lights.iter().enumerate() {
        check_cell("traffic light", light.cell())?;
        lights.push(SimTrafficLight::new(LightId(index), light.cell(), light.phase));
    }

    let obstacles = layout
        .obstacles
        .iter()
        .enumerate()
        .map(|(index, cell)| SimObstacle {
            id: ObstacleId(index),
            position: *cell,
        })
        .collect();

    let mut world = SimWorld::new_internal(
        scenario.name.clone(),
        graph.build(),
        parking,
        lights,
        obstacles,
        scenario.seed,
    );

    let lot_count = scenario.lots.len();
    for index in 0..scenario.vehicle_count() {
        let assignment = match scenario.assignments.get(index) {
            Some(&(origin, _)) if origin >= lot_count => Err(SkipReason::OriginOutOfRange(origin)),
            Some(&(_, destination)) if destination >= lot_count => {
                Err(SkipReason::DestinationOutOfRange(destination))
            }
            Some(&(origin, destination)) => Ok((LotId(origin), LotId(destination))),
            None => Err(SkipReason::MissingAssignment),
        };

        match assignment {
            Ok((origin, destination)) => {
                world.spawn_vehicle(VehicleId(index), origin, destination);
            }
            Err(reason) => {
                warn!("Skipping vehicle {}: {}", index, reason);
                world.record_skipped(SkippedVehicle { index, reason });
            }
        }
    }

    info!(
        "Built world {:?}: {}x{}, {} lots, {} lights, {} obstacles, {} vehicles ({} skipped)",
        scenario.name,
        scenario.width,
        scenario.height,
        world.parking().len(),
        world.lights().len(),
        world.obstacles().len(),
        world.vehicles().len(),
        world.skipped_vehicles().len()
    );

    Ok(world)
}
