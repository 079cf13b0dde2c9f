//! Main simulation world that ties everything together
//!
//! Owns every entity and drives the discrete tick: lights first, then each
//! vehicle in activation order, then the termination check.

use log::{log, warn, Level};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};

use super::builder::{build_world, SkippedVehicle};
use super::direction_graph::DirectionGraph;
use super::events::{SimEvent, SimObserver, TimedEvent};
use super::occupancy::CellOccupancy;
use super::occupant::{OccupiesCell, Occupant, SimObstacle};
use super::parking::{LotStatus, ParkingRegistry};
use super::scenario::{ConfigError, Scenario};
use super::traffic_light::SimTrafficLight;
use super::types::{Cell, Direction, LightId, LightPhase, LotId, VehicleId};
use super::vehicle::{SimVehicle, VehicleUpdateResult};

/// How a call to [`SimWorld::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Tick count when the loop stopped
    pub ticks: u64,
    /// Whether every vehicle reached its destination
    pub terminated: bool,
}

/// The main simulation world
pub struct SimWorld {
    name: String,

    /// Legal moves between cells
    graph: DirectionGraph,

    /// Parking lots and their occupancy
    parking: ParkingRegistry,

    lights: Vec<SimTrafficLight>,

    obstacles: Vec<SimObstacle>,

    /// All vehicles, ordered by id
    vehicles: Vec<SimVehicle>,

    /// Derived from vehicle positions, rebuilt every tick
    occupancy: CellOccupancy,

    /// Configured vehicles that could not be created
    skipped: Vec<SkippedVehicle>,

    /// Events not yet handed to an observer
    events: Vec<TimedEvent>,

    /// Vehicles that found no parking anywhere on their last attempt
    stalled: HashSet<VehicleId>,

    tick: u64,

    terminated: bool,

    /// Shuffles activation order each tick when set
    rng: Option<StdRng>,
}

impl SimWorld {
    pub(crate) fn new_internal(
        name: String,
        graph: DirectionGraph,
        parking: ParkingRegistry,
        lights: Vec<SimTrafficLight>,
        obstacles: Vec<SimObstacle>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            name,
            graph,
            parking,
            lights,
            obstacles,
            vehicles: Vec::new(),
            occupancy: CellOccupancy::new(),
            skipped: Vec::new(),
            events: Vec::new(),
            stalled: HashSet::new(),
            tick: 0,
            terminated: false,
            rng: seed.map(StdRng::seed_from_u64),
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ConfigError> {
        build_world(scenario)
    }

    /// The built-in downtown city
    pub fn downtown() -> Result<Self, ConfigError> {
        Self::from_scenario(&Scenario::downtown()?)
    }

    /// Creates a vehicle parked in `origin`, bound for `destination`
    ///
    /// The vehicle takes a space in its origin lot if one is free; either way
    /// it is created, and problems are reported as events.
    pub(crate) fn spawn_vehicle(
        &mut self,
        id: VehicleId,
        origin: LotId,
        destination: LotId,
    ) -> Option<VehicleId> {
        let origin_cell = self.parking.lot(origin)?.position;
        let destination_cell = self.parking.lot(destination)?.position;

        let holds_space = self.parking.admit(origin);
        let vehicle = SimVehicle::new(id, origin_cell, destination_cell, &self.graph, holds_space);

        if !holds_space {
            self.emit(SimEvent::OriginLotFull { vehicle: id, lot: origin });
        }
        if !vehicle.has_plan() {
            self.emit(SimEvent::RouteUnavailable {
                vehicle: id,
                from: origin_cell,
                to: destination_cell,
            });
        }

        self.vehicles.push(vehicle);
        Some(id)
    }

    pub(crate) fn record_skipped(&mut self, skipped: SkippedVehicle) {
        self.skipped.push(skipped);
    }

    /// Advance the world by one tick
    /// Returns whether the simulation is still running afterwards
    pub fn tick(&mut self) -> bool {
        if self.terminated {
            return false;
        }

        self.tick += 1;
        self.update_lights();
        self.update_vehicles();

        let at_destination = self.vehicles.iter().filter(|v| v.at_destination()).count();
        if at_destination == self.vehicles.len() {
            self.terminated = true;
            self.emit(SimEvent::Terminated);
        }

        !self.terminated
    }

    /// Tick until every vehicle is at its destination or `max_ticks` ticks
    /// have elapsed, forwarding all events to `observer`
    pub fn run<O: SimObserver>(&mut self, max_ticks: Option<u64>, observer: &mut O) -> RunOutcome {
        self.flush_events(observer);

        let mut running = !self.terminated;
        while running {
            if max_ticks.is_some_and(|max| self.tick >= max) {
                break;
            }
            running = self.tick();
            self.flush_events(observer);
            observer.on_tick_end(self.tick, running);
        }

        observer.on_run_end(self.tick, self.terminated);
        RunOutcome {
            ticks: self.tick,
            terminated: self.terminated,
        }
    }

    fn flush_events<O: SimObserver>(&mut self, observer: &mut O) {
        for event in self.events.drain(..) {
            observer.on_event(&event);
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Update all traffic lights
    fn update_lights(&mut self) {
        let mut changes = Vec::new();
        for light in &mut self.lights {
            if let Some(phase) = light.advance() {
                changes.push((light.id, phase));
            }
        }
        for (light, phase) in changes {
            self.emit(SimEvent::LightChanged { light, phase });
        }
    }

    /// Vehicle indices in this tick's activation order
    fn activation_order(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.vehicles.len()).collect();
        if let Some(rng) = &mut self.rng {
            order.shuffle(rng);
        }
        order
    }

    /// Update all vehicles, one at a time; earlier vehicles win contested cells
    fn update_vehicles(&mut self) {
        self.occupancy.rebuild(
            self.vehicles
                .iter()
                .filter(|v| v.is_on_grid())
                .map(|v| v.position),
        );

        for index in self.activation_order() {
            let vehicle = &mut self.vehicles[index];
            let id = vehicle.id;
            let result = vehicle.advance(
                &self.graph,
                &mut self.parking,
                &self.lights,
                &mut self.occupancy,
            );

            match result {
                Ok(update) => self.record_update(id, update),
                Err(e) => warn!("{} stays put: {:#}", id, e),
            }
        }
    }

    fn record_update(&mut self, vehicle: VehicleId, update: VehicleUpdateResult) {
        if !matches!(update, VehicleUpdateResult::NoParkingAvailable { .. }) {
            self.stalled.remove(&vehicle);
        }

        match update {
            VehicleUpdateResult::Idle => {}
            VehicleUpdateResult::Moved { from, to, departed } => {
                if let Some(lot) = departed {
                    self.emit(SimEvent::Departed { vehicle, lot });
                }
                self.emit(SimEvent::Moved { vehicle, from, to });
            }
            VehicleUpdateResult::HeldAtRedLight(light) => {
                self.emit(SimEvent::HeldAtRedLight { vehicle, light });
            }
            VehicleUpdateResult::Blocked(cell) => {
                self.emit(SimEvent::BlockedByVehicle { vehicle, cell });
            }
            VehicleUpdateResult::Arrived { lot, departed } => {
                if let Some(origin) = departed {
                    self.emit(SimEvent::Departed {
                        vehicle,
                        lot: origin,
                    });
                }
                self.emit(SimEvent::Arrived { vehicle, lot });
            }
            VehicleUpdateResult::Rerouted { denied, to } => {
                self.emit(SimEvent::AdmissionDenied {
                    vehicle,
                    lot: denied,
                });
                self.emit(SimEvent::Rerouted {
                    vehicle,
                    from_lot: denied,
                    to_lot: to,
                });
            }
            VehicleUpdateResult::RerouteUnreachable { denied, to } => {
                self.emit(SimEvent::AdmissionDenied {
                    vehicle,
                    lot: denied,
                });
                self.emit(SimEvent::Rerouted {
                    vehicle,
                    from_lot: denied,
                    to_lot: to,
                });
                if let (Some(from), Some(target)) = (
                    self.vehicle(vehicle).map(|v| v.position),
                    self.parking.lot(to).map(|lot| lot.position),
                ) {
                    self.emit(SimEvent::RouteUnavailable {
                        vehicle,
                        from,
                        to: target,
                    });
                }
            }
            VehicleUpdateResult::NoParkingAvailable { denied } => {
                // Only the first tick of a stall is worth more than a debug line
                let first = self.stalled.insert(vehicle);
                let denied_event = SimEvent::AdmissionDenied {
                    vehicle,
                    lot: denied,
                };
                let stall_event = SimEvent::NoParkingAvailable { vehicle };
                if first {
                    self.emit(denied_event);
                    self.emit(stall_event);
                } else {
                    self.emit_at(Level::Debug, denied_event);
                    self.emit_at(Level::Debug, stall_event);
                }
            }
        }
    }

    fn emit(&mut self, event: SimEvent) {
        let level = match &event {
            SimEvent::OriginLotFull { .. }
            | SimEvent::RouteUnavailable { .. }
            | SimEvent::NoParkingAvailable { .. } => Level::Warn,
            SimEvent::Departed { .. }
            | SimEvent::Arrived { .. }
            | SimEvent::AdmissionDenied { .. }
            | SimEvent::Rerouted { .. }
            | SimEvent::Terminated => Level::Info,
            SimEvent::LightChanged { .. }
            | SimEvent::Moved { .. }
            | SimEvent::HeldAtRedLight { .. }
            | SimEvent::BlockedByVehicle { .. } => Level::Debug,
        };
        self.emit_at(level, event);
    }

    fn emit_at(&mut self, level: Level, event: SimEvent) {
        log!(level, "[tick {}] {}", self.tick, event);
        self.events.push(TimedEvent {
            tick: self.tick,
            event,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> i32 {
        self.graph.width()
    }

    pub fn height(&self) -> i32 {
        self.graph.height()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        !self.terminated
    }

    pub fn graph(&self) -> &DirectionGraph {
        &self.graph
    }

    pub fn parking(&self) -> &ParkingRegistry {
        &self.parking
    }

    pub fn lights(&self) -> &[SimTrafficLight] {
        &self.lights
    }

    pub fn obstacles(&self) -> &[SimObstacle] {
        &self.obstacles
    }

    pub fn vehicles(&self) -> &[SimVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles
            .binary_search_by_key(&id, |v| v.id)
            .ok()
            .map(|index| &self.vehicles[index])
    }

    pub fn skipped_vehicles(&self) -> &[SkippedVehicle] {
        &self.skipped
    }

    /// Remaining path of a vehicle; `None` if no such vehicle exists
    pub fn vehicle_path(&self, id: VehicleId) -> Option<&[Cell]> {
        self.vehicle(id).map(SimVehicle::path)
    }

    pub fn all_vehicle_paths(&self) -> BTreeMap<VehicleId, Vec<Cell>> {
        self.vehicles
            .iter()
            .map(|v| (v.id, v.path().to_vec()))
            .collect()
    }

    pub fn vehicle_positions(&self) -> Vec<(VehicleId, Cell)> {
        self.vehicles.iter().map(|v| (v.id, v.position)).collect()
    }

    pub fn parking_status(&self) -> BTreeMap<LotId, LotStatus> {
        self.parking.status()
    }

    pub fn light_status(&self) -> BTreeMap<LightId, LightPhase> {
        self.lights.iter().map(|l| (l.id, l.phase())).collect()
    }

    /// Every entity sitting on `cell`; arrived vehicles are off the grid
    pub fn occupants_at(&self, cell: Cell) -> Vec<Occupant> {
        let vehicles = self
            .vehicles
            .iter()
            .filter(|v| v.is_on_grid() && v.cell() == cell)
            .map(|v| Occupant::Vehicle(v.id));
        let lights = self
            .lights
            .iter()
            .filter(|l| l.cell() == cell)
            .map(|l| Occupant::TrafficLight(l.id));
        let lots = self
            .parking
            .iter()
            .filter(|lot| lot.cell() == cell)
            .map(|lot| Occupant::ParkingLot(lot.id));
        let obstacles = self
            .obstacles
            .iter()
            .filter(|o| o.cell() == cell)
            .map(|o| Occupant::Obstacle(o.id));

        vehicles.chain(lights).chain(lots).chain(obstacles).collect()
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Parking Simulation Summary ===");
        println!("Scenario: {}, tick {}", self.name, self.tick);
        println!(
            "Grid: {}x{}, road cells: {}, moves: {}",
            self.width(),
            self.height(),
            self.graph.cell_count(),
            self.graph.edge_count()
        );

        println!("--- Parking ---");
        for lot in self.parking.iter() {
            println!(
                "  Lot {} at {}: {}/{}",
                lot.id.0,
                lot.position,
                lot.occupancy(),
                lot.capacity()
            );
        }

        println!("--- Lights ---");
        for light in &self.lights {
            println!("  Light {} at {}: {}", light.id.0, light.position, light.phase());
        }

        println!("--- Vehicles ---");
        for vehicle in &self.vehicles {
            println!(
                "  Vehicle {}: {:?} at {}, heading to {}, path_remaining={}",
                vehicle.id.0,
                vehicle.status(),
                vehicle.position,
                vehicle.destination,
                vehicle.path().len()
            );
        }
    }

    /// Render the grid as text, top row first
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                out.push(self.cell_glyph(Cell::new(x, y)));
            }
            out.push('\n');
        }
        out
    }

    fn cell_glyph(&self, cell: Cell) -> char {
        let driving = self
            .vehicles
            .iter()
            .any(|v| v.is_on_grid() && v.has_departed() && v.position == cell);
        if driving {
            return 'C';
        }

        if let Some(light) = self.lights.iter().find(|l| l.position == cell) {
            return match light.phase() {
                LightPhase::Green => 'g',
                LightPhase::Yellow => 'y',
                LightPhase::Red => 'r',
            };
        }

        if let Some(lot) = self.parking.lot_at(cell).and_then(|id| self.parking.lot(id)) {
            return if lot.has_space() { 'P' } else { 'F' };
        }

        if self.graph.is_obstacle(cell) {
            return '#';
        }

        let directions = self.graph.road_directions(cell);
        match directions.len() {
            0 => ' ',
            1 => match directions.iter().next() {
                Some(Direction::Up) => '^',
                Some(Direction::Down) => 'v',
                Some(Direction::Left) => '<',
                Some(Direction::Right) => '>',
                None => ' ',
            },
            _ => '+',
        }
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        println!("\n=== World Map (tick {}) ===", self.tick);
        println!("Legend: C=Car, P=Lot, F=Full lot, r/y/g=Light, #=Obstacle, ^v<>+=Road");
        println!();
        print!("{}", self.render_ascii());
        println!();
    }
}
