//! Run statistics
//!
//! Counts what happened during a run from the event stream and logs the
//! final summary.

use log::info;

use super::events::{SimEvent, SimObserver, TimedEvent};
use super::world::SimWorld;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub ticks: u64,
    pub terminated: bool,
    pub total_vehicles: usize,
    pub skipped_vehicles: usize,
    pub vehicles_arrived: usize,
    pub unreachable_routes: usize,
    pub moves: usize,
    pub reroutes: usize,
    pub admission_denials: usize,
    pub red_light_holds: usize,
    pub blocked_moves: usize,
    pub parking_stalls: usize,
    pub light_changes: usize,
}

impl SimulationStats {
    /// Fresh statistics for a run over `world`
    pub fn for_world(world: &SimWorld) -> Self {
        Self {
            total_vehicles: world.vehicles().len(),
            skipped_vehicles: world.skipped_vehicles().len(),
            ..Self::default()
        }
    }

    /// Percentage of created vehicles that parked
    pub fn success_rate(&self) -> f32 {
        if self.total_vehicles > 0 {
            (self.vehicles_arrived as f32 / self.total_vehicles as f32) * 100.0
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks elapsed: {}", self.ticks);
        info!("All vehicles at destination: {}", self.terminated);
        info!("Total vehicles: {}", self.total_vehicles);
        info!("Skipped vehicles: {}", self.skipped_vehicles);
        info!("Vehicles arrived: {}", self.vehicles_arrived);
        info!("Unreachable routes: {}", self.unreachable_routes);
        info!("Moves: {}", self.moves);
        info!("Reroutes: {}", self.reroutes);
        info!("Admission denials: {}", self.admission_denials);
        info!("Red light holds: {}", self.red_light_holds);
        info!("Blocked moves: {}", self.blocked_moves);
        info!("Parking stalls: {}", self.parking_stalls);
        info!("Light changes: {}", self.light_changes);
        info!("Success rate: {:.1}%", self.success_rate());
    }
}

impl SimObserver for SimulationStats {
    fn on_event(&mut self, event: &TimedEvent) {
        match event.event {
            SimEvent::Arrived { .. } => self.vehicles_arrived += 1,
            SimEvent::RouteUnavailable { .. } => self.unreachable_routes += 1,
            SimEvent::Moved { .. } => self.moves += 1,
            SimEvent::Rerouted { .. } => self.reroutes += 1,
            SimEvent::AdmissionDenied { .. } => self.admission_denials += 1,
            SimEvent::HeldAtRedLight { .. } => self.red_light_holds += 1,
            SimEvent::BlockedByVehicle { .. } => self.blocked_moves += 1,
            SimEvent::NoParkingAvailable { .. } => self.parking_stalls += 1,
            SimEvent::LightChanged { .. } => self.light_changes += 1,
            SimEvent::OriginLotFull { .. } | SimEvent::Departed { .. } | SimEvent::Terminated => {}
        }
    }

    fn on_run_end(&mut self, final_tick: u64, terminated: bool) {
        self.ticks = final_tick;
        self.terminated = terminated;
    }
}
