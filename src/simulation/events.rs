//! Structured event stream emitted by the simulation
//!
//! Everything observable that happens in a tick (parking, rerouting, lights
//! changing, vehicles waiting) is reported as a [`SimEvent`]. Observers such as
//! a transport layer or the run statistics subscribe through [`SimObserver`].

use serde::Serialize;
use std::fmt;

use super::types::{Cell, LightId, LightPhase, LotId, VehicleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// The origin lot was already full when the vehicle was created
    OriginLotFull { vehicle: VehicleId, lot: LotId },
    /// No route exists from `from` to `to`; the vehicle will not move
    RouteUnavailable {
        vehicle: VehicleId,
        from: Cell,
        to: Cell,
    },
    LightChanged { light: LightId, phase: LightPhase },
    Departed { vehicle: VehicleId, lot: LotId },
    Moved {
        vehicle: VehicleId,
        from: Cell,
        to: Cell,
    },
    HeldAtRedLight { vehicle: VehicleId, light: LightId },
    BlockedByVehicle { vehicle: VehicleId, cell: Cell },
    Arrived { vehicle: VehicleId, lot: LotId },
    AdmissionDenied { vehicle: VehicleId, lot: LotId },
    Rerouted {
        vehicle: VehicleId,
        from_lot: LotId,
        to_lot: LotId,
    },
    /// Destination full and every other lot full as well
    NoParkingAvailable { vehicle: VehicleId },
    /// Every vehicle is at its destination
    Terminated,
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::OriginLotFull { vehicle, lot } => {
                write!(f, "{} created in full {}", vehicle, lot)
            }
            SimEvent::RouteUnavailable { vehicle, from, to } => {
                write!(f, "{} has no route from {} to {}", vehicle, from, to)
            }
            SimEvent::LightChanged { light, phase } => write!(f, "{} turned {}", light, phase),
            SimEvent::Departed { vehicle, lot } => write!(f, "{} left {}", vehicle, lot),
            SimEvent::Moved { vehicle, from, to } => {
                write!(f, "{} moved {} -> {}", vehicle, from, to)
            }
            SimEvent::HeldAtRedLight { vehicle, light } => {
                write!(f, "{} waiting at red {}", vehicle, light)
            }
            SimEvent::BlockedByVehicle { vehicle, cell } => {
                write!(f, "{} blocked by traffic at {}", vehicle, cell)
            }
            SimEvent::Arrived { vehicle, lot } => write!(f, "{} parked in {}", vehicle, lot),
            SimEvent::AdmissionDenied { vehicle, lot } => {
                write!(f, "{} found no space in {}", vehicle, lot)
            }
            SimEvent::Rerouted {
                vehicle,
                from_lot,
                to_lot,
            } => write!(f, "{} rerouted from {} to {}", vehicle, from_lot, to_lot),
            SimEvent::NoParkingAvailable { vehicle } => {
                write!(f, "{} found no parking anywhere", vehicle)
            }
            SimEvent::Terminated => f.write_str("all vehicles at their destination"),
        }
    }
}

/// An event stamped with the tick that produced it (0 for world setup)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: SimEvent,
}

/// Callbacks invoked by [`SimWorld::run`][crate::simulation::SimWorld::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called for every event, in emission order
    fn on_event(&mut self, _event: &TimedEvent) {}

    /// Called after each tick; `running` is false once the run terminated
    fn on_tick_end(&mut self, _tick: u64, _running: bool) {}

    /// Called once when the run loop stops
    fn on_run_end(&mut self, _final_tick: u64, _terminated: bool) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Collects every event it sees
#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<TimedEvent>,
}

impl SimObserver for EventRecorder {
    fn on_event(&mut self, event: &TimedEvent) {
        self.events.push(event.clone());
    }
}
