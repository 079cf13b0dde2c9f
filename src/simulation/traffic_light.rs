//! Traffic light logic for the parking simulation
//!
//! Each light is an independent timed state machine cycling
//! green -> yellow -> red -> green.

use super::types::{Cell, LightId, LightPhase};

/// A traffic light occupying a road cell
#[derive(Debug, Clone)]
pub struct SimTrafficLight {
    pub id: LightId,
    pub position: Cell,
    phase: LightPhase,
    /// Ticks spent in the current phase
    ticks_in_phase: u32,
}

impl SimTrafficLight {
    pub fn new(id: LightId, position: Cell, phase: LightPhase) -> Self {
        Self {
            id,
            position,
            phase,
            ticks_in_phase: 0,
        }
    }

    pub fn phase(&self) -> LightPhase {
        self.phase
    }

    pub fn ticks_in_phase(&self) -> u32 {
        self.ticks_in_phase
    }

    pub fn is_red(&self) -> bool {
        self.phase == LightPhase::Red
    }

    /// Advance the light by one tick
    /// Returns the new phase if the light changed this tick
    pub fn advance(&mut self) -> Option<LightPhase> {
        self.ticks_in_phase += 1;
        if self.ticks_in_phase >= self.phase.duration() {
            self.phase = self.phase.next();
            self.ticks_in_phase = 0;
            Some(self.phase)
        } else {
            None
        }
    }
}
