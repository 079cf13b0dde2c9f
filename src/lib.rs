//! Parking Simulation Library
//!
//! A grid traffic simulation of vehicles driving between parking lots that
//! can run headless or feed paths to an external renderer.

pub mod simulation;
