//! # Dynamics Module
//!
//! This module is a minimal stand-in for a host simulation framework,
//! sufficient to drive the quantum force bridge the way a production engine
//! would: one initialization before the first force evaluation, then one
//! blocking force computation per integration step, with the bridge's force
//! contribution scattered into the global force accumulation.
//!
//! ## Architecture
//!
//! - **Integration** ([`integrator`]) - A thermostatted Langevin integrator
//!   using the kick / drift / Ornstein-Uhlenbeck / drift splitting
//! - **Driver** ([`simulation`]) - Owns the global simulation state
//!   (positions, velocities, masses), gathers the quantum subset for the
//!   bridge, and steps the system
//!
//! Host units throughout: nanometers, picoseconds, atomic mass units, and
//! kJ/mol, so that (kJ/mol)/nm divided by amu is exactly nm/ps².

pub mod integrator;
pub mod simulation;
