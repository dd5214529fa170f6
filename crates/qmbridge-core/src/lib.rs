//! # qmbridge Core Library
//!
//! A library for coupling classical molecular-dynamics engines to external
//! semi-empirical quantum-chemical calculators. A designated subset of the
//! particles in a simulation has its interactions evaluated fully
//! quantum-mechanically every time step, instead of via classical pair
//! potentials.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains unit-conversion constants, static
//!   element data, the plain data models (`QuantumRegion`, `PeriodicCell`,
//!   `Method`), and the versioned persistence format for region descriptors.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer owns the per-step
//!   bridging logic. It defines the [`engine::evaluator::Evaluator`] boundary
//!   trait behind which the external quantum calculator lives, and the
//!   [`engine::bridge::QuantumForceBridge`] that converts simulation state
//!   into evaluator input, drives single-point computations, and converts
//!   energies and gradients back into the host's unit system and sign
//!   convention.
//!
//! - **[`dynamics`]: The Driver Layer.** A minimal stand-in for a host
//!   simulation framework: a thermostatted Langevin integrator and a
//!   `Simulation` loop that gathers the quantum subset, invokes the bridge
//!   once per step, and scatters the resulting forces back into the global
//!   force accumulation.

pub mod core;
pub mod dynamics;
pub mod engine;
