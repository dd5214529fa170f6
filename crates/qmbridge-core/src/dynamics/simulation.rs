use super::integrator::LangevinMiddle;
use crate::core::elements;
use crate::core::models::cell::PeriodicCell;
use crate::core::models::region::QuantumRegion;
use crate::engine::bridge::QuantumForceBridge;
use crate::engine::error::BridgeError;
use crate::engine::evaluator::Evaluator;
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Expected {expected} masses for {expected} particles, got {actual}")]
    MismatchedMasses { expected: usize, actual: usize },

    #[error("Region references particle {index} but the simulation holds {particles} particles")]
    RegionIndexOutOfRange { index: usize, particles: usize },

    #[error("No element data for atomic number {atomic_number}")]
    UnknownElement { atomic_number: u8 },
}

/// Derives per-particle masses for a region from the element table, in
/// region order. Convenient for systems whose particles are exactly the
/// quantum region.
pub fn region_masses(region: &QuantumRegion) -> Result<Vec<f64>, SimulationError> {
    region
        .atomic_numbers()
        .iter()
        .map(|&atomic_number| {
            elements::element(atomic_number)
                .map(|element| element.mass)
                .ok_or(SimulationError::UnknownElement { atomic_number })
        })
        .collect()
}

/// A minimal host-side simulation loop around a quantum force bridge.
///
/// The simulation owns the global particle state. Each step it gathers the
/// positions of the bridge's particle subset (in region order), runs one
/// single-point force evaluation, scatters the resulting forces back into
/// the global accumulation, and advances all particles with the Langevin
/// integrator. The bridge is initialized exactly once, at construction.
pub struct Simulation<E: Evaluator> {
    bridge: QuantumForceBridge<E>,
    integrator: LangevinMiddle,
    positions: Vec<Point3<f64>>,
    velocities: Vec<Vector3<f64>>,
    forces: Vec<Vector3<f64>>,
    masses: Vec<f64>,
    cell: Option<PeriodicCell>,
    rng: StdRng,
    subset_positions: Vec<Point3<f64>>,
    subset_forces: Vec<Vector3<f64>>,
    potential_energy: f64,
    forces_fresh: bool,
}

impl<E: Evaluator> Simulation<E> {
    /// Creates a simulation and initializes its quantum force bridge.
    ///
    /// `positions` and `masses` cover the whole simulated system; the
    /// region selects the quantum subset out of it. Velocities start at
    /// zero. `seed` fixes the thermostat's random stream, making runs
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if the mass list does not match the particle
    /// count, the region references a particle outside the system, or
    /// bridge initialization fails.
    pub fn new(
        evaluator: E,
        region: &QuantumRegion,
        positions: Vec<Point3<f64>>,
        masses: Vec<f64>,
        cell: Option<PeriodicCell>,
        integrator: LangevinMiddle,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        if masses.len() != positions.len() {
            return Err(SimulationError::MismatchedMasses {
                expected: positions.len(),
                actual: masses.len(),
            });
        }
        if let Some(&index) = region
            .particle_indices()
            .iter()
            .find(|&&index| index >= positions.len())
        {
            return Err(SimulationError::RegionIndexOutOfRange {
                index,
                particles: positions.len(),
            });
        }

        let bridge = QuantumForceBridge::initialize(evaluator, region)?;
        let particle_count = positions.len();
        let subset_count = bridge.particle_count();
        Ok(Self {
            bridge,
            integrator,
            velocities: vec![Vector3::zeros(); particle_count],
            forces: vec![Vector3::zeros(); particle_count],
            positions,
            masses,
            cell,
            rng: StdRng::seed_from_u64(seed),
            subset_positions: vec![Point3::origin(); subset_count],
            subset_forces: vec![Vector3::zeros(); subset_count],
            potential_energy: 0.0,
            forces_fresh: false,
        })
    }

    /// Advances the simulation by `count` steps.
    pub fn step(&mut self, count: usize) -> Result<(), SimulationError> {
        for _ in 0..count {
            if !self.forces_fresh {
                self.refresh_forces()?;
            }
            self.integrator.step(
                &mut self.positions,
                &mut self.velocities,
                &self.forces,
                &self.masses,
                &mut self.rng,
            );
            self.forces_fresh = false;
        }
        info!(steps = count, "dynamics segment complete");
        Ok(())
    }

    /// Re-evaluates and returns the quantum potential energy at the current
    /// positions, in kJ/mol.
    ///
    /// This may run any number of times between steps; the bridge updates
    /// its molecule in place rather than rebuilding it.
    pub fn potential_energy(&mut self) -> Result<f64, SimulationError> {
        self.refresh_forces()?;
        Ok(self.potential_energy)
    }

    /// Current positions of all particles, in nm.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Current velocities of all particles, in nm/ps.
    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.velocities
    }

    /// Forces from the most recent evaluation, in (kJ/mol)/nm, for all
    /// particles (zero outside the quantum region).
    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    fn refresh_forces(&mut self) -> Result<(), SimulationError> {
        for (subset, &index) in self
            .subset_positions
            .iter_mut()
            .zip(self.bridge.particle_indices())
        {
            *subset = self.positions[index];
        }

        let energy = {
            let Self {
                bridge,
                cell,
                subset_positions,
                subset_forces,
                ..
            } = self;
            bridge.compute_force(subset_positions, cell.as_ref(), subset_forces)?
        };

        self.forces.fill(Vector3::zeros());
        for (subset, &index) in self.subset_forces.iter().zip(self.bridge.particle_indices()) {
            self.forces[index] += *subset;
        }
        self.potential_energy = energy;
        self.forces_fresh = true;
        Ok(())
    }
}
