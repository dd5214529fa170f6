use super::error::BridgeError;
use super::evaluator::{Evaluator, MoleculeSeed, Verbosity};
use crate::core::constants::{
    BOHR_PER_NANOMETER, KILOJOULES_PER_MOLE_NANOMETER_PER_HARTREE_BOHR,
    KILOJOULES_PER_MOLE_PER_HARTREE,
};
use crate::core::models::cell::PeriodicCell;
use crate::core::models::method::Method;
use crate::core::models::region::QuantumRegion;
use nalgebra::{Point3, Vector3};
use std::mem;
use tracing::{debug, trace};

/// The calculator-side molecule representation, modeled as an explicit
/// two-state machine.
///
/// `Built` is the only state from which an in-place position update is
/// valid; the transition out of `Unbuilt` is gated on both molecule
/// construction and method loading succeeding. The handle exists iff the
/// state is `Built`.
enum MoleculeState<M> {
    Unbuilt,
    Built(M),
}

/// Connects a classical simulation to an external quantum calculator.
///
/// One bridge serves one simulation context: it is created once, before the
/// first force evaluation, and then invoked synchronously once per
/// integration step (or more often, if the host re-evaluates energy outside
/// of dynamics). The bridge owns the calculator's four opaque handles
/// exclusively and releases them, in reverse acquisition order, when it is
/// dropped. It is not reentrant and must not be shared across threads.
///
/// Per step, the bridge converts the host's positions (and cell, under
/// periodic boundary conditions) into the calculator's units, constructs
/// the calculator-side molecule on the first call and updates it in place
/// on every later call, runs a single-point computation, and converts the
/// resulting energy and gradient back into the host's units and sign
/// convention (force = −gradient).
pub struct QuantumForceBridge<E: Evaluator> {
    evaluator: E,
    env: Option<E::Environment>,
    calculator: Option<E::Calculator>,
    results: Option<E::Results>,
    molecule: MoleculeState<E::Molecule>,
    method: Method,
    charge: f64,
    multiplicity: u32,
    periodic: bool,
    particle_indices: Vec<usize>,
    atomic_numbers: Vec<u8>,
    position_buffer: Vec<f64>,
    gradient_buffer: Vec<f64>,
}

impl<E: Evaluator> QuantumForceBridge<E> {
    /// Creates a bridge for the given region, acquiring the calculator's
    /// environment, calculator, and results handles.
    ///
    /// The region is read exactly once, here; later mutation of the
    /// caller's descriptor does not affect the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MismatchedRegion`] if the region's
    /// particle-index and atomic-number lists differ in length; this is
    /// checked before any handle is allocated. Returns
    /// [`BridgeError::Evaluator`] if the calculator reports an error during
    /// handle allocation; handles acquired up to that point are released
    /// before returning.
    pub fn initialize(mut evaluator: E, region: &QuantumRegion) -> Result<Self, BridgeError> {
        let indices = region.particle_indices();
        let numbers = region.atomic_numbers();
        if indices.len() != numbers.len() {
            return Err(BridgeError::MismatchedRegion {
                indices: indices.len(),
                numbers: numbers.len(),
            });
        }
        let particle_count = indices.len();

        let mut env = evaluator.create_environment();
        let calculator = evaluator.create_calculator();
        let results = evaluator.create_results();
        evaluator.set_verbosity(&mut env, Verbosity::Muted);
        if let Some(message) = evaluator.take_error(&mut env) {
            evaluator.release_results(results);
            evaluator.release_calculator(calculator);
            evaluator.release_environment(env);
            return Err(BridgeError::Evaluator { message });
        }

        debug!(
            particles = particle_count,
            method = ?region.method(),
            periodic = region.uses_periodic_boundary_conditions(),
            "initialized quantum force bridge"
        );

        Ok(Self {
            evaluator,
            env: Some(env),
            calculator: Some(calculator),
            results: Some(results),
            molecule: MoleculeState::Unbuilt,
            method: region.method(),
            charge: region.charge(),
            multiplicity: region.multiplicity(),
            periodic: region.uses_periodic_boundary_conditions(),
            particle_indices: indices.to_vec(),
            atomic_numbers: numbers.to_vec(),
            position_buffer: vec![0.0; 3 * particle_count],
            gradient_buffer: vec![0.0; 3 * particle_count],
        })
    }

    /// The indices of the bridge's particles in the host's global particle
    /// array, in the order expected by [`Self::compute_force`].
    pub fn particle_indices(&self) -> &[usize] {
        &self.particle_indices
    }

    /// The number of particles the bridge evaluates.
    pub fn particle_count(&self) -> usize {
        self.particle_indices.len()
    }

    /// Runs one single-point evaluation at the given geometry.
    ///
    /// `positions` holds one entry per bridge particle, in
    /// [`Self::particle_indices`] order, in nanometers. `forces` must be
    /// sized identically and is overwritten with the quantum force
    /// contribution in (kJ/mol)/nm. The returned energy is in kJ/mol.
    ///
    /// The first successful call constructs the calculator-side molecule
    /// and loads the configured method; every later call updates the
    /// existing molecule in place, since topology never changes mid-run.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Evaluator`] as soon as the calculator reports
    /// a pending error; no energy or force is produced for that step.
    /// Returns a shape error if `positions`/`forces` do not match the
    /// region, or [`BridgeError::MissingCell`] if periodic boundary
    /// conditions are enabled and no cell is supplied.
    pub fn compute_force(
        &mut self,
        positions: &[Point3<f64>],
        cell: Option<&PeriodicCell>,
        forces: &mut [Vector3<f64>],
    ) -> Result<f64, BridgeError> {
        let expected = self.particle_indices.len();
        if positions.len() != expected {
            return Err(BridgeError::PositionCountMismatch {
                expected,
                actual: positions.len(),
            });
        }
        if forces.len() != expected {
            return Err(BridgeError::ForceCountMismatch {
                expected,
                actual: forces.len(),
            });
        }

        for (chunk, position) in self.position_buffer.chunks_exact_mut(3).zip(positions) {
            chunk[0] = BOHR_PER_NANOMETER * position.x;
            chunk[1] = BOHR_PER_NANOMETER * position.y;
            chunk[2] = BOHR_PER_NANOMETER * position.z;
        }
        let cell_rows = if self.periodic {
            Some(cell.ok_or(BridgeError::MissingCell)?.to_bohr_rows())
        } else {
            None
        };

        let Some(env) = self.env.as_mut() else {
            unreachable!("environment handle exists for the lifetime of the bridge");
        };
        let Some(calculator) = self.calculator.as_mut() else {
            unreachable!("calculator handle exists for the lifetime of the bridge");
        };
        let Some(results) = self.results.as_mut() else {
            unreachable!("results handle exists for the lifetime of the bridge");
        };

        match mem::replace(&mut self.molecule, MoleculeState::Unbuilt) {
            MoleculeState::Built(mut molecule) => {
                self.evaluator
                    .update_molecule(env, &mut molecule, &self.position_buffer, cell_rows.as_ref());
                self.molecule = MoleculeState::Built(molecule);
                checked(&mut self.evaluator, env, ())?;
            }
            MoleculeState::Unbuilt => {
                let seed = MoleculeSeed {
                    atomic_numbers: &self.atomic_numbers,
                    positions: &self.position_buffer,
                    charge: self.charge,
                    multiplicity: self.multiplicity,
                    cell: cell_rows,
                    periodic: [self.periodic; 3],
                };
                let molecule = self.evaluator.create_molecule(env, &seed);
                let mut molecule = checked_molecule(&mut self.evaluator, env, molecule)?;
                self.evaluator
                    .load_method(env, &mut molecule, calculator, self.method);
                let molecule = checked_molecule(&mut self.evaluator, env, molecule)?;
                self.molecule = MoleculeState::Built(molecule);
            }
        }

        let MoleculeState::Built(molecule) = &mut self.molecule else {
            unreachable!("molecule is built once the state machine has run");
        };
        self.evaluator.single_point(env, molecule, calculator, results);
        checked(&mut self.evaluator, env, ())?;

        let energy = self.evaluator.energy(env, results);
        let energy = checked(&mut self.evaluator, env, energy)?;
        self.evaluator.gradient(env, results, &mut self.gradient_buffer);
        checked(&mut self.evaluator, env, ())?;

        for (force, gradient) in forces.iter_mut().zip(self.gradient_buffer.chunks_exact(3)) {
            *force = Vector3::new(gradient[0], gradient[1], gradient[2])
                * -KILOJOULES_PER_MOLE_NANOMETER_PER_HARTREE_BOHR;
        }
        let energy = KILOJOULES_PER_MOLE_PER_HARTREE * energy;
        trace!(energy_kj_mol = energy, "single-point evaluation complete");
        Ok(energy)
    }
}

impl<E: Evaluator> Drop for QuantumForceBridge<E> {
    fn drop(&mut self) {
        if let Some(results) = self.results.take() {
            self.evaluator.release_results(results);
        }
        if let Some(calculator) = self.calculator.take() {
            self.evaluator.release_calculator(calculator);
        }
        if let MoleculeState::Built(molecule) =
            mem::replace(&mut self.molecule, MoleculeState::Unbuilt)
        {
            self.evaluator.release_molecule(molecule);
        }
        if let Some(env) = self.env.take() {
            self.evaluator.release_environment(env);
        }
    }
}

/// The single funnel for the calculator's side-channel error protocol:
/// every call into the calculator is followed by exactly one of these, so
/// a check can never be omitted at a call site.
fn checked<E: Evaluator, T>(
    evaluator: &mut E,
    env: &mut E::Environment,
    value: T,
) -> Result<T, BridgeError> {
    match evaluator.take_error(env) {
        Some(message) => Err(BridgeError::Evaluator { message }),
        None => Ok(value),
    }
}

/// Variant of [`checked`] for the construction path, where a freshly
/// created molecule handle must be released again if the calculator flags
/// an error before the bridge has taken ownership of it.
fn checked_molecule<E: Evaluator>(
    evaluator: &mut E,
    env: &mut E::Environment,
    molecule: E::Molecule,
) -> Result<E::Molecule, BridgeError> {
    match evaluator.take_error(env) {
        Some(message) => {
            evaluator.release_molecule(molecule);
            Err(BridgeError::Evaluator { message })
        }
        None => Ok(molecule),
    }
}
