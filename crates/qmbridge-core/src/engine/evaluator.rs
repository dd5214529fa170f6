use crate::core::models::method::Method;

/// Output volume of the external calculator.
///
/// The bridge always runs the calculator muted: the calculator must never
/// write directly to shared output streams, and all diagnostics are
/// surfaced through the error protocol instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// No output at all.
    Muted,
    /// Errors and warnings only.
    Minimal,
    /// Full computational output.
    Full,
}

/// Everything needed to construct a calculator-side molecule representation.
///
/// All quantities are in the calculator's native units: positions and cell
/// vectors in Bohr. Positions are flat `[x0, y0, z0, x1, ...]`, one triple
/// per atom, ordered like `atomic_numbers`.
#[derive(Debug, Clone, Copy)]
pub struct MoleculeSeed<'a> {
    pub atomic_numbers: &'a [u8],
    pub positions: &'a [f64],
    pub charge: f64,
    pub multiplicity: u32,
    /// Row-major cell vectors, present only under periodic boundary
    /// conditions.
    pub cell: Option<[[f64; 3]; 3]>,
    /// Per-axis periodicity flags. All three entries are always identical;
    /// mixed-periodicity cells are not supported.
    pub periodic: [bool; 3],
}

/// The boundary behind which the external quantum calculator lives.
///
/// The trait mirrors the calculator's native entry points: opaque handles
/// for the environment, calculator, results container, and molecule, each
/// created and released explicitly, plus the operations the bridge drives
/// per step. Implementations for a native calculator typically wrap raw
/// pointers in the associated handle types; test doubles use plain structs.
///
/// # Error protocol
///
/// The calculator signals failure exclusively through a pending-error flag
/// on its environment. [`Evaluator::take_error`] collapses the native
/// query-then-fetch pair into one call: it returns the pending
/// human-readable message (clearing the flag) or `None` if no error is
/// pending. There are no structured error codes, only the message; bounding
/// or truncating long messages is the implementation's concern. The bridge
/// invokes `take_error` after every other call on this trait, so
/// implementations must tolerate frequent polling.
///
/// # Units
///
/// Implementations work entirely in their native atomic units: lengths in
/// Bohr, energies in Hartree, gradients in Hartree/Bohr. The bridge owns
/// every conversion to and from the host's unit system.
pub trait Evaluator {
    type Environment;
    type Calculator;
    type Results;
    type Molecule;

    /// Creates the environment handle that carries the error state.
    fn create_environment(&mut self) -> Self::Environment;

    /// Creates the calculator handle that will hold the loaded method.
    fn create_calculator(&mut self) -> Self::Calculator;

    /// Creates an empty results container.
    fn create_results(&mut self) -> Self::Results;

    /// Sets the calculator's output volume.
    fn set_verbosity(&mut self, env: &mut Self::Environment, verbosity: Verbosity);

    /// Constructs a molecule from the seed.
    ///
    /// Topology (atom count, atomic numbers, charge, multiplicity) is fixed
    /// at construction; only positions and the cell may change afterwards,
    /// through [`Evaluator::update_molecule`].
    fn create_molecule(
        &mut self,
        env: &mut Self::Environment,
        seed: &MoleculeSeed<'_>,
    ) -> Self::Molecule;

    /// Replaces an existing molecule's positions (and cell, when periodic)
    /// in place.
    fn update_molecule(
        &mut self,
        env: &mut Self::Environment,
        molecule: &mut Self::Molecule,
        positions: &[f64],
        cell: Option<&[[f64; 3]; 3]>,
    );

    /// Loads one of the three supported parameterizations into the
    /// calculator handle for the given molecule.
    fn load_method(
        &mut self,
        env: &mut Self::Environment,
        molecule: &mut Self::Molecule,
        calculator: &mut Self::Calculator,
        method: Method,
    );

    /// Runs one energy/gradient evaluation at the molecule's current
    /// geometry, writing into the results container.
    fn single_point(
        &mut self,
        env: &mut Self::Environment,
        molecule: &mut Self::Molecule,
        calculator: &mut Self::Calculator,
        results: &mut Self::Results,
    );

    /// Retrieves the total energy, in Hartree, from the results container.
    fn energy(&mut self, env: &mut Self::Environment, results: &Self::Results) -> f64;

    /// Retrieves the per-atom gradient, in Hartree/Bohr, from the results
    /// container into `gradient` (flat, 3 entries per atom, molecule atom
    /// order).
    fn gradient(&mut self, env: &mut Self::Environment, results: &Self::Results, gradient: &mut [f64]);

    /// Returns the pending error message, clearing the pending-error flag,
    /// or `None` if the last calls succeeded.
    fn take_error(&mut self, env: &mut Self::Environment) -> Option<String>;

    /// Releases the environment handle.
    fn release_environment(&mut self, env: Self::Environment) {
        drop(env);
    }

    /// Releases the calculator handle.
    fn release_calculator(&mut self, calculator: Self::Calculator) {
        drop(calculator);
    }

    /// Releases the results container.
    fn release_results(&mut self, results: Self::Results) {
        drop(results);
    }

    /// Releases a molecule handle.
    fn release_molecule(&mut self, molecule: Self::Molecule) {
        drop(molecule);
    }
}
