//! A pure-Rust reference calculator with harmonic bond and angle terms.
//!
//! This backend implements the full [`Evaluator`] contract, including the
//! handle lifecycle and the pending-error protocol, entirely in the
//! calculator's native atomic units (Bohr, Hartree). Its gradients are
//! analytic, which makes it the in-tree backend for integration tests that
//! need force/energy consistency without a native quantum calculator.
//!
//! The three method parameterizations are accepted interchangeably: the
//! harmonic terms are fixed at construction and do not depend on the
//! selected method.

use super::evaluator::{Evaluator, MoleculeSeed, Verbosity};
use crate::core::models::method::Method;
use nalgebra::Vector3;

/// A harmonic stretch between atoms `i` and `j`.
///
/// `length` is the equilibrium separation in Bohr; `stiffness` is in
/// Hartree/Bohr².
#[derive(Debug, Clone, Copy)]
pub struct BondTerm {
    pub i: usize,
    pub j: usize,
    pub length: f64,
    pub stiffness: f64,
}

/// A harmonic bend of the angle i–j–k, with `j` at the apex.
///
/// `angle` is the equilibrium angle in radians; `stiffness` is in
/// Hartree/rad².
#[derive(Debug, Clone, Copy)]
pub struct AngleTerm {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub angle: f64,
    pub stiffness: f64,
}

/// Reference calculator over a fixed set of harmonic terms.
pub struct HarmonicEvaluator {
    bonds: Vec<BondTerm>,
    angles: Vec<AngleTerm>,
}

pub struct HarmonicEnvironment {
    error: Option<String>,
}

pub struct HarmonicCalculator {
    loaded: Option<Method>,
}

pub struct HarmonicMolecule {
    positions: Vec<f64>,
}

#[derive(Default)]
pub struct HarmonicResults {
    energy: f64,
    gradient: Vec<f64>,
}

impl HarmonicEvaluator {
    /// Creates a calculator over explicit bond and angle terms.
    pub fn new(bonds: Vec<BondTerm>, angles: Vec<AngleTerm>) -> Self {
        Self { bonds, angles }
    }

    /// A bent triatomic parameterized like a water molecule: two equal
    /// stretches from atom 0 and one bend with atom 0 at the apex. Atom
    /// order is expected as central atom first (O, H, H).
    pub fn water() -> Self {
        let stretch = 0.5;
        let length = 1.8088;
        let bend = 0.3;
        let angle = 1.8242;
        Self::new(
            vec![
                BondTerm {
                    i: 0,
                    j: 1,
                    length,
                    stiffness: stretch,
                },
                BondTerm {
                    i: 0,
                    j: 2,
                    length,
                    stiffness: stretch,
                },
            ],
            vec![AngleTerm {
                i: 1,
                j: 0,
                k: 2,
                angle,
                stiffness: bend,
            }],
        )
    }

    fn max_atom_index(&self) -> Option<usize> {
        let bonds = self.bonds.iter().flat_map(|b| [b.i, b.j]);
        let angles = self.angles.iter().flat_map(|a| [a.i, a.j, a.k]);
        bonds.chain(angles).max()
    }

    fn evaluate(&self, positions: &[f64], gradient: &mut [f64]) -> f64 {
        gradient.fill(0.0);
        let mut energy = 0.0;
        for bond in &self.bonds {
            energy += accumulate_bond(positions, gradient, bond);
        }
        for angle in &self.angles {
            energy += accumulate_angle(positions, gradient, angle);
        }
        energy
    }
}

fn atom(positions: &[f64], index: usize) -> Vector3<f64> {
    Vector3::new(
        positions[3 * index],
        positions[3 * index + 1],
        positions[3 * index + 2],
    )
}

fn add_to_atom(gradient: &mut [f64], index: usize, contribution: Vector3<f64>) {
    gradient[3 * index] += contribution.x;
    gradient[3 * index + 1] += contribution.y;
    gradient[3 * index + 2] += contribution.z;
}

fn accumulate_bond(positions: &[f64], gradient: &mut [f64], bond: &BondTerm) -> f64 {
    let separation = atom(positions, bond.i) - atom(positions, bond.j);
    let distance = separation.norm();
    if distance < 1e-10 {
        return 0.0;
    }
    let stretch = distance - bond.length;
    let direction = separation / distance;
    add_to_atom(gradient, bond.i, bond.stiffness * stretch * direction);
    add_to_atom(gradient, bond.j, -bond.stiffness * stretch * direction);
    0.5 * bond.stiffness * stretch * stretch
}

fn accumulate_angle(positions: &[f64], gradient: &mut [f64], term: &AngleTerm) -> f64 {
    let u = atom(positions, term.i) - atom(positions, term.j);
    let v = atom(positions, term.k) - atom(positions, term.j);
    let n = u.norm();
    let m = v.norm();
    if n < 1e-10 || m < 1e-10 {
        return 0.0;
    }
    let cosine = (u.dot(&v) / (n * m)).clamp(-1.0, 1.0);
    let sine = (1.0 - cosine * cosine).sqrt();
    if sine < 1e-8 {
        // Collinear: the bend direction is undefined, the energy still is not.
        let bend = cosine.acos() - term.angle;
        return 0.5 * term.stiffness * bend * bend;
    }
    let theta = cosine.acos();
    let bend = theta - term.angle;

    let dtheta_di = (cosine * u / (n * n) - v / (n * m)) / sine;
    let dtheta_dk = (cosine * v / (m * m) - u / (n * m)) / sine;
    let dtheta_dj = -(dtheta_di + dtheta_dk);

    let scale = term.stiffness * bend;
    add_to_atom(gradient, term.i, scale * dtheta_di);
    add_to_atom(gradient, term.j, scale * dtheta_dj);
    add_to_atom(gradient, term.k, scale * dtheta_dk);
    0.5 * term.stiffness * bend * bend
}

impl Evaluator for HarmonicEvaluator {
    type Environment = HarmonicEnvironment;
    type Calculator = HarmonicCalculator;
    type Results = HarmonicResults;
    type Molecule = HarmonicMolecule;

    fn create_environment(&mut self) -> HarmonicEnvironment {
        HarmonicEnvironment { error: None }
    }

    fn create_calculator(&mut self) -> HarmonicCalculator {
        HarmonicCalculator { loaded: None }
    }

    fn create_results(&mut self) -> HarmonicResults {
        HarmonicResults::default()
    }

    fn set_verbosity(&mut self, _env: &mut HarmonicEnvironment, _verbosity: Verbosity) {}

    fn create_molecule(
        &mut self,
        env: &mut HarmonicEnvironment,
        seed: &MoleculeSeed<'_>,
    ) -> HarmonicMolecule {
        if seed.positions.len() != 3 * seed.atomic_numbers.len() {
            env.error = Some(format!(
                "molecule seed holds {} coordinates for {} atoms",
                seed.positions.len(),
                seed.atomic_numbers.len()
            ));
        } else if let Some(max) = self.max_atom_index() {
            if max >= seed.atomic_numbers.len() {
                env.error = Some(format!(
                    "harmonic term references atom {max} but the molecule has {} atoms",
                    seed.atomic_numbers.len()
                ));
            }
        }
        HarmonicMolecule {
            positions: seed.positions.to_vec(),
        }
    }

    fn update_molecule(
        &mut self,
        _env: &mut HarmonicEnvironment,
        molecule: &mut HarmonicMolecule,
        positions: &[f64],
        _cell: Option<&[[f64; 3]; 3]>,
    ) {
        // Harmonic terms are minimum-image-free; the cell is accepted and
        // ignored.
        molecule.positions.clear();
        molecule.positions.extend_from_slice(positions);
    }

    fn load_method(
        &mut self,
        _env: &mut HarmonicEnvironment,
        _molecule: &mut HarmonicMolecule,
        calculator: &mut HarmonicCalculator,
        method: Method,
    ) {
        calculator.loaded = Some(method);
    }

    fn single_point(
        &mut self,
        env: &mut HarmonicEnvironment,
        molecule: &mut HarmonicMolecule,
        calculator: &mut HarmonicCalculator,
        results: &mut HarmonicResults,
    ) {
        if calculator.loaded.is_none() {
            env.error = Some("single-point requested before a method was loaded".to_string());
            return;
        }
        results.gradient.resize(molecule.positions.len(), 0.0);
        results.energy = self.evaluate(&molecule.positions, &mut results.gradient);
    }

    fn energy(&mut self, _env: &mut HarmonicEnvironment, results: &HarmonicResults) -> f64 {
        results.energy
    }

    fn gradient(
        &mut self,
        _env: &mut HarmonicEnvironment,
        results: &HarmonicResults,
        gradient: &mut [f64],
    ) {
        gradient.copy_from_slice(&results.gradient);
    }

    fn take_error(&mut self, env: &mut HarmonicEnvironment) -> Option<String> {
        env.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::region::QuantumRegion;
    use crate::engine::bridge::QuantumForceBridge;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn finite_difference_gradient(
        evaluator: &HarmonicEvaluator,
        positions: &[f64],
        step: f64,
    ) -> Vec<f64> {
        let mut numeric = vec![0.0; positions.len()];
        let mut scratch = vec![0.0; positions.len()];
        for component in 0..positions.len() {
            let mut forward = positions.to_vec();
            forward[component] += step;
            let mut backward = positions.to_vec();
            backward[component] -= step;
            let high = evaluator.evaluate(&forward, &mut scratch);
            let low = evaluator.evaluate(&backward, &mut scratch);
            numeric[component] = (high - low) / (2.0 * step);
        }
        numeric
    }

    #[test]
    fn stretched_bond_has_quadratic_energy_and_linear_gradient() {
        let evaluator = HarmonicEvaluator::new(
            vec![BondTerm {
                i: 0,
                j: 1,
                length: 2.0,
                stiffness: 0.8,
            }],
            vec![],
        );
        let positions = [0.0, 0.0, 0.0, 2.5, 0.0, 0.0];
        let mut gradient = vec![0.0; 6];
        let energy = evaluator.evaluate(&positions, &mut gradient);

        assert_relative_eq!(energy, 0.5 * 0.8 * 0.25, max_relative = 1e-12);
        assert_relative_eq!(gradient[0], -0.8 * 0.5, max_relative = 1e-12);
        assert_relative_eq!(gradient[3], 0.8 * 0.5, max_relative = 1e-12);
        assert_eq!(gradient[1], 0.0);
        assert_eq!(gradient[4], 0.0);
    }

    #[test]
    fn equilibrium_geometry_has_zero_energy_and_gradient() {
        let evaluator = HarmonicEvaluator::water();
        // Exactly at the preset's equilibrium: both bonds 1.8088 Bohr,
        // angle 1.8242 rad.
        let half: f64 = 1.8242 / 2.0;
        let (s, c) = (half.sin(), half.cos());
        let positions = [
            0.0,
            0.0,
            0.0,
            1.8088 * s,
            1.8088 * c,
            0.0,
            -1.8088 * s,
            1.8088 * c,
            0.0,
        ];
        let mut gradient = vec![0.0; 9];
        let energy = evaluator.evaluate(&positions, &mut gradient);

        assert!(energy.abs() < 1e-18);
        for component in gradient {
            assert!(component.abs() < 1e-12);
        }
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        let evaluator = HarmonicEvaluator::water();
        // A deliberately distorted geometry.
        let positions = [0.1, -0.2, 0.05, 1.9, 0.4, -0.1, -1.5, 1.1, 0.3];
        let mut analytic = vec![0.0; 9];
        evaluator.evaluate(&positions, &mut analytic);
        let numeric = finite_difference_gradient(&evaluator, &positions, 1e-6);

        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(*a, *n, max_relative = 1e-5, epsilon = 1e-10);
        }
    }

    #[test]
    fn single_point_before_method_load_flags_an_error() {
        let mut evaluator = HarmonicEvaluator::water();
        let mut env = evaluator.create_environment();
        let mut calculator = evaluator.create_calculator();
        let mut results = evaluator.create_results();
        let seed_numbers = [8u8, 1, 1];
        let seed = MoleculeSeed {
            atomic_numbers: &seed_numbers,
            positions: &[0.0; 9],
            charge: 0.0,
            multiplicity: 1,
            cell: None,
            periodic: [false; 3],
        };
        let mut molecule = evaluator.create_molecule(&mut env, &seed);
        assert!(evaluator.take_error(&mut env).is_none());

        evaluator.single_point(&mut env, &mut molecule, &mut calculator, &mut results);
        let message = evaluator.take_error(&mut env).expect("error pending");
        assert!(message.contains("before a method was loaded"));
    }

    #[test]
    fn undersized_molecule_flags_an_error_at_construction() {
        let mut evaluator = HarmonicEvaluator::water();
        let mut env = evaluator.create_environment();
        let seed_numbers = [8u8, 1];
        let seed = MoleculeSeed {
            atomic_numbers: &seed_numbers,
            positions: &[0.0; 6],
            charge: 0.0,
            multiplicity: 1,
            cell: None,
            periodic: [false; 3],
        };
        let _molecule = evaluator.create_molecule(&mut env, &seed);
        let message = evaluator.take_error(&mut env).expect("error pending");
        assert!(message.contains("references atom 2"));
    }

    #[test]
    fn force_through_the_bridge_is_the_gradient_of_the_energy() {
        use nalgebra::Vector3;

        let region = QuantumRegion::new(
            Method::Gfn2Xtb,
            0.0,
            1,
            false,
            vec![0, 1, 2],
            vec![8, 1, 1],
        );
        let mut bridge =
            QuantumForceBridge::initialize(HarmonicEvaluator::water(), &region).unwrap();

        let positions = vec![
            Point3::new(0.1593, 0.7872, 0.5138),
            Point3::new(0.1917, 0.7084, 0.4703),
            Point3::new(0.2379, 0.8298, 0.5481),
        ];
        let mut forces = vec![Vector3::zeros(); 3];
        bridge.compute_force(&positions, None, &mut forces).unwrap();

        let norm: f64 = forces.iter().map(|f| f.norm_squared()).sum::<f64>().sqrt();
        assert!(norm > 0.0);

        // Displace along the force direction and compare the numeric
        // directional derivative of the energy against the force norm.
        let step_size = 1e-4;
        let step = 0.5 * step_size / norm;
        let backward: Vec<_> = positions
            .iter()
            .zip(&forces)
            .map(|(p, f)| p - f * step)
            .collect();
        let forward: Vec<_> = positions
            .iter()
            .zip(&forces)
            .map(|(p, f)| p + f * step)
            .collect();

        let mut scratch = vec![Vector3::zeros(); 3];
        let low = bridge.compute_force(&backward, None, &mut scratch).unwrap();
        let high = bridge.compute_force(&forward, None, &mut scratch).unwrap();

        assert_relative_eq!(norm, (low - high) / step_size, max_relative = 5e-3);
    }
}
