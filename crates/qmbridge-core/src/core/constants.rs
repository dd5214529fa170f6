//! Fixed conversion factors between the host unit system and the unit system
//! of the external quantum calculator.
//!
//! The host side works in nanometers, picoseconds, atomic mass units, and
//! kJ/mol (so accelerations come out in nm/ps² without hidden factors). The
//! calculator side works in Hartree atomic units. All conversions in this
//! library are single multiplications by the constants below.

/// Number of Bohr radii per nanometer. Converts host lengths to calculator
/// lengths.
pub const BOHR_PER_NANOMETER: f64 = 18.897261246257703;

/// kJ/mol per Hartree. Converts calculator energies to host energies.
pub const KILOJOULES_PER_MOLE_PER_HARTREE: f64 = 2625.4996394798254;

/// (kJ/mol)/nm per Hartree/Bohr. Converts calculator gradients to host
/// force magnitudes; equal to the product of the two factors above.
pub const KILOJOULES_PER_MOLE_NANOMETER_PER_HARTREE_BOHR: f64 = 49614.75258920568;

/// The molar Boltzmann constant in kJ/(mol·K).
pub const BOLTZMANN_KILOJOULES_PER_MOLE_KELVIN: f64 = 8.31446261815324e-3;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gradient_factor_is_product_of_energy_and_length_factors() {
        assert_relative_eq!(
            KILOJOULES_PER_MOLE_NANOMETER_PER_HARTREE_BOHR,
            KILOJOULES_PER_MOLE_PER_HARTREE * BOHR_PER_NANOMETER,
            max_relative = 1e-12
        );
    }

    #[test]
    fn length_factor_is_inverse_of_bohr_radius_in_nanometers() {
        let bohr_radius_nm = 0.052917721090380;
        assert_relative_eq!(
            BOHR_PER_NANOMETER,
            1.0 / bohr_radius_nm,
            max_relative = 1e-10
        );
    }
}
