use crate::core::constants::BOLTZMANN_KILOJOULES_PER_MOLE_KELVIN;
use nalgebra::{Point3, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;

/// A Langevin integrator using the kick / drift / thermostat / drift
/// splitting (the "middle" scheme).
///
/// Each step applies a full velocity kick from the current forces, a half
/// drift, an exact Ornstein-Uhlenbeck velocity update at the target
/// temperature, and a second half drift. Forces must be re-evaluated at the
/// new positions before the next step's kick.
///
/// With zero friction and zero temperature the scheme reduces to a
/// deterministic leapfrog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LangevinMiddle {
    /// Target temperature in Kelvin.
    pub temperature: f64,
    /// Friction (collision) rate in 1/ps.
    pub friction: f64,
    /// Step size in ps.
    pub step_size: f64,
}

impl LangevinMiddle {
    /// Advances positions and velocities by one step.
    ///
    /// `forces` holds the forces at the current positions in (kJ/mol)/nm;
    /// `masses` is in amu. All slices must share one length per particle.
    pub fn step<R: Rng>(
        &self,
        positions: &mut [Point3<f64>],
        velocities: &mut [Vector3<f64>],
        forces: &[Vector3<f64>],
        masses: &[f64],
        rng: &mut R,
    ) {
        let dt = self.step_size;
        let decay = (-self.friction * dt).exp();
        let noise = (1.0 - decay * decay).sqrt();
        let kt = BOLTZMANN_KILOJOULES_PER_MOLE_KELVIN * self.temperature;

        for (((position, velocity), force), &mass) in positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .zip(forces)
            .zip(masses)
        {
            *velocity += force * (dt / mass);
            *position += *velocity * (0.5 * dt);

            let sigma = (kt / mass).sqrt();
            let xi = Vector3::new(
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
            );
            *velocity = *velocity * decay + xi * (noise * sigma);

            *position += *velocity * (0.5 * dt);
        }
    }
}

/// Total kinetic energy in kJ/mol.
pub fn kinetic_energy(velocities: &[Vector3<f64>], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.norm_squared())
        .sum()
}

/// Instantaneous temperature in Kelvin from equipartition over 3N degrees
/// of freedom.
pub fn instantaneous_temperature(velocities: &[Vector3<f64>], masses: &[f64]) -> f64 {
    let dof = 3.0 * velocities.len() as f64;
    if dof == 0.0 {
        return 0.0;
    }
    2.0 * kinetic_energy(velocities, masses) / (dof * BOLTZMANN_KILOJOULES_PER_MOLE_KELVIN)
}
