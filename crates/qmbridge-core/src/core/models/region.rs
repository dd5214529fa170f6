use super::method::Method;

/// Describes the subset of a simulation's particles whose interactions are
/// evaluated quantum-mechanically, and how the calculator is parameterized
/// for them.
///
/// This is a plain value object: it stores what it is given and performs no
/// validation. In particular, the invariant that `particle_indices` and
/// `atomic_numbers` have equal lengths is checked at bridge initialization,
/// which is the first point where the two lists are consumed together.
///
/// The bridge reads a region exactly once, when it is initialized; mutating
/// a region afterwards has no effect on an already-initialized bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumRegion {
    method: Method,
    charge: f64,
    multiplicity: u32,
    periodic: bool,
    particle_indices: Vec<usize>,
    atomic_numbers: Vec<u8>,
}

impl QuantumRegion {
    /// Creates a region descriptor.
    ///
    /// # Arguments
    ///
    /// * `method` - The calculator parameterization to use.
    /// * `charge` - The net charge of the region in elementary charges.
    /// * `multiplicity` - The spin multiplicity, 2S+1.
    /// * `periodic` - Whether periodic boundary conditions apply (all three
    ///   axes; mixed-periodicity cells are not supported).
    /// * `particle_indices` - Indices into the host's global particle array,
    ///   in the order used for all per-particle data exchanged with the
    ///   bridge.
    /// * `atomic_numbers` - Atomic numbers, positionally corresponding to
    ///   `particle_indices` (element *i* describes the particle named by
    ///   element *i* of the index list).
    pub fn new(
        method: Method,
        charge: f64,
        multiplicity: u32,
        periodic: bool,
        particle_indices: Vec<usize>,
        atomic_numbers: Vec<u8>,
    ) -> Self {
        Self {
            method,
            charge,
            multiplicity,
            periodic,
            particle_indices,
            atomic_numbers,
        }
    }

    /// The calculator parameterization to use.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Sets the calculator parameterization.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// The net charge of the region in elementary charges.
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Sets the net charge of the region.
    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    /// The spin multiplicity, 2S+1.
    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Sets the spin multiplicity.
    pub fn set_multiplicity(&mut self, multiplicity: u32) {
        self.multiplicity = multiplicity;
    }

    /// Whether periodic boundary conditions are in effect.
    pub fn uses_periodic_boundary_conditions(&self) -> bool {
        self.periodic
    }

    /// Sets whether periodic boundary conditions are in effect.
    pub fn set_uses_periodic_boundary_conditions(&mut self, periodic: bool) {
        self.periodic = periodic;
    }

    /// The indices of the participating particles in the host's global
    /// particle array.
    pub fn particle_indices(&self) -> &[usize] {
        &self.particle_indices
    }

    /// Replaces the particle-index list.
    pub fn set_particle_indices(&mut self, indices: Vec<usize>) {
        self.particle_indices = indices;
    }

    /// The atomic numbers of the participating particles, positionally
    /// corresponding to [`Self::particle_indices`].
    pub fn atomic_numbers(&self) -> &[u8] {
        &self.atomic_numbers
    }

    /// Replaces the atomic-number list.
    pub fn set_atomic_numbers(&mut self, numbers: Vec<u8>) {
        self.atomic_numbers = numbers;
    }
}
