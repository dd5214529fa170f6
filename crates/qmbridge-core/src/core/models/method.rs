use thiserror::Error;

/// The calculator parameterizations that can be used to compute forces and
/// energies.
///
/// The set is closed: exactly these three semi-empirical/tight-binding
/// levels are supported, and method dispatch inside the engine is an
/// exhaustive match. The integer codes are the stable values used by the
/// persisted region format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// The GFN1-xTB tight-binding Hamiltonian.
    Gfn1Xtb,
    /// The GFN2-xTB tight-binding Hamiltonian.
    Gfn2Xtb,
    /// The GFN-FF force field.
    GfnFf,
}

/// Error produced when decoding a method from its persisted integer code.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("unknown method code {0}; expected 0 (GFN1-xTB), 1 (GFN2-xTB) or 2 (GFN-FF)")]
pub struct UnknownMethodCode(pub i32);

impl Method {
    /// Returns the stable integer code used by the persisted region format.
    pub fn code(self) -> i32 {
        match self {
            Method::Gfn1Xtb => 0,
            Method::Gfn2Xtb => 1,
            Method::GfnFf => 2,
        }
    }
}

impl TryFrom<i32> for Method {
    type Error = UnknownMethodCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Method::Gfn1Xtb),
            1 => Ok(Method::Gfn2Xtb),
            2 => Ok(Method::GfnFf),
            other => Err(UnknownMethodCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_all_methods() {
        for method in [Method::Gfn1Xtb, Method::Gfn2Xtb, Method::GfnFf] {
            assert_eq!(Method::try_from(method.code()), Ok(method));
        }
    }

    #[test]
    fn codes_match_the_persisted_values() {
        assert_eq!(Method::Gfn1Xtb.code(), 0);
        assert_eq!(Method::Gfn2Xtb.code(), 1);
        assert_eq!(Method::GfnFf.code(), 2);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(Method::try_from(3), Err(UnknownMethodCode(3)));
        assert_eq!(Method::try_from(-1), Err(UnknownMethodCode(-1)));
    }
}
