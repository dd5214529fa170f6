use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(
        "Region lists {indices} particle indices but {numbers} atomic numbers; the two lists must correspond positionally"
    )]
    MismatchedRegion { indices: usize, numbers: usize },

    #[error("Quantum calculator reported an error: {message}")]
    Evaluator { message: String },

    #[error("Expected positions for {expected} particles, got {actual}")]
    PositionCountMismatch { expected: usize, actual: usize },

    #[error("Periodic boundary conditions are enabled but no cell was supplied")]
    MissingCell,

    #[error("Force buffer holds {actual} entries, expected {expected}")]
    ForceCountMismatch { expected: usize, actual: usize },
}
