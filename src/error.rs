use thiserror::Error;

/// Errors raised while solving a multilayer stack.
///
/// Every numerically degenerate condition surfaces as a distinct variant at
/// the point of detection. No code path converts a failure into NaN or
/// infinity and carries on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StackError {
    #[error("{medium} medium must be real, diagonal and isotropic")]
    InvalidMedium { medium: &'static str },

    #[error("wavelength must be positive, got {wavelength}")]
    InvalidWavelength { wavelength: f64 },

    #[error("stack needs at least an incident medium and a substrate")]
    StackTooShort,

    #[error("{tensors} dielectric tensors but {thicknesses} thicknesses")]
    LengthMismatch { tensors: usize, thicknesses: usize },

    #[error("dielectric tensor has a zero zz component")]
    DegenerateTensor,

    #[error("eigenvalue iteration failed for the companion matrix")]
    EigenvalueFailure,

    #[error("singular value decomposition did not converge")]
    SvdFailure,

    #[error("empty nullspace basis for mode {mode} at tolerance {atol:e}")]
    EmptyNullspace { mode: usize, atol: f64 },

    #[error("zero eigenvector component in mode {mode}")]
    DegenerateMode { mode: usize },

    #[error("singular matrix while {context}")]
    SingularMatrix { context: &'static str },

    #[error("refracted direction is evanescent in the substrate (sin = {sin_theta_s})")]
    TotalInternalReflection { sin_theta_s: f64 },
}
