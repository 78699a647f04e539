//! Approximate nullspace of a complex matrix.
//!
//! The field eigenvector of a propagation mode solves the homogeneous wave
//! equation, so it spans the nullspace of the mode's characteristic matrix.
//! Floating point arithmetic never produces an exactly singular matrix, so
//! the nullspace is taken as the span of the right-singular vectors whose
//! singular value falls below an absolute tolerance.
//!
//! The solver provides:
//! - A basis of unit vectors, one per singular value at or below tolerance
//! - A legitimately empty basis when the matrix has full numerical rank
//! - A strictly absolute threshold, with no relative-tolerance blending
//!
//! The tolerance is a parameter rather than a constant because a fixed
//! absolute cut can misclassify near-threshold singular values for materials
//! at unusual permittivity scales.

use nalgebra::{Complex, Matrix3, Vector3};

use crate::error::StackError;


/// Computes an approximate nullspace basis of `m` via singular value
/// decomposition.
///
/// Returns the right-singular vectors whose singular value is at most
/// `atol`, as columns of unit norm. The basis may be empty; callers that
/// need exactly one eigenvector treat an empty basis as a degeneracy
/// failure.
pub fn nullspace(
    m: &Matrix3<Complex<f64>>,
    atol: f64,
) -> Result<Vec<Vector3<Complex<f64>>>, StackError> {
    let svd = m
        .try_svd(false, true, f64::EPSILON, 0)
        .ok_or(StackError::SvdFailure)?;
    let Some(v_t) = svd.v_t else {
        return Err(StackError::SvdFailure);
    };

    let mut basis = Vec::new();
    for i in 0..3 {
        if svd.singular_values[i] <= atol {
            basis.push(v_t.row(i).adjoint());
        }
    }
    Ok(basis)
}
