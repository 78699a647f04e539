//! Off-plane wavevectors from the characteristic equation.
//!
//! For a fixed in-plane wavevector, the modes a medium supports are the
//! roots of a quartic polynomial in the off-plane component kz. An isotropic
//! layer factorises into two degenerate pairs with a closed-form root; a
//! general tensor needs the full quartic, which is solved through the
//! eigenvalues of its companion matrix rather than a closed-form quartic
//! formula.
//!
//! The four roots are returned sorted by ascending imaginary part. This
//! ordering is the mode convention consumed by the eigenvector solver and
//! the boundary matrix builder: modes {0,1} and {2,3} form the two
//! propagation-direction pairs.

use nalgebra::{Complex, Matrix4, Vector4};

use crate::error::StackError;
use crate::tensor::{self, DielectricTensor, MaterialClass};


/// Computes the four kz roots of the characteristic equation for a layer.
///
/// `k0` is the vacuum wavevector, `kx` and `ky` the in-plane components
/// fixed by the incident wave. The result is sorted by ascending imaginary
/// part.
pub fn kz_eigenvalues(
    k0: f64,
    kx: f64,
    ky: f64,
    eps: &DielectricTensor,
) -> Result<Vector4<Complex<f64>>, StackError> {
    let v_kz = match tensor::classify(eps) {
        MaterialClass::Isotropic => {
            let kz = (Complex::from(k0 * k0) * eps[(0, 0)] - Complex::from(kx * kx + ky * ky))
                .sqrt();
            Vector4::new(-kz, -kz, kz, kz)
        }
        MaterialClass::Anisotropic => general_roots(k0, kx, ky, eps)?,
    };

    Ok(sort_by_imag(v_kz))
}

/// Solves the monic quartic in kz/k0 through its companion matrix.
fn general_roots(
    k0: f64,
    kx: f64,
    ky: f64,
    eps: &DielectricTensor,
) -> Result<Vector4<Complex<f64>>, StackError> {
    let e = |i: usize, j: usize| eps[(i, j)];
    let e22 = e(2, 2);
    if e22.norm() == 0.0 {
        return Err(StackError::DegenerateTensor);
    }

    let qx = kx / k0;
    let qy = ky / k0;
    let qt2 = qx * qx + qy * qy;

    let a = (e(0, 2) + e(2, 0)) / e22 * qx + (e(1, 2) + e(2, 1)) / e22 * qy;

    let b = (e(0, 0) / e22 + 1.0) * (qx * qx)
        + (e(1, 1) / e22 + 1.0) * (qy * qy)
        + (e(0, 1) + e(1, 0)) / e22 * (qx * qy)
        + ((e(0, 2) * e(2, 0) + e(1, 2) * e(2, 1)) / e22 - e(0, 0) - e(1, 1));

    let c1 = ((e(0, 2) + e(2, 0)) / e22 * qx + (e(1, 2) + e(2, 1)) / e22 * qy) * qt2
        + ((e(0, 1) * e(1, 2) + e(1, 0) * e(2, 1)) / e22
            - e(1, 1) / e22 * (e(0, 2) + e(2, 0)))
            * qx
        + ((e(0, 1) * e(2, 0) + e(1, 0) * e(0, 2)) / e22
            - e(0, 0) / e22 * (e(1, 2) + e(2, 1)))
            * qy;

    let d1 = (e(0, 0) / e22 * (qx * qx)
        + e(1, 1) / e22 * (qy * qy)
        + (e(0, 1) + e(1, 0)) / e22 * (qx * qy)
        - e(0, 0) * e(1, 1) / e22)
        * qt2;
    let d2 = ((e(0, 1) * e(1, 0) + e(0, 2) * e(2, 0)) / e22 - e(0, 0)) * (qx * qx);
    let d3 = ((e(0, 1) * e(1, 0) + e(1, 2) * e(2, 1)) / e22 - e(1, 1)) * (qy * qy);
    let d4 = ((e(0, 2) * e(2, 1) + e(2, 0) * e(1, 2)) / e22 - e(0, 1) - e(1, 0)) * (qx * qy);
    let d5 = e(0, 0) * e(1, 1) + (e(0, 1) * e(1, 2) * e(2, 0) + e(1, 0) * e(2, 1) * e(0, 2)) / e22
        - e(0, 1) * e(1, 0)
        - e(0, 0) / e22 * e(1, 2) * e(2, 1)
        - e(1, 1) / e22 * e(0, 2) * e(2, 0);
    let d = d1 + d2 + d3 + d4 + d5;

    // Companion matrix of the monic quartic: unit subdiagonal, negated
    // coefficients in the last column.
    let mut comp = Matrix4::<Complex<f64>>::zeros();
    comp[(1, 0)] = Complex::ONE;
    comp[(2, 1)] = Complex::ONE;
    comp[(3, 2)] = Complex::ONE;
    comp[(0, 3)] = -d;
    comp[(1, 3)] = -c1;
    comp[(2, 3)] = -b;
    comp[(3, 3)] = -a;

    let roots = comp.eigenvalues().ok_or(StackError::EigenvalueFailure)?;
    Ok(roots * Complex::from(k0))
}

fn sort_by_imag(v: Vector4<Complex<f64>>) -> Vector4<Complex<f64>> {
    let mut kz = [v[0], v[1], v[2], v[3]];
    kz.sort_by(|a, b| a.im.total_cmp(&b.im));
    Vector4::new(kz[0], kz[1], kz[2], kz[3])
}
