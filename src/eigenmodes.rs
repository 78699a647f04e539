//! Field eigenvectors of the four propagation modes.
//!
//! Each kz root of the characteristic equation carries an electric field
//! eigenvector solving the homogeneous wave equation. Isotropic layers have
//! closed-form eigenvectors; a general tensor requires the nullspace of the
//! mode's characteristic matrix. After extraction the modes are reordered so
//! that modes 0 and 2 keep a nonzero x component, which the boundary matrix
//! builder divides by.

use nalgebra::{Complex, Matrix3, Vector3, Vector4};

use crate::config;
use crate::error::StackError;
use crate::nullspace::nullspace;
use crate::tensor::{self, DielectricTensor, MaterialClass};

#[cfg(test)]
mod tests {

    use super::*;
    use crate::dispersion::kz_eigenvalues;
    use std::f64::consts::PI;

    #[test]
    fn isotropic_modes_are_transverse() {
        let k0 = 2.0 * PI / 500.0;
        let theta0: f64 = 0.4;
        let kx = -k0 * theta0.sin();
        let eps = tensor::isotropic(Complex::new(2.25, 0.0));

        let v_kz = kz_eigenvalues(k0, kx, 0.0, &eps).unwrap();
        let modes = kz_eigenvectors(k0, kx, 0.0, v_kz, &eps, config::NULLSPACE_ATOL).unwrap();

        for m in 0..4 {
            let k = Vector3::new(Complex::from(kx), Complex::ZERO, modes.kz[m]);
            let dot = k.dot(&modes.e[m]);
            assert!(dot.norm() < 1e-12 * k0, "mode {} not transverse", m);
        }
    }

    #[test]
    fn all_modes_have_unit_norm() {
        let k0 = 2.0 * PI / 500.0;
        let kx = -0.3 * k0;
        let ky = -0.2 * k0;
        let eps = tensor::rotated(
            &tensor::principal(
                Complex::new(2.1, 0.05),
                Complex::new(2.1, 0.05),
                Complex::new(2.6, 0.08),
            ),
            0.6,
            0.4,
            0.0,
        );

        let v_kz = kz_eigenvalues(k0, kx, ky, &eps).unwrap();
        let modes = kz_eigenvectors(k0, kx, ky, v_kz, &eps, config::NULLSPACE_ATOL).unwrap();
        for m in 0..4 {
            assert!((modes.e[m].norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn general_modes_solve_the_wave_equation() {
        let k0 = 2.0 * PI / 632.8;
        let kx = -0.35 * k0;
        let ky = -0.15 * k0;
        let eps = tensor::rotated(
            &tensor::principal(
                Complex::new(2.25, 0.02),
                Complex::new(2.25, 0.02),
                Complex::new(2.89, 0.02),
            ),
            0.9,
            0.5,
            0.3,
        );

        let v_kz = kz_eigenvalues(k0, kx, ky, &eps).unwrap();
        let modes = kz_eigenvectors(k0, kx, ky, v_kz, &eps, config::NULLSPACE_ATOL).unwrap();
        for m in 0..4 {
            let m_char = characteristic_matrix(k0, kx, ky, modes.kz[m], &eps);
            let residual = (m_char * modes.e[m]).norm();
            assert!(residual <= 1e-8 * m_char.norm(), "mode {} residual {}", m, residual);
        }
    }

    #[test]
    fn repaired_modes_keep_nonzero_x() {
        let k0 = 2.0 * PI / 500.0;
        let kx = -0.25 * k0;
        let eps = tensor::rotated(
            &tensor::principal(
                Complex::new(2.0, 0.03),
                Complex::new(2.0, 0.03),
                Complex::new(3.0, 0.05),
            ),
            0.0,
            0.7,
            0.0,
        );

        let v_kz = kz_eigenvalues(k0, kx, 0.0, &eps).unwrap();
        let modes = kz_eigenvectors(k0, kx, 0.0, v_kz, &eps, config::NULLSPACE_ATOL).unwrap();
        assert!(modes.e[0][0].norm() > config::MODE_SWAP_THRESHOLD);
        assert!(modes.e[2][0].norm() > config::MODE_SWAP_THRESHOLD);
    }

    #[test]
    fn normal_incidence_modes_are_finite() {
        let k0 = 2.0 * PI / 500.0;
        let eps = tensor::isotropic(Complex::new(2.25, 0.0));
        let v_kz = kz_eigenvalues(k0, 0.0, 0.0, &eps).unwrap();
        let modes = kz_eigenvectors(k0, 0.0, 0.0, v_kz, &eps, config::NULLSPACE_ATOL).unwrap();
        for m in 0..4 {
            assert!((modes.e[m].norm() - 1.0).abs() < 1e-12);
        }
        // The transverse pair points along y so its amplitude ratios stay
        // finite in the boundary matrices.
        assert!(modes.e[1][1].norm() > 0.5);
        assert!(modes.e[3][1].norm() > 0.5);
    }
}

/// The four kz roots of one layer together with their field eigenvectors,
/// both ordered by the ascending-imaginary-part mode convention.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenmodeSet {
    pub kz: Vector4<Complex<f64>>,
    pub e: [Vector3<Complex<f64>>; 4],
}

/// Computes the field eigenvectors for the four kz roots of a layer.
///
/// The kz vector is returned inside the set because the polarisation repair
/// may swap a root pair along with its eigenvectors. Every returned
/// eigenvector has unit norm.
pub fn kz_eigenvectors(
    k0: f64,
    kx: f64,
    ky: f64,
    v_kz: Vector4<Complex<f64>>,
    eps: &DielectricTensor,
    atol: f64,
) -> Result<EigenmodeSet, StackError> {
    let mut kz = v_kz;
    let mut e = match tensor::classify(eps) {
        MaterialClass::Isotropic => isotropic_eigenvectors(k0, kx, ky, &kz),
        MaterialClass::Anisotropic => {
            let mut e = [Vector3::zeros(); 4];
            for m in 0..4 {
                let m_char = characteristic_matrix(k0, kx, ky, kz[m], eps);
                let basis = nullspace(&m_char, atol)?;
                e[m] = *basis
                    .first()
                    .ok_or(StackError::EmptyNullspace { mode: m, atol })?;
            }

            // Reorder so that modes 0 and 2 carry the nonzero x component
            // their amplitude ratios divide by. The two pairs are tested
            // independently.
            if e[0][0].norm() <= config::MODE_SWAP_THRESHOLD * e[0].norm() {
                e.swap(0, 1);
                kz.swap_rows(0, 1);
            }
            if e[2][0].norm() <= config::MODE_SWAP_THRESHOLD * e[2].norm() {
                e.swap(2, 3);
                kz.swap_rows(2, 3);
            }
            e
        }
    };

    for (m, v) in e.iter_mut().enumerate() {
        let norm = v.norm();
        if norm == 0.0 {
            return Err(StackError::DegenerateMode { mode: m });
        }
        *v = v.unscale(norm);
    }

    Ok(EigenmodeSet { kz, e })
}

/// Closed-form eigenvectors of an isotropic layer.
///
/// At normal incidence the transverse pair degenerates to the zero vector,
/// so it takes the limiting polarisation along y instead.
fn isotropic_eigenvectors(
    k0: f64,
    kx: f64,
    ky: f64,
    kz: &Vector4<Complex<f64>>,
) -> [Vector3<Complex<f64>>; 4] {
    let threshold = k0 * config::NORMAL_INCIDENCE_THRESHOLD;
    let transverse = if kx.abs() <= threshold && ky.abs() <= threshold {
        Vector3::new(Complex::ZERO, -Complex::ONE, Complex::ZERO)
    } else {
        Vector3::new(Complex::from(ky), Complex::from(-kx), Complex::ZERO)
    };

    [
        Vector3::new(-kz[0], Complex::ZERO, Complex::from(kx)),
        transverse,
        Vector3::new(-kz[3], Complex::ZERO, Complex::from(kx)),
        transverse,
    ]
}

/// Characteristic matrix of one mode: the squared wavevector cross-product
/// operator over k0 squared, plus the dielectric tensor.
fn characteristic_matrix(
    k0: f64,
    kx: f64,
    ky: f64,
    kz: Complex<f64>,
    eps: &DielectricTensor,
) -> Matrix3<Complex<f64>> {
    let m_k = Matrix3::new(
        Complex::ZERO,
        -kz,
        Complex::from(ky),
        kz,
        Complex::ZERO,
        Complex::from(-kx),
        Complex::from(-ky),
        Complex::from(kx),
        Complex::ZERO,
    );
    (m_k * m_k).unscale(k0 * k0) + eps
}
