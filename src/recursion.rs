//! Reflection and transmission of a multilayer stack.
//!
//! This module orchestrates the full calculation: it validates the ambient
//! media, fixes the in-plane wavevector from the incidence geometry, solves
//! every layer for its eigenmodes and boundary matrices, and combines the
//! layers into global 2x2 reflection and transmission matrices in the s/p
//! polarisation basis.
//!
//! The reflection matrices are built by a backward recursion from the
//! substrate towards the incident medium. Unlike a direct product of raw
//! transfer matrices, whose propagator exponentials overflow for thick or
//! absorbing layers, the recursion keeps every intermediate reflection
//! matrix bounded. The transmission matrix is then an ordered forward
//! product that reuses the reflection field.
//!
//! Each call is independent and side-effect free, so sweeps over wavelength
//! or angle can evaluate points in parallel outside this crate, treating
//! every point as independently failable.

use nalgebra::{Complex, Matrix2};

use crate::boundary::{layer_matrices, LayerMatrices};
use crate::config;
use crate::dispersion::kz_eigenvalues;
use crate::eigenmodes::kz_eigenvectors;
use crate::error::StackError;
use crate::tensor::{self, DielectricTensor};

#[cfg(test)]
mod tests {

    use super::*;

    fn air_glass() -> (Vec<DielectricTensor>, Vec<f64>) {
        let e_list = vec![
            tensor::isotropic(Complex::new(1.0, 0.0)),
            tensor::isotropic(Complex::new(2.25, 0.0)),
        ];
        (e_list, vec![0.0, 0.0])
    }

    #[test]
    fn rejects_anisotropic_incident_medium() {
        let (mut e_list, d_list) = air_glass();
        e_list[0] = tensor::principal(
            Complex::new(2.0, 0.0),
            Complex::new(2.0, 0.0),
            Complex::new(3.0, 0.0),
        );
        let err = rt(500.0, 0.0, 0.0, &e_list, &d_list).unwrap_err();
        assert_eq!(err, StackError::InvalidMedium { medium: "incident" });
    }

    #[test]
    fn rejects_absorbing_substrate() {
        let (mut e_list, d_list) = air_glass();
        e_list[1] = tensor::isotropic(Complex::new(2.25, 0.3));
        let err = rt(500.0, 0.0, 0.0, &e_list, &d_list).unwrap_err();
        assert_eq!(err, StackError::InvalidMedium { medium: "substrate" });
    }

    #[test]
    fn rejects_mismatched_lists() {
        let (e_list, _) = air_glass();
        let err = rt(500.0, 0.0, 0.0, &e_list, &[0.0]).unwrap_err();
        assert_eq!(
            err,
            StackError::LengthMismatch {
                tensors: 2,
                thicknesses: 1
            }
        );
    }

    #[test]
    fn rejects_short_stack() {
        let e_list = vec![tensor::isotropic(Complex::new(1.0, 0.0))];
        let err = rt(500.0, 0.0, 0.0, &e_list, &[0.0]).unwrap_err();
        assert_eq!(err, StackError::StackTooShort);
    }

    #[test]
    fn rejects_nonpositive_wavelength() {
        let (e_list, d_list) = air_glass();
        let err = rt(0.0, 0.0, 0.0, &e_list, &d_list).unwrap_err();
        assert_eq!(err, StackError::InvalidWavelength { wavelength: 0.0 });
    }

    #[test]
    fn normal_incidence_air_glass_matches_fresnel() {
        let (e_list, d_list) = air_glass();
        let (m_r, m_t) = rt(500.0, 0.0, 0.0, &e_list, &d_list).unwrap();

        // r = (n1 - n2) / (n1 + n2) and t = 2 n1 / (n1 + n2) for n = 1 -> 1.5.
        for m in 0..2 {
            assert!((m_r[(m, m)] - Complex::new(-0.2, 0.0)).norm() < 1e-10);
            assert!((m_t[(m, m)] - Complex::new(0.8, 0.0)).norm() < 1e-10);
        }
        assert!(m_r[(0, 1)].norm() < 1e-12);
        assert!(m_r[(1, 0)].norm() < 1e-12);
    }
}

/// Computes the s/p reflection and transmission matrices of a stack using
/// the default nullspace tolerance.
///
/// `wl` is the vacuum wavelength in the same length units as `d_list`;
/// `theta0` and `phi0` are the incidence polar and azimuth angles in
/// radians. `e_list` holds one dielectric tensor per medium, incident
/// first and substrate last; the ambient entries must be real, diagonal
/// and isotropic, with zero thickness by convention.
pub fn rt(
    wl: f64,
    theta0: f64,
    phi0: f64,
    e_list: &[DielectricTensor],
    d_list: &[f64],
) -> Result<(Matrix2<Complex<f64>>, Matrix2<Complex<f64>>), StackError> {
    rt_with_tolerance(wl, theta0, phi0, e_list, d_list, config::NULLSPACE_ATOL)
}

/// Computes the s/p reflection and transmission matrices of a stack with an
/// explicit nullspace tolerance.
///
/// The tolerance only affects anisotropic layers, where the field
/// eigenvectors come out of a nullspace extraction; materials at unusual
/// permittivity scales may need a cut other than the default.
pub fn rt_with_tolerance(
    wl: f64,
    theta0: f64,
    phi0: f64,
    e_list: &[DielectricTensor],
    d_list: &[f64],
    atol: f64,
) -> Result<(Matrix2<Complex<f64>>, Matrix2<Complex<f64>>), StackError> {
    if wl <= 0.0 {
        return Err(StackError::InvalidWavelength { wavelength: wl });
    }
    if e_list.len() < 2 {
        return Err(StackError::StackTooShort);
    }
    if e_list.len() != d_list.len() {
        return Err(StackError::LengthMismatch {
            tensors: e_list.len(),
            thicknesses: d_list.len(),
        });
    }
    if !tensor::is_ambient(&e_list[0]) {
        return Err(StackError::InvalidMedium { medium: "incident" });
    }
    if !tensor::is_ambient(&e_list[e_list.len() - 1]) {
        return Err(StackError::InvalidMedium { medium: "substrate" });
    }

    let n0 = e_list[0][(0, 0)].re.sqrt();
    let ns = e_list[e_list.len() - 1][(0, 0)].re.sqrt();

    let k0 = 2.0 * std::f64::consts::PI / wl;
    let kx = -k0 * n0 * theta0.sin() * phi0.cos();
    let ky = -k0 * n0 * theta0.sin() * phi0.sin();

    // One pass over the stack: eigenmodes and boundary matrices per layer.
    let mut layers: Vec<LayerMatrices> = Vec::with_capacity(e_list.len());
    for (eps, d) in e_list.iter().zip(d_list) {
        let v_kz = kz_eigenvalues(k0, kx, ky, eps)?;
        let modes = kz_eigenvectors(k0, kx, ky, v_kz, eps, atol)?;
        layers.push(layer_matrices(kx, ky, &modes, *d)?);
    }

    // Backward recursion for the reflection field, from the substrate
    // (where it vanishes) towards the incident interface.
    let count = layers.len();
    let mut m_r = vec![Matrix2::<Complex<f64>>::zeros(); count];
    for n in (0..count - 1).rev() {
        let next = &layers[n + 1];
        let f1 = next.b12 * next.c12 + next.b34 * next.c34 * m_r[n + 1];
        let f2 = (next.a12 * next.c12 + next.a34 * next.c34 * m_r[n + 1])
            .try_inverse()
            .ok_or(StackError::SingularMatrix {
                context: "combining the interface field matrices",
            })?;
        let f = f1 * f2;

        let cur = &layers[n];
        let r1 = (f * cur.a34 - cur.b34)
            .try_inverse()
            .ok_or(StackError::SingularMatrix {
                context: "solving the reflection recursion",
            })?;
        m_r[n] = r1 * (cur.b12 - f * cur.a12);
    }

    // Forward ordered product for the transmission matrix, reusing the
    // reflection field.
    let mut m_t = Matrix2::<Complex<f64>>::identity();
    for n in 0..count - 1 {
        let next = &layers[n + 1];
        let f1 = (next.a12 * next.c12 + next.a34 * next.c34 * m_r[n + 1])
            .try_inverse()
            .ok_or(StackError::SingularMatrix {
                context: "solving the transmission step",
            })?;
        let cur = &layers[n];
        m_t *= f1 * (cur.a12 + cur.a34 * m_r[n]);
    }

    // Rotate from lab x,y coordinates into the s/p polarisation basis on
    // both sides.
    let p_inc = polarisation_rotation(theta0, phi0);
    let p_inc_inv = p_inc.try_inverse().ok_or(StackError::SingularMatrix {
        context: "inverting the incident polarisation rotation",
    })?;
    let m_rsp = p_inc_inv * m_r[0] * p_inc;

    let sin_theta_s = theta0.sin() * n0 / ns;
    if sin_theta_s.abs() > 1.0 {
        return Err(StackError::TotalInternalReflection { sin_theta_s });
    }
    let theta_s = sin_theta_s.asin();
    let p_sub = polarisation_rotation(theta_s, phi0);
    let p_sub_inv = p_sub.try_inverse().ok_or(StackError::SingularMatrix {
        context: "inverting the substrate polarisation rotation",
    })?;
    let m_tsp = p_sub_inv * m_t * p_inc;

    Ok((m_rsp, m_tsp))
}

/// Rotation from the lab tangential components into the s/p basis of a
/// plane wave at polar angle `theta` and azimuth `phi`: the first column is
/// the in-plane p direction, the second the s direction.
fn polarisation_rotation(theta: f64, phi: f64) -> Matrix2<Complex<f64>> {
    Matrix2::new(
        theta.cos() * phi.cos(),
        -phi.sin(),
        theta.cos() * phi.sin(),
        phi.cos(),
    )
    .map(Complex::from)
}
