use nalgebra::{Complex, Matrix3, Rotation3, Vector3};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn iso_classification() {
        let eps = isotropic(Complex::new(2.25, 0.0));
        assert_eq!(classify(&eps), MaterialClass::Isotropic);
        assert!(is_ambient(&eps));
    }

    #[test]
    fn principal_is_anisotropic() {
        let eps = principal(
            Complex::new(2.25, 0.0),
            Complex::new(2.25, 0.0),
            Complex::new(2.89, 0.0),
        );
        assert_eq!(classify(&eps), MaterialClass::Anisotropic);
        assert!(!is_ambient(&eps));
    }

    #[test]
    fn absorbing_medium_is_not_ambient() {
        let eps = isotropic(Complex::new(2.25, 0.5));
        assert!(!is_ambient(&eps));
    }

    #[test]
    fn rotation_preserves_trace() {
        let eps = principal(
            Complex::new(2.0, 0.1),
            Complex::new(2.0, 0.1),
            Complex::new(3.0, 0.2),
        );
        let rot = rotated(&eps, 0.3, 0.7, 1.1);
        let trace = eps.trace() - rot.trace();
        assert!(trace.norm() < 1e-12);
        // A symmetric tensor stays symmetric under a proper rotation.
        let asym = rot - rot.transpose();
        assert!(asym.norm() < 1e-12);
    }

    #[test]
    fn zero_angles_leave_tensor_unchanged() {
        let eps = principal(
            Complex::new(1.5, 0.0),
            Complex::new(2.5, 0.0),
            Complex::new(3.5, 0.0),
        );
        let rot = rotated(&eps, 0.0, 0.0, 0.0);
        assert!((rot - eps).norm() < 1e-15);
    }
}

/// 3x3 complex dielectric tensor of one layer.
pub type DielectricTensor = Matrix3<Complex<f64>>;

/// Optical classification of a layer material, decided once per layer and
/// dispatched on by the dispersion and eigenvector solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialClass {
    Isotropic,
    Anisotropic,
}

/// Builds the tensor of an isotropic material from its permittivity.
pub fn isotropic(eps: Complex<f64>) -> DielectricTensor {
    Matrix3::from_diagonal(&Vector3::new(eps, eps, eps))
}

/// Builds the tensor of an isotropic material from its refractive index.
pub fn from_index(n: Complex<f64>) -> DielectricTensor {
    isotropic(n * n)
}

/// Builds a diagonal tensor from the three principal permittivities.
pub fn principal(
    eps_x: Complex<f64>,
    eps_y: Complex<f64>,
    eps_z: Complex<f64>,
) -> DielectricTensor {
    Matrix3::from_diagonal(&Vector3::new(eps_x, eps_y, eps_z))
}

/// Rotates a tensor from its principal frame into the lab frame with ZYZ
/// Euler angles (radians).
pub fn rotated(eps: &DielectricTensor, alpha: f64, beta: f64, gamma: f64) -> DielectricTensor {
    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), alpha)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), beta)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), gamma);
    let rot = rot.matrix().map(Complex::from);
    rot * eps * rot.transpose()
}

/// Classifies a tensor as isotropic (diagonal with equal entries) or general.
pub fn classify(eps: &DielectricTensor) -> MaterialClass {
    let diag = eps[(0, 1)] == Complex::ZERO
        && eps[(0, 2)] == Complex::ZERO
        && eps[(1, 0)] == Complex::ZERO
        && eps[(1, 2)] == Complex::ZERO
        && eps[(2, 0)] == Complex::ZERO
        && eps[(2, 1)] == Complex::ZERO;
    let iso = eps[(0, 0)] == eps[(1, 1)] && eps[(1, 1)] == eps[(2, 2)];
    if diag && iso {
        MaterialClass::Isotropic
    } else {
        MaterialClass::Anisotropic
    }
}

/// Whether a tensor can serve as the incident medium or substrate: real,
/// diagonal and isotropic, with positive permittivity.
pub fn is_ambient(eps: &DielectricTensor) -> bool {
    classify(eps) == MaterialClass::Isotropic
        && eps[(0, 0)].im == 0.0
        && eps[(0, 0)].re > 0.0
}
