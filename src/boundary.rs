//! Boundary and propagation matrices of a single layer.
//!
//! The tangential field continuity conditions at each interface couple the
//! four modal amplitudes of a layer to the lab-frame tangential E and H
//! components. With the modes grouped into their two direction pairs, the
//! coupling reduces to four 2x2 boundary matrices built from eigenvector
//! component ratios, plus two diagonal phase propagators across the layer
//! thickness.

use nalgebra::{Complex, Matrix2, Vector2};

use crate::eigenmodes::EigenmodeSet;
use crate::error::StackError;


/// The six 2x2 matrices of one layer: modal-amplitude to tangential-E
/// coupling (a12, a34), tangential-H coupling (b12, b34), and the diagonal
/// phase propagators across the layer (c12, c34).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMatrices {
    pub a12: Matrix2<Complex<f64>>,
    pub a34: Matrix2<Complex<f64>>,
    pub b12: Matrix2<Complex<f64>>,
    pub b34: Matrix2<Complex<f64>>,
    pub c12: Matrix2<Complex<f64>>,
    pub c34: Matrix2<Complex<f64>>,
}

/// Builds the boundary and propagation matrices of a layer of thickness `d`
/// from its eigenmode set.
///
/// For the zero-thickness ambient entries the propagators reduce to the
/// identity. A zero eigenvector component in any of the ratio denominators
/// fails with [`StackError::DegenerateMode`].
pub fn layer_matrices(
    kx: f64,
    ky: f64,
    modes: &EigenmodeSet,
    d: f64,
) -> Result<LayerMatrices, StackError> {
    let kz = &modes.kz;
    let e = &modes.e;

    let a1 = ratio(e[0][1], e[0][0], 0)?;
    let a2 = ratio(e[1][0], e[1][1], 1)?;
    let a3 = ratio(e[2][1], e[2][0], 2)?;
    let a4 = ratio(e[3][0], e[3][1], 3)?;

    let b1 = ratio(e[0][2], e[0][0], 0)?;
    let b2 = ratio(e[1][2], e[1][1], 1)?;
    let b3 = ratio(e[2][2], e[2][0], 2)?;
    let b4 = ratio(e[3][2], e[3][1], 3)?;

    let a12 = Matrix2::new(Complex::ONE, a2, a1, Complex::ONE);
    let a34 = Matrix2::new(Complex::ONE, a4, a3, Complex::ONE);

    let b12 = Matrix2::new(
        b1 * ky - kz[0] * a1,
        b2 * ky - kz[1],
        kz[0] - b1 * kx,
        kz[1] * a2 - b2 * kx,
    );
    let b34 = Matrix2::new(
        b3 * ky - kz[2] * a3,
        b4 * ky - kz[3],
        kz[2] - b3 * kx,
        kz[3] * a4 - b4 * kx,
    );

    let c12 = Matrix2::from_diagonal(&Vector2::new(
        (Complex::<f64>::i() * kz[0] * d).exp(),
        (Complex::<f64>::i() * kz[1] * d).exp(),
    ));
    let c34 = Matrix2::from_diagonal(&Vector2::new(
        (Complex::<f64>::i() * kz[2] * d).exp(),
        (Complex::<f64>::i() * kz[3] * d).exp(),
    ));

    Ok(LayerMatrices {
        a12,
        a34,
        b12,
        b34,
        c12,
        c34,
    })
}

fn ratio(num: Complex<f64>, den: Complex<f64>, mode: usize) -> Result<Complex<f64>, StackError> {
    if den.norm() == 0.0 {
        return Err(StackError::DegenerateMode { mode });
    }
    Ok(num / den)
}
