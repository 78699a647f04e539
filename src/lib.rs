//! Polarised reflection and transmission of stratified anisotropic media.
//!
//! This crate implements the Berreman 4x4 transfer matrix formalism for a
//! plane electromagnetic wave incident on a stack of layers with arbitrary
//! complex dielectric tensors. For each layer it solves the quartic
//! dispersion relation for the four off-plane wavevector components, extracts
//! the matching field eigenvectors, assembles boundary and propagation
//! matrices, and combines them with a numerically stable layer recursion into
//! global 2x2 reflection and transmission matrices in the s/p polarisation
//! basis.
//!
//! The solver provides:
//! - Arbitrary complex 3x3 dielectric tensors per layer
//! - A closed-form fast path for isotropic layers
//! - Companion-matrix root finding for the anisotropic dispersion quartic
//! - A backward reflection recursion that stays bounded for thick or
//!   absorbing stacks
//! - Explicit, typed failures for every numerically degenerate condition
//!
//! The entry point is [`recursion::rt`], or [`settings::Settings::solve`]
//! when the stack is described by a configuration file.

pub mod boundary;
pub mod config;
pub mod dispersion;
pub mod eigenmodes;
pub mod error;
pub mod nullspace;
pub mod recursion;
pub mod settings;
pub mod tensor;
