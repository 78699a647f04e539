/// Absolute tolerance on singular values when extracting a nullspace basis.
pub const NULLSPACE_ATOL: f64 = 1e-9;
/// Relative x-component magnitude below which an eigenvector counts as
/// transverse during polarisation-mode reordering.
pub const MODE_SWAP_THRESHOLD: f64 = 1e-9;
/// In-plane wavevector magnitude below which incidence is treated as normal,
/// relative to the vacuum wavevector.
pub const NORMAL_INCIDENCE_THRESHOLD: f64 = 1e-12;
