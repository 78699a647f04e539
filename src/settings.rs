use anyhow::Result;
use config::{Config, Environment, File};
use nalgebra::{Complex, Matrix2, Matrix3};
use serde::Deserialize;
use std::path::Path;

use crate::config as constants;
use crate::error::StackError;
use crate::recursion;
use crate::tensor::{self, DielectricTensor};


/// Runtime description of one evaluation: incidence geometry plus the layer
/// stack. Angles are in radians; the wavelength shares its length unit with
/// the layer thicknesses.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub wavelength: f64,
    pub theta0: f64,
    pub phi0: f64,
    pub incident: MaterialSpec,
    pub layers: Vec<LayerSpec>,
    pub substrate: MaterialSpec,
    #[serde(default = "default_nullspace_atol")]
    pub nullspace_atol: f64,
}

fn default_nullspace_atol() -> f64 {
    constants::NULLSPACE_ATOL
}

/// One finite layer: a material and its thickness.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayerSpec {
    pub material: MaterialSpec,
    pub thickness: f64,
}

/// Material description, from the most common shorthand to the full tensor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSpec {
    /// Isotropic material given by its complex refractive index.
    Index { n: Complex<f64> },
    /// Anisotropic material given by principal permittivities and the ZYZ
    /// Euler angles (radians) of its crystal frame.
    Principal {
        eps: [Complex<f64>; 3],
        #[serde(default)]
        euler: [f64; 3],
    },
    /// Fully general tensor, row by row.
    Tensor { rows: [[Complex<f64>; 3]; 3] },
}

impl MaterialSpec {
    /// Builds the lab-frame dielectric tensor of this material.
    pub fn tensor(&self) -> DielectricTensor {
        match self {
            MaterialSpec::Index { n } => tensor::from_index(*n),
            MaterialSpec::Principal { eps, euler } => {
                let principal = tensor::principal(eps[0], eps[1], eps[2]);
                tensor::rotated(&principal, euler[0], euler[1], euler[2])
            }
            MaterialSpec::Tensor { rows } => Matrix3::from_fn(|i, j| rows[i][j]),
        }
    }
}

impl Settings {
    /// Assembles the tensor and thickness lists, with the zero-thickness
    /// convention for the incident medium and substrate.
    pub fn stack(&self) -> (Vec<DielectricTensor>, Vec<f64>) {
        let mut e_list = Vec::with_capacity(self.layers.len() + 2);
        let mut d_list = Vec::with_capacity(self.layers.len() + 2);
        e_list.push(self.incident.tensor());
        d_list.push(0.0);
        for layer in &self.layers {
            e_list.push(layer.material.tensor());
            d_list.push(layer.thickness);
        }
        e_list.push(self.substrate.tensor());
        d_list.push(0.0);
        (e_list, d_list)
    }

    /// Solves the configured stack for its s/p reflection and transmission
    /// matrices.
    pub fn solve(&self) -> Result<(Matrix2<Complex<f64>>, Matrix2<Complex<f64>>), StackError> {
        let (e_list, d_list) = self.stack();
        recursion::rt_with_tolerance(
            self.wavelength,
            self.theta0,
            self.phi0,
            &e_list,
            &d_list,
            self.nullspace_atol,
        )
    }
}

/// Loads a stack description from a TOML file, with `BERREMAN`-prefixed
/// environment variables layered on top.
pub fn load_config(config_file: &Path) -> Result<Settings> {
    let settings: Config = Config::builder()
        .add_source(File::from(config_file.to_path_buf()).required(true))
        .add_source(Environment::with_prefix("berreman"))
        .build()?;

    let config: Settings = settings.try_deserialize()?;
    validate_config(&config)?;

    Ok(config)
}

/// Loads the default configuration shipped with the crate.
pub fn load_default_config() -> Result<Settings> {
    let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    load_config(&crate_dir.join("config/default.toml"))
}

/// Checks the parts of a configuration the deserializer cannot.
pub fn validate_config(config: &Settings) -> Result<()> {
    if config.wavelength <= 0.0 {
        anyhow::bail!("wavelength must be positive, got {}", config.wavelength);
    }
    if config.nullspace_atol <= 0.0 {
        anyhow::bail!("nullspace tolerance must be positive");
    }
    for (n, layer) in config.layers.iter().enumerate() {
        if layer.thickness < 0.0 {
            anyhow::bail!("layer {} has negative thickness {}", n, layer.thickness);
        }
    }
    Ok(())
}
