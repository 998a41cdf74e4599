//! Kern datastructuren voor vectorvelden en seedpunten.

use serde::Serialize;
use thiserror::Error;

pub mod cloud;
pub mod lattice;
pub mod presets;
pub mod scale;

pub use cloud::{SphereSeedSpec, sphere_cloud};
pub use lattice::{LatticeSpec, generate};
pub use presets::DatasetPreset;
pub use scale::{ScaleFactor, estimate, max_magnitude};

/// Fouttype voor de voorbewerkingsstappen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    /// De aangeleverde parameters zijn niet bruikbaar.
    #[error("ongeldige invoer: {0}")]
    InvalidInput(String),
}

impl PreprocessError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Eén vectorwaarde bij een punt uit de bron.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorSample(pub [f64; 3]);

impl VectorSample {
    #[must_use]
    pub const fn new(vx: f64, vy: f64, vz: f64) -> Self {
        Self([vx, vy, vz])
    }

    /// Euclidische lengte van de vector.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        let [x, y, z] = self.0;
        (x * x + y * y + z * z).sqrt()
    }
}

impl From<[f64; 3]> for VectorSample {
    fn from(value: [f64; 3]) -> Self {
        Self(value)
    }
}

/// Geordende reeks vectoren; de index komt overeen met de puntindex van de bron.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorField {
    samples: Vec<VectorSample>,
}

impl VectorField {
    #[must_use]
    pub fn new(samples: Vec<VectorSample>) -> Self {
        Self { samples }
    }

    /// Bouwt een veld uit platte componenten `vx vy vz vx vy vz ...`.
    pub fn from_components(components: &[f64]) -> Result<Self, PreprocessError> {
        if components.len() % 3 != 0 {
            return Err(PreprocessError::invalid(format!(
                "aantal vectorcomponenten ({}) is geen veelvoud van drie",
                components.len()
            )));
        }
        let samples = components
            .chunks_exact(3)
            .map(|chunk| VectorSample::new(chunk[0], chunk[1], chunk[2]))
            .collect();
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[VectorSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl FromIterator<VectorSample> for VectorField {
    fn from_iter<I: IntoIterator<Item = VectorSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Startpunt voor het traceren van een stroomlijn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SeedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SeedPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::{PreprocessError, VectorField, VectorSample};

    #[test]
    fn magnitude_is_euclidean_length() {
        let sample = VectorSample::new(3.0, 4.0, 12.0);
        assert!((sample.magnitude() - 13.0).abs() < 1e-12);
    }

    #[test]
    fn builds_field_from_flat_components() {
        let field = VectorField::from_components(&[1.0, 0.0, 0.0, 0.0, 2.0, 0.0]).unwrap();
        assert_eq!(field.len(), 2);
        assert_eq!(field.samples()[1], VectorSample::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn rejects_incomplete_triples() {
        let err = VectorField::from_components(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidInput(message) if message.contains("drie")));
    }
}
