//! Generator voor roosters van seedpunten.

use crate::config::DEFAULT_MAX_SEED_POINTS;

use super::{PreprocessError, SeedPoint};

const EPSILON: f64 = 1e-9;

/// Grens op het aantal stappen per as; ruim boven elk puntbudget en exact als `f64`.
#[allow(clippy::cast_lossless)]
const MAX_AXIS_STEPS: f64 = u32::MAX as f64;

/// Roosterbeschrijving: inclusieve bovengrens per as (ondergrens 0) en een stapgrootte.
///
/// Een tweedimensionaal rooster heeft geen z-extent; z blijft dan 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSpec {
    pub extent_x: f64,
    pub extent_y: f64,
    pub extent_z: Option<f64>,
    pub spacing: f64,
}

impl LatticeSpec {
    #[must_use]
    pub const fn planar(extent_x: f64, extent_y: f64, spacing: f64) -> Self {
        Self {
            extent_x,
            extent_y,
            extent_z: None,
            spacing,
        }
    }

    #[must_use]
    pub const fn volumetric(extent_x: f64, extent_y: f64, extent_z: f64, spacing: f64) -> Self {
        Self {
            extent_x,
            extent_y,
            extent_z: Some(extent_z),
            spacing,
        }
    }

    /// Zelfde rooster met een andere stapgrootte.
    #[must_use]
    pub const fn with_spacing(self, spacing: f64) -> Self {
        Self { spacing, ..self }
    }

    #[must_use]
    pub const fn dimensions(&self) -> usize {
        if self.extent_z.is_some() { 3 } else { 2 }
    }

    /// Aantal punten dat [`generate`] zou opleveren.
    pub fn point_count(&self) -> Result<usize, PreprocessError> {
        self.validate()?;
        let [count_x, count_y, count_z] = self.axis_counts()?;
        count_x
            .checked_mul(count_y)
            .and_then(|count| count.checked_mul(count_z))
            .ok_or_else(|| {
                PreprocessError::invalid(format!(
                    "rooster met stap {} bevat te veel punten",
                    self.spacing
                ))
            })
    }

    fn validate(&self) -> Result<(), PreprocessError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(PreprocessError::invalid(format!(
                "stapgrootte moet positief en eindig zijn, kreeg {}",
                self.spacing
            )));
        }
        let axes = [("x", Some(self.extent_x)), ("y", Some(self.extent_y)), ("z", self.extent_z)];
        for (axis, extent) in axes {
            if let Some(extent) = extent {
                if !extent.is_finite() || extent < 0.0 {
                    return Err(PreprocessError::invalid(format!(
                        "extent voor as {axis} moet niet-negatief en eindig zijn, kreeg {extent}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn axis_counts(&self) -> Result<[usize; 3], PreprocessError> {
        let count_z = match self.extent_z {
            Some(extent) => steps_along(extent, self.spacing)?,
            None => 1,
        };
        Ok([
            steps_along(self.extent_x, self.spacing)?,
            steps_along(self.extent_y, self.spacing)?,
            count_z,
        ])
    }
}

/// Genereert het rooster met de standaard bovengrens op het aantal punten.
pub fn generate(spec: &LatticeSpec) -> Result<Vec<SeedPoint>, PreprocessError> {
    generate_with_limit(spec, DEFAULT_MAX_SEED_POINTS)
}

/// Genereert alle roosterpunten, x buitenste lus, dan y, z binnenste.
///
/// Coördinaten zijn `i * spacing`, dus er stapelt zich geen afrondingsfout op.
pub fn generate_with_limit(
    spec: &LatticeSpec,
    max_points: usize,
) -> Result<Vec<SeedPoint>, PreprocessError> {
    let total = spec.point_count()?;
    if total > max_points {
        return Err(PreprocessError::invalid(format!(
            "rooster zou {total} punten bevatten, maximum is {max_points}"
        )));
    }

    let [count_x, count_y, count_z] = spec.axis_counts()?;
    let mut points = Vec::with_capacity(total);
    for i in 0..count_x {
        let x = coordinate(i, spec.spacing);
        for j in 0..count_y {
            let y = coordinate(j, spec.spacing);
            if spec.extent_z.is_some() {
                for k in 0..count_z {
                    points.push(SeedPoint::new(x, y, coordinate(k, spec.spacing)));
                }
            } else {
                points.push(SeedPoint::new(x, y, 0.0));
            }
        }
    }

    log::debug!(
        "rooster met {} punten gegenereerd ({}D, stap {})",
        points.len(),
        spec.dimensions(),
        spec.spacing
    );
    Ok(points)
}

/// Aantal punten langs één as: `floor(extent / spacing) + 1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn steps_along(extent: f64, spacing: f64) -> Result<usize, PreprocessError> {
    let steps = (extent / spacing + EPSILON).floor();
    if !steps.is_finite() || steps >= MAX_AXIS_STEPS {
        return Err(PreprocessError::invalid(format!(
            "extent {extent} bij stap {spacing} geeft te veel punten per as"
        )));
    }
    (steps as usize)
        .checked_add(1)
        .ok_or_else(|| PreprocessError::invalid("te veel punten per as"))
}

#[allow(clippy::cast_precision_loss)]
fn coordinate(index: usize, spacing: f64) -> f64 {
    index as f64 * spacing
}

#[cfg(test)]
mod tests {
    use super::{LatticeSpec, generate, generate_with_limit};
    use crate::field::{PreprocessError, SeedPoint};

    #[test]
    fn planar_lattice_is_row_major() {
        let points = generate(&LatticeSpec::planar(36.0, 36.0, 10.0)).unwrap();
        assert_eq!(points.len(), 16);

        let steps = [0.0, 10.0, 20.0, 30.0];
        let expected: Vec<SeedPoint> = steps
            .iter()
            .flat_map(|&x| steps.iter().map(move |&y| SeedPoint::new(x, y, 0.0)))
            .collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn spacing_beyond_extent_yields_origin() {
        let points = generate(&LatticeSpec::planar(10.0, 10.0, 20.0)).unwrap();
        assert_eq!(points, vec![SeedPoint::new(0.0, 0.0, 0.0)]);

        let points = generate(&LatticeSpec::volumetric(5.0, 5.0, 5.0, 6.0)).unwrap();
        assert_eq!(points, vec![SeedPoint::default()]);
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let err = generate(&LatticeSpec::planar(10.0, 10.0, 0.0)).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidInput(_)));
    }

    #[test]
    fn negative_or_nan_spacing_is_rejected() {
        for spacing in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(generate(&LatticeSpec::planar(10.0, 10.0, spacing)).is_err());
        }
    }

    #[test]
    fn negative_extent_is_rejected() {
        let err = generate(&LatticeSpec::volumetric(10.0, 10.0, -1.0, 2.0)).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidInput(message) if message.contains('z')));
    }

    #[test]
    fn volumetric_lattice_varies_z_fastest() {
        let points = generate(&LatticeSpec::volumetric(1.0, 1.0, 1.0, 1.0)).unwrap();
        let coords: Vec<[f64; 3]> = points.iter().map(|p| p.to_array()).collect();
        assert_eq!(
            coords,
            vec![
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ]
        );
    }

    #[test]
    fn fractional_spacing_reaches_inclusive_bound() {
        let points = generate(&LatticeSpec::planar(0.3, 0.0, 0.1)).unwrap();
        assert_eq!(points.len(), 4);
        assert!((points[3].x - 0.3).abs() < 1e-12);
    }

    #[test]
    fn repeated_generation_is_identical() {
        let spec = LatticeSpec::volumetric(76.0, 49.0, 45.0, 10.0);
        assert_eq!(generate(&spec).unwrap(), generate(&spec).unwrap());
    }

    #[test]
    fn point_budget_is_enforced() {
        let spec = LatticeSpec::planar(357.0, 357.0, 1.0);
        assert_eq!(spec.point_count().unwrap(), 358 * 358);
        let err = generate_with_limit(&spec, 1000).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidInput(message) if message.contains("maximum")));
    }

    #[test]
    fn tiny_spacing_is_rejected_without_overflow() {
        let err = generate(&LatticeSpec::planar(76.0, 49.0, 1e-300)).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidInput(_)));
        assert!(LatticeSpec::volumetric(76.0, 49.0, 45.0, 1e-300).point_count().is_err());
    }

    #[test]
    fn huge_extent_is_rejected_without_overflow() {
        let spec = LatticeSpec::planar(1e30, 1.0, 1.0);
        assert!(matches!(spec.point_count(), Err(PreprocessError::InvalidInput(_))));
        assert!(generate_with_limit(&spec, usize::MAX).is_err());
    }

    #[test]
    fn axis_product_overflow_is_rejected() {
        // 2^32 - 1 stappen per as passen, maar het product van drie assen niet.
        let spec = LatticeSpec::volumetric(4.0e9, 4.0e9, 4.0e9, 1.0);
        assert!(spec.point_count().is_err());
    }
}
