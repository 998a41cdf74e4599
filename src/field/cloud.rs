//! Willekeurige seedpunten binnen een bol.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PreprocessError, SeedPoint};

/// Beschrijving van een bolvormige puntbron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSeedSpec {
    pub center: [f64; 3],
    pub radius: f64,
    pub count: usize,
    pub seed: u64,
}

impl SphereSeedSpec {
    #[must_use]
    pub const fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

/// Verdeelt `count` punten uniform over het volume van de bol.
///
/// Dezelfde spec levert altijd dezelfde punten op.
pub fn sphere_cloud(spec: &SphereSeedSpec) -> Result<Vec<SeedPoint>, PreprocessError> {
    if spec.center.iter().any(|c| !c.is_finite()) {
        return Err(PreprocessError::invalid("middelpunt van de puntbron is niet eindig"));
    }
    if !spec.radius.is_finite() || spec.radius < 0.0 {
        return Err(PreprocessError::invalid(format!(
            "straal moet niet-negatief en eindig zijn, kreeg {}",
            spec.radius
        )));
    }
    if spec.count == 0 {
        return Err(PreprocessError::invalid("puntbron heeft minstens één punt nodig"));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let points = (0..spec.count)
        .map(|_| random_point_in_sphere(spec.center, spec.radius, &mut rng))
        .collect::<Vec<_>>();

    log::debug!(
        "{} seedpunten in bol met straal {} gegenereerd",
        points.len(),
        spec.radius
    );
    Ok(points)
}

fn random_point_in_sphere(center: [f64; 3], radius: f64, rng: &mut impl Rng) -> SeedPoint {
    let u: f64 = rng.random();
    let v: f64 = rng.random();
    let w: f64 = rng.random();
    let theta = 2.0 * PI * u;
    let phi = (2.0 * v - 1.0).acos();
    let r = radius * w.cbrt();
    SeedPoint::new(
        center[0] + r * phi.sin() * theta.cos(),
        center[1] + r * phi.sin() * theta.sin(),
        center[2] + r * phi.cos(),
    )
}
