//! Schatting van de schaalfactor voor glyphs en hedgehogs.
//!
//! De schaalfactor is `doelgrootte / grootste vectorlengte`, zodat de langste
//! vector in beeld ongeveer de doelgrootte krijgt. Een leeg veld of een veld
//! met alleen nulvectoren levert de terugvalwaarde op in plaats van een
//! deling door nul.

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::DEFAULT_FALLBACK_SCALE;

use super::{PreprocessError, VectorSample};

/// Eindige, niet-negatieve vermenigvuldigingsfactor voor glyphgroottes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Geeft `true` wanneer de terugvalwaarde gebruikt is.
    #[must_use]
    pub fn is_fallback(self, fallback: f64) -> bool {
        self.0 == fallback
    }
}

impl From<ScaleFactor> for f64 {
    fn from(value: ScaleFactor) -> Self {
        value.0
    }
}

/// Schat de schaalfactor met de standaard terugvalwaarde `1.0`.
pub fn estimate(vectors: &[VectorSample], target: f64) -> Result<ScaleFactor, PreprocessError> {
    estimate_with_fallback(vectors, target, DEFAULT_FALLBACK_SCALE)
}

/// Schat de schaalfactor met een expliciete terugvalwaarde.
pub fn estimate_with_fallback(
    vectors: &[VectorSample],
    target: f64,
    fallback: f64,
) -> Result<ScaleFactor, PreprocessError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(PreprocessError::invalid(format!(
            "doelgrootte moet positief en eindig zijn, kreeg {target}"
        )));
    }
    if !fallback.is_finite() || fallback < 0.0 {
        return Err(PreprocessError::invalid(format!(
            "terugvalschaal moet niet-negatief en eindig zijn, kreeg {fallback}"
        )));
    }

    let Some(max) = max_magnitude(vectors) else {
        log::warn!("leeg vectorveld, terugval op schaalfactor {fallback}");
        return Ok(ScaleFactor(fallback));
    };

    if max <= 0.0 {
        log::warn!("alle vectoren zijn nul, terugval op schaalfactor {fallback}");
        return Ok(ScaleFactor(fallback));
    }

    let scale = target / max;
    log::debug!("schaalfactor {scale} (doel {target}, maximum {max})");
    Ok(ScaleFactor(scale))
}

/// Grootste eindige vectorlengte, of `None` voor een leeg veld.
///
/// Niet-eindige vectoren worden overgeslagen.
#[must_use]
pub fn max_magnitude(vectors: &[VectorSample]) -> Option<f64> {
    if vectors.is_empty() {
        return None;
    }

    let scan = scan_max(vectors);
    if scan.skipped > 0 {
        log::warn!("{} niet-eindige vectoren overgeslagen", scan.skipped);
    }

    Some(scan.max)
}

/// Resultaat van één doorloop: grootste eindige lengte en aantal overgeslagen vectoren.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct MagnitudeScan {
    max: f64,
    skipped: usize,
}

impl MagnitudeScan {
    fn push(self, magnitude: f64) -> Self {
        if magnitude.is_finite() {
            Self {
                max: self.max.max(magnitude),
                ..self
            }
        } else {
            Self {
                skipped: self.skipped + 1,
                ..self
            }
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            max: self.max.max(other.max),
            skipped: self.skipped + other.skipped,
        }
    }
}

#[cfg(feature = "parallel")]
fn scan_max(vectors: &[VectorSample]) -> MagnitudeScan {
    vectors
        .par_iter()
        .map(VectorSample::magnitude)
        .fold(MagnitudeScan::default, MagnitudeScan::push)
        .reduce(MagnitudeScan::default, MagnitudeScan::merge)
}

#[cfg(not(feature = "parallel"))]
fn scan_max(vectors: &[VectorSample]) -> MagnitudeScan {
    vectors
        .iter()
        .map(VectorSample::magnitude)
        .fold(MagnitudeScan::default(), MagnitudeScan::push)
}

#[cfg(test)]
mod tests {
    use super::{estimate, estimate_with_fallback, max_magnitude, scan_max};
    use crate::field::{PreprocessError, VectorSample};

    fn samples(values: &[[f64; 3]]) -> Vec<VectorSample> {
        values.iter().copied().map(VectorSample::from).collect()
    }

    #[test]
    fn divides_target_by_largest_magnitude() {
        let vectors = samples(&[[1.0, 0.0, 0.0], [0.0, 3.0, 4.0], [0.5, 0.5, 0.5]]);
        let scale = estimate(&vectors, 10.0).expect("geldige invoer");
        assert!((scale.value() - 2.0).abs() < 1e-12);
        assert!((scale.value() * 5.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_vectors_fall_back_to_default() {
        let vectors = vec![VectorSample::default(); 5];
        let scale = estimate(&vectors, 10.0).expect("terugval");
        assert_eq!(scale.value(), 1.0);
        assert!(scale.value().is_finite());
    }

    #[test]
    fn empty_field_falls_back_to_default() {
        let scale = estimate(&[], 3.0).expect("terugval");
        assert_eq!(scale.value(), 1.0);
        assert!(scale.is_fallback(1.0));
    }

    #[test]
    fn custom_fallback_is_used() {
        let scale = estimate_with_fallback(&[], 3.0, 0.25).expect("terugval");
        assert_eq!(scale.value(), 0.25);
    }

    #[test]
    fn rejects_non_positive_target() {
        let vectors = samples(&[[1.0, 0.0, 0.0]]);
        for target in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = estimate(&vectors, target).unwrap_err();
            assert!(matches!(err, PreprocessError::InvalidInput(_)));
        }
    }

    #[test]
    fn skips_non_finite_samples() {
        let vectors = samples(&[[f64::NAN, 0.0, 0.0], [0.0, 2.0, 0.0], [f64::INFINITY, 0.0, 0.0]]);
        assert_eq!(max_magnitude(&vectors), Some(2.0));
        let scale = estimate(&vectors, 4.0).unwrap();
        assert!((scale.value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_scan_counts_skipped_samples() {
        let vectors = samples(&[[f64::NAN, 0.0, 0.0], [0.0, 3.0, 4.0], [f64::INFINITY, 1.0, 0.0]]);
        let scan = scan_max(&vectors);
        assert_eq!(scan.max, 5.0);
        assert_eq!(scan.skipped, 2);
    }

    #[test]
    fn max_magnitude_of_empty_field_is_none() {
        assert_eq!(max_magnitude(&[]), None);
    }
}
