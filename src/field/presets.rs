//! Benoemde datasets met vaste roosterafmetingen.

use std::fmt;
use std::str::FromStr;

use super::{LatticeSpec, PreprocessError, SphereSeedSpec};

/// Bekende datasets en hun seedrooster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetPreset {
    TestData1,
    TestData2,
    Carotid,
}

impl DatasetPreset {
    pub const ALL: &'static [Self] = &[Self::TestData1, Self::TestData2, Self::Carotid];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TestData1 => "testData1",
            Self::TestData2 => "testData2",
            Self::Carotid => "carotid",
        }
    }

    /// Inclusieve bovengrenzen per as; `None` voor z bij vlakke datasets.
    #[must_use]
    pub fn extents(self) -> (f64, f64, Option<f64>) {
        match self {
            Self::TestData1 => (36.0, 36.0, None),
            Self::TestData2 => (357.0, 357.0, None),
            Self::Carotid => (76.0, 49.0, Some(45.0)),
        }
    }

    /// Stapgrootte van de vaste roosterlussen per dataset (5, 20 en 10).
    ///
    /// Het interactieve stroomlijnprogramma startte zijn spacingslider op 3;
    /// hier begint de slider op de roosterstap zodat de eerste seeds gelijk
    /// zijn aan die van de vaste roosters.
    #[must_use]
    pub fn default_spacing(self) -> f64 {
        match self {
            Self::TestData1 => 5.0,
            Self::TestData2 => 20.0,
            Self::Carotid => 10.0,
        }
    }

    /// Roosterbeschrijving voor deze dataset bij de gegeven stapgrootte.
    #[must_use]
    pub fn lattice(self, spacing: f64) -> LatticeSpec {
        match self.extents() {
            (x, y, Some(z)) => LatticeSpec::volumetric(x, y, z, spacing),
            (x, y, None) => LatticeSpec::planar(x, y, spacing),
        }
    }

    /// Puntbron rond de halsslagadersplitsing; alleen de carotid-dataset heeft er een.
    #[must_use]
    pub fn point_source(self) -> Option<SphereSeedSpec> {
        match self {
            Self::Carotid => Some(SphereSeedSpec {
                center: [133.1, 116.3, 5.0],
                radius: 2.0,
                count: 25,
                seed: 0,
            }),
            Self::TestData1 | Self::TestData2 => None,
        }
    }

    /// Case-insensitieve lookup op naam.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|preset| preset.name().to_ascii_lowercase() == normalized)
    }
}

impl fmt::Display for DatasetPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetPreset {
    type Err = PreprocessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| PreprocessError::invalid(format!("onbekende dataset `{}`", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::DatasetPreset;
    use crate::field::{SeedPoint, generate};

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(DatasetPreset::from_name("CAROTID"), Some(DatasetPreset::Carotid));
        assert_eq!(" testdata2 ".parse::<DatasetPreset>().unwrap(), DatasetPreset::TestData2);
        assert!("headsq".parse::<DatasetPreset>().is_err());
    }

    #[test]
    fn carotid_lattice_has_three_axes() {
        let preset = DatasetPreset::Carotid;
        let points = generate(&preset.lattice(preset.default_spacing())).unwrap();
        assert_eq!(points.len(), 8 * 5 * 5);
        assert_eq!(points[0], SeedPoint::new(0.0, 0.0, 0.0));
        assert_eq!(points[1], SeedPoint::new(0.0, 0.0, 10.0));
        assert_eq!(*points.last().unwrap(), SeedPoint::new(70.0, 40.0, 40.0));
    }

    #[test]
    fn test_data_presets_are_planar() {
        let first = generate(&DatasetPreset::TestData1.lattice(5.0)).unwrap();
        assert_eq!(first.len(), 8 * 8);
        assert!(first.iter().all(|point| point.z == 0.0));

        let second = generate(&DatasetPreset::TestData2.lattice(20.0)).unwrap();
        assert_eq!(second.len(), 18 * 18);
    }

    #[test]
    fn default_spacing_matches_fixed_lattices() {
        let spacings: Vec<f64> = DatasetPreset::ALL
            .iter()
            .map(|preset| preset.default_spacing())
            .collect();
        assert_eq!(spacings, vec![5.0, 20.0, 10.0]);
    }

    #[test]
    fn only_carotid_has_point_source() {
        assert!(DatasetPreset::Carotid.point_source().is_some());
        assert!(DatasetPreset::TestData1.point_source().is_none());
    }
}
