//! Configuratie van de voorbewerkingsstappen.

use serde::Deserialize;

/// Standaard doelgrootte voor glyphs wanneer geen slider meegeeft.
pub const DEFAULT_TARGET_MAGNITUDE: f64 = 10.0;

/// Schaalfactor die gebruikt wordt wanneer het veld leeg of overal nul is.
pub const DEFAULT_FALLBACK_SCALE: f64 = 1.0;

/// Bovengrens op het aantal seedpunten per rooster.
pub const DEFAULT_MAX_SEED_POINTS: usize = 1_000_000;

/// Instellingen voor schaalschatting en seedgeneratie.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    #[serde(rename = "@target")]
    pub target_magnitude: f64,
    #[serde(rename = "@fallback")]
    pub fallback_scale: f64,
    #[serde(rename = "@max_points")]
    pub max_seed_points: usize,
    #[serde(rename = "@seed")]
    pub cloud_seed: u64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_magnitude: DEFAULT_TARGET_MAGNITUDE,
            fallback_scale: DEFAULT_FALLBACK_SCALE,
            max_seed_points: DEFAULT_MAX_SEED_POINTS,
            cloud_seed: 0,
        }
    }
}

impl PreprocessConfig {
    /// Controleert of de configuratie bruikbare waarden bevat.
    pub fn validate(&self) -> Result<(), String> {
        if !self.target_magnitude.is_finite() || self.target_magnitude <= 0.0 {
            return Err(format!(
                "doelgrootte moet positief en eindig zijn, kreeg {}",
                self.target_magnitude
            ));
        }
        if !self.fallback_scale.is_finite() || self.fallback_scale < 0.0 {
            return Err(format!(
                "terugvalschaal moet niet-negatief en eindig zijn, kreeg {}",
                self.fallback_scale
            ));
        }
        if self.max_seed_points == 0 {
            return Err("maximum aantal seedpunten moet groter dan nul zijn".to_owned());
        }
        Ok(())
    }
}
