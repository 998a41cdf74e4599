//! Sliderdefinitie met klemmen en kwantiseren.

use serde::Serialize;

/// Bereik, stap en huidige waarde van één slider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderSpec {
    pub title: String,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub value: f64,
}

impl SliderSpec {
    /// Maakt een slider; de beginwaarde wordt direct binnen het bereik gebracht.
    #[must_use]
    pub fn new(title: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        let mut spec = Self {
            title: title.into(),
            min: min.min(max),
            max: max.max(min),
            step: None,
            value,
        };
        spec.value = spec.constrain(value);
        spec
    }

    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = (step.is_finite() && step > 0.0).then_some(step);
        self.value = self.constrain(self.value);
        self
    }

    /// Klemt `value` binnen `[min, max]` en rondt af op `min + k * step`.
    #[must_use]
    pub fn constrain(&self, value: f64) -> f64 {
        let mut constrained = clamp(value, self.min, self.max);
        if let Some(step) = self.step {
            let steps = ((constrained - self.min) / step).round();
            constrained = clamp(self.min + steps * step, self.min, self.max);
        }
        constrained
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::SliderSpec;

    #[test]
    fn initial_value_is_clamped() {
        let slider = SliderSpec::new("Scale Factor", 1.0, 50.0, 80.0);
        assert_eq!(slider.value, 50.0);
    }

    #[test]
    fn swapped_bounds_are_normalised() {
        let slider = SliderSpec::new("Omgekeerd", 10.0, 1.0, 5.0);
        assert_eq!((slider.min, slider.max), (1.0, 10.0));
    }

    #[test]
    fn quantises_to_step_size() {
        let slider = SliderSpec::new("Stap", 0.0, 10.0, 0.0).with_step(0.5);
        assert!((slider.constrain(3.3) - 3.5).abs() < 1e-9);
        assert!((slider.constrain(9.9) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_step_is_ignored() {
        let slider = SliderSpec::new("Vrij", 0.0, 1.0, 0.0).with_step(0.0);
        assert_eq!(slider.step, None);
        assert!((slider.constrain(0.37) - 0.37).abs() < 1e-12);
    }
}
