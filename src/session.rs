//! Toestand van één visualisatiesessie: dataset, sliders en laatste resultaten.

use serde::Serialize;
use thiserror::Error;

use crate::config::PreprocessConfig;
use crate::controls::{ControlError, ControlId, ControlTable, PipelineParams, SliderSpec};
use crate::field::cloud::sphere_cloud;
use crate::field::lattice::generate_with_limit;
use crate::field::scale::estimate_with_fallback;
use crate::field::{DatasetPreset, PreprocessError, SeedPoint, SphereSeedSpec, VectorField};

/// Fouten die een sessie kan teruggeven.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("ongeldige configuratie: {0}")]
    Config(String),
}

/// Resultaat van een evaluatie, klaar voor de renderpijplijn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outputs {
    pub scale_factor: f64,
    pub lattice_seeds: Vec<SeedPoint>,
    pub cloud_seeds: Vec<SeedPoint>,
    pub params: PipelineParams,
}

/// Slidertoestand zoals die naar een UI gaat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderState {
    pub id: ControlId,
    #[serde(flatten)]
    pub spec: SliderSpec,
}

#[derive(Debug, Clone)]
pub struct Session {
    preset: DatasetPreset,
    field: VectorField,
    config: PreprocessConfig,
    controls: ControlTable,
    params: PipelineParams,
    point_source: Option<SphereSeedSpec>,
    outputs: Option<Outputs>,
    dirty: bool,
}

impl Session {
    /// Start een sessie; de schaalslider begint op de geconfigureerde doelgrootte.
    pub fn new(
        preset: DatasetPreset,
        field: VectorField,
        config: PreprocessConfig,
    ) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::Config)?;

        let mut controls = ControlTable::for_preset(preset);
        let mut params = controls.params();
        controls.apply(ControlId::ScaleFactor, config.target_magnitude, &mut params)?;

        Ok(Self {
            preset,
            field,
            config,
            controls,
            params,
            point_source: preset.point_source(),
            outputs: None,
            dirty: true,
        })
    }

    #[must_use]
    pub fn preset(&self) -> DatasetPreset {
        self.preset
    }

    #[must_use]
    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    #[must_use]
    pub fn field(&self) -> &VectorField {
        &self.field
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Vervangt het vectorveld, bijvoorbeeld na het laden van een nieuw bestand.
    pub fn set_field(&mut self, field: VectorField) {
        self.field = field;
        self.dirty = true;
    }

    /// Vervangt de puntbron; `None` schakelt de wolk uit.
    pub fn set_point_source(&mut self, source: Option<SphereSeedSpec>) {
        self.point_source = source;
        self.dirty = true;
    }

    /// Stelt een slider in op id-sleutel of titel. Geeft de geaccepteerde waarde terug.
    pub fn set_control(&mut self, id_or_name: &str, value: f64) -> Result<f64, SessionError> {
        let (_, accepted) = self
            .controls
            .apply_named(id_or_name, value, &mut self.params)?;
        self.dirty = true;
        Ok(accepted)
    }

    /// Huidige sliders, in vaste volgorde.
    #[must_use]
    pub fn sliders(&self) -> Vec<SliderState> {
        self.controls
            .sliders()
            .map(|(id, spec)| SliderState {
                id,
                spec: spec.clone(),
            })
            .collect()
    }

    /// Laatste geldige resultaten, ook als een latere evaluatie faalde.
    #[must_use]
    pub fn outputs(&self) -> Option<&Outputs> {
        self.outputs.as_ref()
    }

    /// Herberekent schaalfactor en seeds als er iets veranderd is.
    ///
    /// Bij een fout blijven de vorige resultaten staan en blijft de sessie vuil.
    pub fn evaluate(&mut self) -> Result<&Outputs, SessionError> {
        if self.dirty || self.outputs.is_none() {
            let outputs = self.compute()?;
            self.outputs = Some(outputs);
            self.dirty = false;
        }
        self.outputs
            .as_ref()
            .ok_or_else(|| SessionError::Config("evaluatie leverde geen resultaat".to_owned()))
    }

    fn compute(&self) -> Result<Outputs, SessionError> {
        log::debug!(
            "herberekening voor {} ({} vectoren)",
            self.preset,
            self.field.len()
        );

        let scale = estimate_with_fallback(
            self.field.samples(),
            self.params.target_magnitude,
            self.config.fallback_scale,
        )?;

        let lattice = self.preset.lattice(self.params.spacing);
        let lattice_seeds = generate_with_limit(&lattice, self.config.max_seed_points)?;

        let cloud_seeds = match self.point_source {
            Some(source) => sphere_cloud(
                &source
                    .with_count(self.params.point_count)
                    .with_seed(self.config.cloud_seed),
            )?,
            None => Vec::new(),
        };

        Ok(Outputs {
            scale_factor: scale.value(),
            lattice_seeds,
            cloud_seeds,
            params: self.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionError};
    use crate::config::PreprocessConfig;
    use crate::controls::ControlError;
    use crate::field::{DatasetPreset, PreprocessError, VectorField, VectorSample};

    fn field(values: &[[f64; 3]]) -> VectorField {
        values.iter().copied().map(VectorSample::from).collect()
    }

    #[test]
    fn first_evaluation_uses_config_target() {
        let mut session = Session::new(
            DatasetPreset::TestData1,
            field(&[[0.0, 5.0, 0.0], [1.0, 0.0, 0.0]]),
            PreprocessConfig::default(),
        )
        .unwrap();

        let outputs = session.evaluate().unwrap();
        assert!((outputs.scale_factor - 2.0).abs() < 1e-12);
        assert_eq!(outputs.lattice_seeds.len(), 64);
        assert!(outputs.cloud_seeds.is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn spacing_slider_regenerates_lattice() {
        let mut session = Session::new(
            DatasetPreset::TestData1,
            VectorField::default(),
            PreprocessConfig::default(),
        )
        .unwrap();
        session.evaluate().unwrap();

        let accepted = session.set_control("Spacing", 10.0).unwrap();
        assert_eq!(accepted, 10.0);
        assert!(session.is_dirty());

        let outputs = session.evaluate().unwrap();
        assert_eq!(outputs.lattice_seeds.len(), 16);
        assert_eq!(outputs.scale_factor, 1.0);
    }

    #[test]
    fn point_count_slider_resizes_cloud() {
        let mut session = Session::new(
            DatasetPreset::Carotid,
            field(&[[1.0, 1.0, 1.0]]),
            PreprocessConfig::default(),
        )
        .unwrap();
        assert_eq!(session.evaluate().unwrap().cloud_seeds.len(), 25);

        session.set_control("points", 60.0).unwrap();
        assert_eq!(session.evaluate().unwrap().cloud_seeds.len(), 60);
    }

    #[test]
    fn failed_recompute_keeps_previous_outputs() {
        let config = PreprocessConfig {
            max_seed_points: 400,
            ..PreprocessConfig::default()
        };
        let mut session =
            Session::new(DatasetPreset::TestData2, VectorField::default(), config).unwrap();
        let before = session.evaluate().unwrap().clone();
        assert_eq!(before.lattice_seeds.len(), 324);

        session.set_control("spacing", 1.0).unwrap();
        let err = session.evaluate().unwrap_err();
        assert!(matches!(err, SessionError::Preprocess(PreprocessError::InvalidInput(_))));
        assert_eq!(session.outputs(), Some(&before));
        assert!(session.is_dirty());
    }

    #[test]
    fn unknown_control_is_reported() {
        let mut session = Session::new(
            DatasetPreset::Carotid,
            VectorField::default(),
            PreprocessConfig::default(),
        )
        .unwrap();
        let err = session.set_control("Opacity", 0.2).unwrap_err();
        assert!(matches!(err, SessionError::Control(ControlError::UnknownControl(_))));
        assert!(session.is_dirty());
    }

    #[test]
    fn new_field_marks_session_dirty() {
        let mut session = Session::new(
            DatasetPreset::TestData1,
            field(&[[2.0, 0.0, 0.0]]),
            PreprocessConfig::default(),
        )
        .unwrap();
        assert!((session.evaluate().unwrap().scale_factor - 5.0).abs() < 1e-12);

        session.set_field(field(&[[0.0, 0.0, 4.0]]));
        assert!(session.is_dirty());
        assert!((session.evaluate().unwrap().scale_factor - 2.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PreprocessConfig {
            fallback_scale: -1.0,
            ..PreprocessConfig::default()
        };
        let err = Session::new(DatasetPreset::TestData1, VectorField::default(), config)
            .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}
