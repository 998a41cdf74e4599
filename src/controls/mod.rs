//! Slidertabel: één ingang die een sliderwaarde naar een parameterupdate vertaalt.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::field::DatasetPreset;

pub mod slider;

pub use slider::SliderSpec;

/// Identificatie van een bedieningselement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ControlId {
    #[serde(rename = "scale")]
    ScaleFactor,
    #[serde(rename = "cone_radius")]
    ConeRadius,
    #[serde(rename = "cone_height")]
    ConeHeight,
    #[serde(rename = "tube_radius")]
    TubeRadius,
    #[serde(rename = "spacing")]
    Spacing,
    #[serde(rename = "points")]
    PointCount,
}

impl ControlId {
    pub const ALL: &'static [Self] = &[
        Self::ScaleFactor,
        Self::ConeRadius,
        Self::ConeHeight,
        Self::TubeRadius,
        Self::Spacing,
        Self::PointCount,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ScaleFactor => "scale",
            Self::ConeRadius => "cone_radius",
            Self::ConeHeight => "cone_height",
            Self::TubeRadius => "tube_radius",
            Self::Spacing => "spacing",
            Self::PointCount => "points",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ControlId {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(s);
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key() == normalized)
            .ok_or_else(|| ControlError::UnknownControl(s.trim().to_owned()))
    }
}

/// Fouten bij het toepassen van een sliderwaarde.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("onbekende sliderreferentie `{0}`")]
    UnknownControl(String),
    #[error("sliderwaarde voor `{0}` moet een eindig getal zijn")]
    NonFinite(ControlId),
}

/// Parameters die door de sliders gestuurd worden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineParams {
    /// Doelgrootte voor de langste vector (hedgehog/glyph schaal).
    pub target_magnitude: f64,
    pub cone_radius: f64,
    pub cone_height: f64,
    pub tube_radius: f64,
    pub spacing: f64,
    pub point_count: usize,
}

type UpdateFn = fn(&mut PipelineParams, f64);

#[derive(Debug, Clone)]
struct Binding {
    spec: SliderSpec,
    update: UpdateFn,
}

/// Tabel van sliders, gesleuteld op [`ControlId`].
#[derive(Debug, Clone)]
pub struct ControlTable {
    bindings: BTreeMap<ControlId, Binding>,
}

impl ControlTable {
    /// Standaardsliders voor een dataset.
    #[must_use]
    pub fn for_preset(preset: DatasetPreset) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let initial_points = preset.point_source().map_or(25, |source| source.count) as f64;

        let mut table = Self {
            bindings: BTreeMap::new(),
        };
        table.insert(
            ControlId::ScaleFactor,
            SliderSpec::new("Scale Factor", 1.0, 50.0, 3.0),
            |params, value| params.target_magnitude = value,
        );
        table.insert(
            ControlId::ConeRadius,
            SliderSpec::new("Radius", 0.05, 0.5, 0.1),
            |params, value| params.cone_radius = value,
        );
        table.insert(
            ControlId::ConeHeight,
            SliderSpec::new("Height", 0.1, 2.0, 0.5),
            |params, value| params.cone_height = value,
        );
        table.insert(
            ControlId::TubeRadius,
            SliderSpec::new("Tube Radius", 0.1, 1.0, 0.3),
            |params, value| params.tube_radius = value,
        );
        table.insert(
            ControlId::Spacing,
            SliderSpec::new("Spacing", 1.0, 20.0, preset.default_spacing()).with_step(1.0),
            |params, value| params.spacing = value,
        );
        table.insert(
            ControlId::PointCount,
            SliderSpec::new("Number of Points", 10.0, 100.0, initial_points).with_step(1.0),
            set_point_count,
        );
        table
    }

    fn insert(&mut self, id: ControlId, spec: SliderSpec, update: UpdateFn) {
        self.bindings.insert(id, Binding { spec, update });
    }

    /// Parameters zoals ze volgen uit de huidige sliderstanden.
    #[must_use]
    pub fn params(&self) -> PipelineParams {
        let mut params = PipelineParams {
            target_magnitude: 0.0,
            cone_radius: 0.0,
            cone_height: 0.0,
            tube_radius: 0.0,
            spacing: 0.0,
            point_count: 0,
        };
        for binding in self.bindings.values() {
            (binding.update)(&mut params, binding.spec.value);
        }
        params
    }

    /// Zoekt een slider op id-sleutel of titel (hoofdletterongevoelig).
    #[must_use]
    pub fn find(&self, id_or_name: &str) -> Option<ControlId> {
        let normalized = normalize_name(id_or_name);
        if normalized.is_empty() {
            return None;
        }
        self.bindings.iter().find_map(|(id, binding)| {
            (id.key() == normalized || normalize_name(&binding.spec.title) == normalized)
                .then_some(*id)
        })
    }

    #[must_use]
    pub fn slider(&self, id: ControlId) -> Option<&SliderSpec> {
        self.bindings.get(&id).map(|binding| &binding.spec)
    }

    /// Alle sliders in vaste volgorde, voor UI-generatie.
    pub fn sliders(&self) -> impl Iterator<Item = (ControlId, &SliderSpec)> {
        self.bindings.iter().map(|(id, binding)| (*id, &binding.spec))
    }

    /// Past een nieuwe waarde toe; geeft de geklemde waarde terug.
    pub fn apply(
        &mut self,
        id: ControlId,
        value: f64,
        params: &mut PipelineParams,
    ) -> Result<f64, ControlError> {
        if !value.is_finite() {
            return Err(ControlError::NonFinite(id));
        }
        let binding = self
            .bindings
            .get_mut(&id)
            .ok_or_else(|| ControlError::UnknownControl(id.key().to_owned()))?;

        let accepted = binding.spec.constrain(value);
        binding.spec.value = accepted;
        (binding.update)(params, accepted);
        log::debug!("slider `{id}` gezet op {accepted}");
        Ok(accepted)
    }

    /// Zoals [`Self::apply`], maar met een id of titel als tekst.
    pub fn apply_named(
        &mut self,
        id_or_name: &str,
        value: f64,
        params: &mut PipelineParams,
    ) -> Result<(ControlId, f64), ControlError> {
        let id = self
            .find(id_or_name)
            .ok_or_else(|| ControlError::UnknownControl(id_or_name.trim().to_owned()))?;
        let accepted = self.apply(id, value, params)?;
        Ok((id, accepted))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn set_point_count(params: &mut PipelineParams, value: f64) {
    params.point_count = value.round().max(0.0) as usize;
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
