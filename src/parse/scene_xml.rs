//! Parser voor XML-scènebeschrijvingen.
//!
//! ```xml
//! <flowvis>
//!   <dataset name="carotid"/>
//!   <config target="10" fallback="1" max_points="1000000" seed="7"/>
//!   <source center="133.1,116.3,5" radius="2" count="25"/>
//!   <vectors>1 0 0  0 2 0</vectors>
//!   <slider id="spacing" value="5"/>
//! </flowvis>
//! ```

use std::num::ParseFloatError;

use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;

use crate::config::PreprocessConfig;
use crate::controls::{ControlError, ControlId};
use crate::field::{DatasetPreset, PreprocessError, SphereSeedSpec, VectorField};
use crate::session::{Session, SessionError};

/// Result type voor het parsen van scènes.
pub type ParseResult<T> = Result<T, ParseError>;

/// Beschrijft fouten tijdens het parsen.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Het XML-document kon niet gede-serialiseerd worden.
    #[error("XML parsefout: {0}")]
    Xml(#[from] quick_xml::DeError),
    /// Fout tijdens het converteren van numerieke waarden.
    #[error("ongeldige numerieke waarde: {0}")]
    Number(#[from] ParseFloatError),
    /// De inhoud is syntactisch goed maar niet bruikbaar.
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    /// Een slideroverride verwijst naar een onbekende slider.
    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Ingelezen scène, nog niet gevalideerd tegen de sliders.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub preset: DatasetPreset,
    pub config: PreprocessConfig,
    pub field: VectorField,
    /// `Some(None)` schakelt de standaard puntbron uit; `None` laat hem staan.
    pub point_source: Option<Option<SphereSeedSpec>>,
    pub sliders: Vec<(ControlId, f64)>,
}

impl Scene {
    /// Bouwt een sessie en past de slideroverrides in documentvolgorde toe.
    pub fn into_session(self) -> Result<Session, SessionError> {
        let mut session = Session::new(self.preset, self.field, self.config)?;
        if let Some(source) = self.point_source {
            session.set_point_source(source);
        }
        for (id, value) in self.sliders {
            session.set_control(id.key(), value)?;
        }
        Ok(session)
    }
}

/// Leest een scènedocument.
pub fn parse_str(input: &str) -> ParseResult<Scene> {
    log::debug!("Start parsing scènedocument");
    let document: SceneDocument = from_str(input)?;

    let preset: DatasetPreset = document.dataset.name.parse()?;
    let components = parse_numbers(document.vectors.as_deref().unwrap_or_default())?;
    let field = VectorField::from_components(&components)?;
    log::debug!("{} vectoren gelezen voor {preset}", field.len());

    // Het aantal punten van de bron loopt via de puntenslider, zodat een
    // latere `<slider id="points">` er nog overheen kan.
    #[allow(clippy::cast_precision_loss)]
    let source_count = document
        .source
        .as_ref()
        .filter(|source| source.enabled != Some(false))
        .and_then(|source| source.count)
        .map(|count| (ControlId::PointCount, count as f64));

    let point_source = document
        .source
        .map(|source| source.into_spec(preset))
        .transpose()?;

    let sliders = source_count
        .into_iter()
        .map(Ok::<_, ParseError>)
        .chain(
            document
                .sliders
                .into_iter()
                .map(|slider| -> ParseResult<(ControlId, f64)> {
                    Ok((slider.id.parse::<ControlId>()?, slider.value))
                }),
        )
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Scene {
        preset,
        config: document.config.unwrap_or_default(),
        field,
        point_source,
        sliders,
    })
}

fn parse_numbers(raw: &str) -> ParseResult<Vec<f64>> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().map_err(ParseError::from))
        .collect()
}

#[derive(Debug, Deserialize)]
struct SceneDocument {
    dataset: XmlDataset,
    #[serde(default)]
    config: Option<PreprocessConfig>,
    #[serde(default)]
    source: Option<XmlSource>,
    #[serde(default)]
    vectors: Option<String>,
    #[serde(default, rename = "slider")]
    sliders: Vec<XmlSlider>,
}

#[derive(Debug, Deserialize)]
struct XmlDataset {
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct XmlSource {
    #[serde(default, rename = "@enabled")]
    enabled: Option<bool>,
    #[serde(default, rename = "@center")]
    center: Option<String>,
    #[serde(default, rename = "@radius")]
    radius: Option<f64>,
    #[serde(default, rename = "@count")]
    count: Option<usize>,
}

impl XmlSource {
    fn into_spec(self, preset: DatasetPreset) -> ParseResult<Option<SphereSeedSpec>> {
        if self.enabled == Some(false) {
            return Ok(None);
        }

        let base = preset.point_source().unwrap_or(SphereSeedSpec {
            center: [0.0; 3],
            radius: 1.0,
            count: 25,
            seed: 0,
        });

        let center = match self.center.as_deref() {
            Some(raw) => match parse_numbers(raw)?.as_slice() {
                [x, y, z] => [*x, *y, *z],
                other => {
                    return Err(PreprocessError::invalid(format!(
                        "middelpunt verwacht drie coördinaten, kreeg {}",
                        other.len()
                    ))
                    .into());
                }
            },
            None => base.center,
        };

        Ok(Some(SphereSeedSpec {
            center,
            radius: self.radius.unwrap_or(base.radius),
            count: self.count.unwrap_or(base.count),
            seed: base.seed,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct XmlSlider {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@value")]
    value: f64,
}
