#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Voorbewerking voor vectorveldvisualisatie: schaalfactoren voor glyphs en
//! seedpunten voor stroomlijnen, met een slidertabel en sessiebeheer.

pub mod config;
pub mod controls;
pub mod field;
pub mod parse;
pub mod session;

use std::fmt;

use serde::Serialize;
use session::Session;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), wasm_bindgen::JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| wasm_bindgen::JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    session: Option<Session>,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            session: None,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een scènedocument en start een nieuwe sessie.
    #[wasm_bindgen]
    pub fn load_scene(&mut self, xml: &str) -> Result<(), JsValue> {
        let session = self.prepare_scene(xml).map_err(|err| js_error(&err))?;
        self.session = Some(session);
        Ok(())
    }

    /// Haal slider-specificaties op voor UI-generatie.
    #[wasm_bindgen]
    pub fn get_sliders(&self) -> Result<JsValue, JsValue> {
        let session = self.session().map_err(|err| js_error(&err))?;
        to_js_value(&session.sliders())
    }

    /// Stel een sliderwaarde in op basis van id of naam.
    #[wasm_bindgen]
    pub fn set_slider_value(&mut self, id_or_name: &str, value: f64) -> Result<f64, JsValue> {
        self.apply_slider(id_or_name, value)
            .map_err(|err| js_error(&err))
    }

    /// Herbereken schaalfactor en seeds wanneer er iets gewijzigd is.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.run_evaluation().map_err(|err| js_error(&err))
    }

    /// Haal de laatste geldige resultaten op.
    #[wasm_bindgen]
    pub fn get_outputs(&self) -> Result<JsValue, JsValue> {
        let session = self.session().map_err(|err| js_error(&err))?;
        match session.outputs() {
            Some(outputs) => to_js_value(outputs),
            None => Err(js_error("er is nog niet geëvalueerd")),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Zelfde als [`Engine::load_scene`], maar met een Rust-fout.
    pub fn prepare_scene(&self, xml: &str) -> Result<Session, String> {
        let scene = parse::scene_xml::parse_str(xml).map_err(|err| err.to_string())?;
        scene.into_session().map_err(|err| err.to_string())
    }

    pub fn session(&self) -> Result<&Session, String> {
        self.session
            .as_ref()
            .ok_or_else(|| "er is geen scène geladen".to_owned())
    }

    pub fn apply_slider(&mut self, id_or_name: &str, value: f64) -> Result<f64, String> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| "er is geen scène geladen".to_owned())?;
        session
            .set_control(id_or_name, value)
            .map_err(|err| err.to_string())
    }

    pub fn run_evaluation(&mut self) -> Result<(), String> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| "er is geen scène geladen".to_owned())?;
        #[cfg_attr(not(feature = "debug_logs"), allow(unused_variables))]
        let outputs = session.evaluate().map_err(|err| err.to_string())?;
        debug_log!(
            "evaluatie klaar: schaal {}, {} roosterseeds, {} bolseeds",
            outputs.scale_factor,
            outputs.lattice_seeds.len(),
            outputs.cloud_seeds.len()
        );
        Ok(())
    }

    /// Laadt een al opgebouwde sessie, bijvoorbeeld vanuit native code.
    pub fn install_session(&mut self, session: Session) {
        self.session = Some(session);
    }
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| js_error(&err))
}

fn js_error<E: fmt::Display + ?Sized>(error: &E) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(&error.to_string()).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = error;
        JsValue::NULL
    }
}
