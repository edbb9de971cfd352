//! Browser bindings
//!
//! A thin wasm-bindgen handle over [`Race`]. Everything crosses the
//! boundary as JSON strings so the front-end keeps its own types.

use wasm_bindgen::prelude::*;

use crate::settings::RaceSettings;
use crate::sim::{CarConfig, PlayerInputs, Race};

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Install the panic hook and console logger (idempotent)
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init returns an error we don't care about
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WasmRace {
    race: Race,
}

#[wasm_bindgen]
impl WasmRace {
    /// `seed` of `undefined` picks a random seed
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, cars_json: &str, seed: Option<u64>) -> Result<WasmRace, JsValue> {
        let settings = RaceSettings::from_json(settings_json).map_err(to_js)?;
        let configs: Vec<CarConfig> = serde_json::from_str(cars_json).map_err(to_js)?;
        let race = match seed {
            Some(seed) => Race::with_seed(settings, &configs, seed),
            None => Race::new(settings, &configs),
        }
        .map_err(to_js)?;
        Ok(WasmRace { race })
    }

    /// Advance by `dt` ms. `inputs_json` maps player index to input flags;
    /// an empty string means no human input this frame.
    pub fn tick(&mut self, dt: f32, inputs_json: &str) -> Result<bool, JsValue> {
        let inputs: PlayerInputs = if inputs_json.trim().is_empty() {
            PlayerInputs::new()
        } else {
            serde_json::from_str(inputs_json).map_err(to_js)?
        };
        self.race.tick(dt, &inputs);
        Ok(self.race.finished)
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.race.finished
    }

    #[wasm_bindgen(js_name = carsJson)]
    pub fn cars_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.race.cars).map_err(to_js)
    }

    #[wasm_bindgen(js_name = standingsJson)]
    pub fn standings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.race.standings()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = trackJson)]
    pub fn track_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.race.dimensions).map_err(to_js)
    }

    /// Flat `[x, y, rotation, ...]` per car, in car order
    #[wasm_bindgen(js_name = carPoses)]
    pub fn car_poses(&self) -> Vec<f32> {
        self.race
            .car_poses()
            .into_iter()
            .flat_map(|(p, r)| [p.x, p.y, r])
            .collect()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.race.snapshot_json().map_err(to_js)
    }

    pub fn restore(json: &str) -> Result<WasmRace, JsValue> {
        let race = Race::restore_json(json).map_err(to_js)?;
        Ok(WasmRace { race })
    }
}
