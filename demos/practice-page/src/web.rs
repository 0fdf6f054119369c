use tether_platform::{WebOptions, run_web_page};
use wasm_bindgen::prelude::*;

use crate::{App, PageOptions};

/// Mounts the page. `options_json` is an optional `PageOptions` object.
#[wasm_bindgen]
pub fn start(mount_id: Option<String>, options_json: Option<String>) -> Result<(), JsValue> {
    let options = match options_json.as_deref() {
        Some(json) => PageOptions::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("bad page options: {e}")))?,
        None => PageOptions::default(),
    };
    run_web_page(move || App(&options), WebOptions::new(mount_id))
}
