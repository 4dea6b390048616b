//! cardlist-web — mounts the message list on the host page.
//!
//! Build with `wasm-pack build --target web rs/crates/cardlist-web` and load
//! the generated module from a page that provides `#input`, `#button` and
//! `#messages` (see `cardlist-page`).

use cardlist_core::{App, Config, ConfigError};
use wasm_bindgen::prelude::*;

pub mod dom;
pub mod logging;

pub use dom::WebDom;

/// Id of the optional `<script type="application/json">` config block.
pub const CONFIG_ELEMENT_ID: &str = "cardlist-config";

/// Config from the embedded block's text, or defaults when there is none.
fn config_from_text(text: Option<String>) -> Result<Config, ConfigError> {
    match text {
        Some(json) if !json.trim().is_empty() => Config::from_json(&json),
        _ => Ok(Config::default()),
    }
}

fn load_config(dom: &WebDom) -> Result<Config, ConfigError> {
    let text = dom
        .document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    config_from_text(text)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);

    let dom = WebDom::from_window().map_err(to_js)?;
    let config = load_config(&dom).map_err(to_js)?;
    let app = App::mount(dom, config).map_err(|e| {
        tracing::error!(error = %e, "cardlist failed to start");
        to_js(e)
    })?;
    app.forget();
    Ok(())
}
