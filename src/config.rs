//! Page Configuration
//!
//! Optional JSON settings embedded by the admin page as
//! `<script id="dependent-select-config" type="application/json">`.

use dependent_select::SelectorConfig;
use tracing::debug;
use web_sys::Document;

pub const CONFIG_ELEMENT_ID: &str = "dependent-select-config";

/// Page config, or the defaults when absent or invalid
pub fn load(document: &Document) -> SelectorConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SelectorConfig::default();
    };

    let config = SelectorConfig::from_json_or_default(&raw);
    debug!(?config, "page config");
    config
}
