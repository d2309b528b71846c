//! Course/Staff Selector Entry Point
//!
//! Binds the staff select to the course select on the admin student form.

mod components;
mod config;
mod dom;
mod http;
mod logging;

use components::SyncStatus;
use dependent_select::{DependentSelect, SyncState};
use dom::DomSelect;
use http::HttpStaffSource;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, info};
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let config = config::load(&document);

    // Pages without both selects are left untouched
    let (Some(course), Some(staff)) = (
        DomSelect::find(&document, &config.parent_id),
        DomSelect::find(&document, &config.dependent_id),
    ) else {
        debug!(parent = %config.parent_id, dependent = %config.dependent_id, "selects not found");
        return;
    };

    let set_status = mount_status(&staff);
    let source = HttpStaffSource::new(config.endpoint.clone(), config.request_timeout_ms);
    let sync = DependentSelect::initialize(course, staff, source, config.labels, |task| {
        spawn_local(task)
    });
    if let Some(set_status) = set_status {
        sync.on_state_change(move |state| set_status.set(state.clone()));
    }
    info!(endpoint = %config.endpoint.path, "staff select bound to course select");

    // Change handlers only hold a weak reference; keep the synchronizer for the page lifetime
    std::mem::forget(sync);
}

/// Mounts the loading indicator right after the staff select
fn mount_status(staff: &DomSelect) -> Option<WriteSignal<SyncState>> {
    let document = staff.element().owner_document()?;
    let anchor = document
        .create_element("span")
        .ok()?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()?;
    anchor.set_class_name("dependent-select-status");
    staff.element().after_with_node_1(&anchor).ok()?;

    let (state, set_state) = signal(SyncState::Empty);
    leptos::mount::mount_to(anchor, move || view! { <SyncStatus state=state /> }).forget();
    Some(set_state)
}
