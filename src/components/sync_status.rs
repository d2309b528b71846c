//! Sync Status Component
//!
//! Small indicator shown next to the staff select while a request is in flight.

use dependent_select::SyncState;
use leptos::prelude::*;

#[component]
pub fn SyncStatus(state: ReadSignal<SyncState>) -> impl IntoView {
    view! {
        <Show when=move || state.get().is_loading()>
            <span class="loading">"Loading..."</span>
        </Show>
    }
}
