//! DOM Controls
//!
//! `HtmlSelectElement` handles implementing the course and staff controls.

use dependent_select::{preferred_selection, DependentControl, ParentControl, SelectOption};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlOptionElement, HtmlSelectElement};

/// Attribute an edit page may set to name the staff to restore
const CURRENT_VALUE_ATTR: &str = "data-current";

#[derive(Clone)]
pub struct DomSelect {
    element: HtmlSelectElement,
}

impl DomSelect {
    /// Looks up a `<select>` by id; `None` if missing or not a select
    pub fn find(document: &Document, id: &str) -> Option<Self> {
        let element = document.get_element_by_id(id)?;
        element
            .dyn_into::<HtmlSelectElement>()
            .ok()
            .map(|element| Self { element })
    }

    pub fn element(&self) -> &HtmlSelectElement {
        &self.element
    }
}

impl ParentControl for DomSelect {
    fn value(&self) -> String {
        self.element.value()
    }

    fn on_change(&self, handler: Box<dyn Fn()>) {
        let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
            handler();
        });
        if let Err(e) = self
            .element
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "could not bind change listener");
        }
        // Lives as long as the page
        on_change.forget();
    }
}

impl DependentControl for DomSelect {
    fn value(&self) -> String {
        self.element.value()
    }

    fn replace_options(&self, options: &[SelectOption]) {
        self.element.set_length(0);
        for option in options {
            let appended = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value)
                .and_then(|el| self.element.append_child(&el));
            if let Err(e) = appended {
                warn!(value = %option.value, error = ?e, "could not add option");
            }
        }
    }

    fn select(&self, value: &str) {
        self.element.set_value(value);
    }

    fn current_selection(&self) -> Option<String> {
        let recorded = self.element.get_attribute(CURRENT_VALUE_ATTR);
        preferred_selection(&self.element.value(), recorded.as_deref())
    }
}
