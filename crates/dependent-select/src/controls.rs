//! Controls
//!
//! The two selection controls the synchronizer is bound to. Both are owned by
//! the surrounding form; implementations are handles, not the controls.

use crate::model::SelectOption;

/// The control whose value drives the dependent list (the course select)
pub trait ParentControl {
    /// Current value, empty when nothing is selected
    fn value(&self) -> String;

    /// Registers a handler invoked every time the user changes the value
    fn on_change(&self, handler: Box<dyn Fn()>);
}

/// The control whose options are rebuilt on every sync (the staff select)
pub trait DependentControl {
    fn value(&self) -> String;

    /// Replaces the whole option list. Selection afterwards follows native
    /// select behaviour (first option).
    fn replace_options(&self, options: &[SelectOption]);

    /// Marks the option with `value` as selected
    fn select(&self, value: &str);

    /// Value to restore when the form is loaded in edit mode
    fn current_selection(&self) -> Option<String> {
        preferred_selection(&self.value(), None)
    }
}

/// Staff value an edit form asks to restore: the control's own value, else
/// the value the page recorded separately (e.g. a `data-current` attribute).
pub fn preferred_selection(value: &str, recorded: Option<&str>) -> Option<String> {
    [Some(value), recorded]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
