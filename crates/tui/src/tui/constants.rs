use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Countdowns are rendered to whole seconds, so redraw once per second.
pub(crate) const TICK_RATE: Duration = Duration::from_secs(1);

pub(crate) const STATUS_FORM_ADD: &str =
    "New task — Tab switches fields • Enter saves • Esc cancels";
pub(crate) const STATUS_FORM_EDIT: &str =
    "Edit task — Tab switches fields • Enter saves • Esc cancels";
pub(crate) const STATUS_VIEW_DETAILS: &str = "Viewing task details • Enter/Esc to close";
pub(crate) const STATUS_HELP: &str = "Keyboard reference — Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion — arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_REFRESHED: &str = "Reloaded tasks from the store";
