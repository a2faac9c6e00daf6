//! The settings panel: field rules, the view model and the controller.

mod controller;
mod fields;
mod view;

pub use controller::{register_menu_entry, SettingsPanel, LOAD_ERROR_DURATION, REFRESH_DELAY};
pub use fields::{apply_field_change, parse_threshold_input, visible_fields, Field, FieldChange};
pub use view::{FieldRow, FieldValue, PanelRenderer, PanelState, PanelView, SizeReadout};
