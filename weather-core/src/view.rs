use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::classify::Effects;

/// The surface a presenter writes to. Implementations own their storage, so
/// every method takes `&self`.
pub trait ViewPort {
    fn set_location_name(&self, text: &str);
    fn set_timestamp(&self, text: &str);
    fn set_current_temp(&self, text: &str);
    fn set_feels_like(&self, text: &str);
    fn set_conditions(&self, text: &str);
    fn set_temp_max(&self, text: &str);
    fn set_temp_min(&self, text: &str);
    fn set_humidity(&self, text: &str);
    fn set_wind_speed(&self, text: &str);

    /// Replaces the single active background class.
    fn set_background_class(&self, class: &str);
    /// Replaces both effect toggles at once.
    fn set_effects(&self, effects: Effects);

    fn set_loading(&self, loading: bool);
    fn show_error(&self, message: &str);
    fn hide_error(&self);

    fn location_input(&self) -> String;
    fn clear_location_input(&self);
}

/// Everything a [`MemoryView`] currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub location_name: String,
    pub timestamp: String,
    pub current_temp: String,
    pub feels_like: String,
    pub conditions: String,
    pub temp_max: String,
    pub temp_min: String,
    pub humidity: String,
    pub wind_speed: String,
    pub background_class: String,
    pub effects: Effects,
    pub loading: bool,
    pub error: Option<String>,
    pub location_input: String,
}

impl ViewSnapshot {
    /// True once any report has been written.
    pub fn has_report(&self) -> bool {
        !self.location_name.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<ViewSnapshot>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &str) -> Self {
        let view = Self::new();
        view.set_input(input);
        view
    }

    /// Stand-in for the user typing into the location field.
    pub fn set_input(&self, input: &str) {
        self.state().location_input = input.to_string();
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, ViewSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewPort for MemoryView {
    fn set_location_name(&self, text: &str) {
        self.state().location_name = text.to_string();
    }

    fn set_timestamp(&self, text: &str) {
        self.state().timestamp = text.to_string();
    }

    fn set_current_temp(&self, text: &str) {
        self.state().current_temp = text.to_string();
    }

    fn set_feels_like(&self, text: &str) {
        self.state().feels_like = text.to_string();
    }

    fn set_conditions(&self, text: &str) {
        self.state().conditions = text.to_string();
    }

    fn set_temp_max(&self, text: &str) {
        self.state().temp_max = text.to_string();
    }

    fn set_temp_min(&self, text: &str) {
        self.state().temp_min = text.to_string();
    }

    fn set_humidity(&self, text: &str) {
        self.state().humidity = text.to_string();
    }

    fn set_wind_speed(&self, text: &str) {
        self.state().wind_speed = text.to_string();
    }

    fn set_background_class(&self, class: &str) {
        self.state().background_class = class.to_string();
    }

    fn set_effects(&self, effects: Effects) {
        self.state().effects = effects;
    }

    fn set_loading(&self, loading: bool) {
        self.state().loading = loading;
    }

    fn show_error(&self, message: &str) {
        self.state().error = Some(message.to_string());
    }

    fn hide_error(&self) {
        self.state().error = None;
    }

    fn location_input(&self) -> String {
        self.state().location_input.clone()
    }

    fn clear_location_input(&self) {
        self.state().location_input.clear();
    }
}
