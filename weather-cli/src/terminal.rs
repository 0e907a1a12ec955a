use weather_core::{Effects, MemoryView, ViewPort, ViewSnapshot};

/// Terminal front-end: keeps state in a [`MemoryView`] and reports loading
/// and errors as they happen. The panel itself is printed on demand.
#[derive(Debug, Default)]
pub struct TerminalView {
    inner: MemoryView,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&self, input: &str) {
        self.inner.set_input(input);
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.snapshot()
    }

    pub fn print_panel(&self) {
        let snap = self.snapshot();
        if snap.has_report() {
            println!("{}", format_panel(&snap));
        }
    }
}

pub fn format_panel(snap: &ViewSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("📍 {}\n", snap.location_name));
    out.push_str(&format!("   {}\n", snap.timestamp));
    out.push_str(&format!("🌡️  {} ({})\n", snap.current_temp, snap.feels_like));
    out.push_str(&format!("☁️  {}\n", snap.conditions));
    out.push_str(&format!("📅 Today: {} / {}\n", snap.temp_max, snap.temp_min));
    out.push_str(&format!("💧 Humidity: {}   💨 Wind: {}\n", snap.humidity, snap.wind_speed));

    let mut classes = vec![snap.background_class.as_str()];
    classes.extend(snap.effects.classes());
    out.push_str(&format!("   [{}]", classes.join(" ").trim()));
    out
}

impl ViewPort for TerminalView {
    fn set_location_name(&self, text: &str) {
        self.inner.set_location_name(text);
    }

    fn set_timestamp(&self, text: &str) {
        self.inner.set_timestamp(text);
    }

    fn set_current_temp(&self, text: &str) {
        self.inner.set_current_temp(text);
    }

    fn set_feels_like(&self, text: &str) {
        self.inner.set_feels_like(text);
    }

    fn set_conditions(&self, text: &str) {
        self.inner.set_conditions(text);
    }

    fn set_temp_max(&self, text: &str) {
        self.inner.set_temp_max(text);
    }

    fn set_temp_min(&self, text: &str) {
        self.inner.set_temp_min(text);
    }

    fn set_humidity(&self, text: &str) {
        self.inner.set_humidity(text);
    }

    fn set_wind_speed(&self, text: &str) {
        self.inner.set_wind_speed(text);
    }

    fn set_background_class(&self, class: &str) {
        self.inner.set_background_class(class);
    }

    fn set_effects(&self, effects: Effects) {
        self.inner.set_effects(effects);
    }

    fn set_loading(&self, loading: bool) {
        if loading && !self.inner.snapshot().loading {
            eprintln!("Loading weather...");
        }
        self.inner.set_loading(loading);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
        self.inner.show_error(message);
    }

    fn hide_error(&self) {
        self.inner.hide_error();
    }

    fn location_input(&self) -> String {
        self.inner.location_input()
    }

    fn clear_location_input(&self) {
        self.inner.clear_location_input();
    }
}
