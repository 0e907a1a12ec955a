use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tracing::{debug, error, info};

use crate::{
    client::WeatherClient,
    clock::{Clock, SystemClock},
    model::{LocationQuery, WeatherReport},
    render::{DisplayFields, render},
    view::ViewPort,
};

pub const SUBMIT_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again.";
pub const INITIAL_LOAD_ERROR_MESSAGE: &str = "Failed to load initial weather data.";

/// What triggered a load. Only affects messages and input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    PageLoad,
    Submit,
}

impl LoadOrigin {
    fn error_message(self) -> &'static str {
        match self {
            LoadOrigin::PageLoad => INITIAL_LOAD_ERROR_MESSAGE,
            LoadOrigin::Submit => SUBMIT_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The report was written to the view.
    Rendered,
    /// The fetch failed and the error message is showing.
    Failed,
    /// A newer load was issued while this one was in flight; its result was dropped.
    Superseded,
    /// Blank input, nothing was fetched.
    Skipped,
}

/// Drives a [`WeatherClient`] and writes results to a [`ViewPort`].
#[derive(Debug)]
pub struct WeatherPresenter<C, V, K = SystemClock> {
    client: C,
    view: V,
    clock: K,
    default_location: LocationQuery,
    latest_request: AtomicU64,
    last_report: Mutex<Option<WeatherReport>>,
}

impl<C, V> WeatherPresenter<C, V, SystemClock>
where
    C: WeatherClient,
    V: ViewPort,
{
    pub fn new(client: C, view: V) -> Self {
        Self::with_clock(client, view, SystemClock)
    }
}

impl<C, V, K> WeatherPresenter<C, V, K>
where
    C: WeatherClient,
    V: ViewPort,
    K: Clock,
{
    pub fn with_clock(client: C, view: V, clock: K) -> Self {
        Self {
            client,
            view,
            clock,
            default_location: LocationQuery::default_location(),
            latest_request: AtomicU64::new(0),
            last_report: Mutex::new(None),
        }
    }

    pub fn with_default_location(mut self, location: LocationQuery) -> Self {
        self.default_location = location;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Last report that made it onto the view.
    pub fn last_report(&self) -> Option<WeatherReport> {
        self.last_report.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Page-load path: fetch the default location.
    pub async fn load_initial(&self) -> LoadOutcome {
        let location = self.default_location.clone();
        self.load(&location, LoadOrigin::PageLoad).await
    }

    /// Form path: fetch whatever is in the location input.
    pub async fn submit(&self) -> LoadOutcome {
        let Some(location) = LocationQuery::parse(&self.view.location_input()) else {
            debug!("empty location submitted, nothing to fetch");
            return LoadOutcome::Skipped;
        };

        info!(%location, "fetching weather");
        self.load(&location, LoadOrigin::Submit).await
    }

    pub async fn load(&self, location: &LocationQuery, origin: LoadOrigin) -> LoadOutcome {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        self.view.set_loading(true);
        if origin == LoadOrigin::Submit {
            self.view.hide_error();
        }

        let result = self.client.fetch(location).await;

        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!(%location, request_id, "dropping response for superseded request");
            return LoadOutcome::Superseded;
        }

        let outcome = match result {
            Ok(report) => {
                self.show(&report);
                *self.last_report.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
                if origin == LoadOrigin::Submit {
                    self.view.clear_location_input();
                }
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!(%location, error = %e, ?origin, "failed to fetch weather");
                self.view.show_error(origin.error_message());
                LoadOutcome::Failed
            }
        };

        self.view.set_loading(false);
        outcome
    }

    fn show(&self, report: &WeatherReport) {
        let fields = render(report, self.clock.now());
        apply(&self.view, &fields);
    }
}

/// Write rendered fields to a view. Fields absent from the report keep
/// whatever the view already shows.
pub fn apply<V: ViewPort + ?Sized>(view: &V, fields: &DisplayFields) {
    view.set_location_name(&fields.location_name);
    view.set_timestamp(&fields.timestamp);

    if let Some(current) = &fields.current {
        view.set_current_temp(&current.temperature);
        view.set_feels_like(&current.feels_like);
        view.set_conditions(&current.conditions);
        view.set_humidity(&current.humidity);
        view.set_wind_speed(&current.wind_speed);
    }

    if let Some(scene) = &fields.scene {
        view.set_background_class(&scene.background_class);
        view.set_effects(scene.effects);
    }

    if let Some(today) = &fields.today {
        view.set_temp_max(&today.temp_max);
        view.set_temp_min(&today.temp_min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::Effects,
        clock::FixedClock,
        error::FetchError,
        model::{CurrentConditions, DailyForecast},
        view::MemoryView,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::{collections::HashMap, sync::atomic::AtomicUsize, time::Duration};

    #[derive(Debug, Clone)]
    enum Canned {
        Report(WeatherReport),
        Status(u16),
    }

    #[derive(Debug, Default)]
    struct FakeClient {
        responses: HashMap<String, (Canned, Duration)>,
        calls: AtomicUsize,
    }

    impl FakeClient {
        fn respond(mut self, location: &str, canned: Canned) -> Self {
            self.responses.insert(location.to_string(), (canned, Duration::ZERO));
            self
        }

        fn respond_after(mut self, location: &str, canned: Canned, delay: Duration) -> Self {
            self.responses.insert(location.to_string(), (canned, delay));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherClient for FakeClient {
        async fn fetch(&self, location: &LocationQuery) -> Result<WeatherReport, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (canned, delay) = self
                .responses
                .get(location.as_str())
                .cloned()
                .unwrap_or((Canned::Status(404), Duration::ZERO));

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match canned {
                Canned::Report(report) => Ok(report),
                Canned::Status(status) => Err(FetchError::Http { status }),
            }
        }
    }

    fn report(address: &str, temp: f64, conditions: &str) -> WeatherReport {
        WeatherReport {
            resolved_address: address.into(),
            timezone: "Europe/London".into(),
            current_conditions: Some(CurrentConditions {
                temp: Some(temp),
                feelslike: Some(temp - 1.0),
                conditions: conditions.into(),
                icon: None,
                humidity: Some(65.0),
                windspeed: Some(10.2),
            }),
            days: vec![DailyForecast {
                datetime: None,
                tempmax: Some(temp + 3.0),
                tempmin: Some(temp - 5.0),
                conditions: conditions.into(),
            }],
        }
    }

    fn midday() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap())
    }

    fn presenter(client: FakeClient, view: MemoryView) -> WeatherPresenter<FakeClient, MemoryView, FixedClock> {
        WeatherPresenter::with_clock(client, view, midday())
    }

    #[tokio::test]
    async fn initial_load_renders_default_location() {
        let client = FakeClient::default()
            .respond("London,UK", Canned::Report(report("London, UK", 15.6, "Rain")));
        let p = presenter(client, MemoryView::new());

        assert_eq!(p.load_initial().await, LoadOutcome::Rendered);

        let snap = p.view().snapshot();
        assert_eq!(snap.location_name, "London, UK");
        assert_eq!(snap.current_temp, "16°C");
        assert_eq!(snap.feels_like, "Feels like 15°C");
        assert_eq!(snap.temp_max, "19°C");
        assert_eq!(snap.temp_min, "11°C");
        assert_eq!(snap.humidity, "65%");
        assert_eq!(snap.wind_speed, "10 km/h");
        assert_eq!(snap.background_class, "weather-rain day");
        assert_eq!(snap.effects, Effects { rain: true, sun_rays: false });
        assert!(!snap.loading);
        assert_eq!(snap.error, None);
        assert!(p.last_report().is_some());
    }

    #[tokio::test]
    async fn initial_load_failure_shows_initial_message() {
        let p = presenter(FakeClient::default(), MemoryView::new());

        assert_eq!(p.load_initial().await, LoadOutcome::Failed);

        let snap = p.view().snapshot();
        assert_eq!(snap.error.as_deref(), Some(INITIAL_LOAD_ERROR_MESSAGE));
        assert!(!snap.loading);
        assert!(!snap.has_report());
    }

    #[tokio::test]
    async fn submit_renders_and_clears_input() {
        let client = FakeClient::default()
            .respond("Paris,FR", Canned::Report(report("Paris, France", 21.0, "Clear")));
        let p = presenter(client, MemoryView::with_input("  Paris,FR  "));

        assert_eq!(p.submit().await, LoadOutcome::Rendered);

        let snap = p.view().snapshot();
        assert_eq!(snap.location_name, "Paris, France");
        assert_eq!(snap.location_input, "");
        assert_eq!(snap.effects, Effects { rain: false, sun_rays: true });
    }

    #[tokio::test]
    async fn blank_submit_does_nothing() {
        let p = presenter(FakeClient::default(), MemoryView::with_input("   "));
        let before = p.view().snapshot();

        assert_eq!(p.submit().await, LoadOutcome::Skipped);

        assert_eq!(p.client().calls(), 0);
        assert_eq!(p.view().snapshot(), before);
    }

    #[tokio::test]
    async fn failed_submit_keeps_previous_report_and_input() {
        let client = FakeClient::default()
            .respond("London,UK", Canned::Report(report("London, UK", 15.6, "Overcast")))
            .respond("Nowhere", Canned::Status(401));
        let p = presenter(client, MemoryView::new());
        p.load_initial().await;
        let rendered = p.view().snapshot();

        p.view().set_input("Nowhere");
        assert_eq!(p.submit().await, LoadOutcome::Failed);

        let snap = p.view().snapshot();
        assert_eq!(snap.error.as_deref(), Some(SUBMIT_ERROR_MESSAGE));
        assert!(!snap.loading);
        assert_eq!(snap.location_input, "Nowhere");
        assert_eq!(snap.current_temp, rendered.current_temp);
        assert_eq!(snap.location_name, rendered.location_name);
        assert_eq!(p.last_report().unwrap().resolved_address, "London, UK");
    }

    #[tokio::test]
    async fn submit_clears_previous_error() {
        let client = FakeClient::default()
            .respond("Oslo", Canned::Report(report("Oslo, Norway", -3.5, "Snow")));
        let p = presenter(client, MemoryView::new());
        p.load_initial().await;
        assert!(p.view().snapshot().error.is_some());

        p.view().set_input("Oslo");
        p.submit().await;

        let snap = p.view().snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.current_temp, "-3°C");
        assert_eq!(snap.background_class, "weather-snow day");
    }

    #[tokio::test]
    async fn effects_do_not_stack_across_renders() {
        let client = FakeClient::default()
            .respond("A", Canned::Report(report("A", 10.0, "Thunderstorm")))
            .respond("B", Canned::Report(report("B", 10.0, "Fog")));
        let p = presenter(client, MemoryView::new());

        p.load(&LocationQuery::parse("A").unwrap(), LoadOrigin::Submit).await;
        assert!(p.view().snapshot().effects.rain);

        p.load(&LocationQuery::parse("B").unwrap(), LoadOrigin::Submit).await;
        let snap = p.view().snapshot();
        assert_eq!(snap.effects, Effects::default());
        assert_eq!(snap.background_class, "weather-fog day");
    }

    #[tokio::test]
    async fn rendering_same_report_twice_is_stable() {
        let client = FakeClient::default()
            .respond("London,UK", Canned::Report(report("London, UK", 7.5, "Mist")));
        let p = presenter(client, MemoryView::new());

        p.load_initial().await;
        let first = p.view().snapshot();
        p.load_initial().await;

        assert_eq!(p.view().snapshot(), first);
    }

    #[tokio::test]
    async fn slow_earlier_response_does_not_overwrite_later_one() {
        let client = FakeClient::default()
            .respond_after("Slow", Canned::Report(report("Slow", 1.0, "Rain")), Duration::from_millis(50))
            .respond("Fast", Canned::Report(report("Fast", 30.0, "Sunny")));
        let p = presenter(client, MemoryView::new());
        let slow = LocationQuery::parse("Slow").unwrap();
        let fast = LocationQuery::parse("Fast").unwrap();

        let (first, second) = tokio::join!(
            p.load(&slow, LoadOrigin::Submit),
            p.load(&fast, LoadOrigin::Submit),
        );

        assert_eq!(first, LoadOutcome::Superseded);
        assert_eq!(second, LoadOutcome::Rendered);
        let snap = p.view().snapshot();
        assert_eq!(snap.location_name, "Fast");
        assert_eq!(snap.current_temp, "30°C");
        assert!(!snap.loading);
        assert_eq!(p.last_report().unwrap().resolved_address, "Fast");
    }

    #[tokio::test]
    async fn previous_report_stays_visible_while_loading() {
        let client = FakeClient::default()
            .respond("London,UK", Canned::Report(report("London, UK", 15.6, "Overcast")))
            .respond_after("Lima", Canned::Report(report("Lima, Peru", 24.0, "Sunny")), Duration::from_millis(50));
        let p = presenter(client, MemoryView::new());
        p.load_initial().await;

        let lima = LocationQuery::parse("Lima").unwrap();
        let in_flight = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            p.view().snapshot()
        };
        let (outcome, during) = tokio::join!(p.load(&lima, LoadOrigin::Submit), in_flight);

        assert!(during.loading);
        assert_eq!(during.location_name, "London, UK");
        assert_eq!(during.current_temp, "16°C");
        assert_eq!(during.error, None);

        assert_eq!(outcome, LoadOutcome::Rendered);
        let after = p.view().snapshot();
        assert!(!after.loading);
        assert_eq!(after.location_name, "Lima, Peru");
        assert_eq!(after.current_temp, "24°C");
    }

    #[tokio::test]
    async fn night_render_uses_night_background() {
        let client = FakeClient::default()
            .respond("London,UK", Canned::Report(report("London, UK", 5.0, "Clear")));
        let night = FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 23, 30, 0).unwrap());
        let p = WeatherPresenter::with_clock(client, MemoryView::new(), night);

        p.load_initial().await;

        let snap = p.view().snapshot();
        assert_eq!(snap.background_class, "weather-clear night");
        assert!(!snap.effects.sun_rays);
    }
}
