//! Terminal rendering of the lookup state.

use weather_core::{LookupOutcome, LookupState, LookupView, WeatherReading, model::NOT_FOUND_ASSET};

/// Marker shown while the entrance transition is active.
const SLIDE_MARKER: &str = "▾ ";

pub fn render(state: &LookupState) -> String {
    let marker = if state.submitted { SLIDE_MARKER } else { "" };

    match state.view() {
        LookupView::Blank if state.outcome == LookupOutcome::InFlight => {
            format!("{marker}Searching...")
        }
        LookupView::Blank => String::new(),
        LookupView::Reading(reading) => render_reading(reading, marker),
        LookupView::Error(reason) => {
            tracing::debug!(asset = NOT_FOUND_ASSET, "rendering lookup error");
            format!("✗ {reason}")
        }
    }
}

fn render_reading(reading: &WeatherReading, marker: &str) -> String {
    let hint = reading.hint();
    format!(
        "{marker}{glyph}  {temp}°C  {description}\n   Humidity {humidity}%   Wind Speed {wind} km/h",
        glyph = hint.glyph(),
        temp = display_temperature(reading.temperature_celsius),
        description = reading.condition_description,
        humidity = reading.humidity_percent,
        wind = reading.wind_speed_kmh,
    )
}

/// Round half up, so -2.5 shows as -2 and -0.4 as 0.
fn display_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}
