/// Fixed, user-facing reason for every failed lookup.
pub const LOOKUP_FAILED_REASON: &str = "Oops! Location not found!";

/// Asset shown next to a failed lookup.
pub const NOT_FOUND_ASSET: &str = "./assets/404.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub location_query: String,
}

impl LookupRequest {
    /// The query is carried verbatim; empty and whitespace-only strings are left
    /// for the provider to reject.
    pub fn new(location_query: impl Into<String>) -> Self {
        Self { location_query: location_query.into() }
    }
}

/// Coarse weather classification reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Clear,
    Rain,
    Snow,
    Clouds,
    Mist,
    Haze,
    Other,
}

impl ConditionCategory {
    /// Exact, case-sensitive match on the provider's `weather[].main` value.
    pub fn from_provider(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Clouds" => Self::Clouds,
            "Mist" => Self::Mist,
            "Haze" => Self::Haze,
            _ => Self::Other,
        }
    }

    pub fn hint(&self) -> PresentationHint {
        match self {
            Self::Clear => PresentationHint::Clear,
            Self::Rain => PresentationHint::Rain,
            Self::Snow => PresentationHint::Snow,
            Self::Clouds | Self::Other => PresentationHint::Cloud,
            Self::Mist | Self::Haze => PresentationHint::Mist,
        }
    }
}

/// Display image derived from a [`ConditionCategory`]. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationHint {
    Clear,
    Rain,
    Snow,
    Cloud,
    Mist,
}

impl PresentationHint {
    pub fn image_id(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Cloud => "cloud",
            Self::Mist => "mist",
        }
    }

    pub fn asset_path(&self) -> String {
        format!("./assets/{}.png", self.image_id())
    }

    /// Single-glyph stand-in for the image on a terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Cloud => "☁",
            Self::Mist => "≋",
        }
    }
}

impl std::fmt::Display for PresentationHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.image_id())
    }
}

/// Result of a successful lookup. Built in one piece from a complete provider
/// response, so a partially populated reading cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub condition_description: String,
    pub condition_category: ConditionCategory,
    pub humidity_percent: u8,
    pub wind_speed_kmh: f64,
}

impl WeatherReading {
    pub fn hint(&self) -> PresentationHint {
        self.condition_category.hint()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupOutcome {
    #[default]
    Idle,
    InFlight,
    Succeeded(WeatherReading),
    Failed(String),
}

impl LookupOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn reading(&self) -> Option<&WeatherReading> {
        match self {
            Self::Succeeded(reading) => Some(reading),
            _ => None,
        }
    }
}

/// What the rendering layer should draw for a given [`LookupState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupView<'a> {
    Blank,
    Reading(&'a WeatherReading),
    Error(&'a str),
}

/// Observable snapshot published by the lookup machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupState {
    pub outcome: LookupOutcome,
    /// Reading kept on screen while a newer lookup is in flight.
    pub stale: Option<WeatherReading>,
    /// Set on every submission, cleared when the transition window ends.
    pub submitted: bool,
}

impl LookupState {
    pub fn view(&self) -> LookupView<'_> {
        match &self.outcome {
            LookupOutcome::Idle => LookupView::Blank,
            LookupOutcome::InFlight => match &self.stale {
                Some(reading) => LookupView::Reading(reading),
                None => LookupView::Blank,
            },
            LookupOutcome::Succeeded(reading) => LookupView::Reading(reading),
            LookupOutcome::Failed(reason) => LookupView::Error(reason),
        }
    }

    /// The reading currently on display, if any.
    pub fn displayed_reading(&self) -> Option<&WeatherReading> {
        match self.view() {
            LookupView::Reading(reading) => Some(reading),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> WeatherReading {
        WeatherReading {
            temperature_celsius: 21.4,
            condition_description: "light rain".into(),
            condition_category: ConditionCategory::Rain,
            humidity_percent: 55,
            wind_speed_kmh: 12.3,
        }
    }

    #[test]
    fn known_categories_parse_exactly() {
        assert_eq!(ConditionCategory::from_provider("Clear"), ConditionCategory::Clear);
        assert_eq!(ConditionCategory::from_provider("Haze"), ConditionCategory::Haze);
        assert_eq!(ConditionCategory::from_provider("clear"), ConditionCategory::Other);
    }

    #[test]
    fn unknown_categories_fall_back_to_cloud() {
        for main in ["Thunderstorm", "Drizzle", "Smoke", "Dust", "Fog", "Tornado", ""] {
            let hint = ConditionCategory::from_provider(main).hint();
            assert_eq!(hint, PresentationHint::Cloud, "category {main:?}");
        }
    }

    #[test]
    fn mist_and_haze_share_an_image() {
        assert_eq!(ConditionCategory::Mist.hint().image_id(), "mist");
        assert_eq!(ConditionCategory::Haze.hint().image_id(), "mist");
        assert_eq!(ConditionCategory::Clouds.hint().image_id(), "cloud");
        assert_eq!(ConditionCategory::Snow.hint().asset_path(), "./assets/snow.png");
    }

    #[test]
    fn in_flight_view_keeps_stale_reading() {
        let state = LookupState {
            outcome: LookupOutcome::InFlight,
            stale: Some(reading()),
            submitted: true,
        };
        assert_eq!(state.view(), LookupView::Reading(&reading()));
    }

    #[test]
    fn failed_view_shows_only_the_error() {
        let state = LookupState {
            outcome: LookupOutcome::Failed(LOOKUP_FAILED_REASON.into()),
            stale: Some(reading()),
            submitted: false,
        };
        assert_eq!(state.view(), LookupView::Error(LOOKUP_FAILED_REASON));
        assert!(state.displayed_reading().is_none());
    }

    #[test]
    fn idle_is_blank() {
        assert_eq!(LookupState::default().view(), LookupView::Blank);
    }
}
