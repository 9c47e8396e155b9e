//! Core library for the weather lookup widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider abstraction and its OpenWeather implementation
//! - The location input field
//! - The lookup state machine the rendering layer observes
//!
//! It is used by `weather-lookup`, but any front end that can poll or subscribe
//! to a [`LookupMachine`] can drive it.

pub mod config;
pub mod input;
pub mod lookup;
pub mod model;
pub mod provider;

pub use config::Config;
pub use input::SearchBar;
pub use lookup::LookupMachine;
pub use model::{
    ConditionCategory, LOOKUP_FAILED_REASON, LookupOutcome, LookupRequest, LookupState,
    LookupView, PresentationHint, WeatherReading,
};
pub use provider::{LookupError, WeatherProvider, provider_from_config};
