//! Weather Lookup
//!
//! Abstracted access to weather providers through a common trait.
//!
//! # Available Providers
//!
//! - **OpenWeather**: current-weather REST endpoint (default)
//!
//! # Usage
//!
//! ```ignore
//! use skycast_core::lookup::{OpenWeatherLookup, WeatherLookup};
//!
//! let lookup = OpenWeatherLookup::from_env()?;
//! let report = lookup.lookup("Paris").await?;
//! ```

mod openweather;
mod traits;

pub use openweather::{parse_response, OpenWeatherLookup};
pub use traits::{validate_query, LookupError, WeatherLookup};
