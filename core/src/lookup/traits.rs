//! Weather Lookup Traits
//!
//! The capability the async action bridge calls to turn a free-text location
//! into weather fields. The dispatch loop never sees this trait; it only sees
//! the `LookupCompleted` message the bridge produces from its result.
//!
//! # Design Philosophy
//!
//! The `WeatherLookup` trait keeps provider details (URLs, auth, response
//! shapes) out of the widget:
//! - The TUI uses [`OpenWeatherLookup`](super::OpenWeatherLookup)
//! - Tests use in-memory fakes with scripted results and delays

use async_trait::async_trait;
use thiserror::Error;

use crate::model::WeatherReport;

/// Why a lookup produced no weather fields
///
/// The `Display` text is what ends up in the widget's error region.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The location input was blank
    #[error("Please enter a location")]
    EmptyQuery,

    /// No API key was configured
    #[error("No API key configured (set SKYCAST_API_KEY)")]
    MissingApiKey,

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an error
    #[error("Lookup failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider error text
        message: String,
    },

    /// The response did not carry the expected fields
    #[error("Unexpected response: {0}")]
    Malformed(String),
}

/// Weather lookup capability
///
/// Implement this trait to add another weather provider.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Resolve a location query into weather fields
    async fn lookup(&self, query: &str) -> Result<WeatherReport, LookupError>;
}

/// Reject blank queries before any request goes out
///
/// # Errors
///
/// Returns [`LookupError::EmptyQuery`] when `query` is empty or whitespace.
pub fn validate_query(query: &str) -> Result<&str, LookupError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(LookupError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}
