//! Widget State
//!
//! The single aggregate owned by the dispatch loop. Every transition builds a
//! fresh [`State`]; nothing outside the runtime holds on to an old snapshot.
//!
//! - [`Entry`]: one saved lookup in the history list
//! - [`WeatherReport`]: the most recent lookup result not yet superseded
//! - [`LookupStatus`]: idle / loading / error, with the error text folded in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a history entry
///
/// Issued from [`State::next_entry_id`] and never reused, so rows keep a stable
/// identity across renders even after deletions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    /// The id following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit system requested from the weather provider
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius
    #[default]
    Metric,
    /// Fahrenheit
    Imperial,
    /// Kelvin
    Standard,
}

impl Units {
    /// Query-string value understood by OpenWeather
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Suffix appended to rendered temperatures
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Self::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Self::Imperial),
            "standard" | "k" | "kelvin" => Ok(Self::Standard),
            other => Err(format!("unknown unit system '{other}'")),
        }
    }
}

/// Weather fields returned by a successful lookup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Location name as resolved by the provider
    pub name: String,
    /// Current temperature
    pub temperature: f64,
    /// Maximum temperature
    pub temperature_max: f64,
    /// Minimum temperature
    pub temperature_min: f64,
    /// When the provider observed these values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReport {
    /// Create a report without an observation time
    pub fn new(
        name: impl Into<String>,
        temperature: f64,
        temperature_max: f64,
        temperature_min: f64,
    ) -> Self {
        Self {
            name: name.into(),
            temperature,
            temperature_max,
            temperature_min,
            observed_at: None,
        }
    }

    /// Attach the observation time
    #[must_use]
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// One saved lookup in the history list
///
/// Created only by a successful lookup transition, removed only by an explicit
/// delete; never edited in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique, immutable identity
    pub id: EntryId,
    /// Location name
    pub location: String,
    /// Temperature at save time
    pub temperature: f64,
    /// Maximum temperature at save time
    pub temperature_max: f64,
    /// Minimum temperature at save time
    pub temperature_min: f64,
}

impl Entry {
    /// Build the history entry for a report
    #[must_use]
    pub fn from_report(id: EntryId, report: &WeatherReport) -> Self {
        Self {
            id,
            location: report.name.clone(),
            temperature: report.temperature,
            temperature_max: report.temperature_max,
            temperature_min: report.temperature_min,
        }
    }
}

/// Progress of the most recent lookup
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LookupStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// A lookup was submitted and has not completed
    Loading,
    /// The last lookup failed
    Error {
        /// User-facing failure text
        message: String,
    },
}

impl LookupStatus {
    /// Whether a lookup is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error text, present only in the error state
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Complete widget state snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Current free-text location input
    pub location_text: String,
    /// Most recent successful lookup
    pub pending_lookup: Option<WeatherReport>,
    /// Lookup progress (and error text)
    pub lookup_status: LookupStatus,
    /// Id handed to the next saved entry
    pub next_entry_id: EntryId,
    /// Saved lookups in display order
    pub history: Vec<Entry>,
    /// Unit system, fixed at startup
    pub units: Units,
}

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl State {
    /// State with no history
    #[must_use]
    pub fn empty() -> Self {
        Self {
            location_text: String::new(),
            pending_lookup: None,
            lookup_status: LookupStatus::Idle,
            next_entry_id: EntryId(1),
            history: Vec::new(),
            units: Units::Metric,
        }
    }

    /// Startup state with the London entry pre-seeded
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            next_entry_id: EntryId(2),
            history: vec![Entry {
                id: EntryId(1),
                location: "London".to_string(),
                temperature: 20.0,
                temperature_max: 20.0,
                temperature_min: 18.0,
            }],
            ..Self::empty()
        }
    }

    /// Same state with a different unit system
    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Error text of the last failed lookup
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.lookup_status.error_message()
    }

    /// Look up a history entry by id
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.history.iter().find(|e| e.id == id)
    }
}
