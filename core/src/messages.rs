//! Widget Messages
//!
//! Immutable descriptions of an intent to change state. Messages are built by
//! the surface (or by the lookup bridge on completion) and consumed exactly
//! once by the reducer.
//!
//! # Wire Format
//!
//! Messages are internally tagged by `kind`, which is what headless scripts feed
//! in line by line:
//!
//! ```json
//! {"kind": "TextInputChanged", "text": "Paris"}
//! {"kind": "SubmitLookupRequested"}
//! {"kind": "LookupCompleted", "result": {"name": "Paris", "temperature": 15, "temperatureMax": 17, "temperatureMin": 12}}
//! {"kind": "LookupCompleted", "result": {"errorText": "not found"}}
//! {"kind": "EntryDeleted", "id": 1}
//! ```
//!
//! Any other `kind` decodes to [`Message::Unrecognized`].

use serde::{Deserialize, Serialize};

use crate::model::{EntryId, WeatherReport};

/// Outcome of one external lookup
///
/// A payload carrying `errorText` is a failure even if weather fields are
/// also present, so `Failed` is tried first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult {
    /// The lookup failed
    Failed {
        /// User-facing failure text
        #[serde(rename = "errorText")]
        error_text: String,
    },
    /// The provider returned weather fields
    Found(WeatherReport),
}

impl LookupResult {
    /// Shorthand for a failed result
    pub fn failed(error_text: impl Into<String>) -> Self {
        Self::Failed {
            error_text: error_text.into(),
        }
    }

    /// Whether this result carries an error marker
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl<E: std::fmt::Display> From<Result<WeatherReport, E>> for LookupResult {
    fn from(result: Result<WeatherReport, E>) -> Self {
        match result {
            Ok(report) => Self::Found(report),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Messages consumed by the reducer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Message {
    /// The user asked to look up `location_text`
    SubmitLookupRequested,

    /// An external lookup settled
    LookupCompleted {
        /// Weather fields or an error marker
        result: LookupResult,
    },

    /// The location input changed
    TextInputChanged {
        /// Full new input text
        text: String,
    },

    /// The user deleted a history entry
    EntryDeleted {
        /// Entry to remove
        id: EntryId,
    },

    /// A message kind this build does not know
    #[serde(other)]
    Unrecognized,
}

impl Message {
    /// Decode a message from its JSON wire form
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object with a `kind` field or
    /// if a known kind is missing its payload.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Short name used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SubmitLookupRequested => "SubmitLookupRequested",
            Self::LookupCompleted { .. } => "LookupCompleted",
            Self::TextInputChanged { .. } => "TextInputChanged",
            Self::EntryDeleted { .. } => "EntryDeleted",
            Self::Unrecognized => "Unrecognized",
        }
    }
}
