//! Core data models for the restaurant ratings CLI
//!
//! This module contains the listing types shared by both search providers,
//! together with the provider clients and the list of searchable states.

pub mod google;
pub mod states;
pub mod yelp;

pub use google::GoogleClient;
pub use states::{is_valid_state, US_STATES};
pub use yelp::YelpClient;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Placeholder stored for any field a provider omitted
pub const NOT_AVAILABLE: &str = "N/A";

/// The search providers listings can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    Yelp,
}

impl Provider {
    /// Parses a provider name, ignoring case and surrounding whitespace
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Some(Provider::Google),
            "yelp" => Some(Provider::Yelp),
            _ => None,
        }
    }

    /// Identifier of this provider's response cache
    pub fn store_id(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Yelp => "yelp",
        }
    }

    /// Human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Yelp => "Yelp",
        }
    }

    /// The price levels this provider reports, cheapest first
    pub fn price_buckets(&self) -> &'static [&'static str] {
        match self {
            Provider::Google => &["0", "1", "2", "3", "4"],
            Provider::Yelp => &["$", "$$", "$$$", "$$$$"],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A city and state pair to search for, both lower-cased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub city: String,
    pub state: String,
}

impl SearchTerm {
    pub fn new(city: &str, state: &str) -> Self {
        Self {
            city: city.trim().to_lowercase(),
            state: state.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for SearchTerm {
    /// Renders as `"<city>, <state>"`, the form both providers accept as a location
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// A restaurant listing normalized from either provider's response
///
/// Text fields the provider omitted hold `"N/A"`; numeric fields hold `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Provider-assigned identifier (Google `place_id`, Yelp `id`)
    pub id: String,
    /// Yelp URL alias; `None` for Google listings
    pub alias: Option<String>,
    /// Display name
    pub name: String,
    /// Formatted street address
    pub address: String,
    /// Phone number; `None` for Google listings
    pub phone: Option<String>,
    /// Average rating on the provider's scale
    pub rating: f64,
    /// Number of ratings (Google) or reviews (Yelp)
    pub rating_count: f64,
    /// Price level label, or `"N/A"` when unknown
    pub price: String,
}

/// Reads `name` from a response object when it holds a string
pub(crate) fn text_field(item: &Value, name: &str) -> Option<String> {
    item.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Reads `name` from a response object when it holds a number
pub(crate) fn number_field(item: &Value, name: &str) -> Option<f64> {
    item.get(name).and_then(Value::as_f64)
}

/// Errors that can occur when searching a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The provider answered but reported a failure
    #[error("{provider} returned status {status}")]
    BadStatus { provider: Provider, status: String },

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Reading or writing the response cache failed
    #[error("Cache error: {0}")]
    CacheError(#[from] std::io::Error),
}
