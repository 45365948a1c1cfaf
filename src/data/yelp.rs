//! Yelp Fusion business search client
//!
//! Fetches up to 50 restaurants for a city from the business search endpoint
//! (through the response cache) and normalizes them into listings. Every field
//! of a business except `id` is optional; absent or mistyped values fall back
//! to `"N/A"` or zero.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{number_field, text_field, Listing, Provider, ProviderError, SearchTerm, NOT_AVAILABLE};
use crate::cache::{CacheStore, RequestParams};

/// Base URL for the Yelp business search API
pub const YELP_BASE_URL: &str = "https://api.yelp.com/v3/businesses/search";

/// Category filter sent with every search
const CATEGORIES: &str = "restaurants, All";

/// Maximum number of businesses requested per search
const RESULT_LIMIT: u32 = 50;

/// Business search response structure
///
/// Businesses stay untyped so a malformed field only defaults that one field.
#[derive(Debug, Deserialize)]
struct BusinessSearchResponse {
    businesses: Option<Vec<Value>>,
}

/// Client for searching restaurants through Yelp
#[derive(Debug, Clone)]
pub struct YelpClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl YelpClient {
    /// Creates a new YelpClient using the public business search endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, YELP_BASE_URL)
    }

    /// Creates a new YelpClient against a custom endpoint
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// The query parameters sent for a search
    ///
    /// The API key travels as a bearer token, not a parameter.
    pub fn request_params(&self, term: &SearchTerm) -> RequestParams {
        [
            ("categories", CATEGORIES.to_string()),
            ("location", term.to_string()),
            ("locale", "en_US".to_string()),
            ("limit", RESULT_LIMIT.to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    /// Searches for restaurants in the given city
    ///
    /// Returns the cached response if this exact request was made before,
    /// otherwise queries the API and caches the response.
    pub async fn search(
        &self,
        cache: &CacheStore,
        term: &SearchTerm,
    ) -> Result<Vec<Listing>, ProviderError> {
        let params = self.request_params(term);
        let body = cache
            .get_or_fetch(
                Provider::Yelp.store_id(),
                &self.base_url,
                &params,
                &self.api_key,
                || self.fetch(&params),
            )
            .await?;

        parse_listings(&body)
    }

    /// Sends the search request and returns the raw response body
    async fn fetch(&self, params: &RequestParams) -> Result<Value, ProviderError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        Ok(serde_json::from_str(&text)?)
    }
}

/// Normalizes a business search response body into listings
///
/// # Returns
/// * `Ok(Vec<Listing>)` - One listing per business with an `id`, in response order
/// * `Err(ProviderError::MissingField)` - If the body has no `businesses` list
pub fn parse_listings(body: &Value) -> Result<Vec<Listing>, ProviderError> {
    let response = BusinessSearchResponse::deserialize(body)?;
    let businesses = response
        .businesses
        .ok_or_else(|| ProviderError::MissingField("businesses".to_string()))?;

    let listings: Vec<Listing> = businesses.iter().filter_map(into_listing).collect();
    debug!(
        count = listings.len(),
        skipped = businesses.len() - listings.len(),
        "Parsed Yelp businesses"
    );

    Ok(listings)
}

/// Converts one business; `None` when it has no `id` to store it under
fn into_listing(business: &Value) -> Option<Listing> {
    let not_available = || NOT_AVAILABLE.to_string();
    let name = text_field(business, "name").unwrap_or_else(not_available);

    let Some(id) = text_field(business, "id").filter(|id| !id.is_empty()) else {
        warn!(name = %name, "Skipping Yelp business without id");
        return None;
    };

    Some(Listing {
        id,
        alias: Some(text_field(business, "alias").unwrap_or_else(not_available)),
        name,
        address: business
            .get("location")
            .and_then(display_address)
            .unwrap_or_else(not_available),
        phone: Some(text_field(business, "phone").unwrap_or_else(not_available)),
        rating: number_field(business, "rating").unwrap_or(0.0),
        rating_count: number_field(business, "review_count").unwrap_or(0.0),
        price: text_field(business, "price").unwrap_or_else(not_available),
    })
}

/// Joins the first two display-address lines
///
/// `None` when there are fewer than two lines or either line is not a string.
fn display_address(location: &Value) -> Option<String> {
    let lines = location.get("display_address")?.as_array()?;
    match lines.as_slice() {
        [first, second, ..] => Some(format!("{} {}", first.as_str()?, second.as_str()?)),
        _ => None,
    }
}
