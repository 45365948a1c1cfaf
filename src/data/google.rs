//! Google Places text search client
//!
//! Fetches restaurant search results for a city from the Places text search
//! endpoint (through the response cache) and normalizes them into listings.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{number_field, text_field, Listing, Provider, ProviderError, SearchTerm, NOT_AVAILABLE};
use crate::cache::{CacheStore, RequestParams};

/// Base URL for the Places text search API
pub const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

/// Response statuses that carry usable (possibly empty) results
const ACCEPTED_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// Places text search response structure
///
/// Results stay untyped so a malformed field only defaults that one field.
#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    results: Option<Vec<Value>>,
}

/// Client for searching restaurants through Google Places
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleClient {
    /// Creates a new GoogleClient using the public Places endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GOOGLE_BASE_URL)
    }

    /// Creates a new GoogleClient against a custom endpoint
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// The query parameters sent for a search
    pub fn request_params(&self, term: &SearchTerm) -> RequestParams {
        [
            ("query", term.to_string()),
            ("key", self.api_key.clone()),
            ("language", "en".to_string()),
            ("type", "restaurant".to_string()),
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
                Provider::Google.store_id(),
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
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        if let Some(status) = body.get("status").and_then(Value::as_str) {
            if !ACCEPTED_STATUSES.contains(&status) {
                return Err(ProviderError::BadStatus {
                    provider: Provider::Google,
                    status: status.to_string(),
                });
            }
        }

        Ok(body)
    }
}

/// Normalizes a text search response body into listings
///
/// # Returns
/// * `Ok(Vec<Listing>)` - One listing per result with a `place_id`, in response order
/// * `Err(ProviderError::MissingField)` - If the body has no `results` list
pub fn parse_listings(body: &Value) -> Result<Vec<Listing>, ProviderError> {
    let response = TextSearchResponse::deserialize(body)?;
    let results = response
        .results
        .ok_or_else(|| ProviderError::MissingField("results".to_string()))?;

    let listings: Vec<Listing> = results.iter().filter_map(into_listing).collect();
    debug!(
        count = listings.len(),
        skipped = results.len() - listings.len(),
        "Parsed Google results"
    );

    Ok(listings)
}

/// Converts one result; `None` when it has no `place_id` to store it under
fn into_listing(place: &Value) -> Option<Listing> {
    let not_available = || NOT_AVAILABLE.to_string();
    let name = text_field(place, "name").unwrap_or_else(not_available);

    let Some(id) = text_field(place, "place_id").filter(|id| !id.is_empty()) else {
        warn!(name = %name, "Skipping Google result without place_id");
        return None;
    };

    Some(Listing {
        id,
        alias: None,
        name,
        address: text_field(place, "formatted_address").unwrap_or_else(not_available),
        phone: None,
        rating: number_field(place, "rating").unwrap_or(0.0),
        rating_count: number_field(place, "user_ratings_total").unwrap_or(0.0),
        price: price_label(place.get("price_level")),
    })
}

/// Renders a `price_level` value as its bucket label
fn price_label(price_level: Option<&Value>) -> String {
    match price_level {
        Some(Value::Number(level)) => level.to_string(),
        Some(Value::String(level)) => level.clone(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_RESPONSE: &str = r#"{
        "html_attributions": [],
        "results": [
            {
                "business_status": "OPERATIONAL",
                "formatted_address": "314 S 4th Ave, Ann Arbor, MI 48104, United States",
                "name": "Frita Batidos",
                "place_id": "ChIJ-frita",
                "price_level": 2,
                "rating": 4.6,
                "types": ["restaurant", "food"],
                "user_ratings_total": 2875
            },
            {
                "formatted_address": "211 E Ann St, Ann Arbor, MI 48104, United States",
                "name": "Zingerman's Delicatessen",
                "place_id": "ChIJ-zingermans",
                "rating": 4.7,
                "user_ratings_total": 9120
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let body: Value = serde_json::from_str(VALID_RESPONSE).unwrap();
        let listings = parse_listings(&body).unwrap();

        assert_eq!(listings.len(), 2);
        let frita = &listings[0];
        assert_eq!(frita.id, "ChIJ-frita");
        assert_eq!(frita.name, "Frita Batidos");
        assert_eq!(
            frita.address,
            "314 S 4th Ave, Ann Arbor, MI 48104, United States"
        );
        assert!((frita.rating - 4.6).abs() < 0.001);
        assert!((frita.rating_count - 2875.0).abs() < 0.001);
        assert_eq!(frita.price, "2");
        assert!(frita.alias.is_none());
        assert!(frita.phone.is_none());
    }

    #[test]
    fn test_missing_price_level_is_not_available() {
        let body: Value = serde_json::from_str(VALID_RESPONSE).unwrap();
        let listings = parse_listings(&body).unwrap();
        assert_eq!(listings[1].price, "N/A");
    }

    #[test]
    fn test_missing_fields_default() {
        let body = json!({"results": [{"place_id": "only-id"}]});
        let listings = parse_listings(&body).unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "N/A");
        assert_eq!(listings[0].address, "N/A");
        assert_eq!(listings[0].rating, 0.0);
        assert_eq!(listings[0].rating_count, 0.0);
    }

    #[test]
    fn test_result_without_place_id_is_skipped() {
        let body = json!({"results": [
            {"name": "No Id A", "rating": 4.0, "price_level": 1},
            {"place_id": "", "name": "Blank Id", "rating": 3.0},
            {"place_id": "kept", "name": "Kept", "rating": 5.0, "price_level": 2}
        ]});
        let listings = parse_listings(&body).unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "kept");
    }

    #[test]
    fn test_bad_field_defaults_only_that_field() {
        let body = json!({"results": [
            {"place_id": "good", "name": "Good", "rating": 4.5,
             "user_ratings_total": 10, "price_level": 2},
            {"place_id": "odd", "name": null, "formatted_address": 12,
             "rating": "high", "user_ratings_total": null, "price_level": [1]}
        ]});
        let listings = parse_listings(&body).unwrap();

        assert_eq!(listings.len(), 2);
        assert!((listings[0].rating - 4.5).abs() < 0.001);
        let odd = &listings[1];
        assert_eq!(odd.id, "odd");
        assert_eq!(odd.name, "N/A");
        assert_eq!(odd.address, "N/A");
        assert_eq!(odd.rating, 0.0);
        assert_eq!(odd.rating_count, 0.0);
        assert_eq!(odd.price, "N/A");
    }

    #[test]
    fn test_missing_results_is_error() {
        let body = json!({"status": "OK"});
        let err = parse_listings(&body).unwrap_err();
        assert!(matches!(err, ProviderError::MissingField(ref f) if f == "results"));
    }

    #[test]
    fn test_results_of_wrong_type_is_parse_error() {
        let body = json!({"results": "nope"});
        assert!(matches!(
            parse_listings(&body),
            Err(ProviderError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_results() {
        let body = json!({"results": [], "status": "ZERO_RESULTS"});
        assert!(parse_listings(&body).unwrap().is_empty());
    }

    #[test]
    fn test_request_params() {
        let client = GoogleClient::new("test-key");
        let params = client.request_params(&SearchTerm::new("Ann Arbor", "Michigan"));

        assert_eq!(params.len(), 4);
        assert_eq!(params["query"], "ann arbor, michigan");
        assert_eq!(params["key"], "test-key");
        assert_eq!(params["language"], "en");
        assert_eq!(params["type"], "restaurant");
    }

    #[test]
    fn test_price_label_variants() {
        assert_eq!(price_label(Some(&json!(0))), "0");
        assert_eq!(price_label(Some(&json!("3"))), "3");
        assert_eq!(price_label(Some(&json!(null))), "N/A");
        assert_eq!(price_label(None), "N/A");
    }
}
