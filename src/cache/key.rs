//! Cache key construction for provider requests
//!
//! A cache key identifies one request by its endpoint, query parameters and
//! credential. Each field is rendered as a JSON token before being joined, so
//! a separator appearing inside a field can never shift text from one position
//! into another.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Marker prefixed to every cache key
pub const KEY_MARKER: &str = "UNIQUE_KEY";

/// Separator placed between the rendered key fields
const SEPARATOR: &str = "---";

/// Query parameters for a provider request.
///
/// Ordered by parameter name, so two mappings with the same contents always
/// render (and fingerprint) identically regardless of insertion order.
pub type RequestParams = BTreeMap<String, String>;

/// Builds the cache key for a request.
///
/// # Arguments
/// * `endpoint` - The provider URL the request is sent to
/// * `params` - The query parameters of the request
/// * `credential` - The API key the request is made with
///
/// # Returns
/// A string of the form `UNIQUE_KEY---"<endpoint>"---{<params>}---"<credential>"`
pub fn fingerprint(endpoint: &str, params: &RequestParams, credential: &str) -> String {
    let rendered_params: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();

    [
        KEY_MARKER.to_string(),
        Value::String(endpoint.to_string()).to_string(),
        Value::Object(rendered_params).to_string(),
        Value::String(credential.to_string()).to_string(),
    ]
    .join(SEPARATOR)
}
