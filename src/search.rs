//! One search cycle: fetch both providers and store the results
//!
//! Providers are queried one after the other, never concurrently. A provider
//! failure stops the cycle and is returned to the caller unchanged.

use thiserror::Error;
use tracing::info;

use crate::cache::CacheStore;
use crate::data::{GoogleClient, Provider, ProviderError, SearchTerm, YelpClient};
use crate::db::{Database, StorageError};

/// Errors that can end a search cycle
#[derive(Debug, Error)]
pub enum SearchError {
    /// A provider request failed
    #[error("{provider} search failed: {source}")]
    Provider {
        provider: Provider,
        #[source]
        source: ProviderError,
    },

    /// Storing the results failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Number of listings stored per provider by one search
///
/// Counts rows read back after the insert, so results skipped during parsing
/// or collapsed onto a shared id are not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub google: usize,
    pub yelp: usize,
}

/// Runs searches against both providers through the response cache
#[derive(Debug, Clone)]
pub struct Searcher {
    cache: CacheStore,
    google: GoogleClient,
    yelp: YelpClient,
}

impl Searcher {
    pub fn new(cache: CacheStore, google: GoogleClient, yelp: YelpClient) -> Self {
        Self {
            cache,
            google,
            yelp,
        }
    }

    /// Searches Google then Yelp for `term` and stores both result sets
    pub async fn run(
        &self,
        db: &mut Database,
        term: &SearchTerm,
    ) -> Result<SearchSummary, SearchError> {
        info!(search = %term, "Starting search");

        let google_listings = self
            .google
            .search(&self.cache, term)
            .await
            .map_err(|source| SearchError::Provider {
                provider: Provider::Google,
                source,
            })?;
        db.insert_listings(Provider::Google, term, &google_listings)?;
        let google = db.listings(Provider::Google, term)?.len();

        let yelp_listings = self
            .yelp
            .search(&self.cache, term)
            .await
            .map_err(|source| SearchError::Provider {
                provider: Provider::Yelp,
                source,
            })?;
        db.insert_listings(Provider::Yelp, term, &yelp_listings)?;
        let yelp = db.listings(Provider::Yelp, term)?.len();

        info!(google, yelp, "Search stored");
        Ok(SearchSummary { google, yelp })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{fingerprint, CacheEntries};
    use serde_json::json;
    use tempfile::TempDir;

    /// Nothing listens here, so any cache miss fails fast
    const UNREACHABLE: &str = "http://127.0.0.1:9/search";

    fn seeded_searcher(temp_dir: &TempDir, term: &SearchTerm) -> Searcher {
        let cache = CacheStore::with_dir(temp_dir.path().to_path_buf());
        let google = GoogleClient::with_base_url("g-key", UNREACHABLE);
        let yelp = YelpClient::with_base_url("y-key", UNREACHABLE);

        let mut google_entries = CacheEntries::new();
        google_entries.insert(
            fingerprint(UNREACHABLE, &google.request_params(term), "g-key"),
            json!({"status": "OK", "results": [
                {"place_id": "g1", "name": "Cheap Eats", "formatted_address": "1 Main St",
                 "rating": 4.0, "user_ratings_total": 10, "price_level": 1},
                {"place_id": "g2", "name": "Mystery", "formatted_address": "2 Main St",
                 "rating": 3.0, "user_ratings_total": 5}
            ]}),
        );
        cache.save("google", &google_entries).unwrap();

        let mut yelp_entries = CacheEntries::new();
        yelp_entries.insert(
            fingerprint(UNREACHABLE, &yelp.request_params(term), "y-key"),
            json!({"businesses": [
                {"id": "y1", "alias": "fancy", "name": "Fancy", "rating": 4.5,
                 "review_count": 200, "phone": "", "price": "$$$",
                 "location": {"display_address": ["3 Main St", "Ann Arbor, MI"]}}
            ]}),
        );
        cache.save("yelp", &yelp_entries).unwrap();

        Searcher::new(cache, google, yelp)
    }

    #[tokio::test]
    async fn test_cached_search_stores_both_providers() {
        let temp_dir = TempDir::new().unwrap();
        let term = SearchTerm::new("ann arbor", "michigan");
        let searcher = seeded_searcher(&temp_dir, &term);
        let mut db = Database::in_memory().unwrap();

        let summary = searcher.run(&mut db, &term).await.unwrap();

        assert_eq!(summary, SearchSummary { google: 2, yelp: 1 });
        let google = db.listings(Provider::Google, &term).unwrap();
        assert_eq!(google[1].price, "N/A");
        let yelp = db.listings(Provider::Yelp, &term).unwrap();
        assert_eq!(yelp[0].address, "3 Main St Ann Arbor, MI");
    }

    #[tokio::test]
    async fn test_summary_matches_stored_rows_when_ids_are_missing() {
        let temp_dir = TempDir::new().unwrap();
        let term = SearchTerm::new("ypsilanti", "michigan");
        let cache = CacheStore::with_dir(temp_dir.path().to_path_buf());
        let google = GoogleClient::with_base_url("g-key", UNREACHABLE);
        let yelp = YelpClient::with_base_url("y-key", UNREACHABLE);

        let mut google_entries = CacheEntries::new();
        google_entries.insert(
            fingerprint(UNREACHABLE, &google.request_params(&term), "g-key"),
            json!({"status": "OK", "results": [
                {"name": "No Id One", "rating": 4.0, "price_level": 1},
                {"name": "No Id Two", "rating": 2.0, "price_level": 2},
                {"place_id": "g1", "name": "Has Id", "rating": 3.0, "price_level": 1}
            ]}),
        );
        cache.save("google", &google_entries).unwrap();

        let mut yelp_entries = CacheEntries::new();
        yelp_entries.insert(
            fingerprint(UNREACHABLE, &yelp.request_params(&term), "y-key"),
            json!({"businesses": [
                {"name": "No Id", "rating": 4.0, "price": "$"},
                {"id": "y1", "name": "Listed", "rating": 3.0, "price": "$$",
                 "location": {"display_address": null}}
            ]}),
        );
        cache.save("yelp", &yelp_entries).unwrap();

        let searcher = Searcher::new(cache, google, yelp);
        let mut db = Database::in_memory().unwrap();
        let summary = searcher.run(&mut db, &term).await.unwrap();

        let stored_google = db.listings(Provider::Google, &term).unwrap();
        let stored_yelp = db.listings(Provider::Yelp, &term).unwrap();
        assert_eq!(summary.google, stored_google.len());
        assert_eq!(summary.yelp, stored_yelp.len());
        assert_eq!(summary, SearchSummary { google: 1, yelp: 1 });
        assert_eq!(stored_google[0].id, "g1");
        assert_eq!(stored_yelp[0].address, "N/A");
    }

    #[tokio::test]
    async fn test_uncached_search_fails_with_provider_error() {
        let temp_dir = TempDir::new().unwrap();
        let term = SearchTerm::new("ann arbor", "michigan");
        let searcher = seeded_searcher(&temp_dir, &term);
        let mut db = Database::in_memory().unwrap();

        let other = SearchTerm::new("detroit", "michigan");
        let err = searcher.run(&mut db, &other).await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::Provider {
                provider: Provider::Google,
                source: ProviderError::RequestFailed(_),
            }
        ));
    }
}
