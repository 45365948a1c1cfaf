//! SQLite storage for harvested listings
//!
//! Each provider gets two tables: a rating table keyed by the provider's
//! listing id, and a price table pointing back at it. The schema is dropped
//! and recreated once when the database is opened for a run.

use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{Listing, Provider, SearchTerm};

/// File name of the database inside the data directory
pub const DATABASE_FILE_NAME: &str = "harvested_data.sqlite";

const RESET_SCHEMA: &str = r#"
    DROP TABLE IF EXISTS Google_Price_Info;
    DROP TABLE IF EXISTS Google_Rating_Info;
    DROP TABLE IF EXISTS Yelp_Price_Info;
    DROP TABLE IF EXISTS Yelp_Rating_Info;

    CREATE TABLE Google_Rating_Info (
        place_id TEXT PRIMARY KEY,
        name TEXT,
        formatted_address TEXT,
        rating REAL NOT NULL,
        user_ratings_total INTEGER NOT NULL,
        search_term TEXT NOT NULL
    );

    CREATE TABLE Google_Price_Info (
        place_id TEXT PRIMARY KEY,
        name TEXT,
        formatted_address TEXT,
        price_level TEXT NOT NULL,
        FOREIGN KEY (place_id) REFERENCES Google_Rating_Info (place_id)
    );

    CREATE TABLE Yelp_Rating_Info (
        id TEXT PRIMARY KEY,
        alias TEXT,
        name TEXT,
        display_address TEXT,
        rating REAL NOT NULL,
        review_count REAL NOT NULL,
        search_term TEXT NOT NULL
    );

    CREATE TABLE Yelp_Price_Info (
        id TEXT PRIMARY KEY,
        alias TEXT,
        name TEXT,
        display_address TEXT,
        phone TEXT,
        price TEXT NOT NULL,
        FOREIGN KEY (id) REFERENCES Yelp_Rating_Info (id)
    );
"#;

const INSERT_GOOGLE_RATING: &str = "INSERT OR REPLACE INTO Google_Rating_Info
    (place_id, name, formatted_address, rating, user_ratings_total, search_term)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const INSERT_GOOGLE_PRICE: &str = "INSERT OR REPLACE INTO Google_Price_Info
    (place_id, name, formatted_address, price_level)
    VALUES (?1, ?2, ?3, ?4)";

const INSERT_YELP_RATING: &str = "INSERT OR REPLACE INTO Yelp_Rating_Info
    (id, alias, name, display_address, rating, review_count, search_term)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_YELP_PRICE: &str = "INSERT OR REPLACE INTO Yelp_Price_Info
    (id, alias, name, display_address, phone, price)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SELECT_GOOGLE: &str = "SELECT r.place_id, r.name, r.formatted_address, r.rating,
        r.user_ratings_total, p.price_level
    FROM Google_Rating_Info r
    JOIN Google_Price_Info p ON p.place_id = r.place_id
    WHERE r.search_term = ?1
    ORDER BY r.rowid";

const SELECT_YELP: &str = "SELECT r.id, r.alias, r.name, r.display_address, r.rating,
        r.review_count, p.phone, p.price
    FROM Yelp_Rating_Info r
    JOIN Yelp_Price_Info p ON p.id = r.id
    WHERE r.search_term = ?1
    ORDER BY r.rowid";

/// Errors that can occur when storing or reading listings
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite reported an error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database file's directory could not be created
    #[error("Could not create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Listing storage backed by a single SQLite connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file and resets the schema
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "Opening listings database");
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a fresh in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(RESET_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Stores listings from one search, replacing rows with the same id
    ///
    /// All rows for the call are written in a single transaction.
    pub fn insert_listings(
        &mut self,
        provider: Provider,
        term: &SearchTerm,
        listings: &[Listing],
    ) -> Result<(), StorageError> {
        let search_term = term.to_string();
        let tx = self.conn.transaction()?;

        for listing in listings {
            debug!(provider = %provider, name = %listing.name, "Inserting listing");
            match provider {
                Provider::Google => {
                    tx.execute(
                        INSERT_GOOGLE_RATING,
                        params![
                            listing.id,
                            listing.name,
                            listing.address,
                            listing.rating,
                            listing.rating_count as i64,
                            search_term,
                        ],
                    )?;
                    tx.execute(
                        INSERT_GOOGLE_PRICE,
                        params![listing.id, listing.name, listing.address, listing.price],
                    )?;
                }
                Provider::Yelp => {
                    tx.execute(
                        INSERT_YELP_RATING,
                        params![
                            listing.id,
                            listing.alias,
                            listing.name,
                            listing.address,
                            listing.rating,
                            listing.rating_count,
                            search_term,
                        ],
                    )?;
                    tx.execute(
                        INSERT_YELP_PRICE,
                        params![
                            listing.id,
                            listing.alias,
                            listing.name,
                            listing.address,
                            listing.phone,
                            listing.price,
                        ],
                    )?;
                }
            }
        }

        tx.commit()?;
        info!(provider = %provider, count = listings.len(), "Stored listings");
        Ok(())
    }

    /// Reads back every stored listing produced by the given search
    pub fn listings(
        &self,
        provider: Provider,
        term: &SearchTerm,
    ) -> Result<Vec<Listing>, StorageError> {
        let search_term = term.to_string();

        let listings = match provider {
            Provider::Google => {
                let mut stmt = self.conn.prepare(SELECT_GOOGLE)?;
                let rows = stmt.query_map(params![search_term], |row| {
                    Ok(Listing {
                        id: row.get(0)?,
                        alias: None,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        phone: None,
                        rating: row.get(3)?,
                        rating_count: row.get::<_, i64>(4)? as f64,
                        price: row.get(5)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            Provider::Yelp => {
                let mut stmt = self.conn.prepare(SELECT_YELP)?;
                let rows = stmt.query_map(params![search_term], |row| {
                    Ok(Listing {
                        id: row.get(0)?,
                        alias: row.get(1)?,
                        name: row.get(2)?,
                        address: row.get(3)?,
                        rating: row.get(4)?,
                        rating_count: row.get(5)?,
                        phone: row.get(6)?,
                        price: row.get(7)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn google_listing(id: &str, rating: f64, price: &str) -> Listing {
        Listing {
            id: id.to_string(),
            alias: None,
            name: format!("Place {}", id),
            address: "1 Main St".to_string(),
            phone: None,
            rating,
            rating_count: 100.0,
            price: price.to_string(),
        }
    }

    fn yelp_listing(id: &str, rating: f64, price: &str) -> Listing {
        Listing {
            id: id.to_string(),
            alias: Some(format!("alias-{}", id)),
            name: format!("Business {}", id),
            address: "N/A".to_string(),
            phone: Some("+15555550100".to_string()),
            rating,
            rating_count: 42.0,
            price: price.to_string(),
        }
    }

    #[test]
    fn test_google_listings_roundtrip() {
        let mut db = Database::in_memory().unwrap();
        let term = SearchTerm::new("ann arbor", "michigan");
        let stored = vec![google_listing("a", 4.5, "2"), google_listing("b", 3.0, "N/A")];

        db.insert_listings(Provider::Google, &term, &stored).unwrap();

        assert_eq!(db.listings(Provider::Google, &term).unwrap(), stored);
    }

    #[test]
    fn test_yelp_listings_roundtrip() {
        let mut db = Database::in_memory().unwrap();
        let term = SearchTerm::new("ann arbor", "michigan");
        let stored = vec![yelp_listing("x", 4.0, "$$"), yelp_listing("y", 2.5, "$")];

        db.insert_listings(Provider::Yelp, &term, &stored).unwrap();

        assert_eq!(db.listings(Provider::Yelp, &term).unwrap(), stored);
    }

    #[test]
    fn test_repeated_search_replaces_rows() {
        let mut db = Database::in_memory().unwrap();
        let term = SearchTerm::new("ann arbor", "michigan");

        db.insert_listings(Provider::Google, &term, &[google_listing("a", 4.5, "2")])
            .unwrap();
        db.insert_listings(Provider::Google, &term, &[google_listing("a", 3.5, "1")])
            .unwrap();

        let listings = db.listings(Provider::Google, &term).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, "1");
    }

    #[test]
    fn test_listings_are_scoped_to_search_term() {
        let mut db = Database::in_memory().unwrap();
        let ann_arbor = SearchTerm::new("ann arbor", "michigan");
        let detroit = SearchTerm::new("detroit", "michigan");

        db.insert_listings(Provider::Yelp, &ann_arbor, &[yelp_listing("a", 4.0, "$")])
            .unwrap();
        db.insert_listings(Provider::Yelp, &detroit, &[yelp_listing("d", 3.0, "$$")])
            .unwrap();

        let listings = db.listings(Provider::Yelp, &detroit).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "d");
        assert!(db.listings(Provider::Google, &detroit).unwrap().is_empty());
    }

    #[test]
    fn test_open_resets_existing_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join(DATABASE_FILE_NAME);
        let term = SearchTerm::new("ann arbor", "michigan");

        {
            let mut db = Database::open(&path).unwrap();
            db.insert_listings(Provider::Google, &term, &[google_listing("a", 4.0, "1")])
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.listings(Provider::Google, &term).unwrap().is_empty());
    }
}
