//! Per-price-level rating statistics
//!
//! Groups listings by their price label and averages one metric per group.
//! A price level with no listings reports a mean of 0 rather than NaN, so
//! every requested level always gets a bar in the chart. That zero is not a
//! real average; check `sample_size` before trusting it.

use std::collections::HashMap;

use crate::data::Listing;

/// The listing value being averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Average rating
    Rating,
    /// Average number of ratings (Google) or reviews (Yelp)
    RatingCount,
}

impl Metric {
    /// Parses a menu choice, ignoring case and surrounding whitespace
    ///
    /// Accepts "average rating" and "average number of ratings".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "average rating" => Some(Metric::Rating),
            "average number of ratings" => Some(Metric::RatingCount),
            _ => None,
        }
    }

    /// Human-readable label used in chart titles and axes
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Rating => "Average Rating",
            Metric::RatingCount => "Average Number of Ratings",
        }
    }

    fn value(&self, listing: &Listing) -> f64 {
        match self {
            Metric::Rating => listing.rating,
            Metric::RatingCount => listing.rating_count,
        }
    }
}

/// The averaged metric for one price level
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStat {
    /// Price level label
    pub bucket: String,
    /// Arithmetic mean of the metric, or 0 when `sample_size` is 0
    pub mean: f64,
    /// Number of listings at this price level
    pub sample_size: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Averages `metric` over `listings` for each price level in `buckets`
///
/// # Arguments
/// * `listings` - The listings to group
/// * `metric` - Which value to average
/// * `buckets` - Price labels to report, in output order
///
/// # Returns
/// One `AggregateStat` per entry of `buckets`, in the same order. Listings whose
/// price label (e.g. "N/A") matches no bucket are left out of every group.
pub fn aggregate(listings: &[Listing], metric: Metric, buckets: &[&str]) -> Vec<AggregateStat> {
    let mut groups: HashMap<&str, Accumulator> = buckets
        .iter()
        .map(|bucket| (*bucket, Accumulator::default()))
        .collect();

    for listing in listings {
        if let Some(acc) = groups.get_mut(listing.price.as_str()) {
            acc.sum += metric.value(listing);
            acc.count += 1;
        }
    }

    buckets
        .iter()
        .map(|bucket| {
            let acc = groups.get(bucket).copied().unwrap_or_default();
            AggregateStat {
                bucket: bucket.to_string(),
                mean: acc.mean(),
                sample_size: acc.count,
            }
        })
        .collect()
}
