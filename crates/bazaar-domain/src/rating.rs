//! Review score aggregation.

/// Arithmetic mean of the given ratings, rounded to two decimal places
/// (half away from zero). An empty slice yields `0.0`.
///
/// Computed on every read; never persisted alongside the listing.
pub fn mean_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u64 = ratings.iter().map(|&r| u64::from(r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}
