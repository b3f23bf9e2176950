// src/models/review.rs

use serde::{Deserialize, Serialize};

/// Upper bound on reviews kept per mosque
pub const MAX_REVIEWS: usize = 3;

/// Review summary embedded in a mosque record
/// DOCUMENTATION: Stored as an element of the JSONB `reviews` array.
/// Every field is optional because upstream reviews may omit any of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Review {
    pub author: Option<String>,
    pub rating: Option<i32>,
    pub text: Option<String>,
    /// Relative time description as reported upstream ("a month ago")
    pub time: Option<String>,
}

/// Response for GET /reviews/{place_id}
#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    /// Mosque name
    pub mosque: Option<String>,
    pub place_id: String,
    pub review_count: usize,
    pub reviews: Vec<Review>,
}

impl ReviewsResponse {
    /// Build the response from a stored review list, keeping the first
    /// MAX_REVIEWS entries
    pub fn new(place_id: &str, name: Option<String>, reviews: Vec<Review>) -> Self {
        let reviews = truncate_reviews(reviews);
        Self {
            mosque: name,
            place_id: place_id.to_string(),
            review_count: reviews.len(),
            reviews,
        }
    }
}

/// Keep only the first MAX_REVIEWS entries
pub fn truncate_reviews(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.truncate(MAX_REVIEWS);
    reviews
}
