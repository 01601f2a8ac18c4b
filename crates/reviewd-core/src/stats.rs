//! Rating aggregation for a product's reviews.
//!
//! Pure computation over the rating values; the database layer supplies the
//! inputs and the API layer serializes the result, so the boundary layers
//! carry no aggregation logic.

use serde::Serialize;

/// Aggregate rating statistics for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_reviews: i64,
    /// Mean rating rounded to one decimal place; 0 when there are no reviews.
    pub average_rating: f64,
    pub rating_distribution: RatingDistribution,
}

/// Review count per star value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: i64,
    #[serde(rename = "2")]
    pub two: i64,
    #[serde(rename = "3")]
    pub three: i64,
    #[serde(rename = "4")]
    pub four: i64,
    #[serde(rename = "5")]
    pub five: i64,
}

/// Compute count, rounded mean, and star histogram for a set of ratings.
///
/// Ratings outside 1..=5 cannot occur (enforced at validation and by a CHECK
/// constraint) and are ignored by the histogram if they ever do.
#[must_use]
pub fn compute_rating_stats(ratings: &[i16]) -> RatingStats {
    let total_reviews = ratings.len() as i64;

    let mut distribution = RatingDistribution::default();
    let mut sum = 0i64;
    for &rating in ratings {
        sum += i64::from(rating);
        match rating {
            1 => distribution.one += 1,
            2 => distribution.two += 1,
            3 => distribution.three += 1,
            4 => distribution.four += 1,
            5 => distribution.five += 1,
            _ => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let average_rating = if total_reviews == 0 {
        0.0
    } else {
        let mean = sum as f64 / total_reviews as f64;
        (mean * 10.0).round() / 10.0
    };

    RatingStats {
        total_reviews,
        average_rating,
        rating_distribution: distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ratings_yield_zeroed_stats() {
        let stats = compute_rating_stats(&[]);
        assert_eq!(stats.total_reviews, 0);
        assert!((stats.average_rating - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.rating_distribution, RatingDistribution::default());
    }

    #[test]
    fn mean_is_rounded_to_one_decimal() {
        // 17 / 4 = 4.25, rounds to 4.3
        let stats = compute_rating_stats(&[5, 5, 4, 3]);
        assert_eq!(stats.total_reviews, 4);
        assert!((stats.average_rating - 4.3).abs() < f64::EPSILON);
        assert_eq!(stats.rating_distribution.five, 2);
        assert_eq!(stats.rating_distribution.four, 1);
        assert_eq!(stats.rating_distribution.three, 1);
        assert_eq!(stats.rating_distribution.two, 0);
        assert_eq!(stats.rating_distribution.one, 0);
    }

    #[test]
    fn single_rating_is_exact() {
        let stats = compute_rating_stats(&[4]);
        assert_eq!(stats.total_reviews, 1);
        assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_camel_case_and_star_keys() {
        let stats = compute_rating_stats(&[5, 3]);
        let json = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(json["totalReviews"], 2);
        assert_eq!(json["averageRating"], 4.0);
        assert_eq!(json["ratingDistribution"]["5"], 1);
        assert_eq!(json["ratingDistribution"]["3"], 1);
        assert_eq!(json["ratingDistribution"]["1"], 0);
    }
}
