use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::pool::{HealthState, Pool};

pub const ACTIVE_WEIGHT: f64 = 1.0;
pub const INACTIVE_WEIGHT: f64 = 0.5;

/// Inactive pools keep their historical rating at half weight.
pub fn rating_weight(pool: &Pool) -> f64 {
    if pool.is_active {
        ACTIVE_WEIGHT
    } else {
        INACTIVE_WEIGHT
    }
}

/// Rounds to one decimal place using the exact stored value, ties away
/// from zero. `4.35` is stored just below 4.35, so it rounds to `4.3`;
/// `4.25` is exact and rounds to `4.3`.
pub fn round_one(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let magnitude = value.abs();
    // `mul_add` rounds once, so the sign of `10 * magnitude - bound` is exact.
    let mut tenths = (magnitude * 10.0).round();
    if magnitude.mul_add(10.0, -(tenths + 0.5)) >= 0.0 {
        tenths += 1.0;
    } else if magnitude.mul_add(10.0, -(tenths - 0.5)) < 0.0 {
        tenths -= 1.0;
    }
    (tenths / 10.0).copysign(value)
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}

/// Weighted mean of every rated pool, rounded to one decimal. Unrated pools
/// (`rating == None`) are ignored; a rating of zero still counts.
pub fn weighted_average_rating(pools: &[Pool]) -> f64 {
    let (weighted_sum, total_weight) = pools
        .iter()
        .filter_map(|pool| pool.rating.map(|rating| (rating, rating_weight(pool))))
        .fold((0.0, 0.0), |(sum, weights), (rating, weight)| {
            (sum + rating * weight, weights + weight)
        });

    if total_weight > 0.0 {
        round_one(weighted_sum / total_weight)
    } else {
        0.0
    }
}

/// Summary shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_pools: usize,
    pub healthy_pools: usize,
    pub unhealthy_pools: usize,
    pub active_pools: usize,
    pub total_districts: usize,
    pub average_rating: f64,
}

impl PoolStats {
    pub fn from_pools(pools: &[Pool]) -> Self {
        let count_state = |state: HealthState| {
            pools
                .iter()
                .filter(|pool| pool.current_state == state)
                .count()
        };

        Self {
            total_pools: pools.len(),
            healthy_pools: count_state(HealthState::Healthy),
            unhealthy_pools: count_state(HealthState::Unhealthy),
            active_pools: pools.iter().filter(|pool| pool.is_active).count(),
            total_districts: pools
                .iter()
                .map(|pool| pool.district.as_str())
                .collect::<HashSet<_>>()
                .len(),
            average_rating: weighted_average_rating(pools),
        }
    }

    pub fn health_percentage(&self) -> u32 {
        percentage(self.healthy_pools, self.total_pools)
    }

    pub fn active_percentage(&self) -> u32 {
        percentage(self.active_pools, self.total_pools)
    }
}

/// One bar of the per-district rating chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRating {
    pub district: String,
    /// Unweighted mean, rounded to one decimal.
    pub average: f64,
    /// Number of rated pools behind the average.
    pub count: usize,
}

impl DistrictRating {
    pub fn color(&self) -> &'static str {
        rating_color(self.average)
    }
}

/// Per-district rating averages, best first. Ties are broken by district name
/// so the chart order is stable across refetches.
pub fn district_ratings(pools: &[Pool]) -> Vec<DistrictRating> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for pool in pools {
        if let Some(rating) = pool.rating {
            let entry = sums.entry(pool.district.as_str()).or_default();
            entry.0 += rating;
            entry.1 += 1;
        }
    }

    let mut ratings: Vec<DistrictRating> = sums
        .into_iter()
        .map(|(district, (total, count))| DistrictRating {
            district: district.to_string(),
            average: round_one(total / count as f64),
            count,
        })
        .collect();

    ratings.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.district.cmp(&b.district))
    });
    ratings
}

pub fn rating_color(average: f64) -> &'static str {
    if average >= 4.5 {
        "#10b981"
    } else if average >= 4.0 {
        "#22c55e"
    } else if average >= 3.5 {
        "#eab308"
    } else if average >= 3.0 {
        "#f59e0b"
    } else if average >= 2.0 {
        "#f97316"
    } else {
        "#ef4444"
    }
}

/// Healthy/unhealthy split for the pie chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub healthy: usize,
    pub unhealthy: usize,
    pub healthy_percentage: u32,
    pub unhealthy_percentage: u32,
}

impl HealthBreakdown {
    pub fn from_pools(pools: &[Pool]) -> Self {
        let healthy = pools.iter().filter(|pool| pool.is_healthy()).count();
        let unhealthy = pools.len() - healthy;
        Self {
            healthy,
            unhealthy,
            healthy_percentage: percentage(healthy, pools.len()),
            unhealthy_percentage: percentage(unhealthy, pools.len()),
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.unhealthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::sample_pool;

    fn rated(id: i64, district: &str, rating: Option<f64>, is_active: bool) -> Pool {
        let mut pool = sample_pool(id);
        pool.district = district.to_string();
        pool.rating = rating;
        pool.is_active = is_active;
        pool
    }

    #[test]
    fn inactive_pools_count_half() {
        let pools = vec![
            rated(1, "Cayma", Some(4.0), true),
            rated(2, "Cayma", Some(5.0), false),
        ];
        assert_eq!(weighted_average_rating(&pools), 4.3);
    }

    #[test]
    fn rounding_follows_the_stored_value() {
        assert_eq!(round_one(4.35), 4.3);
        assert_eq!(round_one(4.25), 4.3);
        assert_eq!(round_one(4.3333), 4.3);
        assert_eq!(round_one(2.96), 3.0);
        assert_eq!(round_one(0.05), 0.1);
        assert_eq!(round_one(0.0), 0.0);
    }

    #[test]
    fn district_mean_of_4_35_shows_4_3() {
        let pools = vec![
            rated(1, "Cayma", Some(4.2), true),
            rated(2, "Cayma", Some(4.5), true),
        ];
        // 8.7 / 2 lands just below 4.35.
        assert_eq!(district_ratings(&pools)[0].average, 4.3);
    }

    #[test]
    fn unrated_pools_do_not_move_any_average() {
        let base = vec![
            rated(1, "Cayma", Some(4.0), true),
            rated(2, "Sachaca", Some(2.5), false),
        ];
        let mut with_unrated = base.clone();
        with_unrated.push(rated(3, "Cayma", None, true));
        with_unrated.push(rated(4, "Sachaca", None, false));

        assert_eq!(
            weighted_average_rating(&base),
            weighted_average_rating(&with_unrated)
        );
        assert_eq!(district_ratings(&base), district_ratings(&with_unrated));
    }

    #[test]
    fn zero_rating_is_a_real_rating() {
        let pools = vec![
            rated(1, "Cayma", Some(0.0), true),
            rated(2, "Cayma", Some(4.0), true),
        ];
        assert_eq!(weighted_average_rating(&pools), 2.0);
        assert_eq!(district_ratings(&pools)[0].count, 2);
    }

    #[test]
    fn average_ignores_input_order() {
        let pools = vec![
            rated(1, "A", Some(3.7), true),
            rated(2, "B", Some(1.2), false),
            rated(3, "C", Some(4.9), true),
            rated(4, "A", Some(2.2), false),
            rated(5, "B", None, true),
        ];
        let expected = weighted_average_rating(&pools);

        let mut reversed = pools.clone();
        reversed.reverse();
        assert_eq!(weighted_average_rating(&reversed), expected);

        let mut rotated = pools.clone();
        rotated.rotate_left(2);
        assert_eq!(weighted_average_rating(&rotated), expected);
    }

    #[test]
    fn empty_collection() {
        let stats = PoolStats::from_pools(&[]);
        assert_eq!(stats, PoolStats::default());
        assert_eq!(stats.health_percentage(), 0);
        assert!(district_ratings(&[]).is_empty());
    }

    #[test]
    fn counts() {
        let mut pools = vec![
            rated(1, "Cayma", Some(4.0), true),
            rated(2, "Cayma", None, false),
            rated(3, "Yanahuara", Some(3.0), true),
        ];
        pools[1].current_state = HealthState::Unhealthy;
        pools[1].latitude = None;

        let stats = PoolStats::from_pools(&pools);
        assert_eq!(stats.total_pools, 3);
        assert_eq!(stats.healthy_pools, 2);
        assert_eq!(stats.unhealthy_pools, 1);
        assert_eq!(stats.active_pools, 2);
        assert_eq!(stats.total_districts, 2);
        assert_eq!(stats.average_rating, 3.5);
        assert_eq!(stats.health_percentage(), 67);
    }

    #[test]
    fn district_averages_are_unweighted_and_sorted() {
        let pools = vec![
            rated(1, "Cayma", Some(3.0), true),
            rated(2, "Cayma", Some(4.0), false),
            rated(3, "Yanahuara", Some(4.8), false),
            rated(4, "Sachaca", Some(3.5), true),
            rated(5, "cayma", Some(1.0), true),
        ];
        let ratings = district_ratings(&pools);
        let order: Vec<(&str, f64)> = ratings
            .iter()
            .map(|r| (r.district.as_str(), r.average))
            .collect();

        assert_eq!(
            order,
            vec![
                ("Yanahuara", 4.8),
                ("Cayma", 3.5),
                ("Sachaca", 3.5),
                ("cayma", 1.0)
            ]
        );
        assert_eq!(ratings[0].color(), "#10b981");
        assert_eq!(ratings[3].color(), "#ef4444");
    }

    #[test]
    fn health_breakdown_percentages() {
        let mut pools = vec![sample_pool(1), sample_pool(2), sample_pool(3)];
        pools[2].current_state = HealthState::Unhealthy;

        let breakdown = HealthBreakdown::from_pools(&pools);
        assert_eq!(breakdown.healthy, 2);
        assert_eq!(breakdown.unhealthy, 1);
        assert_eq!(breakdown.healthy_percentage, 67);
        assert_eq!(breakdown.unhealthy_percentage, 33);
        assert_eq!(breakdown.total(), 3);
    }
}
