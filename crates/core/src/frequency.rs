//! Purchase-frequency histogram with boundaries chosen from the campaign
//! population size, plus the multi-purchase metrics derived from the same
//! per-customer counts.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounting::round_money;
use crate::domain::customer::CustomerId;

/// One human-readable frequency range. `max_frequency` of None means the
/// range is open-ended upward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub min_frequency: u32,
    pub max_frequency: Option<u32>,
    pub customers: u64,
}

/// Candidate band boundaries for a campaign population of `total_groups`.
/// Below five campaigns the ladder degenerates into singleton bands.
fn band_bounds(total_groups: u64) -> Vec<(u32, Option<u32>)> {
    if total_groups >= 20 {
        vec![
            (1, Some(1)),
            (2, Some(2)),
            (3, Some(3)),
            (4, Some(4)),
            (5, Some(9)),
            (10, Some(19)),
            (20, Some(39)),
            (40, None),
        ]
    } else if total_groups >= 10 {
        vec![(1, Some(1)), (2, Some(2)), (3, Some(3)), (4, Some(4)), (5, Some(9)), (10, None)]
    } else if total_groups >= 5 {
        vec![(1, Some(1)), (2, Some(2)), (3, Some(3)), (4, Some(4)), (5, None)]
    } else {
        let top = total_groups.max(1) as u32;
        (1..=top).map(|bound| (bound, Some(bound))).collect()
    }
}

/// Buckets per-customer purchase counts into ordered frequency ranges.
/// Bands that match no customer are dropped from the output.
pub fn frequency_distribution(
    purchase_counts: &HashMap<CustomerId, u32>,
    total_groups: u64,
) -> Vec<FrequencyBand> {
    band_bounds(total_groups)
        .into_iter()
        .map(|(min, max)| FrequencyBand {
            min_frequency: min,
            max_frequency: max,
            customers: purchase_counts
                .values()
                .filter(|count| **count >= min && max.map_or(true, |upper| **count <= upper))
                .count() as u64,
        })
        .filter(|band| band.customers > 0)
        .collect()
}

/// Customers who purchased more than once.
pub fn multi_purchase_count(purchase_counts: &HashMap<CustomerId, u32>) -> u64 {
    purchase_counts.values().filter(|count| **count > 1).count() as u64
}

/// multi-purchase customers / unique customers * 100, or 0 when there are
/// no customers at all.
pub fn multi_purchase_ratio(multi_purchase: u64, unique_customers: u64) -> Decimal {
    if unique_customers == 0 {
        return Decimal::ZERO;
    }
    round_money(
        Decimal::from(multi_purchase) / Decimal::from(unique_customers) * Decimal::ONE_HUNDRED,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::{
        frequency_distribution, multi_purchase_count, multi_purchase_ratio, FrequencyBand,
    };
    use crate::domain::customer::CustomerId;

    fn counts(values: &[u32]) -> HashMap<CustomerId, u32> {
        values.iter().map(|count| (CustomerId(Uuid::new_v4()), *count)).collect()
    }

    #[test]
    fn large_population_uses_the_full_ladder_and_drops_empty_bands() {
        let distribution = frequency_distribution(&counts(&[1, 3, 7, 12, 45]), 25);

        assert_eq!(
            distribution,
            vec![
                FrequencyBand { min_frequency: 1, max_frequency: Some(1), customers: 1 },
                FrequencyBand { min_frequency: 3, max_frequency: Some(3), customers: 1 },
                FrequencyBand { min_frequency: 5, max_frequency: Some(9), customers: 1 },
                FrequencyBand { min_frequency: 10, max_frequency: Some(19), customers: 1 },
                FrequencyBand { min_frequency: 40, max_frequency: None, customers: 1 },
            ]
        );
    }

    #[test]
    fn mid_population_caps_the_ladder_at_ten_plus() {
        let distribution = frequency_distribution(&counts(&[2, 11, 30]), 12);

        assert_eq!(
            distribution,
            vec![
                FrequencyBand { min_frequency: 2, max_frequency: Some(2), customers: 1 },
                FrequencyBand { min_frequency: 10, max_frequency: None, customers: 2 },
            ]
        );
    }

    #[test]
    fn small_population_caps_the_ladder_at_five_plus() {
        let distribution = frequency_distribution(&counts(&[4, 5, 9]), 5);

        assert_eq!(
            distribution,
            vec![
                FrequencyBand { min_frequency: 4, max_frequency: Some(4), customers: 1 },
                FrequencyBand { min_frequency: 5, max_frequency: None, customers: 2 },
            ]
        );
    }

    #[test]
    fn tiny_population_uses_singleton_bands() {
        let distribution = frequency_distribution(&counts(&[1, 2, 2]), 3);

        assert_eq!(
            distribution,
            vec![
                FrequencyBand { min_frequency: 1, max_frequency: Some(1), customers: 1 },
                FrequencyBand { min_frequency: 2, max_frequency: Some(2), customers: 2 },
            ]
        );
    }

    #[test]
    fn zero_groups_still_offers_a_single_band() {
        let distribution = frequency_distribution(&counts(&[1, 1]), 0);
        assert_eq!(
            distribution,
            vec![FrequencyBand { min_frequency: 1, max_frequency: Some(1), customers: 2 }]
        );
    }

    #[test]
    fn empty_counts_yield_an_empty_distribution() {
        assert!(frequency_distribution(&HashMap::new(), 25).is_empty());
    }

    #[test]
    fn multi_purchase_metrics_count_repeat_customers() {
        let purchase_counts = counts(&[1, 2, 5, 1]);
        let multi = multi_purchase_count(&purchase_counts);

        assert_eq!(multi, 2);
        assert_eq!(multi_purchase_ratio(multi, 4), Decimal::new(5_000, 2));
        assert_eq!(multi_purchase_ratio(0, 0), Decimal::ZERO);
    }
}
