//! Chef rank progression from the successful-cooks counter.

use serde::Serialize;

/// Cooks needed for the "Rookie Chef" tier.
pub const ROOKIE_THRESHOLD: i32 = 5;

/// Cooks needed for the "Expert Chef" tier. The threshold is inclusive:
/// the fifteenth cook earns the tier.
pub const EXPERT_THRESHOLD: i32 = 15;

/// The next tier a cook is working toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NextRank {
    pub name: String,
    pub remaining: i32,
}

/// Rank label for a cook count. Total over all inputs; negative counts
/// (which the database never stores) clamp to zero.
pub fn rank_for_cooks(successful_cooks: i32) -> &'static str {
    let cooks = successful_cooks.max(0);
    if cooks >= EXPERT_THRESHOLD {
        "Expert Chef"
    } else if cooks >= ROOKIE_THRESHOLD {
        "Rookie Chef"
    } else {
        "Amateur"
    }
}

/// The milestone shown on the dashboard: which tier comes next and how many
/// cooks remain. At the top tier there is nothing left to earn. At zero
/// cooks the first cook earns the starting tier.
pub fn next_rank(successful_cooks: i32) -> Option<NextRank> {
    let cooks = successful_cooks.max(0);
    if cooks >= EXPERT_THRESHOLD {
        None
    } else if cooks >= ROOKIE_THRESHOLD {
        Some(NextRank {
            name: "Expert Chef".to_string(),
            remaining: EXPERT_THRESHOLD - cooks,
        })
    } else if cooks > 0 {
        Some(NextRank {
            name: "Rookie Chef".to_string(),
            remaining: ROOKIE_THRESHOLD - cooks,
        })
    } else {
        Some(NextRank {
            name: "Amateur".to_string(),
            remaining: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(rank_for_cooks(0), "Amateur");
        assert_eq!(rank_for_cooks(1), "Amateur");
        assert_eq!(rank_for_cooks(4), "Amateur");
        assert_eq!(rank_for_cooks(5), "Rookie Chef");
        assert_eq!(rank_for_cooks(14), "Rookie Chef");
        assert_eq!(rank_for_cooks(15), "Expert Chef");
        assert_eq!(rank_for_cooks(16), "Expert Chef");
        assert_eq!(rank_for_cooks(1000), "Expert Chef");
    }

    #[test]
    fn test_negative_counts_clamp() {
        assert_eq!(rank_for_cooks(-3), "Amateur");
        assert_eq!(next_rank(-3), next_rank(0));
    }

    #[test]
    fn test_next_rank_progression() {
        assert_eq!(
            next_rank(0),
            Some(NextRank {
                name: "Amateur".to_string(),
                remaining: 1
            })
        );
        assert_eq!(
            next_rank(3),
            Some(NextRank {
                name: "Rookie Chef".to_string(),
                remaining: 2
            })
        );
        assert_eq!(
            next_rank(5),
            Some(NextRank {
                name: "Expert Chef".to_string(),
                remaining: 10
            })
        );
        assert_eq!(
            next_rank(14),
            Some(NextRank {
                name: "Expert Chef".to_string(),
                remaining: 1
            })
        );
        assert_eq!(next_rank(15), None);
        assert_eq!(next_rank(40), None);
    }
}
