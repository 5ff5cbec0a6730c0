//! Partitions accumulated bets into a main pot plus side pots by all-in
//! threshold, with an eligibility set per pot. Pure function, no I/O.

use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub player_id: Uuid,
    pub total_bet: Decimal,
    pub is_all_in: bool,
    pub is_folded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: Decimal,
    pub eligible_ids: Vec<Uuid>,
}

/// Collect the distinct all-in totals in ascending order, append a
/// sentinel at the maximum total bet, then award each interval
/// `(prev, threshold]` across all contributors.
pub fn compute_side_pots(contributions: &[Contribution]) -> Vec<Pot> {
    let mut thresholds: Vec<Decimal> = contributions
        .iter()
        .filter(|c| c.is_all_in)
        .map(|c| c.total_bet)
        .collect();
    thresholds.sort();
    thresholds.dedup();

    let max_bet = contributions
        .iter()
        .map(|c| c.total_bet)
        .max()
        .unwrap_or(Decimal::ZERO);
    if thresholds.last() != Some(&max_bet) {
        thresholds.push(max_bet);
    }

    let mut pots = Vec::new();
    let mut prev = Decimal::ZERO;
    for &threshold in &thresholds {
        if threshold <= prev {
            continue;
        }
        let amount: Decimal = contributions
            .iter()
            .map(|c| (c.total_bet.min(threshold) - prev).max(Decimal::ZERO))
            .sum();
        let eligible_ids: Vec<Uuid> = contributions
            .iter()
            .filter(|c| !c.is_folded && c.total_bet >= threshold)
            .map(|c| c.player_id)
            .collect();
        if amount > Decimal::ZERO {
            pots.push(Pot { amount, eligible_ids });
        }
        prev = threshold;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contribution(total_bet: Decimal, is_all_in: bool, is_folded: bool) -> Contribution {
        Contribution {
            player_id: Uuid::new_v4(),
            total_bet,
            is_all_in,
            is_folded,
        }
    }

    #[test]
    fn no_all_ins_makes_one_pot() {
        let a = contribution(dec!(40), false, false);
        let b = contribution(dec!(40), false, false);
        let pots = compute_side_pots(&[a.clone(), b.clone()]);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, dec!(80));
        assert_eq!(pots[0].eligible_ids.len(), 2);
    }

    #[test]
    fn three_way_all_in_creates_main_and_side_pot() {
        // A=100 (all-in), B=500 (all-in), C=500 (all-in): matches scenario 2 of spec §8.
        let a = contribution(dec!(100), true, false);
        let b = contribution(dec!(500), true, false);
        let c = contribution(dec!(500), true, false);
        let pots = compute_side_pots(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, dec!(300));
        assert_eq!(pots[0].eligible_ids.len(), 3);
        assert_eq!(pots[1].amount, dec!(800));
        assert_eq!(pots[1].eligible_ids.len(), 2);
        assert!(pots[1].eligible_ids.contains(&b.player_id));
        assert!(pots[1].eligible_ids.contains(&c.player_id));
    }

    #[test]
    fn pot_sums_match_total_bets() {
        let a = contribution(dec!(100), true, false);
        let b = contribution(dec!(500), true, false);
        let c = contribution(dec!(300), false, true);
        let total: Decimal = [&a, &b, &c].iter().map(|c| c.total_bet).sum();
        let pots = compute_side_pots(&[a, b, c]);
        let sum: Decimal = pots.iter().map(|p| p.amount).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn every_nonfolded_contributor_is_eligible_somewhere() {
        let a = contribution(dec!(100), true, false);
        let b = contribution(dec!(500), true, false);
        let c = contribution(dec!(500), false, false);
        let pots = compute_side_pots(&[a.clone(), b.clone(), c.clone()]);
        for contributor in [&a, &b, &c] {
            assert!(pots.iter().any(|p| p.eligible_ids.contains(&contributor.player_id)));
        }
    }

    #[test]
    fn folded_player_still_funds_pot_but_is_ineligible() {
        let a = contribution(dec!(100), false, true);
        let b = contribution(dec!(100), false, false);
        let pots = compute_side_pots(&[a.clone(), b.clone()]);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, dec!(200));
        assert_eq!(pots[0].eligible_ids, vec![b.player_id]);
    }
}
