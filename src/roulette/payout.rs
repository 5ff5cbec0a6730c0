//! The fixed European-wheel payout table and color classification, kept
//! separate from the round-lifecycle state machine so both halves stay
//! independently testable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{BetType, RouletteColor};

const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// 0 is green; the classical red set above is red, everything else black.
pub fn result_color(result: u8) -> RouletteColor {
    if result == 0 {
        RouletteColor::Green
    } else if RED_NUMBERS.contains(&result) {
        RouletteColor::Red
    } else {
        RouletteColor::Black
    }
}

/// The "to one" side of each bet's payout odds. A winning bet of `amount`
/// returns `amount * (multiplier + 1)`, i.e. stake plus winnings.
pub fn payout_multiplier(bet_type: BetType) -> Decimal {
    match bet_type {
        BetType::Straight => dec!(35),
        BetType::Split => dec!(17),
        BetType::Street => dec!(11),
        BetType::Corner => dec!(8),
        BetType::Line => dec!(5),
        BetType::Dozen | BetType::Column => dec!(2),
        BetType::Red | BetType::Black | BetType::Odd | BetType::Even | BetType::High | BetType::Low => dec!(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_green_not_red_or_black() {
        assert_eq!(result_color(0), RouletteColor::Green);
    }

    #[test]
    fn straight_pays_35_to_1() {
        assert_eq!(payout_multiplier(BetType::Straight), dec!(35));
    }

    #[test]
    fn even_money_bets_pay_1_to_1() {
        for bet_type in [BetType::Red, BetType::Black, BetType::Odd, BetType::Even, BetType::High, BetType::Low] {
            assert_eq!(payout_multiplier(bet_type), dec!(1));
        }
    }
}
