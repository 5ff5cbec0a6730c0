//! Pure state-transition function for a single betting round: fold, check,
//! call, bet, raise, all-in. No I/O; the table hub owns all of that and
//! only calls [`validate_action`] to decide what the next state is.

use crate::error::ErrorKind;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub player_id: Uuid,
    pub stack: Decimal,
    pub bet_this_round: Decimal,
    pub has_acted: bool,
    pub is_all_in: bool,
    pub is_folded: bool,
}

impl PlayerState {
    pub fn new(player_id: Uuid, stack: Decimal) -> Self {
        PlayerState {
            player_id,
            stack,
            bet_this_round: Decimal::ZERO,
            has_acted: false,
            is_all_in: false,
            is_folded: false,
        }
    }

    fn is_live(&self) -> bool {
        !self.is_folded && !self.is_all_in
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingState {
    pub players: Vec<PlayerState>,
    pub current_bet: Decimal,
    pub min_raise: Decimal,
    pub pot_size: Decimal,
    pub current_idx: usize,
    pub big_blind: Decimal,
}

impl BettingState {
    pub fn new(players: Vec<PlayerState>, big_blind: Decimal, current_idx: usize) -> Self {
        BettingState {
            players,
            current_bet: Decimal::ZERO,
            min_raise: big_blind,
            pot_size: Decimal::ZERO,
            current_idx,
            big_blind,
        }
    }

    fn find(&self, player_id: Uuid) -> Option<usize> {
        self.players.iter().position(|p| p.player_id == player_id)
    }
}

/// Apply one player action to a betting state, returning the new state or
/// the `ErrorKind` that makes the action illegal.
pub fn validate_action(
    state: &BettingState,
    player_id: Uuid,
    action: Action,
    amount: Decimal,
) -> Result<BettingState, ErrorKind> {
    let mut next = state.clone();
    let idx = next
        .find(player_id)
        .ok_or_else(|| ErrorKind::NotFound("player".to_string()))?;

    if idx != next.current_idx {
        return Err(ErrorKind::NotPlayerTurn);
    }
    if next.players[idx].is_folded || next.players[idx].is_all_in {
        return Err(ErrorKind::InvalidAction("player cannot act".to_string()));
    }

    match action {
        Action::Fold => {
            next.players[idx].is_folded = true;
            next.players[idx].has_acted = true;
        }
        Action::Check => {
            if next.players[idx].bet_this_round != next.current_bet {
                return Err(ErrorKind::InvalidAction(
                    "cannot check facing a bet".to_string(),
                ));
            }
            next.players[idx].has_acted = true;
        }
        Action::Call => {
            if next.current_bet <= next.players[idx].bet_this_round {
                return Err(ErrorKind::InvalidAction("nothing to call".to_string()));
            }
            let owed = next.current_bet - next.players[idx].bet_this_round;
            let contribution = owed.min(next.players[idx].stack);
            commit(&mut next, idx, contribution);
            if next.players[idx].stack.is_zero() {
                next.players[idx].is_all_in = true;
            }
            next.players[idx].has_acted = true;
        }
        Action::Bet => {
            if !next.current_bet.is_zero() {
                return Err(ErrorKind::InvalidBet(
                    "cannot bet when a bet is already live, use raise".to_string(),
                ));
            }
            if amount < next.big_blind {
                return Err(ErrorKind::InvalidBet(
                    "bet must be at least the big blind".to_string(),
                ));
            }
            if amount > next.players[idx].stack {
                return Err(ErrorKind::InvalidBet("insufficient stack".to_string()));
            }
            commit(&mut next, idx, amount);
            next.current_bet = amount;
            next.min_raise = amount;
            reopen_action(&mut next, idx);
            next.players[idx].has_acted = true;
            if next.players[idx].stack.is_zero() {
                next.players[idx].is_all_in = true;
            }
        }
        Action::Raise => {
            if next.current_bet.is_zero() {
                return Err(ErrorKind::InvalidBet(
                    "cannot raise with no bet live, use bet".to_string(),
                ));
            }
            let total = amount;
            let delta = total - next.current_bet;
            let available = next.players[idx].stack + next.players[idx].bet_this_round;
            if total > available {
                return Err(ErrorKind::InvalidBet("insufficient stack".to_string()));
            }
            let is_shove = total == available;
            if delta < next.min_raise && !is_shove {
                return Err(ErrorKind::InvalidBet(
                    "raise must be at least the minimum raise".to_string(),
                ));
            }
            let contribution = total - next.players[idx].bet_this_round;
            commit(&mut next, idx, contribution);
            let reopens = delta >= next.min_raise;
            next.current_bet = total;
            if reopens {
                next.min_raise = delta;
                reopen_action(&mut next, idx);
            } else {
                next.players[idx].is_all_in = true;
            }
            next.players[idx].has_acted = true;
            if next.players[idx].stack.is_zero() {
                next.players[idx].is_all_in = true;
            }
        }
        Action::AllIn => {
            let contribution = next.players[idx].stack;
            let total = next.players[idx].bet_this_round + contribution;
            commit(&mut next, idx, contribution);
            next.players[idx].is_all_in = true;
            next.players[idx].has_acted = true;
            let delta = total - next.current_bet;
            if total > next.current_bet && delta >= next.min_raise {
                next.min_raise = delta;
                next.current_bet = total;
                reopen_action(&mut next, idx);
            } else if total > next.current_bet {
                next.current_bet = total;
            }
        }
    }

    next.current_idx = next_player(&next, idx);
    Ok(next)
}

fn commit(state: &mut BettingState, idx: usize, amount: Decimal) {
    state.players[idx].stack -= amount;
    state.players[idx].bet_this_round += amount;
    state.pot_size += amount;
}

/// Every non-folded, non-all-in player other than `actor` must act again.
fn reopen_action(state: &mut BettingState, actor: usize) {
    for (i, p) in state.players.iter_mut().enumerate() {
        if i != actor && p.is_live() {
            p.has_acted = false;
        }
    }
}

/// Next seat cyclically after `from_idx`, skipping folded and all-in
/// players. Returns `from_idx` itself if no other live player remains.
pub fn next_player(state: &BettingState, from_idx: usize) -> usize {
    let n = state.players.len();
    for step in 1..=n {
        let idx = (from_idx + step) % n;
        if state.players[idx].is_live() {
            return idx;
        }
    }
    from_idx
}

/// True when either at most one player remains not-folded, or every live
/// player has acted and matched the current bet.
pub fn is_betting_complete(state: &BettingState) -> bool {
    let not_folded = state.players.iter().filter(|p| !p.is_folded).count();
    if not_folded <= 1 {
        return true;
    }
    state
        .players
        .iter()
        .filter(|p| p.is_live())
        .all(|p| p.has_acted && p.bet_this_round == state.current_bet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn players(n: usize, stack: Decimal) -> Vec<PlayerState> {
        (0..n).map(|_| PlayerState::new(Uuid::new_v4(), stack)).collect()
    }

    #[test]
    fn check_requires_matched_bet() {
        let mut ps = players(2, dec!(1000));
        ps[0].bet_this_round = dec!(10);
        let mut state = BettingState::new(ps, dec!(10), 0);
        state.current_bet = dec!(10);
        let id = state.players[0].player_id;
        let next = validate_action(&state, id, Action::Check, dec!(0)).unwrap();
        assert!(next.players[0].has_acted);
    }

    #[test]
    fn out_of_turn_rejected() {
        let ps = players(2, dec!(1000));
        let state = BettingState::new(ps, dec!(10), 0);
        let id = state.players[1].player_id;
        let err = validate_action(&state, id, Action::Check, dec!(0)).unwrap_err();
        assert_eq!(err, ErrorKind::NotPlayerTurn);
    }

    #[test]
    fn bet_reopens_action_for_others() {
        let mut ps = players(3, dec!(1000));
        ps.iter_mut().for_each(|p| p.has_acted = true);
        let mut state = BettingState::new(ps, dec!(10), 0);
        state.current_idx = 0;
        let id = state.players[0].player_id;
        let next = validate_action(&state, id, Action::Bet, dec!(50)).unwrap();
        assert!(next.players[0].has_acted);
        assert!(!next.players[1].has_acted);
        assert!(!next.players[2].has_acted);
        assert_eq!(next.current_bet, dec!(50));
    }

    #[test]
    fn short_all_in_raise_does_not_reopen() {
        let mut ps = players(2, dec!(1000));
        ps[0].bet_this_round = dec!(100);
        ps[0].stack = dec!(900);
        ps[0].has_acted = true;
        ps[1].bet_this_round = dec!(50);
        ps[1].stack = dec!(20);
        let mut state = BettingState::new(ps, dec!(10), 1);
        state.current_bet = dec!(100);
        state.min_raise = dec!(100);
        let id = state.players[1].player_id;
        let next = validate_action(&state, id, Action::AllIn, dec!(0)).unwrap();
        assert!(next.players[1].is_all_in);
        // short all-in raise by only 20 (< min_raise 100) must not reopen action for seat 0
        assert!(next.players[0].has_acted);
    }

    #[test]
    fn fold_to_heads_up_completes_betting() {
        let ps = players(2, dec!(1000));
        let state = BettingState::new(ps, dec!(10), 0);
        let id = state.players[0].player_id;
        let next = validate_action(&state, id, Action::Fold, dec!(0)).unwrap();
        assert!(is_betting_complete(&next));
    }

    #[test]
    fn betting_completes_when_all_matched_and_acted() {
        let mut ps = players(2, dec!(1000));
        ps[0].has_acted = true;
        ps[1].has_acted = true;
        let state = BettingState::new(ps, dec!(10), 0);
        assert!(is_betting_complete(&state));
    }
}
