//! The simpler sibling of the poker hub: one background task per active
//! table cycling commit → betting window → settlement → next round,
//! sharing the RNG's provably-fair primitives and the ledger's wallet
//! contract (spec §4.9).

mod payout;

pub use payout::{payout_multiplier, result_color};

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{
    BetStatus, BetType, ReferenceType, RouletteBet, RouletteRound, RouletteTable, RouletteTableStatus,
};
use crate::error::ErrorKind;
use crate::ledger::Ledger;
use crate::persistence::RouletteRepository;
use crate::rng;

pub const DEFAULT_BETTING_WINDOW: Duration = Duration::from_secs(30);

struct RoundState {
    round: RouletteRound,
    server_seed: String,
    bets: Vec<RouletteBet>,
}

/// Owns the live (unsettled) round for one table. Bet placement is
/// read-modify-write under a single lock per table, mirroring the table
/// hub's single-actor-per-table discipline without needing a full event
/// loop for a game this simple.
pub struct RouletteTableRunner {
    pub table: RouletteTable,
    current: RwLock<Option<RoundState>>,
    round_number: RwLock<i64>,
    ledger: Arc<Ledger>,
    repository: Arc<dyn RouletteRepository>,
    betting_window: Duration,
    cancel: CancellationToken,
}

impl RouletteTableRunner {
    pub fn new(
        table: RouletteTable,
        ledger: Arc<Ledger>,
        repository: Arc<dyn RouletteRepository>,
        betting_window: Duration,
    ) -> Self {
        RouletteTableRunner {
            table,
            current: RwLock::new(None),
            round_number: RwLock::new(0),
            ledger,
            repository,
            betting_window,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Step 1: commit phase. Generates and hashes a fresh server seed,
    /// opens the betting window, persists and returns the new round.
    pub async fn open_round(&self) -> RouletteRound {
        let mut round_number = self.round_number.write().await;
        *round_number += 1;
        let server_seed = rng::generate_server_seed();
        let seed_hash = rng::commit(&server_seed);
        let round = RouletteRound {
            id: Uuid::now_v7(),
            table_id: self.table.id,
            round_number: *round_number,
            result: None,
            result_color: None,
            seed_hash,
            seed_revealed: None,
            betting_ends_at: chrono::Utc::now() + self.betting_window,
            settled_at: None,
        };
        let _ = self.repository.save_round(&round).await;
        *self.current.write().await = Some(RoundState {
            round: round.clone(),
            server_seed,
            bets: Vec::new(),
        });
        round
    }

    pub async fn current_round(&self) -> Option<RouletteRound> {
        self.current.read().await.as_ref().map(|s| s.round.clone())
    }

    /// Step 2: betting phase. Debits the stake and records a `pending`
    /// bet in the same call; on a persistence failure after debit, the
    /// stake is refunded (spec §4.8's compensation pattern, reused here).
    pub async fn place_bet(
        &self,
        user_id: Uuid,
        bet_type: BetType,
        bet_value: Vec<u8>,
        amount: Decimal,
    ) -> Result<RouletteBet, ErrorKind> {
        if self.table.status != RouletteTableStatus::Active {
            return Err(ErrorKind::InvalidInput("table is not active".to_string()));
        }
        if amount < self.table.min_bet || amount > self.table.max_bet {
            return Err(ErrorKind::InvalidBet("bet outside table limits".to_string()));
        }
        validate_bet_shape(bet_type, &bet_value)?;

        let mut guard = self.current.write().await;
        let state = guard.as_mut().ok_or(ErrorKind::BettingClosed)?;
        if state.round.settled_at.is_some() || chrono::Utc::now() >= state.round.betting_ends_at {
            return Err(ErrorKind::BettingClosed);
        }

        self.ledger
            .withdraw(user_id, amount, ReferenceType::RouletteBet, Some(state.round.id))
            .await?;

        let bet = RouletteBet {
            id: Uuid::now_v7(),
            round_id: state.round.id,
            user_id,
            bet_type,
            bet_value,
            amount,
            payout: Decimal::ZERO,
            status: BetStatus::Pending,
        };
        if let Err(err) = self.repository.save_bet(&bet).await {
            log::error!("roulette bet persistence failed, refunding stake: {err}");
            self.ledger
                .deposit(user_id, amount, ReferenceType::RouletteBet, Some(state.round.id))
                .await?;
            return Err(err);
        }
        state.bets.push(bet.clone());
        Ok(bet)
    }

    /// Step 3: settlement. Derives the result from the committed seed
    /// with the same unbiased-index draw the shuffle uses, then pays
    /// winners and marks every bet won/lost.
    pub async fn settle(&self) -> Option<RouletteRound> {
        let mut guard = self.current.write().await;
        let state = guard.take()?;
        let result = draw_result(&state.server_seed, &state.round.id.to_string(), state.round.round_number as u64);
        let color = result_color(result);

        let mut settled_round = state.round.clone();
        settled_round.result = Some(result);
        settled_round.result_color = Some(color);
        settled_round.seed_revealed = Some(state.server_seed.clone());
        settled_round.settled_at = Some(chrono::Utc::now());
        let _ = self.repository.save_round(&settled_round).await;

        for mut bet in state.bets {
            let won = is_winner(bet.bet_type, &bet.bet_value, result);
            if won {
                let multiplier = payout_multiplier(bet.bet_type);
                let payout = bet.amount * (multiplier + Decimal::ONE);
                bet.payout = payout;
                bet.status = BetStatus::Won;
                if let Err(err) = self
                    .ledger
                    .deposit(bet.user_id, payout, ReferenceType::RoulettePayout, Some(settled_round.id))
                    .await
                {
                    log::error!(
                        "CRITICAL: roulette payout credit failed for user {} round {}: {err}",
                        bet.user_id,
                        settled_round.id
                    );
                }
            } else {
                bet.status = BetStatus::Lost;
            }
            let _ = self.repository.save_bet(&bet).await;
        }

        Some(settled_round)
    }

    /// Runs commit → wait-for-window → settle → repeat until cancelled.
    pub async fn run(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = async {
                    self.open_round().await;
                    tokio::time::sleep(self.betting_window).await;
                    self.settle().await;
                } => {}
            }
        }
    }
}

/// Draws the winning pocket from the same keystream the shuffle uses,
/// reduced to `[0, 37)` by rejection sampling rather than modulo.
fn draw_result(server_seed: &str, client_seed: &str, nonce: u64) -> u8 {
    rng::draw_index(server_seed, client_seed, nonce, 37) as u8
}

fn validate_bet_shape(bet_type: BetType, bet_value: &[u8]) -> Result<(), ErrorKind> {
    let expected_len: Option<usize> = match bet_type {
        BetType::Straight => Some(1),
        BetType::Split => Some(2),
        BetType::Street => Some(3),
        BetType::Corner => Some(4),
        BetType::Line => Some(6),
        BetType::Dozen | BetType::Column => Some(1),
        BetType::Red | BetType::Black | BetType::Odd | BetType::Even | BetType::High | BetType::Low => Some(0),
    };
    match expected_len {
        Some(n) if bet_value.len() == n => {}
        Some(n) => {
            return Err(ErrorKind::InvalidBet(format!(
                "{bet_type:?} bet requires {n} number(s), got {}",
                bet_value.len()
            )))
        }
        None => {}
    }
    if bet_value.iter().any(|&n| n > 36) {
        return Err(ErrorKind::InvalidBet("bet value out of range 0-36".to_string()));
    }
    Ok(())
}

fn is_winner(bet_type: BetType, bet_value: &[u8], result: u8) -> bool {
    match bet_type {
        BetType::Straight | BetType::Split | BetType::Street | BetType::Corner | BetType::Line => {
            bet_value.contains(&result)
        }
        BetType::Red => result_color(result) == crate::domain::RouletteColor::Red,
        BetType::Black => result_color(result) == crate::domain::RouletteColor::Black,
        BetType::Odd => result != 0 && !result.is_multiple_of(2),
        BetType::Even => result != 0 && result.is_multiple_of(2),
        BetType::Low => (1..=18).contains(&result),
        BetType::High => (19..=36).contains(&result),
        BetType::Dozen => {
            let dozen = bet_value.first().copied().unwrap_or(0);
            let range = match dozen {
                1 => 1..=12,
                2 => 13..=24,
                _ => 25..=36,
            };
            range.contains(&result)
        }
        BetType::Column => {
            if result == 0 {
                false
            } else {
                let column = bet_value.first().copied().unwrap_or(1);
                ((result - 1) % 3 + 1) == column
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryWalletStore;
    use crate::persistence::InMemoryStore;
    use rust_decimal_macros::dec;

    fn runner() -> RouletteTableRunner {
        let table = RouletteTable {
            id: Uuid::new_v4(),
            min_bet: dec!(1),
            max_bet: dec!(1000),
            status: RouletteTableStatus::Active,
        };
        let ledger = Arc::new(Ledger::new(Arc::new(InMemoryWalletStore::new())));
        let repository: Arc<dyn RouletteRepository> = Arc::new(InMemoryStore::new());
        RouletteTableRunner::new(table, ledger, repository, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn straight_bet_requires_one_number() {
        assert!(validate_bet_shape(BetType::Straight, &[17]).is_ok());
        assert!(validate_bet_shape(BetType::Straight, &[17, 18]).is_err());
    }

    #[tokio::test]
    async fn bet_rejected_once_round_settled() {
        let runner = runner();
        let user_id = Uuid::new_v4();
        runner.ledger.create_wallet(user_id).await.unwrap();
        runner.ledger.deposit(user_id, dec!(100), ReferenceType::Deposit, None).await.unwrap();
        runner.open_round().await;
        runner.settle().await;
        let err = runner.place_bet(user_id, BetType::Red, vec![], dec!(10)).await.unwrap_err();
        assert_eq!(err, ErrorKind::BettingClosed);
    }

    #[tokio::test]
    async fn straight_bet_on_result_pays_35_to_1() {
        let runner = runner();
        let user_id = Uuid::new_v4();
        runner.ledger.create_wallet(user_id).await.unwrap();
        runner.ledger.deposit(user_id, dec!(100), ReferenceType::Deposit, None).await.unwrap();
        runner.open_round().await;
        let result = {
            let guard = runner.current.read().await;
            let state = guard.as_ref().unwrap();
            draw_result(&state.server_seed, &state.round.id.to_string(), state.round.round_number as u64)
        };
        runner
            .place_bet(user_id, BetType::Straight, vec![result], dec!(10))
            .await
            .unwrap();
        runner.settle().await;
        let wallet = runner.ledger.balance(user_id).await.unwrap();
        assert_eq!(wallet.balance, dec!(90) + dec!(10) * (payout_multiplier(BetType::Straight) + Decimal::ONE));
    }

    #[test]
    fn color_classification_matches_the_classical_red_set() {
        assert_eq!(result_color(0), crate::domain::RouletteColor::Green);
        assert_eq!(result_color(1), crate::domain::RouletteColor::Red);
        assert_eq!(result_color(2), crate::domain::RouletteColor::Black);
        assert_eq!(result_color(36), crate::domain::RouletteColor::Red);
    }
}
