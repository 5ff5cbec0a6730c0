//! The per-table actor. Sole owner of one table's live hand state;
//! serializes every mutation through a single inbound event queue so the
//! in-memory state needs no internal locks (spec §4.6/§5).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::betting::{self, Action, BettingState, PlayerState};
use crate::broadcaster::Broadcaster;
use crate::cards::{best_hand, compare_hands, Card, Deck, Hand as CardSet};
use crate::domain::{PlayerStatus, ReferenceType};
use crate::dto::ServerMessage;
use crate::error::ErrorKind;
use crate::ledger::Ledger;
use crate::rng;
use crate::sidepot::{self, Contribution};
use crate::stage::Stage;

use super::event::{Event, EventReply, Reply};
use super::state::{HandState, Seat, TableConfig};

pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_INTER_HAND_DELAY: Duration = Duration::from_secs(3);

pub type Inbox = mpsc::UnboundedReceiver<(Event, oneshot::Sender<Reply>)>;
pub type Outbox = mpsc::UnboundedSender<(Event, oneshot::Sender<Reply>)>;

pub struct TableHub {
    pub config: TableConfig,
    seats: Vec<Option<Seat>>,
    hand: Option<HandState>,
    dealer_seat: Option<u8>,
    hand_counter: i64,
    ledger: Arc<Ledger>,
    broadcaster: Arc<dyn Broadcaster>,
    self_tx: Option<Outbox>,
    cancel: CancellationToken,
    turn_timeout: Duration,
    inter_hand_delay: Duration,
}

impl TableHub {
    pub fn new(config: TableConfig, ledger: Arc<Ledger>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        let n = config.max_players as usize;
        TableHub {
            config,
            seats: vec![None; n],
            hand: None,
            dealer_seat: None,
            hand_counter: 0,
            ledger,
            broadcaster,
            self_tx: None,
            cancel: CancellationToken::new(),
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            inter_hand_delay: DEFAULT_INTER_HAND_DELAY,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    fn seat_for_user(&self, user_id: Uuid) -> Option<&Seat> {
        self.seats.iter().flatten().find(|s| s.user_id == user_id)
    }

    /// Apply one event to hub state. The only entry point that mutates
    /// `self`; both the spawned actor loop and direct unit tests call it.
    pub async fn apply(&mut self, event: Event) -> Reply {
        match event {
            Event::PlayerJoin { user_id, player_id, seat, buy_in, username } => {
                self.join(user_id, player_id, seat, buy_in, username).await
            }
            Event::PlayerLeave { user_id } => self.leave(user_id).await,
            Event::PlayerAction { user_id, action, amount } => {
                self.player_action(user_id, action, amount).await
            }
            Event::StartHand => self.start_hand().await,
            Event::GetState => Ok(EventReply::state(self.state_snapshot())),
            Event::Shutdown => self.shutdown().await,
        }
    }

    /// Builds the `TableState` snapshot the `get_table_state` façade method
    /// returns: seats, the active hand's stage/board/pot if any, whose turn
    /// it is. Never includes hole cards — those only go to their owner via
    /// `send_to_player`.
    fn state_snapshot(&self) -> serde_json::Value {
        let seats: Vec<serde_json::Value> = self
            .seats
            .iter()
            .map(|seat| match seat {
                Some(seat) => serde_json::json!({
                    "player_id": seat.player_id,
                    "user_id": seat.user_id,
                    "username": seat.username,
                    "seat_number": seat.seat_number,
                    "stack": seat.stack,
                    "status": format!("{:?}", seat.status),
                }),
                None => serde_json::Value::Null,
            })
            .collect();
        let hand = self.hand.as_ref().map(|hand| {
            serde_json::json!({
                "hand_id": hand.hand_id,
                "hand_number": hand.hand_number,
                "stage": format!("{:?}", hand.stage),
                "community_cards": hand.community.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                "pot_size": hand.betting.pot_size,
                "current_bet": hand.betting.current_bet,
                "current_turn_seat": hand.seats_in_order.get(hand.betting.current_idx).copied(),
            })
        });
        serde_json::json!({
            "table_id": self.config.id,
            "name": self.config.name,
            "seats": seats,
            "hand": hand,
        })
    }

    async fn join(
        &mut self,
        user_id: Uuid,
        player_id: Uuid,
        seat: u8,
        buy_in: Decimal,
        username: String,
    ) -> Reply {
        if seat == 0 || seat as usize > self.seats.len() {
            return Err(ErrorKind::InvalidInput("seat out of range".to_string()));
        }
        if self.hand.is_some() {
            return Err(ErrorKind::GameAlreadyStarted);
        }
        let idx = (seat - 1) as usize;
        if self.seats[idx].is_some() {
            return Err(ErrorKind::SeatTaken);
        }
        if buy_in < self.config.min_buy_in || buy_in > self.config.max_buy_in {
            return Err(ErrorKind::InvalidInput("buy-in outside table limits".to_string()));
        }

        self.ledger
            .withdraw(user_id, buy_in, ReferenceType::PokerBuyIn, Some(self.config.id))
            .await?;

        self.seats[idx] = Some(Seat {
            player_id,
            user_id,
            username,
            seat_number: seat,
            stack: buy_in,
            status: PlayerStatus::Active,
        });

        self.broadcaster
            .broadcast_to_table(self.config.id, &ServerMessage::PlayerJoined { player_id, seat })
            .await;

        if self.seated_count() >= 2 && self.hand.is_none() {
            self.schedule_start_hand();
        }

        Ok(EventReply::default())
    }

    async fn leave(&mut self, user_id: Uuid) -> Reply {
        let idx = self
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.user_id == user_id))
            .ok_or_else(|| ErrorKind::NotFound("player".to_string()))?;

        if let Some(hand) = &self.hand {
            let seat_number = self.seats[idx].as_ref().unwrap().seat_number;
            if hand.seats_in_order.contains(&seat_number) {
                return Err(ErrorKind::InvalidAction("cannot leave mid-hand".to_string()));
            }
        }

        let seat = self.seats[idx].take().expect("checked above");
        self.ledger
            .deposit(user_id, seat.stack, ReferenceType::PokerPayout, Some(self.config.id))
            .await?;

        self.broadcaster
            .broadcast_to_table(self.config.id, &ServerMessage::PlayerLeft { player_id: seat.player_id })
            .await;
        Ok(EventReply::default())
    }

    async fn start_hand(&mut self) -> Reply {
        if self.hand.is_some() {
            return Err(ErrorKind::GameAlreadyStarted);
        }
        if self.seated_count() < 2 {
            return Err(ErrorKind::MinPlayersRequired);
        }

        let positions: Vec<u8> = self
            .seats
            .iter()
            .flatten()
            .map(|s| s.seat_number)
            .collect();
        let n = positions.len();

        let dealer_pos_idx = match self.dealer_seat {
            Some(current) => {
                let cur_idx = positions.iter().position(|&s| s == current).unwrap_or(0);
                (cur_idx + 1) % n
            }
            None => 0,
        };
        let dealer_seat = positions[dealer_pos_idx];
        self.dealer_seat = Some(dealer_seat);

        let (sb_idx, bb_idx) = if n == 2 {
            (dealer_pos_idx, (dealer_pos_idx + 1) % n)
        } else {
            ((dealer_pos_idx + 1) % n, (dealer_pos_idx + 2) % n)
        };
        let first_to_act_idx = (bb_idx + 1) % n;

        self.hand_counter += 1;
        let server_seed = rng::generate_server_seed();
        let seed_hash = rng::commit(&server_seed);
        let permutation = rng::shuffle(&server_seed, "default", self.hand_counter as u64);
        let mut deck = Deck::from_permutation(&permutation);

        let mut hole_cards = HashMap::new();
        for &seat in &positions {
            let hole: [Card; 2] = [
                deck.draw().expect("deck has 52 cards"),
                deck.draw().expect("deck has 52 cards"),
            ];
            hole_cards.insert(seat, hole);
        }

        let mut players = Vec::with_capacity(n);
        // `contributed` tracks chips folded in at street end (see
        // `advance_stage`/`complete_hand`, which add `bet_this_round` once
        // the street closes); the blind itself lives only in
        // `bet_this_round` until then, or it would be counted twice.
        let contributed = HashMap::new();
        for (i, &seat) in positions.iter().enumerate() {
            let seat_ref = self.seats[(seat - 1) as usize].as_mut().expect("seated");
            let blind = if i == sb_idx {
                self.config.small_blind.min(seat_ref.stack)
            } else if i == bb_idx {
                self.config.big_blind.min(seat_ref.stack)
            } else {
                Decimal::ZERO
            };
            seat_ref.stack -= blind;
            let mut player = PlayerState::new(seat_ref.player_id, seat_ref.stack);
            player.bet_this_round = blind;
            if seat_ref.stack.is_zero() && blind > Decimal::ZERO {
                player.is_all_in = true;
            }
            players.push(player);
        }

        let pot_size: Decimal = players.iter().map(|p| p.bet_this_round).sum();
        let mut betting = BettingState::new(players, self.config.big_blind, first_to_act_idx);
        betting.current_bet = self.config.big_blind;
        betting.min_raise = self.config.big_blind;
        betting.pot_size = pot_size;

        let hand_id = Uuid::now_v7();
        self.hand = Some(HandState {
            hand_id,
            hand_number: self.hand_counter,
            stage: Stage::Preflop,
            server_seed,
            seed_hash: seed_hash.clone(),
            deck,
            community: Vec::new(),
            hole_cards,
            betting,
            contributed,
            dealer_seat,
            action_order: 0,
            seats_in_order: positions,
        });

        self.broadcaster
            .broadcast_to_table(
                self.config.id,
                &ServerMessage::NewHand { hand_id, hand_number: self.hand_counter, dealer_seat },
            )
            .await;
        for (&seat, hole) in &self.hand.as_ref().unwrap().hole_cards {
            let user_id = self.seats[(seat - 1) as usize].as_ref().unwrap().user_id;
            self.broadcaster
                .send_to_player(
                    self.config.id,
                    user_id,
                    &ServerMessage::CardsDealt { hole_cards: [hole[0].to_string(), hole[1].to_string()] },
                )
                .await;
        }

        Ok(EventReply::default())
    }

    async fn player_action(&mut self, user_id: Uuid, action: Action, amount: Decimal) -> Reply {
        let seat = self
            .seat_for_user(user_id)
            .ok_or_else(|| ErrorKind::NotFound("player".to_string()))?
            .clone();
        let hand = self.hand.as_mut().ok_or(ErrorKind::GameNotStarted)?;
        if !matches!(hand.stage, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River) {
            return Err(ErrorKind::InvalidAction("no betting round is open".to_string()));
        }

        let next_betting = betting::validate_action(&hand.betting, seat.player_id, action, amount)?;
        hand.betting = next_betting;
        let seat_stack = hand
            .betting
            .players
            .iter()
            .find(|p| p.player_id == seat.player_id)
            .map(|p| p.stack)
            .expect("player exists in betting state");
        self.seats[(seat.seat_number - 1) as usize].as_mut().unwrap().stack = seat_stack;

        self.broadcaster
            .broadcast_to_table(
                self.config.id,
                &ServerMessage::PlayerActed { player_id: seat.player_id, action: format!("{:?}", action), amount },
            )
            .await;

        self.progress().await;
        Ok(EventReply::default())
    }

    /// After any applied action (or synthesized timeout fold): fast-path
    /// to single-winner completion, advance the stage, or just pass the
    /// turn, per spec §4.6 "Progression".
    async fn progress(&mut self) {
        let Some(hand) = &self.hand else { return };
        let not_folded = hand.betting.players.iter().filter(|p| !p.is_folded).count();
        if not_folded <= 1 {
            self.complete_hand().await;
            return;
        }
        if betting::is_betting_complete(&hand.betting) {
            self.advance_stage().await;
        } else {
            let idx = hand.betting.current_idx;
            let seat = hand.seats_in_order[idx];
            let user_id = self.seats[(seat - 1) as usize].as_ref().unwrap().user_id;
            self.broadcaster
                .send_to_player(
                    self.config.id,
                    user_id,
                    &ServerMessage::TurnChanged { player_id: user_id, timeout_secs: self.turn_timeout.as_secs() },
                )
                .await;
        }
    }

    async fn advance_stage(&mut self) {
        loop {
            let hand = self.hand.as_mut().expect("hand present");
            for (i, &seat) in hand.seats_in_order.clone().iter().enumerate() {
                let bet = hand.betting.players[i].bet_this_round;
                *hand.contributed.entry(seat).or_insert(Decimal::ZERO) += bet;
            }

            let all_in_or_folded = hand
                .betting
                .players
                .iter()
                .all(|p| p.is_folded || p.is_all_in);
            let next_stage = if all_in_or_folded && hand.stage != Stage::River {
                if hand.stage == Stage::Waiting {
                    Stage::Preflop
                } else {
                    // shortcut: stay in the betting ladder until the
                    // board is complete, then fall through to showdown.
                    hand.stage.next_street().unwrap_or(Stage::Showdown)
                }
            } else {
                match hand.stage.next_street() {
                    Some(s) => s,
                    None => Stage::Showdown,
                }
            };
            hand.stage = hand.stage.advance(next_stage).expect("valid FSM transition");

            if hand.stage == Stage::Showdown {
                self.showdown().await;
                return;
            }

            let cards_to_deal = match hand.stage {
                Stage::Flop => 3,
                Stage::Turn | Stage::River => 1,
                _ => 0,
            };
            let mut dealt = Vec::with_capacity(cards_to_deal);
            for _ in 0..cards_to_deal {
                let card = hand.deck.draw().expect("deck has enough cards");
                hand.community.push(card);
                dealt.push(card.to_string());
            }

            for player in hand.betting.players.iter_mut() {
                player.bet_this_round = Decimal::ZERO;
                player.has_acted = player.is_folded || player.is_all_in;
            }
            hand.betting.current_bet = Decimal::ZERO;
            hand.betting.min_raise = self.config.big_blind;

            let dealer_idx = hand.seat_index(hand.dealer_seat).unwrap_or(0);
            let n = hand.seats_in_order.len();
            let first = (0..n)
                .map(|step| (dealer_idx + 1 + step) % n)
                .find(|&i| {
                    let p = &hand.betting.players[i];
                    !p.is_folded && !p.is_all_in
                });
            hand.betting.current_idx = first.unwrap_or(dealer_idx);

            self.broadcaster
                .broadcast_to_table(self.config.id, &ServerMessage::CommunityCards { cards: dealt })
                .await;

            if !all_in_or_folded {
                // fresh street, nobody has acted yet: betting cannot already
                // be complete, so this is always a turn handoff, never a
                // re-entry into fold-count/completion checks.
                let hand = self.hand.as_ref().expect("hand present");
                let idx = hand.betting.current_idx;
                let seat = hand.seats_in_order[idx];
                let user_id = self.seats[(seat - 1) as usize].as_ref().unwrap().user_id;
                self.broadcaster
                    .send_to_player(
                        self.config.id,
                        user_id,
                        &ServerMessage::TurnChanged { player_id: user_id, timeout_secs: self.turn_timeout.as_secs() },
                    )
                    .await;
                return;
            }
            // everyone left is all-in or folded: keep dealing streets with
            // no further betting until the loop reaches showdown above.
        }
    }

    async fn complete_hand(&mut self) {
        let mut hand = self.hand.take().expect("hand present");
        hand.stage = hand.stage.advance(Stage::Complete).unwrap_or(Stage::Complete);
        for (i, &seat) in hand.seats_in_order.iter().enumerate() {
            let bet = hand.betting.players[i].bet_this_round;
            *hand.contributed.entry(seat).or_insert(Decimal::ZERO) += bet;
        }
        let pot: Decimal = hand.contributed.values().copied().sum();
        let winner_idx = hand
            .betting
            .players
            .iter()
            .position(|p| !p.is_folded)
            .expect("exactly one non-folded player remains");
        let winner_seat = hand.seats_in_order[winner_idx];
        let winner = self.seats[(winner_seat - 1) as usize].as_mut().expect("seated");
        winner.stack += pot;
        let (winner_user_id, winner_player_id) = (winner.user_id, winner.player_id);
        self.credit_payout(winner_user_id, pot, hand.hand_id).await;

        self.broadcaster
            .broadcast_to_table(
                self.config.id,
                &ServerMessage::HandResult { winners: vec![winner_player_id], pot },
            )
            .await;

        self.cleanup_hand(hand).await;
    }

    async fn showdown(&mut self) {
        let mut hand = self.hand.take().expect("hand present");
        hand.stage = Stage::Showdown;

        let contributions: Vec<Contribution> = hand
            .seats_in_order
            .iter()
            .enumerate()
            .map(|(i, &seat)| {
                let p = &hand.betting.players[i];
                Contribution {
                    player_id: p.player_id,
                    total_bet: *hand.contributed.get(&seat).unwrap_or(&Decimal::ZERO),
                    is_all_in: p.is_all_in,
                    is_folded: p.is_folded,
                }
            })
            .collect();
        let pots = sidepot::compute_side_pots(&contributions);

        let mut board = CardSet::empty();
        for &card in &hand.community {
            board.add(card);
        }

        let mut winners_total: HashMap<Uuid, Decimal> = HashMap::new();
        for pot in &pots {
            let mut eligible_ranks = Vec::new();
            for (i, &seat) in hand.seats_in_order.iter().enumerate() {
                let p = &hand.betting.players[i];
                if pot.eligible_ids.contains(&p.player_id) {
                    let mut cards = board;
                    for &c in &hand.hole_cards[&seat] {
                        cards.add(c);
                    }
                    eligible_ranks.push((seat, p.player_id, best_hand(&cards)));
                }
            }
            let ranks: Vec<_> = eligible_ranks.iter().map(|(_, _, r)| r.clone()).collect();
            let winning_indices = compare_hands(&ranks);
            let split = split_pot(pot.amount, winning_indices.len());
            let dealer_idx = hand.seat_index(hand.dealer_seat).unwrap_or(0);
            let mut ordered_winners: Vec<usize> = winning_indices.clone();
            ordered_winners.sort_by_key(|&wi| {
                let seat = eligible_ranks[wi].0;
                let seat_pos = hand.seats_in_order.iter().position(|&s| s == seat).unwrap_or(0);
                (seat_pos + hand.seats_in_order.len() - dealer_idx) % hand.seats_in_order.len()
            });
            for (share_idx, &wi) in ordered_winners.iter().enumerate() {
                let player_id = eligible_ranks[wi].1;
                *winners_total.entry(player_id).or_insert(Decimal::ZERO) += split[share_idx];
            }
        }

        let mut winner_ids = Vec::new();
        for (player_id, amount) in &winners_total {
            if let Some(seat) = self.seats.iter_mut().flatten().find(|s| s.player_id == *player_id) {
                seat.stack += *amount;
                let user_id = seat.user_id;
                winner_ids.push(*player_id);
                self.credit_payout(user_id, *amount, hand.hand_id).await;
            }
        }

        let total_pot: Decimal = pots.iter().map(|p| p.amount).sum();
        self.broadcaster
            .broadcast_to_table(
                self.config.id,
                &ServerMessage::HandResult { winners: winner_ids, pot: total_pot },
            )
            .await;
        self.broadcaster
            .broadcast_to_table(
                self.config.id,
                &ServerMessage::TableState {
                    state: serde_json::json!({ "revealed_seed": hand.server_seed, "seed_hash": hand.seed_hash }),
                },
            )
            .await;

        self.cleanup_hand(hand).await;
    }

    /// Ledger credit is retried once in the hub beyond the ledger's own
    /// internal retries; a persistent failure is logged CRITICAL and the
    /// hub continues rather than manufacturing or losing chips silently.
    async fn credit_payout(&self, user_id: Uuid, amount: Decimal, hand_id: Uuid) {
        let mut result = self
            .ledger
            .deposit(user_id, amount, ReferenceType::PokerPayout, Some(hand_id))
            .await;
        if matches!(result, Err(ErrorKind::OptimisticLock)) {
            result = self
                .ledger
                .deposit(user_id, amount, ReferenceType::PokerPayout, Some(hand_id))
                .await;
        }
        if let Err(err) = result {
            log::error!(
                "CRITICAL: payout credit failed for user {user_id} hand {hand_id} amount {amount}: {err}. \
                 operator reconciliation required."
            );
        }
    }

    async fn cleanup_hand(&mut self, _finished: HandState) {
        let zeroed: Vec<u8> = self
            .seats
            .iter()
            .flatten()
            .filter(|s| s.stack.is_zero())
            .map(|s| s.seat_number)
            .collect();
        for seat in zeroed {
            self.seats[(seat - 1) as usize] = None;
        }
        if self.seated_count() >= 2 {
            self.schedule_start_hand();
        }
    }

    async fn shutdown(&mut self) -> Reply {
        self.hand = None;
        self.cancel.cancel();
        Ok(EventReply::default())
    }

    /// Inter-hand delay timer. Races against the cancellation token so a
    /// shutdown hub never has `StartHand` posted to its closed inbox
    /// (spec §9 open question on timer/shutdown races).
    fn schedule_start_hand(&self) {
        let Some(tx) = self.self_tx.clone() else { return };
        let cancel = self.cancel.clone();
        let delay = self.inter_hand_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let (reply_tx, _reply_rx) = oneshot::channel();
                    let _ = tx.send((Event::StartHand, reply_tx));
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    /// Spawn the actor: one task draining `inbox` until `Shutdown` is
    /// applied or the cancellation token fires, enforcing a single
    /// handler in flight at a time per table.
    pub fn spawn(mut self) -> (Outbox, CancellationToken) {
        let (tx, mut inbox): (Outbox, Inbox) = mpsc::unbounded_channel();
        self.self_tx = Some(tx.clone());
        let cancel = self.cancel.clone();
        let cancel_for_loop = cancel.clone();
        tokio::spawn(async move {
            loop {
                let deadline = self.turn_deadline();
                let timeout = async {
                    match deadline {
                        Some(d) => tokio::time::sleep_until(d).await,
                        None => std::future::pending::<()>().await,
                    }
                };
                tokio::select! {
                    _ = cancel_for_loop.cancelled() => {
                        let _ = self.apply(Event::Shutdown).await;
                        break;
                    }
                    received = inbox.recv() => {
                        match received {
                            Some((event, reply_tx)) => {
                                let is_shutdown = matches!(event, Event::Shutdown);
                                let result = self.apply(event).await;
                                let _ = reply_tx.send(result);
                                if is_shutdown {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                    _ = timeout => {
                        self.synthesize_timeout_fold().await;
                    }
                }
            }
        });
        (tx, cancel)
    }

    fn turn_deadline(&self) -> Option<tokio::time::Instant> {
        let hand = self.hand.as_ref()?;
        if !matches!(hand.stage, Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River) {
            return None;
        }
        Some(tokio::time::Instant::now() + self.turn_timeout)
    }

    async fn synthesize_timeout_fold(&mut self) {
        let Some(hand) = &self.hand else { return };
        let idx = hand.betting.current_idx;
        let player_id = hand.betting.players[idx].player_id;
        let Some(seat) = self.seats.iter().flatten().find(|s| s.player_id == player_id) else {
            return;
        };
        let user_id = seat.user_id;
        let _ = self.player_action(user_id, Action::Fold, Decimal::ZERO).await;
    }
}

/// Equal split of `amount` among `n` winners at whole-chip granularity; a
/// pot that doesn't divide evenly hands its leftover chips one at a time
/// to the winners closest to the dealer, in the order the caller already
/// sorted them.
fn split_pot(amount: Decimal, n: usize) -> Vec<Decimal> {
    if n == 0 {
        return vec![];
    }
    let unit = Decimal::ONE;
    let share = (amount / Decimal::from(n)).trunc_with_scale(0);
    let mut shares = vec![share; n];
    let mut remainder = amount - share * Decimal::from(n);
    let mut i = 0;
    while remainder >= unit {
        shares[i % n] += unit;
        remainder -= unit;
        i += 1;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split_has_no_remainder() {
        let shares = split_pot(Decimal::new(100, 0), 2);
        assert_eq!(shares, vec![Decimal::new(50, 0), Decimal::new(50, 0)]);
    }

    #[test]
    fn odd_split_gives_remainder_chip_to_first_winner() {
        let shares = split_pot(Decimal::new(101, 0), 2);
        assert_eq!(shares[0], Decimal::new(51, 0));
        assert_eq!(shares[1], Decimal::new(50, 0));
    }

    #[test]
    fn three_way_split_hands_out_remainder_chips_in_order() {
        let shares = split_pot(Decimal::new(100, 0), 3);
        assert_eq!(shares, vec![Decimal::new(34, 0), Decimal::new(33, 0), Decimal::new(33, 0)]);
    }
}
