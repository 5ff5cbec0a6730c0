use crate::betting::BettingState;
use crate::cards::{Card, Deck};
use crate::domain::PlayerStatus;
use crate::stage::Stage;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub id: Uuid,
    pub name: String,
    pub small_blind: Decimal,
    pub big_blind: Decimal,
    pub min_buy_in: Decimal,
    pub max_buy_in: Decimal,
    pub max_players: u8,
}

#[derive(Debug, Clone)]
pub struct Seat {
    pub player_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub seat_number: u8,
    pub stack: Decimal,
    pub status: PlayerStatus,
}

/// Live state for one in-progress hand. Owned exclusively by the table
/// hub; nothing outside the hub ever mutates this.
#[derive(Debug, Clone)]
pub struct HandState {
    pub hand_id: Uuid,
    pub hand_number: i64,
    pub stage: Stage,
    pub server_seed: String,
    pub seed_hash: String,
    pub deck: Deck,
    pub community: Vec<Card>,
    pub hole_cards: HashMap<u8, [Card; 2]>,
    pub betting: BettingState,
    /// Cumulative contribution per seat across all streets of this hand.
    pub contributed: HashMap<u8, Decimal>,
    pub dealer_seat: u8,
    pub action_order: i64,
    /// seat_number -> player_id, in table seat order, participating in
    /// this hand (snapshotted at `StartHand` so mid-hand joiners don't
    /// perturb turn order).
    pub seats_in_order: Vec<u8>,
}

impl HandState {
    pub fn seat_index(&self, seat: u8) -> Option<usize> {
        self.seats_in_order.iter().position(|&s| s == seat)
    }
}
